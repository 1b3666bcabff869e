//! # Construcción de Respuestas HTTP
//!
//! Toda respuesta sale con este formato y cierra la conexión:
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! Content-Type: text/html\r\n
//! Content-Length: 13\r\n
//! Connection: close\r\n
//! \r\n
//! <body>
//! ```
//!
//! ## Ejemplo de uso
//!
//! ```
//! use pool_server::http::{Response, StatusCode};
//!
//! let response = Response::new(StatusCode::Ok, "text/plain", b"hola".to_vec());
//! let bytes = response.to_bytes();
//! assert!(bytes.starts_with(b"HTTP/1.1 200 OK\r\n"));
//! ```

use super::StatusCode;

/// Respuesta HTTP/1.1 completa
#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,
    content_type: String,

    /// Headers adicionales, en orden de inserción después de `Connection`
    extra_headers: Vec<(String, String)>,

    body: Vec<u8>,
}

impl Response {
    pub fn new(status: StatusCode, content_type: &str, body: Vec<u8>) -> Self {
        Self {
            status,
            content_type: content_type.to_string(),
            extra_headers: Vec::new(),
            body,
        }
    }

    /// Respuesta de error con un cuerpo HTML fijo
    ///
    /// # Ejemplo
    /// ```
    /// use pool_server::http::{Response, StatusCode};
    ///
    /// let response = Response::error(StatusCode::NotFound);
    /// assert!(String::from_utf8_lossy(response.body()).contains("404 Not Found"));
    /// ```
    pub fn error(status: StatusCode) -> Self {
        let body = format!(
            "<!DOCTYPE html>\n<html><head><title>{0}</title></head>\
             <body><h1>{0}</h1></body></html>\n",
            status
        );
        let response = Self::new(status, "text/html; charset=utf-8", body.into_bytes());

        if status == StatusCode::MethodNotAllowed {
            response.with_header("Allow", "GET")
        } else {
            response
        }
    }

    /// Agrega un header extra
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.extra_headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Convierte la respuesta a bytes listos para enviar por el socket
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut head = format!(
            "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n",
            self.status,
            self.content_type,
            self.body.len()
        );
        for (name, value) in &self.extra_headers {
            head.push_str(name);
            head.push_str(": ");
            head.push_str(value);
            head.push_str("\r\n");
        }
        head.push_str("\r\n");

        let mut result = Vec::with_capacity(head.len() + self.body.len());
        result.extend_from_slice(head.as_bytes());
        result.extend_from_slice(&self.body);
        result
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Busca un header extra por nombre (sin distinguir mayúsculas)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.extra_headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_bytes_header_order() {
        let response = Response::new(StatusCode::Ok, "text/plain", b"Test".to_vec())
            .with_header("Server", "pool_server");

        let text = String::from_utf8(response.to_bytes()).unwrap();
        assert_eq!(
            text,
            "HTTP/1.1 200 OK\r\n\
             Content-Type: text/plain\r\n\
             Content-Length: 4\r\n\
             Connection: close\r\n\
             Server: pool_server\r\n\
             \r\n\
             Test"
        );
    }

    #[test]
    fn test_error_response() {
        let response = Response::error(StatusCode::BadRequest);

        assert_eq!(response.status(), StatusCode::BadRequest);
        assert_eq!(response.content_type(), "text/html; charset=utf-8");
        let body = String::from_utf8(response.body().to_vec()).unwrap();
        assert!(body.contains("<h1>400 Bad Request</h1>"));
        assert_eq!(response.header("Allow"), None);
    }

    #[test]
    fn test_method_not_allowed_has_allow_header() {
        let response = Response::error(StatusCode::MethodNotAllowed);
        assert_eq!(response.header("allow"), Some("GET"));

        let text = String::from_utf8(response.to_bytes()).unwrap();
        assert!(text.starts_with("HTTP/1.1 405 Method Not Allowed\r\n"));
        assert!(text.contains("Allow: GET\r\n"));
    }

    #[test]
    fn test_binary_body_length() {
        let body = vec![0x89, 0x50, 0x4E, 0x47, 0x00];
        let response = Response::new(StatusCode::Ok, "image/png", body.clone());

        let bytes = response.to_bytes();
        assert!(bytes.ends_with(&body));
        assert!(String::from_utf8_lossy(&bytes).contains("Content-Length: 5\r\n"));
    }
}
