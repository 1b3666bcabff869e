//! # Parsing de la Request Line
//! src/http/request.rs
//!
//! Solo se interpreta la primera línea del request; los headers se ignoran.
//!
//! ## Formato
//!
//! ```text
//! GET /path?query HTTP/1.1\r\n
//! ```
//!
//! La versión es opcional (`GET /path` también se acepta).

/// Método HTTP de la request line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    /// GET - El único método que sirve archivos
    Get,

    /// Cualquier otro token válido (HEAD, POST, ...) → 405
    Other(String),
}

impl Method {
    /// Parsea el token del método. Debe ser solo letras ASCII mayúsculas.
    fn parse(token: &str) -> Result<Self, RequestError> {
        if token.is_empty() || !token.bytes().all(|b| b.is_ascii_uppercase()) {
            return Err(RequestError::InvalidMethod(token.to_string()));
        }

        Ok(match token {
            "GET" => Method::Get,
            other => Method::Other(other.to_string()),
        })
    }

    /// Convierte el método a string
    pub fn as_str(&self) -> &str {
        match self {
            Method::Get => "GET",
            Method::Other(token) => token,
        }
    }
}

/// Errores del parsing de la request line; todos se responden con 400
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    /// No llegó ninguna línea
    #[error("Empty request")]
    Empty,

    /// La línea no es UTF-8
    #[error("Request line is not valid UTF-8")]
    InvalidEncoding,

    /// Número incorrecto de tokens
    #[error("Invalid request line format")]
    InvalidRequestLine,

    #[error("Invalid HTTP method: {0}")]
    InvalidMethod(String),

    #[error("Invalid HTTP version: {0}")]
    InvalidVersion(String),

    /// El path no empieza con '/'
    #[error("Invalid request target: {0}")]
    InvalidTarget(String),
}

/// Request line parseada
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    method: Method,

    /// Path sin query string ni fragmento (ej: "/index.html")
    path: String,

    /// Versión tal como llegó, si llegó
    version: Option<String>,
}

impl RequestLine {
    /// Parsea la primera línea de `buffer` (hasta `\n`, sin el `\r` final)
    ///
    /// # Ejemplo
    ///
    /// ```
    /// use pool_server::http::{Method, RequestLine};
    ///
    /// let line = RequestLine::parse(b"GET /docs/a.html?v=2 HTTP/1.1\r\nHost: x\r\n\r\n").unwrap();
    /// assert_eq!(line.method(), &Method::Get);
    /// assert_eq!(line.path(), "/docs/a.html");
    /// ```
    pub fn parse(buffer: &[u8]) -> Result<Self, RequestError> {
        let first_line = match buffer.iter().position(|&b| b == b'\n') {
            Some(end) => &buffer[..end],
            None => buffer,
        };
        let first_line = first_line.strip_suffix(b"\r").unwrap_or(first_line);

        let line = std::str::from_utf8(first_line).map_err(|_| RequestError::InvalidEncoding)?;
        if line.trim().is_empty() {
            return Err(RequestError::Empty);
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 2 || parts.len() > 3 {
            return Err(RequestError::InvalidRequestLine);
        }

        let method = Method::parse(parts[0])?;

        let target = parts[1];
        if !target.starts_with('/') {
            return Err(RequestError::InvalidTarget(target.to_string()));
        }
        let path = Self::strip_query(target).to_string();

        let version = match parts.get(2) {
            Some(v) if v.starts_with("HTTP/") => Some(v.to_string()),
            Some(v) => return Err(RequestError::InvalidVersion(v.to_string())),
            None => None,
        };

        Ok(Self {
            method,
            path,
            version,
        })
    }

    /// Quita `?query` y `#fragment` del target
    fn strip_query(target: &str) -> &str {
        let end = target.find(['?', '#']).unwrap_or(target.len());
        &target[..end]
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }
}
