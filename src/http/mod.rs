//! # Módulo HTTP
//!
//! Subconjunto mínimo de HTTP/1.1 para servir archivos estáticos:
//!
//! - Parsing de la request line (método + path), sin headers
//! - Construcción de responses con `Connection: close`
//! - Status codes 200/400/404/405/500
//! - Tabla de tipos MIME
//!
//! No hay keep-alive, chunked encoding, rangos ni TLS.

pub mod mime;
pub mod request;
pub mod response;
pub mod status;

pub use request::{Method, RequestError, RequestLine};
pub use response::Response;
pub use status::StatusCode;
