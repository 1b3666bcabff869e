//! Tabla de tipos MIME por extensión.

use std::path::Path;

/// Tipo por defecto para extensiones desconocidas
pub const DEFAULT_MIME: &str = "application/octet-stream";

const MIME_TABLE: &[(&str, &str)] = &[
    ("html", "text/html; charset=utf-8"),
    ("htm", "text/html; charset=utf-8"),
    ("css", "text/css; charset=utf-8"),
    ("js", "application/javascript"),
    ("json", "application/json"),
    ("txt", "text/plain; charset=utf-8"),
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("svg", "image/svg+xml"),
    ("ico", "image/x-icon"),
    ("pdf", "application/pdf"),
];

/// Retorna el tipo MIME según la extensión de `path`
///
/// # Ejemplo
/// ```
/// use pool_server::http::mime::mime_type;
/// use std::path::Path;
///
/// assert_eq!(mime_type(Path::new("www/logo.PNG")), "image/png");
/// assert_eq!(mime_type(Path::new("www/data.bin")), "application/octet-stream");
/// ```
pub fn mime_type(path: &Path) -> &'static str {
    let ext = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => ext,
        None => return DEFAULT_MIME,
    };

    MIME_TABLE
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(ext))
        .map(|(_, mime)| *mime)
        .unwrap_or(DEFAULT_MIME)
}
