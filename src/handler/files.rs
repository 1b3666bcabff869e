//! # Resolución de Archivos Estáticos
//! src/handler/files.rs
//!
//! Traduce el path de la request a un archivo bajo el document root y lo lee.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Archivo servido cuando se pide `/`
pub const INDEX_FILE: &str = "index.html";

/// Errores al cargar un archivo
#[derive(Debug, thiserror::Error)]
pub enum FileError {
    /// No existe, es un directorio o el path intenta salir del root → 404
    #[error("file not found")]
    NotFound,

    /// Falló stat o la lectura → 500
    #[error("failed to read file: {0}")]
    Io(#[from] io::Error),
}

/// Convierte el path de la URL en una ruta bajo `root`.
///
/// `/` se sirve como `/index.html`. Retorna `None` si algún segmento es
/// `..` o contiene bytes que no pueden formar parte de un nombre de archivo.
///
/// # Ejemplo
/// ```
/// use pool_server::handler::files::resolve;
/// use std::path::Path;
///
/// assert_eq!(resolve(Path::new("www"), "/"), Some(Path::new("www/index.html").to_path_buf()));
/// assert_eq!(resolve(Path::new("www"), "/../etc/passwd"), None);
/// ```
pub fn resolve(root: &Path, url_path: &str) -> Option<PathBuf> {
    let url_path = if url_path == "/" {
        "/index.html"
    } else {
        url_path
    };

    // Decodificación básica, igual que en los query params: solo espacios
    let decoded = url_path.replace("%20", " ");

    let mut resolved = root.to_path_buf();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => continue,
            ".." => return None,
            s if s.contains('\\') || s.contains('\0') => return None,
            s => resolved.push(s),
        }
    }

    if resolved == root {
        resolved.push(INDEX_FILE);
    }

    Some(resolved)
}

/// Lee el archivo completo.
///
/// Un directorio se trata como inexistente (no hay listado de directorios).
pub fn load(path: &Path) -> Result<Vec<u8>, FileError> {
    let metadata = fs::metadata(path).map_err(not_found_or_io)?;
    if !metadata.is_file() {
        return Err(FileError::NotFound);
    }

    fs::read(path).map_err(not_found_or_io)
}

/// `NotADirectory` (p.ej. `/index.html/x`) también es un archivo que no
/// existe para el cliente → 404. El resto de fallas de stat/lectura → 500.
fn not_found_or_io(err: io::Error) -> FileError {
    match err.kind() {
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory => FileError::NotFound,
        _ => FileError::Io(err),
    }
}
