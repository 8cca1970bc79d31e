//! `cd-content://` resource protocol
//!
//! Serves the bundled game files from the content root with the isolation
//! headers the game runtime needs for shared memory.

use std::path::{Component, Path, PathBuf};

use super::CONTENT_TARGET;

pub const SCHEME_PREFIX: &str = "cd-content://localhost/";

#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("unsupported locator {0}")]
    UnknownScheme(String),
    #[error("path escapes the content root: {0}")]
    Forbidden(String),
}

#[derive(Clone, Debug)]
pub struct ContentResponse {
    pub status: u16,
    pub headers: Vec<(&'static str, String)>,
    pub body: Vec<u8>,
}

impl ContentResponse {
    fn not_found() -> Self {
        Self {
            status: 404,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

pub fn mime_type(path: &str) -> &'static str {
    let extension = Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("wasm") => "application/wasm",
        Some("js") => "application/javascript",
        Some("html") => "text/html",
        Some("css") => "text/css",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("svg") => "image/svg+xml",
        Some("mp3") => "audio/mpeg",
        _ => "application/octet-stream",
    }
}

#[derive(Clone, Debug)]
pub struct ContentProtocol {
    root: PathBuf,
}

impl ContentProtocol {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Locator of a file under the content root
    pub fn locator(relative: &str) -> String {
        format!("{}{}", SCHEME_PREFIX, relative.trim_start_matches('/'))
    }

    /// Map a locator to a file below the root
    pub fn resolve(&self, uri: &str) -> Result<PathBuf, ContentError> {
        let relative = uri
            .strip_prefix(SCHEME_PREFIX)
            .ok_or_else(|| ContentError::UnknownScheme(uri.to_string()))?;
        let relative = relative
            .split(['?', '#'])
            .next()
            .unwrap_or_default();

        let relative_path = Path::new(relative);
        let escapes = relative_path
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if relative.is_empty() || escapes {
            return Err(ContentError::Forbidden(relative.to_string()));
        }
        Ok(self.root.join(relative_path))
    }

    pub async fn respond(&self, uri: &str) -> ContentResponse {
        let path = match self.resolve(uri) {
            Ok(path) => path,
            Err(e) => {
                tracing::error!(target: CONTENT_TARGET, error = %e, "Rejected content request");
                return ContentResponse::not_found();
            }
        };

        match tokio::fs::read(&path).await {
            Ok(body) => {
                let mime = mime_type(&path.to_string_lossy());
                tracing::debug!(path = %path.display(), mime, bytes = body.len(), "Serving content");
                ContentResponse {
                    status: 200,
                    headers: vec![
                        ("Content-Type", mime.to_string()),
                        ("Access-Control-Allow-Origin", "*".to_string()),
                        ("Cross-Origin-Opener-Policy", "same-origin".to_string()),
                        ("Cross-Origin-Embedder-Policy", "require-corp".to_string()),
                        ("Cross-Origin-Resource-Policy", "cross-origin".to_string()),
                    ],
                    body,
                }
            }
            Err(e) => {
                tracing::error!(
                    target: CONTENT_TARGET,
                    "Failed to read resource {}: {}",
                    path.display(),
                    e
                );
                ContentResponse::not_found()
            }
        }
    }
}
