//! Static asset serving with a directory-traversal guard
//!
//! Serves the browser client (entry page, JS, CSS) from one designated
//! directory. Invariant: the resolved path must remain a descendant of the
//! static root for every request, regardless of how many `..` segments or
//! encoded separators the requested name carries. Violations are 403,
//! safe misses are 404, both logged.

use crate::relay::RelayState;
use crate::types::{IngressError, IngressResult};
use axum::{
    extract::{Path as UrlPath, State},
    http::header,
    response::{IntoResponse, Response},
};
use std::path::{Path, PathBuf};
use tracing::warn;

/// File types served from the static root.
const ALLOWED_EXTENSIONS: &[&str] = &["js", "css"];

/// Resolve a requested filename against the static root.
///
/// Purely lexical: `.` segments and empty segments are dropped, any `..`
/// segment is rejected outright, and both separator styles are treated as
/// separators so an encoded `..\` cannot sneak past. The result is always
/// a descendant of `root`.
pub fn resolve_static_path(root: &Path, requested: &str) -> IngressResult<PathBuf> {
    let mut resolved = root.to_path_buf();

    for segment in requested.split(['/', '\\']) {
        match segment {
            "" | "." => continue,
            ".." => return Err(IngressError::Forbidden),
            name => resolved.push(name),
        }
    }

    Ok(resolved)
}

fn content_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("js") => "text/javascript",
        Some("css") => "text/css",
        Some("html") => "text/html; charset=utf-8",
        _ => "application/octet-stream",
    }
}

async fn serve_file(path: PathBuf) -> IngressResult<Response> {
    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(_) => {
            warn!(path = %path.display(), "static file not found");
            return Err(IngressError::NotFound);
        }
    };

    Ok((
        [(header::CONTENT_TYPE, content_type_for(&path))],
        bytes,
    )
        .into_response())
}

/// GET /: the static entry page.
pub async fn index(State(state): State<RelayState>) -> IngressResult<Response> {
    serve_file(state.static_dir.join("index.html")).await
}

/// GET /{name}.js and /{name}.css: guarded asset serving.
pub async fn asset(
    State(state): State<RelayState>,
    UrlPath(filename): UrlPath<String>,
) -> IngressResult<Response> {
    let allowed = ALLOWED_EXTENSIONS
        .iter()
        .any(|ext| filename.ends_with(&format!(".{}", ext)));
    if !allowed {
        return Err(IngressError::NotFound);
    }

    let path = resolve_static_path(&state.static_dir, &filename).map_err(|e| {
        warn!(filename = %filename, "directory traversal attempt on static file");
        e
    })?;

    serve_file(path).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_filename_resolves_under_root() {
        let root = Path::new("/srv/static");
        let path = resolve_static_path(root, "app.js").unwrap();
        assert_eq!(path, Path::new("/srv/static/app.js"));
    }

    #[test]
    fn test_nested_filename_stays_under_root() {
        let root = Path::new("/srv/static");
        let path = resolve_static_path(root, "vendor/lib.js").unwrap();
        assert_eq!(path, Path::new("/srv/static/vendor/lib.js"));
    }

    #[test]
    fn test_parent_segments_are_rejected() {
        let root = Path::new("/srv/static");
        for requested in [
            "../secrets.js",
            "../../etc/passwd.css",
            "a/../../escape.js",
            "..\\windows\\style.css",
            "vendor/..",
        ] {
            assert!(
                resolve_static_path(root, requested).is_err(),
                "{} must be rejected",
                requested
            );
        }
    }

    #[test]
    fn test_dot_and_empty_segments_are_dropped() {
        let root = Path::new("/srv/static");
        let path = resolve_static_path(root, "./a//b.css").unwrap();
        assert_eq!(path, Path::new("/srv/static/a/b.css"));
    }

    #[test]
    fn test_content_types() {
        assert_eq!(content_type_for(Path::new("a.js")), "text/javascript");
        assert_eq!(content_type_for(Path::new("a.css")), "text/css");
        assert_eq!(
            content_type_for(Path::new("index.html")),
            "text/html; charset=utf-8"
        );
    }
}
