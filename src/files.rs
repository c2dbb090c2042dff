use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::GatewayError;

pub struct StaticFiles {
    doc_root: PathBuf,
    index: String,
}

impl StaticFiles {
    pub fn new<P: Into<PathBuf>>(doc_root: P, index: &str) -> Self {
        Self {
            doc_root: doc_root.into(),
            index: index.to_string(),
        }
    }

    // Lookup order follows the gateway's document conventions: the process
    // working directory first, then the configured document root.
    pub fn resolve(&self, request_path: &str) -> Result<(Vec<u8>, &'static str), GatewayError> {
        let request_path = if request_path.is_empty() {
            self.index.as_str()
        } else {
            request_path
        };

        let mut real = PathBuf::from(request_path);
        if !real.exists() {
            real = self.doc_root.join(request_path);
        }
        if !real.exists() {
            return Err(GatewayError::PathNotFound);
        }

        let mut real = real.canonicalize().map_err(|_| GatewayError::PathNotFound)?;

        // Never serve gateway source, wherever it resolved to.
        if real.extension().and_then(|e| e.to_str()) == Some("rs") {
            return Err(GatewayError::Forbidden);
        }

        if !self.inside_allowed_roots(&real) {
            return Err(GatewayError::Forbidden);
        }

        if real.is_dir() {
            real.push(&self.index);
            if !real.exists() {
                return Err(GatewayError::Forbidden);
            }
        }

        let bytes = fs::read(&real).map_err(|_| GatewayError::PathNotFound)?;
        Ok((bytes, content_type(&real)))
    }

    fn inside_allowed_roots(&self, real: &Path) -> bool {
        let in_doc_root = self
            .doc_root
            .canonicalize()
            .map(|root| real.starts_with(root))
            .unwrap_or(false);
        let in_cwd = env::current_dir()
            .and_then(|d| d.canonicalize())
            .map(|cwd| real.starts_with(cwd))
            .unwrap_or(false);

        in_doc_root || in_cwd
    }
}

fn content_type(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_lowercase()
        .as_str()
    {
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "js" => "application/javascript",
        "json" => "application/json",
        "txt" => "text/plain",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;

    fn write_file(dir: &Path, name: &str, contents: &str) {
        let mut f = File::create(dir.join(name)).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
    }

    #[test]
    fn serves_from_doc_root_with_content_type() {
        let root = tempfile::tempdir().unwrap();
        write_file(root.path(), "app.css", "body {}");

        let files = StaticFiles::new(root.path(), "index.html");
        let (bytes, ct) = files.resolve("app.css").unwrap();
        assert_eq!(bytes, b"body {}");
        assert_eq!(ct, "text/css");
    }

    #[test]
    fn missing_file_is_not_found() {
        let root = tempfile::tempdir().unwrap();
        let files = StaticFiles::new(root.path(), "index.html");
        assert!(matches!(
            files.resolve("nope.html"),
            Err(GatewayError::PathNotFound)
        ));
    }

    #[test]
    fn empty_path_serves_the_index() {
        let root = tempfile::tempdir().unwrap();
        write_file(root.path(), "index.html", "<html></html>");

        let files = StaticFiles::new(root.path(), "index.html");
        let (bytes, ct) = files.resolve("").unwrap();
        assert_eq!(bytes, b"<html></html>");
        assert_eq!(ct, "text/html");
    }

    #[test]
    fn refuses_gateway_source() {
        let root = tempfile::tempdir().unwrap();
        write_file(root.path(), "main.rs", "fn main() {}");

        let files = StaticFiles::new(root.path(), "index.html");
        assert!(matches!(
            files.resolve("main.rs"),
            Err(GatewayError::Forbidden)
        ));
    }

    #[test]
    fn refuses_escape_from_allowed_roots() {
        let outer = tempfile::tempdir().unwrap();
        let doc_root = outer.path().join("htdocs");
        fs::create_dir(&doc_root).unwrap();
        write_file(outer.path(), "secret.txt", "hidden");

        let files = StaticFiles::new(&doc_root, "index.html");
        assert!(matches!(
            files.resolve("../secret.txt"),
            Err(GatewayError::Forbidden)
        ));
    }

    #[test]
    fn directory_resolves_to_its_index() {
        let root = tempfile::tempdir().unwrap();
        let sub = root.path().join("app");
        fs::create_dir(&sub).unwrap();
        write_file(&sub, "index.html", "app index");
        let bare = root.path().join("bare");
        fs::create_dir(&bare).unwrap();

        let files = StaticFiles::new(root.path(), "index.html");
        let (bytes, _) = files.resolve("app").unwrap();
        assert_eq!(bytes, b"app index");
        assert!(matches!(files.resolve("bare"), Err(GatewayError::Forbidden)));
    }
}
