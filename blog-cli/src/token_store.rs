use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use blog_core::TokenStore;
use blog_core::session::parse_token;

/// Токен в файле рядом с рабочим каталогом.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl TokenStore for FileTokenStore {
    type Error = io::Error;

    fn load(&self) -> io::Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let raw = fs::read_to_string(&self.path)?;
        Ok(parse_token(&raw))
    }

    fn save(&self, token: &str) -> io::Result<()> {
        fs::write(&self.path, token)
    }

    fn clear(&self) -> io::Result<()> {
        match fs::remove_file(&self.path) {
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }
}
