//! Secret lookup: Docker-style secret files first, environment second.

use std::path::{Path, PathBuf};

const SECRETS_DIR: &str = "/run/secrets";

pub fn get_secret(key: &str) -> Option<String> {
    get_secret_from(Path::new(SECRETS_DIR), key)
}

pub(crate) fn get_secret_from(dir: &Path, key: &str) -> Option<String> {
    let path: PathBuf = dir.join(key);

    if path.is_file() {
        match std::fs::read_to_string(&path) {
            Ok(content) => return non_empty(content.trim()),
            Err(e) => {
                tracing::warn!(secret = key, error = %e, "could not read secret file");
            }
        }
    }

    std::env::var(key).ok().and_then(|v| non_empty(v.trim()))
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secret_file_wins_and_is_trimmed() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("FOLIO_TEST_FILE_SECRET"), "s3cret\n").expect("write");
        assert_eq!(
            get_secret_from(dir.path(), "FOLIO_TEST_FILE_SECRET").as_deref(),
            Some("s3cret")
        );
    }

    #[test]
    fn missing_secret_is_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(get_secret_from(dir.path(), "FOLIO_TEST_SECRET_THAT_DOES_NOT_EXIST").is_none());
    }

    #[test]
    fn blank_secret_file_is_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("FOLIO_TEST_BLANK_SECRET"), "  \n").expect("write");
        assert!(get_secret_from(dir.path(), "FOLIO_TEST_BLANK_SECRET").is_none());
    }
}
