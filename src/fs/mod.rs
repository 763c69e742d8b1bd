//! Filesystem adapter (§6): `read_all`, `write_all`, `remove_file`.
//!
//! Files are handled as a sequence of text lines, matching the original
//! `FileAccesser`'s `ReadAll`/`WriteAll` line-splitting convention.

use std::fs;
use std::io::Write;
use std::os::unix::fs::PermissionsExt;

use crate::error::OstrichError;

pub trait FsProvider: Send + Sync {
    fn read_all(&self, path: &str) -> Result<Vec<String>, OstrichError>;
    fn write_all(&self, path: &str, contents: &[String]) -> Result<(), OstrichError>;
    fn remove_file(&self, path: &str) -> Result<(), OstrichError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RealFs;

impl FsProvider for RealFs {
    fn read_all(&self, path: &str) -> Result<Vec<String>, OstrichError> {
        let content = fs::read_to_string(path).map_err(|e| OstrichError::FilesystemError {
            path: path.to_string(),
            underlying: e.to_string(),
        })?;
        Ok(content.split('\n').map(|s| s.to_string()).collect())
    }

    fn write_all(&self, path: &str, contents: &[String]) -> Result<(), OstrichError> {
        let mut file = fs::File::create(path).map_err(|e| OstrichError::FilesystemError {
            path: path.to_string(),
            underlying: e.to_string(),
        })?;
        for line in contents {
            writeln!(file, "{line}").map_err(|e| OstrichError::FilesystemError {
                path: path.to_string(),
                underlying: e.to_string(),
            })?;
        }
        file.set_permissions(fs::Permissions::from_mode(0o644))
            .map_err(|e| OstrichError::FilesystemError {
                path: path.to_string(),
                underlying: e.to_string(),
            })?;
        Ok(())
    }

    fn remove_file(&self, path: &str) -> Result<(), OstrichError> {
        fs::remove_file(path).map_err(|e| OstrichError::FilesystemError {
            path: path.to_string(),
            underlying: e.to_string(),
        })
    }
}
