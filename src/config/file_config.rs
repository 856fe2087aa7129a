//! Configuration file support for research-graph.
//!
//! # Configuration File Format
//!
//! ```toml
//! [llm]
//! provider = "vertex"            # or "openai"
//! model = "gemini-2.0-flash"
//! google_application_credentials = "/path/to/service_account.json"
//! google_cloud_project = "my-gcp-project"
//!
//! [search]
//! max_results = 3
//! load_full_text = true
//! max_concurrency = 4
//! fetch_timeout_secs = 60
//!
//! [mcp]
//! transport = "sse"
//! host = "localhost"
//! port = 5000
//!
//! [web]
//! port = 8000
//!
//! [logging]
//! level = "info"
//! ```

use std::path::Path;

use super::Settings;

/// Configuration file errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Refusing to overwrite existing file: {0}")]
    AlreadyExists(String),
}

/// Write the default settings to `path` as TOML.
///
/// Credentials picked up from the environment are left out of the file.
pub fn write_default_config(path: &Path, overwrite: bool) -> Result<(), ConfigFileError> {
    if path.exists() && !overwrite {
        return Err(ConfigFileError::AlreadyExists(path.display().to_string()));
    }

    let mut settings = Settings::default();
    settings.llm.openai_api_key = None;
    settings.llm.google_application_credentials = None;
    settings.llm.google_cloud_project = None;

    let content = toml::to_string_pretty(&settings)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{load_settings, Transport};
    use tempfile::tempdir;

    #[test]
    fn test_write_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        write_default_config(&path, false).unwrap();
        let settings = load_settings(Some(&path)).unwrap();

        assert_eq!(settings.search.max_results, 3);
        assert_eq!(settings.mcp.transport, Transport::Sse);
    }

    #[test]
    fn test_refuses_overwrite() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "# existing").unwrap();

        let result = write_default_config(&path, false);
        assert!(matches!(result, Err(ConfigFileError::AlreadyExists(_))));

        write_default_config(&path, true).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("[search]"));
    }
}
