//! Configuration management.
//!
//! Settings are layered: built-in defaults (seeded from the usual provider
//! environment variables such as `OPENAI_API_KEY`), an optional TOML file, and
//! `RESEARCH_GRAPH__<SECTION>__<KEY>` environment variables.

mod file_config;

pub use file_config::{write_default_config, ConfigFileError};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the config file looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "research-graph.toml";

/// Prefix for environment overrides
pub const ENV_PREFIX: &str = "RESEARCH_GRAPH";

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// LLM provider settings
    #[serde(default)]
    pub llm: LlmSettings,

    /// Paper search settings
    #[serde(default)]
    pub search: SearchSettings,

    /// Shared HTTP client settings
    #[serde(default)]
    pub http: HttpSettings,

    /// JSONPlaceholder MCP server settings
    #[serde(default)]
    pub mcp: McpSettings,

    /// Web endpoint settings
    #[serde(default)]
    pub web: WebSettings,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Which hosted model API to call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    Vertex,
    OpenAi,
}

/// LLM provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    #[serde(default = "default_provider")]
    pub provider: LlmProvider,

    /// Model name (e.g. "gemini-2.0-flash", "gpt-4o-mini")
    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default)]
    pub max_output_tokens: Option<u32>,

    /// OpenAI API key
    #[serde(default)]
    pub openai_api_key: Option<String>,

    #[serde(default = "default_openai_base_url")]
    pub openai_base_url: String,

    /// Path to the Google Cloud service account key file
    #[serde(default)]
    pub google_application_credentials: Option<PathBuf>,

    /// Google Cloud project ID
    #[serde(default)]
    pub google_cloud_project: Option<String>,

    #[serde(default = "default_location")]
    pub google_cloud_location: String,

    /// Override for the Vertex AI endpoint (defaults to the regional endpoint)
    #[serde(default)]
    pub vertex_endpoint: Option<String>,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            temperature: default_temperature(),
            max_output_tokens: None,
            openai_api_key: env_non_empty("OPENAI_API_KEY"),
            openai_base_url: default_openai_base_url(),
            google_application_credentials: env_non_empty("GOOGLE_APPLICATION_CREDENTIALS")
                .map(PathBuf::from),
            google_cloud_project: env_non_empty("GOOGLE_CLOUD_PROJECT"),
            google_cloud_location: default_location(),
            vertex_endpoint: None,
        }
    }
}

fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn default_provider() -> LlmProvider {
    LlmProvider::Vertex
}

fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_temperature() -> f32 {
    0.0
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_location() -> String {
    "us-central1".to_string()
}

/// Paper search settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchSettings {
    #[serde(default = "default_arxiv_api_url")]
    pub arxiv_api_url: String,

    #[serde(default = "default_arxiv_pdf_url")]
    pub arxiv_pdf_url: String,

    /// Number of papers the workflow asks for
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Download PDFs and extract text; otherwise documents carry the abstract
    #[serde(default = "default_true")]
    pub load_full_text: bool,

    /// Maximum characters kept per document
    #[serde(default = "default_max_content_chars")]
    pub max_content_chars: usize,

    /// Maximum concurrent document fetches
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Per-document fetch timeout
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            arxiv_api_url: default_arxiv_api_url(),
            arxiv_pdf_url: default_arxiv_pdf_url(),
            max_results: default_max_results(),
            load_full_text: true,
            max_content_chars: default_max_content_chars(),
            max_concurrency: default_max_concurrency(),
            fetch_timeout_secs: default_fetch_timeout(),
        }
    }
}

fn default_arxiv_api_url() -> String {
    "https://export.arxiv.org/api/query".to_string()
}

fn default_arxiv_pdf_url() -> String {
    "https://arxiv.org/pdf".to_string()
}

fn default_max_results() -> usize {
    3
}

fn default_true() -> bool {
    true
}

fn default_max_content_chars() -> usize {
    4000
}

fn default_max_concurrency() -> usize {
    4
}

fn default_fetch_timeout() -> u64 {
    60
}

/// Shared HTTP client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpSettings {
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
            user_agent: None,
        }
    }
}

fn default_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

/// Transport used by the MCP servers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    /// Standard input/output
    Stdio,
    /// Streamable HTTP
    Http,
    /// Server-Sent Events (served through the streamable HTTP transport)
    Sse,
}

/// MCP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpSettings {
    #[serde(default = "default_mcp_name")]
    pub name: String,

    #[serde(default = "default_mcp_version")]
    pub version: String,

    #[serde(default = "default_transport")]
    pub transport: Transport,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_mcp_port")]
    pub port: u16,

    /// Base URL of the JSONPlaceholder API
    #[serde(default = "default_placeholder_url")]
    pub base_url: String,
}

impl Default for McpSettings {
    fn default() -> Self {
        Self {
            name: default_mcp_name(),
            version: default_mcp_version(),
            transport: default_transport(),
            host: default_host(),
            port: default_mcp_port(),
            base_url: default_placeholder_url(),
        }
    }
}

fn default_mcp_name() -> String {
    "jsonplaceholder mcp".to_string()
}

fn default_mcp_version() -> String {
    "0.1.0".to_string()
}

fn default_transport() -> Transport {
    Transport::Sse
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_mcp_port() -> u16 {
    5000
}

fn default_placeholder_url() -> String {
    "https://jsonplaceholder.typicode.com".to_string()
}

/// Web endpoint settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_web_port")]
    pub port: u16,
}

impl Default for WebSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_web_port(),
        }
    }
}

fn default_web_port() -> u16 {
    8000
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// "json" for structured output, anything else for the compact text format
    #[serde(default)]
    pub format: Option<String>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Errors raised while loading settings or validating credentials
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load settings: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Missing required setting: {0}")]
    Missing(&'static str),

    #[error("Failed to read credentials file {path}: {source}")]
    Credentials {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("Invalid setting: {0}")]
    Invalid(String),
}

/// Load settings from defaults, an optional file and environment overrides
pub fn load_settings(path: Option<&Path>) -> Result<Settings, ConfigError> {
    let mut builder =
        config::Config::builder().add_source(config::Config::try_from(&Settings::default())?);

    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path).required(true));
    }

    let settings = builder
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}

/// Look for a config file in the working directory, then the user config directory
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.is_file() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join("research-graph").join("config.toml"))
        .filter(|path| path.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.search.max_results, 3);
        assert_eq!(settings.search.max_content_chars, 4000);
        assert_eq!(settings.mcp.transport, Transport::Sse);
        assert_eq!(settings.mcp.port, 5000);
        assert_eq!(settings.web.port, 8000);
        assert_eq!(settings.llm.provider, LlmProvider::Vertex);
    }

    #[test]
    fn test_load_settings_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(
            br#"
[llm]
provider = "openai"
model = "gpt-4o-mini"

[search]
max_results = 7
load_full_text = false

[mcp]
transport = "stdio"
port = 6001
"#,
        )
        .unwrap();

        let settings = load_settings(Some(&path)).unwrap();
        assert_eq!(settings.llm.provider, LlmProvider::OpenAi);
        assert_eq!(settings.llm.model, "gpt-4o-mini");
        assert_eq!(settings.search.max_results, 7);
        assert!(!settings.search.load_full_text);
        assert_eq!(settings.mcp.transport, Transport::Stdio);
        assert_eq!(settings.mcp.port, 6001);
        // untouched sections keep their defaults
        assert_eq!(settings.web.port, 8000);
        assert_eq!(settings.search.arxiv_api_url, default_arxiv_api_url());
    }

    #[test]
    fn test_env_overrides_file_and_defaults() {
        // keys no other test in this binary reads back
        let vars = [
            ("RESEARCH_GRAPH__MCP__HOST", "env-host"),
            ("RESEARCH_GRAPH__HTTP__TIMEOUT_SECS", "42"),
            ("RESEARCH_GRAPH__LLM__GOOGLE_CLOUD_PROJECT", "12345"),
        ];
        for (key, value) in vars {
            std::env::set_var(key, value);
        }

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(
            &path,
            r#"
[mcp]
host = "file-host"
port = 6002

[http]
timeout_secs = 5
"#,
        )
        .unwrap();

        let settings = load_settings(Some(&path));
        for (key, _) in vars {
            std::env::remove_var(key);
        }
        let settings = settings.unwrap();

        assert_eq!(settings.mcp.host, "env-host");
        assert_eq!(settings.mcp.port, 6002);
        assert_eq!(settings.http.timeout_secs, 42);
        assert_eq!(settings.llm.google_cloud_project.as_deref(), Some("12345"));
    }

    #[test]
    fn test_load_settings_missing_file() {
        let result = load_settings(Some(Path::new("/nonexistent/research-graph.toml")));
        assert!(matches!(result, Err(ConfigError::Load(_))));
    }

    #[test]
    fn test_load_settings_without_file() {
        let settings = load_settings(None).unwrap();
        assert_eq!(settings.mcp.name, "jsonplaceholder mcp");
    }
}
