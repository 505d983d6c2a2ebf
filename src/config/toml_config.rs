use crate::utils::error::{Result, ToolError};
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_number, validate_range, validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

pub const DEFAULT_EXPLAIN_URL: &str = "http://explainshell.com/explain";
pub const DEFAULT_BUFFER_SIZE: usize = 4096;
pub const DEFAULT_DELAY_MS: u64 = 1000;
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

static ENV_VAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var pattern"));

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub explain: ExplainSettings,
    pub bookmarks: BookmarkSettings,
    pub pty: PtySettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplainSettings {
    pub base_url: String,
}

impl Default for ExplainSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_EXPLAIN_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BookmarkSettings {
    pub delay_ms: u64,
    pub timeout_seconds: u64,
    pub user_agent: String,
}

impl Default for BookmarkSettings {
    fn default() -> Self {
        Self {
            delay_ms: DEFAULT_DELAY_MS,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PtySettings {
    pub buffer_size: usize,
    pub ignore_interrupt: bool,
}

impl Default for PtySettings {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
            ignore_interrupt: true,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub verbose: bool,
}

impl Settings {
    /// Load settings from `path`, or fall back to defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let settings = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        settings.validate()?;
        Ok(settings)
    }

    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ToolError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| ToolError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${API_KEY})
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_RE
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validate_url("explain.base_url", &self.explain.base_url)?;
        validate_range("bookmarks.delay_ms", self.bookmarks.delay_ms, 0, 60_000)?;
        validate_range("bookmarks.timeout_seconds", self.bookmarks.timeout_seconds, 1, 300)?;
        validate_non_empty_string("bookmarks.user_agent", &self.bookmarks.user_agent)?;
        validate_positive_number("pty.buffer_size", self.pty.buffer_size, 1)?;
        Ok(())
    }
}
