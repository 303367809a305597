use crate::domain::ports::ConfigProvider;
use crate::utils::error::{Result, SummaryError};
use crate::utils::validation::{
    resolve_encoding, validate_file_name, validate_non_empty_string, validate_path,
    validate_url_or_relative, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

pub const DEFAULT_ENCODING: &str = "Shift_JIS";
pub const DEFAULT_OUTPUT_PATH: &str = "./output";
pub const DEFAULT_OUTPUT_FILE: &str = "summary.html";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryConfig {
    pub source: SourceConfig,
    #[serde(default)]
    pub output: OutputConfig,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// 帳戶摘要頁的網址，或已儲存的 HTML 檔案
    pub page: String,
    pub orders_url: String,
    pub cookie: Option<String>,
    #[serde(default = "default_encoding")]
    pub encoding: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_path")]
    pub path: String,
    #[serde(default = "default_output_file")]
    pub filename: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
            filename: default_output_file(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub verbose: Option<bool>,
    pub json: Option<bool>,
}

fn default_encoding() -> String {
    DEFAULT_ENCODING.to_string()
}

fn default_output_path() -> String {
    DEFAULT_OUTPUT_PATH.to_string()
}

fn default_output_file() -> String {
    DEFAULT_OUTPUT_FILE.to_string()
}

impl SummaryConfig {
    pub fn new(page: String, orders_url: String) -> Self {
        Self {
            source: SourceConfig {
                page,
                orders_url,
                cookie: None,
                encoding: default_encoding(),
            },
            output: OutputConfig::default(),
            logging: None,
        }
    }

    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(SummaryError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| SummaryError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${BROKER_COOKIE})
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        use std::sync::LazyLock;

        static ENV_VAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").unwrap());

        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    /// Orders URL made absolute against the page URL when it is relative.
    pub fn resolved_orders_url(&self) -> String {
        let orders = self.source.orders_url.trim();
        if Url::parse(orders).is_ok() {
            return orders.to_string();
        }
        match Url::parse(self.source.page.trim()).and_then(|page| page.join(orders)) {
            Ok(joined) => joined.to_string(),
            Err(_) => orders.to_string(),
        }
    }

    pub fn verbose(&self) -> bool {
        self.logging
            .as_ref()
            .and_then(|l| l.verbose)
            .unwrap_or(false)
    }

    pub fn json_logs(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("source.page", &self.source.page)?;
        validate_url_or_relative(
            "source.orders_url",
            self.source.orders_url.trim(),
            Some(self.source.page.trim()),
        )?;
        resolve_encoding(&self.source.encoding)?;
        validate_path("output.path", &self.output.path)?;
        validate_file_name("output.filename", &self.output.filename)?;
        Ok(())
    }
}

impl ConfigProvider for SummaryConfig {
    fn page_location(&self) -> &str {
        self.source.page.trim()
    }

    fn orders_url(&self) -> String {
        self.resolved_orders_url()
    }

    fn encoding_label(&self) -> &str {
        &self.source.encoding
    }

    fn output_path(&self) -> &str {
        &self.output.path
    }

    fn output_file(&self) -> &str {
        &self.output.filename
    }
}

impl Validate for SummaryConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_basic_toml_config() {
        let toml_content = r#"
[source]
page = "https://broker.example/account/summary"
orders_url = "/fund/orders"

[output]
path = "./test-output"
"#;

        let config = SummaryConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.source.encoding, DEFAULT_ENCODING);
        assert_eq!(config.output.path, "./test-output");
        assert_eq!(config.output.filename, DEFAULT_OUTPUT_FILE);
        assert_eq!(
            config.resolved_orders_url(),
            "https://broker.example/fund/orders"
        );
        assert!(config.validate().is_ok());
        assert!(!config.verbose());
    }

    #[test]
    fn test_output_section_is_optional() {
        let toml_content = r#"
[source]
page = "./saved/summary.html"
orders_url = "https://broker.example/fund/orders"
encoding = "EUC-JP"

[logging]
verbose = true
"#;
        let config = SummaryConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.output.path, DEFAULT_OUTPUT_PATH);
        assert_eq!(config.orders_url(), "https://broker.example/fund/orders");
        assert!(config.verbose());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("FUND_SUMMARY_TEST_COOKIE", "session=xyz");

        let toml_content = r#"
[source]
page = "https://broker.example/account/summary"
orders_url = "https://broker.example/fund/orders"
cookie = "${FUND_SUMMARY_TEST_COOKIE}"
"#;

        let config = SummaryConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.source.cookie.as_deref(), Some("session=xyz"));

        std::env::remove_var("FUND_SUMMARY_TEST_COOKIE");
    }

    #[test]
    fn test_config_validation() {
        // 本機檔案無法作為相對網址的基準
        let relative = SummaryConfig::new("./summary.html".to_string(), "/fund/orders".to_string());
        assert!(relative.validate().is_err());

        let mut bad_encoding = SummaryConfig::new(
            "https://broker.example/".to_string(),
            "/fund/orders".to_string(),
        );
        bad_encoding.source.encoding = "not-an-encoding".to_string();
        assert!(matches!(
            bad_encoding.validate(),
            Err(SummaryError::UnknownEncodingError { .. })
        ));
    }

    #[test]
    fn test_missing_source_is_a_parse_error() {
        let result = SummaryConfig::from_toml_str("[output]\npath = \"./out\"\n");
        assert!(matches!(result, Err(SummaryError::ConfigError { .. })));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[source]
page = "https://broker.example/account/summary"
orders_url = "orders.html"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = SummaryConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(
            config.resolved_orders_url(),
            "https://broker.example/account/orders.html"
        );
    }
}
