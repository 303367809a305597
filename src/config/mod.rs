pub mod toml_config;

pub use toml_config::SummaryConfig;

#[cfg(feature = "cli")]
use crate::utils::error::{Result, SummaryError};
#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "fund-order-summary")]
#[command(about = "Adds a pending fund order summary to a saved brokerage account page")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Account summary page: URL or local HTML file
    #[arg(long)]
    pub page: Option<String>,

    /// Pending fund orders page; relative URLs resolve against --page
    #[arg(long)]
    pub orders_url: Option<String>,

    /// Cookie header forwarded with every request
    #[arg(long)]
    pub cookie: Option<String>,

    /// Encoding of the fetched pages
    #[arg(long)]
    pub encoding: Option<String>,

    #[arg(long)]
    pub output_path: Option<String>,

    #[arg(long)]
    pub output_file: Option<String>,

    /// Only locate the page regions, do not fetch orders or write output
    #[arg(long)]
    pub dry_run: bool,

    /// Print the extracted orders and total as JSON
    #[arg(long)]
    pub report: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 合併設定檔與命令列參數，命令列優先
    pub fn resolve(&self) -> Result<SummaryConfig> {
        let mut config = match &self.config {
            Some(path) => SummaryConfig::from_file(path)?,
            None => {
                let page = self.page.clone().ok_or_else(|| SummaryError::MissingConfigError {
                    field: "source.page (--page)".to_string(),
                })?;
                let orders_url =
                    self.orders_url
                        .clone()
                        .ok_or_else(|| SummaryError::MissingConfigError {
                            field: "source.orders_url (--orders-url)".to_string(),
                        })?;
                SummaryConfig::new(page, orders_url)
            }
        };

        if let Some(page) = &self.page {
            config.source.page = page.clone();
        }
        if let Some(orders_url) = &self.orders_url {
            config.source.orders_url = orders_url.clone();
        }
        if let Some(cookie) = &self.cookie {
            config.source.cookie = Some(cookie.clone());
        }
        if let Some(encoding) = &self.encoding {
            config.source.encoding = encoding.clone();
        }
        if let Some(path) = &self.output_path {
            config.output.path = path.clone();
        }
        if let Some(file) = &self.output_file {
            config.output.filename = file.clone();
        }

        Ok(config)
    }

    pub fn verbose(&self, config: Option<&SummaryConfig>) -> bool {
        self.verbose || config.map(SummaryConfig::verbose).unwrap_or(false)
    }

    pub fn json_logs(&self, config: Option<&SummaryConfig>) -> bool {
        self.json_logs || config.map(SummaryConfig::json_logs).unwrap_or(false)
    }
}
