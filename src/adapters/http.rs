use crate::domain::ports::DocumentSource;
use crate::utils::error::{Result, SummaryError};
use async_trait::async_trait;
use reqwest::header::{HeaderValue, COOKIE, USER_AGENT};
use reqwest::Client;
use url::Url;

const DEFAULT_USER_AGENT: &str = concat!("fund-order-summary/", env!("CARGO_PKG_VERSION"));

/// 依位置載入文件：http(s) 走網路，其餘視為本機檔案
#[derive(Debug, Clone)]
pub struct DocumentLoader {
    client: Client,
    cookie: Option<String>,
}

impl DocumentLoader {
    pub fn new(cookie: Option<String>) -> Self {
        Self {
            client: Client::new(),
            cookie: cookie.filter(|c| !c.trim().is_empty()),
        }
    }

    async fn fetch_http(&self, url: &Url) -> Result<Vec<u8>> {
        tracing::debug!("Making HTTP request to: {}", url);

        let mut request = self
            .client
            .get(url.clone())
            .header(USER_AGENT, DEFAULT_USER_AGENT);
        if let Some(cookie) = &self.cookie {
            let value = HeaderValue::from_str(cookie).map_err(|e| {
                SummaryError::InvalidConfigValueError {
                    field: "source.cookie".to_string(),
                    value: "<redacted>".to_string(),
                    reason: e.to_string(),
                }
            })?;
            request = request.header(COOKIE, value);
        }

        let response = request.send().await?;
        tracing::debug!("HTTP response status: {}", response.status());

        if !response.status().is_success() {
            return Err(SummaryError::HttpStatusError {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let body = response.bytes().await?;
        Ok(body.to_vec())
    }

    async fn read_local(&self, path: &str) -> Result<Vec<u8>> {
        tracing::debug!("Reading local document: {}", path);
        let data = tokio::fs::read(path).await?;
        Ok(data)
    }
}

impl Default for DocumentLoader {
    fn default() -> Self {
        Self::new(None)
    }
}

#[async_trait]
impl DocumentSource for DocumentLoader {
    async fn fetch(&self, location: &str) -> Result<Vec<u8>> {
        match Url::parse(location) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => self.fetch_http(&url).await,
            Ok(url) if url.scheme() == "file" => {
                let path = url.to_file_path().map_err(|_| SummaryError::InvalidConfigValueError {
                    field: "source.page".to_string(),
                    value: location.to_string(),
                    reason: "Not a local file URL".to_string(),
                })?;
                let data = tokio::fs::read(path).await?;
                Ok(data)
            }
            _ => self.read_local(location).await,
        }
    }
}
