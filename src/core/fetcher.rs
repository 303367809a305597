use crate::domain::ports::DocumentSource;
use crate::utils::error::Result;
use encoding_rs::Encoding;
use scraper::Html;

/// 下載文件並以固定的舊式編碼解碼
pub struct DocumentFetcher<S: DocumentSource> {
    source: S,
    encoding: &'static Encoding,
}

impl<S: DocumentSource> DocumentFetcher<S> {
    pub fn new(source: S, encoding: &'static Encoding) -> Self {
        Self { source, encoding }
    }

    pub fn shift_jis(source: S) -> Self {
        Self::new(source, encoding_rs::SHIFT_JIS)
    }

    /// Fetches `location` and parses it as an HTML document.
    pub async fn fetch(&self, location: &str) -> Result<Html> {
        let bytes = self.source.fetch(location).await?;
        tracing::debug!("Fetched {} bytes from {}", bytes.len(), location);

        let text = self.decode(&bytes);
        Ok(Html::parse_document(&text))
    }

    /// Decoding never fails; invalid sequences become U+FFFD.
    pub fn decode(&self, bytes: &[u8]) -> String {
        let (text, actual, had_errors) = self.encoding.decode(bytes);
        if actual != self.encoding {
            // BOM 優先於設定的編碼
            tracing::debug!("BOM overrides {} with {}", self.encoding.name(), actual.name());
        }
        if had_errors {
            tracing::warn!(
                "Malformed {} sequences replaced while decoding",
                actual.name()
            );
        }
        text.into_owned()
    }

    /// Encodes the output in the same legacy encoding; unmappable characters
    /// become numeric character references.
    pub fn encode(&self, text: &str) -> Vec<u8> {
        let (bytes, _, had_unmappable) = self.encoding.encode(text);
        if had_unmappable {
            tracing::debug!(
                "Unmappable characters written as numeric references for {}",
                self.encoding.name()
            );
        }
        bytes.into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;

    struct StaticSource {
        pages: HashMap<String, Vec<u8>>,
    }

    #[async_trait]
    impl DocumentSource for StaticSource {
        async fn fetch(&self, location: &str) -> Result<Vec<u8>> {
            self.pages.get(location).cloned().ok_or_else(|| {
                crate::utils::error::SummaryError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    location.to_string(),
                ))
            })
        }
    }

    fn source_with(location: &str, bytes: Vec<u8>) -> StaticSource {
        let mut pages = HashMap::new();
        pages.insert(location.to_string(), bytes);
        StaticSource { pages }
    }

    #[tokio::test]
    async fn test_fetch_decodes_shift_jis() {
        let html = "<html><body><p id=\"m\">買付余力 1,000円</p></body></html>";
        let (encoded, _, _) = encoding_rs::SHIFT_JIS.encode(html);
        let fetcher = DocumentFetcher::shift_jis(source_with("page", encoded.into_owned()));

        let document = fetcher.fetch("page").await.unwrap();
        let selector = scraper::Selector::parse("#m").unwrap();
        let text: String = document.select(&selector).next().unwrap().text().collect();
        assert_eq!(text, "買付余力 1,000円");
    }

    #[tokio::test]
    async fn test_fetch_propagates_source_errors() {
        let fetcher = DocumentFetcher::shift_jis(source_with("page", Vec::new()));
        assert!(fetcher.fetch("missing").await.is_err());
    }

    #[test]
    fn test_decode_is_total_over_invalid_bytes() {
        let fetcher = DocumentFetcher::shift_jis(source_with("page", Vec::new()));
        let text = fetcher.decode(&[0x82, 0xA0, 0xFF, 0x41]);
        assert!(text.starts_with('あ'));
        assert!(text.contains('\u{FFFD}'));
        assert!(text.ends_with('A'));
    }

    #[test]
    fn test_encode_round_trips_japanese_text() {
        let fetcher = DocumentFetcher::shift_jis(source_with("page", Vec::new()));
        let bytes = fetcher.encode("合計 1,000円");
        assert_eq!(fetcher.decode(&bytes), "合計 1,000円");
    }
}
