use crate::core::extractor::OrderExtractor;
use crate::core::fetcher::DocumentFetcher;
use crate::core::locator::{normalized_text, PageLocator, Region, ANCHOR_REGION, PAGE_PLAN};
use crate::core::renderer::SummaryRenderer;
use crate::domain::model::OrderSummary;
use crate::domain::ports::{ConfigProvider, DocumentSource, Storage};
use crate::utils::error::Result;
use crate::utils::validation::resolve_encoding;
use std::path::Path;

const PREVIEW_CHARS: usize = 40;

#[derive(Debug, Clone)]
pub struct RunReport {
    pub summary: OrderSummary,
    pub output_path: String,
}

/// One located region, as shown by a dry run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionPreview {
    pub region: Region,
    pub tag: String,
    pub text: String,
}

pub struct SummaryEngine<S: DocumentSource, W: Storage, C: ConfigProvider> {
    fetcher: DocumentFetcher<S>,
    storage: W,
    config: C,
    renderer: SummaryRenderer,
}

impl<S: DocumentSource, W: Storage, C: ConfigProvider> SummaryEngine<S, W, C> {
    pub fn new(source: S, storage: W, config: C) -> Result<Self> {
        let encoding = resolve_encoding(config.encoding_label())?;
        Ok(Self {
            fetcher: DocumentFetcher::new(source, encoding),
            storage,
            config,
            renderer: SummaryRenderer::default(),
        })
    }

    /// Loads the page and walks the locate plan without fetching orders.
    pub async fn locate_only(&self) -> Result<Vec<RegionPreview>> {
        let page = self.fetcher.fetch(self.config.page_location()).await?;
        let trace = PageLocator::trace(&page, PAGE_PLAN);

        let previews: Vec<RegionPreview> = trace
            .resolved
            .iter()
            .map(|(region, element)| RegionPreview {
                region: *region,
                tag: element.value().name().to_string(),
                text: normalized_text(*element).chars().take(PREVIEW_CHARS).collect(),
            })
            .collect();

        match trace.failure {
            Some(err) => {
                for preview in &previews {
                    tracing::info!("✅ {}: <{}> {}", preview.region, preview.tag, preview.text);
                }
                Err(err)
            }
            None => Ok(previews),
        }
    }

    pub async fn run(&self) -> Result<RunReport> {
        tracing::info!("Loading account page: {}", self.config.page_location());
        let mut page = self.fetcher.fetch(self.config.page_location()).await?;

        // 先定位頁面結構，失敗就不再下載委託頁
        let anchor = {
            let structure = PageLocator::locate(&page)?;
            tracing::info!("Located page structure; anchor is the {}", ANCHOR_REGION);
            structure.anchor().id()
        };

        let orders_url = self.config.orders_url();
        tracing::info!("Fetching pending fund orders: {}", orders_url);
        let orders = {
            let orders_page = self.fetcher.fetch(&orders_url).await?;
            OrderExtractor::extract(&orders_page)?
        };

        self.renderer.render(&orders, &mut page, anchor)?;
        let summary = OrderSummary::new(orders);
        tracing::info!(
            "Rendered {} orders, total {}",
            summary.orders.len(),
            summary.total
        );

        let bytes = self.fetcher.encode(&page.html());
        tracing::debug!("Writing {} bytes to storage", bytes.len());
        self.storage
            .write_file(self.config.output_file(), &bytes)
            .await?;

        let output_path = Path::new(self.config.output_path())
            .join(self.config.output_file())
            .to_string_lossy()
            .into_owned();

        Ok(RunReport {
            summary,
            output_path,
        })
    }
}
