pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::SummaryConfig;

pub use adapters::{DocumentLoader, LocalStorage};
pub use crate::core::{
    amount::{format_amount, parse_amount},
    engine::{RunReport, SummaryEngine},
    extractor::OrderExtractor,
    fetcher::DocumentFetcher,
    locator::{PageLocator, PageStructure, Region},
    renderer::SummaryRenderer,
};
pub use domain::model::{Amount, Order, OrderSummary};
pub use utils::error::{Result, SummaryError};
