pub mod amount;
pub mod engine;
pub mod extractor;
pub mod fetcher;
pub mod locator;
pub mod renderer;

pub use crate::domain::model::{Amount, Order, OrderSummary};
pub use crate::domain::ports::{ConfigProvider, DocumentSource, Storage};
pub use crate::utils::error::Result;
