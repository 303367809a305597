// Adapters layer: concrete implementations for external systems (http, local storage).

pub mod http;
pub mod storage;

pub use http::DocumentLoader;
pub use storage::LocalStorage;
