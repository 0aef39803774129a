//! Search façade over the index.

pub mod result;
pub mod service;

pub use result::{SearchHit, SearchResult};
pub use service::SearchService;
