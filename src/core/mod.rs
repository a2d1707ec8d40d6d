//! Core business logic module
//!
//! Domain models, the stream catalog client, stream selection, muxing and the
//! pipeline/runtime that tie them together.

pub mod catalog;
pub mod config;
pub mod models;
pub mod muxer;
pub mod pipeline;
pub mod runtime;
pub mod selector;
pub mod tools;

#[cfg(test)]
pub(crate) mod test_support;





// Re-export commonly used types
pub use config::AppConfig;
pub use pipeline::{CancelFlag, DownloadPipeline};
