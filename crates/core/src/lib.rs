pub mod config;
pub mod document;
pub mod error;

pub use config::PipelineConfig;
pub use document::*;
pub use error::*;
