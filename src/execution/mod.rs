//! Pipeline execution

pub mod pipeline;

pub use pipeline::{ActionPipeline, EventHandler, PipelineEvent};
