pub mod types;

pub use types::{FetchError, PipelineError, TransformError};
