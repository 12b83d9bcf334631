pub mod cache;
pub mod constants;
pub mod errors;
pub mod pipeline;
pub mod storage;
pub mod transform;
pub mod validation;

// 公開API
pub use cache::{CacheEntry, CacheKey, ResultCache};
pub use constants::{DEFAULT_CACHE_TTL, DEFAULT_FETCH_TIMEOUT, DEFAULT_SWEEP_INTERVAL, MAX_PIXELS};
pub use errors::{FetchError, PipelineError, TransformError};
pub use pipeline::ImagePipeline;
pub use storage::{ContentFetcher, IpfsClient};
pub use transform::{OutputFormat, TransformParams, calculate_fit_dimensions, transform};
pub use validation::{parse_dimension, validate_content_id, validate_params};
