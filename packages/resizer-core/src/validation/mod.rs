pub mod key;
pub mod params;

pub use key::validate_content_id;
pub use params::{parse_dimension, validate_params};
