//! Pipeline module - loading, preprocessing, filtering, selection, splitting

pub mod correlation;
pub mod error;
pub mod frame;
pub mod loader;
pub mod missing;
pub mod outliers;
pub mod persist;
pub mod preprocess;
pub mod split;

pub use correlation::*;
pub use error::PipelineError;
pub use frame::*;
pub use loader::*;
pub use missing::*;
pub use outliers::*;
pub use persist::*;
pub use preprocess::*;
pub use split::*;
