//! Report module - preprocessing summary, model comparison and charts

pub mod charts;
pub mod comparison;
pub mod summary;

pub use charts::*;
pub use comparison::*;
pub use summary::*;
