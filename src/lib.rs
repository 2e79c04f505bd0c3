//! pricefit: housing price regression pipeline
//!
//! Loads the housing dataset, imputes, scales and encodes it, removes target
//! outliers, selects features by target correlation and splits the result.
//! Three regressors are then trained on the persisted splits and compared.

pub mod cli;
pub mod model;
pub mod pipeline;
pub mod report;
pub mod utils;
