pub mod config;
pub mod config_loader;
pub mod dataset;
pub mod error;
pub mod logging;
pub mod stats;

pub use config::{
    DispatchConfig, HomogeneityMethod, LoggingConfig, Thresholds, DIAGNOSTIC_ALPHA,
    GROUP_UNDERSIZE_FRACTION, N_MAX, N_MIN,
};
pub use config_loader::ConfigLoader;
pub use dataset::{Column, ColumnData, Dataset};
pub use error::{ComputationError, DispatchError, ValidationError};
pub use logging::init_tracing;
pub use stats::{Alternative, ContingencyTable, TestResult};
