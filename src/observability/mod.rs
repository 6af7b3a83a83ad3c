//! Observability module
//!
//! Logging setup and the end-of-run conversion report.

pub mod logging;
pub mod report;

pub use logging::{LogFormat, init_logging};
pub use report::{ConversionReport, Inventory};
