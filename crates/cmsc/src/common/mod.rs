//! Common infrastructure: error types and diagnostic reporting

mod diagnostic;
mod error;

pub use diagnostic::{DiagnosticReporter, Diagnostics};
pub use error::{AnalysisError, AnalysisResult, SemaError};
