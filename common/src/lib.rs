pub mod tracer;

/// Scalar type of every sample and average handled by the workspace.
pub type Real = f64;

pub use tracer::{TracerEngine, TracerError, TracerOptions};
