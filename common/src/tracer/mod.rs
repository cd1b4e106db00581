mod tracer_engine;

pub use tracer_engine::{TracerEngine, TracerError, TracerOptions};

/// Should be called at the start of each binary.
/// The service name is taken from the binary being built and the module
/// name from the call site, so the first log line identifies the component.
#[macro_export]
macro_rules! init_tracer {
    ($options:expr) => {{
        $crate::tracer::TracerEngine::new($options, env!("CARGO_BIN_NAME"), module_path!())
    }};
}
