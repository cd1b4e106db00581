//! This crate provides tools for smoothing ordered streams of samples,
//! such as the speed readings of a single bus trip, with a centred moving average.
//!
//! Every sample receives one average, taken over the `k` samples either side of it.
//! Near the ends of the stream the window is truncated rather than padded.
//! Typical usage may look like:
//! ```rust
//! use sliding_average::{CentredAverage, WindowFilter, apply};
//!
//! assert_eq!(apply([1.0, 2.0, 3.0, 4.0, 5.0], 1), vec![1.5, 2.0, 3.0, 4.0, 4.5]);
//!
//! let labelled: Vec<_> = [1.0, 2.0, 3.0, 4.0, 5.0]
//!     .into_iter()
//!     .enumerate()                        // labels each sample with its index
//!     .window(CentredAverage::new(1))     // averages over up to 3 samples
//!     .collect();
//! assert_eq!(labelled[0], (0, 1.5));
//! ```

pub mod error;
pub mod loader;
pub mod processing;
pub mod window;

pub use error::{SlidingAverageError, SlidingAverageResult};
pub use smoothing_common::Real;
pub use window::{CentredAverage, Phase, Window, WindowFilter, WindowIter, apply};
