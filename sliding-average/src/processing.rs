use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::{
    Real,
    window::{CentredAverage, WindowFilter},
};

/// An average paired with the index, within its stream, of the sample it is centred on.
pub type LabelledAverage = (usize, Real);

/// Smooths each stream with its own [CentredAverage], in parallel.
/// The output holds one entry per input stream, in the same order.
#[instrument(skip_all, fields(num_streams = streams.len(), radius = radius))]
pub fn smooth_streams(streams: &[Vec<Real>], radius: usize) -> Vec<Vec<LabelledAverage>> {
    streams
        .par_iter()
        .enumerate()
        .map(|(stream_index, stream)| smooth_stream(stream_index, stream, radius))
        .collect()
}

fn smooth_stream(stream_index: usize, stream: &[Real], radius: usize) -> Vec<LabelledAverage> {
    let averages: Vec<_> = stream
        .iter()
        .copied()
        .enumerate()
        .window(CentredAverage::new(radius))
        .collect();
    debug!(
        stream_index,
        num_samples = stream.len(),
        num_averages = averages.len(),
        "Smoothed stream"
    );
    averages
}
