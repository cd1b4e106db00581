use std::collections::VecDeque;

use strum::Display;
use tracing::{error, trace};

use super::Window;
use crate::{
    Real,
    error::{SlidingAverageError, SlidingAverageResult},
};

/// Where a [CentredAverage] is in its lifetime.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Phase {
    /// Fewer than `2k+1` samples seen, windows grow from `k+1` samples.
    #[default]
    #[strum(to_string = "ramp-up")]
    RampUp,
    /// The window holds `2k+1` samples and slides one sample per observation.
    #[strum(to_string = "steady")]
    Steady,
    /// Input has ended, windows shrink from the left as the tail is drained.
    #[strum(to_string = "ramp-down")]
    RampDown,
    /// Every owed output has been produced.
    #[strum(to_string = "exhausted")]
    Exhausted,
}

/// Converts a signed window radius, as it arrives from configuration,
/// into the radius used by [CentredAverage].
pub fn radius_from_signed(radius: i64) -> SlidingAverageResult<usize> {
    if radius < 0 {
        return Err(SlidingAverageError::InvalidArgument { radius });
    }
    usize::try_from(radius).map_err(|_| SlidingAverageError::RadiusOutOfRange { radius })
}

/// Centred moving average with window radius `k`.
///
/// The output for sample `i` of an `n` sample stream is the mean of samples
/// `max(0, i-k) ..= min(n-1, i+k)`, so windows hold `2k+1` samples in the
/// interior of the stream and shrink to `k+1` samples at either end.
/// Outputs lag the input by `k` samples: nothing is emitted until `k+1`
/// samples have been observed, and the last `k` outputs are produced by
/// [CentredAverage::drain] once the input has ended.
#[derive(Debug, Clone)]
pub struct CentredAverage {
    radius: usize,
    full_size: usize,
    window: VecDeque<Real>,
    sum: Real,
    num_observed: usize,
    num_emitted: usize,
    phase: Phase,
}

impl CentredAverage {
    pub fn new(radius: usize) -> Self {
        CentredAverage {
            radius,
            full_size: radius.saturating_mul(2).saturating_add(1),
            window: VecDeque::new(),
            sum: Real::default(),
            num_observed: 0,
            num_emitted: 0,
            phase: Phase::default(),
        }
    }

    pub fn try_new(radius: i64) -> SlidingAverageResult<Self> {
        radius_from_signed(radius).map(Self::new)
    }

    pub fn radius(&self) -> usize {
        self.radius
    }

    pub fn full_size(&self) -> usize {
        self.full_size
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn num_observed(&self) -> usize {
        self.num_observed
    }

    pub fn num_emitted(&self) -> usize {
        self.num_emitted
    }

    pub fn running_sum(&self) -> Real {
        self.sum
    }

    pub fn is_full(&self) -> bool {
        self.window.len() == self.full_size
    }

    #[cfg(test)]
    pub fn test_sum(&self) -> Real {
        self.window.iter().sum()
    }

    /// Feeds the next sample of the stream.
    ///
    /// Returns the average centred `k` samples behind `value`, or `None` while
    /// fewer than `k+1` samples have been seen. With a radius of zero every
    /// sample is returned unchanged.
    pub fn observe(&mut self, value: Real) -> Option<Real> {
        if matches!(self.phase, Phase::RampDown | Phase::Exhausted) {
            error!(phase = %self.phase, "Sample observed after drain began, ignoring");
            return None;
        }
        self.num_observed += 1;

        if self.radius == 0 {
            self.phase = Phase::Steady;
            self.num_emitted += 1;
            return Some(value);
        }

        if self.is_full() {
            if let Some(old) = self.window.pop_front() {
                self.sum -= old;
            }
        }
        self.sum += value;
        self.window.push_back(value);

        if self.is_full() && self.phase == Phase::RampUp {
            trace!(num_observed = self.num_observed, "Window full");
            self.phase = Phase::Steady;
        }
        (self.window.len() > self.radius).then(|| self.emit())
    }

    /// Produces the next trailing average once the input has ended.
    ///
    /// Must only be called after the last call to [CentredAverage::observe].
    /// Returns `None` once an output has been produced for every observed
    /// sample, and on every call after that.
    pub fn drain(&mut self) -> Option<Real> {
        if self.phase == Phase::Exhausted {
            return None;
        }
        if self.num_emitted >= self.num_observed {
            trace!(num_emitted = self.num_emitted, "Drain exhausted");
            self.phase = Phase::Exhausted;
            return None;
        }
        self.phase = Phase::RampDown;

        // The buffer always ends at the newest sample, so only its start moves.
        let window_start = self.num_emitted.saturating_sub(self.radius);
        while self.num_observed - self.window.len() < window_start {
            match self.window.pop_front() {
                Some(old) => self.sum -= old,
                None => break,
            }
        }
        Some(self.emit())
    }

    fn emit(&mut self) -> Real {
        self.num_emitted += 1;
        self.sum / self.window.len() as Real
    }
}

impl Window for CentredAverage {
    type InputType = Real;
    type OutputType = Real;

    fn observe(&mut self, value: Real) -> Option<Real> {
        CentredAverage::observe(self, value)
    }

    fn drain(&mut self) -> Option<Real> {
        CentredAverage::drain(self)
    }
}

/// Smooths a whole sequence, returning one average per sample in input order.
pub fn apply<I>(samples: I, radius: usize) -> Vec<Real>
where
    I: IntoIterator<Item = Real>,
{
    let mut engine = CentredAverage::new(radius);
    let mut averages: Vec<Real> = samples
        .into_iter()
        .filter_map(|value| engine.observe(value))
        .collect();
    averages.extend(std::iter::from_fn(|| engine.drain()));
    averages
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use rand::random;

    fn direct_averages(data: &[Real], radius: usize) -> Vec<Real> {
        (0..data.len())
            .map(|centre| {
                let start = centre.saturating_sub(radius);
                let end = (centre + radius + 1).min(data.len());
                data[start..end].iter().sum::<Real>() / (end - start) as Real
            })
            .collect()
    }

    fn mean(data: &[Real]) -> Real {
        data.iter().sum::<Real>() / data.len() as Real
    }

    #[test]
    fn negative_radius() {
        assert_eq!(
            CentredAverage::try_new(-1).err(),
            Some(SlidingAverageError::InvalidArgument { radius: -1 })
        );
        assert_eq!(
            radius_from_signed(i64::MIN),
            Err(SlidingAverageError::InvalidArgument { radius: i64::MIN })
        );
    }

    #[test]
    fn signed_radius() {
        let engine = CentredAverage::try_new(4).expect("radius is valid");
        assert_eq!(engine.radius(), 4);
        assert_eq!(engine.full_size(), 9);
        assert_eq!(engine.phase(), Phase::RampUp);
    }

    #[test]
    fn five_samples_radius_one() {
        assert_eq!(
            apply([1.0, 2.0, 3.0, 4.0, 5.0], 1),
            vec![1.5, 2.0, 3.0, 4.0, 4.5]
        );
    }

    #[test]
    fn radius_zero_is_identity() {
        let data: Vec<Real> = (0..100).map(|_| random::<Real>() * 50.0).collect();
        assert_eq!(apply(data.clone(), 0), data);

        let mut engine = CentredAverage::new(0);
        assert_eq!(engine.observe(7.25), Some(7.25));
        assert_eq!(engine.drain(), None);
    }

    #[test]
    fn output_length() {
        for radius in 0..6 {
            for len in 0..20 {
                let data: Vec<Real> = (0..len).map(|i| i as Real).collect();
                assert_eq!(apply(data, radius).len(), len, "radius {radius}, length {len}");
            }
        }
    }

    #[test]
    fn boundary_lengths() {
        let radius = 3;
        for len in [0, 1, radius, radius + 1, 2 * radius, 2 * radius + 1] {
            let data: Vec<Real> = (0..len).map(|_| random::<Real>()).collect();
            let output = apply(data.clone(), radius);
            let expected = direct_averages(&data, radius);
            assert_eq!(output.len(), expected.len(), "length {len}");
            for (out, exp) in output.iter().zip(expected.iter()) {
                assert_approx_eq!(out, exp);
            }
        }
    }

    #[test]
    fn short_stream_averages_everything() {
        let data = [2.0, 4.0, 9.0];
        let mut engine = CentredAverage::new(3);
        for value in data {
            assert_eq!(engine.observe(value), None);
        }
        for _ in 0..3 {
            assert_approx_eq!(engine.drain().expect("output owed"), 5.0);
        }
        assert_eq!(engine.drain(), None);
    }

    #[test]
    fn ramp_up_and_ramp_down() {
        let data: Vec<Real> = (0..40).map(|_| random::<Real>()).collect();
        for radius in 1..10 {
            let output = apply(data.clone(), radius);
            assert_approx_eq!(output[0], mean(&data[..=radius]));
            assert_approx_eq!(
                output[output.len() - 1],
                mean(&data[data.len() - radius - 1..])
            );
        }
    }

    #[test]
    fn interior_is_full_window() {
        let data: Vec<Real> = (0..30).map(|_| random::<Real>() * 100.0).collect();
        let radius = 4;
        let output = apply(data.clone(), radius);
        for centre in radius..data.len() - radius {
            assert_approx_eq!(
                output[centre],
                mean(&data[centre - radius..=centre + radius])
            );
        }
    }

    #[test]
    fn matches_direct_computation() {
        let data: Vec<Real> = (0..1000).map(|_| random()).collect();
        for radius in 0..50 {
            let output = apply(data.clone(), radius);
            let expected = direct_averages(&data, radius);
            assert_eq!(output.len(), expected.len());
            for (out, exp) in output.iter().zip(expected.iter()) {
                assert_approx_eq!(out, exp);
            }
        }
    }

    #[test]
    fn running_sum_invariant() {
        let data: Vec<Real> = (0..200).map(|_| random::<Real>() - 0.5).collect();
        for radius in 0..12 {
            let mut engine = CentredAverage::new(radius);
            for value in data.iter().copied() {
                engine.observe(value);
                assert_approx_eq!(engine.running_sum(), engine.test_sum());
                assert!(engine.num_emitted() <= engine.num_observed());
            }
            while engine.drain().is_some() {
                assert_approx_eq!(engine.running_sum(), engine.test_sum());
            }
            assert_eq!(engine.num_emitted(), engine.num_observed());
        }
    }

    #[test]
    fn phase_transitions() {
        let mut engine = CentredAverage::new(2);
        let phases: Vec<_> = (0..6)
            .map(|i| {
                engine.observe(i as Real);
                engine.phase()
            })
            .collect();
        assert_eq!(
            phases,
            vec![
                Phase::RampUp,
                Phase::RampUp,
                Phase::RampUp,
                Phase::RampUp,
                Phase::Steady,
                Phase::Steady
            ]
        );
        assert!(engine.drain().is_some());
        assert_eq!(engine.phase(), Phase::RampDown);
        assert!(engine.drain().is_some());
        assert_eq!(engine.drain(), None);
        assert_eq!(engine.phase(), Phase::Exhausted);
        assert_eq!(engine.phase().to_string(), "exhausted");
    }

    #[test]
    fn exhaustion_is_idempotent() {
        let mut engine = CentredAverage::new(2);
        for value in [1.0, 5.0, 2.0, 8.0] {
            engine.observe(value);
        }
        while engine.drain().is_some() {}
        for _ in 0..10 {
            assert_eq!(engine.drain(), None);
        }
        assert_eq!(engine.num_emitted(), 4);
    }

    #[test]
    fn observe_after_drain_is_ignored() {
        let mut engine = CentredAverage::new(1);
        for value in [1.0, 2.0, 3.0] {
            engine.observe(value);
        }
        assert_eq!(engine.drain(), Some(2.5));
        assert_eq!(engine.observe(10.0), None);
        assert_eq!(engine.num_observed(), 3);
        assert_eq!(engine.drain(), None);
    }

    #[test]
    fn empty_stream() {
        let mut engine = CentredAverage::new(5);
        assert_eq!(engine.drain(), None);
        assert_eq!(engine.phase(), Phase::Exhausted);
        assert!(apply(Vec::new(), 5).is_empty());
    }
}
