pub mod centred_average;

use std::collections::VecDeque;

pub use centred_average::{CentredAverage, Phase, apply, radius_from_signed};

/// A stateful filter which turns an ordered stream of values into an ordered
/// stream of outputs.
///
/// Implementors must produce exactly one output per observed value, in input
/// order, split between `observe` (while the stream is live) and `drain`
/// (after it has ended). [WindowIter] relies on this to pair every output with
/// the label of the value it describes.
pub trait Window {
    type InputType: Copy;
    type OutputType;

    /// Feeds the next value of the stream, returning an output if one is ready.
    fn observe(&mut self, value: Self::InputType) -> Option<Self::OutputType>;

    /// Called repeatedly once the stream has ended, until it returns `None`.
    fn drain(&mut self) -> Option<Self::OutputType>;
}

#[derive(Clone)]
pub struct WindowIter<I, L, W>
where
    I: Iterator<Item = (L, W::InputType)>,
    W: Window,
{
    window_function: W,
    source: I,
    pending: VecDeque<L>,
    source_finished: bool,
}

impl<I, L, W> WindowIter<I, L, W>
where
    I: Iterator<Item = (L, W::InputType)>,
    W: Window,
{
    pub fn new(source: I, window_function: W) -> Self {
        WindowIter {
            source,
            window_function,
            pending: VecDeque::new(),
            source_finished: false,
        }
    }

    #[cfg(test)]
    pub fn get_window(&self) -> &W {
        &self.window_function
    }
}

impl<I, L, W> Iterator for WindowIter<I, L, W>
where
    I: Iterator<Item = (L, W::InputType)>,
    W: Window,
{
    type Item = (L, W::OutputType);

    fn next(&mut self) -> Option<Self::Item> {
        while !self.source_finished {
            match self.source.next() {
                Some((label, value)) => {
                    self.pending.push_back(label);
                    if let Some(output) = self.window_function.observe(value) {
                        return self.pending.pop_front().map(|label| (label, output));
                    }
                }
                None => self.source_finished = true,
            }
        }
        let output = self.window_function.drain()?;
        self.pending.pop_front().map(|label| (label, output))
    }
}

pub trait WindowFilter<I, L, W>
where
    I: Iterator<Item = (L, W::InputType)>,
    W: Window,
{
    fn window(self, window: W) -> WindowIter<I, L, W>;
}

impl<I, L, W> WindowFilter<I, L, W> for I
where
    I: Iterator<Item = (L, W::InputType)>,
    W: Window,
{
    fn window(self, window: W) -> WindowIter<I, L, W> {
        WindowIter::<I, L, W>::new(self, window)
    }
}
