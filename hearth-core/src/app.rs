//! Application context
//!
//! Everything the firmware keeps alive for its whole lifetime: the display
//! and the animation state. Built once at startup and then handed to the
//! animation loop; `snapshot()` is the one place to look at what it is
//! doing.

use embedded_hal::delay::DelayNs;

use crate::animation::{Animator, Snapshot, StopCondition};
use crate::selftest;
use crate::traits::FrameSink;

/// Display plus animation state
pub struct App<'a, S> {
    sink: S,
    animator: Animator<'a>,
}

impl<'a, S: FrameSink> App<'a, S> {
    /// Bundle an initialised display with an animator
    pub fn new(sink: S, animator: Animator<'a>) -> Self {
        Self { sink, animator }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn animator(&self) -> &Animator<'a> {
        &self.animator
    }

    /// Current animation state
    pub fn snapshot(&self) -> Snapshot {
        self.animator.snapshot()
    }

    /// Clear the display and show the first frame of the sequence
    ///
    /// Does not move the playback position.
    pub fn self_test(&mut self) -> Result<(), S::Error> {
        let first = self.animator.sequence().frame_at(0);
        selftest::check_display(&mut self.sink, first.as_bytes())
    }

    /// Play the animation until `stop` says otherwise
    pub fn run<D, C>(&mut self, delay: &mut D, stop: &mut C) -> Result<u32, S::Error>
    where
        D: DelayNs,
        C: StopCondition,
    {
        self.animator.run(&mut self.sink, delay, stop)
    }

    /// Play the animation, reporting every frame to `observer`
    pub fn run_observed<D, C, O>(
        &mut self,
        delay: &mut D,
        stop: &mut C,
        observer: O,
    ) -> Result<u32, S::Error>
    where
        D: DelayNs,
        C: StopCondition,
        O: FnMut(&Snapshot),
    {
        self.animator.run_observed(&mut self.sink, delay, stop, observer)
    }

    /// Take the display and animator back
    pub fn into_parts(self) -> (S, Animator<'a>) {
        (self.sink, self.animator)
    }
}
