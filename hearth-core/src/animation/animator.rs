//! Frame-timed animation loop
//!
//! Shows the frame at the current playlist position, holds it for the
//! frame interval, advances the position (wrapping at the end of the
//! playlist) and repeats. The loop has no exit of its own: it runs until
//! the stop condition says so (never, in the firmware) or the display
//! reports an error, which is returned to the caller unchanged.

use embedded_hal::delay::DelayNs;

use super::sequence::AnimationSequence;
use crate::traits::FrameSink;

/// Decides when `Animator::run` returns
///
/// Checked before every frame.
pub trait StopCondition {
    /// Return true to end the run before the next frame
    fn should_stop(&mut self) -> bool;
}

/// Never stops; the production stop condition
#[derive(Debug, Clone, Copy, Default)]
pub struct Forever;

impl StopCondition for Forever {
    fn should_stop(&mut self) -> bool {
        false
    }
}

impl<F: FnMut() -> bool> StopCondition for F {
    fn should_stop(&mut self) -> bool {
        self()
    }
}

/// Point-in-time view of the animation state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Snapshot {
    /// Current playlist position
    pub position: usize,
    /// Frame index at that position
    pub frame: u8,
    /// Frames shown since start (wraps)
    pub frames_shown: u32,
    /// Playlist length
    pub cycle_len: usize,
    /// Hold time per frame
    pub interval_ms: u32,
}

/// Drives a `FrameSink` through an `AnimationSequence`
#[derive(Debug, Clone)]
pub struct Animator<'a> {
    sequence: AnimationSequence<'a>,
    interval_ms: u32,
    position: usize,
    frames_shown: u32,
}

impl<'a> Animator<'a> {
    /// Create an animator positioned at the start of the playlist
    pub fn new(sequence: AnimationSequence<'a>, interval_ms: u32) -> Self {
        Self {
            sequence,
            interval_ms,
            position: 0,
            frames_shown: 0,
        }
    }

    /// Current playlist position
    pub fn position(&self) -> usize {
        self.position
    }

    /// Hold time per frame
    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    /// The sequence being played
    pub fn sequence(&self) -> &AnimationSequence<'a> {
        &self.sequence
    }

    /// Current animation state
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            position: self.position,
            frame: self.sequence.frame_index(self.position),
            frames_shown: self.frames_shown,
            cycle_len: self.sequence.len(),
            interval_ms: self.interval_ms,
        }
    }

    /// Blit the frame at the current position
    fn show<S: FrameSink>(&mut self, sink: &mut S) -> Result<(), S::Error> {
        let frame = self.sequence.frame_at(self.position);
        sink.blit(frame.as_bytes())?;
        self.frames_shown = self.frames_shown.wrapping_add(1);
        Ok(())
    }

    fn advance(&mut self) {
        self.position = (self.position + 1) % self.sequence.len();
    }

    /// Show the current frame and advance, without waiting
    pub fn step<S: FrameSink>(&mut self, sink: &mut S) -> Result<(), S::Error> {
        self.show(sink)?;
        self.advance();
        Ok(())
    }

    /// Run the animation until `stop` asks to end it
    ///
    /// Returns the number of frames shown during this call. A display
    /// error ends the run immediately; the position is left on the frame
    /// that failed.
    pub fn run<S, D, C>(&mut self, sink: &mut S, delay: &mut D, stop: &mut C) -> Result<u32, S::Error>
    where
        S: FrameSink,
        D: DelayNs,
        C: StopCondition,
    {
        self.run_observed(sink, delay, stop, |_| {})
    }

    /// Like `run`, calling `observer` after every frame is shown
    ///
    /// The observer sees the state while the frame is on screen, before
    /// the hold time starts.
    pub fn run_observed<S, D, C, O>(
        &mut self,
        sink: &mut S,
        delay: &mut D,
        stop: &mut C,
        mut observer: O,
    ) -> Result<u32, S::Error>
    where
        S: FrameSink,
        D: DelayNs,
        C: StopCondition,
        O: FnMut(&Snapshot),
    {
        let mut shown = 0u32;

        while !stop.should_stop() {
            self.show(sink)?;
            observer(&self.snapshot());
            delay.delay_ms(self.interval_ms);
            self.advance();
            shown = shown.wrapping_add(1);
        }

        Ok(shown)
    }
}
