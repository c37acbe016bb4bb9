//! Fireplace animation
//!
//! Frames are prepared once at startup (`FrameSet`), arranged into a
//! playback order (`AnimationSequence`) and then played forever by the
//! `Animator`.

mod animator;
mod frames;
mod sequence;

pub use animator::{Animator, Forever, Snapshot, StopCondition};
pub use frames::{AssetFormat, FrameSet};
pub use sequence::{AnimationSequence, Playback, SequenceError, MAX_FRAMES, MAX_PLAYLIST};
