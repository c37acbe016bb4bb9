//! Build-time configuration
//!
//! Generated by `build.rs` from `hearth.toml`, together with the embedded
//! frame assets and the pin-taking macros for the configured wiring.

use hearth_core::animation::{AssetFormat, Playback};
use hearth_core::config::{AnimationConfig, DisplayConfig};

include!(concat!(env!("OUT_DIR"), "/hearth_config.rs"));
