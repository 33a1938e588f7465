#![warn(missing_docs)]
//! Gaze/pointer teleport locomotion for a VR experience.
//!
//! A pointer ray selects a [`teleport::TeleportTarget`], a confirm press locks
//! it and the release runs a fade-out / move / hold / fade-in sequence. A
//! designated exit target instead fades out and switches to a new scene,
//! gating scene activation on the fade reaching full opacity.

pub mod fade;
pub mod level;
pub mod math;
pub mod pointer;
pub mod rig;
pub mod scene_switch;
pub mod teleport;
pub mod tuning;

use bevy::prelude::*;

/// Application-wide game state, used for system scheduling.
#[derive(States, Default, Debug, Clone, PartialEq, Eq, Hash, Reflect)]
pub enum GameState {
    /// Normal play: head look, pointer scan and teleporting.
    #[default]
    Running,
    /// Debug inspector active (Tab to toggle). Teleport is suspended.
    Debugging,
}
