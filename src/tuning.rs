//! Settings forwarding for debug and inspector UIs.
//!
//! [`TeleportTuning`] exposes setters over [`TeleportConfig`]; the debug
//! state hooks suspend teleport interaction while the inspector is open.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use crate::GameState;
use crate::teleport::TeleportConfig;

/// Suspends teleport while the debug inspector is shown.
pub struct TuningPlugin;

impl Plugin for TuningPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(GameState::Debugging), on_inspector_show)
            .add_systems(OnExit(GameState::Debugging), on_inspector_hide);
    }
}

/// Thin setter facade over [`TeleportConfig`].
#[derive(SystemParam)]
pub struct TeleportTuning<'w> {
    cfg: ResMut<'w, TeleportConfig>,
}

impl TeleportTuning<'_> {
    /// Sets the rotation speed used while teleporting.
    pub fn set_rotation_speed(&mut self, speed: f32) {
        self.cfg.rotation_speed = speed;
    }

    /// Sets how much physical head yaw is cancelled on arrival.
    pub fn set_head_compensation(&mut self, amount: f32) {
        self.cfg.head_compensation = amount;
    }

    /// Sets the fade change per second.
    pub fn set_fade_speed(&mut self, speed: f32) {
        self.cfg.fade_speed = speed;
    }

    /// Sets how long the opaque screen is held after moving.
    pub fn set_fade_length(&mut self, seconds: f32) {
        self.cfg.fade_length = seconds;
    }

    /// Allows new targets to be locked.
    pub fn enable_teleport(&mut self) {
        self.cfg.teleport_enabled = true;
    }

    /// Blocks new target locks; a running sequence still finishes.
    pub fn disable_teleport(&mut self) {
        self.cfg.teleport_enabled = false;
    }
}

/// Inspector opened: stop accepting teleport locks.
pub fn on_inspector_show(mut tuning: TeleportTuning) {
    debug!("inspector shown, teleport disabled");
    tuning.disable_teleport();
}

/// Inspector closed: accept teleport locks again.
pub fn on_inspector_hide(mut tuning: TeleportTuning) {
    debug!("inspector hidden, teleport enabled");
    tuning.enable_teleport();
}
