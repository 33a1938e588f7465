//! Gaze/pointer teleport controller.
//!
//! [`TeleportController`] is a plain state machine ticked once per frame by
//! [`systems::advance_teleport`]. It reads the confirm edges gathered by
//! [`systems::read_confirm_input`] and the pointer hit produced by
//! [`crate::pointer`], and talks to the ECS only through the
//! [`TeleportWorld`] trait.

mod controller;
mod entities;
pub mod systems;

pub use controller::{FrameInput, TeleportController, TeleportError, TeleportPhase, TeleportWorld};
pub use entities::{ConfirmInput, InfoCard, Pose, TargetLookedAt, TeleportLayers, TeleportTarget};

use bevy::prelude::*;

use crate::fade::ScreenFade;
use crate::pointer::PointerHit;
use crate::scene_switch::SceneSwitcher;

/// Tunable teleport parameters.
#[derive(Resource, Clone, Debug, Reflect)]
pub struct TeleportConfig {
    /// Maximum pointer ray length in world-units.
    pub max_teleport_range: f32,
    /// Gamepad button that confirms a teleport.
    pub confirm_button: GamepadButton,
    /// Keyboard key that confirms a teleport.
    pub confirm_key: KeyCode,
    /// Cancel physical head yaw when landing on a target.
    pub allow_head_rotation: bool,
    /// Fraction of the head yaw to cancel (0 = none, 1 = all).
    pub head_compensation: f32,
    /// Rotation speed while teleporting (radians per second).
    pub rotation_speed: f32,
    /// Fade change per second.
    pub fade_speed: f32,
    /// Seconds to hold the fully faded screen after moving.
    pub fade_length: f32,
    /// Stick deflection needed before rotating while teleporting.
    pub rotate_stick_threshold: f32,
    /// When `false`, new targets cannot be locked. Running sequences finish.
    pub teleport_enabled: bool,
    /// Raycast layer mask matched against [`TeleportLayers`].
    pub layer_mask: u32,
    /// Target id that triggers a scene switch instead of a teleport.
    pub exit_target_id: String,
    /// Target id the player lands on after a scene switch.
    pub entry_target_id: String,
    /// Scene loaded when the exit target is confirmed.
    pub target_scene: String,
    /// Asset directory holding `<scene>.scn.ron` files.
    pub scene_dir: String,
    /// Marker scale while the pointer rests on a target.
    pub highlight_scale: f32,
}

impl Default for TeleportConfig {
    fn default() -> Self {
        Self {
            max_teleport_range: 30.0,
            confirm_button: GamepadButton::South,
            confirm_key: KeyCode::Space,
            allow_head_rotation: true,
            head_compensation: 1.0,
            rotation_speed: 1.0,
            fade_speed: 0.5,
            fade_length: 2.0,
            rotate_stick_threshold: 0.5,
            teleport_enabled: true,
            layer_mask: TeleportLayers::DEFAULT.0,
            exit_target_id: "teleport-exit".into(),
            entry_target_id: "teleport-entry".into(),
            target_scene: "turtle".into(),
            scene_dir: "scenes".into(),
            highlight_scale: 1.15,
        }
    }
}

/// Pointer-driven teleport between targets with a fade transition.
pub struct TeleportPlugin(pub TeleportConfig);

impl Plugin for TeleportPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<TeleportConfig>()
            .register_type::<TeleportTarget>()
            .register_type::<TeleportLayers>()
            .register_type::<InfoCard>()
            .register_type::<Pose>()
            .insert_resource(self.0.clone())
            .init_resource::<ConfirmInput>()
            .init_resource::<PointerHit>()
            .init_resource::<ScreenFade>()
            .init_resource::<SceneSwitcher>()
            .add_message::<TargetLookedAt>()
            .add_systems(
                Update,
                (
                    systems::read_confirm_input,
                    crate::pointer::pick_target,
                    systems::advance_teleport.run_if(resource_exists::<TeleportController>),
                    systems::highlight_looked_at,
                )
                    .chain(),
            )
            .add_systems(
                Update,
                crate::pointer::draw_pointer_hit.after(crate::pointer::pick_target),
            );
    }
}
