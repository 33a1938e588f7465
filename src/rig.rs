//! Player rig: a floor-level root that teleports, with a head camera child.
//!
//! On desktop the mouse rotates the head locally, standing in for physical
//! head tracking, so head-yaw compensation behaves as it would in a headset.

mod entities;
mod systems;

pub use entities::{EndCard, HeadTracker, PlayerRig};
pub use systems::{grab_cursor, spawn_rig};

use bevy::prelude::*;

use crate::GameState;

/// Per-plugin configuration for the player rig.
#[derive(Resource, Clone, Debug, Reflect)]
pub struct RigConfig {
    /// Head height above the rig origin.
    pub eye_height: f32,
    /// Horizontal mouse sensitivity (radians per pixel).
    pub mouse_sensitivity_x: f32,
    /// Vertical mouse sensitivity (radians per pixel).
    pub mouse_sensitivity_y: f32,
    /// Pixel margin from window edge that triggers cursor recentering.
    pub edge_margin: f32,
    /// Margin from vertical to prevent the head from flipping (radians).
    pub pitch_margin: f32,
    /// Bloom post-processing intensity.
    pub bloom_intensity: f32,
    /// Distance in front of the rig where the end-of-experience card floats.
    pub end_card_distance: f32,
}

impl Default for RigConfig {
    fn default() -> Self {
        Self {
            eye_height: 1.7,
            mouse_sensitivity_x: 0.003,
            mouse_sensitivity_y: 0.002,
            edge_margin: 100.0,
            pitch_margin: 0.05,
            bloom_intensity: 0.15,
            end_card_distance: 2.5,
        }
    }
}

/// Player rig with mouse-driven head look.
pub struct RigPlugin(pub RigConfig);

impl Plugin for RigPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<PlayerRig>()
            .register_type::<HeadTracker>()
            .register_type::<EndCard>()
            .register_type::<RigConfig>()
            .insert_resource(self.0.clone())
            .init_resource::<entities::CursorRecentered>()
            .add_systems(Startup, (systems::spawn_rig, systems::hide_cursor))
            .add_systems(
                Update,
                systems::recenter_cursor.run_if(in_state(GameState::Running)),
            )
            .add_systems(
                Update,
                systems::look_around
                    .after(systems::recenter_cursor)
                    .run_if(in_state(GameState::Running)),
            );
    }
}
