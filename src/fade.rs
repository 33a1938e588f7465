//! Full-screen fade overlay.
//!
//! The teleport controller writes a level into [`ScreenFade`]; the overlay is
//! a UI node attached to the head camera whose alpha follows that level.

mod systems;

pub use systems::{FadeOverlay, apply_fade_level, attach_fade_overlay};

use bevy::prelude::*;

/// Per-plugin configuration for the fade overlay.
#[derive(Resource, Clone, Debug, Reflect)]
pub struct FadeConfig {
    /// Overlay colour at full opacity.
    pub color: Color,
    /// Global UI z-index so the overlay covers every other UI node.
    pub z_index: i32,
}

impl Default for FadeConfig {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            z_index: 1000,
        }
    }
}

/// Normalized fade level; 0 = scene visible, 1 = fully covered.
#[derive(Resource, Default, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Resource)]
pub struct ScreenFade {
    level: f32,
}

impl ScreenFade {
    /// Current level in `[0, 1]`.
    pub fn level(&self) -> f32 {
        self.level
    }

    /// Sets the level, clamped into `[0, 1]`.
    pub fn set_level(&mut self, level: f32) {
        self.level = level.clamp(0.0, 1.0);
    }
}

/// Screen fade overlay driven by [`ScreenFade`].
pub struct FadePlugin(pub FadeConfig);

impl Plugin for FadePlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<FadeConfig>()
            .register_type::<ScreenFade>()
            .register_type::<FadeOverlay>()
            .insert_resource(self.0.clone())
            .init_resource::<ScreenFade>()
            .add_systems(PostStartup, attach_fade_overlay)
            .add_systems(PostUpdate, apply_fade_level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_level_clamps() {
        let mut fade = ScreenFade::default();
        fade.set_level(1.4);
        assert_eq!(fade.level(), 1.0);
        fade.set_level(-0.2);
        assert_eq!(fade.level(), 0.0);
        fade.set_level(0.35);
        assert!((fade.level() - 0.35).abs() < 1e-6);
    }
}
