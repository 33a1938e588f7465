use bevy::ecs::system::SystemParam;
use bevy::input::mouse::MouseMotion;
use bevy::prelude::*;

use super::RigConfig;
use crate::fade::ScreenFade;

/// Root of the player rig; teleports move this entity.
#[derive(Component, Reflect, Default)]
#[reflect(Component)]
pub struct PlayerRig;

/// Head camera; its local rotation is the physical head rotation.
#[derive(Component, Reflect, Default)]
#[reflect(Component)]
pub struct HeadTracker;

/// End-of-experience card carried by the rig, revealed after a scene switch.
#[derive(Component, Reflect, Default)]
#[reflect(Component)]
pub struct EndCard;

/// Set to `true` on frames where the cursor was warped back to center,
/// so [`super::systems::look_around`] can discard the synthetic mouse delta.
#[derive(Resource, Default)]
pub struct CursorRecentered(pub bool);

/// Inputs read by the head-look system.
#[derive(SystemParam)]
pub struct LookInput<'w, 's> {
    pub(super) mouse_motion: MessageReader<'w, 's, MouseMotion>,
    pub(super) recentered: Res<'w, CursorRecentered>,
    pub(super) cfg: Res<'w, RigConfig>,
    pub(super) fade: Option<Res<'w, ScreenFade>>,
}

impl LookInput<'_, '_> {
    /// Head look is frozen while the screen is fully faded.
    pub(super) fn frozen(&self) -> bool {
        self.recentered.0 || self.fade.as_ref().is_some_and(|f| f.level() >= 1.0)
    }
}
