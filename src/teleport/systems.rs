//! ECS glue around the [`TeleportController`] state machine.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use super::TeleportConfig;
use super::controller::{FrameInput, TeleportController, TeleportError, TeleportWorld};
use super::entities::{ConfirmInput, InfoCard, Pose, TargetLookedAt, TeleportTarget};
use crate::fade::ScreenFade;
use crate::pointer::PointerHit;
use crate::rig::{HeadTracker, PlayerRig};
use crate::scene_switch::{SceneLoadHandle, SceneSwitcher};

/// ECS-backed [`TeleportWorld`]: targets, cards, the rig, fade and scenes.
#[derive(SystemParam)]
pub struct RigWorld<'w, 's> {
    targets: Query<
        'w,
        's,
        (Entity, &'static TeleportTarget, &'static mut Visibility),
        Without<InfoCard>,
    >,
    cards: Query<'w, 's, &'static mut Visibility, (With<InfoCard>, Without<TeleportTarget>)>,
    player: Query<'w, 's, &'static mut Transform, (With<PlayerRig>, Without<HeadTracker>)>,
    head: Query<'w, 's, &'static Transform, (With<HeadTracker>, Without<PlayerRig>)>,
    fade: ResMut<'w, ScreenFade>,
    scenes: ResMut<'w, SceneSwitcher>,
    looked_at: MessageWriter<'w, TargetLookedAt>,
}

fn visibility(visible: bool) -> Visibility {
    if visible {
        Visibility::Inherited
    } else {
        Visibility::Hidden
    }
}

impl TeleportWorld for RigWorld<'_, '_> {
    fn target(&self, entity: Entity) -> Option<TeleportTarget> {
        self.targets.get(entity).ok().map(|(_, t, _)| t.clone())
    }

    fn find_target(&self, id: &str) -> Option<Entity> {
        self.targets
            .iter()
            .find(|(_, t, _)| t.id() == id)
            .map(|(e, _, _)| e)
    }

    fn notify_looked_at(&mut self, target: Entity) {
        self.looked_at.write(TargetLookedAt(target));
    }

    fn set_marker_visible(&mut self, target: Entity, visible: bool) {
        match self.targets.get_mut(target) {
            Ok((_, _, mut vis)) => *vis = visibility(visible),
            Err(_) => debug!("marker {target} is gone"),
        }
    }

    fn set_card_visible(&mut self, card: Entity, visible: bool) {
        match self.cards.get_mut(card) {
            Ok(mut vis) => *vis = visibility(visible),
            Err(_) => warn!("info card {card} not found"),
        }
    }

    fn head_rotation(&self) -> Result<Quat, TeleportError> {
        self.head
            .single()
            .map(|tf| tf.rotation)
            .map_err(|_| TeleportError::MissingHead)
    }

    fn set_player_pose(&mut self, pose: Pose) -> Result<(), TeleportError> {
        let mut tf = self
            .player
            .single_mut()
            .map_err(|_| TeleportError::MissingPlayerRig)?;
        pose.apply_to(&mut tf);
        Ok(())
    }

    fn set_fade_level(&mut self, level: f32) {
        self.fade.set_level(level);
    }

    fn request_scene(&mut self, scene: &str) -> SceneLoadHandle {
        self.scenes.request(scene)
    }
}

/// Merges gamepad button, confirm key and left click into [`ConfirmInput`].
pub fn read_confirm_input(
    cfg: Res<TeleportConfig>,
    keys: Res<ButtonInput<KeyCode>>,
    mouse: Res<ButtonInput<MouseButton>>,
    gamepads: Query<&Gamepad>,
    mut confirm: ResMut<ConfirmInput>,
) {
    confirm.pressed = keys.just_pressed(cfg.confirm_key)
        || mouse.just_pressed(MouseButton::Left)
        || gamepads.iter().any(|g| g.just_pressed(cfg.confirm_button));
    confirm.released = keys.just_released(cfg.confirm_key)
        || mouse.just_released(MouseButton::Left)
        || gamepads.iter().any(|g| g.just_released(cfg.confirm_button));
}

/// Ticks the controller once with this frame's input and pointer hit.
pub fn advance_teleport(
    time: Res<Time>,
    cfg: Res<TeleportConfig>,
    confirm: Res<ConfirmInput>,
    hit: Res<PointerHit>,
    mut controller: ResMut<TeleportController>,
    mut world: RigWorld,
) -> Result {
    let frame = FrameInput {
        delta_secs: time.delta_secs(),
        confirm: *confirm,
        hit: hit.target,
    };
    controller.tick(&cfg, &frame, &mut world)?;
    Ok(())
}

/// Scales up markers the pointer rests on this frame.
pub fn highlight_looked_at(
    cfg: Res<TeleportConfig>,
    mut looked_at: MessageReader<TargetLookedAt>,
    mut markers: Query<(Entity, &mut Transform), With<TeleportTarget>>,
) {
    let hovered: Vec<Entity> = looked_at.read().map(|ev| ev.0).collect();
    for (entity, mut tf) in &mut markers {
        let scale = if hovered.contains(&entity) {
            cfg.highlight_scale
        } else {
            1.0
        };
        if tf.scale.x != scale {
            tf.scale = Vec3::splat(scale);
        }
    }
}
