use bevy::prelude::*;
use thiserror::Error;

use super::TeleportConfig;
use super::entities::{ConfirmInput, Pose, TeleportTarget};
use crate::math;
use crate::scene_switch::SceneLoadHandle;

/// Broken scene setup detected while teleporting.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TeleportError {
    /// The pointer hit something on the teleport layer without a target.
    #[error("entity {0} is on the teleport layer but has no TeleportTarget")]
    NotATarget(Entity),
    /// The locked target was despawned before the sequence could start.
    #[error("locked teleport target {0} no longer exists")]
    TargetVanished(Entity),
    /// No entity carries `PlayerRig`.
    #[error("no PlayerRig entity to move")]
    MissingPlayerRig,
    /// No entity carries `HeadTracker`.
    #[error("no HeadTracker entity to read the head rotation from")]
    MissingHead,
}

/// Everything the controller needs from the outside world.
///
/// The ECS adapter is [`super::systems::RigWorld`]; tests use an in-memory
/// fake.
pub trait TeleportWorld {
    /// Snapshot of the target component on `entity`.
    fn target(&self, entity: Entity) -> Option<TeleportTarget>;
    /// Entity of the target whose id equals `id`.
    fn find_target(&self, id: &str) -> Option<Entity>;
    /// "Looked at" hook for highlighting.
    fn notify_looked_at(&mut self, target: Entity);
    /// Shows or hides a target's marker.
    fn set_marker_visible(&mut self, target: Entity, visible: bool);
    /// Shows or hides an info card.
    fn set_card_visible(&mut self, card: Entity, visible: bool);
    /// Physical head rotation relative to the rig.
    fn head_rotation(&self) -> Result<Quat, TeleportError>;
    /// Moves the player rig.
    fn set_player_pose(&mut self, pose: Pose) -> Result<(), TeleportError>;
    /// Pushes the fade level to the overlay.
    fn set_fade_level(&mut self, level: f32);
    /// Starts loading `scene` with activation deferred.
    fn request_scene(&mut self, scene: &str) -> SceneLoadHandle;
}

/// Per-frame inputs to [`TeleportController::tick`].
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameInput {
    /// Seconds since the previous frame.
    pub delta_secs: f32,
    /// Confirm edges this frame.
    pub confirm: ConfirmInput,
    /// Entity under the pointer ray, if any.
    pub hit: Option<Entity>,
}

/// Steps of the teleport state machine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Reflect)]
pub enum TeleportPhase {
    /// Scanning for targets under the pointer.
    #[default]
    Idle,
    /// A target is locked; waiting for the confirm release.
    Locked,
    /// Fading the screen to opaque.
    FadingOut,
    /// Screen is opaque; the next tick moves the player.
    Moving,
    /// Holding the opaque screen.
    Holding {
        /// Seconds spent holding so far.
        elapsed: f32,
    },
    /// Fading the screen back to clear.
    FadingIn,
    /// Screen is opaque; the next tick opens the scene activation gate.
    ActivationPending,
    /// Waiting for the new scene to finish activating.
    Loading,
    /// First frames of a freshly loaded scene: waiting for the entry target.
    Entering,
}

/// Teleport / scene-switch state machine.
///
/// Targets are referenced by [`Entity`]; the controller never owns them.
#[derive(Resource, Debug, Default)]
pub struct TeleportController {
    phase: TeleportPhase,
    current_target: Option<Entity>,
    fade_level: f32,
    rotation_amount: f32,
    destination: Option<Pose>,
    pending_scene_load: Option<SceneLoadHandle>,
    initial_card: Option<Entity>,
    end_card: Option<Entity>,
}

impl TeleportController {
    /// Controller that hides `initial_card` on the first lock and reveals
    /// `end_card` after a scene switch.
    pub fn new(initial_card: Option<Entity>, end_card: Option<Entity>) -> Self {
        Self {
            initial_card,
            end_card,
            ..default()
        }
    }

    /// Current phase.
    pub fn phase(&self) -> TeleportPhase {
        self.phase
    }

    /// Locked or most recently visited target.
    pub fn current_target(&self) -> Option<Entity> {
        self.current_target
    }

    /// Fade level in `[0, 1]`; 1 is fully opaque.
    pub fn fade_level(&self) -> f32 {
        self.fade_level
    }

    /// Rotation accumulated while teleporting; reset on every lock.
    pub fn rotation_amount(&self) -> f32 {
        self.rotation_amount
    }

    /// In-flight scene load, if a scene switch is running.
    pub fn pending_scene_load(&self) -> Option<&SceneLoadHandle> {
        self.pending_scene_load.as_ref()
    }

    /// `true` from the moment a target is locked until the sequence ends.
    pub fn is_transitioning(&self) -> bool {
        !matches!(self.phase, TeleportPhase::Idle | TeleportPhase::Entering)
    }

    /// `true` while the pointer should be scanned for targets.
    pub fn is_scanning(&self) -> bool {
        self.phase == TeleportPhase::Idle
    }

    /// Advances the state machine by exactly one step.
    pub fn tick(
        &mut self,
        cfg: &TeleportConfig,
        frame: &FrameInput,
        world: &mut impl TeleportWorld,
    ) -> Result<(), TeleportError> {
        match self.phase {
            TeleportPhase::Idle => self.scan(cfg, frame, world)?,
            TeleportPhase::Locked => {
                if frame.confirm.released {
                    self.confirm(cfg, world)?;
                }
            }
            TeleportPhase::FadingOut => {
                self.fade(cfg.fade_speed * frame.delta_secs, world);
                if self.fade_level >= 1.0 {
                    let next = if self.pending_scene_load.is_some() {
                        TeleportPhase::ActivationPending
                    } else {
                        TeleportPhase::Moving
                    };
                    self.enter(next);
                }
            }
            TeleportPhase::Moving => {
                self.arrive(cfg, world)?;
                self.enter(TeleportPhase::Holding { elapsed: 0.0 });
            }
            TeleportPhase::Holding { elapsed } => {
                let elapsed = elapsed + frame.delta_secs;
                if elapsed >= cfg.fade_length {
                    self.enter(TeleportPhase::FadingIn);
                } else {
                    self.phase = TeleportPhase::Holding { elapsed };
                }
            }
            TeleportPhase::FadingIn => {
                self.fade(-cfg.fade_speed * frame.delta_secs, world);
                if self.fade_level <= 0.0 {
                    info!("teleport finished");
                    self.enter(TeleportPhase::Idle);
                }
            }
            TeleportPhase::ActivationPending => {
                if let Some(load) = &self.pending_scene_load {
                    load.set_allow_activation(true);
                }
                self.enter(TeleportPhase::Loading);
            }
            TeleportPhase::Loading => self.poll_load(),
            TeleportPhase::Entering => self.enter_level(cfg, world)?,
        }
        Ok(())
    }

    fn scan(
        &mut self,
        cfg: &TeleportConfig,
        frame: &FrameInput,
        world: &mut impl TeleportWorld,
    ) -> Result<(), TeleportError> {
        let Some(hit) = frame.hit else {
            return Ok(());
        };
        if world.target(hit).is_none() {
            return Err(TeleportError::NotATarget(hit));
        }
        world.notify_looked_at(hit);

        if cfg.teleport_enabled && frame.confirm.pressed {
            self.lock(hit, world);
        }
        Ok(())
    }

    fn lock(&mut self, target: Entity, world: &mut impl TeleportWorld) {
        match self.current_target.replace(target) {
            Some(previous) => {
                world.set_marker_visible(previous, true);
                if let Some(card) = world.target(previous).and_then(|t| t.info_card()) {
                    world.set_card_visible(card, false);
                }
            }
            None => {
                if let Some(card) = self.initial_card {
                    world.set_card_visible(card, false);
                }
            }
        }
        world.set_marker_visible(target, false);
        self.rotation_amount = 0.0;
        self.enter(TeleportPhase::Locked);
    }

    fn confirm(
        &mut self,
        cfg: &TeleportConfig,
        world: &mut impl TeleportWorld,
    ) -> Result<(), TeleportError> {
        let Some(current) = self.current_target else {
            self.enter(TeleportPhase::Idle);
            return Ok(());
        };
        let target = world
            .target(current)
            .ok_or(TeleportError::TargetVanished(current))?;

        self.fade_level = 0.0;
        if target.id() == cfg.exit_target_id {
            info!("switching to scene {}", cfg.target_scene);
            self.destination = None;
            self.pending_scene_load = Some(world.request_scene(&cfg.target_scene));
        } else {
            info!("teleporting to {}", target.id());
            self.destination = Some(target.destination());
        }
        self.enter(TeleportPhase::FadingOut);
        Ok(())
    }

    fn arrive(
        &mut self,
        cfg: &TeleportConfig,
        world: &mut impl TeleportWorld,
    ) -> Result<(), TeleportError> {
        let Some(destination) = self.destination.take() else {
            return Ok(());
        };
        let rotation = if cfg.allow_head_rotation {
            math::compensate_head_yaw(
                world.head_rotation()?,
                destination.rotation,
                cfg.head_compensation,
            )
        } else {
            destination.rotation
        };
        world.set_player_pose(Pose::new(destination.translation, rotation))?;

        if let Some(card) = self
            .current_target
            .and_then(|t| world.target(t))
            .and_then(|t| t.info_card())
        {
            world.set_card_visible(card, true);
        }
        Ok(())
    }

    fn poll_load(&mut self) {
        let Some(load) = &self.pending_scene_load else {
            self.enter(TeleportPhase::Entering);
            return;
        };
        if load.is_failed() {
            error!("scene switch failed, fading back in");
            self.pending_scene_load = None;
            self.enter(TeleportPhase::FadingIn);
        } else if load.is_done() {
            self.pending_scene_load = None;
            self.enter(TeleportPhase::Entering);
        }
    }

    fn enter_level(
        &mut self,
        cfg: &TeleportConfig,
        world: &mut impl TeleportWorld,
    ) -> Result<(), TeleportError> {
        let Some(entry) = world.find_target(&cfg.entry_target_id) else {
            return Ok(());
        };
        let target = world.target(entry).ok_or(TeleportError::NotATarget(entry))?;
        world.set_player_pose(target.destination())?;
        if let Some(card) = self.end_card {
            world.set_card_visible(card, true);
        }

        // Targets of the previous scene are gone.
        self.current_target = None;
        self.initial_card = None;
        self.fade_level = 0.0;
        world.set_fade_level(0.0);
        info!("entered new scene at {}", target.id());
        self.enter(TeleportPhase::Idle);
        Ok(())
    }

    fn fade(&mut self, delta: f32, world: &mut impl TeleportWorld) {
        self.fade_level = math::step_fade(self.fade_level, delta);
        world.set_fade_level(self.fade_level);
    }

    fn enter(&mut self, phase: TeleportPhase) {
        debug!("teleport phase {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
    }
}
