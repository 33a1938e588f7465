//! Asynchronous scene switching with deferred activation.
//!
//! The teleport controller asks [`SceneSwitcher`] for a scene and receives a
//! [`SceneLoadHandle`]. The asset server loads the scene in the background,
//! but nothing is spawned until the controller opens the activation gate
//! (once the screen is fully faded). Activation despawns every [`LevelRoot`]
//! and spawns the new scene in their place.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use bevy::asset::{AssetLoadError, LoadState, RecursiveDependencyLoadState};
use bevy::prelude::*;

use crate::teleport::TeleportConfig;

/// Loads and activates scenes requested by the teleport controller.
pub struct SceneSwitchPlugin;

impl Plugin for SceneSwitchPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<LevelRoot>()
            .init_resource::<SceneSwitcher>()
            .add_systems(Update, drive_scene_switch);
    }
}

/// Marker for the root entity of the currently active level.
///
/// Everything under a `LevelRoot` is despawned when a new scene activates.
#[derive(Component, Reflect, Default)]
#[reflect(Component)]
pub struct LevelRoot;

#[derive(Debug, Default)]
struct LoadFlags {
    allow_activation: AtomicBool,
    done: AtomicBool,
    failed: AtomicBool,
}

/// Shared view of one in-flight scene load.
///
/// Clones observe the same flags: the controller toggles the activation gate
/// and polls completion, the switcher reports progress.
#[derive(Clone, Debug, Default)]
pub struct SceneLoadHandle {
    flags: Arc<LoadFlags>,
}

impl SceneLoadHandle {
    /// Opens (or closes) the gate that lets a loaded scene replace the level.
    pub fn set_allow_activation(&self, allow: bool) {
        self.flags.allow_activation.store(allow, Ordering::Release);
    }

    /// Whether the loaded scene may be activated.
    pub fn activation_allowed(&self) -> bool {
        self.flags.allow_activation.load(Ordering::Acquire)
    }

    /// `true` once the new scene has been spawned.
    pub fn is_done(&self) -> bool {
        self.flags.done.load(Ordering::Acquire)
    }

    /// `true` if the scene asset could not be loaded.
    pub fn is_failed(&self) -> bool {
        self.flags.failed.load(Ordering::Acquire)
    }

    pub(crate) fn mark_done(&self) {
        self.flags.done.store(true, Ordering::Release);
    }

    pub(crate) fn mark_failed(&self) {
        self.flags.failed.store(true, Ordering::Release);
    }
}

struct SceneRequest {
    scene: String,
    load: SceneLoadHandle,
}

struct InFlightScene {
    handle: Handle<DynamicScene>,
    load: SceneLoadHandle,
}

/// Scene loader facade used by the teleport controller.
#[derive(Resource, Default)]
pub struct SceneSwitcher {
    requested: Option<SceneRequest>,
    in_flight: Option<InFlightScene>,
}

impl SceneSwitcher {
    /// Queues a load of `scene` with activation deferred.
    ///
    /// A newer request replaces one that has not started loading yet.
    pub fn request(&mut self, scene: &str) -> SceneLoadHandle {
        let load = SceneLoadHandle::default();
        if let Some(previous) = self.requested.replace(SceneRequest {
            scene: scene.to_owned(),
            load: load.clone(),
        }) {
            warn!("scene request '{}' superseded by '{scene}'", previous.scene);
            previous.load.mark_failed();
        }
        load
    }

    /// `true` while a request is queued or a scene is loading.
    pub fn is_busy(&self) -> bool {
        self.requested.is_some() || self.in_flight.is_some()
    }
}

/// Asset path of a scene name inside `scene_dir`.
pub fn scene_path(scene_dir: &str, scene: &str) -> String {
    if scene_dir.is_empty() {
        format!("{scene}.scn.ron")
    } else {
        format!("{}/{scene}.scn.ron", scene_dir.trim_end_matches('/'))
    }
}

/// Error that ends a load: the scene itself or any of its dependencies.
fn load_failure<'a>(
    state: &'a LoadState,
    deps: &'a RecursiveDependencyLoadState,
) -> Option<&'a AssetLoadError> {
    match (state, deps) {
        (LoadState::Failed(err), _) | (_, RecursiveDependencyLoadState::Failed(err)) => {
            Some(err.as_ref())
        }
        _ => None,
    }
}

/// Starts queued loads, reports failures and activates loaded scenes once
/// their gate is open.
pub fn drive_scene_switch(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    cfg: Res<TeleportConfig>,
    mut switcher: ResMut<SceneSwitcher>,
    levels: Query<Entity, With<LevelRoot>>,
) {
    if let Some(request) = switcher.requested.take() {
        let path = scene_path(&cfg.scene_dir, &request.scene);
        info!("loading scene {path}");
        switcher.in_flight = Some(InFlightScene {
            handle: asset_server.load(path),
            load: request.load,
        });
    }

    let Some(in_flight) = switcher.in_flight.take() else {
        return;
    };

    let state = asset_server.load_state(&in_flight.handle);
    let deps = asset_server.recursive_dependency_load_state(&in_flight.handle);
    if let Some(err) = load_failure(&state, &deps) {
        error!("scene load failed: {err}");
        in_flight.load.mark_failed();
        return;
    }

    if !in_flight.load.activation_allowed()
        || !asset_server.is_loaded_with_dependencies(&in_flight.handle)
    {
        switcher.in_flight = Some(in_flight);
        return;
    }

    for level in &levels {
        commands.entity(level).despawn();
    }
    commands.spawn((
        Name::new("Level"),
        LevelRoot,
        DynamicSceneRoot(in_flight.handle.clone()),
    ));
    in_flight.load.mark_done();
    info!("scene activated");
}
