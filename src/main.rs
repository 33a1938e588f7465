//! Desktop demo of gaze/pointer teleport locomotion.
//!
//! Mouse looks around, Space / left click / gamepad South locks the target
//! under the view centre and teleports on release. Tab opens the world inspector
//! (teleport is suspended meanwhile), Escape quits.

use bevy::app::AppExit;
use bevy::prelude::*;
use bevy::window::CursorOptions;
use bevy_inspector_egui::quick::WorldInspectorPlugin;

use vr_teleport::GameState;
use vr_teleport::fade::{FadeConfig, FadePlugin};
use vr_teleport::level::{LevelConfig, LevelPlugin};
use vr_teleport::rig::{RigConfig, RigPlugin, grab_cursor};
use vr_teleport::scene_switch::SceneSwitchPlugin;
use vr_teleport::teleport::{TeleportConfig, TeleportPlugin};
use vr_teleport::tuning::TuningPlugin;

/// Command-line overrides for [`TeleportConfig`].
#[cfg(feature = "native")]
#[derive(clap::Parser, Debug)]
#[command(version, about = "Gaze/pointer teleport demo")]
struct Cli {
    /// Fade change per second.
    #[arg(long)]
    fade_speed: Option<f32>,
    /// Seconds the screen stays opaque after moving.
    #[arg(long)]
    fade_length: Option<f32>,
    /// Maximum pointer range in world-units.
    #[arg(long)]
    max_range: Option<f32>,
    /// Fraction of head yaw cancelled on arrival (0..=1).
    #[arg(long)]
    head_compensation: Option<f32>,
    /// Keep the physical head yaw on arrival.
    #[arg(long)]
    no_head_compensation: bool,
    /// Scene loaded by the exit target.
    #[arg(long)]
    target_scene: Option<String>,
}

#[cfg(feature = "native")]
impl Cli {
    fn apply(self, cfg: &mut TeleportConfig) {
        if let Some(v) = self.fade_speed {
            cfg.fade_speed = v;
        }
        if let Some(v) = self.fade_length {
            cfg.fade_length = v;
        }
        if let Some(v) = self.max_range {
            cfg.max_teleport_range = v;
        }
        if let Some(v) = self.head_compensation {
            cfg.head_compensation = v.clamp(0.0, 1.0);
        }
        if self.no_head_compensation {
            cfg.allow_head_rotation = false;
        }
        if let Some(scene) = self.target_scene {
            cfg.target_scene = scene;
        }
    }
}

fn teleport_config() -> TeleportConfig {
    #[allow(unused_mut)]
    let mut cfg = TeleportConfig::default();
    #[cfg(feature = "native")]
    {
        use clap::Parser;
        Cli::parse().apply(&mut cfg);
    }
    cfg
}

fn main() {
    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "VR Teleport".into(),
            ..default()
        }),
        ..default()
    }))
    .register_type::<GameState>()
    .init_state::<GameState>()
    .add_plugins(bevy_egui::EguiPlugin::default())
    .add_plugins(RigPlugin(RigConfig::default()))
    .add_plugins(FadePlugin(FadeConfig::default()))
    .add_plugins(SceneSwitchPlugin)
    .add_plugins(TeleportPlugin(teleport_config()))
    .add_plugins(TuningPlugin)
    .add_plugins(LevelPlugin(LevelConfig::default()))
    .add_systems(Update, exit_on_esc)
    .add_systems(Update, toggle_inspector)
    .add_plugins(WorldInspectorPlugin::new().run_if(in_state(GameState::Debugging)));

    #[cfg(feature = "native")]
    {
        use bevy::remote::{RemotePlugin, http::RemoteHttpPlugin};
        app.add_plugins(RemotePlugin::default())
            .add_plugins(RemoteHttpPlugin::default());
    }

    app.run();
}

fn toggle_inspector(
    keys: Res<ButtonInput<KeyCode>>,
    state: Res<State<GameState>>,
    mut next: ResMut<NextState<GameState>>,
    mut windows: Query<(&mut CursorOptions, &mut Window)>,
) {
    if keys.just_pressed(KeyCode::Tab) {
        let new_state = match state.get() {
            GameState::Running => GameState::Debugging,
            GameState::Debugging => GameState::Running,
        };
        let grab = new_state == GameState::Running;
        next.set(new_state);
        for (mut opts, mut window) in &mut windows {
            grab_cursor(&mut opts, &mut window, grab);
        }
    }
}

fn exit_on_esc(keys: Res<ButtonInput<KeyCode>>, mut exit: MessageWriter<AppExit>) {
    if keys.just_pressed(KeyCode::Escape) {
        exit.write(AppExit::Success);
    }
}
