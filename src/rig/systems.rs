use bevy::core_pipeline::tonemapping::Tonemapping;
use bevy::post_process::bloom::{Bloom, BloomCompositeMode};
use bevy::prelude::*;
use bevy::render::view::Hdr;
use bevy::window::{CursorGrabMode, CursorOptions, WindowFocused};

use super::RigConfig;
use super::entities::{CursorRecentered, EndCard, HeadTracker, LookInput, PlayerRig};
use crate::math;
use crate::pointer::PointerSource;
use crate::teleport::InfoCard;

/// Spawns the rig root, the head camera (also the pointer source) and the
/// hidden end-of-experience card.
pub fn spawn_rig(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    cfg: Res<RigConfig>,
) {
    let end_card_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.9, 0.75, 0.2),
        emissive: LinearRgba::rgb(0.6, 0.45, 0.1),
        unlit: true,
        ..default()
    });

    commands
        .spawn((
            Name::new("PlayerRig"),
            PlayerRig,
            Transform::default(),
            Visibility::default(),
        ))
        .with_children(|rig| {
            rig.spawn((
                Name::new("Head"),
                HeadTracker,
                PointerSource,
                Camera3d::default(),
                Hdr,
                Tonemapping::TonyMcMapface,
                Bloom {
                    intensity: cfg.bloom_intensity,
                    composite_mode: BloomCompositeMode::Additive,
                    ..Bloom::NATURAL
                },
                Transform::from_xyz(0.0, cfg.eye_height, 0.0),
            ));
            rig.spawn((
                Name::new("EndCard"),
                EndCard,
                InfoCard,
                Mesh3d(meshes.add(Rectangle::new(1.6, 0.9))),
                MeshMaterial3d(end_card_material),
                Transform::from_xyz(0.0, cfg.eye_height, -cfg.end_card_distance),
                Visibility::Hidden,
            ));
        });
}

/// Mouse look on the head camera: yaw around the rig's up axis, clamped pitch.
pub fn look_around(mut input: LookInput, mut head: Query<&mut Transform, With<HeadTracker>>) {
    let Ok(mut transform) = head.single_mut() else {
        return;
    };

    let mut yaw = 0.0;
    let mut pitch = 0.0;
    if input.frozen() {
        input.mouse_motion.clear();
    } else {
        for ev in input.mouse_motion.read() {
            yaw -= ev.delta.x * input.cfg.mouse_sensitivity_x;
            pitch -= ev.delta.y * input.cfg.mouse_sensitivity_y;
        }
    }
    if yaw != 0.0 {
        transform.rotate_y(yaw);
    }
    if pitch != 0.0 {
        let (_, current_pitch, _) = transform.rotation.to_euler(EulerRot::YXZ);
        let pitch_delta = math::clamp_pitch(current_pitch, pitch, input.cfg.pitch_margin);
        transform.rotate_local_x(pitch_delta);
    }
}

/// Hides and confines the cursor (`grab`) or releases it for UI use.
pub fn grab_cursor(opts: &mut CursorOptions, window: &mut Window, grab: bool) {
    opts.visible = !grab;
    if grab {
        opts.grab_mode = CursorGrabMode::Confined;
        let center = window.size() / 2.0;
        window.set_cursor_position(Some(center));
    } else {
        opts.grab_mode = CursorGrabMode::None;
    }
}

/// Grabs the cursor at startup.
pub fn hide_cursor(mut q: Query<(&mut CursorOptions, &mut Window)>) {
    for (mut opts, mut window) in &mut q {
        grab_cursor(&mut opts, &mut window, true);
    }
}

/// Warps the cursor back to center near a window edge or on regained focus.
pub fn recenter_cursor(
    mut windows: Query<&mut Window>,
    mut focus_events: MessageReader<WindowFocused>,
    mut recentered: ResMut<CursorRecentered>,
    cfg: Res<RigConfig>,
) {
    recentered.0 = false;

    let gained_focus = focus_events.read().any(|ev| ev.focused);

    for mut window in &mut windows {
        let size = window.size();
        let near_edge = window.cursor_position().is_some_and(|pos| {
            pos.cmplt(Vec2::splat(cfg.edge_margin)).any()
                || pos.cmpgt(size - cfg.edge_margin).any()
        });
        if gained_focus || near_edge {
            window.set_cursor_position(Some(size / 2.0));
            recentered.0 = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use bevy::ecs::system::RunSystemOnce;
    use bevy::input::mouse::MouseMotion;

    use super::*;
    use crate::fade::ScreenFade;

    fn look_world(fade_level: f32) -> (World, Entity) {
        let mut world = World::new();
        world.insert_resource(RigConfig::default());
        world.init_resource::<CursorRecentered>();
        world.init_resource::<Messages<MouseMotion>>();
        let mut fade = ScreenFade::default();
        fade.set_level(fade_level);
        world.insert_resource(fade);
        let head = world.spawn((HeadTracker, Transform::default())).id();
        world.write_message(MouseMotion {
            delta: Vec2::new(100.0, 0.0),
        });
        (world, head)
    }

    #[test]
    fn mouse_turns_head_while_scene_visible() {
        let (mut world, head) = look_world(0.0);
        world.run_system_once(look_around).expect("system runs");
        let rotation = world.get::<Transform>(head).expect("head").rotation;
        let expected = -100.0 * RigConfig::default().mouse_sensitivity_x;
        assert!((math::yaw_of(rotation) - expected).abs() < 1e-5);
    }

    #[test]
    fn head_look_frozen_while_faded_out() {
        let (mut world, head) = look_world(1.0);
        world.run_system_once(look_around).expect("system runs");
        let rotation = world.get::<Transform>(head).expect("head").rotation;
        assert_eq!(rotation, Quat::IDENTITY);
    }

    #[test]
    fn rig_spawns_head_and_hidden_end_card() {
        let mut world = World::new();
        world.init_resource::<Assets<Mesh>>();
        world.init_resource::<Assets<StandardMaterial>>();
        world.insert_resource(RigConfig::default());
        assert!(world.run_system_once(spawn_rig).is_ok());

        let rigs = world
            .query_filtered::<Entity, With<PlayerRig>>()
            .iter(&world)
            .count();
        assert_eq!(rigs, 1);

        let (head_tf, head_parent) = world
            .query_filtered::<(&Transform, &ChildOf), (With<HeadTracker>, With<PointerSource>)>()
            .single(&world)
            .expect("one head");
        assert!((head_tf.translation.y - RigConfig::default().eye_height).abs() < 1e-6);
        assert!(world.get::<PlayerRig>(head_parent.parent()).is_some());

        let card_vis = world
            .query_filtered::<&Visibility, (With<EndCard>, With<InfoCard>)>()
            .single(&world)
            .expect("one end card");
        assert_eq!(card_vis, &Visibility::Hidden);
    }
}
