//! Built-in demo level: a floor, a ring of teleport targets with info cards,
//! and an exit target that switches scene.
//!
//! Spawning the level also constructs the [`TeleportController`], injecting
//! the intro card (hidden on the first lock) and the rig's end card.

use std::f32::consts::TAU;

use bevy::prelude::*;

use crate::rig::{EndCard, spawn_rig};
use crate::scene_switch::LevelRoot;
use crate::teleport::{InfoCard, Pose, TeleportConfig, TeleportController, TeleportLayers, TeleportTarget};

/// Per-plugin configuration for the demo level.
#[derive(Resource, Clone, Debug, Reflect)]
pub struct LevelConfig {
    /// Number of regular targets placed on the ring.
    pub ring_targets: usize,
    /// Ring radius in world-units.
    pub ring_radius: f32,
    /// Distance of the exit target from the origin.
    pub exit_distance: f32,
    /// Side length of the square floor.
    pub floor_size: f32,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            ring_targets: 5,
            ring_radius: 8.0,
            exit_distance: 16.0,
            floor_size: 60.0,
        }
    }
}

/// Spawns the demo level and the teleport controller.
pub struct LevelPlugin(pub LevelConfig);

impl Plugin for LevelPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<LevelConfig>()
            .insert_resource(self.0.clone())
            .add_systems(Startup, spawn_demo_level.after(spawn_rig));
    }
}

/// Evenly spaced target positions on a ring around the origin.
pub fn ring_positions(count: usize, radius: f32) -> Vec<Vec3> {
    (0..count)
        .map(|i| {
            let angle = i as f32 / count as f32 * TAU;
            Vec3::new(angle.cos() * radius, 0.0, angle.sin() * radius)
        })
        .collect()
}

struct LevelAssets {
    marker: Handle<Mesh>,
    card: Handle<Mesh>,
    marker_material: Handle<StandardMaterial>,
    exit_material: Handle<StandardMaterial>,
    card_material: Handle<StandardMaterial>,
}

/// Spawns floor, light, targets and cards under a [`LevelRoot`], then inserts
/// the [`TeleportController`].
pub fn spawn_demo_level(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    cfg: Res<LevelConfig>,
    teleport: Res<TeleportConfig>,
    end_card: Query<Entity, With<EndCard>>,
) {
    let assets = LevelAssets {
        marker: meshes.add(Cylinder::new(0.6, 0.05)),
        card: meshes.add(Rectangle::new(1.2, 0.7)),
        marker_material: materials.add(StandardMaterial {
            base_color: Color::srgb(0.0, 0.5, 1.0),
            emissive: LinearRgba::rgb(0.0, 2.0, 4.0),
            ..default()
        }),
        exit_material: materials.add(StandardMaterial {
            base_color: Color::srgb(1.0, 0.3, 0.1),
            emissive: LinearRgba::rgb(4.0, 1.0, 0.2),
            ..default()
        }),
        card_material: materials.add(StandardMaterial {
            base_color: Color::srgb(0.85, 0.85, 0.9),
            unlit: true,
            ..default()
        }),
    };
    let floor_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.08, 0.09, 0.1),
        ..default()
    });

    let root = commands
        .spawn((
            Name::new("Level"),
            LevelRoot,
            Transform::default(),
            Visibility::default(),
        ))
        .id();

    let floor = commands
        .spawn((
            Name::new("Floor"),
            Mesh3d(meshes.add(Plane3d::default().mesh().size(cfg.floor_size, cfg.floor_size))),
            MeshMaterial3d(floor_material),
        ))
        .id();
    let light = commands
        .spawn((
            Name::new("Sun"),
            DirectionalLight {
                illuminance: 8_000.0,
                ..default()
            },
            Transform::from_xyz(4.0, 10.0, 6.0).looking_at(Vec3::ZERO, Vec3::Y),
        ))
        .id();
    commands.entity(root).add_children(&[floor, light]);

    let intro_card = spawn_card(
        &mut commands,
        &assets,
        root,
        Vec3::new(0.0, 1.7, -2.5),
        Vec3::ZERO.with_y(1.7),
        Visibility::Inherited,
    );

    for (i, pos) in ring_positions(cfg.ring_targets, cfg.ring_radius)
        .into_iter()
        .enumerate()
    {
        let outward = pos.normalize_or_zero();
        let card = spawn_card(
            &mut commands,
            &assets,
            root,
            pos + outward * 2.0 + Vec3::Y * 1.7,
            pos.with_y(1.7),
            Visibility::Hidden,
        );
        let target = TeleportTarget::new(format!("teleport-{i}"), Pose::facing(pos, pos + outward))
            .with_info_card(card);
        spawn_target(&mut commands, &assets, root, target, pos, false);
    }

    let exit_pos = Vec3::new(0.0, 0.0, cfg.exit_distance);
    let exit = TeleportTarget::new(
        teleport.exit_target_id.clone(),
        Pose::facing(exit_pos, Vec3::ZERO),
    );
    spawn_target(&mut commands, &assets, root, exit, exit_pos, true);

    let end_card = end_card.single().ok();
    if end_card.is_none() {
        warn!("rig has no end card; scene switch will not show one");
    }
    commands.insert_resource(TeleportController::new(Some(intro_card), end_card));
    info!("demo level ready with {} targets", cfg.ring_targets + 1);
}

fn spawn_card(
    commands: &mut Commands,
    assets: &LevelAssets,
    root: Entity,
    position: Vec3,
    facing: Vec3,
    visibility: Visibility,
) -> Entity {
    let card = commands
        .spawn((
            Name::new("InfoCard"),
            InfoCard,
            Mesh3d(assets.card.clone()),
            MeshMaterial3d(assets.card_material.clone()),
            // Rectangle meshes face +Z, so look away from the viewer.
            Transform::from_translation(position).looking_at(2.0 * position - facing, Vec3::Y),
            visibility,
        ))
        .id();
    commands.entity(root).add_child(card);
    card
}

fn spawn_target(
    commands: &mut Commands,
    assets: &LevelAssets,
    root: Entity,
    target: TeleportTarget,
    position: Vec3,
    exit: bool,
) {
    let material = if exit {
        assets.exit_material.clone()
    } else {
        assets.marker_material.clone()
    };
    let entity = commands
        .spawn((
            Name::new(target.id().to_owned()),
            target,
            TeleportLayers::DEFAULT,
            Mesh3d(assets.marker.clone()),
            MeshMaterial3d(material),
            Transform::from_translation(position + Vec3::Y * 0.025),
            Visibility::default(),
        ))
        .id();
    commands.entity(root).add_child(entity);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_positions_lie_on_radius() {
        let ring = ring_positions(6, 8.0);
        assert_eq!(ring.len(), 6);
        for p in &ring {
            assert!((p.length() - 8.0).abs() < 1e-4);
            assert_eq!(p.y, 0.0);
        }
    }

    #[test]
    fn ring_positions_are_distinct() {
        let ring = ring_positions(4, 5.0);
        for (i, a) in ring.iter().enumerate() {
            for b in &ring[i + 1..] {
                assert!(a.distance(*b) > 1.0);
            }
        }
    }

    #[test]
    fn empty_ring() {
        assert!(ring_positions(0, 3.0).is_empty());
    }
}
