//! Pointer raycast against the teleport layer.
//!
//! The ray starts at the [`PointerSource`] entity (the head camera on desktop,
//! a tracked controller in VR) and follows its forward axis.

use bevy::picking::mesh_picking::ray_cast::{MeshRayCast, MeshRayCastSettings, RayCastVisibility};
use bevy::prelude::*;

use crate::teleport::{TeleportConfig, TeleportController, TeleportLayers};

/// Marker for the entity whose forward axis the teleport ray follows.
#[derive(Component, Reflect, Default)]
#[reflect(Component)]
pub struct PointerSource;

/// Closest teleport-layer hit under the pointer this frame.
#[derive(Resource, Default, Debug, Clone, Copy)]
pub struct PointerHit {
    /// Hit entity, `None` when nothing on the layer is within range.
    pub target: Option<Entity>,
    /// World-space hit point (meaningless without a target).
    pub point: Vec3,
}

/// Casts the pointer ray while the controller is idle.
pub fn pick_target(
    mut ray_cast: MeshRayCast,
    cfg: Res<TeleportConfig>,
    controller: Option<Res<TeleportController>>,
    pointer: Query<&GlobalTransform, With<PointerSource>>,
    layers: Query<&TeleportLayers>,
    mut hit: ResMut<PointerHit>,
) {
    *hit = PointerHit::default();

    if !controller.is_some_and(|c| c.is_scanning()) {
        return;
    }
    let Ok(pointer) = pointer.single() else {
        return;
    };

    let ray = Ray3d::new(pointer.translation(), pointer.forward());
    let mask = cfg.layer_mask;
    let filter = |entity: Entity| layers.get(entity).is_ok_and(|l| l.matches(mask));
    let settings = MeshRayCastSettings::default()
        .with_filter(&filter)
        .with_visibility(RayCastVisibility::Any);

    if let Some((entity, ray_hit)) = ray_cast.cast_ray(ray, &settings).first()
        && ray_hit.distance <= cfg.max_teleport_range
    {
        hit.target = Some(*entity);
        hit.point = ray_hit.point;
    }
}

/// Draws a small marker where the pointer ray meets a target.
pub fn draw_pointer_hit(hit: Res<PointerHit>, mut gizmos: Gizmos) {
    if hit.target.is_some() {
        gizmos.sphere(
            Isometry3d::from_translation(hit.point),
            0.08,
            Color::srgb(0.2, 0.9, 1.0),
        );
    }
}
