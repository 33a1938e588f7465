use bevy::color::Alpha;
use bevy::prelude::*;

use super::{FadeConfig, ScreenFade};
use crate::rig::HeadTracker;
use crate::teleport::TeleportError;

/// Marker for the full-screen fade node.
#[derive(Component, Reflect, Default)]
#[reflect(Component)]
pub struct FadeOverlay;

/// Attaches the fade overlay to the head camera, spawning it when missing.
///
/// More than one overlay is a broken setup: it is reported but startup
/// continues with every overlay attached.
pub fn attach_fade_overlay(
    mut commands: Commands,
    cfg: Res<FadeConfig>,
    fade: Res<ScreenFade>,
    head: Query<Entity, With<HeadTracker>>,
    overlays: Query<Entity, With<FadeOverlay>>,
) -> Result {
    let head = head.single().map_err(|_| TeleportError::MissingHead)?;

    let count = overlays.iter().count();
    if count > 1 {
        error!("camera rig has {count} fade overlays, expected one");
    }

    if count == 0 {
        debug!("no fade overlay found, spawning one");
        commands.spawn((
            Name::new("FadeOverlay"),
            FadeOverlay,
            Node {
                position_type: PositionType::Absolute,
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                ..default()
            },
            BackgroundColor(cfg.color.with_alpha(fade.level())),
            GlobalZIndex(cfg.z_index),
            UiTargetCamera(head),
        ));
    } else {
        for overlay in &overlays {
            commands.entity(overlay).insert(UiTargetCamera(head));
        }
    }
    Ok(())
}

/// Pushes the current [`ScreenFade`] level into every overlay's alpha.
pub fn apply_fade_level(
    fade: Res<ScreenFade>,
    cfg: Res<FadeConfig>,
    mut overlays: Query<(&mut BackgroundColor, &mut Visibility), With<FadeOverlay>>,
) {
    if !fade.is_changed() {
        return;
    }
    for (mut bg, mut vis) in &mut overlays {
        bg.0 = cfg.color.with_alpha(fade.level());
        *vis = if fade.level() > 0.0 {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
    }
}

#[cfg(test)]
mod tests {
    use bevy::ecs::system::RunSystemOnce;

    use super::*;

    fn world_with_head() -> (World, Entity) {
        let mut world = World::new();
        world.insert_resource(FadeConfig::default());
        world.insert_resource(ScreenFade::default());
        let head = world.spawn((HeadTracker, Transform::default())).id();
        (world, head)
    }

    fn overlay_count(world: &mut World) -> usize {
        world
            .query_filtered::<Entity, With<FadeOverlay>>()
            .iter(world)
            .count()
    }

    #[test]
    fn missing_overlay_is_spawned_on_head_camera() {
        let (mut world, head) = world_with_head();
        assert!(world.run_system_once::<_, (), _>(attach_fade_overlay).is_ok());
        assert_eq!(overlay_count(&mut world), 1);

        let target = world
            .query_filtered::<&UiTargetCamera, With<FadeOverlay>>()
            .single(&world)
            .expect("one overlay");
        assert_eq!(target.entity(), head);
    }

    #[test]
    fn duplicate_overlays_are_kept_and_attached() {
        let (mut world, head) = world_with_head();
        world.spawn(FadeOverlay);
        world.spawn(FadeOverlay);
        assert!(world.run_system_once::<_, (), _>(attach_fade_overlay).is_ok());
        assert_eq!(overlay_count(&mut world), 2);
        let attached = world
            .query_filtered::<&UiTargetCamera, With<FadeOverlay>>()
            .iter(&world)
            .filter(|t| t.entity() == head)
            .count();
        assert_eq!(attached, 2);
    }

    #[test]
    fn overlay_alpha_follows_fade_level() {
        let (mut world, _) = world_with_head();
        let overlay = world
            .spawn((
                FadeOverlay,
                BackgroundColor(Color::NONE),
                Visibility::Hidden,
            ))
            .id();
        world.resource_mut::<ScreenFade>().set_level(0.6);
        assert!(world.run_system_once(apply_fade_level).is_ok());

        let bg = world.get::<BackgroundColor>(overlay).expect("background");
        assert!((bg.0.alpha() - 0.6).abs() < 1e-6);
        assert_eq!(world.get::<Visibility>(overlay), Some(&Visibility::Inherited));
    }
}
