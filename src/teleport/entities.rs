use bevy::prelude::*;

/// Position + orientation the player adopts after teleporting.
#[derive(Clone, Copy, Debug, PartialEq, Default, Reflect)]
pub struct Pose {
    /// World-space position of the player rig.
    pub translation: Vec3,
    /// World-space orientation of the player rig.
    pub rotation: Quat,
}

impl Pose {
    /// Pose from a position and orientation.
    pub fn new(translation: Vec3, rotation: Quat) -> Self {
        Self {
            translation,
            rotation,
        }
    }

    /// Pose at `translation` facing `look_at` (yaw only, up is `+Y`).
    pub fn facing(translation: Vec3, look_at: Vec3) -> Self {
        let flat = Vec3::new(look_at.x, translation.y, look_at.z);
        let rotation = Transform::from_translation(translation)
            .looking_at(flat, Vec3::Y)
            .rotation;
        Self::new(translation, rotation)
    }

    /// Writes this pose into a transform, leaving scale untouched.
    pub fn apply_to(&self, transform: &mut Transform) {
        transform.translation = self.translation;
        transform.rotation = self.rotation;
    }
}

/// Destination marker the player can teleport to.
///
/// The destination pose is fixed at construction; only the marker's
/// `Visibility` changes while the target is locked, so targets spawned from
/// scene files get a `Visibility` even when the file omits one.
#[derive(Component, Clone, Debug, Reflect)]
#[reflect(Component)]
#[require(Transform, Visibility)]
pub struct TeleportTarget {
    id: String,
    destination: Pose,
    info_card: Option<Entity>,
}

impl TeleportTarget {
    /// Target named `id` that moves the player to `destination`.
    pub fn new(id: impl Into<String>, destination: Pose) -> Self {
        Self {
            id: id.into(),
            destination,
            info_card: None,
        }
    }

    /// Attaches a card revealed when the player arrives here.
    pub fn with_info_card(mut self, card: Entity) -> Self {
        self.info_card = Some(card);
        self
    }

    /// Stable identity, used to recognise the exit and entry targets.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Pose the player adopts after teleporting here.
    pub fn destination(&self) -> Pose {
        self.destination
    }

    /// Card shown on arrival, if any.
    pub fn info_card(&self) -> Option<Entity> {
        self.info_card
    }
}

/// Raycast layers an entity belongs to (bitmask).
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct TeleportLayers(pub u32);

impl TeleportLayers {
    /// Layer used for teleport targets unless configured otherwise.
    pub const DEFAULT: Self = Self(1);

    /// Whether any bit is shared with `mask`.
    pub fn matches(&self, mask: u32) -> bool {
        self.0 & mask != 0
    }
}

/// Marker for info cards toggled by the teleport controller.
#[derive(Component, Clone, Copy, Debug, Default, Reflect)]
#[reflect(Component)]
pub struct InfoCard;

/// Sent every frame the pointer rests on a target while idle.
#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct TargetLookedAt(pub Entity);

/// Confirm edges for the current frame, merged over button, key and click.
#[derive(Resource, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ConfirmInput {
    /// A confirm input went down this frame.
    pub pressed: bool,
    /// A confirm input came up this frame.
    pub released: bool,
}
