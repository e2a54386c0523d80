use glam::{Affine3A, Quat, Vec3};

/// Local TRS of a node.
///
/// The local matrix is cached and rebuilt lazily when any of the public
/// fields changed since the last [`Transform::update_local_matrix`].
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,

    local_matrix: Affine3A,
    last_position: Vec3,
    last_rotation: Quat,
    last_scale: Vec3,
}

impl Transform {
    #[must_use]
    pub fn new() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            local_matrix: Affine3A::IDENTITY,
            last_position: Vec3::ZERO,
            last_rotation: Quat::IDENTITY,
            last_scale: Vec3::ONE,
        }
    }

    #[must_use]
    pub fn from_trs(position: Vec3, rotation: Quat, scale: Vec3) -> Self {
        let mut transform = Self::new();
        transform.position = position;
        transform.rotation = rotation;
        transform.scale = scale;
        transform.update_local_matrix();
        transform
    }

    /// Rebuilds the cached matrix if the TRS changed. Returns whether it did.
    pub fn update_local_matrix(&mut self) -> bool {
        let changed = self.position != self.last_position
            || self.rotation != self.last_rotation
            || self.scale != self.last_scale;

        if changed {
            self.local_matrix =
                Affine3A::from_scale_rotation_translation(self.scale, self.rotation, self.position);
            self.last_position = self.position;
            self.last_rotation = self.rotation;
            self.last_scale = self.scale;
        }
        changed
    }

    /// The local matrix for the current TRS.
    #[must_use]
    pub fn local_matrix(&self) -> Affine3A {
        if self.position == self.last_position
            && self.rotation == self.last_rotation
            && self.scale == self.last_scale
        {
            self.local_matrix
        } else {
            Affine3A::from_scale_rotation_translation(self.scale, self.rotation, self.position)
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}
