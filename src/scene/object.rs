use glam::{EulerRot, Quat, Vec3};

use crate::catalog::CatalogItem;
use crate::manipulation::ManipulationController;
use crate::manipulation::gesture::normalize_degrees;
use crate::persistence::SavedItem;
use crate::settings::ManipulationSettings;
use crate::tracking::Pose;

/// Session-unique handle for a placed object. Never reused after removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId(pub(crate) u64);

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// World transform of a placed object: yaw-dominant euler rotation in
/// degrees plus a single uniform scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation_euler: Vec3,
    pub scale: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self { position: Vec3::ZERO, rotation_euler: Vec3::ZERO, scale: 1.0 }
    }
}

impl Transform {
    pub fn from_pose(pose: &Pose) -> Self {
        Self {
            position: pose.position,
            rotation_euler: euler_degrees(pose.rotation),
            scale: 1.0,
        }
    }

    pub fn yaw(&self) -> f32 {
        self.rotation_euler.y
    }

    pub fn set_yaw(&mut self, degrees: f32) {
        self.rotation_euler.y = normalize_degrees(degrees);
    }

    pub fn rotation(&self) -> Quat {
        let r = self.rotation_euler;
        Quat::from_euler(EulerRot::YXZ, r.y.to_radians(), r.x.to_radians(), r.z.to_radians())
    }

    pub fn approx_eq(&self, other: &Transform, epsilon: f32) -> bool {
        self.position.abs_diff_eq(other.position, epsilon)
            && self.rotation().abs_diff_eq(other.rotation(), epsilon)
            && (self.scale - other.scale).abs() <= epsilon
    }
}

/// Euler angles (x, y, z) in degrees, each wrapped into [0, 360).
pub fn euler_degrees(rotation: Quat) -> Vec3 {
    let (y, x, z) = rotation.normalize().to_euler(EulerRot::YXZ);
    Vec3::new(
        normalize_degrees(x.to_degrees()),
        normalize_degrees(y.to_degrees()),
        normalize_degrees(z.to_degrees()),
    )
}

/// Selection indicator state. Purely visual; carries no transform meaning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionVisual {
    pub outline: bool,
    pub handles: bool,
    pub delete_affordance: bool,
}

impl SelectionVisual {
    fn set(&mut self, selected: bool) {
        self.outline = selected;
        self.handles = selected;
        self.delete_affordance = selected;
    }
}

/// A live instance of a catalog item in the room.
pub struct PlacedObject {
    pub id: ObjectId,
    pub catalog_id: String,
    pub name: String,
    /// Unscaled footprint in metres, from the catalog.
    pub dimensions_m: Vec3,
    pub transform: Transform,
    pub visual: SelectionVisual,
    pub manipulator: ManipulationController,
    delete_requested: bool,
}

impl PlacedObject {
    pub fn new(
        id: ObjectId,
        item: &CatalogItem,
        mut transform: Transform,
        limits: ManipulationSettings,
    ) -> Self {
        transform.scale = limits.clamp_scale(transform.scale);
        Self {
            id,
            catalog_id: item.id.clone(),
            name: item.name.clone(),
            dimensions_m: item.dimensions_m(),
            transform,
            visual: SelectionVisual::default(),
            manipulator: ManipulationController::new(limits),
            delete_requested: false,
        }
    }

    pub fn is_selected(&self) -> bool {
        self.manipulator.is_selected()
    }

    pub fn set_selected(&mut self, selected: bool) {
        self.visual.set(selected);
        self.manipulator.set_selected(selected);
    }

    /// Set the uniform scale outright, clamped to the manipulation bounds.
    pub fn set_scale_direct(&mut self, scale: f32) {
        self.transform.scale = self.manipulator.limits().clamp_scale(scale);
    }

    pub fn save_snapshot(&self) -> SavedItem {
        SavedItem {
            model_id: self.catalog_id.clone(),
            position: self.transform.position,
            rotation_euler: self.transform.rotation_euler,
            scale: self.transform.scale,
        }
    }

    /// Flag this object for removal through the delete affordance. The owning
    /// controller performs the removal on its next tick.
    pub fn request_delete(&mut self) {
        if self.visual.delete_affordance {
            self.delete_requested = true;
        } else {
            log::debug!("Delete requested on unselected object {}", self.id);
        }
    }

    pub fn delete_requested(&self) -> bool {
        self.delete_requested
    }

    /// World-space bounding box: footprint resting on the placement point,
    /// rotated by yaw and uniformly scaled.
    pub fn bounds(&self) -> (Vec3, Vec3) {
        let size = self.dimensions_m * self.transform.scale;
        let half_x = size.x * 0.5;
        let half_z = size.z * 0.5;
        let (sin, cos) = self.transform.yaw().to_radians().sin_cos();
        let extent_x = cos.abs() * half_x + sin.abs() * half_z;
        let extent_z = sin.abs() * half_x + cos.abs() * half_z;

        let p = self.transform.position;
        (
            Vec3::new(p.x - extent_x, p.y, p.z - extent_z),
            Vec3::new(p.x + extent_x, p.y + size.y, p.z + extent_z),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogService;

    fn chair(transform: Transform) -> PlacedObject {
        let catalog = CatalogService::builtin();
        let item = catalog.get("chair_001").unwrap();
        PlacedObject::new(ObjectId(1), item, transform, ManipulationSettings::default())
    }

    #[test]
    fn test_new_clamps_scale() {
        let obj = chair(Transform { scale: 9.0, ..Default::default() });
        assert_eq!(obj.transform.scale, 2.0);
    }

    #[test]
    fn test_set_scale_direct_clamps() {
        let mut obj = chair(Transform::default());
        obj.set_scale_direct(0.1);
        assert_eq!(obj.transform.scale, 0.5);
        obj.set_scale_direct(1.25);
        assert_eq!(obj.transform.scale, 1.25);
    }

    #[test]
    fn test_selection_visual_follows_selection() {
        let mut obj = chair(Transform::default());
        assert!(!obj.is_selected());
        obj.set_selected(true);
        assert!(obj.is_selected());
        assert_eq!(obj.visual, SelectionVisual { outline: true, handles: true, delete_affordance: true });
        obj.set_selected(false);
        assert_eq!(obj.visual, SelectionVisual::default());
    }

    #[test]
    fn test_delete_requires_affordance() {
        let mut obj = chair(Transform::default());
        obj.request_delete();
        assert!(!obj.delete_requested());
        obj.set_selected(true);
        obj.request_delete();
        assert!(obj.delete_requested());
    }

    #[test]
    fn test_snapshot() {
        let mut t = Transform { position: Vec3::new(1.0, 0.0, 2.0), ..Default::default() };
        t.set_yaw(-90.0);
        let snap = chair(t).save_snapshot();
        assert_eq!(snap.model_id, "chair_001");
        assert_eq!(snap.position, Vec3::new(1.0, 0.0, 2.0));
        assert!((snap.rotation_euler.y - 270.0).abs() < 1e-4);
        assert_eq!(snap.scale, 1.0);
    }

    #[test]
    fn test_pose_euler_roundtrip() {
        let rotation = Quat::from_rotation_y(30.0_f32.to_radians());
        let t = Transform::from_pose(&Pose { position: Vec3::ZERO, rotation });
        assert!((t.yaw() - 30.0).abs() < 1e-3);
        assert!(t.rotation().abs_diff_eq(rotation, 1e-5));
    }

    #[test]
    fn test_bounds_rotate_with_yaw() {
        let mut obj = chair(Transform::default());
        obj.dimensions_m = Vec3::new(2.0, 1.0, 1.0);
        let (min, max) = obj.bounds();
        assert!((max.x - min.x - 2.0).abs() < 1e-4);
        obj.transform.set_yaw(90.0);
        let (min, max) = obj.bounds();
        assert!((max.x - min.x - 1.0).abs() < 1e-4);
        assert!((max.z - min.z - 2.0).abs() < 1e-4);
        assert_eq!(min.y, 0.0);
        assert_eq!(max.y, 1.0);
    }
}
