//! Seams to the surface-tracking and rendering collaborators.

mod camera;
mod events;

pub use camera::Camera;
pub use events::{SubscriptionId, SurfaceAdded, SurfaceEvents};

use glam::{Quat, Vec2, Vec3};

use crate::scene::{ObjectId, Registry, Transform};

/// Position and orientation of a surface hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Pose {
    pub fn at(position: Vec3) -> Self {
        Self { position, rotation: Quat::IDENTITY }
    }
}

/// Query against the tracked real-world surfaces.
pub trait PlaneHitTest {
    fn plane_hit_test(&self, screen_point: Vec2, camera: &Camera) -> Option<Pose>;
}

/// Ray against the placed objects.
pub trait ObjectHitTest {
    fn object_hit_test(&self, screen_point: Vec2, camera: &Camera, objects: &Registry) -> Option<ObjectId>;
}

/// Rendering side of the scene. The placement controller keeps it in
/// lockstep with the registry: every spawn is matched by exactly one despawn.
pub trait SceneSink {
    fn spawn(&mut self, id: ObjectId, catalog_id: &str, transform: &Transform);
    fn update_transform(&mut self, id: ObjectId, transform: &Transform);
    fn set_selected(&mut self, id: ObjectId, selected: bool);
    fn despawn(&mut self, id: ObjectId);
}

/// Headless sink that renders nothing.
#[derive(Debug, Default)]
pub struct NullSink;

impl SceneSink for NullSink {
    fn spawn(&mut self, _id: ObjectId, _catalog_id: &str, _transform: &Transform) {}
    fn update_transform(&mut self, _id: ObjectId, _transform: &Transform) {}
    fn set_selected(&mut self, _id: ObjectId, _selected: bool) {}
    fn despawn(&mut self, _id: ObjectId) {}
}

/// A single infinite horizontal surface, e.g. a known floor. Useful for
/// desktop previews where no tracking subsystem is available.
#[derive(Debug, Clone, Copy)]
pub struct FloorPlane {
    pub height: f32,
}

impl FloorPlane {
    pub fn new(height: f32) -> Self {
        Self { height }
    }
}

impl PlaneHitTest for FloorPlane {
    fn plane_hit_test(&self, screen_point: Vec2, camera: &Camera) -> Option<Pose> {
        let ray = camera.screen_ray(screen_point);
        let t = ray.intersect_plane(Vec3::new(0.0, self.height, 0.0), Vec3::Y)?;
        Some(Pose::at(ray.point_at(t)))
    }
}

/// Hit-tests the yaw-rotated, scaled bounding box of every placed object and
/// returns the nearest one.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoundsHitTest;

impl ObjectHitTest for BoundsHitTest {
    fn object_hit_test(&self, screen_point: Vec2, camera: &Camera, objects: &Registry) -> Option<ObjectId> {
        let ray = camera.screen_ray(screen_point);
        let mut closest: Option<(f32, ObjectId)> = None;
        for object in objects.iter() {
            let (min, max) = object.bounds();
            if let Some(t) = ray.intersect_aabb(min, max) {
                let dominated = closest.is_some_and(|(best, _)| best <= t);
                if !dominated {
                    closest = Some((t, object.id));
                }
            }
        }
        closest.map(|(_, id)| id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogService;
    use crate::scene::PlacedObject;
    use crate::settings::ManipulationSettings;

    fn camera() -> Camera {
        Camera::looking_at(Vec3::new(0.0, 2.0, 4.0), Vec3::ZERO, Vec2::new(800.0, 800.0))
    }

    fn place(registry: &mut Registry, id: &str, position: Vec3) -> ObjectId {
        let catalog = CatalogService::builtin();
        let oid = registry.allocate_id();
        let transform = Transform { position, ..Default::default() };
        registry.insert(PlacedObject::new(oid, catalog.get(id).unwrap(), transform, ManipulationSettings::default()));
        oid
    }

    #[test]
    fn test_floor_hit() {
        let cam = camera();
        let target = Vec3::new(0.5, 0.0, 1.0);
        let pixel = cam.world_to_screen(target).unwrap();
        let pose = FloorPlane::new(0.0).plane_hit_test(pixel, &cam).unwrap();
        assert!((pose.position - target).length() < 1e-3);
        assert_eq!(pose.rotation, Quat::IDENTITY);
    }

    #[test]
    fn test_floor_miss_above_horizon() {
        let cam = Camera::looking_at(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 1.0, -1.0), Vec2::new(800.0, 800.0));
        assert!(FloorPlane::new(0.0).plane_hit_test(Vec2::new(400.0, 10.0), &cam).is_none());
    }

    #[test]
    fn test_bounds_hit_picks_nearest() {
        let cam = camera();
        let mut registry = Registry::new();
        let far = place(&mut registry, "chair_001", Vec3::new(0.0, 0.0, -2.0));
        let near = place(&mut registry, "chair_001", Vec3::new(0.0, 0.0, 1.0));

        let pixel = cam.world_to_screen(Vec3::new(0.0, 0.4, 1.0)).unwrap();
        assert_eq!(BoundsHitTest.object_hit_test(pixel, &cam, &registry), Some(near));

        registry.remove(near);
        let pixel = cam.world_to_screen(Vec3::new(0.0, 0.4, -2.0)).unwrap();
        assert_eq!(BoundsHitTest.object_hit_test(pixel, &cam, &registry), Some(far));
    }

    #[test]
    fn test_bounds_miss() {
        let cam = camera();
        let mut registry = Registry::new();
        place(&mut registry, "chair_001", Vec3::ZERO);
        let pixel = cam.world_to_screen(Vec3::new(2.0, 0.0, 0.0)).unwrap();
        assert!(BoundsHitTest.object_hit_test(pixel, &cam, &registry).is_none());
    }
}
