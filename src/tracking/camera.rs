use glam::{Mat4, Quat, Vec2, Vec3};

use crate::util::picking::{project_to_screen, Ray};

/// The device camera as reported by the tracking subsystem for the current
/// frame. Screen coordinates are pixels from the top-left of the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub rotation: Quat,
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
    pub viewport: Vec2,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 1.5, 0.0),
            rotation: Quat::IDENTITY,
            fov_y: 60.0_f32.to_radians(),
            near: 0.05,
            far: 100.0,
            viewport: Vec2::new(1170.0, 2532.0),
        }
    }
}

impl Camera {
    /// A camera at `position` looking at `target` with world-up +Y.
    pub fn looking_at(position: Vec3, target: Vec3, viewport: Vec2) -> Self {
        let view = Mat4::look_at_rh(position, target, Vec3::Y);
        let (_, rotation, _) = view.inverse().to_scale_rotation_translation();
        Self { position, rotation, viewport, ..Default::default() }
    }

    pub fn aspect(&self) -> f32 {
        if self.viewport.y > 0.0 {
            self.viewport.x / self.viewport.y
        } else {
            1.0
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.position).inverse()
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect(), self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn screen_ray(&self, screen_pos: Vec2) -> Ray {
        Ray::from_screen(screen_pos, self.viewport, self.view_projection())
    }

    pub fn world_to_screen(&self, pos: Vec3) -> Option<Vec2> {
        project_to_screen(pos, self.view_projection(), self.viewport)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_ray_points_forward() {
        let cam = Camera::looking_at(Vec3::new(0.0, 1.0, 3.0), Vec3::new(0.0, 1.0, 0.0), Vec2::new(400.0, 400.0));
        let ray = cam.screen_ray(Vec2::new(200.0, 200.0));
        assert!((ray.direction - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-3);
    }

    #[test]
    fn test_world_to_screen_center() {
        let cam = Camera::looking_at(Vec3::new(0.0, 2.0, 2.0), Vec3::ZERO, Vec2::new(640.0, 480.0));
        let pixel = cam.world_to_screen(Vec3::ZERO).unwrap();
        assert!((pixel - Vec2::new(320.0, 240.0)).length() < 1e-2);
    }
}
