use glam::{Mat4, Vec2, Vec3, Vec4Swizzles};

/// A ray in 3D space with origin and direction.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction: direction.normalize_or_zero() }
    }

    /// Create a ray from screen coordinates (pixels) through the camera.
    /// `screen_pos` is in pixels from top-left, `screen_size` is viewport width/height.
    pub fn from_screen(
        screen_pos: Vec2,
        screen_size: Vec2,
        view_proj: Mat4,
    ) -> Self {
        let ndc_x = (2.0 * screen_pos.x / screen_size.x) - 1.0;
        let ndc_y = 1.0 - (2.0 * screen_pos.y / screen_size.y); // Y is flipped

        let inv_vp = view_proj.inverse();

        let near_point = inv_vp.project_point3(Vec3::new(ndc_x, ndc_y, -1.0));
        let far_point = inv_vp.project_point3(Vec3::new(ndc_x, ndc_y, 1.0));

        Self::new(near_point, far_point - near_point)
    }

    /// Intersect ray with an infinite plane defined by a point and normal.
    /// Returns distance along ray if hit, None if parallel or behind.
    pub fn intersect_plane(&self, plane_point: Vec3, plane_normal: Vec3) -> Option<f32> {
        let denom = plane_normal.dot(self.direction);
        if denom.abs() < 1e-7 {
            return None;
        }
        let t = (plane_point - self.origin).dot(plane_normal) / denom;
        if t > 0.0 { Some(t) } else { None }
    }

    /// Slab test against an axis-aligned box. Returns the entry distance, or
    /// zero when the origin is already inside.
    pub fn intersect_aabb(&self, min: Vec3, max: Vec3) -> Option<f32> {
        let inv = self.direction.recip();
        let t1 = (min - self.origin) * inv;
        let t2 = (max - self.origin) * inv;

        let t_near = t1.min(t2).max_element();
        let t_far = t1.max(t2).min_element();

        if t_near > t_far || t_far < 0.0 || t_near.is_nan() || t_far.is_nan() {
            return None;
        }
        Some(t_near.max(0.0))
    }

    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Project a 3D point to 2D screen coordinates.
/// Returns None if the point is behind the camera.
pub fn project_to_screen(pos: Vec3, view_proj: Mat4, screen_size: Vec2) -> Option<Vec2> {
    let clip = view_proj * pos.extend(1.0);
    if clip.w <= 0.0 {
        return None;
    }
    let ndc = clip.xyz() / clip.w;
    Some(Vec2::new(
        (ndc.x + 1.0) * 0.5 * screen_size.x,
        (1.0 - ndc.y) * 0.5 * screen_size.y,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    #[test]
    fn test_ray_plane_hit() {
        let ray = Ray::new(Vec3::new(0.0, 2.0, 0.0), Vec3::new(0.0, -1.0, 1.0));
        let t = ray.intersect_plane(Vec3::ZERO, Vec3::Y).unwrap();
        let p = ray.point_at(t);
        assert!(p.y.abs() < EPSILON);
        assert!((p.z - 2.0).abs() < EPSILON);
    }

    #[test]
    fn test_ray_plane_parallel_and_behind() {
        let flat = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::X);
        assert!(flat.intersect_plane(Vec3::ZERO, Vec3::Y).is_none());

        let up = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::Y);
        assert!(up.intersect_plane(Vec3::ZERO, Vec3::Y).is_none());
    }

    #[test]
    fn test_ray_aabb() {
        let ray = Ray::new(Vec3::new(0.0, 0.5, -5.0), Vec3::Z);
        let t = ray.intersect_aabb(Vec3::splat(-1.0), Vec3::splat(1.0)).unwrap();
        assert!((t - 4.0).abs() < EPSILON);

        let miss = Ray::new(Vec3::new(3.0, 0.5, -5.0), Vec3::Z);
        assert!(miss.intersect_aabb(Vec3::splat(-1.0), Vec3::splat(1.0)).is_none());

        let away = Ray::new(Vec3::new(0.0, 0.5, -5.0), -Vec3::Z);
        assert!(away.intersect_aabb(Vec3::splat(-1.0), Vec3::splat(1.0)).is_none());

        let inside = Ray::new(Vec3::ZERO, Vec3::X);
        assert_eq!(inside.intersect_aabb(Vec3::splat(-1.0), Vec3::splat(1.0)), Some(0.0));
    }

    #[test]
    fn test_screen_roundtrip() {
        let screen = Vec2::new(800.0, 600.0);
        let view = Mat4::look_at_rh(Vec3::new(0.0, 2.0, 5.0), Vec3::ZERO, Vec3::Y);
        let proj = Mat4::perspective_rh(60.0_f32.to_radians(), 800.0 / 600.0, 0.1, 100.0);
        let vp = proj * view;

        let world = Vec3::new(0.3, 0.0, -0.7);
        let pixel = project_to_screen(world, vp, screen).unwrap();
        let ray = Ray::from_screen(pixel, screen, vp);
        let t = ray.intersect_plane(Vec3::ZERO, Vec3::Y).unwrap();
        assert!((ray.point_at(t) - world).length() < 1e-3);
    }

    #[test]
    fn test_project_behind_camera() {
        let view = Mat4::look_at_rh(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), Vec3::Y);
        let proj = Mat4::perspective_rh(1.0, 1.0, 0.1, 100.0);
        assert!(project_to_screen(Vec3::new(0.0, 0.0, 5.0), proj * view, Vec2::splat(100.0)).is_none());
    }
}
