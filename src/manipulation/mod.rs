//! Per-object gesture interpreter.
//!
//! Each [`PlacedObject`](crate::scene::PlacedObject) owns one controller. It
//! stays dormant until the object is selected, then turns the pointer frame
//! of every tick into transform mutations:
//!
//! * one pointer drags the object across the ground plane,
//! * two pointers pinch to scale and twist to rotate about the vertical axis.

pub mod gesture;

use glam::{Vec2, Vec3};

use crate::input::{PointerFrame, PointerPhase};
use crate::scene::Transform;
use crate::settings::ManipulationSettings;
use crate::tracking::Camera;

/// What a tick did to the bound object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ManipulationEvent {
    Idle,
    Began,
    Updated,
    /// All pointers lifted; `before` is the transform when the gesture began.
    Committed { before: Transform, after: Transform },
}

pub struct ManipulationController {
    limits: ManipulationSettings,
    selected: bool,
    manipulating: bool,
    /// Transform when the current gesture began.
    initial: Option<Transform>,
    /// Height of the drag plane, fixed for the duration of a gesture.
    ground_height: f32,
    last_distance: f32,
    last_midpoint: Vec2,
}

impl ManipulationController {
    pub fn new(limits: ManipulationSettings) -> Self {
        Self {
            limits,
            selected: false,
            manipulating: false,
            initial: None,
            ground_height: 0.0,
            last_distance: 0.0,
            last_midpoint: Vec2::ZERO,
        }
    }

    pub fn limits(&self) -> &ManipulationSettings {
        &self.limits
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn is_manipulating(&self) -> bool {
        self.manipulating
    }

    pub fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
        if !selected {
            self.reset_scratch();
        }
    }

    /// Interpret one tick of pointer input against the bound transform.
    pub fn tick(
        &mut self,
        transform: &mut Transform,
        frame: &PointerFrame,
        camera: &Camera,
    ) -> ManipulationEvent {
        if !self.selected {
            return ManipulationEvent::Idle;
        }

        match frame.count() {
            0 => self.end(transform),
            1 => self.single_pointer(transform, frame, camera),
            2 => self.two_pointers(transform, frame, camera),
            // Three or more fingers is not a gesture we interpret.
            _ => ManipulationEvent::Idle,
        }
    }

    fn single_pointer(
        &mut self,
        transform: &mut Transform,
        frame: &PointerFrame,
        camera: &Camera,
    ) -> ManipulationEvent {
        let pointer = frame.active[0];
        match pointer.phase {
            PointerPhase::Began => self.begin(transform),
            PointerPhase::Moved if self.manipulating => {
                if self.drag_to(transform, pointer.position, camera) {
                    ManipulationEvent::Updated
                } else {
                    ManipulationEvent::Idle
                }
            }
            _ => ManipulationEvent::Idle,
        }
    }

    fn two_pointers(
        &mut self,
        transform: &mut Transform,
        frame: &PointerFrame,
        camera: &Camera,
    ) -> ManipulationEvent {
        let (a, b) = (frame.active[0].position, frame.active[1].position);
        let distance = a.distance(b);
        let midpoint = (a + b) * 0.5;

        if frame.any_began() {
            let event = self.begin(transform);
            self.last_distance = distance;
            self.last_midpoint = midpoint;
            return event;
        }

        if !(frame.any_moved() && self.manipulating) {
            return ManipulationEvent::Idle;
        }

        if let Some(scale) = gesture::pinch_scale(transform.scale, self.last_distance, distance, &self.limits) {
            transform.scale = scale;
        }

        if let Some(reference) = camera.world_to_screen(transform.position)
            && let Some(angle) = gesture::twist_degrees(
                self.last_midpoint,
                midpoint,
                reference,
                self.limits.rotation_threshold_px,
            )
        {
            let yaw = self.limits.snap_yaw(transform.yaw() + angle);
            transform.set_yaw(yaw);
        }

        self.last_distance = distance;
        self.last_midpoint = midpoint;
        ManipulationEvent::Updated
    }

    fn begin(&mut self, transform: &Transform) -> ManipulationEvent {
        if self.manipulating {
            return ManipulationEvent::Idle;
        }
        self.manipulating = true;
        self.initial = Some(*transform);
        self.ground_height = transform.position.y;
        ManipulationEvent::Began
    }

    fn end(&mut self, transform: &Transform) -> ManipulationEvent {
        if !self.manipulating {
            return ManipulationEvent::Idle;
        }
        let before = self.initial.unwrap_or(*transform);
        self.reset_scratch();
        ManipulationEvent::Committed { before, after: *transform }
    }

    /// Move to where the screen ray meets the ground plane. Returns false
    /// when the ray misses (pointing at or above the horizon).
    fn drag_to(&self, transform: &mut Transform, screen_pos: Vec2, camera: &Camera) -> bool {
        let ray = camera.screen_ray(screen_pos);
        let plane_point = Vec3::new(0.0, self.ground_height, 0.0);
        match ray.intersect_plane(plane_point, Vec3::Y) {
            Some(t) => {
                transform.position = ray.point_at(t);
                true
            }
            None => false,
        }
    }

    fn reset_scratch(&mut self) {
        self.manipulating = false;
        self.initial = None;
        self.last_distance = 0.0;
        self.last_midpoint = Vec2::ZERO;
    }
}
