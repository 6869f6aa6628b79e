//! Placement vs. selection state machine and owner of the object registry.

use std::rc::Rc;

use glam::Vec2;

use crate::catalog::{CatalogItem, CatalogService};
use crate::error::SceneError;
use crate::input::PointerFrame;
use crate::manipulation::ManipulationEvent;
use crate::manipulation::gesture::normalize_degrees;
use crate::persistence::SavedItem;
use crate::scene::{ObjectId, PlacedObject, Registry, Transform};
use crate::settings::ManipulationSettings;
use crate::status::StatusSender;
use crate::tracking::{Camera, ObjectHitTest, PlaneHitTest, SceneSink, SurfaceAdded};

#[derive(Debug, Clone, PartialEq)]
pub enum PlacementState {
    /// Nothing selected, not placing.
    Idle,
    /// Armed to place this item on the next tap.
    PlacementPending(CatalogItem),
    ObjectSelected(ObjectId),
}

/// External collaborators the controller drives.
pub struct Collaborators {
    pub plane_hit: Box<dyn PlaneHitTest>,
    pub object_hit: Box<dyn ObjectHitTest>,
    pub sink: Box<dyn SceneSink>,
}

/// Result of rebuilding the registry from saved entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub loaded: usize,
    /// Catalog ids that could not be resolved, in file order.
    pub skipped: Vec<String>,
}

pub struct PlacementController {
    catalog: Rc<CatalogService>,
    limits: ManipulationSettings,
    registry: Registry,
    state: PlacementState,
    plane_hit: Box<dyn PlaneHitTest>,
    object_hit: Box<dyn ObjectHitTest>,
    sink: Box<dyn SceneSink>,
    status: StatusSender,
}

impl PlacementController {
    pub fn new(
        catalog: Rc<CatalogService>,
        mut limits: ManipulationSettings,
        collaborators: Collaborators,
        status: StatusSender,
    ) -> Self {
        limits.sanitize();
        status.info("Move your device to detect surfaces");
        Self {
            catalog,
            limits,
            registry: Registry::new(),
            state: PlacementState::Idle,
            plane_hit: collaborators.plane_hit,
            object_hit: collaborators.object_hit,
            sink: collaborators.sink,
            status,
        }
    }

    pub fn state(&self) -> &PlacementState {
        &self.state
    }

    pub fn selected(&self) -> Option<ObjectId> {
        match self.state {
            PlacementState::ObjectSelected(id) => Some(id),
            _ => None,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn placed_objects(&self) -> Vec<&PlacedObject> {
        self.registry.iter().collect()
    }

    pub fn object(&self, id: ObjectId) -> Option<&PlacedObject> {
        self.registry.get(id)
    }

    pub fn catalog(&self) -> &CatalogService {
        &self.catalog
    }

    /// One frame of input: tap dispatch, pending deletions, then the
    /// selected object's gesture.
    pub fn tick(&mut self, frame: &PointerFrame, camera: &Camera) {
        if frame.count() == 1
            && let Some(tap) = frame.primary_began()
        {
            self.handle_tap(tap, camera);
        }

        let doomed: Vec<ObjectId> = self
            .registry
            .iter()
            .filter(|o| o.delete_requested())
            .map(|o| o.id)
            .collect();
        for id in doomed {
            self.remove_object(id);
        }

        let Some(id) = self.selected() else {
            return;
        };
        let Some(object) = self.registry.get_mut(id) else {
            return;
        };
        let PlacedObject { transform, manipulator, .. } = object;
        match manipulator.tick(transform, frame, camera) {
            ManipulationEvent::Updated => self.sink.update_transform(id, transform),
            ManipulationEvent::Committed { before, after } => {
                if before != after {
                    log::debug!("Committed {id}: {:?} -> {:?}", before, after);
                }
            }
            ManipulationEvent::Began | ManipulationEvent::Idle => {}
        }
    }

    fn handle_tap(&mut self, screen_point: Vec2, camera: &Camera) {
        if let PlacementState::PlacementPending(item) = &self.state {
            let item = item.clone();
            // Failure is already reported on the status stream.
            let _ = self.try_place(&item, screen_point, camera);
        } else {
            self.try_select(screen_point, camera);
        }
    }

    /// Place `item` where the tap meets a tracked surface. On a miss the
    /// controller stays armed and the registry is untouched.
    fn try_place(&mut self, item: &CatalogItem, screen_point: Vec2, camera: &Camera) -> Result<ObjectId, SceneError> {
        let Some(pose) = self.plane_hit.plane_hit_test(screen_point, camera) else {
            let err = SceneError::SurfaceNotFound;
            self.status.error(&err);
            return Err(err);
        };

        let id = self.spawn(item, Transform::from_pose(&pose));
        self.state = PlacementState::Idle;
        self.status.info(format!("Placed {}", item.name));
        Ok(id)
    }

    fn try_select(&mut self, screen_point: Vec2, camera: &Camera) {
        match self.object_hit.object_hit_test(screen_point, camera, &self.registry) {
            Some(id) => {
                self.select_object(id);
            }
            None => self.deselect(),
        }
    }

    /// Arm placement of `item`, or return to idle with `None`. Either way the
    /// current selection is dropped.
    pub fn set_placement_mode(&mut self, item: Option<&CatalogItem>) {
        self.deselect();
        match item {
            Some(item) => {
                self.status.info(format!("Tap to place {}", item.name));
                self.state = PlacementState::PlacementPending(item.clone());
            }
            None => {
                self.state = PlacementState::Idle;
                self.status.info("Tap an object to select it");
            }
        }
    }

    /// Select `id`, deselecting whatever was selected first. Returns false if
    /// no such object exists.
    pub fn select_object(&mut self, id: ObjectId) -> bool {
        if !self.registry.contains(id) {
            return false;
        }
        self.deselect();
        if let Some(object) = self.registry.get_mut(id) {
            object.set_selected(true);
            self.sink.set_selected(id, true);
        }
        self.state = PlacementState::ObjectSelected(id);
        true
    }

    /// Drop the current selection, if any.
    pub fn deselect(&mut self) {
        let PlacementState::ObjectSelected(id) = self.state else {
            return;
        };
        if let Some(object) = self.registry.get_mut(id) {
            object.set_selected(false);
            self.sink.set_selected(id, false);
        }
        self.state = PlacementState::Idle;
    }

    /// Remove `id` and its rendered counterpart. No-op if absent.
    pub fn remove_object(&mut self, id: ObjectId) -> bool {
        if self.selected() == Some(id) {
            self.deselect();
        }
        match self.registry.remove(id) {
            Some(object) => {
                self.sink.despawn(id);
                log::info!("Removed {} {id}", object.name);
                true
            }
            None => false,
        }
    }

    pub fn reset_scene(&mut self) {
        self.deselect();
        for id in self.registry.clear() {
            self.sink.despawn(id);
        }
        self.state = PlacementState::Idle;
        self.status.info("Scene reset");
    }

    pub fn set_scale_direct(&mut self, id: ObjectId, scale: f32) -> bool {
        let Some(object) = self.registry.get_mut(id) else {
            return false;
        };
        object.set_scale_direct(scale);
        self.sink.update_transform(id, &object.transform);
        true
    }

    /// Route the object's delete affordance. Removal happens on the next tick.
    pub fn request_delete(&mut self, id: ObjectId) -> bool {
        match self.registry.get_mut(id) {
            Some(object) => {
                object.request_delete();
                object.delete_requested()
            }
            None => false,
        }
    }

    pub fn save_snapshots(&self) -> Vec<SavedItem> {
        self.registry.iter().map(PlacedObject::save_snapshot).collect()
    }

    /// Replace the scene with saved entries. Entries whose catalog id no
    /// longer resolves are skipped and listed in the report.
    pub fn load_objects(&mut self, items: &[SavedItem]) -> LoadReport {
        self.reset_scene();

        let mut report = LoadReport::default();
        for saved in items {
            let Some(item) = self.catalog.get(&saved.model_id).cloned() else {
                log::warn!("{}", SceneError::UnknownCatalogReference(saved.model_id.clone()));
                report.skipped.push(saved.model_id.clone());
                continue;
            };
            let transform = Transform {
                position: saved.position,
                rotation_euler: saved.rotation_euler.map(normalize_degrees),
                scale: saved.scale,
            };
            self.spawn(&item, transform);
            report.loaded += 1;
        }
        report
    }

    /// Surface-added reaction: a status update and nothing else.
    pub fn surface_status_callback(&self) -> impl FnMut(&SurfaceAdded) + use<> {
        let status = self.status.clone();
        move |_event| status.info("Surface detected! Tap to place objects.")
    }

    fn spawn(&mut self, item: &CatalogItem, transform: Transform) -> ObjectId {
        let id = self.registry.allocate_id();
        let object = PlacedObject::new(id, item, transform, self.limits.clone());
        self.sink.spawn(id, &object.catalog_id, &object.transform);
        self.registry.insert(object);
        id
    }
}
