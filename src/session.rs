//! Top-level wiring: the surface the surrounding UI talks to.

use std::rc::Rc;

use crate::catalog::{CatalogService, UnitSystem};
use crate::error::SceneError;
use crate::input::{InputState, PointerEvent};
use crate::persistence::{LoadOutcome, SaveFileInfo, SaveLoadService, SaveOutcome};
use crate::placement::{Collaborators, PlacementController, PlacementState};
use crate::scene::{ObjectId, PlacedObject};
use crate::settings::Settings;
use crate::status::{self, StatusMessage, StatusReceiver, StatusSender};
use crate::tracking::{Camera, SubscriptionId, SurfaceAdded, SurfaceEvents};

/// Owns the controllers and collaborators for one AR session.
pub struct Session {
    settings: Settings,
    catalog: Rc<CatalogService>,
    placement: PlacementController,
    persistence: SaveLoadService,
    surface_events: SurfaceEvents,
    input: InputState,
    status_tx: StatusSender,
    status_rx: StatusReceiver,
}

impl Session {
    pub fn new(mut settings: Settings, catalog: CatalogService, collaborators: Collaborators) -> Self {
        settings.manipulation.sanitize();
        let (status_tx, status_rx) = status::channel();
        let catalog = Rc::new(catalog);
        let placement = PlacementController::new(
            catalog.clone(),
            settings.manipulation.clone(),
            collaborators,
            status_tx.clone(),
        );
        let persistence = SaveLoadService::new(settings.storage.save_path(), status_tx.clone());

        let mut surface_events = SurfaceEvents::new();
        surface_events.subscribe(placement.surface_status_callback());

        Self {
            settings,
            catalog,
            placement,
            persistence,
            surface_events,
            input: InputState::new(),
            status_tx,
            status_rx,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn catalog(&self) -> &CatalogService {
        &self.catalog
    }

    pub fn units(&self) -> UnitSystem {
        UnitSystem::from_metric_flag(self.settings.display.use_metric_units)
    }

    pub fn placement(&self) -> &PlacementController {
        &self.placement
    }

    pub fn persistence(&self) -> &SaveLoadService {
        &self.persistence
    }

    pub fn state(&self) -> &PlacementState {
        self.placement.state()
    }

    pub fn handle_pointer(&mut self, event: PointerEvent) {
        self.input.handle_event(&event);
    }

    /// Advance one frame with the camera pose the tracker reported for it.
    /// Nothing in the placement core is time-based, so no frame delta is taken.
    pub fn tick(&mut self, camera: &Camera) {
        let frame = self.input.frame();
        self.placement.tick(&frame, camera);
        self.input.begin_frame();
    }

    /// Arm placement of a catalog item by id, or return to idle with `None`.
    /// Returns false (and changes nothing) for an unknown id.
    pub fn set_placement_mode(&mut self, catalog_id: Option<&str>) -> bool {
        match catalog_id {
            Some(id) => match self.catalog.get(id) {
                Some(item) => {
                    let item = item.clone();
                    self.placement.set_placement_mode(Some(&item));
                    true
                }
                None => {
                    self.status_tx.error(&SceneError::UnknownCatalogReference(id.to_string()));
                    false
                }
            },
            None => {
                self.placement.set_placement_mode(None);
                true
            }
        }
    }

    pub fn select_object(&mut self, id: ObjectId) -> bool {
        self.placement.select_object(id)
    }

    pub fn remove_object(&mut self, id: ObjectId) -> bool {
        self.placement.remove_object(id)
    }

    /// Press the selected object's delete affordance.
    pub fn delete_selected(&mut self) -> bool {
        match self.placement.selected() {
            Some(id) => self.placement.request_delete(id),
            None => false,
        }
    }

    pub fn reset_scene(&mut self) {
        self.placement.reset_scene();
    }

    pub fn placed_objects(&self) -> Vec<&PlacedObject> {
        self.placement.placed_objects()
    }

    pub fn save_scene(&self) -> Result<SaveOutcome, SceneError> {
        self.persistence.save_scene(&self.placement)
    }

    pub fn load_scene(&mut self) -> Result<LoadOutcome, SceneError> {
        self.persistence.load_scene(&mut self.placement)
    }

    pub fn delete_saved_scene(&self) -> Result<(), SceneError> {
        self.persistence.delete_saved_scene()
    }

    pub fn has_saved_scene(&self) -> bool {
        self.persistence.has_saved_scene()
    }

    pub fn save_file_info(&self) -> Option<SaveFileInfo> {
        self.persistence.save_file_info()
    }

    /// Entry point for the tracking subsystem's surface notifications.
    pub fn surfaces_added(&mut self, event: &SurfaceAdded) {
        self.surface_events.notify(event);
    }

    pub fn subscribe_surface_added(&mut self, callback: impl FnMut(&SurfaceAdded) + 'static) -> SubscriptionId {
        self.surface_events.subscribe(callback)
    }

    pub fn unsubscribe_surface_added(&mut self, id: SubscriptionId) -> bool {
        self.surface_events.unsubscribe(id)
    }

    pub fn drain_status(&mut self) -> Vec<StatusMessage> {
        self.status_rx.drain()
    }

    pub fn latest_status(&mut self) -> Option<&StatusMessage> {
        self.status_rx.latest()
    }
}
