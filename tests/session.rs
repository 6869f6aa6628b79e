use glam::{Vec2, Vec3};

use arterior::catalog::CatalogService;
use arterior::input::PointerEvent;
use arterior::persistence::{LoadOutcome, SaveOutcome};
use arterior::placement::{Collaborators, PlacementState};
use arterior::scene::Transform;
use arterior::settings::Settings;
use arterior::status::StatusKind;
use arterior::tracking::{BoundsHitTest, Camera, FloorPlane, NullSink, SurfaceAdded};
use arterior::Session;

fn camera() -> Camera {
    Camera::looking_at(Vec3::new(0.0, 2.0, 4.0), Vec3::ZERO, Vec2::new(800.0, 800.0))
}

fn session(dir: &tempfile::TempDir) -> Session {
    let mut settings = Settings::default();
    settings.storage.data_dir = Some(dir.path().to_path_buf());
    let collaborators = Collaborators {
        plane_hit: Box::new(FloorPlane::new(0.0)),
        object_hit: Box::new(BoundsHitTest),
        sink: Box::new(NullSink),
    };
    Session::new(settings, CatalogService::builtin(), collaborators)
}

fn tap(session: &mut Session, cam: &Camera, pixel: Vec2) {
    session.handle_pointer(PointerEvent::down(1, pixel));
    session.tick(cam);
    session.handle_pointer(PointerEvent::up(1, pixel));
    session.tick(cam);
}

fn transform_of(session: &Session, catalog_id: &str) -> Transform {
    session
        .placed_objects()
        .into_iter()
        .find(|o| o.catalog_id == catalog_id)
        .map(|o| o.transform)
        .unwrap()
}

#[test]
fn test_place_manipulate_save_and_restore() {
    let dir = tempfile::tempdir().unwrap();
    let cam = camera();
    let mut s = session(&dir);
    s.surfaces_added(&SurfaceAdded { surface_ids: vec![7] });

    let chair_at = Vec3::new(0.5, 0.0, 1.0);
    let table_at = Vec3::new(-1.0, 0.0, -1.0);

    assert!(s.set_placement_mode(Some("chair_001")));
    tap(&mut s, &cam, cam.world_to_screen(chair_at).unwrap());
    assert!(s.set_placement_mode(Some("table_001")));
    tap(&mut s, &cam, cam.world_to_screen(table_at).unwrap());

    assert_eq!(s.placed_objects().len(), 2);
    assert_eq!(s.state(), &PlacementState::Idle);
    assert!(transform_of(&s, "chair_001").position.abs_diff_eq(chair_at, 1e-3));

    // Tap the chair to select it, then pinch it out to twice the size.
    tap(&mut s, &cam, cam.world_to_screen(chair_at + Vec3::new(0.0, 0.4, 0.0)).unwrap());
    let chair_id = s.placement().selected().unwrap();
    assert_eq!(s.placement().object(chair_id).unwrap().catalog_id, "chair_001");

    let center = cam.world_to_screen(chair_at).unwrap();
    s.handle_pointer(PointerEvent::down(1, center - Vec2::new(50.0, 0.0)));
    s.handle_pointer(PointerEvent::down(2, center + Vec2::new(50.0, 0.0)));
    s.tick(&cam);
    s.handle_pointer(PointerEvent::moved(1, center - Vec2::new(100.0, 0.0)));
    s.handle_pointer(PointerEvent::moved(2, center + Vec2::new(100.0, 0.0)));
    s.tick(&cam);
    s.handle_pointer(PointerEvent::up(1, center - Vec2::new(100.0, 0.0)));
    s.handle_pointer(PointerEvent::up(2, center + Vec2::new(100.0, 0.0)));
    s.tick(&cam);
    assert_eq!(transform_of(&s, "chair_001").scale, 2.0);

    // Select the table and drag it across the floor.
    let table_pixel = cam.world_to_screen(table_at + Vec3::new(0.0, 0.2, 0.0)).unwrap();
    s.handle_pointer(PointerEvent::down(1, table_pixel));
    s.tick(&cam);
    assert!(matches!(s.state(), PlacementState::ObjectSelected(id) if *id != chair_id));
    let drop_at = Vec3::new(-1.5, 0.0, -0.5);
    s.handle_pointer(PointerEvent::moved(1, cam.world_to_screen(drop_at).unwrap()));
    s.tick(&cam);
    s.handle_pointer(PointerEvent::up(1, cam.world_to_screen(drop_at).unwrap()));
    s.tick(&cam);
    assert!(transform_of(&s, "table_001").position.abs_diff_eq(drop_at, 1e-3));

    let chair = transform_of(&s, "chair_001");
    let table = transform_of(&s, "table_001");

    let saved = s.save_scene().unwrap();
    assert!(matches!(saved, SaveOutcome::Saved { count: 2, .. }));
    assert!(s.has_saved_scene());

    s.reset_scene();
    assert!(s.placed_objects().is_empty());

    let loaded = s.load_scene().unwrap();
    let LoadOutcome::Loaded(report) = loaded else {
        panic!("expected a loaded scene, got {loaded:?}");
    };
    assert_eq!(report.loaded, 2);
    assert!(report.skipped.is_empty());
    assert!(transform_of(&s, "chair_001").approx_eq(&chair, 1e-4));
    assert!(transform_of(&s, "table_001").approx_eq(&table, 1e-4));

    let texts: Vec<String> = s.drain_status().into_iter().map(|m| m.text).collect();
    assert!(texts.contains(&"Surface detected! Tap to place objects.".to_string()));
    assert!(texts.contains(&"Placed Minimal Chair".to_string()));
    assert!(texts.contains(&"Placed Coffee Table".to_string()));
    assert!(texts.contains(&"Saved 2 objects".to_string()));
    assert_eq!(texts.last().map(String::as_str), Some("Loaded 2 objects"));
}

#[test]
fn test_tap_above_horizon_keeps_placement_armed() {
    let dir = tempfile::tempdir().unwrap();
    let cam = Camera::looking_at(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 1.0, -1.0), Vec2::new(800.0, 800.0));
    let mut s = session(&dir);

    s.set_placement_mode(Some("sofa_001"));
    tap(&mut s, &cam, Vec2::new(400.0, 20.0));

    assert!(s.placed_objects().is_empty());
    assert!(matches!(s.state(), PlacementState::PlacementPending(item) if item.id == "sofa_001"));
    let status = s.latest_status().unwrap();
    assert_eq!(status.kind, StatusKind::SurfaceNotFound);
    assert_eq!(status.text, "No surface detected. Try moving your device.");
}

#[test]
fn test_load_skips_retired_catalog_items() {
    let dir = tempfile::tempdir().unwrap();
    let mut s = session(&dir);
    std::fs::write(
        s.persistence().path(),
        r#"{
            "version": 1,
            "items": [
                {"modelId": "ghost_999", "position": [0, 0, 0], "rotationEuler": [0, 0, 0], "scale": 1},
                {"modelId": "rug_001", "position": [1, 0, 2], "rotationEuler": [0, -90, 0], "scale": 1.5}
            ]
        }"#,
    )
    .unwrap();

    let LoadOutcome::Loaded(report) = s.load_scene().unwrap() else {
        panic!("expected a loaded scene");
    };
    assert_eq!(report.loaded, 1);
    assert_eq!(report.skipped, vec!["ghost_999".to_string()]);

    let rug = transform_of(&s, "rug_001");
    assert_eq!(rug.position, Vec3::new(1.0, 0.0, 2.0));
    assert!((rug.yaw() - 270.0).abs() < 1e-3);
    assert_eq!(rug.scale, 1.5);
    assert_eq!(s.latest_status().unwrap().kind, StatusKind::UnknownCatalogReference);
}

#[test]
fn test_delete_saved_scene() {
    let dir = tempfile::tempdir().unwrap();
    let cam = camera();
    let mut s = session(&dir);

    s.set_placement_mode(Some("lamp_001"));
    tap(&mut s, &cam, cam.world_to_screen(Vec3::ZERO).unwrap());
    s.save_scene().unwrap();
    assert!(s.has_saved_scene());

    s.delete_saved_scene().unwrap();
    assert!(!s.has_saved_scene());
    assert_eq!(s.load_scene().unwrap(), LoadOutcome::NoSavedScene);
    assert_eq!(s.placed_objects().len(), 1);
}
