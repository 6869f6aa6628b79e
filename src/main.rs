use std::path::PathBuf;

use arterior::catalog::CatalogService;
use arterior::persistence::LoadOutcome;
use arterior::placement::Collaborators;
use arterior::settings::Settings;
use arterior::tracking::{BoundsHitTest, FloorPlane, NullSink};
use arterior::Session;

fn main() {
    env_logger::init();
    log::info!("Starting Arterior");

    let settings = Settings::load();
    let catalog_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| settings.catalog.catalog_path.clone());
    let catalog = CatalogService::load_or_default(catalog_path.as_deref());

    let collaborators = Collaborators {
        plane_hit: Box::new(FloorPlane::new(0.0)),
        object_hit: Box::new(BoundsHitTest),
        sink: Box::new(NullSink),
    };
    let mut session = Session::new(settings, catalog, collaborators);

    if session.catalog().is_empty() {
        log::warn!("Catalog has no items, nothing can be placed");
    }

    let units = session.units();
    for category in session.catalog().categories() {
        println!("{}", category.name);
        for item in &category.items {
            println!(
                "  {:<12} {:<20} {:>24} {:>10}",
                item.id,
                item.name,
                item.format_dimensions(units),
                item.format_price()
            );
        }
    }

    match session.load_scene() {
        Ok(LoadOutcome::Loaded(report)) => {
            println!("\nSaved room ({}):", session.persistence().path().display());
            for object in session.placed_objects() {
                let t = &object.transform;
                println!(
                    "  {} {:<20} pos ({:.2}, {:.2}, {:.2}) yaw {:.0} scale {:.2}",
                    object.id,
                    object.name,
                    t.position.x,
                    t.position.y,
                    t.position.z,
                    t.yaw(),
                    t.scale
                );
            }
            if !report.skipped.is_empty() {
                println!("  skipped: {}", report.skipped.join(", "));
            }
        }
        Ok(LoadOutcome::NoSavedScene) => {}
        Err(e) => log::error!("{e}"),
    }

    for message in session.drain_status() {
        println!("[{:?}] {}", message.kind, message.text);
    }
}
