//! Core of an AR furniture placement app: catalog lookup, tap-to-place,
//! selection, gesture manipulation and room persistence. Rendering and
//! surface tracking sit behind the traits in [`tracking`].

pub mod catalog;
pub mod error;
pub mod input;
pub mod manipulation;
pub mod persistence;
pub mod placement;
pub mod scene;
pub mod session;
pub mod settings;
pub mod status;
pub mod tracking;
pub mod util;

pub use catalog::{CatalogItem, CatalogService};
pub use error::SceneError;
pub use placement::{PlacementController, PlacementState};
pub use session::Session;
pub use settings::Settings;
