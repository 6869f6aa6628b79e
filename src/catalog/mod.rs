use std::collections::HashMap;
use std::path::Path;

use glam::Vec3;
use serde::{Serialize, Deserialize};

use crate::error::SceneError;

/// Static metadata for one purchasable furniture model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub model_path: String,
    #[serde(default)]
    pub thumbnail_path: String,
    /// Real-world size in centimetres (width, height, depth).
    pub dimensions_cm: Vec3,
    #[serde(default)]
    pub price: f32,
    #[serde(default)]
    pub buy_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitSystem {
    Metric,
    Imperial,
}

impl UnitSystem {
    pub fn from_metric_flag(use_metric: bool) -> Self {
        if use_metric { UnitSystem::Metric } else { UnitSystem::Imperial }
    }
}

impl CatalogItem {
    pub fn dimensions_m(&self) -> Vec3 {
        self.dimensions_cm / 100.0
    }

    pub fn format_dimensions(&self, units: UnitSystem) -> String {
        let (d, suffix) = match units {
            UnitSystem::Metric => (self.dimensions_cm, "cm"),
            UnitSystem::Imperial => (self.dimensions_cm / 2.54, "in"),
        };
        format!("{:.0} × {:.0} × {:.0} {suffix}", d.x, d.y, d.z)
    }

    pub fn format_price(&self) -> String {
        format!("${:.2}", self.price)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogCategory {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub items: Vec<CatalogItem>,
}

/// The catalog document as stored on disk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogData {
    pub categories: Vec<CatalogCategory>,
}

/// Immutable id -> item lookup, built once at startup.
pub struct CatalogService {
    data: CatalogData,
    /// (category index, item index) per id.
    lookup: HashMap<String, (usize, usize)>,
}

impl CatalogService {
    pub fn new(data: CatalogData) -> Self {
        let mut lookup = HashMap::new();
        for (ci, category) in data.categories.iter().enumerate() {
            for (ii, item) in category.items.iter().enumerate() {
                if lookup.insert(item.id.clone(), (ci, ii)).is_some() {
                    log::warn!("Duplicate catalog id {:?}, keeping the later entry", item.id);
                }
            }
        }
        Self { data, lookup }
    }

    pub fn from_json(json: &str) -> Result<Self, SceneError> {
        let data: CatalogData = serde_json::from_str(json)
            .map_err(|e| SceneError::Catalog(e.to_string()))?;
        Ok(Self::new(data))
    }

    pub fn load(path: &Path) -> Result<Self, SceneError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| SceneError::storage(path, e))?;
        let catalog = Self::from_json(&json)?;
        log::info!(
            "Loaded catalog with {} items in {} categories",
            catalog.len(),
            catalog.data.categories.len()
        );
        Ok(catalog)
    }

    /// Load a catalog document, falling back to the built-in catalog.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::builtin();
        };
        match Self::load(path) {
            Ok(catalog) => catalog,
            Err(e) => {
                log::error!("Error loading catalog: {e}");
                Self::builtin()
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&CatalogItem> {
        self.lookup
            .get(id)
            .map(|&(ci, ii)| &self.data.categories[ci].items[ii])
    }

    pub fn categories(&self) -> &[CatalogCategory] {
        &self.data.categories
    }

    pub fn items(&self) -> impl Iterator<Item = &CatalogItem> {
        self.data.categories.iter().flat_map(|c| c.items.iter())
    }

    pub fn len(&self) -> usize {
        self.lookup.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lookup.is_empty()
    }

    /// The catalog shipped with the app.
    pub fn builtin() -> Self {
        fn item(id: &str, name: &str, file: &str, dims: [f32; 3], price: f32) -> CatalogItem {
            CatalogItem {
                id: id.to_string(),
                name: name.to_string(),
                model_path: format!("Arterior/Models/{file}.glb"),
                thumbnail_path: format!("Arterior/Thumbnails/{file}.png"),
                dimensions_cm: Vec3::from_array(dims),
                price,
                buy_url: format!("https://example.com/{}", id.replace('_', "-")),
            }
        }
        fn category(id: &str, name: &str, items: Vec<CatalogItem>) -> CatalogCategory {
            CatalogCategory { id: id.to_string(), name: name.to_string(), items }
        }

        Self::new(CatalogData {
            categories: vec![
                category("seating", "Seating", vec![
                    item("chair_001", "Minimal Chair", "chair", [55.0, 85.0, 55.0], 79.99),
                    item("sofa_001", "Modern Sofa", "sofa", [200.0, 80.0, 90.0], 599.99),
                ]),
                category("tables", "Tables", vec![
                    item("table_001", "Coffee Table", "table", [120.0, 45.0, 60.0], 199.99),
                ]),
                category("lighting", "Lighting", vec![
                    item("lamp_001", "Floor Lamp", "lamp", [30.0, 160.0, 30.0], 129.99),
                ]),
                category("rugs", "Rugs", vec![
                    item("rug_001", "Area Rug", "rug", [200.0, 1.0, 300.0], 89.99),
                ]),
            ],
        })
    }
}
