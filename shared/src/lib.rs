pub mod basemap;
pub mod colors;
pub mod download;
pub mod engine;
pub mod geocoding;
pub mod layers;
pub mod reconcile;
pub mod risk;
pub mod tutorial;

pub use basemap::Basemap;
pub use engine::{Camera, LngLat, MapEngine};
pub use geocoding::{ClientConfig, GeocodeResult};
pub use layers::{LayerId, LayerSpec, LayerVisibility};
pub use reconcile::{FeaturePopup, MapController, ReconcileReport};
pub use risk::RiskLevel;
pub use tutorial::{TutorialMachine, TutorialState, TutorialStore};
