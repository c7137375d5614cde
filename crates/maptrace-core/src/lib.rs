//! MapTrace Core Library
//!
//! Platform-agnostic data structures and logic for the MapTrace map
//! annotation tool: drawn features, selection, drawing tools, metrics,
//! viewport state, and persistence. Rendering and hit-precision geometry
//! editing belong to the external map surface.

pub mod features;
pub mod geo;
pub mod metrics;
pub mod persist;
pub mod storage;
pub mod store;
pub mod tools;
pub mod viewport;

pub use features::{Feature, FeatureId, FeatureKind, FeatureStyle, Geometry};
pub use geo::{LatLng, LatLngBounds};
pub use storage::{FileStorage, MemoryStorage, StorageSlot};
pub use store::{FeatureStore, StoreError};
pub use tools::{DrawController, ToolKind};
pub use viewport::Viewport;
