//! product-recs domain crate
//!
//! This crate contains the core recommendation logic following hexagonal architecture:
//! - `model`: Domain entities and value objects
//! - `catalog`: The immutable product catalog
//! - `price`: Price-range parsing
//! - `complement`: Category complementarity table
//! - `tier`: Availability filtering and relevance tiering
//! - `selector` / `explain`: Drains tiers into recommendations with explanations
//! - `reconcile`: Validates and back-fills external generator output
//! - `ports`: Trait definitions for external dependencies (adapters)
//! - `usecases`: Application use cases

pub mod catalog;
pub mod complement;
pub mod explain;
pub mod model;
pub mod ports;
pub mod price;
pub mod reconcile;
pub mod selector;
pub mod tier;
pub mod usecases;

pub use catalog::Catalog;
pub use complement::{ComplementarityMap, ComplementarityReport};
pub use model::*;
pub use ports::*;
pub use price::PriceInterval;
pub use tier::{RelevanceTier, TierBuckets};
