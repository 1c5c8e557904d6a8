//! School Search - filter-clause composition for school search
//!
//! This library turns a parent's search criteria into an ordered list of
//! predicates over the school dataset, including a two-phase geospatial
//! distance filter and club availability checks. Predicates can be rendered
//! to Postgres SQL or evaluated in memory.

pub mod config;
pub mod core;
pub mod logging;
pub mod models;
pub mod services;

// Re-export commonly used types
pub use crate::core::{build_clauses, haversine_km, render_where, ClauseBuilder, GeoConfig, Predicate};
pub use crate::models::{ChildGender, ClubRecord, ClubType, FilterSpec, GenderPolicy, OfstedRating, SchoolRecord};
