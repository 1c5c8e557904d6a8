// Core clause-building exports
pub mod clauses;
pub mod clubs;
pub mod distance;
pub mod predicate;
pub mod schema;

pub use clauses::{build_clauses, ClauseBuilder};
pub use clubs::club_clause;
pub use distance::{bounding_box, distance_clauses, haversine_km, is_within_bounding_box, GeoConfig};
pub use predicate::{render_where, ClubLookup, CmpOp, NoClubs, Predicate, SqlParams, Value};
pub use schema::{ClubSchema, ClubsTable, Column, SchoolField, SchoolSchema, SchoolsTable};
