// Model exports
pub mod domain;
pub mod filter;

pub use domain::{BoundingBox, ClubRecord, ClubType, FilterError, GenderPolicy, OfstedRating, SchoolRecord};
pub use filter::{ChildGender, FilterSpec};
