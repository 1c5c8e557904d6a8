use serde::{Deserialize, Serialize};

use crate::core::predicate::Predicate;
use crate::models::domain::OfstedRating;

/// Gender of the child a search is made for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChildGender {
    Male,
    Female,
    /// Any other value; places no constraint on gender policy
    #[serde(other)]
    Unspecified,
}

/// Search criteria for one request.
///
/// Every field is optional and an unset field leaves that dimension
/// unconstrained. The builder only ever borrows a spec.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterSpec {
    pub council: Option<String>,
    pub child_age: Option<i32>,
    pub child_gender: Option<ChildGender>,
    pub school_type: Option<String>,
    pub min_ofsted_rating: Option<OfstedRating>,
    pub max_distance_km: Option<f64>,
    pub ref_lat: Option<f64>,
    pub ref_lng: Option<f64>,
    pub has_breakfast_club: Option<bool>,
    pub has_afterschool_club: Option<bool>,
    pub faith: Option<String>,
    pub is_private: Option<bool>,
    /// Already-built predicates appended after everything else, in order
    #[serde(skip)]
    pub extra_predicates: Vec<Predicate>,
}

impl FilterSpec {
    /// Restrict to schools within `max_distance_km` of a resolved point
    pub fn near(lat: f64, lng: f64, max_distance_km: f64) -> Self {
        Self {
            max_distance_km: Some(max_distance_km),
            ref_lat: Some(lat),
            ref_lng: Some(lng),
            ..Self::default()
        }
    }

    /// Distance inputs, present only when all three are set
    pub fn distance(&self) -> Option<(f64, f64, f64)> {
        match (self.max_distance_km, self.ref_lat, self.ref_lng) {
            (Some(km), Some(lat), Some(lng)) => Some((km, lat, lng)),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty() {
        assert!(FilterSpec::default().is_empty());
        assert!(!FilterSpec::near(52.0, -0.7, 5.0).is_empty());
    }

    #[test]
    fn test_distance_needs_reference_point() {
        let spec = FilterSpec {
            max_distance_km: Some(5.0),
            ref_lat: Some(52.0),
            ..FilterSpec::default()
        };
        assert_eq!(spec.distance(), None);
        assert_eq!(FilterSpec::near(52.0, -0.7, 5.0).distance(), Some((5.0, 52.0, -0.7)));
    }
}
