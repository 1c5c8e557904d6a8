use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors raised when converting raw values into domain types
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FilterError {
    #[error("Invalid Ofsted rating: {0} (expected 1-4)")]
    InvalidOfstedRating(i64),

    #[error("Invalid club type: {0}")]
    InvalidClubType(String),
}

/// Ofsted inspection outcome.
///
/// Ratings form a total order where the numerically smaller value is the
/// better outcome, so `Outstanding < Good < RequiresImprovement < Inadequate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum OfstedRating {
    Outstanding = 1,
    Good = 2,
    RequiresImprovement = 3,
    Inadequate = 4,
}

impl OfstedRating {
    pub fn value(self) -> i64 {
        self as i64
    }

    /// True if this rating is at least as good as `threshold`
    #[inline]
    pub fn at_least(self, threshold: OfstedRating) -> bool {
        self <= threshold
    }
}

impl TryFrom<i64> for OfstedRating {
    type Error = FilterError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(OfstedRating::Outstanding),
            2 => Ok(OfstedRating::Good),
            3 => Ok(OfstedRating::RequiresImprovement),
            4 => Ok(OfstedRating::Inadequate),
            other => Err(FilterError::InvalidOfstedRating(other)),
        }
    }
}

impl From<OfstedRating> for i64 {
    fn from(rating: OfstedRating) -> Self {
        rating.value()
    }
}

/// Admissions gender policy of a school.
///
/// Stored as `co-ed`, `boys` or `girls`. Anything else is kept verbatim and
/// treated as open to every child.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum GenderPolicy {
    CoEd,
    Boys,
    Girls,
    Other(String),
}

impl GenderPolicy {
    pub fn as_str(&self) -> &str {
        match self {
            GenderPolicy::CoEd => "co-ed",
            GenderPolicy::Boys => "boys",
            GenderPolicy::Girls => "girls",
            GenderPolicy::Other(raw) => raw,
        }
    }
}

impl From<&str> for GenderPolicy {
    fn from(value: &str) -> Self {
        match value {
            "co-ed" => GenderPolicy::CoEd,
            "boys" => GenderPolicy::Boys,
            "girls" => GenderPolicy::Girls,
            other => GenderPolicy::Other(other.to_string()),
        }
    }
}

impl From<String> for GenderPolicy {
    fn from(value: String) -> Self {
        GenderPolicy::from(value.as_str())
    }
}

impl From<GenderPolicy> for String {
    fn from(policy: GenderPolicy) -> Self {
        policy.as_str().to_string()
    }
}

impl fmt::Display for GenderPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of wraparound care a school offers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClubType {
    Breakfast,
    AfterSchool,
}

impl ClubType {
    pub fn as_str(self) -> &'static str {
        match self {
            ClubType::Breakfast => "breakfast",
            ClubType::AfterSchool => "after_school",
        }
    }
}

impl std::str::FromStr for ClubType {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "breakfast" => Ok(ClubType::Breakfast),
            "after_school" => Ok(ClubType::AfterSchool),
            other => Err(FilterError::InvalidClubType(other.to_string())),
        }
    }
}

impl fmt::Display for ClubType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// School record as held by the storage layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchoolRecord {
    pub urn: i64,
    pub name: String,
    pub council: String,
    #[serde(rename = "ageRangeFrom")]
    pub age_range_from: i32,
    #[serde(rename = "ageRangeTo")]
    pub age_range_to: i32,
    #[serde(rename = "genderPolicy")]
    pub gender_policy: GenderPolicy,
    #[serde(rename = "type")]
    pub school_type: String,
    #[serde(rename = "ofstedRating", default)]
    pub ofsted_rating: Option<OfstedRating>,
    #[serde(default)]
    pub faith: Option<String>,
    #[serde(rename = "isPrivate", default)]
    pub is_private: bool,
    pub lat: f64,
    pub lng: f64,
}

/// Breakfast or after-school club attached to a school
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClubRecord {
    #[serde(rename = "schoolId")]
    pub school_id: i64,
    #[serde(rename = "clubType")]
    pub club_type: ClubType,
}

/// Geospatial bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}
