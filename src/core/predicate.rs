//! Predicates produced by the clause builder.
//!
//! A predicate can be rendered to a parameterised Postgres fragment with
//! [`Predicate::to_sql`] or evaluated directly against a [`SchoolRecord`]
//! with [`Predicate::matches`]. Both follow SQL semantics: a comparison
//! against a missing value is never true.

use std::cmp::Ordering;
use std::fmt;

use crate::core::distance::haversine_km;
use crate::core::schema::{ClubColumn, SchoolColumn, SchoolField};
use crate::models::{ClubType, SchoolRecord};

/// Scalar operand of a comparison
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Value {
    fn partial_cmp_with(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
            (Value::Int(a), Value::Float(b)) => (*a as f64).partial_cmp(b),
            (Value::Float(a), Value::Int(b)) => a.partial_cmp(&(*b as f64)),
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value as i64)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => write!(f, "'{}'", s.replace('\'', "''")),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Bool(b) => write!(f, "{}", b),
        }
    }
}

/// Comparison operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CmpOp {
    pub fn as_sql(self) -> &'static str {
        match self {
            CmpOp::Eq => "=",
            CmpOp::Ne => "<>",
            CmpOp::Lt => "<",
            CmpOp::Le => "<=",
            CmpOp::Gt => ">",
            CmpOp::Ge => ">=",
        }
    }

    #[inline]
    fn holds(self, ordering: Ordering) -> bool {
        match self {
            CmpOp::Eq => ordering == Ordering::Equal,
            CmpOp::Ne => ordering != Ordering::Equal,
            CmpOp::Lt => ordering == Ordering::Less,
            CmpOp::Le => ordering != Ordering::Greater,
            CmpOp::Gt => ordering == Ordering::Greater,
            CmpOp::Ge => ordering != Ordering::Less,
        }
    }
}

/// A single filter condition over the school dataset.
///
/// A sequence of predicates is always read as their conjunction.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `column <op> value`
    Compare {
        column: SchoolColumn,
        op: CmpOp,
        value: Value,
    },
    /// `function(lat, lng, ref_lat, ref_lng) <= max_km`
    WithinDistance {
        function: String,
        lat: SchoolColumn,
        lng: SchoolColumn,
        ref_lat: f64,
        ref_lng: f64,
        max_km: f64,
    },
    /// At least one club of `club_type` references the school
    ClubExists {
        school_key: SchoolColumn,
        school_id: ClubColumn,
        club_type_column: ClubColumn,
        club_type: ClubType,
    },
    /// Conjunction of nested predicates
    All(Vec<Predicate>),
}

impl Predicate {
    pub fn compare(column: SchoolColumn, op: CmpOp, value: impl Into<Value>) -> Self {
        Predicate::Compare {
            column,
            op,
            value: value.into(),
        }
    }

    pub fn eq(column: SchoolColumn, value: impl Into<Value>) -> Self {
        Self::compare(column, CmpOp::Eq, value)
    }

    pub fn ne(column: SchoolColumn, value: impl Into<Value>) -> Self {
        Self::compare(column, CmpOp::Ne, value)
    }

    pub fn le(column: SchoolColumn, value: impl Into<Value>) -> Self {
        Self::compare(column, CmpOp::Le, value)
    }

    pub fn ge(column: SchoolColumn, value: impl Into<Value>) -> Self {
        Self::compare(column, CmpOp::Ge, value)
    }

    /// Render as a Postgres boolean expression, pushing operands onto `params`
    pub fn to_sql(&self, params: &mut SqlParams) -> String {
        match self {
            Predicate::Compare { column, op, value } => {
                format!("{} {} {}", column, op.as_sql(), params.push(value.clone()))
            }
            Predicate::WithinDistance {
                function,
                lat,
                lng,
                ref_lat,
                ref_lng,
                max_km,
            } => {
                let ref_lat = params.push(Value::Float(*ref_lat));
                let ref_lng = params.push(Value::Float(*ref_lng));
                let max_km = params.push(Value::Float(*max_km));
                format!("{}({}, {}, {}, {}) <= {}", function, lat, lng, ref_lat, ref_lng, max_km)
            }
            Predicate::ClubExists {
                school_key,
                school_id,
                club_type_column,
                club_type,
            } => {
                let club_type = params.push(Value::Text(club_type.as_str().to_string()));
                format!(
                    "EXISTS (SELECT 1 FROM {} WHERE {} = {} AND {} = {})",
                    school_id.table, school_id, school_key, club_type_column, club_type
                )
            }
            Predicate::All(predicates) => {
                if predicates.is_empty() {
                    return "TRUE".to_string();
                }
                let parts: Vec<String> = predicates.iter().map(|p| p.to_sql(params)).collect();
                format!("({})", parts.join(" AND "))
            }
        }
    }

    /// Evaluate against a single school
    pub fn matches<L>(&self, school: &SchoolRecord, clubs: &L) -> bool
    where
        L: ClubLookup + ?Sized,
    {
        match self {
            Predicate::Compare { column, op, value } => field_value(school, column.field)
                .and_then(|stored| stored.partial_cmp_with(value))
                .map_or(false, |ordering| op.holds(ordering)),
            Predicate::WithinDistance {
                ref_lat,
                ref_lng,
                max_km,
                ..
            } => haversine_km(school.lat, school.lng, *ref_lat, *ref_lng) <= *max_km,
            Predicate::ClubExists { club_type, .. } => clubs.has_club(school.urn, *club_type),
            Predicate::All(predicates) => predicates.iter().all(|p| p.matches(school, clubs)),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Compare { column, op, value } => {
                write!(f, "{} {} {}", column, op.as_sql(), value)
            }
            Predicate::WithinDistance {
                function,
                lat,
                lng,
                ref_lat,
                ref_lng,
                max_km,
            } => write!(f, "{}({}, {}, {}, {}) <= {}", function, lat, lng, ref_lat, ref_lng, max_km),
            Predicate::ClubExists {
                school_key,
                school_id,
                club_type_column,
                club_type,
            } => write!(
                f,
                "EXISTS (SELECT 1 FROM {} WHERE {} = {} AND {} = '{}')",
                school_id.table, school_id, school_key, club_type_column, club_type
            ),
            Predicate::All(predicates) => {
                if predicates.is_empty() {
                    return f.write_str("TRUE");
                }
                let parts: Vec<String> = predicates.iter().map(ToString::to_string).collect();
                write!(f, "({})", parts.join(" AND "))
            }
        }
    }
}

/// Answers club existence questions for the in-memory evaluator
pub trait ClubLookup {
    fn has_club(&self, school_urn: i64, club_type: ClubType) -> bool;
}

/// Lookup for a dataset without any clubs
#[derive(Debug, Clone, Copy, Default)]
pub struct NoClubs;

impl ClubLookup for NoClubs {
    fn has_club(&self, _school_urn: i64, _club_type: ClubType) -> bool {
        false
    }
}

/// Bind values collected while rendering, in placeholder order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SqlParams {
    pub values: Vec<Value>,
}

impl SqlParams {
    /// Append a value and return its `$n` placeholder
    pub fn push(&mut self, value: Value) -> String {
        self.values.push(value);
        format!("${}", self.values.len())
    }
}

/// Render a predicate sequence as one `WHERE` body joined with `AND`
pub fn render_where(predicates: &[Predicate]) -> (String, SqlParams) {
    let mut params = SqlParams::default();
    if predicates.is_empty() {
        return ("TRUE".to_string(), params);
    }

    let clauses: Vec<String> = predicates.iter().map(|p| p.to_sql(&mut params)).collect();
    (clauses.join(" AND "), params)
}

fn field_value(school: &SchoolRecord, field: SchoolField) -> Option<Value> {
    match field {
        SchoolField::Urn => Some(Value::Int(school.urn)),
        SchoolField::Council => Some(Value::Text(school.council.clone())),
        SchoolField::AgeRangeFrom => Some(Value::from(school.age_range_from)),
        SchoolField::AgeRangeTo => Some(Value::from(school.age_range_to)),
        SchoolField::GenderPolicy => Some(Value::Text(school.gender_policy.as_str().to_string())),
        SchoolField::SchoolType => Some(Value::Text(school.school_type.clone())),
        SchoolField::OfstedRating => school.ofsted_rating.map(|r| Value::Int(r.value())),
        SchoolField::Faith => school.faith.clone().map(Value::Text),
        SchoolField::IsPrivate => Some(Value::Bool(school.is_private)),
        SchoolField::Lat => Some(Value::Float(school.lat)),
        SchoolField::Lng => Some(Value::Float(school.lng)),
    }
}
