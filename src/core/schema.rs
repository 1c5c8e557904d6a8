//! Column descriptors for the school and club datasets.
//!
//! The builder never names a table or column directly. It asks a
//! [`SchoolSchema`] / [`ClubSchema`] for them, so any storage binding that can
//! answer those questions can be searched.

use std::fmt;

/// Logical fields of a school record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchoolField {
    Urn,
    Council,
    AgeRangeFrom,
    AgeRangeTo,
    GenderPolicy,
    SchoolType,
    OfstedRating,
    Faith,
    IsPrivate,
    Lat,
    Lng,
}

/// Logical fields of a club record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClubField {
    SchoolId,
    ClubType,
}

/// A physical column together with the logical field it stores
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Column<F> {
    pub table: String,
    pub name: String,
    pub field: F,
}

pub type SchoolColumn = Column<SchoolField>;
pub type ClubColumn = Column<ClubField>;

impl<F> Column<F> {
    pub fn new(table: impl Into<String>, name: impl Into<String>, field: F) -> Self {
        Self {
            table: table.into(),
            name: name.into(),
            field,
        }
    }
}

impl<F> fmt::Display for Column<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.table, self.name)
    }
}

/// Capability set of the school dataset
pub trait SchoolSchema: Send + Sync {
    fn table(&self) -> &str;

    fn column_name(&self, field: SchoolField) -> &str;

    fn column(&self, field: SchoolField) -> SchoolColumn {
        Column::new(self.table(), self.column_name(field), field)
    }

    fn urn(&self) -> SchoolColumn {
        self.column(SchoolField::Urn)
    }

    fn council(&self) -> SchoolColumn {
        self.column(SchoolField::Council)
    }

    fn age_range_from(&self) -> SchoolColumn {
        self.column(SchoolField::AgeRangeFrom)
    }

    fn age_range_to(&self) -> SchoolColumn {
        self.column(SchoolField::AgeRangeTo)
    }

    fn gender_policy(&self) -> SchoolColumn {
        self.column(SchoolField::GenderPolicy)
    }

    fn school_type(&self) -> SchoolColumn {
        self.column(SchoolField::SchoolType)
    }

    fn ofsted_rating(&self) -> SchoolColumn {
        self.column(SchoolField::OfstedRating)
    }

    fn faith(&self) -> SchoolColumn {
        self.column(SchoolField::Faith)
    }

    fn is_private(&self) -> SchoolColumn {
        self.column(SchoolField::IsPrivate)
    }

    fn lat(&self) -> SchoolColumn {
        self.column(SchoolField::Lat)
    }

    fn lng(&self) -> SchoolColumn {
        self.column(SchoolField::Lng)
    }
}

/// Capability set of the club dataset
pub trait ClubSchema: Send + Sync {
    fn table(&self) -> &str;

    fn column_name(&self, field: ClubField) -> &str;

    fn column(&self, field: ClubField) -> ClubColumn {
        Column::new(self.table(), self.column_name(field), field)
    }

    fn school_id(&self) -> ClubColumn {
        self.column(ClubField::SchoolId)
    }

    fn club_type(&self) -> ClubColumn {
        self.column(ClubField::ClubType)
    }
}

/// The `schools` table created by the bundled migrations
#[derive(Debug, Clone)]
pub struct SchoolsTable {
    table: String,
}

impl SchoolsTable {
    pub fn new(table: impl Into<String>) -> Self {
        Self { table: table.into() }
    }
}

impl Default for SchoolsTable {
    fn default() -> Self {
        Self::new("schools")
    }
}

impl SchoolSchema for SchoolsTable {
    fn table(&self) -> &str {
        &self.table
    }

    fn column_name(&self, field: SchoolField) -> &str {
        match field {
            SchoolField::Urn => "urn",
            SchoolField::Council => "council",
            SchoolField::AgeRangeFrom => "age_range_from",
            SchoolField::AgeRangeTo => "age_range_to",
            SchoolField::GenderPolicy => "gender_policy",
            SchoolField::SchoolType => "type",
            SchoolField::OfstedRating => "ofsted_rating",
            SchoolField::Faith => "faith",
            SchoolField::IsPrivate => "is_private",
            SchoolField::Lat => "lat",
            SchoolField::Lng => "lng",
        }
    }
}

/// The `clubs` table created by the bundled migrations
#[derive(Debug, Clone)]
pub struct ClubsTable {
    table: String,
}

impl ClubsTable {
    pub fn new(table: impl Into<String>) -> Self {
        Self { table: table.into() }
    }
}

impl Default for ClubsTable {
    fn default() -> Self {
        Self::new("clubs")
    }
}

impl ClubSchema for ClubsTable {
    fn table(&self) -> &str {
        &self.table
    }

    fn column_name(&self, field: ClubField) -> &str {
        match field {
            ClubField::SchoolId => "school_id",
            ClubField::ClubType => "club_type",
        }
    }
}
