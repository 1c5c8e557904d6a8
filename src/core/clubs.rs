use crate::core::predicate::Predicate;
use crate::core::schema::{ClubSchema, SchoolSchema};
use crate::models::ClubType;

/// Existence predicate: the school has at least one club of `club_type`.
///
/// Correlated on the school's URN against the club dataset's school reference.
pub fn club_clause<S, C>(club_type: ClubType, schools: &S, clubs: &C) -> Predicate
where
    S: SchoolSchema + ?Sized,
    C: ClubSchema + ?Sized,
{
    Predicate::ClubExists {
        school_key: schools.urn(),
        school_id: clubs.school_id(),
        club_type_column: clubs.club_type(),
        club_type,
    }
}
