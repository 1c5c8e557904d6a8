use std::collections::HashSet;

use crate::core::predicate::{ClubLookup, Predicate};
use crate::models::{ClubRecord, ClubType, SchoolRecord};

/// Read-only snapshot of the school and club datasets.
///
/// Evaluates predicate lists in process, with the same semantics the
/// Postgres rendering has.
#[derive(Debug, Clone, Default)]
pub struct InMemorySchools {
    schools: Vec<SchoolRecord>,
    clubs: HashSet<(i64, ClubType)>,
}

impl InMemorySchools {
    pub fn new(schools: Vec<SchoolRecord>, clubs: Vec<ClubRecord>) -> Self {
        let clubs = clubs
            .into_iter()
            .map(|club| (club.school_id, club.club_type))
            .collect();

        Self { schools, clubs }
    }

    pub fn len(&self) -> usize {
        self.schools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schools.is_empty()
    }

    /// Schools satisfying every predicate, in dataset order
    pub fn search(&self, predicates: &[Predicate]) -> Vec<&SchoolRecord> {
        let matches: Vec<&SchoolRecord> = self
            .schools
            .iter()
            .filter(|school| predicates.iter().all(|p| p.matches(school, self)))
            .collect();

        tracing::debug!(
            "In-memory search: {} predicates, {} of {} schools matched",
            predicates.len(),
            matches.len(),
            self.schools.len()
        );

        matches
    }
}

impl ClubLookup for InMemorySchools {
    fn has_club(&self, school_urn: i64, club_type: ClubType) -> bool {
        self.clubs.contains(&(school_urn, club_type))
    }
}
