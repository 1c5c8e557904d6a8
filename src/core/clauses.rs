use crate::core::clubs::club_clause;
use crate::core::distance::{distance_clauses, GeoConfig};
use crate::core::predicate::Predicate;
use crate::core::schema::{ClubSchema, SchoolSchema};
use crate::models::{ChildGender, ClubType, FilterSpec, GenderPolicy};

/// Turns a [`FilterSpec`] into an ordered list of predicates to be AND-ed.
///
/// Output order is fixed so the generated query text is stable:
/// council, age, gender, type, ofsted, distance (box then exact),
/// breakfast club, after-school club, faith, private, extra predicates.
#[derive(Clone)]
pub struct ClauseBuilder<'a> {
    schools: &'a dyn SchoolSchema,
    clubs: Option<&'a dyn ClubSchema>,
    geo: GeoConfig,
}

impl<'a> ClauseBuilder<'a> {
    pub fn new(schools: &'a dyn SchoolSchema) -> Self {
        Self {
            schools,
            clubs: None,
            geo: GeoConfig::default(),
        }
    }

    /// Enable club filters against this dataset
    pub fn with_clubs(mut self, clubs: &'a dyn ClubSchema) -> Self {
        self.clubs = Some(clubs);
        self
    }

    pub fn with_geo(mut self, geo: GeoConfig) -> Self {
        self.geo = geo;
        self
    }

    pub fn build(&self, spec: &FilterSpec) -> Vec<Predicate> {
        let schools = self.schools;
        let mut clauses = Vec::new();

        if let Some(council) = &spec.council {
            clauses.push(Predicate::eq(schools.council(), council.as_str()));
        }

        if let Some(age) = spec.child_age {
            clauses.push(Predicate::le(schools.age_range_from(), age));
            clauses.push(Predicate::ge(schools.age_range_to(), age));
        }

        match spec.child_gender {
            Some(ChildGender::Female) => {
                clauses.push(Predicate::ne(schools.gender_policy(), GenderPolicy::Boys.as_str()));
            }
            Some(ChildGender::Male) => {
                clauses.push(Predicate::ne(schools.gender_policy(), GenderPolicy::Girls.as_str()));
            }
            Some(ChildGender::Unspecified) | None => {}
        }

        if let Some(school_type) = &spec.school_type {
            clauses.push(Predicate::eq(schools.school_type(), school_type.as_str()));
        }

        if let Some(rating) = spec.min_ofsted_rating {
            // Lower is better, so "at least this good" is a numeric <=
            clauses.push(Predicate::le(schools.ofsted_rating(), rating.value()));
        }

        match spec.distance() {
            Some((max_km, ref_lat, ref_lng)) => {
                clauses.extend(distance_clauses(max_km, ref_lat, ref_lng, schools, &self.geo));
            }
            None if spec.max_distance_km.is_some() => {
                tracing::debug!("Distance filter requested without a reference point, skipping");
            }
            None => {}
        }

        for (requested, club_type) in [
            (spec.has_breakfast_club, ClubType::Breakfast),
            (spec.has_afterschool_club, ClubType::AfterSchool),
        ] {
            if requested != Some(true) {
                continue;
            }
            match self.clubs {
                Some(clubs) => clauses.push(club_clause(club_type, schools, clubs)),
                None => tracing::debug!("No club dataset configured, skipping {} club filter", club_type),
            }
        }

        if let Some(faith) = &spec.faith {
            clauses.push(Predicate::eq(schools.faith(), faith.as_str()));
        }

        if let Some(is_private) = spec.is_private {
            clauses.push(Predicate::eq(schools.is_private(), is_private));
        }

        clauses.extend(spec.extra_predicates.iter().cloned());

        clauses
    }
}

/// Build predicates with the default geo tuning and a registered
/// `haversine_km` function
pub fn build_clauses(
    spec: &FilterSpec,
    schools: &dyn SchoolSchema,
    clubs: Option<&dyn ClubSchema>,
) -> Vec<Predicate> {
    let mut builder = ClauseBuilder::new(schools);
    if let Some(clubs) = clubs {
        builder = builder.with_clubs(clubs);
    }
    builder.build(spec)
}
