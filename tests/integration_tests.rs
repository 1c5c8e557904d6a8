// Integration tests for School Search
//
// Builds predicates from filter specs and evaluates them against a
// deterministic in-memory dataset.

use school_search::core::{
    build_clauses, haversine_km, ClauseBuilder, ClubsTable, GeoConfig, Predicate, SchoolSchema,
    SchoolsTable,
};
use school_search::models::{
    ChildGender, ClubRecord, ClubType, FilterSpec, GenderPolicy, OfstedRating, SchoolRecord,
};
use school_search::services::InMemorySchools;

const TOWNS: &[(&str, f64, f64)] = &[
    ("Milton Keynes", 52.0406, -0.7594),
    ("Bedford", 52.1360, -0.4667),
    ("Northampton", 52.2405, -0.9027),
    ("Luton", 51.8787, -0.4200),
    ("Inverness", 57.4778, -4.2247),
];

const TYPES: &[&str] = &["Academy", "Community school", "Free school", "Independent school"];

fn rating_for(i: usize) -> Option<OfstedRating> {
    match (i / 5) % 5 {
        0 => None,
        n => OfstedRating::try_from(n as i64).ok(),
    }
}

fn gender_for(i: usize) -> GenderPolicy {
    match i % 7 {
        0 => GenderPolicy::Boys,
        1 => GenderPolicy::Girls,
        2 => GenderPolicy::Other("boys with mixed sixth form".to_string()),
        _ => GenderPolicy::CoEd,
    }
}

fn create_dataset() -> InMemorySchools {
    let mut schools = Vec::new();
    let mut clubs = Vec::new();

    for i in 0..200usize {
        let (council, lat, lng) = TOWNS[i % TOWNS.len()];
        // Spread schools up to ~0.2 degrees around each town
        let offset_lat = ((i * 37) % 41) as f64 / 100.0 - 0.2;
        let offset_lng = ((i * 53) % 43) as f64 / 100.0 - 0.21;
        let from = [2, 4, 11, 16][i % 4];
        let urn = 100_000 + i as i64;

        schools.push(SchoolRecord {
            urn,
            name: format!("{} School {}", council, i),
            council: council.to_string(),
            age_range_from: from,
            age_range_to: from + [2, 7, 5, 3][(i / 4) % 4],
            gender_policy: gender_for(i),
            school_type: TYPES[i % TYPES.len()].to_string(),
            ofsted_rating: rating_for(i),
            faith: if i % 6 == 0 { Some("Church of England".to_string()) } else { None },
            is_private: i % TYPES.len() == 3,
            lat: lat + offset_lat,
            lng: lng + offset_lng,
        });

        if i % 3 == 0 {
            clubs.push(ClubRecord { school_id: urn, club_type: ClubType::Breakfast });
        }
        if i % 4 == 0 {
            clubs.push(ClubRecord { school_id: urn, club_type: ClubType::AfterSchool });
        }
        // Duplicate club rows must not change results
        if i % 9 == 0 {
            clubs.push(ClubRecord { school_id: urn, club_type: ClubType::Breakfast });
        }
    }

    InMemorySchools::new(schools, clubs)
}

fn search<'a>(store: &'a InMemorySchools, spec: &FilterSpec) -> Vec<&'a SchoolRecord> {
    let clauses = build_clauses(spec, &SchoolsTable::default(), Some(&ClubsTable::default()));
    store.search(&clauses)
}

#[test]
fn test_integration_age_containment() {
    let store = create_dataset();

    for age in [3, 5, 11, 16, 18] {
        let spec = FilterSpec {
            child_age: Some(age),
            ..FilterSpec::default()
        };
        let results = search(&store, &spec);

        assert!(!results.is_empty(), "Expected schools for age {}", age);
        for school in results {
            assert!(school.age_range_from <= age && age <= school.age_range_to);
        }
    }
}

#[test]
fn test_integration_ofsted_threshold_excludes_unrated() {
    let store = create_dataset();

    for threshold in [
        OfstedRating::Outstanding,
        OfstedRating::Good,
        OfstedRating::RequiresImprovement,
        OfstedRating::Inadequate,
    ] {
        let spec = FilterSpec {
            min_ofsted_rating: Some(threshold),
            ..FilterSpec::default()
        };
        let results = search(&store, &spec);

        assert!(!results.is_empty());
        for school in &results {
            let rating = school.ofsted_rating.expect("unrated school returned");
            assert!(rating.at_least(threshold));
        }
    }

    // Even the loosest threshold drops unrated schools
    let loosest = FilterSpec {
        min_ofsted_rating: Some(OfstedRating::Inadequate),
        ..FilterSpec::default()
    };
    assert_eq!(search(&store, &loosest).len(), 160);
}

#[test]
fn test_integration_gender_policy() {
    let store = create_dataset();
    let everything = search(&store, &FilterSpec::default()).len();

    let for_girl = FilterSpec {
        child_gender: Some(ChildGender::Female),
        ..FilterSpec::default()
    };
    let girls_results = search(&store, &for_girl);
    assert!(girls_results.iter().all(|s| s.gender_policy != GenderPolicy::Boys));
    assert!(girls_results
        .iter()
        .any(|s| matches!(s.gender_policy, GenderPolicy::Other(_))));

    let for_boy = FilterSpec {
        child_gender: Some(ChildGender::Male),
        ..FilterSpec::default()
    };
    assert!(search(&store, &for_boy)
        .iter()
        .all(|s| s.gender_policy != GenderPolicy::Girls));

    let unspecified = FilterSpec {
        child_gender: Some(ChildGender::Unspecified),
        ..FilterSpec::default()
    };
    assert_eq!(search(&store, &unspecified).len(), everything);
}

#[test]
fn test_integration_exact_distance_is_subset_of_bounding_box() {
    let store = create_dataset();
    let schools = SchoolsTable::default();
    let bbox_only = GeoConfig::default().without_haversine();
    let everything = search(&store, &FilterSpec::default());

    for (_, lat, lng) in TOWNS {
        for km in [1.0, 5.0, 12.5, 30.0] {
            let spec = FilterSpec::near(*lat, *lng, km);

            let within: Vec<i64> = everything
                .iter()
                .filter(|s| haversine_km(s.lat, s.lng, *lat, *lng) <= km)
                .map(|s| s.urn)
                .collect();
            let boxed = ClauseBuilder::new(&schools).with_geo(bbox_only.clone()).build(&spec);
            let boxed_urns: Vec<i64> = store.search(&boxed).iter().map(|s| s.urn).collect();

            for urn in &within {
                assert!(boxed_urns.contains(urn), "{} within {}km but outside the box", urn, km);
            }

            let exact = ClauseBuilder::new(&schools).build(&spec);
            let exact_urns: Vec<i64> = store.search(&exact).iter().map(|s| s.urn).collect();
            assert_eq!(exact_urns, within);
        }
    }
}

#[test]
fn test_integration_distance_matches_brute_force() {
    let store = create_dataset();
    let (_, lat, lng) = TOWNS[0];
    let everything = search(&store, &FilterSpec::default());

    let expected: Vec<i64> = everything
        .iter()
        .filter(|s| haversine_km(s.lat, s.lng, lat, lng) <= 10.0)
        .map(|s| s.urn)
        .collect();
    let found: Vec<i64> = search(&store, &FilterSpec::near(lat, lng, 10.0))
        .iter()
        .map(|s| s.urn)
        .collect();

    assert!(!expected.is_empty());
    assert_eq!(found, expected);
}

#[test]
fn test_integration_club_filters() {
    let store = create_dataset();
    let spec = FilterSpec {
        has_breakfast_club: Some(true),
        has_afterschool_club: Some(true),
        ..FilterSpec::default()
    };

    let results = search(&store, &spec);

    // Every 12th school has both clubs
    assert_eq!(results.len(), 17);
    assert!(results.iter().all(|s| (s.urn - 100_000) % 12 == 0));
}

#[test]
fn test_integration_club_filter_idempotent() {
    let store = create_dataset();
    let schools = SchoolsTable::default();
    let clubs = ClubsTable::default();
    let spec = FilterSpec {
        has_breakfast_club: Some(true),
        ..FilterSpec::default()
    };

    let once = build_clauses(&spec, &schools, Some(&clubs));
    let twice = build_clauses(&spec.clone(), &schools, Some(&clubs));
    assert_eq!(once, twice);
    assert_eq!(once.len(), 1);

    // Duplicate club rows do not duplicate schools
    let results = store.search(&once);
    let mut urns: Vec<i64> = results.iter().map(|s| s.urn).collect();
    urns.dedup();
    assert_eq!(urns.len(), results.len());
    assert_eq!(results.len(), 67);
}

#[test]
fn test_integration_club_filter_without_club_schema() {
    let store = create_dataset();
    let spec = FilterSpec {
        has_breakfast_club: Some(true),
        ..FilterSpec::default()
    };

    let clauses = build_clauses(&spec, &SchoolsTable::default(), None);

    assert!(clauses.is_empty());
    assert_eq!(store.search(&clauses).len(), store.len());
}

#[test]
fn test_integration_combined_search() {
    let store = create_dataset();
    let (_, lat, lng) = TOWNS[0];
    let spec = FilterSpec {
        council: Some("Milton Keynes".to_string()),
        child_age: Some(5),
        child_gender: Some(ChildGender::Female),
        min_ofsted_rating: Some(OfstedRating::RequiresImprovement),
        max_distance_km: Some(25.0),
        ref_lat: Some(lat),
        ref_lng: Some(lng),
        is_private: Some(false),
        ..FilterSpec::default()
    };

    let results = search(&store, &spec);

    assert!(!results.is_empty());
    for school in results {
        assert_eq!(school.council, "Milton Keynes");
        assert!(school.age_range_from <= 5 && 5 <= school.age_range_to);
        assert_ne!(school.gender_policy, GenderPolicy::Boys);
        assert!(school.ofsted_rating.is_some_and(|r| r <= OfstedRating::RequiresImprovement));
        assert!(haversine_km(school.lat, school.lng, lat, lng) <= 25.0);
        assert!(!school.is_private);
    }
}

#[test]
fn test_integration_extra_predicates_are_conjoined() {
    let store = create_dataset();
    let schools = SchoolsTable::default();
    let spec = FilterSpec {
        council: Some("Bedford".to_string()),
        extra_predicates: vec![Predicate::eq(schools.school_type(), "Free school")],
        ..FilterSpec::default()
    };

    let results = search(&store, &spec);

    assert!(!results.is_empty());
    assert!(results
        .iter()
        .all(|s| s.council == "Bedford" && s.school_type == "Free school"));
}
