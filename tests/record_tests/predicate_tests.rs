//! Tests for Field and Predicate
//!
//! These tests verify:
//! - Field name parsing against the fixed set
//! - Per-field value parsing and ParseError on malformed numbers
//! - Equality rules (exact name, boolean tokens, grade epsilon)

use slotdb::record::{Field, Predicate, Record, StoredRecord};
use slotdb::SlotError;

fn stored(id: i32, name: &str, grade: f64, course: i32) -> StoredRecord {
    StoredRecord::from_record(&Record::new(id, name, grade, course))
}

// =============================================================================
// Field Tests
// =============================================================================

#[test]
fn test_field_names_parse() {
    assert_eq!("id".parse::<Field>().unwrap(), Field::Id);
    assert_eq!("name".parse::<Field>().unwrap(), Field::Name);
    assert_eq!("isActive".parse::<Field>().unwrap(), Field::IsActive);
    assert_eq!("averageGrade".parse::<Field>().unwrap(), Field::AverageGrade);
    assert_eq!("cours".parse::<Field>().unwrap(), Field::Course);
}

#[test]
fn test_unknown_field_rejected() {
    let err = "course".parse::<Field>().unwrap_err();
    assert!(matches!(err, SlotError::UnknownField(ref f) if f == "course"));

    assert!("ID".parse::<Field>().is_err());
}

#[test]
fn test_field_display_matches_external_name() {
    for field in Field::ALL {
        assert_eq!(field.to_string().parse::<Field>().unwrap(), field);
    }
}

// =============================================================================
// Parsing Tests
// =============================================================================

#[test]
fn test_numeric_values_parse() {
    assert_eq!(Predicate::parse(Field::Id, "17").unwrap(), Predicate::Id(17));
    assert_eq!(Predicate::parse(Field::Id, " -3 ").unwrap(), Predicate::Id(-3));
    assert_eq!(
        Predicate::parse(Field::AverageGrade, "4.25").unwrap(),
        Predicate::AverageGrade(4.25)
    );
    assert_eq!(Predicate::parse(Field::Course, "2").unwrap(), Predicate::Course(2));
}

#[test]
fn test_malformed_numbers_fail() {
    for (field, value) in [
        (Field::Id, "abc"),
        (Field::Id, "12abc"),
        (Field::Id, ""),
        (Field::Id, "99999999999"),
        (Field::AverageGrade, "four"),
        (Field::Course, "2.5"),
    ] {
        let result = Predicate::parse(field, value);
        assert!(
            matches!(result, Err(SlotError::Parse { .. })),
            "{} = {:?} should not parse",
            field,
            value
        );
    }
}

#[test]
fn test_is_active_tokens() {
    for token in ["1", "true", "True"] {
        assert_eq!(
            Predicate::parse(Field::IsActive, token).unwrap(),
            Predicate::IsActive(true)
        );
    }
    for token in ["0", "false", "TRUE", "yes", ""] {
        assert_eq!(
            Predicate::parse(Field::IsActive, token).unwrap(),
            Predicate::IsActive(false)
        );
    }
}

// =============================================================================
// Matching Tests
// =============================================================================

#[test]
fn test_name_matches_exactly() {
    let rec = stored(1, "Ann", 4.5, 2);

    assert!(Predicate::parse(Field::Name, "Ann").unwrap().matches(&rec));
    assert!(!Predicate::parse(Field::Name, "ann").unwrap().matches(&rec));
    assert!(!Predicate::parse(Field::Name, "An").unwrap().matches(&rec));
    assert!(!Predicate::parse(Field::Name, "Ann ").unwrap().matches(&rec));
}

#[test]
fn test_grade_matches_within_epsilon() {
    let rec = stored(1, "Ann", 4.5, 2);

    assert!(Predicate::AverageGrade(4.5).matches(&rec));
    assert!(Predicate::AverageGrade(4.50005).matches(&rec));
    assert!(!Predicate::AverageGrade(4.5002).matches(&rec));
}

#[test]
fn test_course_and_id_match() {
    let rec = stored(7, "Ann", 4.5, 2);

    assert!(Predicate::Course(2).matches(&rec));
    assert!(!Predicate::Course(3).matches(&rec));
    assert!(Predicate::Id(7).matches(&rec));
    assert!(!Predicate::Id(8).matches(&rec));
}

#[test]
fn test_is_active_compares_flag() {
    let live = stored(1, "Ann", 4.5, 2);
    let dead = live.tombstoned();

    assert!(Predicate::IsActive(true).matches(&live));
    assert!(!Predicate::IsActive(true).matches(&dead));
    assert!(Predicate::IsActive(false).matches(&dead));
}

#[test]
fn test_any_matches_everything() {
    assert!(Predicate::Any.matches(&stored(1, "", 0.0, 0)));
}
