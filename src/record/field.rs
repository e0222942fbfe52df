//! Queryable fields and their equality predicates

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, SlotError};

use super::StoredRecord;

/// Tolerance used when matching `averageGrade`
const GRADE_EPSILON: f64 = 1e-4;

/// A field a caller may search or delete by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Id,
    Name,
    IsActive,
    AverageGrade,
    Course,
}

impl Field {
    /// Every queryable field, in column order
    pub const ALL: [Field; 5] = [
        Field::Id,
        Field::Name,
        Field::IsActive,
        Field::AverageGrade,
        Field::Course,
    ];

    /// External field name
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Id => "id",
            Field::Name => "name",
            Field::IsActive => "isActive",
            Field::AverageGrade => "averageGrade",
            Field::Course => "cours",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = SlotError;

    fn from_str(s: &str) -> Result<Self> {
        Field::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| SlotError::UnknownField(s.to_string()))
    }
}

/// A parsed equality test against one field of a stored record
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Matches every record (used for full listings)
    Any,
    Id(i32),
    /// Exact byte equality with the stored name up to its terminator
    Name(Vec<u8>),
    IsActive(bool),
    /// Matches when |stored - value| < 1e-4
    AverageGrade(f64),
    Course(i32),
}

impl Predicate {
    /// Parse a raw text value for `field`
    ///
    /// `isActive` accepts `1`, `true` and `True` as true; any other text is
    /// false. Numeric fields reject malformed literals.
    pub fn parse(field: Field, value: &str) -> Result<Self> {
        Ok(match field {
            Field::Id => Predicate::Id(parse_number(field, value)?),
            Field::Name => Predicate::Name(value.as_bytes().to_vec()),
            Field::IsActive => Predicate::IsActive(matches!(value, "1" | "true" | "True")),
            Field::AverageGrade => Predicate::AverageGrade(parse_number(field, value)?),
            Field::Course => Predicate::Course(parse_number(field, value)?),
        })
    }

    /// Evaluate against a stored record
    pub fn matches(&self, record: &StoredRecord) -> bool {
        match self {
            Predicate::Any => true,
            Predicate::Id(id) => record.id == *id,
            Predicate::Name(name) => record.name_bytes() == name.as_slice(),
            Predicate::IsActive(active) => record.is_active() == *active,
            Predicate::AverageGrade(grade) => (record.average_grade - grade).abs() < GRADE_EPSILON,
            Predicate::Course(course) => record.course == *course,
        }
    }
}

/// Parse a numeric literal, ignoring surrounding whitespace
fn parse_number<T: FromStr>(field: Field, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| SlotError::Parse {
        field: field.as_str(),
        value: value.to_string(),
    })
}
