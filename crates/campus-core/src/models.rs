//! Domain entities and transient input types.
//!
//! Internal numeric ids are assigned by storage and never serialised; the
//! externally visible identifier of every entity is its `guid`, generated once
//! at creation.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Kind of person. Parsing is case-sensitive: only `professor` and `student`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PersonType {
    Professor,
    Student,
}

/// A course that persons can be enrolled in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    /// Storage-assigned id, `None` until first saved
    #[serde(skip)]
    pub id: Option<i64>,
    pub guid: String,
    pub name: String,
}

impl Course {
    pub fn new(guid: impl Into<String>, fields: CourseFields) -> Self {
        Self {
            id: None,
            guid: guid.into(),
            name: fields.name,
        }
    }

    pub fn apply(&mut self, fields: CourseFields) {
        self.name = fields.name;
    }
}

/// A professor or student with their enrolled courses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    /// Storage-assigned id, `None` until first saved
    #[serde(skip)]
    pub id: Option<i64>,
    pub guid: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub age: u32,
    #[serde(rename = "type")]
    pub person_type: PersonType,
    /// Enrolled courses, no course appears twice
    pub courses: Vec<Course>,
}

impl Person {
    /// Build a not-yet-persisted person from validated fields.
    pub fn new(guid: impl Into<String>, fields: PersonFields, courses: Vec<Course>) -> Self {
        Self {
            id: None,
            guid: guid.into(),
            first_name: fields.first_name,
            last_name: fields.last_name,
            email: fields.email,
            age: fields.age,
            person_type: fields.person_type,
            courses,
        }
    }

    /// Overwrite the scalar fields. Identity and courses are untouched.
    pub fn apply(&mut self, fields: PersonFields) {
        self.first_name = fields.first_name;
        self.last_name = fields.last_name;
        self.email = fields.email;
        self.age = fields.age;
        self.person_type = fields.person_type;
    }
}

/// Raw person payload as received from a client.
///
/// Every key is optional; an absent key takes its zero value and is then
/// rejected by validation where a rule applies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub age: u32,
    #[serde(rename = "type")]
    pub person_type: String,
    /// Desired enrollment state, by course guid
    pub course_guids: Option<Vec<String>>,
}

impl PersonInput {
    /// Desired course guids; absent means no courses.
    pub fn course_guids(&self) -> &[String] {
        self.course_guids.as_deref().unwrap_or_default()
    }
}

/// Raw course payload as received from a client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CourseInput {
    pub name: String,
}

/// Scalar person fields that passed every validation rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonFields {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub age: u32,
    pub person_type: PersonType,
}

/// Course fields that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseFields {
    pub name: String,
}

/// One enrollment link between a person and a course, by internal ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Enrollment {
    pub person_id: i64,
    pub course_id: i64,
}

impl Enrollment {
    pub const fn new(person_id: i64, course_id: i64) -> Self {
        Self {
            person_id,
            course_id,
        }
    }
}
