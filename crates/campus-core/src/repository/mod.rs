//! Repository traits: the storage boundary of the core.
//!
//! Services depend on these traits only. The SQLite adapters in the `campus`
//! crate implement them for production; [`memory`] provides an in-process
//! double for tests.
//!
//! # Error Conditions
//!
//! - `NotFound`: no row matches the requested guid
//! - `BadInput`: a filter names a column outside the entity's allow-list
//! - `Internal`: the underlying store failed
//!
//! # Atomicity
//!
//! `PersonRepository::save` and both `delete` methods must appear atomic to
//! readers. Within a person save, enrollment removals are applied before the
//! person row and the desired links are written.

pub mod memory;

use async_trait::async_trait;

use crate::{
    filters::Filters,
    models::{Course, Enrollment, Person},
    Error, Result,
};

/// Not-found failure for a person guid lookup.
pub fn person_not_found(guid: &str) -> Error {
    Error::not_found(format!("Person: {guid} Not Found"))
}

/// Not-found failure for a course guid lookup.
pub fn course_not_found(guid: &str) -> Error {
    Error::not_found(format!("Course: {guid} Not Found"))
}

/// Persistence for persons and their enrollment links.
#[async_trait]
pub trait PersonRepository: Send + Sync {
    /// List persons whose columns contain the filter values, courses loaded.
    async fn find_all(&self, filters: &Filters) -> Result<Vec<Person>>;

    /// Load one person by guid with enrolled courses.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when no person has this guid.
    async fn find_one(&self, guid: &str) -> Result<Person>;

    /// Insert or update a person as one unit.
    ///
    /// `person.courses` is the authoritative desired enrollment set. The
    /// `removals` are deleted first, then the person row is written (an
    /// insert assigns `person.id`), then one link per desired course is
    /// inserted if missing.
    async fn save(&self, person: &mut Person, removals: &[Enrollment]) -> Result<()>;

    /// Delete every enrollment link of the person, then the person.
    async fn delete(&self, person: &Person) -> Result<()>;
}

/// Persistence for courses.
#[async_trait]
pub trait CourseRepository: Send + Sync {
    /// List courses whose columns contain the filter values.
    async fn find_all(&self, filters: &Filters) -> Result<Vec<Course>>;

    /// Load one course by guid.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when no course has this guid.
    async fn find_one(&self, guid: &str) -> Result<Course>;

    /// Insert or update a course. An insert assigns `course.id`.
    async fn save(&self, course: &mut Course) -> Result<()>;

    /// Delete every enrollment link to the course, then the course.
    async fn delete(&self, course: &Course) -> Result<()>;
}
