//! Enrollment reconciliation.
//!
//! Given the courses a person is enrolled in and the courses they should be
//! enrolled in, work out which existing links must be dropped. Additions are
//! not enumerated: storage treats the desired list as authoritative and
//! inserts missing links idempotently, but it must be told which links to
//! remove first.

use std::collections::HashSet;

use itertools::Itertools;

use crate::models::{Course, Enrollment, Person};

/// Links of `person_id` to courses in `current` that are absent from `desired`.
///
/// Comparison is by internal course id. Courses without an id were never
/// stored and cannot be linked, so they are ignored on both sides.
pub fn removals(person_id: i64, current: &[Course], desired: &[Course]) -> Vec<Enrollment> {
    let desired_ids: HashSet<i64> = desired.iter().filter_map(|c| c.id).collect();

    current
        .iter()
        .filter_map(|c| c.id)
        .filter(|id| !desired_ids.contains(id))
        .unique()
        .map(|course_id| Enrollment::new(person_id, course_id))
        .collect()
}

/// Reconcile a loaded person against its desired course list.
///
/// Returns the enrollment links to remove, then replaces the person's course
/// collection with exactly `desired`. A person without an id has no stored
/// links, so nothing is removed.
pub fn reconcile(person: &mut Person, desired: Vec<Course>) -> Vec<Enrollment> {
    let removed = person.id.map_or_else(Vec::new, |person_id| {
        removals(person_id, &person.courses, &desired)
    });
    person.courses = desired;
    removed
}

/// Drop repeated courses, keeping the first occurrence of each.
///
/// Stored courses are keyed by id; unsaved ones by guid.
pub fn distinct_courses(courses: Vec<Course>) -> Vec<Course> {
    courses
        .into_iter()
        .unique_by(|c| (c.id, c.id.is_none().then(|| c.guid.clone())))
        .collect()
}
