//! Course reference resolution.
//!
//! Turns the course guids of a person payload into stored courses. Every
//! guid is looked up, in input order, and a failed lookup never stops the
//! others: successes and failures are reported side by side.

use futures::future::join_all;
use itertools::{Either, Itertools};

use crate::{models::Course, repository::CourseRepository, Error};

/// Resolve course guids against the course repository.
///
/// Returns the resolved courses in input order and one failure per guid that
/// could not be resolved. A repeated guid is resolved once per occurrence.
/// Lookups run concurrently; output order still follows input order.
pub async fn resolve_courses(
    repo: &dyn CourseRepository,
    guids: &[String],
) -> (Vec<Course>, Vec<Error>) {
    join_all(guids.iter().map(|guid| repo.find_one(guid)))
        .await
        .into_iter()
        .partition_map(|lookup| match lookup {
            Ok(course) => Either::Left(course),
            Err(err) => Either::Right(err),
        })
}
