//! Use-case orchestration for persons and courses.
//!
//! Each call is a short-lived pipeline: validate and resolve (both always
//! attempted), aggregate failures, and only then load, reconcile and persist.
//! Services hold no mutable state; repositories and filter allow-lists are
//! injected at construction.

mod course;
mod person;

pub use course::CourseService;
pub use person::PersonService;
