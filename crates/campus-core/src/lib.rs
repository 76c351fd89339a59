//! # Campus Core
//!
//! Domain core of the Campus person/course service: entities, input
//! validation, course reference resolution, enrollment reconciliation and the
//! use-case services that tie them to storage.
//!
//! ## Laws (Compiler Enforced)
//!
//! - No `unwrap()` - returns `Result` instead
//! - No `expect()` - returns `Result` instead
//! - No `panic!()` - returns `Result` instead
//! - No `unsafe` - safe Rust only
//!
//! ## Error Handling
//!
//! Independent failures are collected, never short-circuited, and folded
//! into one [`Error`] with [`aggregate`]. The HTTP status of any outcome is
//! [`Error::status_code`].

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

mod error;
pub mod filters;
pub mod models;
pub mod reconcile;
pub mod repository;
pub mod resolve;
pub mod service;
pub mod validate;

pub use error::{aggregate, Error, ErrorKind, Result};
pub use filters::{parse_filters, FilterColumns, Filters};
pub use models::{
    Course, CourseFields, CourseInput, Enrollment, Person, PersonFields, PersonInput, PersonType,
};
pub use repository::{CourseRepository, PersonRepository};
pub use service::{CourseService, PersonService};
