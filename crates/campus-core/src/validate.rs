//! Input validation: parse raw client payloads into validated fields.
//!
//! Every rule is evaluated independently; a payload failing five rules
//! reports five failures. Callers aggregate them (see [`crate::aggregate`]).
//! Nothing is written to an entity here, so a rejected payload can never
//! partially mutate one.

use std::{str::FromStr, sync::OnceLock};

use regex::Regex;

use crate::{
    models::{CourseFields, CourseInput, PersonFields, PersonInput, PersonType},
    Error,
};

/// Minimum age for enrolment
pub const MIN_AGE: u32 = 10;

pub const FIRST_NAME_BLANK: &str = "First Name must not be blank";
pub const LAST_NAME_BLANK: &str = "Last Name must not be blank";
pub const EMAIL_INVALID: &str = "Email must be a valid email address";
pub const AGE_TOO_LOW: &str = "Must be at least 10 years old to enrol.";
pub const PERSON_TYPE_INVALID: &str =
    "Invalid Person type, must be either 'professor' or 'student'";
pub const COURSE_NAME_BLANK: &str = "Name must not be blank";

/// Validate a person payload.
///
/// # Errors
///
/// Returns one `BadInput` failure per violated rule, in field order:
/// first name, last name, email, age, type.
pub fn validate_person(input: &PersonInput) -> Result<PersonFields, Vec<Error>> {
    let person_type = PersonType::from_str(&input.person_type).ok();

    let errors: Vec<Error> = [
        is_blank(&input.first_name).then_some(FIRST_NAME_BLANK),
        is_blank(&input.last_name).then_some(LAST_NAME_BLANK),
        (!is_valid_email(&input.email)).then_some(EMAIL_INVALID),
        (input.age < MIN_AGE).then_some(AGE_TOO_LOW),
        person_type.is_none().then_some(PERSON_TYPE_INVALID),
    ]
    .into_iter()
    .flatten()
    .map(Error::bad_input)
    .collect();

    match person_type {
        Some(person_type) if errors.is_empty() => Ok(PersonFields {
            first_name: input.first_name.clone(),
            last_name: input.last_name.clone(),
            email: input.email.clone(),
            age: input.age,
            person_type,
        }),
        _ => Err(errors),
    }
}

/// Validate a course payload.
///
/// # Errors
///
/// Returns a `BadInput` failure when the name is blank.
pub fn validate_course(input: &CourseInput) -> Result<CourseFields, Vec<Error>> {
    if is_blank(&input.name) {
        return Err(vec![Error::bad_input(COURSE_NAME_BLANK)]);
    }

    Ok(CourseFields {
        name: input.name.clone(),
    })
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Syntactic email check (WHATWG `valid email address` grammar).
pub fn is_valid_email(value: &str) -> bool {
    static EMAIL_RE: OnceLock<Option<Regex>> = OnceLock::new();

    EMAIL_RE
        .get_or_init(|| {
            Regex::new(
                r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*$",
            )
            .ok()
        })
        .as_ref()
        .is_some_and(|re| re.is_match(value))
}
