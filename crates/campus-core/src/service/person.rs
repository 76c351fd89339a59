use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    aggregate,
    filters::{parse_filters, FilterColumns},
    models::{Course, Person, PersonFields, PersonInput},
    reconcile::{distinct_courses, reconcile},
    repository::{CourseRepository, PersonRepository},
    resolve::resolve_courses,
    validate::validate_person,
    Error, Result,
};

/// Person use cases.
#[derive(Clone)]
pub struct PersonService {
    persons: Arc<dyn PersonRepository>,
    courses: Arc<dyn CourseRepository>,
    filters: FilterColumns,
}

impl PersonService {
    pub fn new(
        persons: Arc<dyn PersonRepository>,
        courses: Arc<dyn CourseRepository>,
        filters: FilterColumns,
    ) -> Self {
        Self {
            persons,
            courses,
            filters,
        }
    }

    /// Load one person by guid.
    pub async fn get_one_by_guid(&self, guid: &str) -> Result<Person> {
        self.persons.find_one(guid).await
    }

    /// List persons matching the request parameters.
    ///
    /// # Errors
    ///
    /// Parameters outside the allow-list are rejected as `BadInput` before
    /// storage is queried.
    pub async fn get_all<I, K, V>(&self, params: I) -> Result<Vec<Person>>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let filters = parse_filters(params, &self.filters)?;
        self.persons.find_all(&filters).await
    }

    /// Create a person enrolled in the requested courses.
    ///
    /// Validation and course resolution both run; if either fails, every
    /// failure is returned as one aggregated error and nothing is persisted.
    pub async fn create(&self, input: PersonInput) -> Result<Person> {
        let (fields, courses) = self.parse(&input).await?;

        let mut person = Person::new(Uuid::new_v4().to_string(), fields, courses);
        self.persons.save(&mut person, &[]).await?;

        info!(guid = %person.guid, courses = person.courses.len(), "Created person");
        Ok(person)
    }

    /// Replace a person's fields and enrollments.
    ///
    /// # Errors
    ///
    /// A guid that matches nothing returns `NotFound` at once, before the
    /// payload is validated or any course is resolved.
    pub async fn update(&self, guid: &str, input: PersonInput) -> Result<Person> {
        let mut person = self.persons.find_one(guid).await?;
        let (fields, courses) = self.parse(&input).await?;

        let removals = reconcile(&mut person, courses);
        person.apply(fields);
        self.persons.save(&mut person, &removals).await?;

        info!(
            guid = %person.guid,
            removed = removals.len(),
            courses = person.courses.len(),
            "Updated person"
        );
        Ok(person)
    }

    /// Delete a person together with all of their enrollment links.
    ///
    /// Storage failures pass through with their own classification.
    pub async fn delete(&self, guid: &str) -> Result<()> {
        let person = self.persons.find_one(guid).await?;
        self.persons.delete(&person).await?;

        info!(guid = %person.guid, "Deleted person");
        Ok(())
    }

    /// Validate the scalar fields and resolve the desired courses.
    async fn parse(&self, input: &PersonInput) -> Result<(PersonFields, Vec<Course>)> {
        let validated = validate_person(input);
        let (courses, resolve_errors) =
            resolve_courses(self.courses.as_ref(), input.course_guids()).await;

        let outcome = match validated {
            Ok(fields) => aggregate(resolve_errors).map_or(Ok(fields), Err),
            Err(mut errors) => {
                errors.extend(resolve_errors);
                Err(aggregate(errors).unwrap_or_else(|| Error::bad_input("Invalid person")))
            }
        };

        outcome
            .map(|fields| (fields, distinct_courses(courses)))
            .inspect_err(|err| debug!(error = %err, "Rejected person input"))
    }
}
