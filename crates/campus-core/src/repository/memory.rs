//! In-memory repositories sharing one store.
//!
//! Used as the test double for the services. Lookups are counted so tests can
//! assert which storage calls a use case made, and failures can be injected
//! to check that storage errors pass through unchanged.

use std::{
    collections::BTreeSet,
    sync::{Arc, Mutex, MutexGuard},
};

use async_trait::async_trait;

use super::{course_not_found, person_not_found, CourseRepository, PersonRepository};
use crate::{
    filters::Filters,
    models::{Course, Enrollment, Person},
    Error, Result,
};

#[derive(Debug, Default)]
struct State {
    next_id: i64,
    persons: Vec<Person>,
    courses: Vec<Course>,
    links: BTreeSet<Enrollment>,
    person_lookups: usize,
    course_lookups: usize,
    save_failure: Option<Error>,
    delete_failure: Option<Error>,
}

impl State {
    fn assign_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn hydrate(&self, person: &Person) -> Person {
        let courses = person.id.map_or_else(Vec::new, |person_id| {
            self.links
                .iter()
                .filter(|link| link.person_id == person_id)
                .filter_map(|link| {
                    self.courses
                        .iter()
                        .find(|c| c.id == Some(link.course_id))
                        .cloned()
                })
                .collect()
        });

        Person {
            courses,
            ..person.clone()
        }
    }

    fn check_failure(failure: Option<&Error>) -> Result<()> {
        failure.cloned().map_or(Ok(()), Err)
    }
}

/// Shared in-memory store handing out person and course repositories.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn persons(&self) -> MemoryPersonRepository {
        MemoryPersonRepository {
            store: self.clone(),
        }
    }

    pub fn courses(&self) -> MemoryCourseRepository {
        MemoryCourseRepository {
            store: self.clone(),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>> {
        self.state
            .lock()
            .map_err(|e| Error::internal(format!("memory store poisoned: {e}")))
    }

    /// Seed a course, assigning its id. Returns the stored course.
    pub fn insert_course(&self, guid: &str, name: &str) -> Result<Course> {
        let mut state = self.lock()?;
        let course = Course {
            id: Some(state.assign_id()),
            guid: guid.to_string(),
            name: name.to_string(),
        };
        state.courses.push(course.clone());
        Ok(course)
    }

    /// Seed a person and links to its courses, assigning its id.
    pub fn insert_person(&self, person: Person) -> Result<Person> {
        let mut state = self.lock()?;
        let id = state.assign_id();
        let links: Vec<Enrollment> = person
            .courses
            .iter()
            .filter_map(|c| c.id)
            .map(|course_id| Enrollment::new(id, course_id))
            .collect();
        state.links.extend(links);

        let stored = Person {
            id: Some(id),
            ..person
        };
        state.persons.push(Person {
            courses: Vec::new(),
            ..stored.clone()
        });
        Ok(stored)
    }

    /// Every enrollment link currently stored.
    pub fn enrollments(&self) -> Result<Vec<Enrollment>> {
        Ok(self.lock()?.links.iter().copied().collect())
    }

    /// Number of person guid lookups served so far.
    pub fn person_lookups(&self) -> Result<usize> {
        Ok(self.lock()?.person_lookups)
    }

    /// Number of course guid lookups served so far.
    pub fn course_lookups(&self) -> Result<usize> {
        Ok(self.lock()?.course_lookups)
    }

    /// Make every subsequent save fail with `err`.
    pub fn fail_saves_with(&self, err: Error) -> Result<()> {
        self.lock()?.save_failure = Some(err);
        Ok(())
    }

    /// Make every subsequent delete fail with `err`.
    pub fn fail_deletes_with(&self, err: Error) -> Result<()> {
        self.lock()?.delete_failure = Some(err);
        Ok(())
    }
}

/// Case-insensitive substring match, mirroring SQL `LIKE '%value%'`.
fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn person_column(person: &Person, column: &str) -> Result<String> {
    match column {
        "first_name" => Ok(person.first_name.clone()),
        "last_name" => Ok(person.last_name.clone()),
        "email" => Ok(person.email.clone()),
        "age" => Ok(person.age.to_string()),
        "type" => Ok(person.person_type.to_string()),
        other => Err(Error::bad_input(format!("Invalid filter column: {other}"))),
    }
}

fn course_column(course: &Course, column: &str) -> Result<String> {
    match column {
        "name" => Ok(course.name.clone()),
        other => Err(Error::bad_input(format!("Invalid filter column: {other}"))),
    }
}

fn matches_all<T>(
    item: &T,
    filters: &Filters,
    column: impl Fn(&T, &str) -> Result<String>,
) -> Result<bool> {
    filters.iter().try_fold(true, |acc, (name, value)| {
        column(item, name.as_str()).map(|field| acc && contains(&field, value))
    })
}

/// Person repository view of a [`MemoryStore`].
#[derive(Debug, Clone)]
pub struct MemoryPersonRepository {
    store: MemoryStore,
}

#[async_trait]
impl PersonRepository for MemoryPersonRepository {
    async fn find_all(&self, filters: &Filters) -> Result<Vec<Person>> {
        let state = self.store.lock()?;
        state
            .persons
            .iter()
            .filter_map(|p| match matches_all(p, filters, person_column) {
                Ok(true) => Some(Ok(state.hydrate(p))),
                Ok(false) => None,
                Err(e) => Some(Err(e)),
            })
            .collect()
    }

    async fn find_one(&self, guid: &str) -> Result<Person> {
        let mut state = self.store.lock()?;
        state.person_lookups += 1;
        state
            .persons
            .iter()
            .find(|p| p.guid == guid)
            .map(|p| state.hydrate(p))
            .ok_or_else(|| person_not_found(guid))
    }

    async fn save(&self, person: &mut Person, removals: &[Enrollment]) -> Result<()> {
        let mut state = self.store.lock()?;
        State::check_failure(state.save_failure.as_ref())?;

        for removal in removals {
            state.links.remove(removal);
        }

        let id = match person.id {
            Some(id) => id,
            None => state.assign_id(),
        };
        person.id = Some(id);

        let row = Person {
            courses: Vec::new(),
            ..person.clone()
        };
        match state.persons.iter().position(|p| p.id == Some(id)) {
            Some(pos) => state.persons[pos] = row,
            None => state.persons.push(row),
        }

        let links: Vec<Enrollment> = person
            .courses
            .iter()
            .filter_map(|c| c.id)
            .map(|course_id| Enrollment::new(id, course_id))
            .collect();
        state.links.extend(links);
        Ok(())
    }

    async fn delete(&self, person: &Person) -> Result<()> {
        let mut state = self.store.lock()?;
        State::check_failure(state.delete_failure.as_ref())?;

        state
            .links
            .retain(|link| Some(link.person_id) != person.id);
        state.persons.retain(|p| p.id != person.id);
        Ok(())
    }
}

/// Course repository view of a [`MemoryStore`].
#[derive(Debug, Clone)]
pub struct MemoryCourseRepository {
    store: MemoryStore,
}

#[async_trait]
impl CourseRepository for MemoryCourseRepository {
    async fn find_all(&self, filters: &Filters) -> Result<Vec<Course>> {
        let state = self.store.lock()?;
        state
            .courses
            .iter()
            .filter_map(|c| match matches_all(c, filters, course_column) {
                Ok(true) => Some(Ok(c.clone())),
                Ok(false) => None,
                Err(e) => Some(Err(e)),
            })
            .collect()
    }

    async fn find_one(&self, guid: &str) -> Result<Course> {
        let mut state = self.store.lock()?;
        state.course_lookups += 1;
        state
            .courses
            .iter()
            .find(|c| c.guid == guid)
            .cloned()
            .ok_or_else(|| course_not_found(guid))
    }

    async fn save(&self, course: &mut Course) -> Result<()> {
        let mut state = self.store.lock()?;
        State::check_failure(state.save_failure.as_ref())?;

        let id = match course.id {
            Some(id) => id,
            None => state.assign_id(),
        };
        course.id = Some(id);

        match state.courses.iter().position(|c| c.id == Some(id)) {
            Some(pos) => state.courses[pos] = course.clone(),
            None => state.courses.push(course.clone()),
        }
        Ok(())
    }

    async fn delete(&self, course: &Course) -> Result<()> {
        let mut state = self.store.lock()?;
        State::check_failure(state.delete_failure.as_ref())?;

        state
            .links
            .retain(|link| Some(link.course_id) != course.id);
        state.courses.retain(|c| c.id != course.id);
        Ok(())
    }
}
