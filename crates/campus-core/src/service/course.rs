use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    aggregate,
    filters::{parse_filters, FilterColumns},
    models::{Course, CourseFields, CourseInput},
    repository::CourseRepository,
    validate::validate_course,
    Error, Result,
};

/// Course use cases.
#[derive(Clone)]
pub struct CourseService {
    courses: Arc<dyn CourseRepository>,
    filters: FilterColumns,
}

impl CourseService {
    pub fn new(courses: Arc<dyn CourseRepository>, filters: FilterColumns) -> Self {
        Self { courses, filters }
    }

    pub async fn get_one_by_guid(&self, guid: &str) -> Result<Course> {
        self.courses.find_one(guid).await
    }

    pub async fn get_all<I, K, V>(&self, params: I) -> Result<Vec<Course>>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let filters = parse_filters(params, &self.filters)?;
        self.courses.find_all(&filters).await
    }

    pub async fn create(&self, input: CourseInput) -> Result<Course> {
        let fields = Self::parse(&input)?;

        let mut course = Course::new(Uuid::new_v4().to_string(), fields);
        self.courses.save(&mut course).await?;

        info!(guid = %course.guid, "Created course");
        Ok(course)
    }

    /// Rename a course. An unknown guid returns `NotFound` before validation.
    pub async fn update(&self, guid: &str, input: CourseInput) -> Result<Course> {
        let mut course = self.courses.find_one(guid).await?;
        let fields = Self::parse(&input)?;

        course.apply(fields);
        self.courses.save(&mut course).await?;

        info!(guid = %course.guid, "Updated course");
        Ok(course)
    }

    /// Delete a course and every enrollment link to it.
    pub async fn delete(&self, guid: &str) -> Result<()> {
        let course = self.courses.find_one(guid).await?;
        self.courses.delete(&course).await?;

        info!(guid = %course.guid, "Deleted course");
        Ok(())
    }

    fn parse(input: &CourseInput) -> Result<CourseFields> {
        validate_course(input).map_err(|errors| {
            let err = aggregate(errors).unwrap_or_else(|| Error::bad_input("Invalid course"));
            debug!(error = %err, "Rejected course input");
            err
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{repository::memory::MemoryStore, validate::COURSE_NAME_BLANK};

    fn service(store: &MemoryStore) -> CourseService {
        CourseService::new(Arc::new(store.courses()), FilterColumns::for_courses())
    }

    #[tokio::test]
    async fn test_create_assigns_guid_and_persists() {
        let store = MemoryStore::new();
        let svc = service(&store);

        let course = svc
            .create(CourseInput {
                name: "Marine Biology".into(),
            })
            .await
            .unwrap();

        assert!(!course.guid.is_empty());
        assert!(course.id.is_some());
        assert_eq!(svc.get_one_by_guid(&course.guid).await.unwrap(), course);
    }

    #[tokio::test]
    async fn test_create_rejects_blank_name() {
        let store = MemoryStore::new();

        let err = service(&store)
            .create(CourseInput { name: "  ".into() })
            .await
            .unwrap_err();

        assert_eq!(err, Error::bad_input(COURSE_NAME_BLANK));
    }

    #[tokio::test]
    async fn test_update_unknown_guid_is_not_found() {
        let store = MemoryStore::new();

        let err = service(&store)
            .update("abcd", CourseInput { name: String::new() })
            .await
            .unwrap_err();

        assert_eq!(err, Error::not_found("Course: abcd Not Found"));
    }

    #[tokio::test]
    async fn test_update_renames() {
        let store = MemoryStore::new();
        let svc = service(&store);
        let existing = store.insert_course("c1", "Old").unwrap();

        let updated = svc
            .update("c1", CourseInput { name: "New".into() })
            .await
            .unwrap();

        assert_eq!(updated.id, existing.id);
        assert_eq!(updated.name, "New");
    }

    #[tokio::test]
    async fn test_get_all_filters_by_name() {
        let store = MemoryStore::new();
        store.insert_course("a", "Foo").unwrap();
        store.insert_course("b", "Bar").unwrap();

        let found = service(&store).get_all([("Name", "fo")]).await.unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Foo");
    }

    #[tokio::test]
    async fn test_delete_removes_course() {
        let store = MemoryStore::new();
        let svc = service(&store);
        store.insert_course("c1", "Doomed").unwrap();

        svc.delete("c1").await.unwrap();

        assert!(svc.get_one_by_guid("c1").await.unwrap_err().is_not_found());
    }
}
