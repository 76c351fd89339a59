#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

//! Person use cases driven against the in-memory repositories.

use std::sync::Arc;

use campus_core::{
    repository::memory::MemoryStore,
    validate::{
        AGE_TOO_LOW, EMAIL_INVALID, FIRST_NAME_BLANK, LAST_NAME_BLANK, PERSON_TYPE_INVALID,
    },
    Course, Enrollment, Error, ErrorKind, FilterColumns, Person, PersonInput, PersonService,
    PersonType,
};

struct Fixture {
    store: MemoryStore,
    service: PersonService,
    c1: Course,
    c2: Course,
}

impl Fixture {
    fn new() -> Self {
        let store = MemoryStore::new();
        let c1 = store.insert_course("1", "Test 1").unwrap();
        let c2 = store.insert_course("2", "Test 2").unwrap();
        let service = PersonService::new(
            Arc::new(store.persons()),
            Arc::new(store.courses()),
            FilterColumns::for_persons(),
        );
        Self {
            store,
            service,
            c1,
            c2,
        }
    }

    fn enrollments_of(&self, person: &Person) -> Vec<Enrollment> {
        let id = person.id.unwrap();
        self.store
            .enrollments()
            .unwrap()
            .into_iter()
            .filter(|e| e.person_id == id)
            .collect()
    }
}

fn patrick(course_guids: &[&str]) -> PersonInput {
    PersonInput {
        first_name: "Patrick".into(),
        last_name: "Star".into(),
        email: "pstar@test.com".into(),
        age: 10,
        person_type: "student".into(),
        course_guids: Some(course_guids.iter().map(ToString::to_string).collect()),
    }
}

#[tokio::test]
async fn create_with_resolvable_courses() {
    let fx = Fixture::new();

    let person = fx.service.create(patrick(&["1", "2"])).await.unwrap();

    assert!(!person.guid.is_empty());
    assert!(person.id.is_some());
    assert_eq!(person.first_name, "Patrick");
    assert_eq!(person.last_name, "Star");
    assert_eq!(person.email, "pstar@test.com");
    assert_eq!(person.age, 10);
    assert_eq!(person.person_type, PersonType::Student);
    assert_eq!(person.courses, vec![fx.c1.clone(), fx.c2.clone()]);

    let reloaded = fx.service.get_one_by_guid(&person.guid).await.unwrap();
    assert_eq!(reloaded, person);
}

#[tokio::test]
async fn create_generates_distinct_guids() {
    let fx = Fixture::new();

    let a = fx.service.create(patrick(&[])).await.unwrap();
    let b = fx.service.create(patrick(&[])).await.unwrap();

    assert_ne!(a.guid, b.guid);
}

#[tokio::test]
async fn create_reports_every_failed_rule() {
    let fx = Fixture::new();
    let input = PersonInput {
        first_name: " ".into(),
        last_name: " ".into(),
        email: " ".into(),
        age: 1,
        person_type: "Foo".into(),
        course_guids: None,
    };

    let err = fx.service.create(input).await.unwrap_err();

    assert_eq!(
        err.messages(),
        vec![
            FIRST_NAME_BLANK,
            LAST_NAME_BLANK,
            EMAIL_INVALID,
            AGE_TOO_LOW,
            PERSON_TYPE_INVALID,
        ]
    );
    assert_eq!(err.kind(), ErrorKind::BadInput);
    assert_eq!(err.status_code(), 400);
}

#[tokio::test]
async fn create_with_unknown_course_persists_nothing() {
    let fx = Fixture::new();

    let err = fx.service.create(patrick(&["1", "3"])).await.unwrap_err();

    assert_eq!(err, Error::not_found("Course: 3 Not Found"));
    assert!(fx.store.enrollments().unwrap().is_empty());
    let empty: [(&str, &str); 0] = [];
    assert!(fx.service.get_all(empty).await.unwrap().is_empty());
}

#[tokio::test]
async fn create_collapses_repeated_course_guids() {
    let fx = Fixture::new();

    let person = fx.service.create(patrick(&["1", "2", "1"])).await.unwrap();

    assert_eq!(person.courses, vec![fx.c1.clone(), fx.c2.clone()]);
    assert_eq!(fx.enrollments_of(&person).len(), 2);
}

#[tokio::test]
async fn update_missing_guid_is_not_found_before_anything_else() {
    let fx = Fixture::new();
    let invalid = PersonInput {
        first_name: String::new(),
        ..patrick(&["1", "nope"])
    };

    let err = fx.service.update("missing-guid", invalid).await.unwrap_err();

    assert_eq!(err, Error::not_found("Person: missing-guid Not Found"));
    assert_eq!(fx.store.person_lookups().unwrap(), 1);
    assert_eq!(fx.store.course_lookups().unwrap(), 0);
}

#[tokio::test]
async fn update_reconciles_enrollments() {
    let fx = Fixture::new();
    let created = fx.service.create(patrick(&["1", "2"])).await.unwrap();

    let updated = fx
        .service
        .update(
            &created.guid,
            PersonInput {
                first_name: "Sandy".into(),
                last_name: "Cheeks".into(),
                email: "sandy@test.com".into(),
                age: 30,
                person_type: "professor".into(),
                course_guids: Some(vec!["2".into()]),
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.guid, created.guid);
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.first_name, "Sandy");
    assert_eq!(updated.person_type, PersonType::Professor);
    assert_eq!(updated.courses, vec![fx.c2.clone()]);
    assert_eq!(
        fx.enrollments_of(&updated),
        vec![Enrollment::new(created.id.unwrap(), fx.c2.id.unwrap())]
    );
}

#[tokio::test]
async fn update_without_course_guids_drops_all_enrollments() {
    let fx = Fixture::new();
    let created = fx.service.create(patrick(&["1", "2"])).await.unwrap();

    let updated = fx
        .service
        .update(
            &created.guid,
            PersonInput {
                course_guids: None,
                ..patrick(&[])
            },
        )
        .await
        .unwrap();

    assert!(updated.courses.is_empty());
    assert!(fx.enrollments_of(&updated).is_empty());
}

#[tokio::test]
async fn update_failure_leaves_stored_person_untouched() {
    let fx = Fixture::new();
    let created = fx.service.create(patrick(&["1"])).await.unwrap();

    let err = fx
        .service
        .update(
            &created.guid,
            PersonInput {
                age: 3,
                ..patrick(&["2", "9"])
            },
        )
        .await
        .unwrap_err();

    assert_eq!(
        err,
        Error::Multiple(vec![
            Error::bad_input(AGE_TOO_LOW),
            Error::not_found("Course: 9 Not Found"),
        ])
    );
    assert_eq!(err.kind(), ErrorKind::NotFound);
    let reloaded = fx.service.get_one_by_guid(&created.guid).await.unwrap();
    assert_eq!(reloaded, created);
}

#[tokio::test]
async fn delete_removes_person_and_links() {
    let fx = Fixture::new();
    let created = fx.service.create(patrick(&["1", "2"])).await.unwrap();

    fx.service.delete(&created.guid).await.unwrap();

    assert!(fx.store.enrollments().unwrap().is_empty());
    let err = fx.service.get_one_by_guid(&created.guid).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn delete_missing_guid_is_not_found() {
    let fx = Fixture::new();

    let err = fx.service.delete("abcd").await.unwrap_err();

    assert_eq!(err, Error::not_found("Person: abcd Not Found"));
}

#[tokio::test]
async fn delete_passes_storage_failure_through() {
    let fx = Fixture::new();
    let created = fx.service.create(patrick(&[])).await.unwrap();
    fx.store
        .fail_deletes_with(Error::internal("Internal Server Error, check log for details"))
        .unwrap();

    let err = fx.service.delete(&created.guid).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Internal);
}

#[tokio::test]
async fn save_failure_is_returned_unchanged() {
    let fx = Fixture::new();
    fx.store
        .fail_saves_with(Error::internal("Internal Server Error, check log for details"))
        .unwrap();

    let err = fx.service.create(patrick(&["1"])).await.unwrap_err();

    assert_eq!(
        err,
        Error::internal("Internal Server Error, check log for details")
    );
}

#[tokio::test]
async fn get_all_applies_filters() {
    let fx = Fixture::new();
    fx.service.create(patrick(&[])).await.unwrap();
    fx.service
        .create(PersonInput {
            first_name: "Squidward".into(),
            last_name: "Tentacles".into(),
            ..patrick(&["1"])
        })
        .await
        .unwrap();

    let found = fx
        .service
        .get_all([("LastName", "tent")])
        .await
        .unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].first_name, "Squidward");
    assert_eq!(found[0].courses, vec![fx.c1.clone()]);
}
