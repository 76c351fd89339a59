//! Person persistence, including enrollment links

use std::str::FromStr;

use async_trait::async_trait;
use campus_core::{
    repository::person_not_found, Course, Enrollment, FilterColumns, Filters, Person,
    PersonRepository, PersonType, Result,
};
use futures::future::try_join_all;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

use super::{course::parse_course_row, invalid_column, log_db_err, query::filter_clause};

const SELECT_PERSON: &str =
    r#"SELECT id, guid, first_name, last_name, email, age, "type" FROM person"#;

const SELECT_ENROLLED_COURSES: &str = "SELECT c.id, c.guid, c.name FROM course c \
     JOIN person_course pc ON pc.course_id = c.id \
     WHERE pc.person_id = ? ORDER BY c.id";

/// SQLite-backed [`PersonRepository`]
#[derive(Clone)]
pub struct SqlPersonRepository {
    pool: SqlitePool,
    columns: FilterColumns,
}

impl SqlPersonRepository {
    pub(crate) fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            columns: FilterColumns::for_persons(),
        }
    }

    async fn with_courses(&self, person: Person) -> Result<Person> {
        let Some(person_id) = person.id else {
            return Ok(person);
        };

        let rows = sqlx::query(SELECT_ENROLLED_COURSES)
            .bind(person_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| log_db_err("Failed to load enrolled courses", &e))?;
        let courses = rows.iter().map(parse_course_row).collect::<Result<Vec<Course>>>()?;

        Ok(Person { courses, ..person })
    }
}

/// Parse a database row into a Person without courses
fn parse_person_row(row: &SqliteRow) -> Result<Person> {
    let id: i64 = row
        .try_get("id")
        .map_err(|e| log_db_err("Failed to read person id", &e))?;
    let guid: String = row
        .try_get("guid")
        .map_err(|e| log_db_err("Failed to read person guid", &e))?;
    let first_name: String = row
        .try_get("first_name")
        .map_err(|e| log_db_err("Failed to read first_name", &e))?;
    let last_name: String = row
        .try_get("last_name")
        .map_err(|e| log_db_err("Failed to read last_name", &e))?;
    let email: String = row
        .try_get("email")
        .map_err(|e| log_db_err("Failed to read email", &e))?;
    let age: i64 = row
        .try_get("age")
        .map_err(|e| log_db_err("Failed to read age", &e))?;
    let type_str: String = row
        .try_get("type")
        .map_err(|e| log_db_err("Failed to read type", &e))?;

    let age = u32::try_from(age).map_err(|_| invalid_column("age", &age))?;
    let person_type =
        PersonType::from_str(&type_str).map_err(|_| invalid_column("type", &type_str))?;

    Ok(Person {
        id: Some(id),
        guid,
        first_name,
        last_name,
        email,
        age,
        person_type,
        courses: Vec::new(),
    })
}

#[async_trait]
impl PersonRepository for SqlPersonRepository {
    async fn find_all(&self, filters: &Filters) -> Result<Vec<Person>> {
        let (clause, values) = filter_clause(filters, &self.columns)?;
        let sql = format!("{SELECT_PERSON}{clause} ORDER BY id");

        let rows = values
            .iter()
            .fold(sqlx::query(&sql), |query, value| query.bind(value.as_str()))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| log_db_err("Failed to list persons", &e))?;

        let persons = rows.iter().map(parse_person_row).collect::<Result<Vec<_>>>()?;
        try_join_all(persons.into_iter().map(|p| self.with_courses(p))).await
    }

    async fn find_one(&self, guid: &str) -> Result<Person> {
        let sql = format!("{SELECT_PERSON} WHERE guid = ?");

        let row = sqlx::query(&sql)
            .bind(guid)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| log_db_err("Failed to load person", &e))?
            .ok_or_else(|| person_not_found(guid))?;

        self.with_courses(parse_person_row(&row)?).await
    }

    async fn save(&self, person: &mut Person, removals: &[Enrollment]) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| log_db_err("Failed to begin transaction", &e))?;

        for removal in removals {
            sqlx::query("DELETE FROM person_course WHERE person_id = ? AND course_id = ?")
                .bind(removal.person_id)
                .bind(removal.course_id)
                .execute(&mut *tx)
                .await
                .map_err(|e| log_db_err("Failed to remove enrollment", &e))?;
        }

        let person_type = person.person_type.to_string();
        let id = match person.id {
            Some(id) => sqlx::query(
                r#"UPDATE person
                   SET guid = ?, first_name = ?, last_name = ?, email = ?, age = ?, "type" = ?
                   WHERE id = ?"#,
            )
            .bind(&person.guid)
            .bind(&person.first_name)
            .bind(&person.last_name)
            .bind(&person.email)
            .bind(i64::from(person.age))
            .bind(&person_type)
            .bind(id)
            .execute(&mut *tx)
            .await
            .map(|_| id)
            .map_err(|e| log_db_err("Failed to update person", &e))?,
            None => sqlx::query(
                r#"INSERT INTO person (guid, first_name, last_name, email, age, "type")
                   VALUES (?, ?, ?, ?, ?, ?)"#,
            )
            .bind(&person.guid)
            .bind(&person.first_name)
            .bind(&person.last_name)
            .bind(&person.email)
            .bind(i64::from(person.age))
            .bind(&person_type)
            .execute(&mut *tx)
            .await
            .map(|result| result.last_insert_rowid())
            .map_err(|e| log_db_err("Failed to create person", &e))?,
        };

        for course_id in person.courses.iter().filter_map(|c| c.id) {
            sqlx::query("INSERT OR IGNORE INTO person_course (person_id, course_id) VALUES (?, ?)")
                .bind(id)
                .bind(course_id)
                .execute(&mut *tx)
                .await
                .map_err(|e| log_db_err("Failed to add enrollment", &e))?;
        }

        tx.commit()
            .await
            .map_err(|e| log_db_err("Failed to commit person save", &e))?;

        person.id = Some(id);
        Ok(())
    }

    async fn delete(&self, person: &Person) -> Result<()> {
        let Some(id) = person.id else {
            return Ok(());
        };

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| log_db_err("Failed to begin transaction", &e))?;

        sqlx::query("DELETE FROM person_course WHERE person_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| log_db_err("Failed to delete person enrollments", &e))?;

        sqlx::query("DELETE FROM person WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| log_db_err("Failed to delete person", &e))?;

        tx.commit()
            .await
            .map_err(|e| log_db_err("Failed to commit person delete", &e))
    }
}
