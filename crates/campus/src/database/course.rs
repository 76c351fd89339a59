//! Course persistence

use async_trait::async_trait;
use campus_core::{
    repository::course_not_found, Course, CourseRepository, FilterColumns, Filters, Result,
};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

use super::{log_db_err, query::filter_clause};

const SELECT_COURSE: &str = "SELECT id, guid, name FROM course";

/// SQLite-backed [`CourseRepository`]
#[derive(Clone)]
pub struct SqlCourseRepository {
    pool: SqlitePool,
    columns: FilterColumns,
}

impl SqlCourseRepository {
    pub(crate) fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            columns: FilterColumns::for_courses(),
        }
    }
}

/// Parse a database row into a Course
pub(crate) fn parse_course_row(row: &SqliteRow) -> Result<Course> {
    let id: i64 = row
        .try_get("id")
        .map_err(|e| log_db_err("Failed to read course id", &e))?;
    let guid: String = row
        .try_get("guid")
        .map_err(|e| log_db_err("Failed to read course guid", &e))?;
    let name: String = row
        .try_get("name")
        .map_err(|e| log_db_err("Failed to read course name", &e))?;

    Ok(Course {
        id: Some(id),
        guid,
        name,
    })
}

#[async_trait]
impl CourseRepository for SqlCourseRepository {
    async fn find_all(&self, filters: &Filters) -> Result<Vec<Course>> {
        let (clause, values) = filter_clause(filters, &self.columns)?;
        let sql = format!("{SELECT_COURSE}{clause} ORDER BY id");

        let rows = values
            .iter()
            .fold(sqlx::query(&sql), |query, value| query.bind(value.as_str()))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| log_db_err("Failed to list courses", &e))?;

        rows.iter().map(parse_course_row).collect()
    }

    async fn find_one(&self, guid: &str) -> Result<Course> {
        let sql = format!("{SELECT_COURSE} WHERE guid = ?");

        sqlx::query(&sql)
            .bind(guid)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| log_db_err("Failed to load course", &e))?
            .map_or_else(|| Err(course_not_found(guid)), |row| parse_course_row(&row))
    }

    async fn save(&self, course: &mut Course) -> Result<()> {
        match course.id {
            Some(id) => sqlx::query("UPDATE course SET guid = ?, name = ? WHERE id = ?")
                .bind(&course.guid)
                .bind(&course.name)
                .bind(id)
                .execute(&self.pool)
                .await
                .map(|_| ())
                .map_err(|e| log_db_err("Failed to update course", &e)),
            None => {
                let id = sqlx::query("INSERT INTO course (guid, name) VALUES (?, ?)")
                    .bind(&course.guid)
                    .bind(&course.name)
                    .execute(&self.pool)
                    .await
                    .map(|result| result.last_insert_rowid())
                    .map_err(|e| log_db_err("Failed to create course", &e))?;
                course.id = Some(id);
                Ok(())
            }
        }
    }

    async fn delete(&self, course: &Course) -> Result<()> {
        let Some(id) = course.id else {
            return Ok(());
        };

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| log_db_err("Failed to begin transaction", &e))?;

        sqlx::query("DELETE FROM person_course WHERE course_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| log_db_err("Failed to delete course enrollments", &e))?;

        sqlx::query("DELETE FROM course WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| log_db_err("Failed to delete course", &e))?;

        tx.commit()
            .await
            .map_err(|e| log_db_err("Failed to commit course delete", &e))
    }
}
