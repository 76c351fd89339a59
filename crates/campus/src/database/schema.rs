//! Database schema definitions and initialization

use campus_core::Result;
use sqlx::SqlitePool;

use super::log_db_err;

/// Database schema as SQL string - executed once on start-up
pub(crate) const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS person (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    guid TEXT UNIQUE NOT NULL,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    email TEXT NOT NULL,
    age INTEGER NOT NULL,
    "type" TEXT NOT NULL CHECK("type" IN ('professor', 'student'))
);

CREATE TABLE IF NOT EXISTS course (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    guid TEXT UNIQUE NOT NULL,
    name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS person_course (
    person_id INTEGER NOT NULL REFERENCES person(id),
    course_id INTEGER NOT NULL REFERENCES course(id),
    PRIMARY KEY (person_id, course_id)
);

CREATE INDEX IF NOT EXISTS idx_person_course_course ON person_course(course_id);
"#;

/// Initialize database schema
pub(crate) async fn init_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(SCHEMA)
        .execute(pool)
        .await
        .map(|_| ())
        .map_err(|e| log_db_err("Failed to initialize schema", &e))
}
