//! Query building shared by the repositories

use campus_core::{Error, FilterColumns, Filters, Result};

/// `WHERE` clause matching every filter as a substring, plus its bind values.
///
/// Column names come from the allow-list only; values are always bound.
pub(crate) fn filter_clause(
    filters: &Filters,
    columns: &FilterColumns,
) -> Result<(String, Vec<String>)> {
    let conditions = filters
        .iter()
        .map(|(column, value)| {
            if columns.allows_column(column) {
                Ok((format!("\"{column}\" LIKE ?"), format!("%{value}%")))
            } else {
                Err(Error::bad_input(format!("Invalid filter column: {column}")))
            }
        })
        .collect::<Result<Vec<_>>>()?;

    if conditions.is_empty() {
        return Ok((String::new(), Vec::new()));
    }

    let (clauses, values): (Vec<String>, Vec<String>) = conditions.into_iter().unzip();
    Ok((format!(" WHERE {}", clauses.join(" AND ")), values))
}

#[cfg(test)]
mod tests {
    use campus_core::ErrorKind;

    use super::*;

    #[test]
    fn test_filter_clause_binds_values() {
        let filters = Filters::from([("name".to_string(), "bio".to_string())]);

        let (clause, values) = filter_clause(&filters, &FilterColumns::for_courses()).unwrap();

        assert_eq!(clause, " WHERE \"name\" LIKE ?");
        assert_eq!(values, vec!["%bio%".to_string()]);
    }

    #[test]
    fn test_filter_clause_joins_conditions() {
        let filters = Filters::from([
            ("first_name".to_string(), "Pat".to_string()),
            ("type".to_string(), "student".to_string()),
        ]);

        let (clause, values) = filter_clause(&filters, &FilterColumns::for_persons()).unwrap();

        assert_eq!(clause, " WHERE \"first_name\" LIKE ? AND \"type\" LIKE ?");
        assert_eq!(values, vec!["%Pat%".to_string(), "%student%".to_string()]);
    }

    #[test]
    fn test_filter_clause_empty() {
        let (clause, values) =
            filter_clause(&Filters::new(), &FilterColumns::for_courses()).unwrap();

        assert!(clause.is_empty());
        assert!(values.is_empty());
    }

    #[test]
    fn test_filter_clause_rejects_unlisted_column() {
        let filters = Filters::from([("name; DROP TABLE course".to_string(), "x".to_string())]);

        let err = filter_clause(&filters, &FilterColumns::for_courses()).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::BadInput);
    }
}
