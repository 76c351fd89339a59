//! Query-parameter filters for list endpoints.
//!
//! A [`FilterColumns`] allow-list maps the PascalCase parameter names clients
//! may use onto snake_case storage columns. The allow-list is an immutable
//! value handed to each service at construction.

use std::{collections::BTreeMap, sync::OnceLock};

use regex::Regex;

use crate::{aggregate, Error, Result};

/// Storage column -> substring to match
pub type Filters = BTreeMap<String, String>;

/// Allow-list of filterable parameters and the column each one targets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterColumns {
    columns: BTreeMap<String, String>,
}

impl FilterColumns {
    /// Build an allow-list from parameter names, deriving each column name.
    pub fn new<I, S>(params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            columns: params
                .into_iter()
                .map(|param| {
                    let param = param.as_ref();
                    (param.to_string(), to_snake_case(param))
                })
                .collect(),
        }
    }

    /// Filters accepted by the person list endpoint.
    pub fn for_persons() -> Self {
        Self::new(["FirstName", "LastName", "Email", "Age", "Type"])
    }

    /// Filters accepted by the course list endpoint.
    pub fn for_courses() -> Self {
        Self::new(["Name"])
    }

    /// Column targeted by a request parameter, if the parameter is allowed.
    pub fn column(&self, param: &str) -> Option<&str> {
        self.columns.get(param).map(String::as_str)
    }

    /// Whether `column` is one of the allowed target columns.
    pub fn allows_column(&self, column: &str) -> bool {
        self.columns.values().any(|c| c == column)
    }
}

/// Map request parameters to storage filters.
///
/// The first value wins when a parameter repeats.
///
/// # Errors
///
/// Every parameter missing from the allow-list is reported as
/// `BadInput("Invalid Request Parameter: <name>")`; several are aggregated.
pub fn parse_filters<I, K, V>(params: I, columns: &FilterColumns) -> Result<Filters>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>,
{
    let (filters, errors) = params.into_iter().fold(
        (Filters::new(), Vec::new()),
        |(mut filters, mut errors), (key, value)| {
            match columns.column(key.as_ref()) {
                Some(column) => {
                    filters
                        .entry(column.to_string())
                        .or_insert_with(|| value.into());
                }
                None => errors.push(Error::bad_input(format!(
                    "Invalid Request Parameter: {}",
                    key.as_ref()
                ))),
            }
            (filters, errors)
        },
    );

    aggregate(errors).map_or(Ok(filters), Err)
}

/// `FirstAndLastName` -> `first_and_last_name`
pub fn to_snake_case(value: &str) -> String {
    static FIRST_CAP: OnceLock<Option<Regex>> = OnceLock::new();
    static ALL_CAP: OnceLock<Option<Regex>> = OnceLock::new();

    let first_cap = FIRST_CAP.get_or_init(|| Regex::new("(.)([A-Z][a-z]+)").ok());
    let all_cap = ALL_CAP.get_or_init(|| Regex::new("([a-z0-9])([A-Z])").ok());

    let snake = first_cap.as_ref().map_or_else(
        || value.to_string(),
        |re| re.replace_all(value, "${1}_${2}").into_owned(),
    );
    let snake = all_cap.as_ref().map_or_else(
        || snake.clone(),
        |re| re.replace_all(&snake, "${1}_${2}").into_owned(),
    );

    snake.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    fn columns() -> FilterColumns {
        FilterColumns::new(["FirstName", "FirstAndLastName"])
    }

    #[test]
    fn test_snake_case_conversion() {
        assert_eq!(to_snake_case("FirstName"), "first_name");
        assert_eq!(to_snake_case("FirstAndLastName"), "first_and_last_name");
        assert_eq!(to_snake_case("Email"), "email");
        assert_eq!(to_snake_case(""), "");
    }

    #[test]
    fn test_filter_columns_map_params() {
        let columns = FilterColumns::new(["FirstName", "Email", ""]);

        assert_eq!(columns.column("FirstName"), Some("first_name"));
        assert_eq!(columns.column("Email"), Some("email"));
        assert_eq!(columns.column(""), Some(""));
        assert_eq!(columns.column("LastName"), None);
        assert!(columns.allows_column("first_name"));
        assert!(!columns.allows_column("FirstName"));
    }

    #[test]
    fn test_parse_filters_success() {
        let filters = parse_filters(
            [("FirstName", "Rob"), ("FirstAndLastName", "Rob Test")],
            &columns(),
        )
        .unwrap();

        assert_eq!(filters.get("first_name").map(String::as_str), Some("Rob"));
        assert_eq!(
            filters.get("first_and_last_name").map(String::as_str),
            Some("Rob Test")
        );
    }

    #[test]
    fn test_parse_filters_first_value_wins() {
        let filters =
            parse_filters([("FirstName", "Rob"), ("FirstName", "Bob")], &columns()).unwrap();
        assert_eq!(filters.get("first_name").map(String::as_str), Some("Rob"));
    }

    #[test]
    fn test_parse_filters_single_unknown_param() {
        let err = parse_filters([("FirstName", "Rob"), ("FirstNa", "Rob Test")], &columns())
            .unwrap_err();
        assert_eq!(err, Error::bad_input("Invalid Request Parameter: FirstNa"));
    }

    #[test]
    fn test_parse_filters_multiple_unknown_params() {
        let err =
            parse_filters([("FirstNa", "Rob"), ("FooBar", "Rob Test")], &columns()).unwrap_err();

        assert_eq!(
            err,
            Error::Multiple(vec![
                Error::bad_input("Invalid Request Parameter: FirstNa"),
                Error::bad_input("Invalid Request Parameter: FooBar"),
            ])
        );
        assert_eq!(err.kind(), ErrorKind::BadInput);
    }

    #[test]
    fn test_parse_filters_empty() {
        let params: [(&str, &str); 0] = [];
        assert!(parse_filters(params, &columns()).unwrap().is_empty());
    }
}
