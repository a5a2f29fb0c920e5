//! Query strings and JSON bodies accepted by the API

use serde::Deserialize;

/// `GET /api/filtered-locations`; numbers stay text so bad input falls back to defaults
#[derive(Debug, Default)]
pub struct FilterParams {
    pub country: Option<String>,
    pub limit: Option<String>,
    pub page: Option<String>,
}

impl FilterParams {
    /// Build from raw query pairs; the first occurrence of a repeated key wins
    #[must_use]
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "country" => &mut params.country,
                "limit" => &mut params.limit,
                "page" => &mut params.page,
                _ => continue,
            };
            slot.get_or_insert(value);
        }
        params
    }
}

/// `GET /api/cities`
#[derive(Debug, Default, Deserialize)]
pub struct CityParams {
    pub country: Option<String>,
}

/// `GET /api/lists`
#[derive(Debug, Default, Deserialize)]
pub struct ListsParams {
    /// `true` returns only ids and names
    pub summary: Option<String>,
}

impl ListsParams {
    #[must_use]
    pub fn wants_summary(&self) -> bool {
        self.summary
            .as_deref()
            .is_some_and(|v| v.eq_ignore_ascii_case("true") || v == "1")
    }
}

/// `GET /api/lists/{id}`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub sort_by: Option<String>,
}

/// `POST /api/lists` and `PUT /api/lists/{id}`
#[derive(Debug, Default, Deserialize)]
pub struct NameBody {
    pub name: Option<String>,
}

/// Reference to a dataset destination by name
#[derive(Debug, Default, Deserialize)]
pub struct DestinationRef {
    pub name: Option<String>,
}

/// `POST /api/lists/{id}/destinations`
#[derive(Debug, Default, Deserialize)]
pub struct AddDestinationBody {
    pub destination: Option<DestinationRef>,
}

impl AddDestinationBody {
    #[must_use]
    pub fn destination_name(&self) -> Option<&str> {
        self.destination.as_ref()?.name.as_deref()
    }
}

/// `DELETE /api/lists/{id}/destinations`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveDestinationBody {
    pub destination_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_filter_params_first_repeated_key_wins() {
        let params = FilterParams::from_pairs(pairs(&[
            ("country", "France"),
            ("limit", "3"),
            ("limit", "4"),
            ("utm_source", "mail"),
        ]));
        assert_eq!(params.country.as_deref(), Some("France"));
        assert_eq!(params.limit.as_deref(), Some("3"));
        assert!(params.page.is_none());
    }

    #[rstest]
    #[case(Some("true"), true)]
    #[case(Some("TRUE"), true)]
    #[case(Some("1"), true)]
    #[case(Some("false"), false)]
    #[case(None, false)]
    fn test_wants_summary(#[case] raw: Option<&str>, #[case] expected: bool) {
        let params = ListsParams {
            summary: raw.map(str::to_string),
        };
        assert_eq!(params.wants_summary(), expected);
    }

    #[test]
    fn test_add_destination_body_shapes() {
        let body: AddDestinationBody =
            serde_json::from_str(r#"{"destination":{"name":"Paris"}}"#).unwrap();
        assert_eq!(body.destination_name(), Some("Paris"));

        let body: AddDestinationBody = serde_json::from_str(r#"{"destination":{}}"#).unwrap();
        assert_eq!(body.destination_name(), None);

        let body: AddDestinationBody = serde_json::from_str("{}").unwrap();
        assert_eq!(body.destination_name(), None);
    }

    #[test]
    fn test_remove_destination_body_uses_camel_case() {
        let body: RemoveDestinationBody =
            serde_json::from_str(r#"{"destinationName":"Rome"}"#).unwrap();
        assert_eq!(body.destination_name.as_deref(), Some("Rome"));
    }
}
