//! Query parameters of the dataset details view.

use url::form_urlencoded;

use crate::order::OrderBy;
use crate::transforms::Presentation;

pub const FIELD_PARAM: &str = "field";
pub const ORDER_BY_PARAM: &str = "order_by";
pub const LIMIT_PARAM: &str = "limit";

/// Decoded details query: `field=a&field=b&order_by=-count&limit=20`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailsQuery {
    /// Group-by fields in the order supplied.
    pub fields: Vec<String>,
    pub order_by: Option<OrderBy>,
    pub limit: usize,
    per_page: usize,
}

impl DetailsQuery {
    /// An empty query showing the first page.
    pub fn new(per_page: usize) -> Self {
        Self {
            fields: Vec::new(),
            order_by: None,
            limit: per_page,
            per_page,
        }
    }

    /// Decode a URL query string (without the leading `?`).
    ///
    /// Repeated `field` parameters accumulate in first-seen order, ignoring
    /// repeats of the same field. The last `order_by` and `limit`
    /// win. A `limit` that is missing or not a non-negative integer falls back
    /// to `per_page`.
    pub fn parse(query: &str, per_page: usize) -> Self {
        let mut parsed = Self::new(per_page);
        for (key, value) in form_urlencoded::parse(query.trim_start_matches('?').as_bytes()) {
            match &*key {
                FIELD_PARAM if !value.is_empty() => {
                    if !parsed.fields.iter().any(|f| *f == value) {
                        parsed.fields.push(value.into_owned());
                    }
                }
                ORDER_BY_PARAM => parsed.order_by = OrderBy::parse(&value),
                LIMIT_PARAM => parsed.limit = value.trim().parse().unwrap_or(per_page),
                _ => {}
            }
        }
        parsed
    }

    pub fn per_page(&self) -> usize {
        self.per_page
    }

    /// Limit for the "show more" link.
    pub fn next_limit(&self) -> usize {
        self.limit.saturating_add(self.per_page)
    }

    /// Presentation chain inputs for this query.
    pub fn presentation(&self) -> Presentation {
        Presentation {
            aggregate_by: self.fields.clone(),
            order_by: self.order_by.clone(),
            limit: Some(self.limit),
        }
    }

    /// Same query with a different limit.
    pub fn with_limit(&self, limit: usize) -> Self {
        Self {
            limit,
            ..self.clone()
        }
    }

    /// Add `field` to the group-by set, or remove it when already present.
    pub fn toggle_field(&self, field: &str) -> Self {
        let mut toggled = self.clone();
        match toggled.fields.iter().position(|f| f == field) {
            Some(i) => {
                toggled.fields.remove(i);
            }
            None => toggled.fields.push(field.to_string()),
        }
        toggled
    }

    /// Order by `column` ascending, or descending when it is already the
    /// ascending ordering column.
    pub fn toggle_order_by(&self, column: &str) -> Self {
        let order_by = match &self.order_by {
            Some(current) if current == &OrderBy::asc(column) => OrderBy::desc(column),
            _ => OrderBy::asc(column),
        };
        Self {
            order_by: Some(order_by),
            ..self.clone()
        }
    }

    /// Encode back into a URL query string.
    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for field in &self.fields {
            serializer.append_pair(FIELD_PARAM, field);
        }
        if let Some(order_by) = &self.order_by {
            serializer.append_pair(ORDER_BY_PARAM, &order_by.to_string());
        }
        serializer.append_pair(LIMIT_PARAM, &self.limit.to_string());
        serializer.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_query() {
        let query = DetailsQuery::parse("field=homeworld&field=gender&order_by=-count&limit=20", 10);
        assert_eq!(query.fields, ["homeworld", "gender"]);
        assert_eq!(query.order_by, Some(OrderBy::desc("count")));
        assert_eq!(query.limit, 20);
        assert_eq!(query.next_limit(), 30);
    }

    #[test]
    fn test_repeated_field_kept_once() {
        let query = DetailsQuery::parse("field=homeworld&field=gender&field=homeworld", 10);
        assert_eq!(query.fields, ["homeworld", "gender"]);
        assert_eq!(
            query.to_query_string(),
            "field=homeworld&field=gender&limit=10"
        );
    }

    #[test]
    fn test_parse_defaults() {
        let query = DetailsQuery::parse("", 10);
        assert!(query.fields.is_empty());
        assert_eq!(query.order_by, None);
        assert_eq!(query.limit, 10);
        assert_eq!(query.next_limit(), 20);
    }

    #[test]
    fn test_invalid_limit_falls_back() {
        assert_eq!(DetailsQuery::parse("limit=ten", 10).limit, 10);
        assert_eq!(DetailsQuery::parse("limit=-5", 10).limit, 10);
        assert_eq!(DetailsQuery::parse("limit=0", 10).limit, 0);
    }

    #[test]
    fn test_percent_decoding_and_leading_question_mark() {
        let query = DetailsQuery::parse("?field=eye%20color&order_by=birth_year", 10);
        assert_eq!(query.fields, ["eye color"]);
        assert_eq!(query.order_by, Some(OrderBy::asc("birth_year")));
    }

    #[test]
    fn test_presentation_inputs() {
        let presentation = DetailsQuery::parse("field=homeworld&limit=5", 10).presentation();
        assert_eq!(presentation.aggregate_by, ["homeworld"]);
        assert_eq!(presentation.order_by, None);
        assert_eq!(presentation.limit, Some(5));
    }

    #[test]
    fn test_toggles() {
        let query = DetailsQuery::new(10);
        let query = query.toggle_field("homeworld").toggle_field("gender");
        assert_eq!(query.fields, ["homeworld", "gender"]);
        assert_eq!(query.toggle_field("homeworld").fields, ["gender"]);

        let ordered = query.toggle_order_by("name");
        assert_eq!(ordered.order_by, Some(OrderBy::asc("name")));
        let ordered = ordered.toggle_order_by("name");
        assert_eq!(ordered.order_by, Some(OrderBy::desc("name")));
        let ordered = ordered.toggle_order_by("name");
        assert_eq!(ordered.order_by, Some(OrderBy::asc("name")));
    }

    #[test]
    fn test_query_string_round_trip() {
        let query = DetailsQuery::parse("field=eye%20color&order_by=-count&limit=30", 10);
        let encoded = query.with_limit(query.next_limit()).to_query_string();
        assert_eq!(encoded, "field=eye+color&order_by=-count&limit=40");
        assert_eq!(DetailsQuery::parse(&encoded, 10).limit, 40);
    }
}
