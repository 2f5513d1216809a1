use std::fmt;

use etl_table::SortOrder;

/// A decoded `[-]column` ordering parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub column: String,
    pub direction: SortOrder,
}

impl OrderBy {
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: SortOrder::Asc,
        }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: SortOrder::Desc,
        }
    }

    /// Decode `name` (ascending) or `-name` (descending).
    ///
    /// Blank input and a bare `-` carry no column and decode to `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let (column, direction) = match raw.strip_prefix('-') {
            Some(rest) => (rest, SortOrder::Desc),
            None => (raw, SortOrder::Asc),
        };
        if column.is_empty() {
            return None;
        }
        Some(Self {
            column: column.to_string(),
            direction,
        })
    }

    /// The same column in the opposite direction.
    pub fn reversed(&self) -> Self {
        Self {
            column: self.column.clone(),
            direction: self.direction.reversed(),
        }
    }

    pub fn is_descending(&self) -> bool {
        self.direction == SortOrder::Desc
    }
}

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_descending() {
            write!(f, "-{}", self.column)
        } else {
            f.write_str(&self.column)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_directions() {
        assert_eq!(OrderBy::parse("name"), Some(OrderBy::asc("name")));
        assert_eq!(OrderBy::parse("-name"), Some(OrderBy::desc("name")));
        assert_eq!(OrderBy::parse("  -count "), Some(OrderBy::desc("count")));
    }

    #[test]
    fn test_parse_blank() {
        assert_eq!(OrderBy::parse(""), None);
        assert_eq!(OrderBy::parse("-"), None);
        assert_eq!(OrderBy::parse("   "), None);
    }

    #[test]
    fn test_display_round_trips_query_form() {
        assert_eq!(OrderBy::desc("height").to_string(), "-height");
        assert_eq!(OrderBy::asc("height").to_string(), "height");
        assert_eq!(OrderBy::asc("height").reversed(), OrderBy::desc("height"));
    }
}
