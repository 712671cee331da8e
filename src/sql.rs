//! SQL text helpers
//!
//! Column names and map keys come straight from the data, so every name that
//! lands in generated SQL goes through one of these.

/// Quote an identifier for DuckDB (`"name"`, embedded quotes doubled)
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Quote a string literal for DuckDB (`'value'`, embedded quotes doubled)
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("props", "\"props\"" ; "plain")]
    #[test_case("props_a b", "\"props_a b\"" ; "space")]
    #[test_case("we\"ird", "\"we\"\"ird\"" ; "embedded quote")]
    fn test_quote_ident(raw: &str, expected: &str) {
        assert_eq!(quote_ident(raw), expected);
    }

    #[test_case("a", "'a'" ; "plain")]
    #[test_case("it's", "'it''s'" ; "apostrophe")]
    #[test_case("", "''" ; "empty")]
    fn test_quote_literal(raw: &str, expected: &str) {
        assert_eq!(quote_literal(raw), expected);
    }
}
