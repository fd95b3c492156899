/// Quote a single delimited-text field per the usual CSV rules.
pub fn csv_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

pub fn csv_row(fields: &[&str]) -> String {
    fields
        .iter()
        .map(|f| csv_field(f))
        .collect::<Vec<_>>()
        .join(",")
}

/// Replace whitespace and periods with underscores, for use in
/// synthesized script descriptions.
pub fn underscore_token(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_whitespace() || c == '.' { '_' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_fields_pass_through() {
        assert_eq!(csv_field("Scripts"), "Scripts");
        assert_eq!(csv_row(&["a", "b", "c"]), "a,b,c");
    }

    #[test]
    fn fields_with_delimiters_are_quoted() {
        assert_eq!(csv_field("fix table, again"), "\"fix table, again\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(csv_field("line1\nline2"), "\"line1\nline2\"");
    }

    #[test]
    fn quoting_only_touches_affected_fields() {
        assert_eq!(csv_row(&["a,b", "c"]), "\"a,b\",c");
    }

    #[test]
    fn underscore_token_replaces_whitespace_and_periods() {
        assert_eq!(underscore_token("Edit Operation.Products"), "Edit_Operation_Products");
        assert_eq!(underscore_token("John Smith"), "John_Smith");
        assert_eq!(underscore_token("a\tb c"), "a_b_c");
    }
}
