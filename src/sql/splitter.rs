/// Statement splitter - cuts raw script text into single statements

/// Statement delimiter
pub const DELIMITER: char = ';';

/// Split `source` on `;` or line feed. Every statement is re-terminated with `;`.
///
/// Carriage returns never split. Empty statements (blank lines, `;;`) are
/// returned as-is (a lone `";"`); filtering them is up to the caller.
/// Text after the last terminator is returned as a final statement.
pub fn split_statements(source: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();

    for ch in source.chars() {
        match ch {
            DELIMITER | '\n' => {
                current.push(DELIMITER);
                statements.push(std::mem::take(&mut current));
            }
            _ => current.push(ch),
        }
    }

    if !current.trim().is_empty() {
        current.push(DELIMITER);
        statements.push(current);
    }

    statements
}

/// True when a split statement carries nothing but whitespace and its delimiter
pub fn is_blank(statement: &str) -> bool {
    statement
        .chars()
        .all(|c| c == DELIMITER || c.is_whitespace())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_statement() {
        assert_eq!(split_statements("select * from User;"), vec!["select * from User;"]);
    }

    #[test]
    fn test_line_feed_splits() {
        assert_eq!(
            split_statements("select * from A\nselect id from B;"),
            vec!["select * from A;", "select id from B;"]
        );
    }

    #[test]
    fn test_carriage_return_does_not_split() {
        let statements = split_statements("select *\rfrom User;");
        assert_eq!(statements, vec!["select *\rfrom User;"]);
    }

    #[test]
    fn test_empty_statements_are_kept() {
        let statements = split_statements("select * from A;;\n\nselect * from B;\n");
        assert_eq!(
            statements,
            vec!["select * from A;", ";", ";", ";", "select * from B;", ";"]
        );
        assert_eq!(statements.iter().filter(|s| !is_blank(s)).count(), 2);
    }

    #[test]
    fn test_unterminated_tail_is_terminated() {
        assert_eq!(
            split_statements("select * from A; select * from B"),
            vec!["select * from A;", " select * from B;"]
        );
    }

    #[test]
    fn test_trailing_whitespace_without_terminator_is_dropped() {
        assert_eq!(split_statements("select * from A;  "), vec!["select * from A;"]);
        assert!(split_statements("").is_empty());
    }
}
