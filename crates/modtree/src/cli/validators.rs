//! CLI input validation functions.
//!
//! These validators are used by clap's `value_parser` attribute to validate
//! user input at parse time, providing immediate feedback for invalid values.

/// Validate a module identifier (`--start`, `--contains`).
///
/// Identifiers are compared verbatim against the graph, so they must be
/// non-empty and contain no whitespace.
pub fn validate_module(s: &str) -> Result<String, String> {
    let s = s.trim();

    if s.is_empty() {
        return Err("Module cannot be empty".to_string());
    }

    if s.chars().any(char::is_whitespace) {
        return Err(format!("Module '{s}' cannot contain whitespace"));
    }

    Ok(s.to_string())
}

/// Validate a Graphviz output format (`--format`).
///
/// Accepts names like `svg`, `png`, `json0` and renderer-qualified forms
/// like `png:cairo`. The value is passed to the layout tool as `-T<format>`,
/// so anything that could read as a separate option is rejected.
pub fn validate_format(s: &str) -> Result<String, String> {
    let s = s.trim();

    if s.is_empty() {
        return Err("Format cannot be empty".to_string());
    }

    if s.starts_with('-') {
        return Err(format!("Format '{s}' cannot start with a hyphen"));
    }

    if !s
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, ':' | '_' | '-' | '.'))
    {
        return Err(format!(
            "Invalid format '{s}'. Expected a Graphviz format such as svg, png or pdf"
        ));
    }

    Ok(s.to_string())
}

/// Validate a layout command name (`--command`).
pub fn validate_command(s: &str) -> Result<String, String> {
    let s = s.trim();

    if s.is_empty() {
        return Err("Layout command cannot be empty".to_string());
    }

    if s.starts_with('-') {
        return Err(format!("Layout command '{s}' cannot start with a hyphen"));
    }

    Ok(s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("golang.org/x/mod", "golang.org/x/mod")]
    #[case("  example.com/a@v1.2.3  ", "example.com/a@v1.2.3")]
    fn test_validate_module_accepts(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(validate_module(input).unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("two words")]
    fn test_validate_module_rejects(#[case] input: &str) {
        assert!(validate_module(input).is_err());
    }

    #[rstest]
    #[case("svg")]
    #[case("png:cairo")]
    #[case("json0")]
    #[case("plain-ext")]
    fn test_validate_format_accepts(#[case] input: &str) {
        assert_eq!(validate_format(input).unwrap(), input);
    }

    #[rstest]
    #[case("")]
    #[case("-o/tmp/x")]
    #[case("svg; rm")]
    #[case("s v g")]
    fn test_validate_format_rejects(#[case] input: &str) {
        assert!(validate_format(input).is_err());
    }

    #[rstest]
    #[case("dot", true)]
    #[case("/usr/bin/neato", true)]
    #[case("", false)]
    #[case("--version", false)]
    fn test_validate_command(#[case] input: &str, #[case] ok: bool) {
        assert_eq!(validate_command(input).is_ok(), ok);
    }
}
