//! Non-fatal anomalies found while reading a module graph dump.
//!
//! A graph dump is expected to contain one edge per line, written as two
//! whitespace-separated module identifiers. Lines of any other shape do not
//! abort processing: they are skipped and reported as a [`Warning`] so the
//! caller can print them to its diagnostic stream.
//!
//! # Examples
//!
//! ```
//! use modtree_graph::parse_edge_list;
//!
//! let parsed = parse_edge_list("a b\nnot-an-edge\nb c\n");
//! assert_eq!(parsed.edges.len(), 2);
//! assert_eq!(parsed.warnings.len(), 1);
//! assert_eq!(parsed.warnings[0].line_number(), 2);
//! ```

/// A non-fatal warning produced while parsing an edge list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// A line did not consist of exactly two whitespace-separated tokens.
    MalformedLine {
        /// The 1-based line number of the offending line.
        line_number: usize,
        /// The raw line content.
        line: String,
    },
}

impl Warning {
    /// Returns the line number associated with this warning.
    #[must_use]
    pub fn line_number(&self) -> usize {
        match self {
            Self::MalformedLine { line_number, .. } => *line_number,
        }
    }

    /// Returns a human-readable description of the warning.
    ///
    /// # Examples
    ///
    /// ```
    /// use modtree_graph::Warning;
    ///
    /// let warning = Warning::MalformedLine {
    ///     line_number: 3,
    ///     line: "a b c".to_string(),
    /// };
    /// assert_eq!(warning.description(), "line 3: invalid input line: a b c");
    /// ```
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::MalformedLine { line_number, line } => {
                format!("line {line_number}: invalid input line: {line}")
            }
        }
    }

    /// Returns a static string identifying the warning kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedLine { .. } => "malformed_line",
        }
    }
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

impl std::error::Error for Warning {}
