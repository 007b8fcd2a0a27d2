//! Parser for declarative schema files.
//!
//! A schema file holds one uniqueness constraint statement per line:
//!
//! ```text
//! // comment
//! CREATE CONSTRAINT course_code_unique IF NOT EXISTS FOR (c:Course) REQUIRE c.code IS UNIQUE
//! ```
//!
//! Keywords are case-insensitive, identifiers may be backtick-quoted, a
//! trailing `;` is allowed and `//` starts a comment outside backticks.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use super::spec::{ConstraintSpec, validate_specs};
use crate::error::{SchemaError, SchemaResult};

const IDENT: &str = r"(?:[A-Za-z_][A-Za-z0-9_]*|`(?:[^`]|``)+`)";

static UNIQUE_CONSTRAINT: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(
        r"(?i)^CREATE\s+CONSTRAINT\s+(?P<name>{id})\s+(?P<guard>IF\s+NOT\s+EXISTS\s+)?FOR\s*\(\s*(?P<var>{id})\s*:\s*(?P<label>{id})\s*\)\s*REQUIRE\s+(?P<pvar>{id})\s*\.\s*(?P<prop>{id})\s+IS\s+UNIQUE\s*;?$",
        id = IDENT
    );
    Regex::new(&pattern).unwrap()
});

static CREATE_CONSTRAINT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^CREATE\s+CONSTRAINT\b").unwrap());

/// A parsed statement together with where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaStatement {
    pub spec: ConstraintSpec,
    pub if_not_exists: bool,
    pub line: usize,
}

/// Parse a schema document into statements, without validating the list.
pub fn parse_statements(input: &str) -> SchemaResult<Vec<SchemaStatement>> {
    let mut statements = Vec::new();

    for (idx, raw) in input.lines().enumerate() {
        let line = idx + 1;
        let text = strip_comment(raw).trim();
        if text.is_empty() {
            continue;
        }
        statements.push(parse_line(text, line)?);
    }

    Ok(statements)
}

/// Parse and validate a schema document into an ordered spec list.
pub fn parse_schema(input: &str) -> SchemaResult<Vec<ConstraintSpec>> {
    let statements = parse_statements(input)?;

    for stmt in statements.iter().filter(|s| !s.if_not_exists) {
        warn!(
            line = stmt.line,
            constraint = %stmt.spec.name,
            "Statement has no IF NOT EXISTS guard; it will be applied idempotently anyway"
        );
    }

    let specs: Vec<ConstraintSpec> = statements.into_iter().map(|s| s.spec).collect();
    validate_specs(&specs)?;
    Ok(specs)
}

/// Read and parse a schema file.
pub fn load_schema_file(path: &Path) -> SchemaResult<Vec<ConstraintSpec>> {
    let content = std::fs::read_to_string(path).map_err(|e| SchemaError::read(path, e))?;
    parse_schema(&content)
}

fn parse_line(text: &str, line: usize) -> SchemaResult<SchemaStatement> {
    let Some(caps) = UNIQUE_CONSTRAINT.captures(text) else {
        let message = if CREATE_CONSTRAINT.is_match(text) {
            "unsupported constraint; expected `CREATE CONSTRAINT <name> [IF NOT EXISTS] FOR (v:Label) REQUIRE v.property IS UNIQUE`"
        } else {
            "expected a CREATE CONSTRAINT statement"
        };
        return Err(SchemaError::Parse {
            line,
            message: message.to_string(),
        });
    };

    let var = unquote(&caps["var"]);
    let pvar = unquote(&caps["pvar"]);
    if var != pvar {
        return Err(SchemaError::Parse {
            line,
            message: format!("REQUIRE refers to '{}' but the pattern binds '{}'", pvar, var),
        });
    }

    Ok(SchemaStatement {
        spec: ConstraintSpec::new(
            unquote(&caps["name"]),
            unquote(&caps["label"]),
            unquote(&caps["prop"]),
        ),
        if_not_exists: caps.name("guard").is_some(),
        line,
    })
}

/// Cut a `//` comment unless it sits inside a backtick-quoted identifier.
fn strip_comment(text: &str) -> &str {
    let mut quoted = false;
    let mut prev_slash = false;

    for (i, ch) in text.char_indices() {
        match ch {
            '`' => {
                quoted = !quoted;
                prev_slash = false;
            }
            '/' if !quoted => {
                if prev_slash {
                    return &text[..i - 1];
                }
                prev_slash = true;
            }
            _ => prev_slash = false,
        }
    }
    text
}

fn unquote(ident: &str) -> String {
    match ident.strip_prefix('`').and_then(|s| s.strip_suffix('`')) {
        Some(inner) => inner.replace("``", "`"),
        None => ident.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_statement() {
        let specs = parse_schema(
            "CREATE CONSTRAINT course_code_unique IF NOT EXISTS FOR (c:Course) REQUIRE c.code IS UNIQUE",
        )
        .unwrap();
        assert_eq!(specs, vec![ConstraintSpec::new("course_code_unique", "Course", "code")]);
    }

    #[test]
    fn test_comments_blank_lines_and_semicolons() {
        let input = "// campus\n\n  create constraint a if not exists for (x:A) require x.id is unique;\n// end\n";
        let statements = parse_statements(input).unwrap();
        assert_eq!(statements.len(), 1);
        assert_eq!(statements[0].line, 3);
        assert!(statements[0].if_not_exists);
        assert_eq!(statements[0].spec, ConstraintSpec::new("a", "A", "id"));
    }

    #[test]
    fn test_trailing_comment() {
        let statements = parse_statements(
            "CREATE CONSTRAINT course_code_unique IF NOT EXISTS FOR (c:Course) REQUIRE c.code IS UNIQUE; // course codes",
        )
        .unwrap();
        assert_eq!(statements[0].spec, ConstraintSpec::new("course_code_unique", "Course", "code"));
    }

    #[test]
    fn test_slashes_inside_backticks_are_kept() {
        let statements = parse_statements(
            "CREATE CONSTRAINT `a//b` FOR (n:`Url//Path`) REQUIRE n.href IS UNIQUE // note",
        )
        .unwrap();
        assert_eq!(statements[0].spec.name, "a//b");
        assert_eq!(statements[0].spec.label, "Url//Path");
    }

    #[test]
    fn test_backtick_identifiers() {
        let statements = parse_statements(
            "CREATE CONSTRAINT `odd``name` FOR (`n`:`Lecture Hall`) REQUIRE `n`.`room no` IS UNIQUE",
        )
        .unwrap();
        let stmt = &statements[0];
        assert!(!stmt.if_not_exists);
        assert_eq!(stmt.spec.name, "odd`name");
        assert_eq!(stmt.spec.label, "Lecture Hall");
        assert_eq!(stmt.spec.property, "room no");
    }

    #[test]
    fn test_unguarded_statement_is_accepted() {
        let specs = parse_schema("CREATE CONSTRAINT t FOR (t:Teacher) REQUIRE t.name IS UNIQUE").unwrap();
        assert_eq!(specs[0].label, "Teacher");
    }

    #[test]
    fn test_variable_mismatch() {
        let err = parse_schema("CREATE CONSTRAINT c FOR (c:Course) REQUIRE x.code IS UNIQUE").unwrap_err();
        match err {
            SchemaError::Parse { line, message } => {
                assert_eq!(line, 1);
                assert!(message.contains("'x'"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unnamed_constraint_rejected() {
        let err = parse_statements("CREATE CONSTRAINT IF NOT EXISTS FOR (c:Course) REQUIRE c.code IS UNIQUE")
            .unwrap_err();
        assert!(matches!(err, SchemaError::Parse { line: 1, .. }));
    }

    #[test]
    fn test_non_uniqueness_constraint_rejected() {
        let err = parse_statements(
            "// existence\nCREATE CONSTRAINT c FOR (c:Course) REQUIRE c.code IS NOT NULL",
        )
        .unwrap_err();
        match err {
            SchemaError::Parse { line, message } => {
                assert_eq!(line, 2);
                assert!(message.starts_with("unsupported constraint"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_other_statement_rejected() {
        let err = parse_statements("MATCH (n) RETURN n").unwrap_err();
        assert!(err.to_string().contains("expected a CREATE CONSTRAINT statement"));
    }

    #[test]
    fn test_parse_schema_validates_list() {
        let input = "CREATE CONSTRAINT a IF NOT EXISTS FOR (t:Teacher) REQUIRE t.name IS UNIQUE\n\
                     CREATE CONSTRAINT a IF NOT EXISTS FOR (d:Department) REQUIRE d.name IS UNIQUE";
        assert!(matches!(parse_schema(input), Err(SchemaError::InvalidSpec(_))));
        assert!(matches!(parse_schema("// nothing here\n"), Err(SchemaError::InvalidSpec(_))));
    }

    #[test]
    fn test_load_schema_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schema.cypher");
        std::fs::write(
            &path,
            "CREATE CONSTRAINT semester_name_unique IF NOT EXISTS FOR (s:Semester) REQUIRE s.name IS UNIQUE\n",
        )
        .unwrap();

        let specs = load_schema_file(&path).unwrap();
        assert_eq!(specs[0].name, "semester_name_unique");

        let missing_path = dir.path().join("missing.cypher");
        let missing = load_schema_file(&missing_path).unwrap_err();
        assert!(matches!(missing, SchemaError::Read { ref path, .. } if *path == missing_path));
        assert!(missing.to_string().contains("missing.cypher"));
    }
}
