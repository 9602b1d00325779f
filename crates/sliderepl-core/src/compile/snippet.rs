//! Snippet normalization.
//!
//! Slides usually show a handful of statements rather than a whole Go
//! program. Before building, such fragments are wrapped into `package main`
//! with a `main` function, and their `import` lines are hoisted above it.
//!
//! Detection is a line-oriented regex heuristic, not a Go parser. Only
//! single-line imports (`import "fmt"`, `import f "fmt"`) are hoisted; the
//! parenthesized `import ( ... )` form is not supported inside fragments.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::bytes::Regex;

static PACKAGE_CLAUSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^package\b").expect("package clause pattern is valid")
});

static IMPORT_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^import[ \t][^\n]*\n?").expect("import line pattern is valid")
});

const HEADER: &[u8] = b"package main\n";
const MAIN_OPEN: &[u8] = b"func main() {\n";
const MAIN_CLOSE: &[u8] = b"\n}\n";

/// Whether `source` already declares its package.
pub fn is_complete_unit(source: &[u8]) -> bool {
    PACKAGE_CLAUSE.is_match(source)
}

/// Turn a snippet into a complete compilation unit.
///
/// Complete units are returned untouched (borrowed). Fragments become:
///
/// ```text
/// package main
/// <import lines, in order>
/// func main() {
/// <fragment without its import lines>
/// }
/// ```
pub fn normalize(source: &[u8]) -> Cow<'_, [u8]> {
    if is_complete_unit(source) {
        return Cow::Borrowed(source);
    }

    let mut unit = Vec::with_capacity(source.len() + HEADER.len() + MAIN_OPEN.len() + 8);
    unit.extend_from_slice(HEADER);

    for import in IMPORT_LINE.find_iter(source) {
        let line = import.as_bytes();
        unit.extend_from_slice(line.strip_suffix(b"\n").unwrap_or(line));
        unit.push(b'\n');
    }

    unit.extend_from_slice(MAIN_OPEN);
    unit.extend_from_slice(&IMPORT_LINE.replace_all(source, &b""[..]));
    unit.extend_from_slice(MAIN_CLOSE);

    Cow::Owned(unit)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalized(source: &str) -> String {
        String::from_utf8(normalize(source.as_bytes()).into_owned()).unwrap()
    }

    #[test]
    fn test_complete_unit_passes_through() {
        let source = "// hello\npackage main\n\nimport \"fmt\"\n\nfunc main() { fmt.Println(1) }\n";
        let result = normalize(source.as_bytes());
        assert!(matches!(result, Cow::Borrowed(_)));
        assert_eq!(&*result, source.as_bytes());
    }

    #[test]
    fn test_fragment_wrapped() {
        let result = normalized("x := 1\nprintln(x)");
        assert_eq!(result, "package main\nfunc main() {\nx := 1\nprintln(x)\n}\n");
    }

    #[test]
    fn test_imports_hoisted_in_order() {
        let source = "import \"fmt\"\nfmt.Println(\"hi\")\nimport s \"strings\"\nfmt.Println(s.ToUpper(\"a\"))\n";
        let result = normalized(source);
        assert_eq!(
            result,
            "package main\nimport \"fmt\"\nimport s \"strings\"\nfunc main() {\n\
             fmt.Println(\"hi\")\nfmt.Println(s.ToUpper(\"a\"))\n\n}\n"
        );
    }

    #[test]
    fn test_comments_and_declarations_kept() {
        let source = "// a comment\nimport \"fmt\"\ntype point struct{ x int }\nfmt.Println(point{1})";
        let result = normalized(source);
        assert!(result.contains("// a comment\ntype point struct{ x int }\nfmt.Println(point{1})"));
        assert_eq!(result.matches("import \"fmt\"").count(), 1);
    }

    #[test]
    fn test_indented_import_not_hoisted() {
        // Only lines that start with the keyword count.
        let result = normalized("  import \"fmt\"\n");
        assert!(result.starts_with("package main\nfunc main() {\n  import"));
    }

    #[test]
    fn test_package_word_prefix_is_not_a_clause() {
        assert!(!is_complete_unit(b"packages := 3\n"));
        assert!(is_complete_unit(b"// doc\npackage foo\n"));
    }

    #[test]
    fn test_idempotent_on_normalized_output() {
        let once = normalize(b"import \"fmt\"\nfmt.Println(1)").into_owned();
        let twice = normalize(&once).into_owned();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_invalid_utf8_tolerated() {
        let result = normalize(b"println(\"\xff\")");
        assert!(result.ends_with(b"\n}\n"));
        assert!(result.contains(&0xff));
    }
}
