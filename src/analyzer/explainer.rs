use std::sync::LazyLock;

use regex::Regex;

use super::{Language, detect_language, rules};

static LOOP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(for|while|loop)\b|\.(forEach|map|filter|reduce)\s*\(").unwrap());
static CONDITIONAL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(if|switch|match)\b").unwrap());
static ASYNC: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(async|await)\b|\.then\s*\(").unwrap());
static ERROR_HANDLING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(try|catch|except|Result)\b|\?;").unwrap());
static IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*(import\b|from\s+[\w.]+\s+import\b|use\s+\w|(const|let|var)\s+\w+\s*=\s*require\s*\()").unwrap()
});
static TYPE_DECLARATION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(class|struct|interface|enum|trait)\s+([A-Za-z_]\w*)").unwrap());

fn list(names: &[String]) -> String {
    names.join(", ")
}

fn plural(
    count: usize,
    word: &str,
) -> String {
    if count == 1 { format!("{} {}", count, word) } else { format!("{} {}s", count, word) }
}

/// Plain-language observations about `source`, one sentence each.
pub fn explain(source: &str) -> Vec<String> {
    if source.trim().is_empty() {
        return vec!["The source is empty.".to_string()];
    }

    let language = detect_language(source);
    let mut notes = Vec::new();

    notes.push(match language {
        Language::Unknown => "The language could not be determined.".to_string(),
        language => format!("Language: {}.", language),
    });

    let functions = rules::function_names(source, language);
    if !functions.is_empty() {
        notes.push(format!("Defines {}: {}.", plural(functions.len(), "function"), list(&functions)));
    }

    let mut types: Vec<String> = Vec::new();
    for name in TYPE_DECLARATION.captures_iter(source).filter_map(|caps| caps.get(2)) {
        let name = name.as_str().to_string();
        if !types.contains(&name) {
            types.push(name);
        }
    }
    if !types.is_empty() {
        notes.push(format!("Declares {}: {}.", plural(types.len(), "type"), list(&types)));
    }

    let imports = IMPORT.find_iter(source).count();
    if imports > 0 {
        notes.push(format!("Imports {}.", plural(imports, "module")));
    }

    if CONDITIONAL.is_match(source) {
        notes.push("Branches on conditions.".to_string());
    }
    if LOOP.is_match(source) {
        notes.push("Iterates with loops.".to_string());
    }
    if ASYNC.is_match(source) {
        notes.push("Uses asynchronous code.".to_string());
    }
    if ERROR_HANDLING.is_match(source) {
        notes.push("Handles errors.".to_string());
    }

    for (name, line) in rules::recursive_functions(source, language) {
        notes.push(format!("Uses recursion: '{}' (line {}) calls itself.", name, line));
    }

    notes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explain_javascript() {
        let source = "const fs = require('fs');\n\nfunction fact(n) {\n  if (n <= 1) return 1;\n  return n * fact(n - 1);\n}\n";
        let notes = explain(source);
        assert_eq!(notes[0], "Language: JavaScript.");
        assert!(notes.contains(&"Defines 1 function: fact.".to_string()));
        assert!(notes.contains(&"Imports 1 module.".to_string()));
        assert!(notes.contains(&"Branches on conditions.".to_string()));
        assert!(notes.iter().any(|n| n.starts_with("Uses recursion: 'fact' (line 3)")));
        assert!(!notes.contains(&"Iterates with loops.".to_string()));
    }

    #[test]
    fn test_explain_rust_types() {
        let source = "use std::fmt;\n\nstruct Point { x: i32 }\nenum Shape { Dot(Point) }\n\nfn main() {\n    for _ in 0..3 {}\n}\n";
        let notes = explain(source);
        assert_eq!(notes[0], "Language: Rust.");
        assert!(notes.contains(&"Declares 2 types: Point, Shape.".to_string()));
        assert!(notes.contains(&"Iterates with loops.".to_string()));
    }

    #[test]
    fn test_explain_empty_and_unknown() {
        assert_eq!(explain("  \n"), vec!["The source is empty."]);
        assert_eq!(explain("hello world"), vec!["The language could not be determined."]);
    }
}
