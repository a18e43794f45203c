use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, strum::AsRefStr, strum::Display)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    Rust,
    Python,
    JavaScript,
    TypeScript,
    Unknown,
}

fn patterns(list: &[&str]) -> Vec<Regex> {
    list.iter().map(|p| Regex::new(p).unwrap()).collect()
}

static RUST: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    patterns(&[r"\bfn\s+\w+\s*[<(]", r"\blet\s+mut\b", r"\bimpl\b", r"\w::\w", r"\)\s*->\s*[\w&(]", r"(?m)^\s*use\s+\w+(::\w+)*", r"\b(println|vec|format)!"])
});

static PYTHON: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    patterns(&[r"(?m)^\s*(async\s+)?def\s+\w+\s*\(.*\)\s*(->.*)?:\s*$", r"(?m)^\s*(import\s+\w+|from\s+[\w.]+\s+import\b)", r"\belif\b", r"\bself\.", r"(?m):\s*$", r"\bNone\b"])
});

static JAVASCRIPT: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    patterns(&[r"\bfunction\b", r"\b(const|let|var)\s+[\w$]+\s*=", r"=>", r"\bconsole\.", r"===|!==", r"\brequire\s*\(", r"\bexport\s+(default\s+)?\w"])
});

static TYPESCRIPT: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    patterns(&[r":\s*(string|number|boolean|any|void|unknown|never)\b", r"\binterface\s+\w+\s*\{", r"\btype\s+\w+\s*=", r"\b(private|public|readonly)\s+\w+\s*:"])
});

fn score(
    source: &str,
    patterns: &[Regex],
) -> usize {
    patterns.iter().filter(|p| p.is_match(source)).count()
}

/// Guess the language of `source` from keyword patterns.
pub fn detect_language(source: &str) -> Language {
    let rust = score(source, &RUST);
    let python = score(source, &PYTHON);
    let javascript = score(source, &JAVASCRIPT);
    let typescript = score(source, &TYPESCRIPT);

    let best = rust.max(python).max(javascript + typescript);
    if best == 0 {
        return Language::Unknown;
    }
    if javascript + typescript == best && javascript + typescript > rust.max(python) {
        return if typescript > 0 { Language::TypeScript } else { Language::JavaScript };
    }
    if rust == best && rust > python {
        return Language::Rust;
    }
    if python == best && python > rust {
        return Language::Python;
    }
    Language::Unknown
}
