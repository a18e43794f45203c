//! Best-effort source code heuristics.
//!
//! Everything here is regex and string matching over raw text. There is no
//! parser: strings and comments are only partially understood, and results
//! such as recursion detection are guesses.

mod explainer;
mod language;
mod rules;

use serde::{Deserialize, Serialize};

pub use explainer::explain;
pub use language::{Language, detect_language};

use rules::{comment_prefixes, function_names, is_comment_line};

/// Lines longer than this are reported.
pub const MAX_LINE_LENGTH: usize = 120;
/// Nesting deeper than this is reported.
pub const MAX_NESTING_DEPTH: usize = 4;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, strum::AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    fn penalty(&self) -> u32 {
        match self {
            Severity::Info => 1,
            Severity::Warning => 5,
            Severity::Error => 15,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, strum::AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Rule {
    LongLine,
    TodoComment,
    DebugPrint,
    DeepNesting,
    VarDeclaration,
    LooseEquality,
    EmptyCatch,
    Recursion,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Issue {
    pub severity: Severity,
    pub rule: Rule,
    /// 1-based line number.
    pub line: usize,
    pub message: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CodeMetrics {
    pub total_lines: usize,
    pub code_lines: usize,
    pub comment_lines: usize,
    pub blank_lines: usize,
    pub function_count: usize,
    pub max_nesting_depth: usize,
    /// 1 + branch keywords and boolean operators.
    pub cyclomatic_complexity: usize,
    pub average_line_length: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CodeAnalysis {
    pub language: Language,
    pub metrics: CodeMetrics,
    pub issues: Vec<Issue>,
    /// 0..=100, higher is better.
    pub score: u8,
}

impl CodeAnalysis {
    pub fn issues_for(
        &self,
        rule: Rule,
    ) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(move |i| i.rule == rule)
    }
}

pub fn analyze(source: &str) -> CodeAnalysis {
    let language = detect_language(source);
    let metrics = metrics(source, language);
    let mut issues = rules::check(source, language);
    issues.sort_by_key(|i| i.line);

    let penalty: u32 = issues.iter().map(|i| i.severity.penalty()).sum();
    let score = 100u32.saturating_sub(penalty) as u8;

    CodeAnalysis {
        language,
        metrics,
        issues,
        score,
    }
}

fn metrics(
    source: &str,
    language: Language,
) -> CodeMetrics {
    let prefixes = comment_prefixes(language);
    let mut metrics = CodeMetrics::default();
    let mut total_length = 0;

    for line in source.lines() {
        metrics.total_lines += 1;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            metrics.blank_lines += 1;
        } else if is_comment_line(trimmed, prefixes) {
            metrics.comment_lines += 1;
        } else {
            metrics.code_lines += 1;
            total_length += line.chars().count();
        }
    }

    if metrics.code_lines > 0 {
        metrics.average_line_length = total_length as f64 / metrics.code_lines as f64;
    }
    metrics.function_count = function_names(source, language).len();
    metrics.max_nesting_depth = rules::nesting_depths(source, language).into_iter().max().unwrap_or(0);
    metrics.cyclomatic_complexity = 1 + rules::branch_count(source);
    metrics
}

#[cfg(test)]
mod tests {
    use super::*;

    const JS: &str = r#"// helpers
function fact(n) {
  if (n == 0) {
    return 1;
  }
  return n * fact(n - 1);
}

var total = 0;
console.log(fact(5));
try { run(); } catch (e) {}
"#;

    #[test]
    fn test_metrics() {
        let analysis = analyze(JS);
        assert_eq!(analysis.language, Language::JavaScript);
        assert_eq!(analysis.metrics.total_lines, 11);
        assert_eq!(analysis.metrics.blank_lines, 1);
        assert_eq!(analysis.metrics.comment_lines, 1);
        assert_eq!(analysis.metrics.code_lines, 9);
        assert_eq!(analysis.metrics.function_count, 1);
        assert_eq!(analysis.metrics.max_nesting_depth, 2);
        assert_eq!(analysis.metrics.cyclomatic_complexity, 3);
    }

    #[test]
    fn test_issues_found() {
        let analysis = analyze(JS);
        let rules: Vec<Rule> = analysis.issues.iter().map(|i| i.rule).collect();
        assert!(rules.contains(&Rule::LooseEquality));
        assert!(rules.contains(&Rule::Recursion));
        assert!(rules.contains(&Rule::VarDeclaration));
        assert!(rules.contains(&Rule::DebugPrint));
        assert!(rules.contains(&Rule::EmptyCatch));
        assert_eq!(analysis.issues_for(Rule::LooseEquality).next().unwrap().line, 3);

        let empty_catch = analysis.issues_for(Rule::EmptyCatch).next().unwrap();
        assert_eq!(empty_catch.severity, Severity::Error);
        assert_eq!(empty_catch.line, 11);
        // three warnings, one error, one info
        assert_eq!(analysis.score, 69);
    }

    #[test]
    fn test_clean_rust_scores_full() {
        let source = "fn add(a: i32, b: i32) -> i32 {\n    a + b\n}\n";
        let analysis = analyze(source);
        assert_eq!(analysis.language, Language::Rust);
        assert!(analysis.issues.is_empty());
        assert_eq!(analysis.score, 100);
    }

    #[test]
    fn test_empty_source() {
        let analysis = analyze("");
        assert_eq!(analysis.metrics, CodeMetrics {
            cyclomatic_complexity: 1,
            ..Default::default()
        });
        assert_eq!(analysis.score, 100);
    }
}
