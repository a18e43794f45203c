use std::sync::LazyLock;

use regex::Regex;

use super::{Issue, Language, MAX_LINE_LENGTH, MAX_NESTING_DEPTH, Rule, Severity};

static BRANCH: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(if|elif|for|while|case|catch|except)\b|&&|\|\|").unwrap());
static TODO: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(TODO|FIXME|HACK|XXX)\b").unwrap());
static JS_DEBUG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bconsole\.(log|debug|trace)\s*\(").unwrap());
static PY_DEBUG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(^|[^.\w])print\s*\(").unwrap());
static RUST_DEBUG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(dbg|println|eprintln)!\s*\(").unwrap());
static VAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bvar\s+[A-Za-z_$]").unwrap());
static LOOSE_EQUALITY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(^|[^=!<>])(==|!=)($|[^=])").unwrap());
static EMPTY_CATCH: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bcatch\s*(\([^)]*\))?\s*\{\s*\}").unwrap());
static EMPTY_EXCEPT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^[ \t]*except\b[^:\n]*:[ \t]*(pass\b|\n[ \t]*pass\b)").unwrap());

static JS_FUNCTION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bfunction\s*\*?\s*([A-Za-z_$][\w$]*)\s*\(").unwrap());
static JS_ARROW: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(?:const|let|var)\s+([A-Za-z_$][\w$]*)\s*=\s*(?:async\s*)?(?:\([^)]*\)|[A-Za-z_$][\w$]*)\s*=>").unwrap());
static RUST_FUNCTION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bfn\s+([A-Za-z_]\w*)").unwrap());
static PY_FUNCTION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^[ \t]*(?:async\s+)?def\s+([A-Za-z_]\w*)").unwrap());

pub(super) fn comment_prefixes(language: Language) -> &'static [&'static str] {
    match language {
        Language::Python => &["#"],
        Language::Rust | Language::JavaScript | Language::TypeScript => &["//", "/*", "*"],
        Language::Unknown => &["//", "/*", "*", "#"],
    }
}

pub(super) fn is_comment_line(
    trimmed: &str,
    prefixes: &[&str],
) -> bool {
    prefixes.iter().any(|p| trimmed.starts_with(p))
}

fn definition_patterns(language: Language) -> Vec<&'static Regex> {
    match language {
        Language::Rust => vec![&*RUST_FUNCTION],
        Language::Python => vec![&*PY_FUNCTION],
        Language::JavaScript | Language::TypeScript => vec![&*JS_FUNCTION, &*JS_ARROW],
        Language::Unknown => vec![&*RUST_FUNCTION, &*PY_FUNCTION, &*JS_FUNCTION, &*JS_ARROW],
    }
}

/// A named function definition: its name, the byte offset just past the
/// matched header and the 1-based line it starts on.
struct Definition {
    name: String,
    end: usize,
    line: usize,
}

fn definitions(
    source: &str,
    language: Language,
) -> Vec<Definition> {
    let mut found: Vec<Definition> = Vec::new();
    for pattern in definition_patterns(language) {
        for caps in pattern.captures_iter(source) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            found.push(Definition {
                name: name.as_str().to_string(),
                end: whole.end(),
                line: line_of(source, whole.start()),
            });
        }
    }
    found.sort_by_key(|d| d.end);
    found
}

/// Unique function names in definition order.
pub(super) fn function_names(
    source: &str,
    language: Language,
) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for definition in definitions(source, language) {
        if !names.contains(&definition.name) {
            names.push(definition.name);
        }
    }
    names
}

/// Functions whose body mentions their own name followed by `(`.
pub(super) fn recursive_functions(
    source: &str,
    language: Language,
) -> Vec<(String, usize)> {
    let mut recursive: Vec<(String, usize)> = Vec::new();
    for definition in definitions(source, language) {
        let Some(body) = body_of(source, definition.end, language) else {
            continue;
        };
        let Ok(call) = Regex::new(&format!(r"(^|[^\w$.]){}\s*\(", regex::escape(&definition.name))) else {
            continue;
        };
        if call.is_match(body) && !recursive.iter().any(|(n, _)| n == &definition.name) {
            recursive.push((definition.name, definition.line));
        }
    }
    recursive
}

/// Body text following a definition header ending at `start`.
fn body_of(
    source: &str,
    start: usize,
    language: Language,
) -> Option<&str> {
    let rest = source.get(start..)?;
    if language == Language::Python {
        return Some(indented_block(rest));
    }

    // arrow functions without a block end at the statement
    let open = match rest.find('{') {
        Some(open) if !rest[..open].contains(';') => open,
        _ => return rest.split(';').next(),
    };
    let mut depth = 0usize;
    for (i, c) in rest[open..].char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&rest[open + 1..open + i]);
                }
            }
            _ => {}
        }
    }
    Some(&rest[open + 1..])
}

/// Lines after the header that are indented more than the first body line's parent.
fn indented_block(rest: &str) -> &str {
    let Some(newline) = rest.find('\n') else {
        return rest;
    };
    let body = &rest[newline + 1..];
    let mut indent = None;
    let mut end = body.len();
    let mut offset = 0;
    for line in body.split_inclusive('\n') {
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            let width = indentation(line);
            match indent {
                None if width == 0 => {
                    end = offset;
                    break;
                }
                None => indent = Some(width),
                Some(level) if width < level => {
                    end = offset;
                    break;
                }
                _ => {}
            }
        }
        offset += line.len();
    }
    &body[..end]
}

fn indentation(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace() && *c != '\n').map(|c| if c == '\t' { 4 } else { 1 }).sum()
}

/// Deepest nesting level reached on each line.
///
/// Brace languages count `{`/`}` outside of string literals and line
/// comments; Python uses indentation in steps of four columns.
pub(super) fn nesting_depths(
    source: &str,
    language: Language,
) -> Vec<usize> {
    if language == Language::Python {
        return source
            .lines()
            .map(|line| {
                let trimmed = line.trim();
                if trimmed.is_empty() || trimmed.starts_with('#') { 0 } else { indentation(line) / 4 }
            })
            .collect();
    }

    let mut depth = 0usize;
    let mut depths = Vec::new();
    for line in source.lines() {
        let mut max = depth;
        let mut leading = true;
        let mut quote: Option<char> = None;
        let mut prev = '\0';
        for c in line.chars() {
            match quote {
                Some(q) => {
                    if c == q && prev != '\\' {
                        quote = None;
                    }
                }
                None => match c {
                    '"' | '\'' | '`' => {
                        quote = Some(c);
                        leading = false;
                    }
                    '/' if prev == '/' => break,
                    '{' => {
                        depth += 1;
                        max = max.max(depth);
                        leading = false;
                    }
                    '}' => {
                        depth = depth.saturating_sub(1);
                        // a line opening with `}` belongs to the outer block
                        if leading {
                            max = depth;
                        }
                    }
                    c if !c.is_whitespace() => leading = false,
                    _ => {}
                },
            }
            prev = c;
        }
        depths.push(max);
    }
    depths
}

pub(super) fn branch_count(source: &str) -> usize {
    BRANCH.find_iter(source).count()
}

fn line_of(
    source: &str,
    offset: usize,
) -> usize {
    source[..offset].matches('\n').count() + 1
}

fn issue(
    severity: Severity,
    rule: Rule,
    line: usize,
    message: impl Into<String>,
) -> Issue {
    Issue {
        severity,
        rule,
        line,
        message: message.into(),
    }
}

pub(super) fn check(
    source: &str,
    language: Language,
) -> Vec<Issue> {
    let js = matches!(language, Language::JavaScript | Language::TypeScript);
    let mut issues = Vec::new();

    for (index, line) in source.lines().enumerate() {
        let number = index + 1;

        let length = line.chars().count();
        if length > MAX_LINE_LENGTH {
            issues.push(issue(Severity::Info, Rule::LongLine, number, format!("line is {} characters long (max {})", length, MAX_LINE_LENGTH)));
        }
        if let Some(m) = TODO.find(line) {
            issues.push(issue(Severity::Info, Rule::TodoComment, number, format!("unresolved {} comment", m.as_str())));
        }

        let debug = match language {
            Language::Rust => RUST_DEBUG.is_match(line),
            Language::Python => PY_DEBUG.is_match(line),
            Language::JavaScript | Language::TypeScript | Language::Unknown => JS_DEBUG.is_match(line),
        };
        if debug {
            issues.push(issue(Severity::Warning, Rule::DebugPrint, number, "debug output left in code"));
        }

        if js {
            if VAR.is_match(line) {
                issues.push(issue(Severity::Warning, Rule::VarDeclaration, number, "use 'let' or 'const' instead of 'var'"));
            }
            if let Some(op) = LOOSE_EQUALITY.captures(line).and_then(|caps| caps.get(2)) {
                let strict = if op.as_str() == "==" { "===" } else { "!==" };
                issues.push(issue(Severity::Warning, Rule::LooseEquality, number, format!("use '{}' instead of '{}'", strict, op.as_str())));
            }
        }
    }

    let mut deep = false;
    for (index, depth) in nesting_depths(source, language).into_iter().enumerate() {
        if depth > MAX_NESTING_DEPTH && !deep {
            issues.push(issue(Severity::Warning, Rule::DeepNesting, index + 1, format!("nesting depth {} exceeds {}", depth, MAX_NESTING_DEPTH)));
        }
        deep = depth > MAX_NESTING_DEPTH;
    }

    let empty_handler = if language == Language::Python { &EMPTY_EXCEPT } else { &EMPTY_CATCH };
    for m in empty_handler.find_iter(source) {
        issues.push(issue(Severity::Error, Rule::EmptyCatch, line_of(source, m.start()), "errors are silently ignored"));
    }

    for (name, line) in recursive_functions(source, language) {
        issues.push(issue(Severity::Info, Rule::Recursion, line, format!("function '{}' calls itself", name)));
    }

    issues
}
