//! Rendering of Poetry dependency declarations as PEP 508 requirement strings.
//!
//! Poetry constraints use a richer syntax than the installer does (`^1.2`,
//! `~1.2.3`, bare versions). Everything is translated into plain PEP 440
//! comparison clauses; anything that cannot be translated is passed through
//! verbatim.

use std::cmp::Ordering;
use std::path::{Component, Path, PathBuf};

use crate::dependency::{DependencySpec, DetailedDependency};

/// PEP 440 comparison operators, longest first so prefixes match correctly.
const OPERATORS: &[&str] = &["===", "==", "!=", "~=", ">=", "<=", ">", "<"];

/// Result of translating a Poetry constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Converted {
    /// No restriction (`*` or empty)
    Any,
    /// PEP 440 clauses, to be joined with `,`
    Clauses(Vec<String>),
    /// Not translatable; keep the original text
    Verbatim,
}

/// Render a dependency declaration as one requirement string per alternative.
///
/// `root` is the project root, used to resolve `path` dependencies.
///
/// ```
/// use poetry_meta::{DependencySpec, to_pep_508};
/// use std::path::Path;
///
/// let spec = DependencySpec::Constraint("^7.1".to_string());
/// assert_eq!(to_pep_508("pytest", &spec, Path::new("/project")), vec!["pytest>=7.1,<8.0"]);
/// ```
pub fn to_pep_508(name: &str, spec: &DependencySpec, root: &Path) -> Vec<String> {
    spec.alternatives()
        .iter()
        .map(|detail| render_detailed(name, detail, root))
        .collect()
}

fn render_detailed(name: &str, dep: &DetailedDependency, root: &Path) -> String {
    let mut requirement = name.to_string();

    if !dep.extras.is_empty() {
        requirement.push('[');
        requirement.push_str(&dep.extras.join(","));
        requirement.push(']');
    }

    if let Some(git) = &dep.git {
        requirement.push_str(" @ ");
        requirement.push_str(&git_url(git));
        if let Some(reference) = dep.git_reference() {
            requirement.push('@');
            requirement.push_str(reference);
        }
        if let Some(subdirectory) = &dep.subdirectory {
            requirement.push_str("#subdirectory=");
            requirement.push_str(subdirectory);
        }
    } else if let Some(path) = &dep.path {
        requirement.push_str(" @ ");
        requirement.push_str(&file_url(root, path));
    } else if let Some(url) = &dep.url {
        requirement.push_str(" @ ");
        requirement.push_str(url);
    } else if let Some(specifier) = dep.version.as_deref().and_then(version_specifier) {
        requirement.push_str(&specifier);
    }

    let markers = markers(dep);
    if !markers.is_empty() {
        requirement.push_str(" ; ");
        requirement.push_str(&markers);
    }

    requirement
}

/// Translate a Poetry version constraint into a PEP 440 specifier.
///
/// Returns `None` when the constraint places no restriction on the version.
///
/// ```
/// use poetry_meta::version_specifier;
///
/// assert_eq!(version_specifier("^0.2.3").as_deref(), Some(">=0.2.3,<0.3.0"));
/// assert_eq!(version_specifier("~1.2").as_deref(), Some(">=1.2,<1.3"));
/// assert_eq!(version_specifier("1.0.0").as_deref(), Some("==1.0.0"));
/// assert_eq!(version_specifier("*"), None);
/// ```
pub fn version_specifier(constraint: &str) -> Option<String> {
    match convert(constraint) {
        Converted::Any => None,
        Converted::Clauses(clauses) => Some(clauses.join(",")),
        Converted::Verbatim => {
            tracing::warn!(constraint, "Cannot translate version constraint, passing it through");
            Some(constraint.trim().to_string())
        }
    }
}

/// Translate a Poetry `python = "..."` constraint into an environment marker.
///
/// ```
/// use poetry_meta::python_marker;
///
/// assert_eq!(
///     python_marker("^3.8").as_deref(),
///     Some(r#"python_version >= "3.8" and python_version < "4.0""#)
/// );
/// ```
pub fn python_marker(constraint: &str) -> Option<String> {
    let mut alternatives = Vec::new();
    for alternative in constraint.split("||") {
        match convert(alternative) {
            Converted::Any => return None,
            Converted::Clauses(clauses) => {
                let rendered: Vec<String> =
                    clauses.iter().filter_map(|c| python_clause(c)).collect();
                alternatives.push(rendered.join(" and "));
            }
            Converted::Verbatim => {
                tracing::warn!(constraint, "Cannot translate python constraint, ignoring it");
                return None;
            }
        }
    }

    match alternatives.len() {
        0 => None,
        1 => alternatives.pop(),
        _ => Some(
            alternatives
                .iter()
                .map(|alt| parenthesize_if(alt, " and "))
                .collect::<Vec<_>>()
                .join(" or "),
        ),
    }
}

fn convert(constraint: &str) -> Converted {
    let constraint = constraint.trim();
    if constraint.is_empty() || constraint == "*" {
        return Converted::Any;
    }
    if constraint.contains("||") {
        return Converted::Verbatim;
    }

    let mut clauses = Vec::new();
    for clause in split_clauses(constraint) {
        match convert_clause(&clause) {
            Some(converted) => clauses.extend(converted),
            None => return Converted::Verbatim,
        }
    }

    if clauses.is_empty() {
        Converted::Any
    } else {
        Converted::Clauses(clauses)
    }
}

/// Split on commas and whitespace, re-attaching detached operators
/// (`>= 1.0` becomes `>=1.0`).
fn split_clauses(constraint: &str) -> Vec<String> {
    let mut clauses = Vec::new();
    let mut pending_operator = String::new();

    for token in constraint
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
    {
        if token.chars().all(|c| "<>=!~^".contains(c)) {
            pending_operator.push_str(token);
            continue;
        }
        clauses.push(format!("{pending_operator}{token}"));
        pending_operator.clear();
    }

    if !pending_operator.is_empty() {
        clauses.push(pending_operator);
    }
    clauses
}

fn convert_clause(clause: &str) -> Option<Vec<String>> {
    if clause == "*" {
        return Some(Vec::new());
    }
    if let Some(version) = clause.strip_prefix('^') {
        let release = parse_release(version)?;
        let upper = bump(&release, breaking_index(&release))?;
        return Some(vec![format!(">={version}"), format!("<{upper}")]);
    }
    if clause.starts_with("~=") {
        return Some(vec![clause.to_string()]);
    }
    if let Some(version) = clause.strip_prefix('~') {
        let release = parse_release(version)?;
        let index = if release.len() == 1 { 0 } else { 1 };
        let upper = bump(&release, index)?;
        return Some(vec![format!(">={version}"), format!("<{upper}")]);
    }
    if let Some(op) = OPERATORS.iter().find(|op| clause.starts_with(**op)) {
        return if clause.len() > op.len() {
            Some(vec![clause.to_string()])
        } else {
            None
        };
    }
    let version = clause.strip_prefix('=').unwrap_or(clause);
    if version.starts_with(|c: char| c.is_ascii_digit()) {
        Some(vec![format!("=={version}")])
    } else {
        None
    }
}

/// Numeric release segments of a version, e.g. `1.2.3b1` gives `[1, 2, 3]`.
fn parse_release(version: &str) -> Option<Vec<u64>> {
    if version.contains('*') {
        return None;
    }
    let numeric: String = version
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    let release: Option<Vec<u64>> = numeric
        .trim_end_matches('.')
        .split('.')
        .map(|part| part.parse().ok())
        .collect();
    release.filter(|r| !r.is_empty())
}

/// Index of the segment a caret requirement bumps.
fn breaking_index(release: &[u64]) -> usize {
    if release[0] > 0 || release.len() == 1 {
        0
    } else if release[1] > 0 || release.len() == 2 {
        1
    } else {
        2
    }
}

/// Increment the segment at `index` and zero the ones after it, keeping
/// the number of segments. `None` if the segment cannot be incremented.
fn bump(release: &[u64], index: usize) -> Option<String> {
    let segments = release
        .iter()
        .enumerate()
        .map(|(i, n)| match i.cmp(&index) {
            Ordering::Less => Some(n.to_string()),
            Ordering::Equal => n.checked_add(1).map(|n| n.to_string()),
            Ordering::Greater => Some("0".to_string()),
        })
        .collect::<Option<Vec<_>>>()?;
    Some(segments.join("."))
}

fn python_clause(clause: &str) -> Option<String> {
    let op = OPERATORS.iter().find(|op| clause.starts_with(**op))?;
    let version = &clause[op.len()..];
    let field = if version.split('.').count() >= 3 && !version.contains('*') {
        "python_full_version"
    } else {
        "python_version"
    };
    Some(format!("{field} {op} \"{version}\""))
}

fn markers(dep: &DetailedDependency) -> String {
    let mut markers = Vec::new();
    if let Some(python) = dep.python.as_deref().and_then(python_marker) {
        markers.push(python);
    }
    if let Some(platform) = &dep.platform {
        markers.push(format!("sys_platform == \"{}\"", platform.trim()));
    }
    if let Some(extra) = dep.markers.as_deref().map(str::trim).filter(|m| !m.is_empty()) {
        markers.push(extra.to_string());
    }

    if markers.len() == 1 {
        return markers.remove(0);
    }
    markers
        .iter()
        .map(|m| parenthesize_if(m, " or "))
        .collect::<Vec<_>>()
        .join(" and ")
}

fn parenthesize_if(expr: &str, needle: &str) -> String {
    if expr.contains(needle) {
        format!("({expr})")
    } else {
        expr.to_string()
    }
}

fn git_url(url: &str) -> String {
    if url.starts_with("git+") {
        return url.to_string();
    }
    // scp-like `git@host:org/repo.git`
    if !url.contains("://") {
        if let Some((host, path)) = url.split_once(':') {
            return format!("git+ssh://{host}/{path}");
        }
    }
    format!("git+{url}")
}

fn file_url(root: &Path, path: &str) -> String {
    let candidate = Path::new(path);
    let joined = if candidate.is_absolute() {
        candidate.to_path_buf()
    } else {
        root.join(candidate)
    };
    let absolute = std::path::absolute(&joined).unwrap_or(joined);

    match url::Url::from_file_path(normalize_lexically(&absolute)) {
        Ok(url) => url.to_string(),
        Err(()) => {
            tracing::warn!(path, "Cannot express dependency path as a file URL");
            path.to_string()
        }
    }
}

fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}
