//! Recognition of common tool errors in stderr text.
//!
//! Each detector looks at one chunk of text and either recognizes an error
//! family or passes. The first detector that matches wins.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;


#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FoundError {
    pub language: &'static str,
    pub title: String,
    /// Search queries worth trying for this error, most specific first.
    pub queries: Vec<String>,
}

type Detector = fn(&str) -> Option<FoundError>;

const DETECTORS: &[Detector] = &[
    find_python_error,
    find_node_error,
    find_bash_error,
    find_git_error,
    find_npm_error,
];

static PYTHON: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?s)File "[^"]*",.*\n[a-zA-Z0-9]*:.*"#).expect("valid regex"));
static NODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)Thrown:.*\n[a-zA-Z0-9]*:.*").expect("valid regex"));
static BASH: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^-?bash: ").expect("valid regex"));
static GIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^remote: ").expect("valid regex"));
static NPM: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^npm ERR!").expect("valid regex"));
static QUOTED: Lazy<Regex> = Lazy::new(|| Regex::new(r"'.*'").expect("valid regex"));

/// Run every detector over `data` and return the first match.
pub fn extract_error(data: &str) -> Option<FoundError> {
    DETECTORS.iter().find_map(|detect| detect(data))
}

pub fn find_python_error(data: &str) -> Option<FoundError> {
    if !PYTHON.is_match(data) {
        return None;
    }

    let title = last_line(data);
    // Quoted names are usually local variables; drop them for a broader query.
    let stripped = QUOTED.replace(&title, "").into_owned();

    Some(FoundError {
        language: "python",
        queries: vec![title.clone(), stripped],
        title,
    })
}

pub fn find_node_error(data: &str) -> Option<FoundError> {
    NODE.is_match(data)
        .then(|| single_query("node", last_line(data)))
}

pub fn find_bash_error(data: &str) -> Option<FoundError> {
    BASH.is_match(data)
        .then(|| single_query("bash", first_line(data)))
}

pub fn find_git_error(data: &str) -> Option<FoundError> {
    GIT.is_match(data)
        .then(|| single_query("git", first_line(data)))
}

pub fn find_npm_error(data: &str) -> Option<FoundError> {
    NPM.is_match(data)
        .then(|| single_query("npm", first_line(data)))
}

fn single_query(language: &'static str, title: String) -> FoundError {
    FoundError {
        language,
        queries: vec![title.clone()],
        title,
    }
}

fn first_line(data: &str) -> String {
    data.trim().lines().next().unwrap_or_default().to_string()
}

fn last_line(data: &str) -> String {
    data.trim().lines().last().unwrap_or_default().to_string()
}
