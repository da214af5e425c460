//! Parameter-name mining over raw (often minified) script text.
//!
//! Each heuristic is an independent pass returning its own set. They overlap
//! freely; the public entry point unions them and the set dedups by value.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

static IDENTIFIER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_]*$").unwrap());

static QUERY_KEY: Lazy<Regex> = Lazy::new(|| Regex::new(r"[?&]([a-zA-Z_][a-zA-Z0-9_]*)\s*=").unwrap());
static NAME_ATTR: Lazy<Regex> = Lazy::new(|| Regex::new(r#"name\s*=\s*["']([^"']+)["']"#).unwrap());
static JSON_FIELD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"["']([a-zA-Z_][a-zA-Z0-9_]*)["']:\s*["']?[^,}]+["']?"#).unwrap()
});
static FUNCTION_PARAMS: Lazy<Regex> = Lazy::new(|| Regex::new(r"function\s+\w*\s*\(([^)]*)\)").unwrap());
static ARROW_PARAMS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:const|let|var)?\s*(?:\(([^)]*)\)|([a-zA-Z_][a-zA-Z0-9_]*))\s*=>").unwrap()
});
static BRACE_GROUP: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{\s*([^}]+)\s*\}").unwrap());
static REQUEST_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\.setRequestHeader\s*\(\s*["']([^"']+)["']"#).unwrap()
});
static API_FIELD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"["']([a-zA-Z_][a-zA-Z0-9_]*)["']:\s*(?:req\.(?:body|query|params)\.)?[a-zA-Z_][a-zA-Z0-9_]*"#)
        .unwrap()
});

static DEFAULT_VALUE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*=.*$").unwrap());
static DESTRUCTURE_BRACKETS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[{}\[\]]").unwrap());

/// Extract every parameter-like name found in `content`.
pub fn extract_parameters(content: &str) -> BTreeSet<String> {
    let passes: [fn(&str) -> BTreeSet<String>; 8] = [
        query_keys,
        form_names,
        json_fields,
        function_params,
        arrow_params,
        destructured_keys,
        request_headers,
        api_fields,
    ];

    let mut params = BTreeSet::new();
    for pass in passes {
        params.extend(pass(content));
    }
    params
}

pub fn is_identifier(s: &str) -> bool {
    IDENTIFIER.is_match(s)
}

fn first_group(re: &Regex, content: &str) -> BTreeSet<String> {
    re.captures_iter(content)
        .filter_map(|cap| cap.get(1).map(|m| m.as_str().to_string()))
        .collect()
}

/// `?user_id=` / `&token=`
fn query_keys(content: &str) -> BTreeSet<String> {
    first_group(&QUERY_KEY, content)
}

/// `name="..."`; the value is kept as written.
fn form_names(content: &str) -> BTreeSet<String> {
    first_group(&NAME_ATTR, content)
}

fn json_fields(content: &str) -> BTreeSet<String> {
    first_group(&JSON_FIELD, content)
}

fn request_headers(content: &str) -> BTreeSet<String> {
    first_group(&REQUEST_HEADER, content)
}

/// `"id": req.body.id`, `"limit": pageSize`
fn api_fields(content: &str) -> BTreeSet<String> {
    first_group(&API_FIELD, content)
}

fn function_params(content: &str) -> BTreeSet<String> {
    let mut out = BTreeSet::new();
    for cap in FUNCTION_PARAMS.captures_iter(content) {
        if let Some(list) = cap.get(1) {
            out.extend(split_param_list(list.as_str()));
        }
    }
    out
}

/// `(a, b) =>` or `x =>`
fn arrow_params(content: &str) -> BTreeSet<String> {
    let mut out = BTreeSet::new();
    for cap in ARROW_PARAMS.captures_iter(content) {
        if let Some(list) = cap.get(1).or_else(|| cap.get(2)) {
            out.extend(split_param_list(list.as_str()));
        }
    }
    out
}

/// Any `{ ... }` span split on commas; `key: alias` keeps `key`.
fn destructured_keys(content: &str) -> BTreeSet<String> {
    let mut out = BTreeSet::new();
    for cap in BRACE_GROUP.captures_iter(content) {
        let Some(group) = cap.get(1) else { continue };
        for entry in group.as_str().split(',') {
            let mut entry = entry.trim();
            if let Some((key, _alias)) = entry.split_once(':') {
                entry = key.trim();
            }
            if is_identifier(entry) {
                out.insert(entry.to_string());
            }
        }
    }
    out
}

/// Split a parenthesized parameter list, dropping defaults and destructuring brackets.
fn split_param_list(list: &str) -> Vec<String> {
    if list.trim().is_empty() {
        return Vec::new();
    }
    list.split(',')
        .filter_map(|raw| {
            let without_default = DEFAULT_VALUE.replace(raw.trim(), "");
            let cleaned = DESTRUCTURE_BRACKETS.replace_all(&without_default, "");
            let cleaned = cleaned.trim();
            is_identifier(cleaned).then(|| cleaned.to_string())
        })
        .collect()
}
