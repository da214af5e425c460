use serde_json::Value;

/// Collect the value of every `url` key (ASCII case-insensitive) at any depth.
///
/// String values are returned verbatim; other values are rendered as JSON text.
/// A `url` value is yielded, not descended into.
pub fn find_urls_in_json(v: &Value) -> Vec<String> {
    let mut found = Vec::new();
    walk(v, &mut found);
    found
}

fn walk(v: &Value, found: &mut Vec<String>) {
    match v {
        Value::Object(map) => {
            for (k, val) in map {
                if k.eq_ignore_ascii_case("url") {
                    found.push(match val {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    });
                } else if val.is_object() || val.is_array() {
                    walk(val, found);
                }
            }
        }
        Value::Array(arr) => {
            for item in arr {
                walk(item, found);
            }
        }
        _ => {}
    }
}

/// Treat the whole document as JSON if it parses; otherwise it simply has no JSON urls.
pub fn parse_document_urls(content: &str) -> Vec<String> {
    match serde_json::from_str::<Value>(content) {
        Ok(v) => find_urls_in_json(&v),
        Err(e) => {
            tracing::trace!(error=%e, "document is not json");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nested_and_case_insensitive() {
        let v = json!({"data": {"URL": "/v2/users"}, "items": [{"Url": "https://a.example/x"}, {"name": "n"}]});
        let mut urls = find_urls_in_json(&v);
        urls.sort();
        assert_eq!(urls, vec!["/v2/users".to_string(), "https://a.example/x".to_string()]);
    }

    #[test]
    fn test_non_string_url_value() {
        let v = json!({"url": 42});
        assert_eq!(find_urls_in_json(&v), vec!["42".to_string()]);
    }

    #[test]
    fn test_not_json_is_empty() {
        assert!(parse_document_urls("var a = {url: '/x'};").is_empty());
    }
}
