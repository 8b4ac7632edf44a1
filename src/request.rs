use serde_json::Value;

/// HTTP method of an outbound API call. The Unkey API only uses these two.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Method {
    Get,
    Post,
}

/// Description of one outbound API call.
///
/// `path` is joined with `/` under the client's base URL and must be
/// non-empty. Query and body are forwarded verbatim.
#[derive(Clone, Debug)]
pub(crate) struct ApiRequest {
    pub path: &'static [&'static str],
    pub method: Method,
    pub query: Option<Vec<(String, String)>>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn post(path: &'static [&'static str], body: Value) -> Self {
        debug_assert!(!path.is_empty());
        Self {
            path,
            method: Method::Post,
            query: None,
            body: Some(body),
        }
    }

    pub fn get(path: &'static [&'static str], query: Value) -> Self {
        debug_assert!(!path.is_empty());
        Self {
            path,
            method: Method::Get,
            query: Some(query_pairs(&query)),
            body: None,
        }
    }
}

/// Flattens a top-level JSON object into URL query pairs.
///
/// Scalars are stringified (strings without quotes), nulls are skipped, and
/// nested values are compact-encoded as JSON. Non-object inputs yield no
/// pairs.
pub(crate) fn query_pairs(value: &Value) -> Vec<(String, String)> {
    let Some(map) = value.as_object() else {
        return Vec::new();
    };

    map.iter()
        .filter_map(|(key, value)| {
            let rendered = match value {
                Value::Null => return None,
                Value::String(s) => s.clone(),
                Value::Bool(b) => b.to_string(),
                Value::Number(n) => n.to_string(),
                other => other.to_string(),
            };
            Some((key.clone(), rendered))
        })
        .collect()
}
