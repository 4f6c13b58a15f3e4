// File: src/request.rs
// Purpose: Turn submitted request bodies into formgate data records

use axum::{
    async_trait,
    body::Bytes,
    extract::{rejection::BytesRejection, FromRequest, Request},
    http::{header, HeaderMap},
};
use formgate::Value;

/// Highest list index accepted from bracket keys such as `address[3][city]`
const MAX_LIST_INDEX: usize = 1024;

/// Deepest bracket nesting accepted; deeper keys are dropped
const MAX_NESTING: usize = 64;

/// A submitted form, parsed from the request body
#[derive(Debug, Clone)]
pub struct FormRequest {
    data: Value,
    accepts_json: bool,
}

impl FormRequest {
    /// Parse the query string and a body according to its content type.
    ///
    /// Body fields override query fields of the same name. Unknown content
    /// types and malformed bodies give an empty record, so the rules report
    /// the missing fields.
    pub fn from_parts(headers: &HeaderMap, query: Option<&str>, body: &[u8]) -> Self {
        let content_type = header_str(headers, header::CONTENT_TYPE.as_str()).unwrap_or("");

        let data = if content_type.contains("application/json") {
            serde_json::from_slice::<serde_json::Value>(body)
                .map(Value::from)
                .unwrap_or_else(|e| {
                    tracing::debug!("Ignoring malformed JSON body: {}", e);
                    Value::object()
                })
        } else if content_type.contains("application/x-www-form-urlencoded") {
            parse_urlencoded(&String::from_utf8_lossy(body))
        } else {
            Value::object()
        };

        let data = match query.filter(|q| !q.is_empty()) {
            Some(query) => merge_input(parse_urlencoded(query), data),
            None => data,
        };

        Self {
            data: data.trimmed(),
            accepts_json: accepts_json(headers),
        }
    }

    pub fn data(&self) -> &Value {
        &self.data
    }

    /// Check if the client asked for a JSON response
    pub fn accepts_json(&self) -> bool {
        self.accepts_json
    }
}

#[async_trait]
impl<S> FromRequest<S> for FormRequest
where
    S: Send + Sync,
{
    type Rejection = BytesRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let headers = req.headers().clone();
        let query = req.uri().query().map(str::to_string);
        let body = Bytes::from_request(req, state).await?;
        Ok(Self::from_parts(&headers, query.as_deref(), &body))
    }
}

/// Top-level body fields win over query fields
fn merge_input(query: Value, body: Value) -> Value {
    match (query, body) {
        (Value::Object(mut merged), Value::Object(body)) => {
            merged.extend(body);
            Value::Object(merged)
        }
        (_, body) => body,
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name)?.to_str().ok()
}

fn accepts_json(headers: &HeaderMap) -> bool {
    header_str(headers, header::ACCEPT.as_str())
        .map(|accept| accept.contains("application/json"))
        .unwrap_or(false)
}

/// Parse `application/x-www-form-urlencoded`, building nested values from
/// bracket keys: `name[first]`, `address[0][city]`, `tags[]`
pub fn parse_urlencoded(body: &str) -> Value {
    let mut data = Value::object();

    for pair in body.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        let key = decode(key);
        let segments = split_key(&key);
        if segments.first().map_or(true, |s| s.is_empty()) {
            continue;
        }
        if segments.len() > MAX_NESTING {
            tracing::debug!(depth = segments.len(), "Dropping over-nested form key");
            continue;
        }
        insert(&mut data, &segments, Value::String(decode(value)));
    }

    data
}

fn decode(raw: &str) -> String {
    let raw = raw.replace('+', " ");
    urlencoding::decode(&raw)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| raw.clone())
}

/// `address[0][city]` -> `["address", "0", "city"]`, `tags[]` -> `["tags", ""]`
fn split_key(key: &str) -> Vec<&str> {
    let Some(open) = key.find('[') else {
        return vec![key];
    };

    let mut segments = vec![&key[..open]];
    let mut rest = &key[open..];
    while let Some(inner) = rest.strip_prefix('[') {
        let Some(close) = inner.find(']') else {
            break;
        };
        // One past the limit is enough for the caller to reject the key
        if segments.len() > MAX_NESTING {
            break;
        }
        segments.push(&inner[..close]);
        rest = &inner[close + 1..];
    }
    segments
}

fn insert(target: &mut Value, segments: &[&str], value: Value) {
    let Some((head, rest)) = segments.split_first() else {
        *target = value;
        return;
    };

    if head.is_empty() {
        if !matches!(target, Value::Array(_)) {
            *target = Value::Array(Vec::new());
        }
        if let Value::Array(items) = target {
            items.push(Value::Null);
            if let Some(last) = items.last_mut() {
                insert(last, rest, value);
            }
        }
        return;
    }

    let index = head
        .parse::<usize>()
        .ok()
        .filter(|i| *i <= MAX_LIST_INDEX && !matches!(target, Value::Object(_)));

    match index {
        Some(index) => {
            if !matches!(target, Value::Array(_)) {
                *target = Value::Array(Vec::new());
            }
            if let Value::Array(items) = target {
                if items.len() <= index {
                    items.resize(index + 1, Value::Null);
                }
                insert(&mut items[index], rest, value);
            }
        }
        None => {
            if let Value::Array(items) = target {
                let items = std::mem::take(items);
                *target = items
                    .into_iter()
                    .enumerate()
                    .map(|(index, item)| (index.to_string(), item))
                    .collect();
            } else if !matches!(target, Value::Object(_)) {
                *target = Value::object();
            }
            if let Value::Object(map) = target {
                insert(map.entry(head.to_string()).or_default(), rest, value);
            }
        }
    }
}
