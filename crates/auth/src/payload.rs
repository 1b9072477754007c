//! Canonical payload construction for edgeX request signatures.
//!
//! The signed content is `{timestamp}{METHOD}{path}{params}` with no separators,
//! where `params` is either the flattened JSON body or, for requests without a
//! body, the sorted query string. The message hash is Keccak-256 of that
//! content reduced into the STARK field.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;
use sha3::{Digest, Keccak256};
use stark_crypto::{reduce_digest, ReducedDigest};

/// Query parameter carrying the account id on account-scoped requests.
pub const ACCOUNT_ID_PARAM: &str = "accountId";

/// HTTP method of a signed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request to be signed: everything that goes into the canonical payload
/// except the timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthRequest {
    method: HttpMethod,
    path: String,
    query: BTreeMap<String, String>,
    body: Option<Value>,
}

impl AuthRequest {
    /// Create a request for `path`.
    ///
    /// A query string in `path` (`/api/v1/x?a=1&b=2`) is split off into
    /// parameters; values are taken verbatim, without percent-decoding.
    pub fn new(method: HttpMethod, path: &str) -> Self {
        let (path, query) = match path.split_once('?') {
            Some((path, query)) => (path, parse_query(query)),
            None => (path, BTreeMap::new()),
        };
        Self {
            method,
            path: path.to_string(),
            query,
            body: None,
        }
    }

    pub fn get(path: &str) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn post(path: &str, body: Value) -> Self {
        Self::new(HttpMethod::Post, path).with_body(body)
    }

    /// Add or replace a query parameter.
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Scope the request to an account.
    ///
    /// Sets the `accountId` query parameter and, for JSON object bodies, the
    /// `accountId` field unless the body already has one.
    pub fn with_account_id(mut self, account_id: u64) -> Self {
        let account_id = account_id.to_string();
        if let Some(Value::Object(fields)) = &mut self.body {
            fields
                .entry(ACCOUNT_ID_PARAM)
                .or_insert_with(|| Value::String(account_id.clone()));
        }
        self.with_query(ACCOUNT_ID_PARAM, account_id)
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> &BTreeMap<String, String> {
        &self.query
    }

    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// The `params` part of the payload: flattened body, else sorted query.
    pub fn canonical_params(&self) -> String {
        match &self.body {
            Some(body) => flatten_value(body),
            None => self
                .query
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect::<Vec<_>>()
                .join("&"),
        }
    }

    /// The full string that is hashed and signed.
    pub fn sign_content(&self, timestamp_ms: i64) -> String {
        format!(
            "{}{}{}{}",
            timestamp_ms,
            self.method.as_str(),
            self.path,
            self.canonical_params()
        )
    }

    /// Keccak-256 of the sign content, reduced into the field.
    pub fn message_hash(&self, timestamp_ms: i64) -> ReducedDigest {
        hash_sign_content(&self.sign_content(timestamp_ms))
    }
}

/// Keccak-256 of `content`, reduced modulo the field prime.
pub fn hash_sign_content(content: &str) -> ReducedDigest {
    let digest: [u8; 32] = Keccak256::digest(content.as_bytes()).into();
    let reduced = reduce_digest(&digest);
    if reduced.reduced {
        tracing::debug!("Sign content digest exceeded the field prime and was reduced");
    }
    reduced
}

fn parse_query(query: &str) -> BTreeMap<String, String> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((k, v)) => (k.to_string(), v.to_string()),
            None => (pair.to_string(), String::new()),
        })
        .collect()
}

/// Render a JSON value in the exchange's flattened form.
///
/// Objects become `key=value` pairs sorted by key and joined with `&`, arrays
/// join their elements with `&`, strings are raw and `null` is empty.
pub fn flatten_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(flatten_value).collect::<Vec<_>>().join("&"),
        Value::Object(fields) => {
            let mut entries: Vec<(&String, &Value)> = fields.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            entries
                .into_iter()
                .map(|(k, v)| format!("{}={}", k, flatten_value(v)))
                .collect::<Vec<_>>()
                .join("&")
        }
    }
}
