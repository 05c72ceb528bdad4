//! Inbound request model
//!
//! [`ApiRequest`] mirrors the proxy event a serverless HTTP front end hands to
//! the function. It is built once at the boundary, either from the raw event
//! JSON or from a hyper request, and handlers only ever see this type.

use http_body_util::BodyExt;
use hyper::body::Body;
use hyper::{Method, Request};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

use crate::error::{Error, Result};

/// Proxy event subset the router reads
///
/// A JSON `null` anywhere in these fields means the same as the key being
/// absent, including null values inside the parameter and header maps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRequest {
    #[serde(default, deserialize_with = "null_as_default")]
    pub http_method: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub path: String,
    #[serde(default)]
    pub query_string_parameters: Option<HashMap<String, Option<String>>>,
    #[serde(default)]
    pub headers: Option<HashMap<String, Option<String>>>,
    #[serde(default)]
    pub body: Option<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl ApiRequest {
    pub fn new(method: &str, path: &str) -> Self {
        Self {
            http_method: method.to_string(),
            path: path.to_string(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_query(mut self, key: &str, value: &str) -> Self {
        self.query_string_parameters
            .get_or_insert_with(HashMap::new)
            .insert(key.to_string(), Some(value.to_string()));
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: &str) -> Self {
        self.body = Some(body.to_string());
        self
    }

    /// Parse a raw proxy event
    pub fn from_event(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(Error::MalformedEvent)
    }

    /// Convert a hyper request, collecting its body
    ///
    /// An empty body is treated as absent.
    pub async fn from_http<B>(req: Request<B>) -> Result<Self>
    where
        B: Body,
        B::Error: std::fmt::Display,
    {
        let (parts, body) = req.into_parts();

        let query_string_parameters = parts.uri.query().map(parse_query);
        let headers = parts
            .headers
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), Some(v.to_string())))
            })
            .collect::<HashMap<_, _>>();

        let bytes = body
            .collect()
            .await
            .map_err(|e| Error::RequestBody(e.to_string()))?
            .to_bytes();
        let body = if bytes.is_empty() {
            None
        } else {
            Some(String::from_utf8(bytes.to_vec()).map_err(|e| Error::RequestBody(e.to_string()))?)
        };

        Ok(Self {
            http_method: parts.method.as_str().to_string(),
            path: parts.uri.path().to_string(),
            query_string_parameters,
            headers: Some(headers),
            body,
        })
    }

    /// Method as a typed value; `None` for tokens that are not valid methods
    pub fn method(&self) -> Option<Method> {
        Method::from_bytes(self.http_method.as_bytes()).ok()
    }

    /// Query parameter value; a null value reads as absent
    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query_string_parameters
            .as_ref()
            .and_then(|params| params.get(key))
            .and_then(Option::as_deref)
    }

    /// Header value by exact name; a null value reads as absent
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .as_ref()
            .and_then(|headers| headers.get(name))
            .and_then(Option::as_deref)
    }
}

/// Split a query string into a map, percent-decoding keys and values
///
/// Later duplicates win, matching how a proxy front end collapses repeated keys.
fn parse_query(query: &str) -> HashMap<String, Option<String>> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (percent_decode(key), Some(percent_decode(value)))
        })
        .collect()
}

fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => out.push(b' '),
            b'%' if i + 2 < bytes.len() => {
                match std::str::from_utf8(&bytes[i + 1..i + 3])
                    .ok()
                    .and_then(|hex| u8::from_str_radix(hex, 16).ok())
                {
                    Some(byte) => {
                        out.push(byte);
                        i += 2;
                    }
                    None => out.push(b'%'),
                }
            }
            byte => out.push(byte),
        }
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}
