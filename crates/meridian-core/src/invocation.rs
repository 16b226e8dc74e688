//! The call envelope moved through the pipeline.
//!
//! An [`Invocation`] bundles the target method, the transport metadata
//! (lowercase keys, as on the wire) and the JSON request payload. The
//! matching [`RpcResponse`] carries the JSON response payload plus response
//! metadata such as the echoed request ID.

use crate::method::MethodName;
use std::collections::HashMap;

/// Case-normalized transport metadata.
///
/// Keys are stored lowercase; lookups are case-insensitive as a result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata(HashMap<String, String>);

impl Metadata {
    /// Creates empty metadata.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a key/value pair, lowercasing the key.
    pub fn insert(&mut self, key: impl AsRef<str>, value: impl Into<String>) {
        self.0.insert(key.as_ref().to_lowercase(), value.into());
    }

    /// Looks up a value by key, case-insensitively.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(&key.to_lowercase()).map(String::as_str)
    }

    /// Whether no entries are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over all entries.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for Metadata {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut metadata = Self::new();
        for (key, value) in iter {
            metadata.insert(key, value);
        }
        metadata
    }
}

/// An inbound call: target method, metadata, and JSON payload.
#[derive(Debug, Clone)]
pub struct Invocation {
    method: MethodName,
    metadata: Metadata,
    payload: serde_json::Value,
}

impl Invocation {
    /// Creates an invocation with empty metadata.
    #[must_use]
    pub fn new(method: impl Into<MethodName>, payload: serde_json::Value) -> Self {
        Self {
            method: method.into(),
            metadata: Metadata::new(),
            payload,
        }
    }

    /// Replaces the metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Returns the target method.
    #[must_use]
    pub fn method(&self) -> &MethodName {
        &self.method
    }

    /// Returns the call metadata.
    #[must_use]
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Returns the JSON payload.
    #[must_use]
    pub fn payload(&self) -> &serde_json::Value {
        &self.payload
    }

    /// Consumes the invocation, returning the payload.
    #[must_use]
    pub fn into_payload(self) -> serde_json::Value {
        self.payload
    }
}

/// A completed call result: JSON payload plus response metadata.
#[derive(Debug, Clone)]
pub struct RpcResponse {
    payload: serde_json::Value,
    metadata: Metadata,
}

impl RpcResponse {
    /// Creates a response from a JSON payload.
    #[must_use]
    pub fn new(payload: serde_json::Value) -> Self {
        Self {
            payload,
            metadata: Metadata::new(),
        }
    }

    /// Returns the JSON payload.
    #[must_use]
    pub fn payload(&self) -> &serde_json::Value {
        &self.payload
    }

    /// Returns the response metadata.
    #[must_use]
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Mutable access for interceptors that set response metadata.
    pub fn metadata_mut(&mut self) -> &mut Metadata {
        &mut self.metadata
    }

    /// Consumes the response, returning payload and metadata.
    #[must_use]
    pub fn into_parts(self) -> (serde_json::Value, Metadata) {
        (self.payload, self.metadata)
    }
}
