//! Resolved dataset payloads.

use serde_json::Value as JsonValue;

use super::schema::InputRef;
use crate::{MungeError, MungeResult};

/// A dataset resolved from an `InputRef`.
///
/// The engine never looks inside `payload`; processors decide how to read it.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    reference: InputRef,
    payload: JsonValue,
}

impl Dataset {
    pub fn new(reference: InputRef, payload: JsonValue) -> Self {
        Dataset { reference, payload }
    }

    /// Reference this dataset was resolved from.
    pub fn reference(&self) -> &InputRef {
        &self.reference
    }

    pub fn payload(&self) -> &JsonValue {
        &self.payload
    }

    /// SHA-256 of the payload's compact JSON encoding.
    pub fn fingerprint(&self) -> MungeResult<String> {
        let bytes = serde_json::to_vec(&self.payload).map_err(|e| {
            MungeError::Message(format!("failed to encode dataset {}: {e}", self.reference))
        })?;
        Ok(crate::sha256_hex(&bytes))
    }
}
