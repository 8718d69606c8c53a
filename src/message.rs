//! A plain acknowledgement body for requests that have no other result.

use serde::{Deserialize, Serialize};

/// The JSON body `{"message": "..."}` sent for successful requests that do not return data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusMessage {
    /// A human readable description of what happened.
    pub message: String,
}

impl StatusMessage {
    /// Create a message from anything that can be turned into a string.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
