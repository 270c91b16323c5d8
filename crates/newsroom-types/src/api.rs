use serde::{Deserialize, Serialize};

// -- JWT Claims --

/// Bearer token claims issued by the account service. The newsroom only
/// reads them; `group` and `perms` drive the admin gate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub perms: Vec<String>,
    pub exp: usize,
}

impl Claims {
    pub fn allows(&self, permission: &str) -> bool {
        self.group == "admin" || self.perms.iter().any(|p| p == permission)
    }
}

// -- Listing --

/// Raw listing parameters. Kept as strings so malformed pagination can be
/// ignored instead of rejected.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub query: Option<String>,
    pub limit: Option<String>,
    pub skip: Option<String>,
}

// -- Responses --

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub message: String,
    /// Outcome of retracting the external post; absent when there was none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retracted: Option<bool>,
}
