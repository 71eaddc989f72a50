use serde::{Deserialize, Serialize};

pub mod health;
pub mod locations;
pub mod metrics;
pub mod predict;

/// Successful response body: `{"success": true, ...fields}`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Success<T> {
    pub success: bool,
    #[serde(flatten)]
    pub body: T,
}

impl<T> Success<T> {
    pub fn new(body: T) -> Self {
        Self {
            success: true,
            body,
        }
    }
}
