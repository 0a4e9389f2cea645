use serde::{Deserialize, Serialize};

/// A panel node as returned in the `attributes` of `/nodes`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Node {
    pub id: u64,
    pub name: String,

    /// Total memory capacity in MB.
    #[serde(default, deserialize_with = "crate::server::null_as_zero")]
    pub memory: u64,
}
