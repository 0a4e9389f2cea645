use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerLimits {
    /// Memory limit in MB. `0` means unlimited on the panel side.
    #[serde(default, deserialize_with = "null_as_zero")]
    pub memory: u64,
}

/// A server as returned in the `attributes` of `/servers`.
///
/// Only the fields the report needs are decoded. `node` is read from the flat
/// `attributes.node` field and nowhere else.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Server {
    #[serde(default)]
    pub id: Option<u64>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub node: Option<u64>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub limits: ServerLimits,
}

impl Server {
    pub fn memory_mb(&self) -> u64 {
        self.limits.memory
    }
}

pub(crate) fn null_as_zero<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u64>::deserialize(deserializer)?.unwrap_or(0))
}

fn null_as_default<'de, D>(deserializer: D) -> Result<ServerLimits, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<ServerLimits>::deserialize(deserializer)?.unwrap_or_default())
}
