use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use crate::Server;

/// A non-fatal problem found while aggregating. Shown next to the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A server record had no `attributes.node` and was left out of every bucket.
    MissingNode {
        server_id: Option<u64>,
        server_name: Option<String>,
        record: String,
    },
    /// A server record had a node but its attributes could not be read.
    InvalidRecord {
        server_id: Option<u64>,
        reason: String,
        record: String,
    },
}

impl Diagnostic {
    pub fn title(&self) -> &'static str {
        match self {
            Diagnostic::MissingNode { .. } => "Missing 'node' attribute in server data",
            Diagnostic::InvalidRecord { .. } => "Unreadable attributes in server data",
        }
    }

    /// Pretty-printed JSON of the skipped record, prefixed by the decode error if any.
    pub fn detail(&self) -> String {
        match self {
            Diagnostic::MissingNode { record, .. } => record.clone(),
            Diagnostic::InvalidRecord { reason, record, .. } => format!("{reason}\n{record}"),
        }
    }
}

/// Allocated memory (MB) per node id, summed over server limits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregatedUsage {
    by_node: BTreeMap<u64, u64>,
    diagnostics: Vec<Diagnostic>,
}

impl AggregatedUsage {
    /// Aggregate raw `/servers` list items (`{ "object": ..., "attributes": { ... } }`).
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a Value>) -> Self {
        let mut usage = Self::default();
        for record in records {
            usage.add_record(record);
        }
        usage
    }

    pub fn add_record(&mut self, record: &Value) {
        let attributes = record.get("attributes").filter(|a| a.is_object());
        let server_id = attributes.and_then(|a| a.get("id")).and_then(Value::as_u64);
        let dump = serde_json::to_string_pretty(record).unwrap_or_default();

        let has_node = attributes
            .and_then(|a| a.get("node"))
            .is_some_and(|n| !n.is_null());
        let Some(attributes) = attributes.filter(|_| has_node) else {
            let server_name = attributes
                .and_then(|a| a.get("name"))
                .and_then(Value::as_str)
                .map(str::to_string);
            tracing::warn!(?server_id, ?server_name, "server has no node attribute, skipping");
            self.diagnostics.push(Diagnostic::MissingNode {
                server_id,
                server_name,
                record: dump,
            });
            return;
        };

        let server = match Server::deserialize(attributes) {
            Ok(server) => server,
            Err(err) => {
                tracing::warn!(?server_id, error = %err, "unreadable server attributes, skipping");
                self.diagnostics.push(Diagnostic::InvalidRecord {
                    server_id,
                    reason: err.to_string(),
                    record: dump,
                });
                return;
            }
        };

        // `has_node` checked above, and `node` decoded as an integer.
        if let Some(node_id) = server.node {
            let slot = self.by_node.entry(node_id).or_insert(0);
            *slot = slot.saturating_add(server.memory_mb());
        }
    }

    /// Allocated MB for `node_id`; nodes without servers report 0.
    pub fn allocated(&self, node_id: u64) -> u64 {
        self.by_node.get(&node_id).copied().unwrap_or(0)
    }

    pub fn by_node(&self) -> &BTreeMap<u64, u64> {
        &self.by_node
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

/// `allocated / capacity * 100`, rounded to two decimals. Zero capacity yields 0.
pub fn usage_percent(allocated_mb: u64, capacity_mb: u64) -> f64 {
    if capacity_mb == 0 {
        return 0.0;
    }
    let pct = allocated_mb as f64 / capacity_mb as f64 * 100.0;
    (pct * 100.0).round() / 100.0
}
