pub mod node;
pub mod pagination;
pub mod server;
pub mod usage;

pub use node::Node;
pub use pagination::{ApiItem, PageEnvelope, PageMeta, Pagination};
pub use server::{Server, ServerLimits};
pub use usage::{usage_percent, AggregatedUsage, Diagnostic};

pub mod telemetry;
