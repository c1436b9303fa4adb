pub use crate::arith::{Accumulate, Deduct};
pub use crate::builder::{OrderMode, SafeMapBuilder};
pub use crate::error::InvariantError;
pub use crate::map::{MapCore, SafeMap, Visit};

#[cfg(feature = "metrics")]
pub use crate::metrics::snapshot::MapMetricsSnapshot;
