//! safemap: a concurrency-safe generic map with optional insertion-order
//! iteration, atomic compound operations and in-place accumulation.
//!
//! [`SafeMap`](map::SafeMap) is the shared, lock-guarded map;
//! [`MapCore`](map::MapCore) is the single-threaded storage it wraps and the
//! handle given to [`SafeMap::with_exclusive`](map::SafeMap::with_exclusive).
//!
//! ```
//! use std::sync::Arc;
//! use std::thread;
//!
//! use safemap::prelude::*;
//!
//! let hits: Arc<SafeMap<u32, u64>> = Arc::new(SafeMap::new());
//! let handles: Vec<_> = (0..4)
//!     .map(|_| {
//!         let hits = Arc::clone(&hits);
//!         thread::spawn(move || {
//!             for page in 0..10 {
//!                 hits.add(page, 1);
//!             }
//!         })
//!     })
//!     .collect();
//! for handle in handles {
//!     handle.join().unwrap();
//! }
//! assert_eq!(hits.load(&3), Some(4));
//! ```

pub mod arith;
pub mod builder;
pub mod ds;
pub mod error;
pub mod map;

#[cfg(feature = "metrics")]
pub mod metrics;

pub mod prelude;
