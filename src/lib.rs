//! A concurrent object pool that keeps a static number of items alive.
//!
//! # Features
//!
//! - Thread-safe: multiple threads can get, put and reset concurrently.
//! - A configurable number of items is retained and never reclaimed, so the
//!   pool does not run dry after idle periods.
//! - Retention is filled eagerly at construction or grown lazily on demand.
//! - Everything beyond the retained items is left to a pluggable [`Recycler`],
//!   which may discard idle items as it sees fit.
//! - [`Pool::reset`] gives up all retained items and switches to lazy growth.
//!
//! # Retention
//!
//! A retained item is anchored by the pool: the pool holds a share of the
//! item's allocation that keeps it alive while it is idle in the recycler. The
//! default [`QueueRecycler`] drops idle unretained items over two
//! [`collect`](QueueRecycler::collect) cycles and keeps retained ones.
//!
//! With lazy growth the retained count is bumped with a plain atomic add, so
//! callers racing at the threshold may retain slightly more than
//! [`Config::static_size`] items.
//!
//! The factory and resetter are expected to be total: the pool has no failure
//! path of its own.
//!
//! # Examples
//!
//! ## Eager pool
//!
//! ```rust
//! use static_pool::Pool;
//!
//! let pool = Pool::new(String::new, |s: &mut String| s.clear());
//! assert_eq!(pool.retained(), 100);
//! let mut item = pool.get();
//! item.push_str("Hello");
//! pool.put(item);
//! assert_eq!(pool.get().as_str(), "");
//! ```
//!
//! ## Reset and reclaim
//!
//! ```rust
//! use static_pool::Builder;
//!
//! let pool = Builder::new().static_size(2).build(|| 0u32, |x| *x = 0);
//! let item = pool.get();
//! let weak = item.downgrade();
//! pool.put(item);
//!
//! pool.recycler().collect();
//! pool.recycler().collect();
//! assert!(!weak.is_reclaimed());
//!
//! pool.reset();
//! pool.recycler().collect();
//! pool.recycler().collect();
//! assert!(weak.is_reclaimed());
//! ```

mod builder;
mod entry;
mod pool;
mod recycler;

pub use builder::Builder;
pub use entry::{Entry, WeakEntry};
pub use pool::{Config, Pool};
pub use recycler::{QueueRecycler, Recycler};
