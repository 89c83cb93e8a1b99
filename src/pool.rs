use std::cmp::max;
use std::fmt::Debug;
use std::sync::atomic::Ordering::*;
use std::sync::atomic::{AtomicBool, AtomicUsize};

use crossbeam_queue::SegQueue;
use parking_lot::Mutex;

use crate::entry::Anchor;
use crate::{Entry, QueueRecycler, Recycler};

type Factory<T> = Box<dyn Fn() -> T + Send + Sync>;
type Resetter<T> = Box<dyn Fn(&mut T) + Send + Sync>;

/// A concurrent object pool that keeps a static number of items alive.
///
/// Reuse of items is delegated to a [`Recycler`], which may discard idle items
/// whenever it likes. On top of it the pool retains up to
/// [`static_size`](Config::static_size) items so that they are never reclaimed,
/// no matter how long they stay idle. Retained items are only given up by
/// [`reset`](Self::reset).
///
/// With an eager configuration the retained items are built during
/// construction. With a lazy one they are retained one by one as they are
/// handed out by [`get`](Self::get). Lazy growth uses a plain atomic add rather
/// than a compare-and-swap, so concurrent callers racing at the threshold can
/// retain a few more items than `static_size`; at most one extra per racing
/// caller.
///
/// # Examples
///
/// ```rust
/// use static_pool::Pool;
/// use std::sync::Arc;
///
/// let pool = Arc::new(Pool::new(String::new, String::clear));
///
/// let handles: Vec<_> = (0..2)
///     .map(|i| {
///         let pool = pool.clone();
///         std::thread::spawn(move || {
///             let mut item = pool.get();
///             item.push_str(&i.to_string());
///             assert_eq!(item.as_str(), i.to_string());
///             pool.put(item);
///         })
///     })
///     .collect();
/// for handle in handles {
///     handle.join().unwrap();
/// }
/// assert_eq!(pool.retained(), 100);
/// assert_eq!(pool.get().as_str(), "");
/// ```
pub struct Pool<T, R = QueueRecycler<T>> {
    /// Target number of retained items.
    static_size: usize,
    /// Grow the retained set on demand instead of filling it up front.
    lazy: AtomicBool,
    /// Anchors of the retained items.
    retained: SegQueue<Anchor<T>>,
    /// Number of retained items since the last initialization.
    retained_count: AtomicUsize,
    /// Set while a reset is in progress.
    quiesced: AtomicBool,
    /// Only one reset at a time.
    reset_lock: Mutex<()>,
    factory: Factory<T>,
    resetter: Resetter<T>,
    recycler: R,
}

impl<T: Send> Pool<T> {
    /// Create a new pool with the default configuration: 100 retained items,
    /// built eagerly.
    ///
    /// # Example
    ///
    /// ```rust
    /// use static_pool::Pool;
    ///
    /// let pool: Pool<Vec<u8>> = Pool::new(Vec::new, Vec::clear);
    /// assert_eq!(pool.retained(), 100);
    /// assert!(!pool.is_lazy());
    /// ```
    pub fn new<F, C>(factory: F, resetter: C) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
        C: Fn(&mut T) + Send + Sync + 'static,
    {
        Self::with_config(factory, resetter, Config::default())
    }

    /// Create a new pool with the given configuration, reusing items through a
    /// [`QueueRecycler`] sized by [`Config::capacity`].
    ///
    /// # Example
    ///
    /// ```rust
    /// use static_pool::{Config, Pool};
    ///
    /// let config = Config {
    ///     static_size: 4,
    ///     lazy: true,
    ///     ..Default::default()
    /// };
    /// let pool = Pool::with_config(|| 0u64, |x| *x = 0, config);
    /// assert_eq!(pool.retained(), 0);
    /// let item = pool.get();
    /// assert_eq!(pool.retained(), 1);
    /// pool.put(item);
    /// ```
    pub fn with_config<F, C>(factory: F, resetter: C, mut config: Config) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
        C: Fn(&mut T) + Send + Sync + 'static,
    {
        config.post_process();
        let recycler = QueueRecycler::new(config.capacity);
        Self::with_recycler(factory, resetter, config, recycler)
    }
}

impl<T: Send, R: Recycler<T>> Pool<T, R> {
    /// Create a new pool on top of a custom [`Recycler`].
    ///
    /// [`Config::capacity`] is not used; sizing is up to the recycler.
    pub fn with_recycler<F, C>(factory: F, resetter: C, config: Config, recycler: R) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
        C: Fn(&mut T) + Send + Sync + 'static,
    {
        let pool = Self {
            static_size: config.static_size,
            lazy: AtomicBool::new(config.lazy),
            retained: SegQueue::new(),
            retained_count: AtomicUsize::new(0),
            quiesced: AtomicBool::new(false),
            reset_lock: Mutex::new(()),
            factory: Box::new(factory),
            resetter: Box::new(resetter),
            recycler,
        };
        pool.init();
        pool
    }

    /// Target number of retained items.
    pub fn static_size(&self) -> usize {
        self.static_size
    }

    /// Whether retention grows on demand. Always true after a [`reset`](Self::reset).
    pub fn is_lazy(&self) -> bool {
        self.lazy.load(Acquire)
    }

    /// Number of items retained since construction or the last reset.
    ///
    /// May exceed [`static_size`](Self::static_size) by the number of callers
    /// that raced past the threshold during lazy growth.
    pub fn retained(&self) -> usize {
        self.retained_count.load(Acquire)
    }

    /// The recycler items are reused through.
    pub fn recycler(&self) -> &R {
        &self.recycler
    }

    /// Take an item from the pool.
    ///
    /// Never fails: when the recycler is empty, or while a reset is in
    /// progress, a new item is built by the factory.
    ///
    /// # Example
    ///
    /// ```rust
    /// use static_pool::Builder;
    ///
    /// let pool = Builder::new()
    ///     .static_size(1)
    ///     .build(|| String::from("new"), |s| s.clear());
    /// let first = pool.get();
    /// assert_eq!(first.as_str(), "new");
    /// assert!(first.is_retained());
    /// let second = pool.get();
    /// assert!(!second.is_retained());
    /// ```
    pub fn get(&self) -> Entry<T> {
        if self.quiesced.load(Acquire) {
            return Entry::new((self.factory)());
        }

        let entry = self
            .recycler
            .acquire()
            .unwrap_or_else(|| Entry::new((self.factory)()));

        if !self.lazy.load(Relaxed) {
            return entry;
        }
        if entry.is_retained() || self.retained_count.load(Acquire) >= self.static_size {
            return entry;
        }

        self.retained.push(entry.anchor());
        // Not a CAS: racing callers may push the count slightly past the target.
        let count = self.retained_count.fetch_add(1, AcqRel) + 1;
        if count == self.static_size {
            tracing::trace!(static_size = self.static_size, "retention target reached");
        }
        entry
    }

    /// Reset an item and return it to the pool.
    ///
    /// The resetter runs for every item, retained or not. It must clear all
    /// state left by the previous borrower.
    pub fn put(&self, mut entry: Entry<T>) {
        (self.resetter)(entry.get_mut());
        self.recycler.release(entry);
    }

    /// Give up every retained item and start over lazily.
    ///
    /// Retained items become ordinary idle items of the recycler, which is then
    /// free to reclaim them. Memory is not released here. After a reset the pool
    /// is always lazy, so retention regrows only as items are taken. Concurrent
    /// resets are serialized; concurrent [`get`](Self::get) calls are served
    /// with new items while the reset runs.
    ///
    /// A lazy `get` that started just before the reset may still retain its
    /// item after the retained set was cleared. Such an item is not counted in
    /// [`retained`](Self::retained) and stays retained until the next reset.
    ///
    /// # Example
    ///
    /// ```rust
    /// use static_pool::Pool;
    ///
    /// let pool = Pool::new(|| 0u8, |x| *x = 0);
    /// assert_eq!(pool.retained(), 100);
    /// pool.reset();
    /// assert_eq!(pool.retained(), 0);
    /// assert!(pool.is_lazy());
    /// ```
    pub fn reset(&self) {
        let _guard = self.reset_lock.lock();

        self.quiesced.store(true, Release);
        let mut revoked = 0;
        while let Some(anchor) = self.retained.pop() {
            drop(anchor);
            revoked += 1;
        }
        self.lazy.store(true, Release);
        self.init();
        self.quiesced.store(false, Release);

        tracing::debug!(revoked, "pool reset");
    }

    /// Shared by construction and reset.
    fn init(&self) {
        self.retained_count.store(0, Release);

        if self.lazy.load(Acquire) {
            tracing::debug!(static_size = self.static_size, "pool initialized lazily");
            return;
        }

        for _ in 0..self.static_size {
            let entry = Entry::new((self.factory)());
            self.retained.push(entry.anchor());
            self.recycler.release(entry);
        }
        self.retained_count.fetch_add(self.static_size, AcqRel);
        tracing::debug!(static_size = self.static_size, "pool initialized eagerly");
    }
}

impl<T, R: Debug> Debug for Pool<T, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pool")
            .field("static_size", &self.static_size)
            .field("lazy", &self.lazy.load(Relaxed))
            .field("retained", &self.retained_count.load(Relaxed))
            .field("quiesced", &self.quiesced.load(Relaxed))
            .field("recycler", &self.recycler)
            .finish_non_exhaustive()
    }
}

/// Configuration for the pool.
///
/// With the `serde` feature, missing fields fall back to their defaults:
///
/// ```rust
/// # #[cfg(feature = "serde")]
/// # {
/// use static_pool::Config;
///
/// let config: Config = serde_json::from_str(r#"{ "lazy": true }"#).unwrap();
/// assert_eq!(config.static_size, 100);
/// assert!(config.lazy);
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    /// Number of items kept alive regardless of the recycler. A larger number
    /// costs memory, a smaller one means more allocations after idle periods.
    pub static_size: usize,
    /// Retain items as they are handed out instead of building them all during
    /// construction. Eager retention costs startup time and keeps `get` cheap
    /// from the first call.
    pub lazy: bool,
    /// Capacity of each cache of the default [`QueueRecycler`].
    pub capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            static_size: 100,
            lazy: false,
            capacity: 1024,
        }
    }
}

impl Config {
    pub(crate) fn post_process(&mut self) {
        self.capacity = max(max(1, self.capacity), self.static_size);
    }
}
