use crate::{Config, Pool, Recycler};

/// A builder for creating a [`Pool`] with custom configuration.
///
/// # Example
///
/// ```rust
/// use static_pool::Builder;
///
/// let mut builder = Builder::new();
/// let pool = builder.static_size(10).lazy(true).build(Vec::<u8>::new, Vec::clear);
/// assert_eq!(pool.static_size(), 10);
/// assert_eq!(pool.retained(), 0);
/// ```
#[derive(Debug, Default)]
pub struct Builder {
    /// Configuration of the pool.
    config: Config,
}

impl Builder {
    /// Create a new builder with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole configuration, e.g. one loaded from a file.
    pub fn config(&mut self, config: Config) -> &mut Self {
        self.config = config;
        self
    }

    /// Set the number of items that are never reclaimed.
    pub fn static_size(&mut self, static_size: usize) -> &mut Self {
        self.config.static_size = static_size;
        self
    }

    /// Retain items on demand instead of during construction.
    pub fn lazy(&mut self, lazy: bool) -> &mut Self {
        self.config.lazy = lazy;
        self
    }

    /// Build every retained item during construction.
    pub fn eager(&mut self) -> &mut Self {
        self.lazy(false)
    }

    /// Set the capacity of each cache of the default recycler.
    pub fn capacity(&mut self, capacity: usize) -> &mut Self {
        self.config.capacity = capacity;
        self
    }

    /// Build the pool with the current configuration.
    pub fn build<T, F, C>(&mut self, factory: F, resetter: C) -> Pool<T>
    where
        T: Send,
        F: Fn() -> T + Send + Sync + 'static,
        C: Fn(&mut T) + Send + Sync + 'static,
    {
        let config = std::mem::take(&mut self.config);
        Pool::with_config(factory, resetter, config)
    }

    /// Build the pool on top of a custom recycler.
    pub fn build_with_recycler<T, R, F, C>(
        &mut self,
        factory: F,
        resetter: C,
        recycler: R,
    ) -> Pool<T, R>
    where
        T: Send,
        R: Recycler<T>,
        F: Fn() -> T + Send + Sync + 'static,
        C: Fn(&mut T) + Send + Sync + 'static,
    {
        let config = std::mem::take(&mut self.config);
        Pool::with_recycler(factory, resetter, config, recycler)
    }
}
