use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use static_pool::{Builder, Config, Entry, Recycler};

#[test]
fn build_pool() {
    let mut builder = Builder::new();
    let pool = builder.static_size(10).capacity(16).build(usize::default, |x| *x = 0);
    assert_eq!(pool.static_size(), 10);
    assert_eq!(pool.retained(), 10);
    assert_eq!(pool.recycler().capacity(), 16);
    assert_eq!(pool.recycler().len(), 10);
}

#[test]
fn build_with_defaults() {
    let pool = Builder::new().build(String::new, String::clear);
    assert_eq!(pool.static_size(), 100);
    assert!(!pool.is_lazy());
    assert_eq!(pool.retained(), 100);
    assert_eq!(pool.recycler().capacity(), 1024);
}

#[test]
fn build_lazy() {
    let pool = Builder::new().static_size(3).lazy(true).build(String::new, String::clear);
    assert!(pool.is_lazy());
    assert_eq!(pool.retained(), 0);
    assert!(pool.recycler().is_empty());
}

#[test]
fn capacity_grows_to_fit_static_size() {
    let pool = Builder::new().static_size(64).capacity(8).build(|| 0u8, |x| *x = 0);
    assert_eq!(pool.recycler().capacity(), 64);
    assert_eq!(pool.recycler().len(), 64);
}

#[test]
fn build_resets_builder() {
    let mut builder = Builder::new();
    builder.static_size(5).lazy(true);
    let _pool = builder.build(|| 0u8, |x| *x = 0);
    let pool = builder.build(|| 0u8, |x| *x = 0);
    assert_eq!(pool.static_size(), 100);
    assert!(!pool.is_lazy());
}

#[test]
fn build_with_config() {
    let config = Config {
        static_size: 7,
        lazy: true,
        capacity: 32,
    };
    let pool = Builder::new().config(config).build(Vec::<u8>::new, Vec::clear);
    assert_eq!(pool.static_size(), 7);
    assert!(pool.is_lazy());
    assert_eq!(pool.recycler().capacity(), 32);
}

/// Keeps nothing, so every item is dropped as soon as it is released.
#[derive(Default)]
struct Discard {
    released: AtomicUsize,
}

impl<T: Send> Recycler<T> for Discard {
    fn acquire(&self) -> Option<Entry<T>> {
        None
    }

    fn release(&self, _entry: Entry<T>) {
        self.released.fetch_add(1, Ordering::Relaxed);
    }
}

#[test]
fn build_with_recycler() {
    let built = Arc::new(AtomicUsize::new(0));
    let counter = built.clone();
    let pool = Builder::new().static_size(2).build_with_recycler(
        move || counter.fetch_add(1, Ordering::Relaxed),
        |_| {},
        Discard::default(),
    );
    assert_eq!(pool.recycler().released.load(Ordering::Relaxed), 2);
    assert_eq!(built.load(Ordering::Relaxed), 2);

    let item = pool.get();
    assert_eq!(*item, 2);
    assert!(!item.is_retained());
    pool.put(item);
    assert_eq!(pool.recycler().released.load(Ordering::Relaxed), 3);
    assert_eq!(*pool.get(), 3);
}

#[cfg(feature = "serde")]
#[test]
fn load_config_from_json() {
    let config: Config = serde_json::from_str(r#"{ "static_size": 12, "lazy": true }"#).unwrap();
    assert_eq!(
        config,
        Config {
            static_size: 12,
            lazy: true,
            capacity: 1024,
        }
    );

    let pool = Builder::new().config(config).build(String::new, String::clear);
    assert_eq!(pool.static_size(), 12);
    assert!(pool.is_lazy());

    let json = serde_json::to_value(Config::default()).unwrap();
    assert_eq!(json["static_size"], 100);
    assert_eq!(json["lazy"], false);
}

#[cfg(feature = "serde")]
#[test]
fn serialize_entry_as_item() {
    let pool = Builder::new().static_size(1).build(|| vec![1u8, 2, 3], Vec::clear);
    let item = pool.get();
    assert_eq!(serde_json::to_string(&item).unwrap(), "[1,2,3]");
}
