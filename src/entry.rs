use std::cell::UnsafeCell;
use std::fmt::{Debug, Display};
use std::ops::{Deref, DerefMut};
use std::sync::{Arc, Weak};

/// A pooled item.
///
/// `Entry` is the only handle that can read or write the item. It is handed out
/// by [`Pool::get`](crate::Pool::get) and given back with
/// [`Pool::put`](crate::Pool::put). The pool may additionally hold anchors to
/// the same allocation to keep it alive while the entry sits idle; anchors never
/// touch the item itself.
///
/// # Example
///
/// ```rust
/// use static_pool::Entry;
///
/// let mut entry = Entry::new(String::from("Hello"));
/// entry.push_str(", World!");
/// assert_eq!(entry.as_str(), "Hello, World!");
/// assert!(!entry.is_retained());
/// ```
pub struct Entry<T> {
    slot: Arc<Slot<T>>,
}

// `Entry` behaves like `Box<T>`: it is the unique accessor of the slot.
unsafe impl<T: Send> Send for Entry<T> {}
unsafe impl<T: Sync> Sync for Entry<T> {}

impl<T> Entry<T> {
    /// Wrap a freshly built item.
    pub fn new(item: T) -> Self {
        Self {
            slot: Arc::new(Slot(UnsafeCell::new(item))),
        }
    }

    /// Whether the pool currently holds a retention anchor for this item.
    ///
    /// # Example
    ///
    /// ```rust
    /// use static_pool::Builder;
    ///
    /// let pool = Builder::new().static_size(1).build(u32::default, |x| *x = 0);
    /// let entry = pool.get();
    /// assert!(entry.is_retained());
    /// ```
    pub fn is_retained(&self) -> bool {
        // Entries are never cloned, so every other strong share is an anchor.
        Arc::strong_count(&self.slot) > 1
    }

    /// Create a weak handle that observes whether the item has been reclaimed.
    pub fn downgrade(&self) -> WeakEntry<T> {
        WeakEntry {
            slot: Arc::downgrade(&self.slot),
        }
    }

    /// Address of the item, usable as its identity.
    pub fn as_ptr(&self) -> *const T {
        self.slot.0.get()
    }

    /// Get reference to the inner item.
    pub fn get(&self) -> &T {
        self
    }

    /// Get mutable reference to the inner item.
    pub fn get_mut(&mut self) -> &mut T {
        self
    }

    pub(crate) fn anchor(&self) -> Anchor<T> {
        Anchor {
            _slot: self.slot.clone(),
        }
    }
}

impl<T> Deref for Entry<T> {
    type Target = T;
    fn deref(&self) -> &Self::Target {
        // SAFETY: only the entry dereferences the slot, anchors never do.
        unsafe { &*self.slot.0.get() }
    }
}

impl<T> DerefMut for Entry<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        // SAFETY: `&mut self` is exclusive and anchors never dereference.
        unsafe { &mut *self.slot.0.get() }
    }
}

impl<T: Debug> Debug for Entry<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entry")
            .field("item", self.get())
            .field("retained", &self.is_retained())
            .finish()
    }
}

impl<T: Display> Display for Entry<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self.get(), f)
    }
}

impl<T: PartialEq> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.get().eq(other.get())
    }
}

impl<T: Eq> Eq for Entry<T> {}

#[cfg(feature = "serde")]
impl<T: serde::Serialize> serde::Serialize for Entry<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.get().serialize(serializer)
    }
}

/// A weak observer of an [`Entry`].
///
/// It can not access the item; it only reports whether the item's memory has
/// been dropped.
///
/// # Example
///
/// ```rust
/// use static_pool::Entry;
///
/// let entry = Entry::new(7u64);
/// let weak = entry.downgrade();
/// assert!(!weak.is_reclaimed());
/// drop(entry);
/// assert!(weak.is_reclaimed());
/// ```
pub struct WeakEntry<T> {
    slot: Weak<Slot<T>>,
}

unsafe impl<T: Send> Send for WeakEntry<T> {}
unsafe impl<T: Send> Sync for WeakEntry<T> {}

impl<T> WeakEntry<T> {
    /// Whether the item has been dropped.
    pub fn is_reclaimed(&self) -> bool {
        self.slot.strong_count() == 0
    }
}

impl<T> Debug for WeakEntry<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeakEntry")
            .field("reclaimed", &self.is_reclaimed())
            .finish()
    }
}

/// A retention anchor. Keeps the allocation of an entry alive without ever
/// reading or writing the item.
///
/// The last anchor may be the last owner, in which case it drops `T` on
/// whichever thread drops the anchor.
pub(crate) struct Anchor<T> {
    _slot: Arc<Slot<T>>,
}

unsafe impl<T: Send> Send for Anchor<T> {}
unsafe impl<T: Send> Sync for Anchor<T> {}

struct Slot<T>(UnsafeCell<T>);
