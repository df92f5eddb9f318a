//! Copy-on-write snapshot caches.
//!
//! # Role
//!
//! Compiled tag chains and struct specs are cached per engine. Reads load the current
//! snapshot without locking; writers serialize on a mutex, copy the snapshot, insert and
//! publish the new map atomically.
//!
//! # Invariants
//!
//! - A published snapshot is never mutated; readers holding an old snapshot keep seeing it.
//! - No insert is lost: every writer copies the latest snapshot while holding the lock.
//! - [`SnapshotCache::get_or_try_insert_with`] builds a given key at most once. Failed builds
//!   are not cached.
//!
//! # Concurrency
//!
//! `get` never blocks. `set` and the slow path of `get_or_try_insert_with` hold the update
//! lock for the duration of the copy and, for the latter, the build.

use std::hash::Hash;
use std::sync::Arc;

use arc_swap::ArcSwap;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;

/// Concurrent read-mostly map published through atomic snapshot swaps.
pub struct SnapshotCache<K, V> {
	label: &'static str,
	snap: ArcSwap<FxHashMap<K, V>>,
	update: Mutex<()>,
}

impl<K, V> SnapshotCache<K, V>
where
	K: Eq + Hash + Clone,
	V: Clone,
{
	pub fn new(label: &'static str) -> Self {
		Self {
			label,
			snap: ArcSwap::from_pointee(FxHashMap::default()),
			update: Mutex::new(()),
		}
	}

	/// Lock-free lookup in the current snapshot.
	pub fn get<Q>(&self, key: &Q) -> Option<V>
	where
		K: std::borrow::Borrow<Q>,
		Q: Eq + Hash + ?Sized,
	{
		self.snap.load().get(key).cloned()
	}

	/// Publishes a snapshot containing `key -> value`, replacing any previous value.
	pub fn set(&self, key: K, value: V) {
		let _guard = self.update.lock();
		self.publish(key, value);
	}

	/// Returns the cached value for `key`, building and publishing it on a miss.
	pub fn get_or_try_insert_with<Q, E>(
		&self,
		key: &Q,
		build: impl FnOnce() -> Result<V, E>,
	) -> Result<V, E>
	where
		K: std::borrow::Borrow<Q>,
		Q: Eq + Hash + ToOwned<Owned = K> + ?Sized,
	{
		if let Some(value) = self.get(key) {
			return Ok(value);
		}

		let _guard = self.update.lock();
		if let Some(value) = self.get(key) {
			return Ok(value);
		}
		let value = build()?;
		self.publish(key.to_owned(), value.clone());
		Ok(value)
	}

	pub fn len(&self) -> usize {
		self.snap.load().len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Current snapshot. Later inserts are not visible through it.
	pub fn snapshot(&self) -> Arc<FxHashMap<K, V>> {
		self.snap.load_full()
	}

	/// Caller must hold the update lock.
	fn publish(&self, key: K, value: V) {
		let current = self.snap.load();
		let mut next = FxHashMap::with_capacity_and_hasher(current.len() + 1, Default::default());
		next.extend(current.iter().map(|(k, v)| (k.clone(), v.clone())));
		next.insert(key, value);
		let len = next.len();
		self.snap.store(Arc::new(next));
		tracing::trace!(cache = self.label, len, "published snapshot");
	}
}

impl<K, V> std::fmt::Debug for SnapshotCache<K, V> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SnapshotCache")
			.field("label", &self.label)
			.field("len", &self.snap.load().len())
			.finish()
	}
}
