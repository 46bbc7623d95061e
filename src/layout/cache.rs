use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use crate::foundation::core::{BezPath, LayoutId, Size};

#[derive(Debug, Clone)]
struct Slot<V> {
    fingerprint: u64,
    value: V,
}

/// Hit/miss counters since the last [`GenerationalCache::collect`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups served from a cached value.
    pub hits: u64,
    /// Lookups that computed a new value.
    pub misses: u64,
}

/// Two-generation per-frame cache keyed by [`LayoutId`].
///
/// Entries are only valid while the fingerprint of the inputs they were computed from is
/// unchanged. Every lookup moves its entry into the next generation; [`collect`](Self::collect)
/// drops whatever was not touched since the previous collect.
#[derive(Debug, Clone)]
pub struct GenerationalCache<V> {
    current: HashMap<LayoutId, Slot<V>>,
    next: HashMap<LayoutId, Slot<V>>,
    stats: CacheStats,
}

impl<V> Default for GenerationalCache<V> {
    fn default() -> Self {
        Self {
            current: HashMap::new(),
            next: HashMap::new(),
            stats: CacheStats::default(),
        }
    }
}

impl<V> GenerationalCache<V> {
    /// Empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries that survive the next collect.
    pub fn len(&self) -> usize {
        self.next.len()
    }

    /// `true` when no entry survives the next collect.
    pub fn is_empty(&self) -> bool {
        self.next.is_empty()
    }

    /// Counters since the last collect.
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Cached value for `id` if its fingerprint matches, else the result of `f`.
    pub fn try_get_or_insert_with<E>(
        &mut self,
        id: LayoutId,
        fingerprint: u64,
        f: impl FnOnce() -> Result<V, E>,
    ) -> Result<&V, E> {
        match self.next.entry(id) {
            Entry::Occupied(o) => {
                let slot = o.into_mut();
                if slot.fingerprint == fingerprint {
                    self.stats.hits += 1;
                } else {
                    self.stats.misses += 1;
                    *slot = Slot {
                        fingerprint,
                        value: f()?,
                    };
                }
                Ok(&slot.value)
            }
            Entry::Vacant(v) => {
                let value = match self.current.remove(&id) {
                    Some(slot) if slot.fingerprint == fingerprint => {
                        self.stats.hits += 1;
                        slot.value
                    }
                    _ => {
                        self.stats.misses += 1;
                        f()?
                    }
                };
                Ok(&v.insert(Slot { fingerprint, value }).value)
            }
        }
    }

    /// Infallible form of [`try_get_or_insert_with`](Self::try_get_or_insert_with).
    pub fn get_or_insert_with(&mut self, id: LayoutId, fingerprint: u64, f: impl FnOnce() -> V) -> &V {
        match self.try_get_or_insert_with::<std::convert::Infallible>(id, fingerprint, || Ok(f())) {
            Ok(v) => v,
            Err(never) => match never {},
        }
    }

    /// Promote the next generation and drop untouched entries. Returns how many were dropped.
    pub fn collect(&mut self) -> usize {
        let dropped = self.current.len();
        self.current = std::mem::take(&mut self.next);
        let stats = std::mem::take(&mut self.stats);
        tracing::trace!(
            hits = stats.hits,
            misses = stats.misses,
            kept = self.current.len(),
            dropped,
            "cache collect"
        );
        dropped
    }
}

/// Caches rebuilt every frame by the render session.
#[derive(Debug, Clone)]
pub struct FrameCaches {
    /// Measured text sizes.
    pub text: GenerationalCache<Size>,
    /// Shape outlines for laid-out boxes.
    pub paths: GenerationalCache<Arc<BezPath>>,
    /// When off, every measurement goes straight to the host.
    pub cache_text: bool,
    next_layout_id: LayoutId,
}

impl Default for FrameCaches {
    fn default() -> Self {
        Self {
            text: GenerationalCache::new(),
            paths: GenerationalCache::new(),
            cache_text: true,
            next_layout_id: LayoutId(0),
        }
    }
}

impl FrameCaches {
    /// Empty caches with text caching enabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Caches with text measurement caching switched on or off.
    pub fn with_text_cache(enabled: bool) -> Self {
        Self {
            cache_text: enabled,
            ..Self::default()
        }
    }

    /// First id of the next tree laid out this frame.
    pub fn next_layout_id(&self) -> LayoutId {
        self.next_layout_id
    }

    /// Hand out `count` consecutive ids so trees laid out in one frame never share an id.
    pub(crate) fn reserve_layout_ids(&mut self, count: usize) -> LayoutId {
        let first = self.next_layout_id;
        let count = u32::try_from(count).unwrap_or(u32::MAX);
        self.next_layout_id = LayoutId(first.0.saturating_add(count));
        first
    }

    /// Collect both generations and restart layout id assignment.
    pub fn collect(&mut self) {
        self.next_layout_id = LayoutId(0);
        let text = self.text.collect();
        let paths = self.paths.collect();
        tracing::debug!(text, paths, "frame caches collected");
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/cache.rs"]
mod tests;
