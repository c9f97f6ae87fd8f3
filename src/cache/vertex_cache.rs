//! Frame vertex cache
//!
//! Budgeted store for cached vertex and index data. Every entry remembers
//! the frame it was last touched in. When an allocation would overflow the
//! budget, entries not touched this frame are evicted oldest first; entries
//! in use by the current frame are never reclaimed, so the allocation fails
//! instead.

use super::{CacheHandle, CacheKind, VertexCacheManager};
use rustc_hash::FxHashMap;
use serde::Serialize;

#[derive(Debug)]
struct CacheEntry {
    kind: CacheKind,
    data: Vec<u8>,
    last_touched: u64,
}

/// Counters since the last `begin_frame`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub allocs: usize,
    pub failed_allocs: usize,
    pub evictions: usize,
    pub touches: usize,
}

#[derive(Debug)]
pub struct FrameVertexCache {
    entries: FxHashMap<u64, CacheEntry>,
    next_handle: u64,
    budget_bytes: usize,
    used_bytes: usize,
    frame: u64,
    stats: CacheStats,
}

impl FrameVertexCache {
    pub fn new(budget_bytes: usize) -> Self {
        Self {
            entries: FxHashMap::default(),
            next_handle: 1,
            budget_bytes,
            used_bytes: 0,
            frame: 0,
            stats: CacheStats::default(),
        }
    }

    /// Start a new frame; nothing is protected from eviction until touched again
    pub fn begin_frame(&mut self) {
        self.frame += 1;
        self.stats = CacheStats::default();
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn used_bytes(&self) -> usize {
        self.used_bytes
    }

    pub fn budget_bytes(&self) -> usize {
        self.budget_bytes
    }

    pub fn num_entries(&self) -> usize {
        self.entries.len()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Cached bytes of a resident allocation
    pub fn data(&self, handle: CacheHandle) -> Option<&[u8]> {
        self.entries.get(&handle.0).map(|entry| entry.data.as_slice())
    }

    pub fn kind(&self, handle: CacheHandle) -> Option<CacheKind> {
        self.entries.get(&handle.0).map(|entry| entry.kind)
    }

    /// Drop entries that have not been touched for more than `idle_frames`.
    /// Returns how many were dropped.
    pub fn purge_unused(&mut self, idle_frames: u64) -> usize {
        let frame = self.frame;
        let before = self.entries.len();
        let mut freed = 0;

        self.entries.retain(|_, entry| {
            let keep = frame.saturating_sub(entry.last_touched) <= idle_frames;
            if !keep {
                freed += entry.data.len();
            }
            keep
        });

        self.used_bytes -= freed;
        let purged = before - self.entries.len();
        if purged > 0 {
            log::debug!(
                "[FrameVertexCache::purge_unused] Purged {} entries ({} bytes)",
                purged,
                freed
            );
        }
        purged
    }

    /// Evict least recently touched entries from earlier frames until
    /// `needed` more bytes fit. Returns false if that is impossible.
    fn make_room(&mut self, needed: usize) -> bool {
        if self.used_bytes + needed <= self.budget_bytes {
            return true;
        }

        let mut candidates: Vec<(u64, u64)> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.last_touched < self.frame)
            .map(|(handle, entry)| (entry.last_touched, *handle))
            .collect();
        candidates.sort_unstable();

        for (_, handle) in candidates {
            if self.used_bytes + needed <= self.budget_bytes {
                break;
            }
            if let Some(entry) = self.entries.remove(&handle) {
                self.used_bytes -= entry.data.len();
                self.stats.evictions += 1;
            }
        }

        self.used_bytes + needed <= self.budget_bytes
    }
}

impl VertexCacheManager for FrameVertexCache {
    fn alloc(&mut self, data: &[u8], kind: CacheKind) -> Option<CacheHandle> {
        if data.len() > self.budget_bytes || !self.make_room(data.len()) {
            self.stats.failed_allocs += 1;
            return None;
        }

        let handle = self.next_handle;
        self.next_handle += 1;
        self.used_bytes += data.len();
        self.entries.insert(
            handle,
            CacheEntry {
                kind,
                data: data.to_vec(),
                last_touched: self.frame,
            },
        );
        self.stats.allocs += 1;

        Some(CacheHandle(handle))
    }

    fn touch(&mut self, handle: CacheHandle) {
        if let Some(entry) = self.entries.get_mut(&handle.0) {
            entry.last_touched = self.frame;
            self.stats.touches += 1;
        }
    }

    fn is_resident(&self, handle: CacheHandle) -> bool {
        self.entries.contains_key(&handle.0)
    }
}
