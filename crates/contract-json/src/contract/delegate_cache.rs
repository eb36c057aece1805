// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Lazily built, memoized procedure slots of one collection contract.
//!
//! Each slot is an initialize-once cell: readers take a single acquire load
//! on the hit path. A miss takes the per-cache build lock, re-checks the slot
//! and runs the builder; the built procedure is published through the cell
//! with release ordering, so a thread that sees the slot also sees the fully
//! constructed procedure. The lock is per cache instance, so contracts of
//! different collection types never contend.

use crate::descriptor::CollectionDescriptor;
use crate::error::Result;
use crate::strategy::{CollectionReader, CollectionWriter, GetOnlyCollectionReader};
use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

/// One of the three procedure slots of a contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProcedureSlot {
    Reader,
    GetOnlyReader,
    Writer,
}

impl fmt::Display for ProcedureSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reader => f.write_str("reader"),
            Self::GetOnlyReader => f.write_str("get-only reader"),
            Self::Writer => f.write_str("writer"),
        }
    }
}

/// Build statistics, updated only on the locked slow path.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub builds: u64,
    pub failed_builds: u64,
}

/// Three-slot procedure cache bound to one descriptor.
pub struct DelegateCache {
    descriptor: Arc<CollectionDescriptor>,
    reader: OnceLock<CollectionReader>,
    get_only_reader: OnceLock<GetOnlyCollectionReader>,
    writer: OnceLock<CollectionWriter>,
    build_lock: Mutex<()>,
    builds: AtomicU64,
    failed_builds: AtomicU64,
}

impl DelegateCache {
    pub fn new(descriptor: Arc<CollectionDescriptor>) -> Self {
        Self {
            descriptor,
            reader: OnceLock::new(),
            get_only_reader: OnceLock::new(),
            writer: OnceLock::new(),
            build_lock: Mutex::new(()),
            builds: AtomicU64::new(0),
            failed_builds: AtomicU64::new(0),
        }
    }

    pub fn descriptor(&self) -> &Arc<CollectionDescriptor> {
        &self.descriptor
    }

    /// Whether a slot has been populated.
    pub fn is_built(&self, slot: ProcedureSlot) -> bool {
        match slot {
            ProcedureSlot::Reader => self.reader.get().is_some(),
            ProcedureSlot::GetOnlyReader => self.get_only_reader.get().is_some(),
            ProcedureSlot::Writer => self.writer.get().is_some(),
        }
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            builds: self.builds.load(Ordering::Relaxed),
            failed_builds: self.failed_builds.load(Ordering::Relaxed),
        }
    }

    pub fn get_or_build_reader<F>(&self, build: F) -> Result<&CollectionReader>
    where
        F: FnOnce(&CollectionDescriptor) -> Result<CollectionReader>,
    {
        self.get_or_build(ProcedureSlot::Reader, &self.reader, build)
    }

    pub fn get_or_build_get_only_reader<F>(&self, build: F) -> Result<&GetOnlyCollectionReader>
    where
        F: FnOnce(&CollectionDescriptor) -> Result<GetOnlyCollectionReader>,
    {
        self.get_or_build(ProcedureSlot::GetOnlyReader, &self.get_only_reader, build)
    }

    pub fn get_or_build_writer<F>(&self, build: F) -> Result<&CollectionWriter>
    where
        F: FnOnce(&CollectionDescriptor) -> Result<CollectionWriter>,
    {
        self.get_or_build(ProcedureSlot::Writer, &self.writer, build)
    }

    fn get_or_build<'s, T, F>(&'s self, slot: ProcedureSlot, cell: &'s OnceLock<T>, build: F) -> Result<&'s T>
    where
        F: FnOnce(&CollectionDescriptor) -> Result<T>,
    {
        if let Some(hit) = cell.get() {
            return Ok(hit);
        }

        let _guard = self.build_lock.lock();
        if let Some(hit) = cell.get() {
            return Ok(hit);
        }

        match build(&self.descriptor) {
            Ok(built) => {
                self.builds.fetch_add(1, Ordering::Relaxed);
                log::debug!(
                    "[contract] built {} procedure for '{}'",
                    slot,
                    self.descriptor.type_name()
                );
                // Still empty: every writer of this cell holds the build lock.
                Ok(cell.get_or_init(|| built))
            }
            Err(e) => {
                self.failed_builds.fetch_add(1, Ordering::Relaxed);
                log::warn!(
                    "[contract] building {} procedure for '{}' failed: {}",
                    slot,
                    self.descriptor.type_name(),
                    e
                );
                Err(e)
            }
        }
    }
}

impl fmt::Debug for DelegateCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DelegateCache")
            .field("type_name", &self.descriptor.type_name())
            .field("reader", &self.is_built(ProcedureSlot::Reader))
            .field("get_only_reader", &self.is_built(ProcedureSlot::GetOnlyReader))
            .field("writer", &self.is_built(ProcedureSlot::Writer))
            .field("stats", &self.stats())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::PrimitiveKind;
    use crate::error::ContractError;
    use crate::strategy::StrategyMode;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Barrier;

    fn cache() -> DelegateCache {
        DelegateCache::new(Arc::new(CollectionDescriptor::list_of(
            "List<int>",
            PrimitiveKind::Int32,
        )))
    }

    #[test]
    fn test_builds_once_and_reuses() {
        let cache = cache();
        let calls = AtomicUsize::new(0);
        let build = |d: &CollectionDescriptor| {
            calls.fetch_add(1, Ordering::SeqCst);
            StrategyMode::Compiled.provider().reader(d)
        };

        let first = cache.get_or_build_reader(build).expect("first");
        let second = cache.get_or_build_reader(build).expect("second");

        assert!(Arc::ptr_eq(first, second));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.stats().builds, 1);
        assert!(cache.is_built(ProcedureSlot::Reader));
        assert!(!cache.is_built(ProcedureSlot::Writer));
    }

    #[test]
    fn test_failed_build_leaves_slot_empty() {
        let cache = cache();
        let err = cache
            .get_or_build_writer(|d| {
                Err(ContractError::MalformedDescriptor {
                    type_name: d.type_name().to_string(),
                    reason: "injected".into(),
                })
            })
            .err().unwrap();
        assert!(matches!(err, ContractError::MalformedDescriptor { .. }));
        assert!(!cache.is_built(ProcedureSlot::Writer));
        assert_eq!(cache.stats().failed_builds, 1);

        // Retry succeeds and populates the slot.
        cache
            .get_or_build_writer(|d| StrategyMode::ReflectionOnly.provider().writer(d))
            .expect("retry");
        assert!(cache.is_built(ProcedureSlot::Writer));
        assert_eq!(
            cache.stats(),
            CacheStats {
                builds: 1,
                failed_builds: 1
            }
        );
    }

    #[test]
    fn test_concurrent_first_access_builds_once() {
        const THREADS: usize = 16;
        let cache = cache();
        let calls = AtomicUsize::new(0);
        let barrier = Barrier::new(THREADS);

        let procedures: Vec<&GetOnlyCollectionReader> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..THREADS)
                .map(|_| {
                    s.spawn(|| {
                        barrier.wait();
                        cache
                            .get_or_build_get_only_reader(|d| {
                                calls.fetch_add(1, Ordering::SeqCst);
                                std::thread::yield_now();
                                StrategyMode::Compiled.provider().get_only_reader(d)
                            })
                            .expect("build")
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().expect("join"))
                .collect()
        });

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(procedures.len(), THREADS);
        assert!(procedures.iter().all(|p| Arc::ptr_eq(p, procedures[0])));
    }
}
