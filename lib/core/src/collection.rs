//! A single entity type's vectors and its searchable index.
//!
//! Reads never wait on index construction. The searchable structure is an
//! immutable [`IndexSnapshot`] behind an `Arc`; writes go to a small pending
//! buffer that every search scans exactly, and [`VectorCollection::rebuild`]
//! folds that buffer into a fresh snapshot which is swapped in atomically.

use crate::index::{rank_order, IndexConfig, IndexMode, SearchHit, SearchIndex, VectorIndex};
use crate::{EmbeddingVector, EntityType, Error, Result, Vector};
use ahash::AHashMap;
use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Configuration for a collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionConfig {
    pub dim: usize,
    /// A partitioned index is stale once the collection grows past
    /// `trained_size * stale_multiplier`
    pub stale_multiplier: f32,
    /// Pending writes beyond this count flag the collection for a rebuild
    pub max_pending: usize,
    pub index: IndexConfig,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            dim: 256,
            stale_multiplier: 2.0,
            max_pending: 1024,
            index: IndexConfig::default(),
        }
    }
}

impl CollectionConfig {
    pub fn with_dim(dim: usize) -> Self {
        Self {
            dim,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.dim == 0 {
            return Err(Error::InvalidArgument("collection dimension must be positive".into()));
        }
        if !self.stale_multiplier.is_finite() || self.stale_multiplier < 1.0 {
            return Err(Error::InvalidArgument(format!(
                "stale_multiplier must be >= 1.0, got {}",
                self.stale_multiplier
            )));
        }
        if self.index.probes == 0 {
            return Err(Error::InvalidArgument("probes must be positive".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaleReason {
    /// Partitioned index trained on far fewer vectors than are now stored
    GrewPastTraining,
    /// Flat index over a collection that has crossed the partition threshold
    ShouldPartition,
    /// Too many writes waiting in the pending buffer
    PendingOverflow,
}

impl fmt::Display for StaleReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            StaleReason::GrewPastTraining => "grew past training size",
            StaleReason::ShouldPartition => "crossed partition threshold",
            StaleReason::PendingOverflow => "pending buffer overflow",
        };
        f.write_str(text)
    }
}

/// Non-fatal signal that a collection wants a rebuild
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Staleness {
    pub reason: StaleReason,
    /// Vectors in the current index
    pub indexed: usize,
    /// Live vectors including pending writes
    pub current: usize,
    pub pending: usize,
}

impl Staleness {
    pub fn to_error(&self) -> Error {
        Error::IndexStale {
            indexed: self.indexed,
            current: self.current,
            reason: self.reason.to_string(),
        }
    }
}

/// Search result plus the state of the index that produced it
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub hits: Vec<SearchHit>,
    pub mode: IndexMode,
    pub staleness: Option<Staleness>,
}

impl SearchOutcome {
    pub fn is_stale(&self) -> bool {
        self.staleness.is_some()
    }

    /// Hits, or `IndexStale` for callers that refuse stale results.
    pub fn into_fresh(self) -> Result<Vec<SearchHit>> {
        match self.staleness {
            Some(staleness) => Err(staleness.to_error()),
            None => Ok(self.hits),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionStats {
    pub entity_type: EntityType,
    pub mode: IndexMode,
    pub dim: usize,
    pub indexed: usize,
    pub pending: usize,
    pub live: usize,
    pub generation: u64,
    pub built_at: DateTime<Utc>,
    pub build_millis: u64,
    pub staleness: Option<Staleness>,
}

/// Immutable searchable state; replaced wholesale on rebuild.
pub struct IndexSnapshot {
    index: SearchIndex,
    records: AHashMap<String, Arc<EmbeddingVector>>,
    generation: u64,
    built_at: DateTime<Utc>,
    build_millis: u64,
}

impl IndexSnapshot {
    fn empty(dim: usize) -> Self {
        Self {
            index: SearchIndex::empty(dim),
            records: AHashMap::new(),
            generation: 0,
            built_at: Utc::now(),
            build_millis: 0,
        }
    }

    pub fn mode(&self) -> IndexMode {
        self.index.mode()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// `None` marks a removal not yet folded into the index
type PendingEntry = Option<Arc<EmbeddingVector>>;

/// Readers take a cheap `Arc` clone; writers copy the map only while a
/// reader still holds the previous version.
type PendingMap = AHashMap<String, PendingEntry>;

pub struct VectorCollection {
    entity_type: EntityType,
    config: CollectionConfig,
    snapshot: RwLock<Arc<IndexSnapshot>>,
    pending: RwLock<Arc<PendingMap>>,
    rebuild_lock: Mutex<()>,
    rebuild_scheduled: AtomicBool,
}

impl VectorCollection {
    pub fn new(entity_type: EntityType, config: CollectionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            entity_type,
            snapshot: RwLock::new(Arc::new(IndexSnapshot::empty(config.dim))),
            config,
            pending: RwLock::new(Arc::new(PendingMap::new())),
            rebuild_lock: Mutex::new(()),
            rebuild_scheduled: AtomicBool::new(false),
        })
    }

    pub fn entity_type(&self) -> EntityType {
        self.entity_type
    }

    pub fn dim(&self) -> usize {
        self.config.dim
    }

    pub fn config(&self) -> &CollectionConfig {
        &self.config
    }

    /// The snapshot searches currently run against
    pub fn snapshot(&self) -> Arc<IndexSnapshot> {
        self.snapshot.read().clone()
    }

    pub fn mode(&self) -> IndexMode {
        self.snapshot.read().mode()
    }

    /// Stage a vector. Visible to searches immediately; indexed on the next rebuild.
    pub fn upsert(&self, mut embedding: EmbeddingVector) -> Result<()> {
        if embedding.entity_type != self.entity_type {
            return Err(Error::InvalidArgument(format!(
                "{} vector '{}' sent to the {} collection",
                embedding.entity_type, embedding.entity_id, self.entity_type
            )));
        }
        if embedding.entity_id.trim().is_empty() {
            return Err(Error::InvalidArgument("vector id must not be empty".into()));
        }
        self.prepare(&mut embedding.vector)?;

        let id = embedding.entity_id.clone();
        let mut pending = self.pending.write();
        Arc::make_mut(&mut *pending).insert(id, Some(Arc::new(embedding)));
        Ok(())
    }

    /// Stage a removal. Returns whether the id was live.
    pub fn remove(&self, id: &str) -> bool {
        // Checked and staged under one write guard so a concurrent upsert
        // cannot land in between.
        let mut pending = self.pending.write();
        let existed = match pending.get(id) {
            Some(entry) => entry.is_some(),
            None => self.snapshot.read().records.contains_key(id),
        };
        if existed {
            Arc::make_mut(&mut *pending).insert(id.to_string(), None);
        }
        existed
    }

    pub fn get(&self, id: &str) -> Option<Arc<EmbeddingVector>> {
        if let Some(entry) = self.pending.read().get(id) {
            return entry.clone();
        }
        self.snapshot.read().records.get(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Live vectors, pending writes included
    pub fn len(&self) -> usize {
        let pending = self.pending_view();
        let snapshot = self.snapshot();
        live_count(&snapshot, &pending)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn pending_len(&self) -> usize {
        self.pending.read().len()
    }

    /// Top-k ids by inner product with `query`, at most `k` long, no duplicates.
    pub fn search(&self, query: &Vector, k: usize) -> Result<SearchOutcome> {
        if k == 0 {
            return Err(Error::InvalidArgument("k must be positive".into()));
        }
        let mut query = query.clone();
        self.prepare(&mut query)?;

        // Pending is read before the snapshot: a concurrent rebuild swaps the
        // snapshot before it drains pending, so no write is ever missed.
        let pending = self.pending_view();
        let snapshot = self.snapshot();

        let skip = |id: &str| pending.contains_key(id);
        let mut hits = snapshot.index.search(query.as_slice(), k, &skip);

        hits.extend(pending.iter().filter_map(|(id, entry)| {
            entry
                .as_ref()
                .map(|embedding| SearchHit::new(id.clone(), embedding.vector.dot(&query)))
        }));
        hits.sort_unstable_by(|a, b| rank_order(a.score, &a.id, b.score, &b.id));
        hits.truncate(k);

        let staleness = self.staleness_of(&snapshot, &pending);
        if let Some(staleness) = &staleness {
            tracing::debug!(
                entity_type = %self.entity_type,
                reason = %staleness.reason,
                indexed = staleness.indexed,
                current = staleness.current,
                "search served from stale index"
            );
        }

        Ok(SearchOutcome {
            hits,
            mode: snapshot.mode(),
            staleness,
        })
    }

    pub fn staleness(&self) -> Option<Staleness> {
        let pending = self.pending_view();
        let snapshot = self.snapshot();
        self.staleness_of(&snapshot, &pending)
    }

    /// Fold pending writes into a newly built index and swap it in.
    ///
    /// Rebuilds of one collection are serialized; searches keep using the
    /// previous snapshot until the swap.
    pub fn rebuild(&self) -> CollectionStats {
        let _guard = self.rebuild_lock.lock();
        let started = Instant::now();

        let staged = self.pending_view();
        let previous = self.snapshot();

        let mut records = previous.records.clone();
        for (id, entry) in staged.iter() {
            match entry {
                Some(embedding) => {
                    records.insert(id.clone(), embedding.clone());
                }
                None => {
                    records.remove(id);
                }
            }
        }

        let mut entries: Vec<(String, Vector)> = records
            .iter()
            .map(|(id, embedding)| (id.clone(), embedding.vector.clone()))
            .collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(&b.0));

        let index = SearchIndex::build(entries, self.config.dim, &self.config.index);
        let build_millis = started.elapsed().as_millis() as u64;
        let next = Arc::new(IndexSnapshot {
            index,
            records,
            generation: previous.generation + 1,
            built_at: Utc::now(),
            build_millis,
        });

        *self.snapshot.write() = next.clone();

        // Drop only the entries this build consumed; newer writes stay pending
        {
            let mut guard = self.pending.write();
            let pending = Arc::make_mut(&mut *guard);
            for (id, entry) in staged.iter() {
                let consumed = match (pending.get(id), entry) {
                    (Some(Some(current)), Some(built)) => Arc::ptr_eq(current, built),
                    (Some(None), None) => true,
                    _ => false,
                };
                if consumed {
                    pending.remove(id);
                }
            }
        }

        tracing::info!(
            entity_type = %self.entity_type,
            mode = %next.mode(),
            vectors = next.len(),
            generation = next.generation,
            build_millis,
            "rebuilt index"
        );

        self.stats()
    }

    /// Every live vector, sorted by id
    pub fn export(&self) -> Vec<EmbeddingVector> {
        let pending = self.pending_view();
        let snapshot = self.snapshot();

        let mut out: Vec<EmbeddingVector> = snapshot
            .records
            .iter()
            .filter(|(id, _)| !pending.contains_key(id.as_str()))
            .map(|(_, embedding)| embedding.as_ref().clone())
            .collect();
        out.extend(pending.values().flatten().map(|embedding| embedding.as_ref().clone()));
        out.sort_unstable_by(|a, b| a.entity_id.cmp(&b.entity_id));
        out
    }

    pub fn stats(&self) -> CollectionStats {
        let pending = self.pending_view();
        let snapshot = self.snapshot();
        CollectionStats {
            entity_type: self.entity_type,
            mode: snapshot.mode(),
            dim: self.config.dim,
            indexed: snapshot.len(),
            pending: pending.len(),
            live: live_count(&snapshot, &pending),
            generation: snapshot.generation,
            built_at: snapshot.built_at,
            build_millis: snapshot.build_millis,
            staleness: self.staleness_of(&snapshot, &pending),
        }
    }

    /// Claim the right to schedule a background rebuild. False if one is queued.
    pub(crate) fn try_claim_rebuild(&self) -> bool {
        self.rebuild_scheduled
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub(crate) fn release_rebuild_claim(&self) {
        self.rebuild_scheduled.store(false, Ordering::Release);
    }

    fn prepare(&self, vector: &mut Vector) -> Result<()> {
        if vector.dim() != self.config.dim {
            return Err(Error::InvalidDimension {
                expected: self.config.dim,
                actual: vector.dim(),
            });
        }
        if !vector.is_finite() {
            return Err(Error::InvalidArgument("vector contains non-finite values".into()));
        }
        if !vector.is_unit() {
            if vector.norm() <= f32::EPSILON {
                return Err(Error::InvalidArgument("zero vector cannot be normalized".into()));
            }
            vector.normalize();
        }
        Ok(())
    }

    fn pending_view(&self) -> Arc<PendingMap> {
        self.pending.read().clone()
    }

    fn staleness_of(
        &self,
        snapshot: &IndexSnapshot,
        pending: &PendingMap,
    ) -> Option<Staleness> {
        let indexed = snapshot.len();
        let current = live_count(snapshot, pending);
        let threshold = self.config.index.partition_threshold.max(1);

        let reason = match snapshot.mode() {
            IndexMode::Partitioned
                if current as f64 > indexed as f64 * f64::from(self.config.stale_multiplier) =>
            {
                Some(StaleReason::GrewPastTraining)
            }
            IndexMode::Flat if current >= threshold => Some(StaleReason::ShouldPartition),
            _ if pending.len() > self.config.max_pending => Some(StaleReason::PendingOverflow),
            _ => None,
        }?;

        Some(Staleness {
            reason,
            indexed,
            current,
            pending: pending.len(),
        })
    }
}

fn live_count(snapshot: &IndexSnapshot, pending: &PendingMap) -> usize {
    let mut count = snapshot.records.len();
    for (id, entry) in pending {
        let indexed = snapshot.records.contains_key(id);
        match (entry.is_some(), indexed) {
            (true, false) => count += 1,
            (false, true) => count -= 1,
            _ => {}
        }
    }
    count
}
