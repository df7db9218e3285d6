// Point-in-time snapshots of the vector store: gzip JSON plus a SHA-256 sidecar
use anyhow::{anyhow, bail, Context, Result};
use atomicwrites::{AllowOverwrite, AtomicFile};
use chrono::{DateTime, Utc};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use talentmatch_core::{EmbeddingVector, EntityType, StoreConfig, VectorStore};

const SNAPSHOT_EXTENSION: &str = "snapshot";
const CHECKSUM_EXTENSION: &str = "sha256";
const FORMAT_VERSION: u32 = 1;

/// Snapshot file as listed on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotDescription {
    pub name: String,
    pub creation_time: Option<String>,
    pub size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
}

/// Everything needed to rebuild a store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSnapshotData {
    pub format_version: u32,
    pub created_at: DateTime<Utc>,
    pub config: StoreConfig,
    pub jobs: Vec<EmbeddingVector>,
    pub resumes: Vec<EmbeddingVector>,
}

impl StoreSnapshotData {
    pub fn capture(store: &VectorStore, config: &StoreConfig) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            created_at: Utc::now(),
            config: config.clone(),
            jobs: store.export(EntityType::Job),
            resumes: store.export(EntityType::Resume),
        }
    }

    pub fn len(&self) -> usize {
        self.jobs.len() + self.resumes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub struct SnapshotManager {
    snapshot_dir: PathBuf,
}

impl SnapshotManager {
    pub fn new<P: AsRef<Path>>(snapshot_dir: P) -> Result<Self> {
        let snapshot_dir = snapshot_dir.as_ref().to_path_buf();
        fs::create_dir_all(&snapshot_dir)
            .with_context(|| format!("creating snapshot directory {}", snapshot_dir.display()))?;
        Ok(Self { snapshot_dir })
    }

    pub fn dir(&self) -> &Path {
        &self.snapshot_dir
    }

    fn generate_snapshot_name() -> String {
        let now: DateTime<Utc> = Utc::now();
        format!("store-{}.{}", now.format("%Y-%m-%d-%H-%M-%S-%3f"), SNAPSHOT_EXTENSION)
    }

    fn snapshot_path(&self, name: &str) -> Result<PathBuf> {
        if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
            bail!("invalid snapshot name '{}'", name);
        }
        Ok(self.snapshot_dir.join(name))
    }

    fn checksum_path(path: &Path) -> PathBuf {
        let mut os = path.as_os_str().to_owned();
        os.push(".");
        os.push(CHECKSUM_EXTENSION);
        PathBuf::from(os)
    }

    /// Write the current contents of `store`, pending writes included.
    pub fn create(&self, store: &VectorStore, config: &StoreConfig) -> Result<SnapshotDescription> {
        let data = StoreSnapshotData::capture(store, config);
        let name = Self::generate_snapshot_name();
        let path = self.snapshot_path(&name)?;

        let json = serde_json::to_vec(&data)?;
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&json)?;
        let compressed = encoder.finish()?;
        let checksum = format!("{:x}", Sha256::digest(&compressed));

        AtomicFile::new(&path, AllowOverwrite)
            .write(|f| f.write_all(&compressed))
            .map_err(|e| anyhow!("writing snapshot {}: {}", path.display(), e))?;
        AtomicFile::new(Self::checksum_path(&path), AllowOverwrite)
            .write(|f| f.write_all(checksum.as_bytes()))
            .map_err(|e| anyhow!("writing checksum for {}: {}", path.display(), e))?;

        tracing::info!(
            snapshot = %name,
            jobs = data.jobs.len(),
            resumes = data.resumes.len(),
            bytes = compressed.len(),
            "created snapshot"
        );

        Ok(SnapshotDescription {
            name,
            creation_time: Some(data.created_at.format("%Y-%m-%dT%H:%M:%SZ").to_string()),
            size: compressed.len() as u64,
            checksum: Some(checksum),
        })
    }

    /// Snapshots on disk, newest first
    pub fn list(&self) -> Result<Vec<SnapshotDescription>> {
        let mut snapshots = Vec::new();
        for entry in fs::read_dir(&self.snapshot_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|s| s.to_str()) != Some(SNAPSHOT_EXTENSION) {
                continue;
            }
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };

            let metadata = fs::metadata(&path)?;
            let creation_time = metadata
                .modified()
                .ok()
                .map(|t| DateTime::<Utc>::from(t).format("%Y-%m-%dT%H:%M:%SZ").to_string());
            let checksum = fs::read_to_string(Self::checksum_path(&path))
                .ok()
                .map(|s| s.trim().to_string());

            snapshots.push(SnapshotDescription {
                name: name.to_string(),
                creation_time,
                size: metadata.len(),
                checksum,
            });
        }

        // Names embed the timestamp
        snapshots.sort_by(|a, b| b.name.cmp(&a.name));
        Ok(snapshots)
    }

    pub fn latest(&self) -> Result<Option<SnapshotDescription>> {
        Ok(self.list()?.into_iter().next())
    }

    /// Read and verify a snapshot
    pub fn load(&self, name: &str) -> Result<StoreSnapshotData> {
        let path = self.snapshot_path(name)?;
        if !path.exists() {
            bail!("snapshot '{}' not found", name);
        }
        let compressed = fs::read(&path)?;

        if let Ok(expected) = fs::read_to_string(Self::checksum_path(&path)) {
            let actual = format!("{:x}", Sha256::digest(&compressed));
            if actual != expected.trim() {
                bail!(
                    "checksum mismatch for snapshot '{}': expected {}, got {}",
                    name,
                    expected.trim(),
                    actual
                );
            }
        } else {
            tracing::warn!(snapshot = %name, "no checksum file, loading unverified");
        }

        let mut json = Vec::new();
        GzDecoder::new(compressed.as_slice()).read_to_end(&mut json)?;
        let data: StoreSnapshotData = serde_json::from_slice(&json)
            .with_context(|| format!("decoding snapshot '{}'", name))?;
        if data.format_version != FORMAT_VERSION {
            bail!(
                "snapshot '{}' has format version {}, expected {}",
                name,
                data.format_version,
                FORMAT_VERSION
            );
        }
        Ok(data)
    }

    /// Upsert every vector of a snapshot into `store` and rebuild both
    /// collections. Returns the number of vectors restored.
    pub fn restore_into(&self, name: &str, store: &VectorStore) -> Result<usize> {
        let data = self.load(name)?;
        if data.config.jobs.dim != store.dim() {
            bail!(
                "snapshot '{}' has dimension {}, store expects {}",
                name,
                data.config.jobs.dim,
                store.dim()
            );
        }

        let restored = data.len();
        for embedding in data.jobs.into_iter().chain(data.resumes) {
            store.upsert_embedding(embedding)?;
        }
        for entity_type in EntityType::ALL {
            store.rebuild(entity_type);
        }

        tracing::info!(snapshot = %name, vectors = restored, "restored snapshot");
        Ok(restored)
    }

    /// Build a fresh store with the snapshot's own configuration
    pub fn restore(&self, name: &str) -> Result<(VectorStore, StoreConfig)> {
        let config = self.load(name)?.config;
        let store = VectorStore::new(config.clone())?;
        self.restore_into(name, &store)?;
        Ok((store, config))
    }

    pub fn delete(&self, name: &str) -> Result<bool> {
        let path = self.snapshot_path(name)?;
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(&path)?;
        let checksum = Self::checksum_path(&path);
        if checksum.exists() {
            fs::remove_file(checksum)?;
        }
        Ok(true)
    }
}
