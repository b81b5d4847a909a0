//! File-backed vector index.
//!
//! Layout under `{data_dir}/{index_name}/`:
//!
//! - `index.json`: name, dimension, metric, creation time
//! - `records.jsonl`: one [`VectorRecord`] per line
//!
//! Each batch is serialized in full before a single append, so a
//! batch that fails validation or serialization writes nothing.

use crate::core::config::StoreConfig;
use crate::core::error::{RagError, Result};
use crate::core::store::{DistanceMetric, VectorStore};
use crate::core::types::{VectorMatch, VectorRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

const META_FILE: &str = "index.json";
const RECORDS_FILE: &str = "records.jsonl";

/// Persisted index description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexMeta {
    pub name: String,
    pub dimension: usize,
    pub metric: DistanceMetric,
    pub created_at: DateTime<Utc>,
}

/// Local filesystem vector store
#[derive(Debug, Clone)]
pub struct LocalVectorStore {
    data_dir: PathBuf,
    index_name: String,
    dimension: usize,
    metric: DistanceMetric,
}

impl LocalVectorStore {
    pub fn new(
        data_dir: impl Into<PathBuf>,
        index_name: impl Into<String>,
        dimension: usize,
        metric: DistanceMetric,
    ) -> Self {
        Self {
            data_dir: data_dir.into(),
            index_name: index_name.into(),
            dimension,
            metric,
        }
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(
            &config.data_dir,
            &config.index_name,
            config.dimension,
            config.distance_metric,
        )
    }

    /// Directory of this index
    pub fn index_dir(&self) -> PathBuf {
        self.data_dir.join(&self.index_name)
    }

    fn meta_path(&self) -> PathBuf {
        self.index_dir().join(META_FILE)
    }

    fn records_path(&self) -> PathBuf {
        self.index_dir().join(RECORDS_FILE)
    }

    pub fn exists(&self) -> bool {
        self.meta_path().exists()
    }

    /// Read the index description; a missing index is a storage error
    pub fn meta(&self) -> Result<IndexMeta> {
        let path = self.meta_path();
        if !path.exists() {
            return Err(RagError::Storage(format!(
                "Index '{}' does not exist at {:?}",
                self.index_name,
                self.index_dir()
            )));
        }
        let json = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Number of stored records
    pub fn count(&self) -> Result<usize> {
        self.meta()?;
        Ok(self.read_records()?.len())
    }

    fn read_records(&self) -> Result<Vec<VectorRecord>> {
        let path = self.records_path();
        if !path.exists() {
            return Ok(Vec::new());
        }

        let reader = BufReader::new(fs::File::open(&path)?);
        let mut records = Vec::new();
        for (line_no, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record = serde_json::from_str(&line).map_err(|e| {
                RagError::Storage(format!("Corrupt record at {}:{}: {e}", path.display(), line_no + 1))
            })?;
            records.push(record);
        }
        Ok(records)
    }
}

fn write_meta(path: &Path, meta: &IndexMeta) -> Result<()> {
    let json = serde_json::to_string_pretty(meta)?;
    fs::write(path, json)?;
    Ok(())
}

impl VectorStore for LocalVectorStore {
    fn create_index(&self) -> Result<()> {
        if self.exists() {
            tracing::info!("Index '{}' already exists, skipping creation", self.index_name);
            return Ok(());
        }

        fs::create_dir_all(self.index_dir())?;
        let meta = IndexMeta {
            name: self.index_name.clone(),
            dimension: self.dimension,
            metric: self.metric,
            created_at: Utc::now(),
        };
        write_meta(&self.meta_path(), &meta)?;
        fs::File::create(self.records_path())?;

        tracing::info!(
            "Created index '{}' (dimension {}, {})",
            self.index_name,
            self.dimension,
            self.metric.as_str()
        );
        Ok(())
    }

    fn delete_index(&self) -> Result<()> {
        let dir = self.index_dir();
        if !dir.exists() {
            tracing::warn!("Index '{}' does not exist, skipping deletion", self.index_name);
            return Ok(());
        }

        fs::remove_dir_all(&dir)?;
        tracing::info!("Deleted index '{}'", self.index_name);
        Ok(())
    }

    fn add_vectors(&self, records: &[VectorRecord]) -> Result<()> {
        let meta = self.meta()?;

        let mut batch = String::new();
        for record in records {
            if record.vector.len() != meta.dimension {
                return Err(RagError::Storage(format!(
                    "Record {} has dimension {}, index expects {}",
                    record.key,
                    record.vector.len(),
                    meta.dimension
                )));
            }
            batch.push_str(&serde_json::to_string(record)?);
            batch.push('\n');
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.records_path())?;
        file.write_all(batch.as_bytes())?;

        tracing::debug!("Appended {} records to '{}'", records.len(), self.index_name);
        Ok(())
    }

    fn query_vectors(&self, vector: &[f32], top_k: usize) -> Result<Vec<VectorMatch>> {
        if top_k == 0 {
            return Err(RagError::InvalidQuery("top_k must be at least 1".to_string()));
        }
        let meta = self.meta()?;
        if vector.len() != meta.dimension {
            return Err(RagError::InvalidQuery(format!(
                "Query vector has dimension {}, index expects {}",
                vector.len(),
                meta.dimension
            )));
        }

        let mut matches: Vec<VectorMatch> = self
            .read_records()?
            .into_iter()
            .map(|record| VectorMatch {
                distance: meta.metric.distance(vector, &record.vector),
                key: record.key,
                metadata: record.metadata,
            })
            .collect();

        matches.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        matches.truncate(top_k);

        Ok(matches)
    }
}
