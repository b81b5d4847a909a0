//! Vector storage.
//!
//! The [`VectorStore`] trait is the seam between the ingestion
//! pipeline and whatever persists vectors. [`LocalVectorStore`] keeps
//! an index on the local filesystem and answers queries by brute-force
//! scan.

pub mod local;

use crate::core::error::Result;
use crate::core::types::{VectorMatch, VectorRecord};
use serde::{Deserialize, Serialize};

pub use local::LocalVectorStore;

/// Distance function used to rank neighbours (lower is closer)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMetric {
    /// `1 - cos(a, b)`
    #[default]
    Cosine,
    /// L2 distance
    Euclidean,
}

impl DistanceMetric {
    /// Distance between two vectors of equal length
    pub fn distance(&self, a: &[f32], b: &[f32]) -> f32 {
        match self {
            DistanceMetric::Cosine => 1.0 - cosine_similarity(a, b),
            DistanceMetric::Euclidean => a
                .iter()
                .zip(b.iter())
                .map(|(x, y)| (x - y) * (x - y))
                .sum::<f32>()
                .sqrt(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DistanceMetric::Cosine => "cosine",
            DistanceMetric::Euclidean => "euclidean",
        }
    }
}

/// Cosine similarity; 0 when either vector has zero norm
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}

/// Persistent vector index
pub trait VectorStore {
    /// Create the index; a no-op when it already exists
    fn create_index(&self) -> Result<()>;

    /// Delete the index; a no-op with a warning when it is missing
    fn delete_index(&self) -> Result<()>;

    /// Upsert a batch of records, all or nothing
    fn add_vectors(&self, records: &[VectorRecord]) -> Result<()>;

    /// The `top_k` nearest records, closest first
    fn query_vectors(&self, vector: &[f32], top_k: usize) -> Result<Vec<VectorMatch>>;
}

impl<T: VectorStore + ?Sized> VectorStore for Box<T> {
    fn create_index(&self) -> Result<()> {
        (**self).create_index()
    }

    fn delete_index(&self) -> Result<()> {
        (**self).delete_index()
    }

    fn add_vectors(&self, records: &[VectorRecord]) -> Result<()> {
        (**self).add_vectors(records)
    }

    fn query_vectors(&self, vector: &[f32], top_k: usize) -> Result<Vec<VectorMatch>> {
        (**self).query_vectors(vector, top_k)
    }
}
