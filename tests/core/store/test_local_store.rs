// Local vector store tests: on-disk layout and search

use crate::common::TestCorpus;
use docrag::core::store::{DistanceMetric, LocalVectorStore, VectorStore};
use docrag::{Metadata, RagError, VectorRecord, CONTENT_KEY};
use std::fs;

fn record(key: &str, vector: Vec<f32>, content: &str) -> VectorRecord {
    let mut metadata = Metadata::new();
    metadata.insert(CONTENT_KEY.to_string(), content.into());
    VectorRecord {
        key: key.to_string(),
        vector,
        metadata,
    }
}

#[test]
fn test_index_layout_on_disk() {
    let data = TestCorpus::new();
    let store = LocalVectorStore::new(data.path(), "layout", 3, DistanceMetric::Euclidean);

    store.create_index().unwrap();
    store
        .add_vectors(&[record("a", vec![1.0, 2.0, 3.0], "alpha")])
        .unwrap();

    let dir = data.join("layout");
    let meta: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.join("index.json")).unwrap()).unwrap();
    assert_eq!(meta["name"], "layout");
    assert_eq!(meta["dimension"], 3);
    assert_eq!(meta["metric"], "euclidean");

    let lines = fs::read_to_string(dir.join("records.jsonl")).unwrap();
    assert_eq!(lines.lines().count(), 1);
    assert!(lines.contains("\"alpha\""));
}

#[test]
fn test_euclidean_ranking() {
    let data = TestCorpus::new();
    let store = LocalVectorStore::new(data.path(), "euclid", 2, DistanceMetric::Euclidean);
    store.create_index().unwrap();
    store
        .add_vectors(&[
            record("origin", vec![0.0, 0.0], "o"),
            record("far", vec![10.0, 10.0], "f"),
            record("near", vec![3.0, 4.0], "n"),
        ])
        .unwrap();

    let hits = store.query_vectors(&[3.0, 4.0], 3).unwrap();

    let keys: Vec<&str> = hits.iter().map(|h| h.key.as_str()).collect();
    assert_eq!(keys, vec!["near", "origin", "far"]);
    assert!(hits[0].distance.abs() < 1e-6);
    assert!((hits[1].distance - 5.0).abs() < 1e-5);
}

#[test]
fn test_stored_metric_wins_over_instance_metric() {
    let data = TestCorpus::new();
    LocalVectorStore::new(data.path(), "m", 2, DistanceMetric::Euclidean)
        .create_index()
        .unwrap();

    // Reopened with a different metric, the index keeps its own
    let reopened = LocalVectorStore::new(data.path(), "m", 2, DistanceMetric::Cosine);
    reopened
        .add_vectors(&[record("x", vec![2.0, 0.0], "x")])
        .unwrap();
    let hits = reopened.query_vectors(&[1.0, 0.0], 1).unwrap();

    assert!((hits[0].distance - 1.0).abs() < 1e-6);
    assert_eq!(reopened.meta().unwrap().metric, DistanceMetric::Euclidean);
}

#[test]
fn test_batches_accumulate() {
    let data = TestCorpus::new();
    let store = LocalVectorStore::new(data.path(), "acc", 2, DistanceMetric::Cosine);
    store.create_index().unwrap();

    for i in 0..4 {
        store
            .add_vectors(&[
                record(&format!("a{i}"), vec![1.0, i as f32], "a"),
                record(&format!("b{i}"), vec![i as f32, 1.0], "b"),
            ])
            .unwrap();
    }

    assert_eq!(store.count().unwrap(), 8);
}

#[test]
fn test_query_dimension_mismatch() {
    let data = TestCorpus::new();
    let store = LocalVectorStore::new(data.path(), "dims", 4, DistanceMetric::Cosine);
    store.create_index().unwrap();

    let err = store.query_vectors(&[1.0, 0.0], 1).unwrap_err();

    assert!(matches!(err, RagError::InvalidQuery(_)));
    assert!(err.is_bad_request());
}

#[test]
fn test_corrupt_record_is_reported() {
    let data = TestCorpus::new();
    let store = LocalVectorStore::new(data.path(), "bad", 2, DistanceMetric::Cosine);
    store.create_index().unwrap();
    fs::write(data.join("bad").join("records.jsonl"), "{not json}\n").unwrap();

    let err = store.query_vectors(&[1.0, 0.0], 1).unwrap_err();

    assert!(matches!(err, RagError::Storage(_)));
    assert!(err.to_string().contains("records.jsonl:1"));
}
