//! Persistence of Imager caches.

mod common;

use common::fixtures::*;
use consistency::hash_text_pair;
use consistency::imager::{CacheStore, CacheStoreError, ImageCache, Imager, ImagerConfig, ImagerError};
use consistency::nli::MockPredictor;
use consistency::Image;
use tempfile::TempDir;

fn imager(dir: &TempDir, granularity: &str, predictor: MockPredictor) -> Imager {
    let config = ImagerConfig::new("vitc", granularity)
        .unwrap()
        .with_cache_dir(dir.path());
    Imager::with_predictor(config, Box::new(predictor)).unwrap()
}

#[test]
fn test_roundtrip_reproduces_every_image() {
    let dir = TempDir::new().unwrap();
    let mut writer = imager(&dir, "sentence", MockPredictor::hashed());
    writer
        .build_images(
            &[REPORT, DOCUMENT, DOCUMENT, REPORT],
            &[REPORT_SUMMARY, SUMMARY, SHORT_SUMMARY, "Tiny"],
            7,
        )
        .unwrap();
    assert_eq!(writer.save_cache().unwrap(), 4);

    let store = CacheStore::new(dir.path().join("cache_vitc_sentence.rkyv"), "vitc_sentence");
    let loaded = store.load().unwrap().expect("store exists");

    assert_eq!(loaded.len(), writer.cache().len());
    for (key, entry) in writer.cache().iter() {
        assert_eq!(*key, hash_text_pair(&entry.original, &entry.generated));
        assert_eq!(loaded.get(&entry.original, &entry.generated), Some(&entry.image));
    }
}

#[test]
fn test_separator_like_text_does_not_collide() {
    let dir = TempDir::new().unwrap();
    let store = CacheStore::new(dir.path().join("store.rkyv"), "vitc_document");
    let mut cache = ImageCache::new();
    let mut left = Image::zeros(3, 1, 1);
    left.set(0, 0, 0, 1.0);
    let mut right = Image::zeros(3, 1, 1);
    right.set(1, 0, 0, 1.0);
    cache.insert("first half;;", "second half", left.clone());
    cache.insert("first half", ";;second half", right.clone());

    store.save(&cache).unwrap();
    let loaded = store.load().unwrap().unwrap();

    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded.get("first half;;", "second half"), Some(&left));
    assert_eq!(loaded.get("first half", ";;second half"), Some(&right));
}

#[test]
fn test_saving_twice_replaces_store() {
    let dir = TempDir::new().unwrap();
    let mut writer = imager(&dir, "document", MockPredictor::hashed());
    writer.build_image(DOCUMENT, SUMMARY).unwrap();
    writer.save_cache().unwrap();
    writer.build_image(DOCUMENT, SHORT_SUMMARY).unwrap();
    writer.save_cache().unwrap();

    let mut reader = imager(&dir, "document", MockPredictor::hashed());

    assert_eq!(reader.load_cache().unwrap(), 2);
    assert!(!dir.path().join("cache_vitc_document.rkyv.tmp").exists());
}

#[test]
fn test_granularities_use_separate_stores() {
    let dir = TempDir::new().unwrap();
    let mut sentence = imager(&dir, "sentence", MockPredictor::hashed());
    sentence.build_image(REPORT, REPORT_SUMMARY).unwrap();
    sentence.save_cache().unwrap();

    let mut paragraph = imager(&dir, "paragraph", MockPredictor::hashed());

    assert_eq!(paragraph.load_cache().unwrap(), 0);
    assert!(dir.path().join("cache_vitc_sentence.rkyv").exists());
}

#[test]
fn test_truncated_store_fails_loudly() {
    let dir = TempDir::new().unwrap();
    let mut writer = imager(&dir, "sentence", MockPredictor::hashed());
    writer.build_image(REPORT, REPORT_SUMMARY).unwrap();
    writer.save_cache().unwrap();

    let path = dir.path().join("cache_vitc_sentence.rkyv");
    let bytes = std::fs::read(&path).unwrap();
    std::fs::write(&path, &bytes[..bytes.len() / 2]).unwrap();

    let mut reader = imager(&dir, "sentence", MockPredictor::hashed());
    let result = reader.load_cache();

    assert!(matches!(
        result,
        Err(ImagerError::Store(CacheStoreError::Corrupt { .. }))
    ));
    assert!(reader.cache().is_empty());
}
