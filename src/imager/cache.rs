use std::collections::HashMap;

use tracing::warn;

use crate::hashing::{hash_text_pair, short_hex};
use crate::image::Image;

/// A cached image together with the exact texts it was computed from.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedImage {
    pub original: String,
    pub generated: String,
    pub image: Image,
}

/// In-memory image cache keyed by [`hash_text_pair`].
///
/// Entries keep their source texts so a hash collision is detected on lookup
/// (and treated as a miss) instead of returning another pair's image. Entries
/// are stored untruncated; callers slice rows on retrieval.
#[derive(Debug, Default, Clone)]
pub struct ImageCache {
    entries: HashMap<[u8; 32], CachedImage>,
}

impl ImageCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, original: &str, generated: &str) -> Option<&Image> {
        self.get_by_key(&hash_text_pair(original, generated), original, generated)
    }

    pub fn get_by_key(&self, key: &[u8; 32], original: &str, generated: &str) -> Option<&Image> {
        let entry = self.entries.get(key)?;
        if entry.original != original || entry.generated != generated {
            warn!(key = %short_hex(key), "Cache key collision, treating as miss");
            return None;
        }
        Some(&entry.image)
    }

    pub fn insert(&mut self, original: &str, generated: &str, image: Image) {
        let key = hash_text_pair(original, generated);
        self.insert_entry(
            key,
            CachedImage {
                original: original.to_string(),
                generated: generated.to_string(),
                image,
            },
        );
    }

    pub(crate) fn insert_entry(&mut self, key: [u8; 32], entry: CachedImage) {
        if let Some(previous) = self.entries.get(&key)
            && (previous.original != entry.original || previous.generated != entry.generated)
        {
            warn!(key = %short_hex(&key), "Cache key collision, replacing entry");
        }
        self.entries.insert(key, entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&[u8; 32], &CachedImage)> {
        self.entries.iter()
    }

    pub fn into_entries(self) -> impl Iterator<Item = ([u8; 32], CachedImage)> {
        self.entries.into_iter()
    }
}
