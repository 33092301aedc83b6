//! On-disk persistence for [`ImageCache`].
//!
//! The store is a single rkyv archive written atomically (temp file + rename)
//! and read back through a memory map, validated with bytecheck. Any record
//! that fails validation rejects the whole load.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use memmap2::Mmap;
use rkyv::rancor::Error as RkyvError;
use rkyv::{Archive, Deserialize, Serialize};
use tracing::{debug, info};

use super::cache::{CachedImage, ImageCache};
use super::error::CacheStoreError;
use crate::constants::NLI_CLASSES;
use crate::hashing::hash_text_pair;
use crate::image::Image;

/// Current on-disk format version.
pub const CACHE_STORE_VERSION: u32 = 1;

const TEMP_EXTENSION: &str = "rkyv.tmp";

#[derive(Archive, Deserialize, Serialize, Debug, PartialEq, Clone)]
pub struct CacheRecord {
    pub key: [u8; 32],
    pub original: String,
    pub generated: String,
    pub depth: u32,
    pub rows: u32,
    pub cols: u32,
    pub data: Vec<f32>,
}

#[derive(Archive, Deserialize, Serialize, Debug, PartialEq)]
pub struct CacheSnapshot {
    pub version: u32,
    pub scope: String,
    pub records: Vec<CacheRecord>,
}

/// File-backed store for one Imager's cache.
#[derive(Debug, Clone)]
pub struct CacheStore {
    path: PathBuf,
    scope: String,
}

impl CacheStore {
    pub fn new(path: PathBuf, scope: impl Into<String>) -> Self {
        Self {
            path,
            scope: scope.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes every entry of `cache`, replacing any previous store. Returns the record count.
    pub fn save(&self, cache: &ImageCache) -> Result<usize, CacheStoreError> {
        let mut records: Vec<CacheRecord> = cache
            .iter()
            .map(|(key, entry)| {
                let (depth, rows, cols) = entry.image.shape();
                Ok(CacheRecord {
                    key: *key,
                    original: entry.original.clone(),
                    generated: entry.generated.clone(),
                    depth: dim_to_u32(depth)?,
                    rows: dim_to_u32(rows)?,
                    cols: dim_to_u32(cols)?,
                    data: entry.image.as_slice().to_vec(),
                })
            })
            .collect::<Result<_, CacheStoreError>>()?;
        records.sort_by(|a, b| a.key.cmp(&b.key));

        let snapshot = CacheSnapshot {
            version: CACHE_STORE_VERSION,
            scope: self.scope.clone(),
            records,
        };

        let bytes = rkyv::to_bytes::<RkyvError>(&snapshot)
            .map_err(|e| CacheStoreError::Serialization(e.to_string()))?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let temp_path = self.path.with_extension(TEMP_EXTENSION);
        {
            let mut file = File::create(&temp_path)?;
            file.write_all(&bytes)?;
            file.sync_all()?;
        }
        fs::rename(&temp_path, &self.path)?;

        info!(
            path = %self.path.display(),
            records = snapshot.records.len(),
            bytes = bytes.len(),
            "Saved image cache"
        );

        Ok(snapshot.records.len())
    }

    /// Reads the store. A missing or empty file yields `Ok(None)`.
    pub fn load(&self) -> Result<Option<ImageCache>, CacheStoreError> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "No cache store yet");
            return Ok(None);
        }

        let file = File::open(&self.path)?;
        if file.metadata()?.len() == 0 {
            debug!(path = %self.path.display(), "Cache store is empty");
            return Ok(None);
        }

        // SAFETY: the file is only replaced by rename, never modified in place.
        let mmap = unsafe { Mmap::map(&file)? };

        let snapshot = rkyv::from_bytes::<CacheSnapshot, RkyvError>(&mmap).map_err(|e| {
            CacheStoreError::Corrupt {
                path: self.path.clone(),
                reason: e.to_string(),
            }
        })?;

        if snapshot.version != CACHE_STORE_VERSION {
            return Err(CacheStoreError::UnsupportedVersion {
                found: snapshot.version,
                expected: CACHE_STORE_VERSION,
            });
        }
        if snapshot.scope != self.scope {
            return Err(CacheStoreError::StoreMismatch {
                expected: self.scope.clone(),
                found: snapshot.scope,
            });
        }

        let mut cache = ImageCache::new();
        for (index, record) in snapshot.records.into_iter().enumerate() {
            let (key, entry) = validate_record(index, record)?;
            cache.insert_entry(key, entry);
        }

        info!(path = %self.path.display(), records = cache.len(), "Loaded image cache");

        Ok(Some(cache))
    }
}

fn validate_record(
    index: usize,
    record: CacheRecord,
) -> Result<([u8; 32], CachedImage), CacheStoreError> {
    let expected_key = hash_text_pair(&record.original, &record.generated);
    if expected_key != record.key {
        return Err(CacheStoreError::CorruptEntry {
            index,
            reason: "key does not match its texts".to_string(),
        });
    }

    let image = Image::from_vec(
        record.depth as usize,
        record.rows as usize,
        record.cols as usize,
        record.data,
    )
    .map_err(|e| CacheStoreError::CorruptEntry {
        index,
        reason: e.to_string(),
    })?;

    let corrupt = |reason: String| CacheStoreError::CorruptEntry { index, reason };

    if image.depth() != NLI_CLASSES {
        return Err(corrupt(format!(
            "depth {} is not {NLI_CLASSES}",
            image.depth()
        )));
    }
    if image.rows() == 0 || image.cols() == 0 {
        return Err(corrupt("image has no cells".to_string()));
    }
    if image
        .as_slice()
        .iter()
        .any(|v| !v.is_finite() || !(0.0..=1.0).contains(v))
    {
        return Err(corrupt("value outside [0, 1]".to_string()));
    }
    if !image.is_degenerate() && !image.is_simplex() {
        return Err(corrupt("cell probabilities do not sum to 1".to_string()));
    }

    Ok((
        record.key,
        CachedImage {
            original: record.original,
            generated: record.generated,
            image,
        },
    ))
}

fn dim_to_u32(dim: usize) -> Result<u32, CacheStoreError> {
    u32::try_from(dim)
        .map_err(|_| CacheStoreError::Serialization(format!("image dimension {dim} exceeds u32")))
}
