//! Image construction for one NLI model.
//!
//! An [`Imager`] chunks a `(original, generated)` text pair, scores every unit
//! pair with its [`NliPredictor`], and writes the probabilities into a
//! 3 × N × M [`Image`] (entailment, contradiction, neutral planes).
//!
//! # Cache
//!
//! Images are cached per Imager, keyed by a hash of the exact text pair. Entries
//! are stored untruncated; both [`Imager::build_image`] and
//! [`Imager::build_images`] slice cache hits to `max_doc_units` rows. The cache
//! lives in memory until [`Imager::save_cache`] writes it to
//! `<cache_dir>/cache_<model>_<granularity>.rkyv`.
//!
//! # Concurrency
//!
//! Building images mutates the cache, so every entry point takes `&mut self`.
//! Share an Imager across threads behind a lock.

mod cache;
mod chunk;
mod config;
mod error;
mod store;


pub use cache::{CachedImage, ImageCache};
pub use chunk::{ChunkPair, UnitGrid};
pub use config::ImagerConfig;
pub use error::{CacheStoreError, ImagerError, ImagerResult};
pub use store::{CACHE_STORE_VERSION, CacheRecord, CacheSnapshot, CacheStore};

use std::collections::HashMap;

use tracing::{debug, info};

use crate::chunking::TextChunker;
use crate::config::ConfigError;
use crate::constants::NLI_CLASSES;
use crate::image::Image;
use crate::nli::{CandleNliPredictor, ModelSpec, NliError, NliPredictor};

enum Slot {
    Cached(Image),
    Pending(usize),
}

pub struct Imager {
    config: ImagerConfig,
    chunker: TextChunker,
    predictor: Box<dyn NliPredictor>,
    cache: ImageCache,
    store: CacheStore,
}

impl std::fmt::Debug for Imager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Imager")
            .field("config", &self.config)
            .field("cached_images", &self.cache.len())
            .field("store", &self.store.path())
            .finish()
    }
}

impl Imager {
    /// Loads the configured model from `config.model_path`.
    pub fn load(config: ImagerConfig) -> ImagerResult<Self> {
        config.validate()?;

        let model_path = config
            .model_path
            .clone()
            .ok_or_else(|| NliError::ModelLoadFailed {
                reason: format!("no model path configured for '{}'", config.model.name()),
            })?;

        info!(
            model = config.model.name(),
            card = config.model.model_card(),
            granularity = %config.granularity,
            "Loading imager"
        );

        let predictor = CandleNliPredictor::load(&model_path)?;
        Self::with_predictor(config, Box::new(predictor))
    }

    /// Builds an Imager around an already-constructed predictor.
    pub fn with_predictor(
        config: ImagerConfig,
        predictor: Box<dyn NliPredictor>,
    ) -> ImagerResult<Self> {
        config.validate()?;
        let store = CacheStore::new(config.cache_file(), config.cache_scope());

        Ok(Self {
            config,
            chunker: TextChunker::default(),
            predictor,
            cache: ImageCache::new(),
            store,
        })
    }

    /// Replaces the text chunker (e.g. to plug in another sentence splitter).
    pub fn with_chunker(mut self, chunker: TextChunker) -> Self {
        self.chunker = chunker;
        self
    }

    pub fn config(&self) -> &ImagerConfig {
        &self.config
    }

    pub fn model(&self) -> &ModelSpec {
        &self.config.model
    }

    pub fn cache(&self) -> &ImageCache {
        &self.cache
    }

    pub fn store(&self) -> &CacheStore {
        &self.store
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Chunks both texts; document units are capped at `max_doc_units`.
    pub fn chunk(&self, original: &str, generated: &str) -> UnitGrid {
        let mut document_units = self
            .chunker
            .split(original, self.config.granularity.document);
        document_units.truncate(self.config.max_doc_units);
        let generated_units = self
            .chunker
            .split(generated, self.config.granularity.generated);

        UnitGrid {
            document_units,
            generated_units,
        }
    }

    /// Builds the image for one text pair, consulting and filling the cache.
    pub fn build_image(&mut self, original: &str, generated: &str) -> ImagerResult<Image> {
        if self.config.use_cache
            && let Some(image) = self.cache.get(original, generated)
        {
            debug!(model = self.config.model.name(), "Image cache hit");
            return Ok(image.truncate_rows(self.config.max_doc_units));
        }

        let grid = self.chunk(original, generated);
        let image = if grid.is_empty() {
            debug!(
                n_doc = grid.n_doc(),
                n_gen = grid.n_gen(),
                "No unit pairs to score, returning degenerate image"
            );
            Image::degenerate()
        } else {
            let pairs: Vec<ChunkPair<'_>> = grid.pairs(None).collect();
            let mut image = Image::zeros(NLI_CLASSES, grid.n_doc(), grid.n_gen());
            self.run_batches(&pairs, self.config.batch_size, |pair, probs| {
                write_cell(&mut image, pair, &probs)
            })?;
            image
        };

        if self.config.use_cache {
            self.cache.insert(original, generated, image.clone());
        }

        Ok(image)
    }

    /// Builds images for many text pairs, batching unit pairs across documents.
    ///
    /// Cached pairs are skipped, all remaining unit pairs are streamed through
    /// the predictor in `batch_size` chunks, and results are scattered back by
    /// pair id. The output matches calling [`Imager::build_image`] for each pair
    /// in order.
    pub fn build_images<S: AsRef<str>>(
        &mut self,
        originals: &[S],
        generateds: &[S],
        batch_size: usize,
    ) -> ImagerResult<Vec<Image>> {
        if originals.len() != generateds.len() {
            return Err(ImagerError::LengthMismatch {
                originals: originals.len(),
                generateds: generateds.len(),
            });
        }
        if batch_size == 0 {
            return Err(ConfigError::ZeroSize { name: "batch_size" }.into());
        }

        let max_rows = self.config.max_doc_units;
        let mut slots = Vec::with_capacity(originals.len());
        let mut pending: Vec<(&str, &str)> = Vec::new();
        let mut pending_ids: HashMap<(&str, &str), usize> = HashMap::new();

        for (original, generated) in originals.iter().zip(generateds) {
            let (original, generated) = (original.as_ref(), generated.as_ref());

            if self.config.use_cache
                && let Some(image) = self.cache.get(original, generated)
            {
                slots.push(Slot::Cached(image.truncate_rows(max_rows)));
                continue;
            }

            let id = *pending_ids.entry((original, generated)).or_insert_with(|| {
                pending.push((original, generated));
                pending.len() - 1
            });
            slots.push(Slot::Pending(id));
        }

        let grids: Vec<UnitGrid> = pending
            .iter()
            .map(|(original, generated)| self.chunk(original, generated))
            .collect();

        let mut todo_images: Vec<Image> = grids
            .iter()
            .map(|grid| {
                if grid.is_empty() {
                    Image::degenerate()
                } else {
                    Image::zeros(NLI_CLASSES, grid.n_doc(), grid.n_gen())
                }
            })
            .collect();

        let all_pairs: Vec<ChunkPair<'_>> = grids
            .iter()
            .enumerate()
            .filter(|(_, grid)| !grid.is_empty())
            .flat_map(|(id, grid)| grid.pairs(Some(id)))
            .collect();

        info!(
            model = self.config.model.name(),
            requested = originals.len(),
            cached = originals.len() - slots.iter().filter(|s| matches!(s, Slot::Pending(_))).count(),
            pending = pending.len(),
            unit_pairs = all_pairs.len(),
            batch_size,
            "Building images"
        );

        self.run_batches(&all_pairs, batch_size, |pair, probs| {
            if let Some(id) = pair.pair_id {
                write_cell(&mut todo_images[id], pair, &probs);
            }
        })?;

        if self.config.use_cache {
            for ((original, generated), image) in pending.iter().zip(&todo_images) {
                self.cache.insert(original, generated, image.clone());
            }
        }

        Ok(slots
            .into_iter()
            .map(|slot| match slot {
                Slot::Cached(image) => image,
                Slot::Pending(id) => todo_images[id].clone(),
            })
            .collect())
    }

    /// Persists the cache. Returns the number of images written.
    pub fn save_cache(&self) -> ImagerResult<usize> {
        Ok(self.store.save(&self.cache)?)
    }

    /// Merges the persisted cache into memory. A missing store is not an error.
    ///
    /// Returns the number of images loaded.
    pub fn load_cache(&mut self) -> ImagerResult<usize> {
        let Some(loaded) = self.store.load()? else {
            return Ok(0);
        };

        let count = loaded.len();
        for (key, entry) in loaded.into_entries() {
            self.cache.insert_entry(key, entry);
        }
        Ok(count)
    }

    fn run_batches<F>(
        &self,
        pairs: &[ChunkPair<'_>],
        batch_size: usize,
        mut sink: F,
    ) -> ImagerResult<()>
    where
        F: FnMut(&ChunkPair<'_>, [f32; NLI_CLASSES]),
    {
        let labels = *self.config.model.labels();

        for batch in pairs.chunks(batch_size) {
            let inputs: Vec<(&str, &str)> =
                batch.iter().map(|p| (p.premise, p.hypothesis)).collect();

            let probs = self.predictor.predict(&inputs)?;
            if probs.len() != batch.len() {
                return Err(NliError::InvalidOutput {
                    expected: batch.len(),
                    actual: probs.len(),
                }
                .into());
            }

            for (pair, raw) in batch.iter().zip(&probs) {
                sink(pair, labels.reorder(raw));
            }
        }

        Ok(())
    }
}

#[inline]
fn write_cell(image: &mut Image, pair: &ChunkPair<'_>, probs: &[f32; NLI_CLASSES]) {
    for (plane, &value) in probs.iter().enumerate() {
        image.set(plane, pair.doc_index, pair.gen_index, value);
    }
}
