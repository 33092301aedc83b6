use tracing::{debug, info};

use crate::image::Image;
use crate::imager::Imager;
use crate::nli::{NliLabel, NliPredictor};

use super::config::ZeroShotConfig;
use super::error::ScoringError;
use super::types::{ScoredPair, ZeroShotOutput};

pub struct ZeroShotScorer {
    config: ZeroShotConfig,
    imager: Imager,
}

impl std::fmt::Debug for ZeroShotScorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZeroShotScorer")
            .field("op1", &self.config.op1)
            .field("op2", &self.config.op2)
            .field("combination", &self.config.combination)
            .field("imager", &self.imager)
            .finish()
    }
}

impl ZeroShotScorer {
    /// Loads the NLI model named in `config.imager`.
    pub fn load(config: ZeroShotConfig) -> Result<Self, ScoringError> {
        let imager = Imager::load(config.imager.clone())?;
        Self::from_imager(config, imager)
    }

    pub fn with_predictor(
        config: ZeroShotConfig,
        predictor: Box<dyn NliPredictor>,
    ) -> Result<Self, ScoringError> {
        let imager = Imager::with_predictor(config.imager.clone(), predictor)?;
        Self::from_imager(config, imager)
    }

    fn from_imager(config: ZeroShotConfig, mut imager: Imager) -> Result<Self, ScoringError> {
        if config.load_cache {
            let loaded = imager.load_cache()?;
            debug!(model = imager.model().name(), loaded, "Merged persisted image cache");
        }

        info!(
            model = imager.model().name(),
            granularity = %imager.config().granularity,
            op1 = %config.op1,
            op2 = %config.op2,
            combination = ?config.combination,
            "Zero-shot scorer ready"
        );

        Ok(Self { config, imager })
    }

    pub fn config(&self) -> &ZeroShotConfig {
        &self.config
    }

    pub fn imager(&self) -> &Imager {
        &self.imager
    }

    pub fn imager_mut(&mut self) -> &mut Imager {
        &mut self.imager
    }

    /// Collapses an image to one score.
    pub fn image_to_score(&self, image: &Image) -> f32 {
        let ZeroShotConfig {
            op1,
            op2,
            combination,
            ..
        } = self.config;

        let per_unit = (0..image.cols()).map(|col| {
            let entailment = op1.reduce(image.column(NliLabel::Entailment.plane(), col));
            let contradiction = op1.reduce(image.column(NliLabel::Contradiction.plane(), col));
            combination.combine(entailment, contradiction)
        });

        op2.reduce(per_unit)
    }

    pub fn score_one(&mut self, original: &str, generated: &str) -> Result<ScoredPair, ScoringError> {
        let image = self.imager.build_image(original, generated)?;
        let score = self.image_to_score(&image);
        Ok(ScoredPair { image, score })
    }

    /// Scores many pairs through the bulk image path.
    pub fn score<S: AsRef<str>>(
        &mut self,
        sources: &[S],
        generateds: &[S],
        batch_size: usize,
    ) -> Result<ZeroShotOutput, ScoringError> {
        let images = self.imager.build_images(sources, generateds, batch_size)?;
        let scores = images.iter().map(|image| self.image_to_score(image)).collect();

        Ok(ZeroShotOutput { scores, images })
    }

    /// Persists the Imager's cache. Returns the number of images written.
    pub fn save_imager_cache(&self) -> Result<usize, ScoringError> {
        Ok(self.imager.save_cache()?)
    }
}
