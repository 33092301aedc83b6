//! Shared texts and builders for integration tests.

use std::path::Path;

use consistency::nli::MockPredictor;
use consistency::scoring::{ZeroShotConfig, ZeroShotScorer};

pub const DOCUMENT: &str =
    "Jeff joined Microsoft in 1992 to lead corporate developer evangelism for Windows NT.";
pub const SUMMARY: &str = "Jeff joined Microsoft in 1992.";
pub const SHORT_SUMMARY: &str = "Jeff joined Microsoft.";

pub const REPORT: &str = "The city council approved the new transit plan on Tuesday. \
    The plan adds three bus routes in the northern districts. \
    Funding comes from a regional infrastructure grant.\n\n\
    Construction is expected to begin next spring. \
    Officials said fares will not change during the first year.";

pub const REPORT_SUMMARY: &str = "The council approved a transit plan with three new bus routes. \
    Fares will rise immediately. \
    Work starts next spring.";

/// Fixed raw distribution in `vitc` index order (entailment, contradiction, neutral).
pub fn constant_predictor(probs: [f32; 3]) -> MockPredictor {
    MockPredictor::scripted(move |_, _| probs)
}

/// Entails units sharing a keyword with the premise, contradicts units mentioning fares rising.
pub fn keyword_predictor() -> MockPredictor {
    MockPredictor::scripted(|premise, hypothesis| {
        let premise = premise.to_lowercase();
        let hypothesis = hypothesis.to_lowercase();
        if hypothesis.contains("rise") && premise.contains("fares") {
            [0.05, 0.9, 0.05]
        } else if ["bus", "spring", "council"]
            .iter()
            .any(|k| premise.contains(k) && hypothesis.contains(k))
        {
            [0.85, 0.05, 0.1]
        } else {
            [0.2, 0.1, 0.7]
        }
    })
}

pub fn zero_shot_config(model: &str, granularity: &str, cache_dir: &Path) -> ZeroShotConfig {
    let mut config = ZeroShotConfig::new(model, granularity).expect("valid zero-shot config");
    config.imager.cache_dir = cache_dir.to_path_buf();
    config
}

pub fn zero_shot(config: ZeroShotConfig, predictor: MockPredictor) -> ZeroShotScorer {
    ZeroShotScorer::with_predictor(config, Box::new(predictor)).expect("scorer")
}
