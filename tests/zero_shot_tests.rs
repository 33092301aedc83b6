//! End-to-end zero-shot scoring with a deterministic predictor.

mod common;

use common::fixtures::*;
use consistency::nli::MockPredictor;
use tempfile::TempDir;

#[test]
fn test_document_granularity_example() {
    let dir = TempDir::new().unwrap();
    let config = zero_shot_config("vitc", "document", dir.path());
    let mut scorer = zero_shot(config, constant_predictor([0.91, 0.02, 0.07]));

    let output = scorer.score(&[DOCUMENT], &[SUMMARY], 128).unwrap();

    assert_eq!(output.images[0].shape(), (3, 1, 1));
    assert!((output.scores[0] - (0.91 - 0.02)).abs() < 1e-6);
}

#[test]
fn test_short_summary_under_sentence_granularity() {
    let dir = TempDir::new().unwrap();
    let config = zero_shot_config("vitc", "sentence", dir.path());
    let predictor = MockPredictor::hashed();
    let mut scorer = zero_shot(config, predictor.clone());

    let output = scorer.score(&[DOCUMENT], &["Jeff."], 128).unwrap();

    assert!(output.images[0].is_degenerate());
    assert_eq!(output.scores[0], 0.0);
    assert_eq!(predictor.calls(), 0);
}

#[test]
fn test_contradicted_unit_lowers_min_score() {
    let dir = TempDir::new().unwrap();
    let config = zero_shot_config("vitc", "sentence", dir.path())
        .with_ops("max", "min")
        .unwrap();
    let mut scorer = zero_shot(config, keyword_predictor());

    let scored = scorer.score_one(REPORT, REPORT_SUMMARY).unwrap();

    assert_eq!(scored.image.shape(), (3, 5, 3));
    assert!(scored.image.is_simplex());
    // the fares sentence: max entailment 0.2, max contradiction 0.9
    assert!((scored.score - (0.2 - 0.9)).abs() < 1e-6);
}

#[test]
fn test_mixed_granularity_pairs() {
    let dir = TempDir::new().unwrap();
    let config = zero_shot_config("vitc", "paragraph-sentence", dir.path());
    let mut scorer = zero_shot(config, keyword_predictor());

    let scored = scorer.score_one(REPORT, REPORT_SUMMARY).unwrap();

    assert_eq!(scored.image.shape(), (3, 2, 3));
}

#[test]
fn test_bulk_matches_single_across_batch_sizes() {
    let sources = [REPORT, DOCUMENT, REPORT, DOCUMENT];
    let generateds = [REPORT_SUMMARY, SUMMARY, SHORT_SUMMARY, "Tiny"];

    let single_dir = TempDir::new().unwrap();
    let mut single = zero_shot(
        zero_shot_config("anli", "sentence", single_dir.path()),
        MockPredictor::hashed(),
    );
    let expected: Vec<f32> = sources
        .iter()
        .zip(&generateds)
        .map(|(s, g)| single.score_one(s, g).unwrap().score)
        .collect();

    for batch_size in [1, 2, 5, 128] {
        let dir = TempDir::new().unwrap();
        let mut bulk = zero_shot(
            zero_shot_config("anli", "sentence", dir.path()),
            MockPredictor::hashed(),
        );
        let output = bulk.score(&sources, &generateds, batch_size).unwrap();
        assert_eq!(output.scores, expected, "batch_size={batch_size}");
    }
}

#[test]
fn test_cache_persists_between_scorers() {
    let dir = TempDir::new().unwrap();
    let mut first = zero_shot(
        zero_shot_config("vitc", "sentence", dir.path()),
        keyword_predictor(),
    );
    let expected = first
        .score(&[REPORT, DOCUMENT], &[REPORT_SUMMARY, SUMMARY], 16)
        .unwrap();
    assert_eq!(first.save_imager_cache().unwrap(), 2);

    let predictor = MockPredictor::hashed();
    let mut second = zero_shot(
        zero_shot_config("vitc", "sentence", dir.path()),
        predictor.clone(),
    );
    let output = second
        .score(&[DOCUMENT, REPORT], &[SUMMARY, REPORT_SUMMARY], 16)
        .unwrap();

    assert_eq!(predictor.calls(), 0);
    assert_eq!(output.scores, vec![expected.scores[1], expected.scores[0]]);
    assert_eq!(output.images[1], expected.images[0]);
}

#[test]
fn test_unknown_options_fail_fast() {
    let dir = TempDir::new().unwrap();

    assert!(consistency::ZeroShotConfig::new("roberta-large", "sentence").is_err());
    assert!(consistency::ZeroShotConfig::new("vitc", "sentence-word").is_err());
    assert!(
        zero_shot_config("vitc", "sentence", dir.path())
            .with_ops("max", "median")
            .is_err()
    );
    assert!(
        zero_shot_config("vitc", "sentence", dir.path())
            .with_signals(false, false)
            .is_err()
    );
}
