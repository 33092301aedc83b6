use super::*;
use crate::config::ConfigError;
use crate::nli::NliLabel;

fn simplex_image(rows: usize, cols: usize, seed: u32) -> Image {
    let mut image = Image::zeros(3, rows, cols);
    for r in 0..rows {
        for c in 0..cols {
            let e = ((r as u32 * 7 + c as u32 * 13 + seed) % 10) as f32 / 10.0;
            let k = (1.0 - e) / 2.0;
            image.set(0, r, c, e);
            image.set(1, r, c, k);
            image.set(2, r, c, 1.0 - e - k);
        }
    }
    image
}

#[test]
fn test_even_edges() {
    let bins: BinEdges = "even4".parse().unwrap();

    assert_eq!(bins.edges(), &[0.0, 0.25, 0.5, 0.75, 1.0]);
    assert_eq!(bins.n_bins(), 4);
    assert_eq!(bins.to_string(), "even4");
}

#[test]
fn test_percentile_edges() {
    let bins: BinEdges = "percentile".parse().unwrap();

    assert_eq!(bins.n_bins(), 23);
    assert_eq!(bins.edges()[0], 0.0);
    assert_eq!(bins.edges()[23], 1.0);
    assert_eq!(bins.to_string(), "percentile");
}

#[test]
fn test_invalid_bins() {
    for value in ["even", "even0", "evenx", "percentiles", "uniform50", ""] {
        assert!(
            matches!(
                value.parse::<BinEdges>(),
                Err(ConfigError::InvalidBins { .. })
            ),
            "{value} should be rejected"
        );
    }
}

#[test]
fn test_bin_boundaries() {
    let bins = BinEdges::even(4).unwrap();

    assert_eq!(bins.bin_of(0.0), Some(0));
    assert_eq!(bins.bin_of(0.2499), Some(0));
    assert_eq!(bins.bin_of(0.25), Some(1));
    assert_eq!(bins.bin_of(0.75), Some(3));
    assert_eq!(bins.bin_of(1.0), Some(3));
    assert_eq!(bins.bin_of(-0.01), None);
    assert_eq!(bins.bin_of(1.01), None);
    assert_eq!(bins.bin_of(f32::NAN), None);
}

#[test]
fn test_label_selection_parse() {
    let ec: LabelSelection = "ec".parse().unwrap();
    assert!(ec.contains(NliLabel::Entailment));
    assert!(ec.contains(NliLabel::Contradiction));
    assert!(!ec.contains(NliLabel::Neutral));
    assert_eq!(ec.len(), 2);
    assert_eq!(ec.to_string(), "ec");

    for value in ["e", "c", "n", "ec", "en", "cn", "ecn"] {
        let selection: LabelSelection = value.parse().unwrap();
        assert_eq!(selection.to_string(), value);
    }

    for value in ["ce", "x", "", "eccn"] {
        assert!(matches!(
            value.parse::<LabelSelection>(),
            Err(ConfigError::InvalidNliLabels { .. })
        ));
    }
}

#[test]
fn test_selects_planes_across_models() {
    let selection: LabelSelection = "cn".parse().unwrap();
    let planes: Vec<usize> = (0..6).filter(|&p| selection.selects_plane(p)).collect();

    assert_eq!(planes, vec![1, 2, 4, 5]);
}

#[test]
fn test_row_counts_sum_to_document_units() {
    let binner = HistogramBinner::new(BinEdges::even(5).unwrap(), "ecn".parse().unwrap());
    let image = simplex_image(7, 4, 3);

    let matrix = binner.compute(&image);

    assert_eq!(matrix.rows(), 10);
    assert_eq!(matrix.width(), 15);
    for i in 0..4 {
        for label in 0..3 {
            let sum: f32 = matrix.row(i)[label * 5..(label + 1) * 5].iter().sum();
            assert_eq!(sum, 7.0, "row {i} label {label}");
        }
    }
    assert_eq!(matrix.effective_len(), 4);
}

#[test]
fn test_counts_land_in_expected_bins() {
    let binner = HistogramBinner::new(BinEdges::even(2).unwrap(), "e".parse().unwrap());
    let mut image = Image::zeros(3, 3, 1);
    image.set(0, 0, 0, 0.1);
    image.set(0, 1, 0, 0.6);
    image.set(0, 2, 0, 1.0);

    let matrix = binner.compute(&image);

    assert_eq!(matrix.width(), 2);
    assert_eq!(matrix.row(0), &[1.0, 2.0]);
    assert_eq!(matrix.row(1), &[0.0, 0.0]);
}

#[test]
fn test_padding_rows_are_zero() {
    let binner =
        HistogramBinner::new(BinEdges::percentile(), "e".parse().unwrap()).with_rows(6);
    let image = simplex_image(2, 3, 1);

    let matrix = binner.compute(&image);

    assert_eq!(matrix.rows(), 6);
    assert_eq!(matrix.effective_len(), 3);
    for i in 3..6 {
        assert!(matrix.row(i).iter().all(|&v| v == 0.0));
    }
}

#[test]
fn test_truncates_to_n_rows() {
    let binner = HistogramBinner::new(BinEdges::even(4).unwrap(), "e".parse().unwrap());
    let image = simplex_image(3, 14, 5);

    let matrix = binner.compute(&image);

    assert_eq!(matrix.rows(), 10);
    assert_eq!(matrix.effective_len(), 10);

    // Only the first ten columns contribute.
    let mut changed = image.clone();
    for r in 0..3 {
        changed.set(0, r, 12, 0.99);
    }
    assert_eq!(binner.compute(&changed), matrix);
}

#[test]
fn test_stacked_models_width_and_order() {
    let binner = HistogramBinner::new(BinEdges::even(2).unwrap(), "e".parse().unwrap());
    let mut first = Image::zeros(3, 1, 1);
    first.set(0, 0, 0, 0.2);
    let mut second = Image::zeros(3, 1, 1);
    second.set(0, 0, 0, 0.9);
    let stacked = Image::stack(&[first, second]).unwrap();

    let matrix = binner.compute(&stacked);

    assert_eq!(matrix.width(), binner.width_for(2));
    assert_eq!(matrix.row(0), &[1.0, 0.0, 0.0, 1.0]);
}

#[test]
fn test_degenerate_image_has_one_real_row() {
    let binner = HistogramBinner::new(BinEdges::even(10).unwrap(), "ec".parse().unwrap());

    let matrix = binner.compute(&Image::degenerate());

    assert_eq!(matrix.effective_len(), 1);
    assert_eq!(matrix.row(0)[0], 1.0);
    assert_eq!(matrix.row(0)[10], 1.0);
}
