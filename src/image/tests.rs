use super::*;

fn sample_image() -> Image {
    // 3 planes, 2 rows, 2 cols
    let data = vec![
        0.7, 0.1, 0.2, 0.3, // entailment
        0.2, 0.8, 0.3, 0.3, // contradiction
        0.1, 0.1, 0.5, 0.4, // neutral
    ];
    Image::from_vec(3, 2, 2, data).expect("valid shape")
}

#[test]
fn test_degenerate_shape() {
    let image = Image::degenerate();

    assert_eq!(image.shape(), (3, 1, 1));
    assert!(image.is_degenerate());
    assert!(!image.is_simplex());
}

#[test]
fn test_from_vec_rejects_wrong_length() {
    let result = Image::from_vec(3, 2, 2, vec![0.0; 11]);

    assert_eq!(
        result,
        Err(ImageError::DataLength {
            depth: 3,
            rows: 2,
            cols: 2,
            actual: 11
        })
    );
}

#[test]
fn test_from_vec_rejects_overflowing_shape() {
    let huge = u32::MAX as usize;
    let result = Image::from_vec(huge, huge, huge, vec![0.5]);

    assert!(matches!(
        result,
        Err(ImageError::DataLength { actual: 1, .. })
    ));
}

#[test]
fn test_get_set_indexing() {
    let mut image = Image::zeros(3, 2, 4);
    image.set(1, 1, 3, 0.5);

    assert_eq!(image.get(1, 1, 3), 0.5);
    assert_eq!(image.as_slice().iter().filter(|&&v| v != 0.0).count(), 1);
    assert_eq!(image.as_slice()[(1 * 2 + 1) * 4 + 3], 0.5);
}

#[test]
fn test_column_iterates_rows() {
    let image = sample_image();

    let col: Vec<f32> = image.column(0, 1).collect();

    assert_eq!(col, vec![0.1, 0.3]);
}

#[test]
fn test_is_simplex() {
    assert!(sample_image().is_simplex());

    let mut broken = sample_image();
    broken.set(0, 0, 0, 0.9);
    assert!(!broken.is_simplex());
}

#[test]
fn test_truncate_rows() {
    let image = sample_image();

    let truncated = image.truncate_rows(1);

    assert_eq!(truncated.shape(), (3, 1, 2));
    assert_eq!(truncated.as_slice(), &[0.7, 0.1, 0.2, 0.8, 0.1, 0.1]);
}

#[test]
fn test_truncate_rows_noop_when_small() {
    let image = sample_image();

    assert_eq!(image.truncate_rows(5), image);
}

#[test]
fn test_stack_concatenates_depth() {
    let a = sample_image();
    let b = Image::zeros(3, 2, 2);

    let stacked = Image::stack(&[a.clone(), b]).expect("same shape");

    assert_eq!(stacked.shape(), (6, 2, 2));
    assert_eq!(stacked.get(0, 0, 0), a.get(0, 0, 0));
    assert_eq!(stacked.get(3, 0, 0), 0.0);
}

#[test]
fn test_stack_rejects_shape_mismatch() {
    let result = Image::stack(&[sample_image(), Image::degenerate()]);

    assert!(matches!(result, Err(ImageError::ShapeMismatch { .. })));
    assert_eq!(Image::stack(&[]), Err(ImageError::Empty));
}
