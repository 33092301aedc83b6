use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ImageError {
    #[error("image data length {actual} does not match shape {depth}x{rows}x{cols}")]
    DataLength {
        depth: usize,
        rows: usize,
        cols: usize,
        actual: usize,
    },

    #[error("cannot stack images of shape {left_rows}x{left_cols} and {right_rows}x{right_cols}")]
    ShapeMismatch {
        left_rows: usize,
        left_cols: usize,
        right_rows: usize,
        right_cols: usize,
    },

    #[error("cannot stack an empty list of images")]
    Empty,
}
