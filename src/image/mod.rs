//! Per-unit-pair NLI probability cubes.
//!
//! An [`Image`] is a `depth × rows × cols` array of `f32` stored plane-major.
//! A single-model image has depth 3 with planes in [`NliLabel`](crate::nli::NliLabel)
//! order (entailment, contradiction, neutral); rows index source-document units
//! and columns index generated units. Stacking images from several models
//! along the depth axis yields depth `3 × models`.

mod error;

#[cfg(test)]
mod tests;

pub use error::ImageError;

use crate::constants::{NLI_CLASSES, SIMPLEX_TOLERANCE};

#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    depth: usize,
    rows: usize,
    cols: usize,
    data: Vec<f32>,
}

impl Image {
    /// Zero-filled image of the given shape.
    pub fn zeros(depth: usize, rows: usize, cols: usize) -> Self {
        Self {
            depth,
            rows,
            cols,
            data: vec![0.0; depth * rows * cols],
        }
    }

    /// Image returned when either side of a pair has no units.
    pub fn degenerate() -> Self {
        Self::zeros(NLI_CLASSES, 1, 1)
    }

    /// Builds an image from plane-major data, checking the length.
    pub fn from_vec(
        depth: usize,
        rows: usize,
        cols: usize,
        data: Vec<f32>,
    ) -> Result<Self, ImageError> {
        let expected = depth.checked_mul(rows).and_then(|n| n.checked_mul(cols));
        if expected != Some(data.len()) {
            return Err(ImageError::DataLength {
                depth,
                rows,
                cols,
                actual: data.len(),
            });
        }
        Ok(Self {
            depth,
            rows,
            cols,
            data,
        })
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.depth, self.rows, self.cols)
    }

    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }

    #[inline]
    fn offset(&self, plane: usize, row: usize, col: usize) -> usize {
        debug_assert!(plane < self.depth && row < self.rows && col < self.cols);
        (plane * self.rows + row) * self.cols + col
    }

    #[inline]
    pub fn get(&self, plane: usize, row: usize, col: usize) -> f32 {
        self.data[self.offset(plane, row, col)]
    }

    #[inline]
    pub fn set(&mut self, plane: usize, row: usize, col: usize, value: f32) {
        let idx = self.offset(plane, row, col);
        self.data[idx] = value;
    }

    /// Values of one column of one plane, top to bottom.
    pub fn column(&self, plane: usize, col: usize) -> impl Iterator<Item = f32> + '_ {
        (0..self.rows).map(move |row| self.get(plane, row, col))
    }

    /// Copy keeping at most `max_rows` rows of every plane.
    pub fn truncate_rows(&self, max_rows: usize) -> Image {
        if self.rows <= max_rows {
            return self.clone();
        }

        let mut data = Vec::with_capacity(self.depth * max_rows * self.cols);
        let plane_len = self.rows * self.cols;
        for plane in self.data.chunks_exact(plane_len) {
            data.extend_from_slice(&plane[..max_rows * self.cols]);
        }

        Image {
            depth: self.depth,
            rows: max_rows,
            cols: self.cols,
            data,
        }
    }

    /// Stacks images along the depth axis; all must share rows and cols.
    pub fn stack(images: &[Image]) -> Result<Image, ImageError> {
        let first = images.first().ok_or(ImageError::Empty)?;

        if let Some(other) = images
            .iter()
            .find(|img| img.rows != first.rows || img.cols != first.cols)
        {
            return Err(ImageError::ShapeMismatch {
                left_rows: first.rows,
                left_cols: first.cols,
                right_rows: other.rows,
                right_cols: other.cols,
            });
        }

        let depth = images.iter().map(|img| img.depth).sum();
        let mut data = Vec::with_capacity(depth * first.rows * first.cols);
        for image in images {
            data.extend_from_slice(&image.data);
        }

        Ok(Image {
            depth,
            rows: first.rows,
            cols: first.cols,
            data,
        })
    }

    /// Returns `true` if every cell of every NLI triple sums to 1 within tolerance.
    ///
    /// Only meaningful for images whose depth is a multiple of three.
    pub fn is_simplex(&self) -> bool {
        if !self.depth.is_multiple_of(NLI_CLASSES) {
            return false;
        }
        (0..self.depth / NLI_CLASSES).all(|model| {
            let base = model * NLI_CLASSES;
            (0..self.rows).all(|row| {
                (0..self.cols).all(|col| {
                    let sum: f32 = (0..NLI_CLASSES)
                        .map(|label| self.get(base + label, row, col))
                        .sum();
                    (sum - 1.0).abs() <= SIMPLEX_TOLERANCE
                })
            })
        })
    }

    /// Returns `true` for the 1×1 all-zero image produced by empty inputs.
    pub fn is_degenerate(&self) -> bool {
        self.rows == 1 && self.cols == 1 && self.data.iter().all(|&v| v == 0.0)
    }
}
