//! Histogram features over NLI images.
//!
//! Each generated-unit column of an image becomes one row: for every image
//! plane whose label is selected (planes cycle entailment, contradiction,
//! neutral per model), the column is binned with fixed [`BinEdges`] and the
//! per-plane counts are concatenated. Rows are padded with zeros or truncated
//! to `n_rows`.

mod bins;
mod labels;
mod matrix;

#[cfg(test)]
mod tests;

pub use bins::BinEdges;
pub use labels::LabelSelection;
pub use matrix::HistogramMatrix;

use crate::constants::DEFAULT_HISTOGRAM_ROWS;
use crate::image::Image;

#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBinner {
    edges: BinEdges,
    labels: LabelSelection,
    n_rows: usize,
}

impl HistogramBinner {
    pub fn new(edges: BinEdges, labels: LabelSelection) -> Self {
        Self {
            edges,
            labels,
            n_rows: DEFAULT_HISTOGRAM_ROWS,
        }
    }

    pub fn with_rows(mut self, n_rows: usize) -> Self {
        self.n_rows = n_rows;
        self
    }

    pub fn edges(&self) -> &BinEdges {
        &self.edges
    }

    pub fn labels(&self) -> &LabelSelection {
        &self.labels
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Row width for an image stacked from `n_models` models.
    pub fn width_for(&self, n_models: usize) -> usize {
        n_models * self.labels.len() * self.edges.n_bins()
    }

    /// Image planes read from an image of `depth` planes, in order.
    fn selected_planes(&self, depth: usize) -> impl Iterator<Item = usize> + '_ {
        (0..depth).filter(move |&plane| self.labels.selects_plane(plane))
    }

    pub fn compute(&self, image: &Image) -> HistogramMatrix {
        let n_bins = self.edges.n_bins();
        let planes: Vec<usize> = self.selected_planes(image.depth()).collect();
        let width = planes.len() * n_bins;
        let mut matrix = HistogramMatrix::zeros(self.n_rows, width);

        for col in 0..image.cols().min(self.n_rows) {
            let row = matrix.row_mut(col);
            for (slot, &plane) in planes.iter().enumerate() {
                let counts = &mut row[slot * n_bins..(slot + 1) * n_bins];
                self.edges.accumulate(image.column(plane, col), counts);
            }
        }

        matrix
    }
}
