/// Fixed-shape `n_rows × width` histogram features, row-major.
///
/// Row `i` summarizes generated unit `i`; rows past the last real unit are
/// zero padding.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramMatrix {
    rows: usize,
    width: usize,
    data: Vec<f32>,
}

impl HistogramMatrix {
    pub fn zeros(rows: usize, width: usize) -> Self {
        Self {
            rows,
            width,
            data: vec![0.0; rows * width],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn row(&self, index: usize) -> &[f32] {
        &self.data[index * self.width..(index + 1) * self.width]
    }

    pub(crate) fn row_mut(&mut self, index: usize) -> &mut [f32] {
        &mut self.data[index * self.width..(index + 1) * self.width]
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }

    /// Number of rows with at least one non-zero count.
    pub fn effective_len(&self) -> usize {
        (0..self.rows)
            .filter(|&i| self.row(i).iter().sum::<f32>() != 0.0)
            .count()
    }
}
