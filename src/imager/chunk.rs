/// One cell of the unit cross-product for a document pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkPair<'a> {
    pub premise: &'a str,
    pub hypothesis: &'a str,
    pub doc_index: usize,
    pub gen_index: usize,
    /// Position of the owning document pair in a bulk request.
    pub pair_id: Option<usize>,
}

/// Chunked units of one `(original, generated)` pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnitGrid {
    pub document_units: Vec<String>,
    pub generated_units: Vec<String>,
}

impl UnitGrid {
    pub fn n_doc(&self) -> usize {
        self.document_units.len()
    }

    pub fn n_gen(&self) -> usize {
        self.generated_units.len()
    }

    /// `true` when there is no pair to score.
    pub fn is_empty(&self) -> bool {
        self.document_units.is_empty() || self.generated_units.is_empty()
    }

    /// Every `(document unit, generated unit)` cell, document-major.
    pub fn pairs(&self, pair_id: Option<usize>) -> impl Iterator<Item = ChunkPair<'_>> {
        self.document_units
            .iter()
            .enumerate()
            .flat_map(move |(doc_index, premise)| {
                self.generated_units
                    .iter()
                    .enumerate()
                    .map(move |(gen_index, hypothesis)| ChunkPair {
                        premise,
                        hypothesis,
                        doc_index,
                        gen_index,
                        pair_id,
                    })
            })
    }
}
