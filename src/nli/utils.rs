use std::io;
use std::path::Path;
use tokenizers::{PaddingParams, PaddingStrategy, Tokenizer, TruncationParams, TruncationStrategy};

/// Loads a tokenizer from a model directory or explicit tokenizer.json path.
pub fn load_tokenizer(model_path: &Path) -> io::Result<Tokenizer> {
    let tokenizer_path = if model_path
        .file_name()
        .is_some_and(|name| name == std::ffi::OsStr::new("tokenizer.json"))
    {
        model_path.to_path_buf()
    } else if model_path.is_dir() {
        model_path.join("tokenizer.json")
    } else {
        model_path
            .parent()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "Model path has no parent"))?
            .join("tokenizer.json")
    };

    Tokenizer::from_file(&tokenizer_path).map_err(io::Error::other)
}

/// Loads a tokenizer for batched premise/hypothesis encoding.
///
/// Batches are padded to their longest member. Pairs longer than `max_len`
/// tokens lose tokens from the premise only; the hypothesis is kept whole.
pub fn load_pair_tokenizer(model_path: &Path, max_len: usize) -> io::Result<Tokenizer> {
    let mut tokenizer = load_tokenizer(model_path)?;

    let truncation = TruncationParams {
        max_length: max_len,
        strategy: TruncationStrategy::OnlyFirst,
        ..Default::default()
    };

    tokenizer
        .with_truncation(Some(truncation))
        .map_err(|e| io::Error::other(format!("Failed to configure truncation: {}", e)))?;

    let padding = match tokenizer.get_padding() {
        Some(existing) => PaddingParams {
            strategy: PaddingStrategy::BatchLongest,
            ..existing.clone()
        },
        None => {
            let (pad_id, pad_token) = ["<pad>", "[PAD]"]
                .iter()
                .find_map(|tok| tokenizer.token_to_id(tok).map(|id| (id, tok.to_string())))
                .unwrap_or((0, "[PAD]".to_string()));
            PaddingParams {
                pad_id,
                pad_token,
                ..Default::default()
            }
        }
    };
    tokenizer.with_padding(Some(padding));

    Ok(tokenizer)
}
