//! Token estimation for bundle statistics

use std::sync::OnceLock;
use tiktoken_rs::CoreBPE;

/// Encoder shared across threads; `None` if it could not be built.
static BPE: OnceLock<Option<CoreBPE>> = OnceLock::new();

fn bpe() -> Option<&'static CoreBPE> {
    BPE.get_or_init(|| tiktoken_rs::cl100k_base().ok()).as_ref()
}

/// Build the encoder up front, before parallel work starts
pub fn warm_bpe() {
    let _ = bpe();
}

/// Estimate token count using tiktoken-rs
pub fn estimate_tokens(text: &str) -> usize {
    // Use cl100k_base encoding (GPT-4/Claude compatible)
    match bpe() {
        Some(bpe) => bpe.encode_with_special_tokens(text).len(),
        // Fallback: rough estimate of 4 chars per token
        None => text.len() / 4,
    }
}
