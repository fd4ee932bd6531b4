//! Bundle assembly: read, condense and label files into one text blob.

use crate::condense::condense;
use crate::config::Config;
use crate::tokens::{estimate_tokens, warm_bpe};
use rayon::prelude::*;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// One file included in the bundle
#[derive(Debug, Clone)]
pub struct BundleEntry {
    pub path: PathBuf,
    /// Whether the condenser ran on this file
    pub condensed: bool,
    pub original: String,
    pub content: String,
}

/// A file left out of the bundle, with the reason
#[derive(Debug, Clone, Serialize)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Files ready to be rendered, in discovery order
#[derive(Debug, Default)]
pub struct Bundle {
    pub entries: Vec<BundleEntry>,
    pub skipped: Vec<SkippedFile>,
}

/// Size accounting for a bundle, before and after condensing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BundleStats {
    pub files_included: usize,
    pub files_condensed: usize,
    pub files_skipped: usize,
    pub original_lines: usize,
    pub bundle_lines: usize,
    pub original_bytes: usize,
    pub bundle_bytes: usize,
    pub original_tokens: usize,
    pub bundle_tokens: usize,
}

impl BundleStats {
    /// Fraction of tokens removed (0.0 to 1.0)
    pub fn token_savings(&self) -> f64 {
        if self.original_tokens == 0 {
            return 0.0;
        }
        let diff = self.original_tokens as f64 - self.bundle_tokens as f64;
        (diff / self.original_tokens as f64).max(0.0)
    }
}

impl Bundle {
    /// Read and condense `files` in parallel; output keeps input order
    pub fn build(files: &[PathBuf], config: &Config) -> Self {
        let results: Vec<Result<BundleEntry, SkippedFile>> = files
            .par_iter()
            .map(|path| load_entry(path, config))
            .collect();

        let mut bundle = Bundle::default();
        for result in results {
            match result {
                Ok(entry) => bundle.entries.push(entry),
                Err(skipped) => {
                    warn!(path = %skipped.path.display(), reason = %skipped.reason, "skipping file");
                    bundle.skipped.push(skipped);
                }
            }
        }

        debug!(
            included = bundle.entries.len(),
            skipped = bundle.skipped.len(),
            "bundle built"
        );
        bundle
    }

    /// Labelled concatenation of every entry
    pub fn render(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            out.push_str(&render_entry(&entry.path, &entry.content));
        }
        out
    }

    /// Compute size statistics, including token estimates
    pub fn stats(&self) -> BundleStats {
        warm_bpe();

        let token_counts: Vec<(usize, usize)> = self
            .entries
            .par_iter()
            .map(|e| (estimate_tokens(&e.original), estimate_tokens(&e.content)))
            .collect();

        let mut stats = BundleStats {
            files_included: self.entries.len(),
            files_skipped: self.skipped.len(),
            ..Default::default()
        };
        for (entry, (original_tokens, bundle_tokens)) in self.entries.iter().zip(token_counts) {
            if entry.condensed {
                stats.files_condensed += 1;
            }
            stats.original_lines += entry.original.lines().count();
            stats.bundle_lines += entry.content.lines().count();
            stats.original_bytes += entry.original.len();
            stats.bundle_bytes += entry.content.len();
            stats.original_tokens += original_tokens;
            stats.bundle_tokens += bundle_tokens;
        }
        stats
    }
}

/// `# File: <path>` header, the content, then a blank separator line
fn render_entry(path: &Path, content: &str) -> String {
    format!("# File: {}\n{}\n\n", path.display(), content)
}

fn load_entry(path: &Path, config: &Config) -> Result<BundleEntry, SkippedFile> {
    let skip = |reason: String| SkippedFile {
        path: path.to_path_buf(),
        reason,
    };

    let size = fs::metadata(path).map_err(|e| skip(e.to_string()))?.len();
    if size > config.output.max_file_bytes {
        return Err(skip(format!(
            "{} bytes exceeds limit of {}",
            size, config.output.max_file_bytes
        )));
    }

    let bytes = fs::read(path).map_err(|e| skip(e.to_string()))?;
    let original = String::from_utf8(bytes).map_err(|_| skip("not valid UTF-8".to_string()))?;

    let condensed = config.condense.applies_to(path);
    let content = condense(&original, condensed);

    Ok(BundleEntry {
        path: path.to_path_buf(),
        condensed,
        original,
        content,
    })
}
