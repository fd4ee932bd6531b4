//! File discovery: expand sources into the list of files to bundle.

use crate::config::{Config, CONFIG_FILE_NAME};
use crate::error::CondenseError;
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Expand `sources` into files, in order.
///
/// Explicit file sources are taken as given. Directory sources are walked
/// recursively, honouring the directory, extension and ignore filters from
/// `config`; each walk is sorted by file name.
pub fn discover_files(sources: &[PathBuf], config: &Config) -> crate::Result<Vec<PathBuf>> {
    let ignore_set = build_ignore_set(&config.ignore.patterns)?;
    let mut files = Vec::new();

    for source in sources {
        if source.is_file() {
            files.push(source.clone());
        } else if source.is_dir() {
            let found = walk_dir(source, config, &ignore_set);
            debug!(source = %source.display(), files = found.len(), "walked source");
            files.extend(found);
        } else {
            return Err(CondenseError::SourceNotFound(source.clone()));
        }
    }

    Ok(files)
}

/// Walk one directory source using the ignore crate
fn walk_dir(root: &Path, config: &Config, ignore_set: &GlobSet) -> Vec<PathBuf> {
    let respect_gitignore = config.ignore.respect_gitignore;
    let filter = config.filter.clone();

    let mut builder = WalkBuilder::new(root);
    builder.hidden(false);
    builder.git_ignore(respect_gitignore);
    builder.git_global(respect_gitignore);
    builder.git_exclude(respect_gitignore);
    builder.parents(respect_gitignore);
    builder.sort_by_file_name(|a, b| a.cmp(b));
    builder.filter_entry(move |entry| {
        let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
        if !is_dir || entry.depth() == 0 {
            return true;
        }
        filter.accepts_dir(&entry.file_name().to_string_lossy())
    });

    let mut files = Vec::new();

    for entry in builder.build() {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                warn!(error = %err, "skipping unreadable entry");
                continue;
            }
        };

        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }

        if entry.file_name() == CONFIG_FILE_NAME {
            continue;
        }

        let path = entry.path();
        let relative = path.strip_prefix(root).unwrap_or(path);

        if ignore_set.is_match(relative) {
            continue;
        }

        if config.filter.accepts_file(path) {
            files.push(path.to_path_buf());
        }
    }

    files
}

/// Build glob matcher for custom ignore patterns
fn build_ignore_set(patterns: &[String]) -> crate::Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob_pattern = if pattern.contains('*') || pattern.contains('?') {
            pattern.clone()
        } else {
            format!("**/{}", pattern)
        };
        builder.add(Glob::new(&glob_pattern).map_err(|e| CondenseError::GlobPattern(e.to_string()))?);
        if let Ok(g) = Glob::new(&format!("**/{}/**", pattern)) {
            builder.add(g);
        }
    }
    builder
        .build()
        .map_err(|e| CondenseError::GlobPattern(e.to_string()))
}
