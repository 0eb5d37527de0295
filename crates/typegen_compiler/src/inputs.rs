//! Input file discovery from a typegen.json project.

use crate::CompileError;
use std::path::{Path, PathBuf};
use typegen_options::TypegenConfig;

/// Resolve the input files of a project: the listed `files` first, then the
/// `include` globs in pattern order, each sorted, minus `exclude` matches.
/// Patterns are relative to `base_dir`; duplicates are dropped.
pub fn resolve_input_files(config: &TypegenConfig, base_dir: &Path) -> Result<Vec<String>, CompileError> {
    let mut files: Vec<String> = Vec::new();
    let mut push = |path: &Path| {
        let name = path.display().to_string();
        if !files.contains(&name) {
            files.push(name);
        }
    };

    for file in config.files.iter().flatten() {
        push(&base_dir.join(file));
    }

    let excludes = config
        .exclude
        .iter()
        .flatten()
        .map(|pattern| {
            glob::Pattern::new(pattern).map_err(|source| CompileError::Pattern {
                pattern: pattern.clone(),
                source,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    for pattern in config.include.iter().flatten() {
        let full = base_dir.join(pattern);
        let entries = glob::glob(&full.to_string_lossy()).map_err(|source| CompileError::Pattern {
            pattern: pattern.clone(),
            source,
        })?;
        let mut matched: Vec<PathBuf> = entries.filter_map(Result::ok).filter(|p| p.is_file()).collect();
        matched.sort();

        for path in matched {
            let relative = path.strip_prefix(base_dir).unwrap_or(&path);
            if excludes.iter().any(|exclude| exclude.matches_path(relative)) {
                tracing::trace!(path = %relative.display(), "excluded");
                continue;
            }
            push(&path);
        }
    }

    Ok(files)
}
