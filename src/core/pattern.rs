use crate::utils::error::{IconError, Result};
use std::path::{Path, PathBuf};

/// Expands `pattern` (glob syntax, may contain wildcards) relative to `base`.
///
/// `base` is matched literally. Matches come back in whatever order the
/// matcher enumerates them; callers must not assume any further sorting.
pub fn paths_by_pattern(base: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let escaped_base = glob::Pattern::escape(&base.to_string_lossy());
    let full_pattern = Path::new(&escaped_base).join(pattern);
    let pattern_str = full_pattern.to_string_lossy();

    let entries = glob::glob(&pattern_str).map_err(|e| IconError::PatternError {
        pattern: pattern_str.to_string(),
        message: e.to_string(),
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| IconError::IoError(e.into_error()))?;
        paths.push(path);
    }
    Ok(paths)
}
