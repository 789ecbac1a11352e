//! Best-effort filesystem checks.
//!
//! The log may be processed long after (or far away from) the monitored run,
//! so the answer reflects the filesystem now, not then.

use std::path::Path;

/// Whether `path` currently names a directory.
///
/// Anything that cannot be determined (missing path, permission denied,
/// a path from another machine) counts as "not a directory".
pub fn is_directory(path: impl AsRef<Path>) -> bool {
    std::fs::metadata(path)
        .map(|meta| meta.is_dir())
        .unwrap_or(false)
}
