// Cache path utilities.
// The repository cache lives in a fixed file under `.cache` in the working directory.

use std::path::{Path, PathBuf};

/// Directory holding cache files, relative to the working directory.
pub const CACHE_DIR_NAME: &str = ".cache";

/// File name of the repository metadata cache.
pub const CACHE_FILE_NAME: &str = "github-repos.json";

/// Cache directory under the given base directory.
pub fn cache_dir_in(base: &Path) -> PathBuf {
    base.join(CACHE_DIR_NAME)
}

/// Repository cache file under the given base directory.
pub fn cache_file_in(base: &Path) -> PathBuf {
    cache_dir_in(base).join(CACHE_FILE_NAME)
}

/// Default cache file path (`.cache/github-repos.json`), relative to the working directory.
pub fn default_cache_file() -> PathBuf {
    cache_file_in(Path::new("."))
}
