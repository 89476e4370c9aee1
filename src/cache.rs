//! Output write cache for incremental builds.
//!
//! Composition is cheap, but rewriting every page on every build touches
//! every file in `dist/`, which defeats rsync-style deploys and file
//! watchers. This module lets the generate stage skip writing a page when
//! its composed HTML is identical to what the previous build wrote.
//!
//! ## Cache keys
//!
//! Entries are keyed by output path (`pt/about.html`) and store the SHA-256
//! of the composed HTML. A hit requires:
//! 1. An entry for the output path with the same content hash
//! 2. The previously-written file still exists on disk
//!
//! Hashing the composed output rather than the inputs means any change that
//! reaches the page (fragment edit, config change, project data) is picked
//! up without tracking dependencies.
//!
//! ## Storage
//!
//! The manifest is a JSON file at `<output_dir>/.build-cache.json`. It lives
//! alongside the pages so it travels with the output directory when cached
//! in CI.
//!
//! ## Bypassing the cache
//!
//! Pass `--no-cache` to the `build` or `generate` command to rewrite every
//! page. This starts from an empty manifest.

use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Name of the cache manifest file within the output directory.
const MANIFEST_FILENAME: &str = ".build-cache.json";

/// Version of the cache manifest format. Bump this to invalidate all
/// existing caches when the format or key computation changes.
const MANIFEST_VERSION: u32 = 1;

/// On-disk cache manifest mapping output paths to content hashes.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CacheManifest {
    pub version: u32,
    pub entries: HashMap<String, String>,
}

impl CacheManifest {
    /// Create an empty manifest (used for `--no-cache` or first build).
    pub fn empty() -> Self {
        Self {
            version: MANIFEST_VERSION,
            entries: HashMap::new(),
        }
    }

    /// Load from the output directory. Returns an empty manifest if the
    /// file doesn't exist or can't be parsed (version mismatch, corruption).
    pub fn load(output_dir: &Path) -> Self {
        let path = manifest_path(output_dir);
        let Ok(content) = std::fs::read_to_string(&path) else {
            return Self::empty();
        };
        match serde_json::from_str::<Self>(&content) {
            Ok(m) if m.version == MANIFEST_VERSION => m,
            Ok(_) => {
                tracing::debug!("Cache manifest version changed, starting fresh");
                Self::empty()
            }
            Err(e) => {
                tracing::debug!(error = %e, "Unreadable cache manifest, starting fresh");
                Self::empty()
            }
        }
    }

    /// Save to the output directory.
    pub fn save(&self, output_dir: &Path) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(manifest_path(output_dir), json)
    }

    /// Whether `output_path` already holds content with this hash.
    pub fn is_fresh(&self, output_path: &str, content_hash: &str, output_dir: &Path) -> bool {
        self.entries
            .get(output_path)
            .is_some_and(|stored| stored == content_hash)
            && output_dir.join(output_path).exists()
    }

    pub fn insert(&mut self, output_path: String, content_hash: String) {
        self.entries.insert(output_path, content_hash);
    }

    /// Drop entries for pages that were not produced by this build.
    pub fn retain_paths<'a>(&mut self, paths: impl IntoIterator<Item = &'a str>) {
        let keep: std::collections::HashSet<&str> = paths.into_iter().collect();
        self.entries.retain(|path, _| keep.contains(path.as_str()));
    }
}

/// SHA-256 of a string, returned as a hex string.
pub fn hash_content(content: &str) -> String {
    let digest = Sha256::digest(content.as_bytes());
    format!("{:x}", digest)
}

/// Summary of cache performance for a build run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub unchanged: u32,
    pub written: u32,
}

impl CacheStats {
    pub fn hit(&mut self) {
        self.unchanged += 1;
    }

    pub fn miss(&mut self) {
        self.written += 1;
    }

    pub fn total(&self) -> u32 {
        self.unchanged + self.written
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.unchanged > 0 {
            write!(
                f,
                "{} unchanged, {} written ({} total)",
                self.unchanged,
                self.written,
                self.total()
            )
        } else {
            write!(f, "{} written", self.written)
        }
    }
}

/// Resolve the cache manifest path for an output directory.
pub fn manifest_path(output_dir: &Path) -> PathBuf {
    output_dir.join(MANIFEST_FILENAME)
}
