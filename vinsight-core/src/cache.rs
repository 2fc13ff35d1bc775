//! Incremental interface cache using SHA-256 change detection.
//!
//! Extracting an interface means running a dozen patterns over each file.
//! The cache keeps each file's extracted interface and imports keyed by its
//! content hash, so unchanged files skip extraction on the next run.
//!
//! - Parallel read/hash/extract via Rayon
//! - Read-once: file content is read once, then hashed and (on a miss) parsed
//! - Stored in `.vinsight/cache.json` with version metadata; an incompatible
//!   cache is discarded

use crate::channels::ComponentInterface;
use crate::component::{load_component, ComponentFile, ImportedComponent, SfcBlocks};
use crate::error::InsightError;
use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{info, warn};

/// Maximum cache file size (50MB).
const MAX_CACHE_SIZE_BYTES: usize = 50_000_000;

/// Current cache format version. Increment when the cache format changes.
const CACHE_VERSION: u32 = 1;

/// vinsight version for cache compatibility checking.
const VINSIGHT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Directory (under the project root) holding the cache.
pub const CACHE_DIR: &str = ".vinsight";

/// Cached extraction result for one file.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CachedComponent {
    pub hash: String,
    pub interface: ComponentInterface,
    #[serde(default)]
    pub imports: Vec<ImportedComponent>,
}

/// Cache metadata for version checking.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct CacheMetadata {
    pub cache_version: u32,
    pub vinsight_version: String,
    /// Seconds since the Unix epoch when the cache was written
    #[serde(default)]
    pub created_at: u64,
}

impl CacheMetadata {
    /// Metadata for the running binary.
    pub fn current() -> Self {
        let created_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        Self {
            cache_version: CACHE_VERSION,
            vinsight_version: VINSIGHT_VERSION.to_string(),
            created_at,
        }
    }

    /// Same cache format and same major version.
    pub fn is_compatible(&self) -> bool {
        if self.cache_version != CACHE_VERSION {
            return false;
        }

        let current_major = VINSIGHT_VERSION.split('.').next().unwrap_or("0");
        let cached_major = self.vinsight_version.split('.').next().unwrap_or("0");
        current_major == cached_major
    }
}

/// The full cache model, keyed by file path.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct InsightCache {
    #[serde(default)]
    pub metadata: CacheMetadata,
    pub components: HashMap<String, CachedComponent>,
}

#[inline]
fn hash_bytes(bytes: &[u8]) -> String {
    let mut sha = Sha256::new();
    sha.update(bytes);
    format!("{:x}", sha.finalize())
}

/// SHA-256 hash of a file's content.
pub fn file_hash(path: &Path) -> Result<String> {
    let bytes =
        fs::read(path).with_context(|| format!("Failed to read {} for hashing", path.display()))?;
    Ok(hash_bytes(&bytes))
}

fn cache_path(root: &Path) -> PathBuf {
    root.join(CACHE_DIR).join("cache.json")
}

/// Load the cache from `.vinsight/cache.json`.
///
/// Returns `None` if the file is missing, corrupted, or incompatible.
pub fn load_cache(root: &Path) -> Option<InsightCache> {
    let path = cache_path(root);
    if !path.exists() {
        return None;
    }

    let text = fs::read_to_string(&path).ok()?;
    let cache: InsightCache = serde_json::from_str(&text).ok()?;

    if !cache.metadata.is_compatible() {
        info!(
            cached_version = cache.metadata.cache_version,
            cached_by = %cache.metadata.vinsight_version,
            "cache version mismatch, rebuilding"
        );
        let _ = fs::remove_file(&path);
        return None;
    }

    Some(cache)
}

/// Save the cache to disk with a temp-file + rename so readers never see a
/// partial file.
pub fn save_cache(root: &Path, cache: &InsightCache) -> Result<()> {
    let dir = root.join(CACHE_DIR);
    if !dir.exists() {
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create cache dir: {}", dir.display()))?;
    }

    let path = dir.join("cache.json");
    let json = serde_json::to_string_pretty(cache)?;

    if json.len() > MAX_CACHE_SIZE_BYTES {
        let _ = fs::remove_file(&path);
        return Err(InsightError::cache(
            &path,
            format!("exceeds {} MB limit", MAX_CACHE_SIZE_BYTES / 1_000_000),
        )
        .into());
    }

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let temp_path = dir.join(format!("cache.json.{}.{}.tmp", std::process::id(), nanos));

    fs::write(&temp_path, &json)
        .with_context(|| format!("Failed to write temp cache file: {}", temp_path.display()))?;

    fs::rename(&temp_path, &path).with_context(|| {
        let _ = fs::remove_file(&temp_path);
        format!("Failed to rename cache file to: {}", path.display())
    })?;

    Ok(())
}

/// Read, hash and (on a cache miss) extract one file.
fn process_file(file: &Path, old_cache: Option<&InsightCache>) -> Option<(ComponentFile, CachedComponent)> {
    let content = match fs::read_to_string(file) {
        Ok(c) => c,
        Err(e) => {
            warn!(file = %file.display(), error = %e, "read error, skipping");
            return None;
        }
    };

    let hash = hash_bytes(content.as_bytes());
    let key = file.to_string_lossy();

    if let Some(cached) = old_cache.and_then(|c| c.components.get(key.as_ref())) {
        if cached.hash == hash {
            let blocks = SfcBlocks::parse(&content);
            let component = ComponentFile {
                interface: cached.interface.clone(),
                imports: cached.imports.clone(),
                template: blocks.template_str().to_string(),
            };
            return Some((component, cached.clone()));
        }
    }

    match load_component(file, &content) {
        Ok(component) => {
            let entry = CachedComponent {
                hash,
                interface: component.interface.clone(),
                imports: component.imports.clone(),
            };
            Some((component, entry))
        }
        Err(e) => {
            warn!(file = %file.display(), error = %e, "interface extraction failed, skipping");
            None
        }
    }
}

/// Load every file without consulting or writing the cache.
///
/// Files that cannot be read or parsed are logged and skipped. Output order
/// follows `files`.
pub fn load_components(files: &[PathBuf]) -> Vec<ComponentFile> {
    files
        .par_iter()
        .filter_map(|file| process_file(file, None).map(|(component, _)| component))
        .collect()
}

/// Load every file, reusing cached extraction results for unchanged files,
/// then write the refreshed cache (best effort).
pub fn incremental_parse(
    root: &Path,
    files: &[PathBuf],
    old_cache: Option<InsightCache>,
) -> Vec<ComponentFile> {
    let results: Vec<(ComponentFile, CachedComponent)> = files
        .par_iter()
        .filter_map(|file| process_file(file, old_cache.as_ref()))
        .collect();

    let mut new_cache = InsightCache {
        metadata: CacheMetadata::current(),
        components: HashMap::with_capacity(results.len()),
    };
    let mut components = Vec::with_capacity(results.len());

    for (component, entry) in results {
        new_cache
            .components
            .insert(component.path().to_string_lossy().to_string(), entry);
        components.push(component);
    }

    if let Err(e) = save_cache(root, &new_cache) {
        warn!(error = %e, "cache save failed");
    }

    components
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir()
            .join("vinsight_cache_test")
            .join(format!("{}_{}", name, std::process::id()));
        if dir.exists() {
            fs::remove_dir_all(&dir).ok();
        }
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_file_hash_deterministic() {
        let dir = create_temp_dir("hash");
        let file = dir.join("Btn.vue");
        fs::write(&file, "<template><button /></template>").unwrap();

        let hash1 = file_hash(&file).unwrap();
        let hash2 = file_hash(&file).unwrap();
        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);

        fs::write(&file, "<template><a /></template>").unwrap();
        assert_ne!(hash1, file_hash(&file).unwrap());

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_cache_save_load() {
        let dir = create_temp_dir("save_load");
        let mut cache = InsightCache {
            metadata: CacheMetadata::current(),
            components: HashMap::new(),
        };
        cache.components.insert(
            "/app/Btn.vue".to_string(),
            CachedComponent {
                hash: "abc123".to_string(),
                interface: ComponentInterface {
                    name: "Btn".to_string(),
                    full_path: PathBuf::from("/app/Btn.vue"),
                    props: vec![crate::channels::Prop::new("label")],
                    events: vec![],
                    slots: vec![],
                },
                imports: vec![],
            },
        );

        save_cache(&dir, &cache).unwrap();
        let loaded = load_cache(&dir).unwrap();
        assert_eq!(loaded.components["/app/Btn.vue"].hash, "abc123");
        assert_eq!(loaded.components["/app/Btn.vue"].interface.props[0].name, "label");

        // No temp files left behind.
        let leftovers = fs::read_dir(dir.join(CACHE_DIR))
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .count();
        assert_eq!(leftovers, 0);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_cache_missing_or_corrupted() {
        let dir = create_temp_dir("corrupted");
        assert!(load_cache(&dir).is_none());

        fs::create_dir_all(dir.join(CACHE_DIR)).unwrap();
        fs::write(cache_path(&dir), "{ not json").unwrap();
        assert!(load_cache(&dir).is_none());

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_incompatible_cache_is_discarded() {
        let dir = create_temp_dir("incompatible");
        let cache = InsightCache {
            metadata: CacheMetadata {
                cache_version: CACHE_VERSION + 1,
                vinsight_version: VINSIGHT_VERSION.to_string(),
                created_at: 0,
            },
            components: HashMap::new(),
        };
        save_cache(&dir, &cache).unwrap();

        assert!(load_cache(&dir).is_none());
        assert!(!cache_path(&dir).exists());

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_incremental_parse_cache_hit_and_invalidation() {
        let dir = create_temp_dir("incremental");
        let file = dir.join("Btn.vue");
        fs::write(&file, "<script setup>defineProps(['label'])</script>").unwrap();
        let files = vec![file.clone()];

        let first = incremental_parse(&dir, &files, None);
        assert_eq!(first[0].interface.props.len(), 1);
        let cache = load_cache(&dir).unwrap();
        assert!(cache.components.contains_key(file.to_string_lossy().as_ref()));

        // Poison the cached interface: a hash hit must reuse it untouched.
        let mut poisoned = cache.clone();
        for entry in poisoned.components.values_mut() {
            entry.interface.props.clear();
        }
        let hit = incremental_parse(&dir, &files, Some(poisoned.clone()));
        assert!(hit[0].interface.props.is_empty());

        // A content change invalidates the entry.
        fs::write(&file, "<script setup>defineProps(['label', 'size'])</script>").unwrap();
        let miss = incremental_parse(&dir, &files, Some(poisoned));
        assert_eq!(miss[0].interface.props.len(), 2);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_unparsable_files_are_skipped() {
        let dir = create_temp_dir("skipped");
        let good = dir.join("Good.vue");
        let bad = dir.join("Bad.vue");
        fs::write(&good, "<template><slot /></template>").unwrap();
        fs::write(&bad, "not a component").unwrap();

        let loaded = load_components(&[good.clone(), bad, dir.join("Missing.vue")]);
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].path(), good.as_path());

        fs::remove_dir_all(&dir).ok();
    }
}
