//! Unpacked package loader
//!
//! Turns an unpacked H5P package directory into [`PackageFacts`]:
//!
//! - `h5p.json`: manifest
//! - `content/content.json`: root parameters
//! - `*/library.json`: library facts, with feature functions detected in the preloaded scripts
//! - every other file under `content/`: byte size as media facts
//!
//! An optional facts file adds media facts (dimensions, payload) and accessibility records.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use caretaker_core::error::{CaretakerError, PackageError};
use caretaker_rules::modules::features::QUESTION_TYPE_CONTRACT;
use caretaker_tree::facts::LibraryRef;
use caretaker_tree::{AccessibilityRecord, LibraryFacts, Manifest, MediaFacts, PackageFacts};

/// Extra facts supplied next to a package.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ExtraFacts {
    /// Path relative to `content/` -> media facts
    pub media: BTreeMap<String, MediaFacts>,
    /// Machine name -> accessibility evaluation
    pub accessibility: BTreeMap<String, AccessibilityRecord>,
}

/// Loads an unpacked package directory.
pub async fn load_package(
    dir: &Path,
    facts_file: Option<&Path>,
) -> Result<PackageFacts, CaretakerError> {
    let manifest = read_json(&dir.join("h5p.json")).await?;
    let params = read_json(&dir.join("content").join("content.json")).await?;

    let mut facts = PackageFacts::new(Manifest::from_value(&manifest), params);
    facts.libraries = load_libraries(dir, &facts.manifest).await?;
    facts.media = scan_media(&dir.join("content")).await?;

    if let Some(path) = facts_file {
        let extra: ExtraFacts = serde_json::from_value(read_json(path).await?).map_err(|e| {
            PackageError::ParseFailed {
                file: path.display().to_string(),
                reason: e.to_string(),
            }
        })?;
        merge_extra(&mut facts, extra);
    }

    info!(
        package = %dir.display(),
        libraries = facts.libraries.len(),
        media = facts.media.len(),
        "package loaded"
    );
    Ok(facts)
}

/// Adds extra facts; supplied values win over scanned ones.
pub fn merge_extra(facts: &mut PackageFacts, extra: ExtraFacts) {
    for (path, mut media) in extra.media {
        if let Some(scanned) = facts.media.remove(&path) {
            media.merge(scanned);
        }
        facts.media.insert(path, media);
    }
    facts.accessibility.extend(extra.accessibility);
}

async fn read_json(path: &Path) -> Result<Value, CaretakerError> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| PackageError::Unreadable {
            file: path.display().to_string(),
            reason: e.to_string(),
        })?;
    serde_json::from_str(&text).map_err(|e| {
        PackageError::ParseFailed {
            file: path.display().to_string(),
            reason: e.to_string(),
        }
        .into()
    })
}

/// Preference among several directories of one library: the version the manifest
/// declares, then the numerically highest `major.minor`.
type Rank = (bool, u32, u32);

fn rank(descriptor: &Value, manifest: &Manifest) -> Rank {
    match LibraryRef::from_value(descriptor) {
        Some(library) => (
            manifest.preloaded_dependencies.contains(&library),
            library.major_version,
            library.minor_version,
        ),
        None => (false, 0, 0),
    }
}

/// Reads `library.json` from every direct subdirectory, keyed by machine name.
///
/// When a package ships several versions of one library, the best [`Rank`] wins.
async fn load_libraries(
    dir: &Path,
    manifest: &Manifest,
) -> Result<BTreeMap<String, LibraryFacts>, CaretakerError> {
    let detector = FunctionDetector::new(&QUESTION_TYPE_CONTRACT);
    let mut libraries: BTreeMap<String, (Rank, LibraryFacts)> = BTreeMap::new();

    for library_dir in subdirectories(dir).await? {
        let descriptor = library_dir.join("library.json");
        if !tokio::fs::try_exists(&descriptor).await.unwrap_or(false) {
            continue;
        }
        let value = match read_json(&descriptor).await {
            Ok(value) => value,
            Err(e) => {
                warn!(path = %descriptor.display(), error = %e, "library descriptor skipped");
                continue;
            }
        };
        let Some(machine_name) = value.get("machineName").and_then(Value::as_str) else {
            warn!(path = %descriptor.display(), "library descriptor without machineName");
            continue;
        };
        let rank = rank(&value, manifest);
        if let Some((best, _)) = libraries.get(machine_name)
            && *best >= rank
        {
            debug!(path = %descriptor.display(), "other version of library preferred");
            continue;
        }

        let preloaded_js: Vec<String> = value
            .get("preloadedJs")
            .and_then(Value::as_array)
            .map(|files| {
                files
                    .iter()
                    .filter_map(|f| f.get("path").and_then(Value::as_str))
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default();

        let mut facts = LibraryFacts {
            runnable: flag(value.get("runnable")),
            metadata_disabled: flag(
                value
                    .get("metadataSettings")
                    .and_then(|settings| settings.get("disable")),
            ),
            ..LibraryFacts::default()
        };
        for script in &preloaded_js {
            match tokio::fs::read_to_string(library_dir.join(script)).await {
                Ok(source) => facts.functions.extend(detector.detect(&source)),
                Err(e) => debug!(script = %script, error = %e, "preloaded script unreadable"),
            }
        }
        facts.preloaded_js = preloaded_js;

        debug!(
            library = machine_name,
            functions = facts.functions.len(),
            "library facts loaded"
        );
        libraries.insert(machine_name.to_owned(), (rank, facts));
    }
    Ok(libraries
        .into_iter()
        .map(|(name, (_, facts))| (name, facts))
        .collect())
}

/// Byte sizes of every file under `content/` except `content.json`, keyed by relative path.
async fn scan_media(content_dir: &Path) -> Result<BTreeMap<String, MediaFacts>, CaretakerError> {
    let mut media = BTreeMap::new();
    let mut pending = vec![content_dir.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let mut entries = tokio::fs::read_dir(&dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let metadata = entry.metadata().await?;
            if metadata.is_dir() {
                pending.push(path);
                continue;
            }
            let Ok(relative) = path.strip_prefix(content_dir) else {
                continue;
            };
            let key = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            if key == "content.json" {
                continue;
            }
            media.insert(
                key,
                MediaFacts {
                    size: Some(metadata.len()),
                    ..MediaFacts::default()
                },
            );
        }
    }
    Ok(media)
}

async fn subdirectories(dir: &Path) -> Result<Vec<PathBuf>, CaretakerError> {
    let mut dirs = Vec::new();
    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        if entry.file_type().await?.is_dir() {
            dirs.push(entry.path());
        }
    }
    dirs.sort();
    Ok(dirs)
}

/// `true`, `1` and `"1"` count as set.
fn flag(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_u64() == Some(1),
        Some(Value::String(s)) => s == "1" || s == "true",
        _ => false,
    }
}

/// Finds function definitions by name in library scripts.
struct FunctionDetector {
    patterns: Vec<(&'static str, Regex)>,
}

impl FunctionDetector {
    fn new(names: &[&'static str]) -> Self {
        let patterns = names
            .iter()
            .filter_map(|name| {
                // `name = function`, `name: function`, `name(...) {` and `function name(`
                let source = format!(
                    r"\b{0}\s*[=:]|\bfunction\s+{0}\s*\(|\b{0}\s*\([^)]*\)\s*\{{",
                    regex::escape(name)
                );
                match Regex::new(&source) {
                    Ok(re) => Some((*name, re)),
                    Err(e) => {
                        warn!(function = name, error = %e, "function pattern rejected");
                        None
                    }
                }
            })
            .collect();
        Self { patterns }
    }

    fn detect(&self, source: &str) -> Vec<String> {
        self.patterns
            .iter()
            .filter(|(_, re)| re.is_match(source))
            .map(|(name, _)| (*name).to_owned())
            .collect()
    }
}
