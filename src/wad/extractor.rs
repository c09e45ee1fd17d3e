use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use tokio::fs;
use tokio::task::{JoinError, JoinSet};

use crate::error::ExtractionError;
use crate::io::LocalFileReader;

use super::reader::{read_object_at_path, read_object_from};
use super::structures::{ArchiveMetadata, ObjectRecord};

/// Settings for [`extract_all_with`].
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Maximum number of objects read and written at the same time.
    pub concurrency: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self { concurrency: 16 }
    }
}

/// Directory an archive extracts into when none is given: the archive's
/// file name without its `.wad` suffix, relative to the working directory.
pub fn default_destination(source_path: &Path) -> PathBuf {
    let name = source_path
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    match name.strip_suffix(".wad") {
        Some(stem) if !stem.is_empty() => PathBuf::from(stem),
        _ => PathBuf::from(name),
    }
}

/// Extract every object with default options.
///
/// See [`extract_all_with`].
pub async fn extract_all(
    meta: &ArchiveMetadata,
    destination: Option<&Path>,
) -> Result<(), ExtractionError> {
    extract_all_with(meta, destination, &ExtractOptions::default()).await
}

/// Extract every object under `destination`, recreating the archive's
/// directory structure and overwriting existing files.
///
/// When a path appears more than once, only its first entry is written.
/// Objects are processed concurrently in no particular order. After the
/// first failure no further objects are started; objects already in flight
/// are allowed to finish and the first failure is returned.
pub async fn extract_all_with(
    meta: &ArchiveMetadata,
    destination: Option<&Path>,
    options: &ExtractOptions,
) -> Result<(), ExtractionError> {
    let root = destination
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_destination(meta.source_path()));

    fs::create_dir_all(&root)
        .await
        .map_err(|source| ExtractionError::CreateDir {
            path: root.clone(),
            source,
        })?;

    tracing::info!(
        archive = %meta.source_path().display(),
        destination = %root.display(),
        objects = meta.object_count(),
        "extracting WAD"
    );

    if meta.is_empty() {
        return Ok(());
    }

    // One handle serves every task; reads are positioned, never seek-based.
    let reader = LocalFileReader::new(meta.source_path()).map_err(|source| {
        ExtractionError::OpenArchive {
            path: meta.source_path().to_path_buf(),
            source,
        }
    })?;
    let reader = Arc::new(reader);

    let concurrency = options.concurrency.max(1);
    let mut tasks = JoinSet::new();
    let mut first_error = None;

    for (i, (record, rel_path, _)) in meta.entries().enumerate() {
        // Later duplicates of a path are shadowed by the first entry, the
        // same one lookups resolve to.
        if meta.index_of(rel_path) != Some(i) {
            tracing::debug!(path = %rel_path, index = i, "skipping duplicate path");
            continue;
        }

        while tasks.len() >= concurrency {
            match tasks.join_next().await {
                Some(result) => keep_first(&mut first_error, result),
                None => break,
            }
        }
        if first_error.is_some() {
            break;
        }

        let target = match resolve_target(&root, rel_path) {
            Ok(target) => target,
            Err(err) => {
                keep_first(&mut first_error, Ok(Err(err)));
                break;
            }
        };

        tasks.spawn(extract_one(
            Arc::clone(&reader),
            *record,
            rel_path.to_owned(),
            target,
        ));
    }

    while let Some(result) = tasks.join_next().await {
        keep_first(&mut first_error, result);
    }

    match first_error {
        Some(err) => {
            tracing::warn!(error = %err, "WAD extraction failed");
            Err(err)
        }
        None => {
            tracing::info!(destination = %root.display(), "WAD extraction complete");
            Ok(())
        }
    }
}

/// Extract the single object stored under `rel_path` into `root`,
/// creating parent directories as needed.
///
/// Returns the path the object was written to.
pub async fn extract_object(
    meta: &ArchiveMetadata,
    rel_path: &str,
    root: &Path,
) -> Result<PathBuf, ExtractionError> {
    let target = resolve_target(root, rel_path)?;
    let data = read_object_at_path(meta, rel_path)
        .await
        .map_err(|source| ExtractionError::Read {
            path: rel_path.to_owned(),
            source,
        })?;

    write_object(&target, &data).await?;
    Ok(target)
}

async fn extract_one(
    reader: Arc<LocalFileReader>,
    record: ObjectRecord,
    rel_path: String,
    target: PathBuf,
) -> Result<(), ExtractionError> {
    let data = read_object_from(reader.as_ref(), &record)
        .await
        .map_err(|source| ExtractionError::Read {
            path: rel_path.clone(),
            source,
        })?;

    write_object(&target, &data).await?;

    tracing::debug!(path = %rel_path, bytes = data.len(), "extracted object");
    Ok(())
}

async fn write_object(target: &Path, data: &[u8]) -> Result<(), ExtractionError> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|source| ExtractionError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
    }

    fs::write(target, data)
        .await
        .map_err(|source| ExtractionError::Write {
            path: target.to_path_buf(),
            source,
        })
}

fn keep_first(
    slot: &mut Option<ExtractionError>,
    result: Result<Result<(), ExtractionError>, JoinError>,
) {
    let err = match result {
        Ok(Ok(())) => return,
        Ok(Err(err)) => err,
        Err(join) => join.into(),
    };

    match slot {
        None => *slot = Some(err),
        Some(_) => tracing::debug!(error = %err, "suppressed later extraction error"),
    }
}

/// Join an archive path onto `root`, refusing anything that would land
/// outside it.
fn resolve_target(root: &Path, rel_path: &str) -> Result<PathBuf, ExtractionError> {
    let unsafe_path = || ExtractionError::UnsafePath(rel_path.to_owned());

    let mut target = root.to_path_buf();
    let mut depth = 0usize;

    for component in Path::new(rel_path).components() {
        match component {
            Component::Normal(part) => {
                target.push(part);
                depth += 1;
            }
            Component::ParentDir => {
                if depth == 0 {
                    return Err(unsafe_path());
                }
                target.pop();
                depth -= 1;
            }
            Component::CurDir => (),
            Component::Prefix(_) | Component::RootDir => return Err(unsafe_path()),
        }
    }

    if depth == 0 {
        return Err(unsafe_path());
    }

    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_destination_strips_wad_suffix() {
        assert_eq!(default_destination(Path::new("data/LegoRR1.wad")), PathBuf::from("LegoRR1"));
        assert_eq!(default_destination(Path::new("LegoRR1.WAD")), PathBuf::from("LegoRR1.WAD"));
        assert_eq!(default_destination(Path::new("archive")), PathBuf::from("archive"));
        assert_eq!(default_destination(Path::new(".wad")), PathBuf::from(".wad"));
    }

    #[test]
    fn resolve_target_keeps_nested_paths() {
        let root = Path::new("out");
        assert_eq!(
            resolve_target(root, "Sounds/Voices/rubble.wav").unwrap(),
            root.join("Sounds").join("Voices").join("rubble.wav")
        );
        assert_eq!(
            resolve_target(root, "./Data/../Lego.cfg").unwrap(),
            root.join("Lego.cfg")
        );
    }

    #[test]
    fn resolve_target_rejects_escapes() {
        let root = Path::new("out");
        for path in ["../evil.txt", "a/../../evil.txt", "/etc/passwd", "", "."] {
            assert!(
                matches!(resolve_target(root, path), Err(ExtractionError::UnsafePath(_))),
                "{path:?} should be rejected"
            );
        }
    }
}
