use chrono::Utc;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::camera::CapturedFrame;
use crate::error::ScanError;
use crate::state::store::AssetStore;

/// Raster file extensions accepted for upload
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "tif", "tiff", "bmp", "webp", "gif"];

/// Result of a bulk file ingestion
#[derive(Debug, Clone, Default)]
pub struct IngestReport {
    pub added: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Store one captured frame under the active folder.
///
/// The name is synthesized from the capture timestamp; the store assigns
/// the id. Fails with `NoActiveFolder` when no folder is selected.
pub fn capture_frame(
    store: &AssetStore,
    active_folder: Option<&str>,
    frame: CapturedFrame,
) -> Result<i64, ScanError> {
    let folder = active_folder.ok_or(ScanError::NoActiveFolder)?;

    let name = format!(
        "capture_{}.{}",
        Utc::now().format("%Y%m%d_%H%M%S%.3f"),
        extension_for(&frame.mime)
    );

    store.put(&name, &frame.mime, &frame.bytes, folder)
}

/// Store an uploaded file's bytes under the active folder, keeping the
/// producer-supplied name.
///
/// Empty uploads are rejected before the store sees them, and the bytes
/// must decode as a raster image.
pub fn ingest_upload(
    store: &AssetStore,
    active_folder: Option<&str>,
    bytes: &[u8],
    mime: &str,
    original_name: &str,
) -> Result<i64, ScanError> {
    let folder = active_folder.ok_or(ScanError::NoActiveFolder)?;

    if bytes.is_empty() {
        return Err(ScanError::EmptyUpload);
    }

    image::load_from_memory(bytes).map_err(|e| {
        ScanError::ReadFailure(format!("'{}' did not decode: {}", original_name, e))
    })?;

    store.put(original_name, mime, bytes, folder)
}

/// Bulk-ingest picked files into `folder`, expanding directories
/// recursively.
///
/// Non-image files are skipped; unreadable files are counted and logged
/// without aborting the rest. Runs as a background task and opens its own
/// store connection; the main connection stays on the UI thread.
pub async fn ingest_paths(db_path: PathBuf, folder: String, paths: Vec<PathBuf>) -> IngestReport {
    let mut report = IngestReport::default();

    let store = match AssetStore::attach(&db_path) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("⚠️  Could not open store for import: {}", e);
            return report;
        }
    };

    println!("🔍 Importing {} selections into '{}'", paths.len(), folder);

    for picked in &paths {
        for entry in WalkDir::new(picked)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();

            // Only process files (not directories)
            if !path.is_file() {
                continue;
            }

            let Some(mime) = mime_for_path(path) else {
                report.skipped += 1;
                continue;
            };

            let name = path
                .file_name()
                .unwrap_or_default()
                .to_string_lossy()
                .to_string();

            match std::fs::read(path) {
                Ok(bytes) => {
                    match ingest_upload(&store, Some(&folder), &bytes, mime, &name) {
                        Ok(_) => report.added += 1,
                        Err(e) => {
                            eprintln!("⚠️  Error importing {}: {}", name, e);
                            report.failed += 1;
                        }
                    }
                }
                Err(e) => {
                    eprintln!("⚠️  Error reading {}: {}", path.display(), e);
                    report.failed += 1;
                }
            }
        }
    }

    println!(
        "✅ Import complete: {} added, {} skipped, {} failed",
        report.added, report.skipped, report.failed
    );

    report
}

/// MIME type for a picked file, judged by extension.
/// Returns None for anything that is not a supported raster format.
fn mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_string_lossy().to_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "tif" | "tiff" => Some("image/tiff"),
        "bmp" => Some("image/bmp"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        _ => None,
    }
}

/// File extension for a capture's MIME type
fn extension_for(mime: &str) -> &'static str {
    match mime {
        "image/jpeg" => "jpg",
        "image/png" => "png",
        "image/tiff" => "tif",
        "image/bmp" => "bmp",
        "image/webp" => "webp",
        "image/gif" => "gif",
        _ => "img",
    }
}
