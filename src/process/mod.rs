/// Negative-to-positive conversion pipeline
///
/// Walks every frame of a source folder in store order and converts each
/// one through the selected processor, writing results into a derived
/// `processed_<folder>` destination. A failed frame is logged and skipped;
/// the batch always runs to the end and reports the destination folder
/// together with how many frames made it.

pub mod invert;
pub mod remote;

use std::path::Path;

use crate::error::ScanError;
use crate::state::data::ImageAsset;
use crate::state::index::FolderIndex;
use crate::state::store::AssetStore;

pub use remote::RemoteProcessor;

/// Prefix for converted frame names and destination folders
pub const PROCESSED_PREFIX: &str = "processed_";

/// How a batch converts its frames
pub enum Processor {
    /// Pixel inversion inside this process
    Local,
    /// Delegation to the external processing service
    Remote(RemoteProcessor),
    /// Scripted per-frame outcomes for tests
    #[cfg(test)]
    Scripted(std::sync::Mutex<Vec<Result<(Vec<u8>, String), ScanError>>>),
}

impl Processor {
    /// Convert a single frame, yielding the new payload and its MIME type
    async fn convert(&self, asset: &ImageAsset) -> Result<(Vec<u8>, String), ScanError> {
        match self {
            Processor::Local => invert::invert_frame(&asset.payload)
                .map(|bytes| (bytes, invert::OUTPUT_MIME.to_string())),
            Processor::Remote(service) => {
                service.process(&asset.name, &asset.mime, &asset.payload).await
            }
            #[cfg(test)]
            Processor::Scripted(outcomes) => outcomes.lock().unwrap().remove(0),
        }
    }
}

/// Outcome of one conversion batch
#[derive(Debug, Clone)]
pub struct BatchReport {
    /// Folder the converted frames were written to
    pub destination: String,
    pub converted: usize,
    pub failed: usize,
}

/// Convert every frame of `source` into `processed_<source>`.
///
/// Frames are processed strictly one at a time, in store order; a per-frame
/// failure is recorded and the loop moves on. Fails up front with
/// `EmptyFolder` when the source holds nothing. Store connections are
/// scoped to the work between awaits; each write opens its own handle.
pub async fn convert_folder(
    db_path: &Path,
    source: &str,
    processor: &Processor,
) -> Result<BatchReport, ScanError> {
    let assets = {
        let store = AssetStore::attach(db_path)?;
        let index = FolderIndex::build(store.list_all()?);
        index.assets_in(source).to_vec()
    };

    if assets.is_empty() {
        return Err(ScanError::EmptyFolder(source.to_string()));
    }

    let destination = format!("{}{}", PROCESSED_PREFIX, source);
    let mut report = BatchReport {
        destination: destination.clone(),
        converted: 0,
        failed: 0,
    };

    println!("🎞️  Converting {} frames from '{}'", assets.len(), source);

    for asset in &assets {
        // One conversion in flight at a time; total latency is the sum of
        // the per-frame latencies.
        match processor.convert(asset).await {
            Ok((payload, mime)) => {
                let name = format!("{}{}", PROCESSED_PREFIX, asset.name);
                let store = AssetStore::attach(db_path)?;
                store.put(&name, &mime, &payload, &destination)?;
                report.converted += 1;
            }
            Err(e) => {
                // The batch never aborts on a single frame.
                eprintln!("⚠️  Skipping '{}': {}", asset.name, e);
                report.failed += 1;
            }
        }
    }

    println!(
        "✅ Conversion complete → '{}' ({} converted, {} failed)",
        report.destination, report.converted, report.failed
    );

    Ok(report)
}
