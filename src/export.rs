use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::error::ScanError;
use crate::state::data::ImageAsset;

/// Folder export
///
/// Bundles every frame of a folder into a single ZIP archive built in
/// memory: one entry per frame, named exactly like the stored asset, in
/// insertion order. The store is never mutated, so exporting is safe to
/// repeat.
pub fn bundle_folder(folder: &str, assets: &[ImageAsset]) -> Result<Vec<u8>, ScanError> {
    if assets.is_empty() {
        return Err(ScanError::EmptyFolder(folder.to_string()));
    }

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    for asset in assets {
        writer
            .start_file(asset.name.as_str(), options)
            .map_err(|e| {
                ScanError::ExportFailure(format!("could not add '{}': {}", asset.name, e))
            })?;
        writer.write_all(&asset.payload).map_err(|e| {
            ScanError::ExportFailure(format!("could not write '{}': {}", asset.name, e))
        })?;
    }

    let cursor = writer
        .finish()
        .map_err(|e| ScanError::ExportFailure(e.to_string()))?;

    println!("📦 Bundled {} frames from '{}'", assets.len(), folder);

    Ok(cursor.into_inner())
}

/// Default file name for a folder's bundle
pub fn bundle_file_name(folder: &str) -> String {
    format!("{}.zip", folder)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn asset(id: i64, name: &str, payload: &[u8]) -> ImageAsset {
        ImageAsset {
            id,
            name: name.to_string(),
            mime: "image/png".to_string(),
            payload: payload.to_vec(),
            folder: "roll".to_string(),
        }
    }

    #[test]
    fn test_bundle_holds_one_entry_per_frame() {
        let assets = vec![
            asset(1, "first.png", b"aaaa"),
            asset(2, "second.png", b"bbbb"),
            asset(3, "third.png", b"cccc"),
        ];

        let bundle = bundle_folder("roll", &assets).unwrap();
        let mut archive = zip::ZipArchive::new(Cursor::new(bundle)).unwrap();

        assert_eq!(archive.len(), 3);
        for (i, expected) in assets.iter().enumerate() {
            let mut entry = archive.by_index(i).unwrap();
            assert_eq!(entry.name(), expected.name);

            let mut contents = Vec::new();
            entry.read_to_end(&mut contents).unwrap();
            assert_eq!(contents, expected.payload);
        }
    }

    #[test]
    fn test_empty_folder_cannot_be_exported() {
        let result = bundle_folder("roll", &[]);
        assert!(matches!(result, Err(ScanError::EmptyFolder(_))));
    }

    #[test]
    fn test_export_is_repeat_safe() {
        let assets = vec![asset(1, "only.png", b"payload")];

        let first = bundle_folder("roll", &assets).unwrap();
        let second = bundle_folder("roll", &assets).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_bundle_file_name_is_derived_from_the_folder() {
        assert_eq!(bundle_file_name("roll_a"), "roll_a.zip");
    }
}
