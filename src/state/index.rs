use std::collections::BTreeMap;

use super::data::ImageAsset;

/// Read-only view of the store contents grouped by folder.
///
/// The index is derived from a `list_all` snapshot every time it is needed
/// and never cached across mutations, so it cannot go stale. Folders are
/// listed in name order; frames within a folder keep store-insertion order.
#[derive(Debug, Clone, Default)]
pub struct FolderIndex {
    folders: BTreeMap<String, Vec<ImageAsset>>,
}

impl FolderIndex {
    /// Group a store snapshot by folder key.
    pub fn build(assets: Vec<ImageAsset>) -> Self {
        let mut folders: BTreeMap<String, Vec<ImageAsset>> = BTreeMap::new();
        for asset in assets {
            folders.entry(asset.folder.clone()).or_default().push(asset);
        }
        FolderIndex { folders }
    }

    /// Names of every folder that currently holds at least one frame
    pub fn folder_names(&self) -> impl Iterator<Item = &str> {
        self.folders.keys().map(String::as_str)
    }

    /// The frames of one folder, in store-insertion order.
    /// Unknown folders are simply empty.
    pub fn assets_in(&self, folder: &str) -> &[ImageAsset] {
        self.folders
            .get(folder)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Number of folders in the index
    pub fn folder_count(&self) -> usize {
        self.folders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.folders.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(id: i64, name: &str, folder: &str) -> ImageAsset {
        ImageAsset {
            id,
            name: name.to_string(),
            mime: "image/png".to_string(),
            payload: vec![0u8; 4],
            folder: folder.to_string(),
        }
    }

    #[test]
    fn test_groups_exactly_by_folder() {
        let index = FolderIndex::build(vec![
            asset(1, "a.png", "roll_a"),
            asset(2, "b.png", "roll_b"),
            asset(3, "c.png", "roll_a"),
        ]);

        assert_eq!(index.folder_count(), 2);
        assert_eq!(index.assets_in("roll_a").len(), 2);
        assert_eq!(index.assets_in("roll_b").len(), 1);
        for frame in index.assets_in("roll_a") {
            assert_eq!(frame.folder, "roll_a");
        }
    }

    #[test]
    fn test_preserves_insertion_order_within_folder() {
        let index = FolderIndex::build(vec![
            asset(1, "third.png", "roll"),
            asset(5, "first.png", "other"),
            asset(9, "fourth.png", "roll"),
            asset(12, "alpha.png", "roll"),
        ]);

        let names: Vec<&str> = index
            .assets_in("roll")
            .iter()
            .map(|frame| frame.name.as_str())
            .collect();
        assert_eq!(names, vec!["third.png", "fourth.png", "alpha.png"]);
    }

    #[test]
    fn test_unknown_folder_is_empty() {
        let index = FolderIndex::build(vec![asset(1, "a.png", "roll")]);
        assert!(index.assets_in("nope").is_empty());
    }

    #[test]
    fn test_empty_snapshot() {
        let index = FolderIndex::build(Vec::new());
        assert!(index.is_empty());
        assert_eq!(index.folder_count(), 0);
    }
}
