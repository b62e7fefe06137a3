/// Shared data structures for the application state
///
/// These structs represent the records that flow between
/// the session database and the rest of the application.

/// A single stored film frame (payload plus metadata)
#[derive(Debug, Clone, PartialEq)]
pub struct ImageAsset {
    /// Store-assigned id, monotonically increasing
    pub id: i64,
    /// Producer-chosen name: a capture timestamp or the original upload
    /// file name. Not required to be unique.
    pub name: String,
    /// MIME type of the payload (always image/*)
    pub mime: String,
    /// Immutable raster image bytes
    pub payload: Vec<u8>,
    /// Folder key; assigned at creation and never reassigned
    pub folder: String,
}
