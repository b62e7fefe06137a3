use thiserror::Error;

/// Application error taxonomy.
///
/// Store and transaction errors are terminal for the single operation that
/// raised them and are surfaced to the user without retry. Per-asset
/// conversion failures are collected at the batch level instead of
/// propagating (see the `process` module).
#[derive(Debug, Error)]
pub enum ScanError {
    /// The session store has not finished initializing yet.
    /// Operations are rejected rather than queued.
    #[error("the image store is not ready yet")]
    StoreNotReady,

    /// The store rejected an operation.
    #[error("store error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// An operation needed a selected folder and none was set.
    #[error("no folder is selected")]
    NoActiveFolder,

    /// The folder exists but holds no frames.
    #[error("folder '{0}' has no images")]
    EmptyFolder(String),

    /// An upload arrived with zero bytes.
    #[error("the uploaded file is empty")]
    EmptyUpload,

    /// Source bytes could not be read or decoded as a raster image.
    #[error("unreadable image: {0}")]
    ReadFailure(String),

    /// The delegated processing service answered with a non-success
    /// response, or the transport failed.
    #[error("processing service failed: {0}")]
    RemoteProcessingFailure(String),

    /// The capture device could not be acquired or used.
    #[error("camera unavailable: {0}")]
    CameraAccessFailure(String),

    /// A record that does not satisfy the asset schema.
    #[error("invalid image record: {0}")]
    ValidationFailure(String),

    /// Writing the export bundle failed.
    #[error("export failed: {0}")]
    ExportFailure(String),
}
