/// Capture device boundary
///
/// Live video acquisition and on-screen preview belong to a platform
/// capture backend outside this crate. This module owns the request
/// parameters such a backend receives and the scoped handle that guarantees
/// the device is released on every exit path from scanning.

use serde::{Deserialize, Serialize};

use crate::error::ScanError;

/// Which way the requested device should face
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraFacing {
    /// Outward (rear) camera, preferred for shooting film on a light table
    Environment,
    /// User-facing camera
    User,
}

/// Parameters for a capture device request.
///
/// The resolution is an ideal, not a requirement; a backend that cannot
/// satisfy it reports failure to the user instead of retrying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraRequest {
    pub ideal_width: u32,
    pub ideal_height: u32,
    pub facing: CameraFacing,
}

impl Default for CameraRequest {
    fn default() -> Self {
        CameraRequest {
            ideal_width: 1920,
            ideal_height: 1080,
            facing: CameraFacing::Environment,
        }
    }
}

/// One still frame grabbed from a live stream
#[derive(Debug, Clone)]
pub struct CapturedFrame {
    pub bytes: Vec<u8>,
    pub mime: String,
}

/// A connected capture backend.
pub trait CaptureDevice {
    /// Grab a single still frame from the live stream
    fn grab_frame(&mut self) -> Result<CapturedFrame, ScanError>;

    /// Stop the underlying stream
    fn stop(&mut self);
}

/// Scoped ownership of an acquired capture device.
///
/// Dropping the handle stops the stream, so the device is released on every
/// exit path from scanning, including abnormal ones.
pub struct CameraHandle {
    device: Box<dyn CaptureDevice>,
}

impl CameraHandle {
    /// Wrap a backend device. This is the integration point for platform
    /// capture backends.
    pub fn from_device(device: Box<dyn CaptureDevice>) -> Self {
        CameraHandle { device }
    }

    pub fn grab_frame(&mut self) -> Result<CapturedFrame, ScanError> {
        self.device.grab_frame()
    }
}

impl Drop for CameraHandle {
    fn drop(&mut self) {
        self.device.stop();
        println!("📷 Capture device released");
    }
}

/// Acquire a capture device satisfying `request`.
///
/// No capture backend is linked into this build, so acquisition reports
/// `CameraAccessFailure`; the shell shows it once and falls back to the
/// folder view. Backends plug in through `CameraHandle::from_device`.
pub fn acquire(request: &CameraRequest) -> Result<CameraHandle, ScanError> {
    let facing = match request.facing {
        CameraFacing::Environment => "outward-facing",
        CameraFacing::User => "user-facing",
    };
    Err(ScanError::CameraAccessFailure(format!(
        "no capture backend available for a {}x{} {} device",
        request.ideal_width, request.ideal_height, facing
    )))
}
