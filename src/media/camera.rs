//! Camera capture collaborator.
//!
//! Captures a still frame by running an external capture command into a
//! temporary file. The child process is always waited on and the frame
//! file is removed on every path (success, failure, cancellation), so
//! the camera device is never left locked behind a dangling process.

use std::fmt;
use std::process::{Command, Stdio};

use tracing::debug;

use super::{render_template, CapturedImage, MediaError};
use crate::config::Config;

/// Requested camera facing preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    Front,
    Back,
}

impl Facing {
    pub fn as_str(self) -> &'static str {
        match self {
            Facing::Front => "front",
            Facing::Back => "back",
        }
    }
}

impl fmt::Display for Facing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(target_os = "macos")]
const DEFAULT_CAPTURE_COMMAND: &str = "imagesnap -w 1 {output}";

#[cfg(not(target_os = "macos"))]
const DEFAULT_CAPTURE_COMMAND: &str = "fswebcam --no-banner --jpeg 90 {output}";

/// Captures a still frame from the camera.
///
/// Uses the configured capture template when set (with `{output}` and
/// `{facing}` substituted), a platform default otherwise. A missing
/// binary or a failing device surfaces as [`MediaError::DeviceUnavailable`]
/// so the caller can fall back to the file source.
pub fn capture_still(config: &Config, facing: Facing) -> Result<CapturedImage, MediaError> {
    let template = config
        .camera_command
        .as_deref()
        .unwrap_or(DEFAULT_CAPTURE_COMMAND);

    // The frame file is deleted when this guard drops, on every path.
    let frame = tempfile::Builder::new()
        .prefix("comunica-frame-")
        .suffix(".jpg")
        .tempfile()
        .map_err(|e| MediaError::CaptureFailed(format!("could not create frame file: {e}")))?;
    let frame_path = frame.path().to_string_lossy().to_string();

    let argv = render_template(
        template,
        &[("{output}", frame_path.as_str()), ("{facing}", facing.as_str())],
    );
    let (program, args) = argv
        .split_first()
        .ok_or_else(|| MediaError::DeviceUnavailable("empty capture command".to_string()))?;

    debug!("capturing frame via '{program}' (facing {facing})");

    // status() waits for the child, releasing the device before we read.
    let status = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => {
                MediaError::DeviceUnavailable(format!("'{program}' is not installed"))
            }
            _ => MediaError::CaptureFailed(e.to_string()),
        })?;

    if !status.success() {
        return Err(MediaError::DeviceUnavailable(format!(
            "'{program}' exited with {status}"
        )));
    }

    let bytes = std::fs::read(frame.path())
        .map_err(|e| MediaError::CaptureFailed(format!("could not read frame: {e}")))?;
    if bytes.is_empty() {
        return Err(MediaError::CaptureFailed(
            "capture produced an empty frame".to_string(),
        ));
    }

    Ok(CapturedImage {
        bytes,
        mime_type: "image/jpeg".to_string(),
    })
}
