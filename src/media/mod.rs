//! External media collaborators.
//!
//! Speech synthesis and still-frame camera capture are provided by the
//! platform, not owned by Comunica: both run as external commands,
//! configurable through command templates. The file source covers the
//! case where the user picks an existing image instead of capturing one.

pub mod camera;
pub mod image;
pub mod speech;

pub use camera::{capture_still, Facing};
pub use image::load_from_file;
pub use speech::Speaker;

use thiserror::Error;

/// Errors from the media collaborators.
#[derive(Debug, Error)]
pub enum MediaError {
    /// The chosen image file could not be read.
    #[error("could not read image file {path}")]
    UnreadableImage {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The chosen image file holds no data.
    #[error("image file {0} is empty")]
    EmptyImage(String),

    /// Camera binary missing, permission denied, or no device; callers
    /// fall back to the file source when one is available.
    #[error("camera unavailable: {0}")]
    DeviceUnavailable(String),

    /// The capture command ran but produced no usable frame.
    #[error("camera capture failed: {0}")]
    CaptureFailed(String),

    /// No speech synthesizer could be spawned.
    #[error("no speech synthesizer found (tried: {0})")]
    NoSynthesizer(String),
}

/// An image payload produced by any of the media sources.
#[derive(Debug, Clone)]
pub struct CapturedImage {
    /// Raw image bytes
    pub bytes: Vec<u8>,
    /// MIME type of the payload
    pub mime_type: String,
}

/// Splits a command template into argv tokens and substitutes
/// placeholders per token.
///
/// Substitution happens after splitting, so a value containing spaces
/// (card text, paths) stays a single argument.
pub(crate) fn render_template(template: &str, substitutions: &[(&str, &str)]) -> Vec<String> {
    template
        .split_whitespace()
        .map(|token| {
            let mut rendered = token.to_string();
            for (placeholder, value) in substitutions {
                rendered = rendered.replace(placeholder, value);
            }
            rendered
        })
        .collect()
}
