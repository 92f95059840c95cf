//! Create command - create a card in the active session.
//!
//! The image comes from a file or from the camera collaborator. When
//! the camera is unavailable and a file was also given, the file path
//! is used as the fallback source.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::ValueEnum;
use colored::Colorize;
use tracing::warn;

use crate::app;
use crate::config::Config;
use crate::media::{self, CapturedImage, Facing, MediaError};
use crate::storage::Database;

/// Camera facing preference on the command line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum FacingArg {
    /// User-facing camera (default).
    #[default]
    Front,
    /// Environment-facing camera.
    Back,
}

impl From<FacingArg> for Facing {
    fn from(value: FacingArg) -> Self {
        match value {
            FacingArg::Front => Facing::Front,
            FacingArg::Back => Facing::Back,
        }
    }
}

/// Arguments for the create command.
#[derive(clap::Args)]
#[command(after_help = "EXAMPLES:\n    \
    comunica create --text \"Quero água\" --image agua.jpg\n    \
    comunica create --text \"Olá\" --camera\n    \
    comunica create --text \"Olá\" --camera --facing back --image fallback.jpg")]
pub struct Args {
    /// Text spoken when the card is selected
    #[arg(short, long, value_name = "TEXT")]
    pub text: String,

    /// Image file for the card
    #[arg(short, long, value_name = "PATH")]
    pub image: Option<PathBuf>,

    /// Capture the image with the camera instead
    #[arg(long)]
    pub camera: bool,

    /// Camera facing preference
    #[arg(long, value_enum, default_value = "front")]
    pub facing: FacingArg,
}

/// Executes the create command.
pub fn run(args: Args) -> Result<()> {
    let config = Config::load()?;
    let image = acquire_image(&args, &config)?;

    let mut db = Database::open_default()?;
    let mut board = app::load_board(&db);

    let id = board.create_card(&args.text, image.bytes, &image.mime_type)?;
    app::save_board(&mut db, &board)?;

    let session_name = board
        .session(board.active_session())
        .map(|s| s.name.as_str())
        .unwrap_or("-");
    println!(
        "{} card {} in session {}",
        "Created".green(),
        id.to_string().cyan(),
        session_name
    );

    Ok(())
}

/// Picks the image source: camera when requested, file otherwise.
///
/// An unavailable camera falls back to the file source when one was
/// given; without a fallback the failure surfaces to the user.
fn acquire_image(args: &Args, config: &Config) -> Result<CapturedImage> {
    if args.camera {
        match media::capture_still(config, args.facing.into()) {
            Ok(image) => return Ok(image),
            Err(e @ MediaError::DeviceUnavailable(_)) => {
                if let Some(path) = &args.image {
                    warn!("{e}, falling back to image file");
                    println!(
                        "{}",
                        format!("Camera unavailable, using {} instead", path.display()).yellow()
                    );
                    return Ok(media::load_from_file(path)?);
                }
                return Err(e.into());
            }
            Err(e) => return Err(e.into()),
        }
    }

    match &args.image {
        Some(path) => Ok(media::load_from_file(path)?),
        None => bail!("A card needs an image: pass --image <PATH> or --camera"),
    }
}
