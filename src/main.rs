use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod app;
mod cli;
mod config;
mod media;
mod storage;

use cli::commands;

/// The main CLI command line interface.
#[derive(Parser)]
#[command(name = "comunica")]
#[command(version)]
#[command(about = "Visual communication cards - build a speaking card board in your terminal")]
#[command(long_about = "Comunica is a communication aid: image+text cards grouped into\n\
    sessions, spoken aloud on selection. Cards and sessions live in a\n\
    local database; nothing ever leaves the machine.")]
#[command(after_help = "EXAMPLES:\n    \
    comunica status                       Show the board overview\n    \
    comunica create --text \"Quero água\" --image agua.jpg\n    \
    comunica create --text \"Olá\" --camera\n    \
    comunica cards                        List cards of the active session\n    \
    comunica speak 17283                  Speak a card aloud\n    \
    comunica session new Escola           Create a session\n    \
    comunica session use Escola           Switch the active session\n    \
    comunica move 17283 Escola            Move a card to another session\n\n\
    For more information about a command, run 'comunica <command> --help'.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available CLI subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Show board status, statistics, and the session list
    #[command(long_about = "Displays an overview of the card board: card and session counts,\n\
        the active session, and every session with its card count.")]
    Status,

    /// List sessions in board order
    #[command(long_about = "Displays the session list with ids, card counts, and creation\n\
        times. Principal is always first; the active session is marked.")]
    Sessions(commands::sessions::Args),

    /// List the cards of a session
    #[command(long_about = "Displays the cards of the active session (or a session given\n\
        with --session) in the session's own order.\n\
        \n\
        Supports multiple output formats:\n\
        - text: colored terminal output (default)\n\
        - json: machine-readable structured output")]
    Cards(commands::cards::Args),

    /// Create a card in the active session
    #[command(long_about = "Creates an image+text card in the active session. The image\n\
        comes from a file (--image) or the camera (--camera); when the\n\
        camera is unavailable and a file was also given, the file is\n\
        used as fallback.")]
    Create(commands::create::Args),

    /// Move a card from the active session to another session
    #[command(long_about = "Moves a card out of the active session. The card must currently\n\
        be in the active session; the target accepts an id, a name, or\n\
        an id prefix.")]
    Move(commands::move_card::Args),

    /// Delete a card
    #[command(long_about = "Removes a card from the board and from every session list.\n\
        Prompts for confirmation unless --force is given.")]
    Delete(commands::delete::Args),

    /// Speak a card's text aloud
    #[command(long_about = "Hands the card's text to the speech synthesizer, fire-and-forget.\n\
        The synthesizer command and locale can be changed with\n\
        'comunica config'.")]
    Speak(commands::speak::Args),

    /// Manage sessions: new, delete, move, use
    #[command(long_about = "Session management. Deleting a session moves its cards to the\n\
        Principal session, which itself can never be deleted or moved\n\
        away from the first position.")]
    Session(commands::session::Args),

    /// View and manage configuration settings
    #[command(long_about = "Provides subcommands to show, get, and set configuration values.\n\
        Configuration is stored in ~/.comunica/config.json.")]
    Config(commands::config::Args),

    /// Generate shell completion scripts
    Completions(commands::completions::Args),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "comunica=debug"
    } else {
        "comunica=info"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    match cli.command {
        Commands::Status => commands::status::run(),
        Commands::Sessions(args) => commands::sessions::run(args),
        Commands::Cards(args) => commands::cards::run(args),
        Commands::Create(args) => commands::create::run(args),
        Commands::Move(args) => commands::move_card::run(args),
        Commands::Delete(args) => commands::delete::run(args),
        Commands::Speak(args) => commands::speak::run(args),
        Commands::Session(args) => commands::session::run(args),
        Commands::Config(args) => commands::config::run(args),
        Commands::Completions(args) => {
            commands::completions::generate_completions(&mut Cli::command(), args.shell);
            Ok(())
        }
    }
}
