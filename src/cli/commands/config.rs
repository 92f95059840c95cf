//! Config command - manage configuration

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;

use crate::config::Config;
use crate::storage::db::default_db_path;

#[derive(clap::Args)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<ConfigCommand>,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show,
    /// Get a configuration value
    Get { key: String },
    /// Set a configuration value (empty value clears command templates)
    Set { key: String, value: String },
}

pub fn run(args: Args) -> Result<()> {
    match args.command {
        Some(ConfigCommand::Show) | None => show_config(),
        Some(ConfigCommand::Get { key }) => get_config(&key),
        Some(ConfigCommand::Set { key, value }) => set_config(&key, &value),
    }
}

fn show_config() -> Result<()> {
    println!("{}", "Comunica Configuration".bold());
    println!();

    let db_path = default_db_path()?;
    println!("  {}  {}", "Database:".dimmed(), db_path.display());
    println!(
        "  {}  {}",
        "Config:".dimmed(),
        Config::config_path()?.display()
    );

    let config = Config::load()?;
    println!();
    println!("  {}  {}", "locale:".dimmed(), config.locale);
    println!(
        "  {}  {}",
        "speech_command:".dimmed(),
        config.speech_command.as_deref().unwrap_or("(platform default)")
    );
    println!(
        "  {}  {}",
        "camera_command:".dimmed(),
        config.camera_command.as_deref().unwrap_or("(platform default)")
    );

    Ok(())
}

fn get_config(key: &str) -> Result<()> {
    let config = Config::load()?;
    println!("{}", config.get(key)?);
    Ok(())
}

fn set_config(key: &str, value: &str) -> Result<()> {
    let mut config = Config::load()?;
    config.set(key, value)?;
    config.save()?;

    println!("{} {} = {}", "Set".green(), key, value);
    Ok(())
}
