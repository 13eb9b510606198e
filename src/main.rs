// SPDX-License-Identifier: GPL-3.0-only

use clap::{Parser, Subcommand};
use photo_strip::Config;
use photo_strip::flash::FlashMode;
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "photo-strip")]
#[command(about = "Take up to eight photos, confirm each one and review them in a strip")]
#[command(version = photo_strip::constants::app_info::version())]
#[command(subcommand_required = false)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Camera device to use (from 'photo-strip list')
    #[arg(short, long, global = true)]
    camera: Option<String>,

    /// Directory confirmed photos are moved to
    #[arg(long, global = true)]
    photos_dir: Option<PathBuf>,

    /// Initial flash mode (on/off)
    #[arg(long, global = true)]
    flash: Option<FlashMode>,

    /// Read configuration from this file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List available cameras
    List,

    /// Print the effective configuration
    Config {
        /// Also write it back to the config file
        #[arg(long)]
        save: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Set RUST_LOG to control log level, e.g. RUST_LOG=photo_strip=debug
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(camera) = cli.camera {
        config.camera_path = Some(camera);
    }
    if let Some(dir) = cli.photos_dir {
        config.photos_dir = dir;
    }
    if let Some(flash) = cli.flash {
        config.default_flash = flash;
    }

    match cli.command {
        Some(Commands::List) => cli::list_cameras(),
        Some(Commands::Config { save }) => {
            if save {
                let path = cli.config.or_else(Config::default_path).ok_or("No config directory")?;
                config.save_to(&path)?;
            }
            cli::show_config(&config)
        }
        None => photo_strip::terminal::run(config),
    }
}
