// SPDX-License-Identifier: GPL-3.0-only

//! Non-interactive commands

use photo_strip::Config;
use photo_strip::backends::camera::enumerate_cameras;

/// List all available cameras
pub fn list_cameras() -> Result<(), Box<dyn std::error::Error>> {
    let cameras = enumerate_cameras()?;

    if cameras.is_empty() {
        println!("No cameras found.");
        return Ok(());
    }

    println!("Available cameras:");
    println!();
    for (index, camera) in cameras.iter().enumerate() {
        println!("  [{}] {}", index, camera.name);
        if let Some(path) = &camera.path {
            println!("      Device: {}", path);
        }
    }
    println!();
    println!("Use --camera <DEVICE> to pick one.");

    Ok(())
}

/// Print the effective configuration as JSON
pub fn show_config(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = Config::default_path() {
        println!("# {}", path.display());
    }
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}
