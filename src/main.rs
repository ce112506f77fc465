// Hide console window on Windows for release builds (GUI app).
#![cfg_attr(all(windows, not(debug_assertions)), windows_subsystem = "windows")]

use std::path::PathBuf;

use bevy::prelude::*;
use clap::Parser;

use floating_dice::dice_tray::{DiceTrayPlugin, TableSettings};

/// Floating dice tray: gather, throw and keep dice
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// RON file with dice, gesture and tray settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of dice on the table (overrides the config file)
    #[arg(short, long)]
    dice: Option<usize>,

    /// Seed for repeatable rolls
    #[arg(short, long)]
    seed: Option<u64>,
}

fn load_settings(args: &Args) -> TableSettings {
    let mut settings = match &args.config {
        Some(path) => match TableSettings::load_from_file(path) {
            Ok(settings) => {
                println!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                eprintln!("Warning: {}; using defaults", e);
                TableSettings::default()
            }
        },
        None => TableSettings::default(),
    };

    if let Some(count) = args.dice {
        settings.dice.count = count;
    }

    settings.sanitized()
}

fn main() {
    let args = Args::parse();
    let settings = load_settings(&args);

    println!("Rolling with {} dice", settings.dice.count);
    if let Some(seed) = args.seed {
        println!("Seed: {}", seed);
    }

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Floating Dice".to_string(),
                ..default()
            }),
            ..default()
        }))
        .insert_resource(ClearColor(Color::srgb(0.05, 0.07, 0.09)))
        .add_plugins(DiceTrayPlugin::new(settings, args.seed))
        .run();
}
