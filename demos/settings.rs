//! A small settings store: counters, typed defaults and an encoded struct.
//!
//! Run with: cargo run --example settings [path]

use confdoc::{load, save_with, TextOptions};
use serde::{Deserialize, Serialize};
use std::error::Error;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Copy)]
enum Theme {
    Light,
    Dark,
}

#[derive(Debug, Serialize, Deserialize)]
struct Window {
    width: u32,
    height: u32,
    maximized: bool,
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .try_init();
}

fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "settings.json".to_string());

    let settings = load(&path)?;

    let launches = settings.get_int_or("launches", 0) + 1;
    settings.set("launches", launches)?;
    println!("Launch #{}", launches);

    let theme = settings.get_enum_or("theme", Theme::Light);
    println!("Theme: {:?}", theme);
    let next = match theme {
        Theme::Light => Theme::Dark,
        Theme::Dark => Theme::Light,
    };
    settings.set_enum("theme", &next)?;

    let window = settings.get_encoded_or(
        "window",
        Window {
            width: 800,
            height: 600,
            maximized: false,
        },
    );
    println!("Window: {:?}", window);

    let resized = Window {
        width: window.width + 10,
        height: window.height + 10,
        ..window
    };
    if let Some(previous) = settings.set_encoded("window", &resized)? {
        println!("Replaced a stored {}", previous.type_name());
    }

    save_with(&settings, &path, &TextOptions::pretty())?;
    println!("\nSaved to {}:\n{}", path, settings.to_text_with(&TextOptions::pretty()));

    Ok(())
}
