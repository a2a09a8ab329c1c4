use std::path::PathBuf;

use clap::builder::{styling::AnsiColor, Styles};
use clap::Parser;

use crate::owm;

const ABOUT: &str = "Weather dashboard TUI";

const LONG_ABOUT: &str = "
TUI for looking up current conditions and a 5-day forecast for any city, sourced from
OpenWeatherMap.

An API key is required (https://openweathermap.org/api). Recent searches and the dark-mode
preference are saved, so they are restored on the next run of `wxboard`.

Keys: type a city and press Enter to search, Tab to complete from popular cities, Up/Down to
pick a recent search, Ctrl-R to refresh, Ctrl-T to toggle dark mode, Esc to quit.
";

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default())
    .usage(AnsiColor::Green.on_default())
    .literal(AnsiColor::Green.on_default())
    .placeholder(AnsiColor::Green.on_default());

#[derive(Parser, Debug)]
#[command(version, styles=STYLES, about=ABOUT, long_about = LONG_ABOUT)]
pub struct Args {
    #[arg(help = "City to look up on startup (e.g. London, \"New York\")")]
    pub city: Option<String>,

    #[arg(long, env = "OPENWEATHER_API_KEY", hide_env_values = true)]
    pub api_key: String,

    #[arg(long, env = "OPENWEATHER_BASE_URL", default_value = owm::BASE_URL)]
    pub base_url: String,

    #[arg(long, help = "Saved state file [default: <config dir>/wxboard/state.json]")]
    pub state_file: Option<PathBuf>,

    #[arg(long, help = "Log file [default: <config dir>/wxboard/wxboard.log]")]
    pub log_file: Option<PathBuf>,

    #[arg(long, conflicts_with = "light", help = "Start in dark mode and remember it")]
    pub dark: bool,

    #[arg(long, help = "Start in light mode and remember it")]
    pub light: bool,
}

impl Args {
    /// Theme override requested on the command line, if any.
    pub fn theme(&self) -> Option<bool> {
        match (self.dark, self.light) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }

    pub fn state_file(&self) -> PathBuf {
        self.state_file
            .clone()
            .unwrap_or_else(|| config_dir().join("state.json"))
    }

    pub fn log_file(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| config_dir().join("wxboard.log"))
    }
}

fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("wxboard")
}
