use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::{self, File};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::{error::Error, io};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod app;
mod cli;
mod dashboard;
mod history;
mod owm;
mod store;
mod suggest;
mod theme;
mod units;
mod weather;

use crate::app::{run_app, App};
use crate::cli::Args;
use crate::dashboard::Dashboard;
use crate::owm::OpenWeatherMap;
use crate::store::Store;

fn init_logging(path: &Path) -> Result<(), Box<dyn Error>> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let file = File::options().create(true).append(true).open(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_logging(&args.log_file())?;

    let api = OpenWeatherMap::new(&args.base_url, &args.api_key)?;
    let mut dashboard = Dashboard::new(Store::open(args.state_file()));
    if let Some(dark) = args.theme() {
        dashboard.set_dark_mode(dark);
    }
    info!(base_url = %args.base_url, "starting");

    // setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // create app and run it
    let res = run_app(&mut terminal, App::new(dashboard), Arc::new(api), args.city);

    // restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{:?}", err)
    }

    Ok(())
}
