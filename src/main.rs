use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Mutex;

use clap::Parser;
use ratatui::DefaultTerminal;
use tracing::info;
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, prelude::*};

mod controller;
mod country;
mod domain;
mod filter;
mod inputter;
mod loader;
mod model;
mod pagination;
mod sort;
mod ui;

use controller::Controller;
use country::{Continent, ContinentNames};
use domain::{CTVConfig, CTVError};
use model::{Model, Status};
use ui::TableUI;

/// Browse, filter, sort and page through a list of countries.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Country data file, a JSON object with a `countries` array
    #[arg(default_value = "data/countryData.json")]
    data: String,

    /// Rows per page, one of 10, 25, 50 or 100
    #[arg(short = 'n', long)]
    page_size: Option<usize>,

    /// How long to wait for key events before redrawing, in milliseconds
    #[arg(long, default_value_t = 100)]
    poll: u64,

    /// Write logs to this file (filter with RUST_LOG)
    #[arg(long)]
    log_file: Option<String>,

    /// Override a continent label, e.g. `--label EU=Europa`
    #[arg(long = "label", value_parser = ContinentNames::parse_override)]
    labels: Vec<(Continent, String)>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(args) {
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
        Ok(_) => ExitCode::SUCCESS,
    }
}

fn expand_path(raw: &str) -> Result<PathBuf, CTVError> {
    let expanded = shellexpand::full(raw).map_err(|e| CTVError::InvalidPath(e.to_string()))?;
    Ok(PathBuf::from(expanded.as_ref()))
}

// The terminal belongs to the UI, so logs only go to a file when asked for.
fn init_logging(log_file: Option<&str>) -> Result<(), CTVError> {
    let Some(path) = log_file else {
        return Ok(());
    };
    let file = File::create(expand_path(path)?)?;
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false),
        )
        .with(ErrorLayer::default())
        .try_init()
        .map_err(|e| CTVError::Logging(e.to_string()))
}

fn run(args: Args) -> Result<(), CTVError> {
    init_logging(args.log_file.as_deref())?;
    info!("Starting ctv!");

    let mut continent_names = ContinentNames::default();
    for (continent, name) in args.labels {
        info!("Label for {continent}: {name}");
        continent_names = continent_names.with_name(continent, name);
    }

    let cfg = CTVConfig::default()
        .with_data_path(expand_path(&args.data)?)
        .with_event_poll_time(args.poll)
        .with_continent_names(continent_names);

    let mut model = Model::init(&cfg);
    if let Some(rows) = args.page_size {
        model.request_page_size(rows);
    }
    model.start_loading();

    let ui = TableUI::new();
    let controller = Controller::new(&cfg);

    let mut terminal = ratatui::init();
    let result = event_loop(&mut terminal, &mut model, &ui, &controller);
    ratatui::restore();
    result
}

fn event_loop(
    terminal: &mut DefaultTerminal,
    model: &mut Model,
    ui: &TableUI,
    controller: &Controller,
) -> Result<(), CTVError> {
    while model.status != Status::QUITTING {
        // Render the current view
        terminal.draw(|f| ui.draw(model.get_uidata(), f))?;

        // Handle events and map to a Message
        let message = controller.handle_event(model)?;
        model.update(message)?;
    }
    info!("Quitting ...");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_defaults() {
        let args = Args::try_parse_from(["ctv"]).unwrap();
        assert_eq!(args.data, "data/countryData.json");
        assert_eq!(args.poll, 100);
        assert!(args.page_size.is_none());
        assert!(args.labels.is_empty());
    }

    #[test]
    fn parses_labels_and_page_size() {
        let args = Args::try_parse_from([
            "ctv",
            "countries.json",
            "-n",
            "25",
            "--label",
            "EU=Europa",
            "--label",
            "AF=Afrika",
        ])
        .unwrap();
        assert_eq!(args.page_size, Some(25));
        assert_eq!(
            args.labels,
            vec![
                (Continent::Europe, "Europa".to_string()),
                (Continent::Africa, "Afrika".to_string())
            ]
        );
    }

    #[test]
    fn rejects_unknown_label_code() {
        assert!(Args::try_parse_from(["ctv", "--label", "XX=Nowhere"]).is_err());
    }

    #[test]
    fn expands_paths() {
        assert_eq!(expand_path("plain.json").unwrap(), PathBuf::from("plain.json"));
        let err = expand_path("$CTV_SURELY_UNDEFINED_VARIABLE/countries.json").unwrap_err();
        assert!(matches!(err, CTVError::InvalidPath(_)));
    }
}
