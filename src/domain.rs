use std::io::Error;
use std::path::PathBuf;

use derive_setters::Setters;
use ratatui::crossterm::event::KeyEvent;
use thiserror::Error;

use crate::country::ContinentNames;
use crate::pagination::PageSize;
use crate::sort::SortKey;

#[derive(Debug, Error)]
pub enum CTVError {
    #[error("io error: {0}")]
    IoError(#[from] Error),
    #[error("invalid country data: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("loading failed: {0}")]
    LoadingFailed(String),
    #[error("file not found: {0}")]
    FileNotFound(PathBuf),
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),
    #[error("invalid path: {0}")]
    InvalidPath(String),
    #[error("logging setup failed: {0}")]
    Logging(String),
}

#[derive(Debug, Clone, Setters)]
#[setters(prefix = "with_")]
pub struct CTVConfig {
    pub data_path: PathBuf,
    pub event_poll_time: u64,
    pub page_size: PageSize,
    pub continent_names: ContinentNames,
}

impl Default for CTVConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data/countryData.json"),
            event_poll_time: 100,
            page_size: PageSize::default(),
            continent_names: ContinentNames::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Quit,
    Help,
    Exit,
    Enter,
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    MoveBeginning,
    MoveEnd,
    ToggleFilter,
    ClearFilter,
    EnterCommand,
    GrowPageSize,
    ShrinkPageSize,
    SortBy(SortKey),
    RawKey(KeyEvent),
}

pub const HELP_TEXT: &str = "\
Navigation
  ←/→, PgUp/PgDn   previous/next page
  Home/End         first/last page
  +/-              more/fewer rows per page
  1..5             sort by column (again to reverse)

Filter panel
  f                show/hide the filter panel
  ↑/↓              switch between fields
  ←/→              change the selected value
  /                type a continent filter
  Enter            apply filter
  c                clear filter

General
  ?                this help
  Esc              close popup / leave panel
  q                quit";
