use ratatui::crossterm::event::KeyEvent;
use std::time::Instant;
use tracing::{debug, info, trace, warn};

use crate::country::{Country, ContinentNames, unique_continents};
use crate::domain::{CTVConfig, CTVError, HELP_TEXT, Message};
use crate::filter::{self, FilterCriteria};
use crate::inputter::{InputResult, Inputter};
use crate::loader::{Loader, PendingLoad};
use crate::pagination::{PageSize, Pagination};
use crate::sort::{self, SortCriteria, SortKey};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Status {
    LOADING,
    READY,
    FAILED,
    QUITTING,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Modus {
    TABLE,
    FILTER,
    CMDINPUT,
    POPUP,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum FilterField {
    #[default]
    States,
    Continent,
}

#[derive(Debug, Default)]
struct FilterPanel {
    shown: bool,
    focus: FilterField,
    draft: FilterCriteria,
    applied: bool, // Only drives the highlight of the filter indicator
}

#[derive(Debug, Clone, PartialEq)]
pub struct PanelView {
    pub states: String,
    pub continent: String,
    pub focus: FilterField,
}

#[derive(Debug, Clone)]
pub struct ColumnHeader {
    pub title: String,
    pub active: bool,
}

/// Everything the UI needs to draw one frame.
pub struct UIData {
    pub name: String,
    pub status: Status,
    pub tick: usize,
    pub filter_enabled: bool,
    pub filter_applied: bool,
    pub panel: Option<PanelView>,
    pub headers: Vec<ColumnHeader>,
    pub rows: Vec<Vec<String>>,
    pub filler_rows: usize,
    pub nrows: usize, // Rows in the filtered set
    pub total_records: usize,
    pub page: usize,
    pub page_count: usize,
    pub page_size: PageSize,
    pub range: (usize, usize),
    pub active_filter: String,
    pub cmdinput: InputResult,
    pub active_cmdinput: bool,
    pub show_popup: bool,
    pub popup_message: String,
    pub status_message: String,
}

impl UIData {
    pub fn empty() -> Self {
        UIData {
            name: String::new(),
            status: Status::LOADING,
            tick: 0,
            filter_enabled: false,
            filter_applied: false,
            panel: None,
            headers: Vec::new(),
            rows: Vec::new(),
            filler_rows: 0,
            nrows: 0,
            total_records: 0,
            page: 0,
            page_count: 0,
            page_size: PageSize::default(),
            range: (0, 0),
            active_filter: String::new(),
            cmdinput: InputResult::default(),
            active_cmdinput: false,
            show_popup: false,
            popup_message: String::new(),
            status_message: String::new(),
        }
    }
}

pub struct Model {
    config: CTVConfig,
    pub status: Status,
    modus: Modus,
    previous_modus: Modus,
    loader: Option<PendingLoad>,
    load_started: bool,
    countries: Vec<Country>,
    continents: Vec<String>,
    criteria: FilterCriteria,
    panel: FilterPanel,
    sort: SortCriteria,
    pagination: Pagination,
    visible: Vec<usize>, // Indices of countries passing the filter, in data order
    ordered: Vec<usize>, // `visible` in sort order
    tick: usize,
    uidata: UIData,
    input: Inputter,
    last_input: InputResult,
    active_cmdinput: bool,
    status_message: String,
}

impl Model {
    pub fn init(config: &CTVConfig) -> Self {
        let mut model = Self {
            config: config.clone(),
            status: Status::LOADING,
            modus: Modus::TABLE,
            previous_modus: Modus::TABLE,
            loader: None,
            load_started: false,
            countries: Vec::new(),
            continents: Vec::new(),
            criteria: FilterCriteria::default(),
            panel: FilterPanel::default(),
            sort: SortCriteria::default(),
            pagination: Pagination::new(config.page_size),
            visible: Vec::new(),
            ordered: Vec::new(),
            tick: 0,
            uidata: UIData::empty(),
            input: Inputter::default(),
            last_input: InputResult::default(),
            active_cmdinput: false,
            status_message: String::new(),
        };
        model.set_status_message("Loading ...");
        model.update_uidata();
        model
    }

    /// Kicks off the one and only data load. Later calls do nothing.
    pub fn start_loading(&mut self) {
        if self.load_started {
            return;
        }
        self.load_started = true;
        info!("Loading {}", self.config.data_path.display());
        self.loader = Some(Loader::spawn(self.config.data_path.clone()));
    }

    fn poll_loader(&mut self) {
        let result = match &self.loader {
            Some(pending) => pending.poll(),
            None => None,
        };
        if let Some(result) = result {
            self.loader = None;
            self.finish_loading(result);
        }
    }

    pub fn finish_loading(&mut self, result: Result<Vec<Country>, CTVError>) {
        if self.status != Status::LOADING {
            warn!("Ignoring load result, status is {:?}", self.status);
            return;
        }
        match result {
            Ok(countries) => {
                self.continents = unique_continents(&countries);
                self.countries = countries;
                self.visible = (0..self.countries.len()).collect();
                self.pagination.set_total(self.visible.len());
                self.status = Status::READY;
                self.set_status_message(format!("Loaded {} countries", self.countries.len()));
                self.recompute();
            }
            Err(e) => {
                self.status = Status::FAILED;
                self.set_status_message(format!("Could not read country data: {e}"));
                self.update_uidata();
            }
        }
    }

    pub fn request_page_size(&mut self, rows: usize) {
        match self.pagination.set_page_size(rows) {
            Ok(size) => {
                debug!("Page size set to {size}");
                self.recompute();
            }
            Err(rejected) => {
                warn!("Ignoring page size {rejected}, keeping {}", self.pagination.size());
                self.set_status_message(format!(
                    "Invalid page size {rejected}, use one of 10, 25, 50, 100"
                ));
                self.update_uidata();
            }
        }
    }

    pub fn get_uidata(&self) -> &UIData {
        &self.uidata
    }

    pub fn raw_keyevents(&self) -> bool {
        self.active_cmdinput
    }

    pub fn filter_enabled(&self) -> bool {
        self.status == Status::READY
    }

    pub fn quit(&mut self) {
        self.status = Status::QUITTING;
    }

    pub fn update(&mut self, message: Option<Message>) -> Result<(), CTVError> {
        self.tick = self.tick.wrapping_add(1);
        self.poll_loader();
        self.uidata.tick = self.tick;

        if let Some(msg) = message {
            if msg == Message::Quit && self.modus != Modus::CMDINPUT {
                self.quit();
                return Ok(());
            }
            match self.modus {
                Modus::TABLE => match msg {
                    Message::Help => self.show_help(),
                    Message::ToggleFilter => self.toggle_filter_panel(),
                    Message::MoveLeft => self.change_page(Pagination::prev_page),
                    Message::MoveRight => self.change_page(Pagination::next_page),
                    Message::MoveBeginning => self.change_page(|p| {
                        p.first_page();
                        true
                    }),
                    Message::MoveEnd => self.change_page(|p| {
                        p.last_page();
                        true
                    }),
                    Message::GrowPageSize => self.change_page_size(true),
                    Message::ShrinkPageSize => self.change_page_size(false),
                    Message::SortBy(key) => self.sort_by(key),
                    _ => (),
                },
                Modus::FILTER => match msg {
                    Message::Help => self.show_help(),
                    Message::ToggleFilter | Message::Exit => self.toggle_filter_panel(),
                    Message::MoveUp | Message::MoveDown => self.switch_filter_field(),
                    Message::MoveLeft => self.cycle_filter_value(false),
                    Message::MoveRight => self.cycle_filter_value(true),
                    Message::Enter => self.apply_filter(),
                    Message::ClearFilter => self.clear_filter(),
                    Message::EnterCommand => self.enter_cmd_mode(),
                    Message::MoveBeginning => self.change_page(|p| {
                        p.first_page();
                        true
                    }),
                    Message::MoveEnd => self.change_page(|p| {
                        p.last_page();
                        true
                    }),
                    Message::GrowPageSize => self.change_page_size(true),
                    Message::ShrinkPageSize => self.change_page_size(false),
                    Message::SortBy(key) => self.sort_by(key),
                    _ => (),
                },
                Modus::POPUP => {
                    if matches!(msg, Message::Exit | Message::Help | Message::Enter) {
                        self.exit_popup()
                    }
                }
                Modus::CMDINPUT => {
                    if let Message::RawKey(key) = msg {
                        self.raw_input(key)
                    }
                }
            }
        }
        Ok(())
    }

    // -------------------- Pipeline ---------------------- //

    /// Re-sorts the filtered rows and rebuilds the current page.
    fn recompute(&mut self) {
        let start_time = Instant::now();
        self.ordered = sort::sort(&self.countries, &self.visible, self.sort);
        debug!(
            "Recomputed {} of {} rows, sort {:?}, page {}/{} in {}us",
            self.ordered.len(),
            self.countries.len(),
            self.sort,
            self.pagination.page() + 1,
            self.pagination.page_count(),
            start_time.elapsed().as_micros()
        );
        self.update_uidata();
    }

    fn apply_filter(&mut self) {
        self.criteria = self.panel.draft.clone();
        self.visible = filter::apply(&self.countries, &self.criteria);
        self.pagination.set_total(self.visible.len());
        self.panel.applied = true;
        info!(
            "Filter [{}] matched {} of {} countries",
            self.criteria.describe(),
            self.visible.len(),
            self.countries.len()
        );
        self.set_status_message(format!("Filter matched {} countries", self.visible.len()));
        self.recompute();
    }

    fn clear_filter(&mut self) {
        self.criteria = FilterCriteria::default();
        self.panel.draft = FilterCriteria::default();
        self.panel.applied = false;
        self.visible = (0..self.countries.len()).collect();
        self.pagination.set_total(self.visible.len());
        self.set_status_message("Filter cleared");
        self.recompute();
    }

    fn sort_by(&mut self, key: SortKey) {
        self.sort.request(key);
        trace!("Sort by {} {:?}", key.field(), self.sort.direction);
        self.recompute();
    }

    fn change_page(&mut self, step: impl FnOnce(&mut Pagination) -> bool) {
        if step(&mut self.pagination) {
            self.update_uidata();
        }
    }

    fn change_page_size(&mut self, grow: bool) {
        if grow {
            self.pagination.grow_page_size();
        } else {
            self.pagination.shrink_page_size();
        }
        self.update_uidata();
    }

    // -------------------- Filter panel ---------------------- //

    fn toggle_filter_panel(&mut self) {
        if !self.filter_enabled() {
            trace!("Filter controls disabled while {:?}", self.status);
            return;
        }
        self.panel.shown = !self.panel.shown;
        self.panel.applied = false;
        self.modus = if self.panel.shown {
            Modus::FILTER
        } else {
            Modus::TABLE
        };
        self.update_uidata();
    }

    fn switch_filter_field(&mut self) {
        self.panel.focus = match self.panel.focus {
            FilterField::States => FilterField::Continent,
            FilterField::Continent => FilterField::States,
        };
        self.update_uidata();
    }

    fn cycle_filter_value(&mut self, forward: bool) {
        match self.panel.focus {
            FilterField::States => {
                let states = self.panel.draft.states;
                self.panel.draft.states = if forward { states.next() } else { states.prev() };
            }
            FilterField::Continent => {
                // Options are "All" followed by every continent present in the data
                let options = self.continents.len() + 1;
                let current = self
                    .continents
                    .iter()
                    .position(|c| *c == self.panel.draft.continent)
                    .map(|idx| idx + 1)
                    .unwrap_or(0);
                let next = if forward {
                    (current + 1) % options
                } else {
                    (current + options - 1) % options
                };
                self.panel.draft.continent = match next {
                    0 => String::new(),
                    idx => self.continents[idx - 1].clone(),
                };
            }
        }
        self.update_uidata();
    }

    fn continent_label(names: &ContinentNames, continent: &str, known: &[String]) -> String {
        if continent.is_empty() {
            "All".to_string()
        } else if known.iter().any(|c| c == continent) {
            names.label(continent).unwrap_or_default().to_string()
        } else {
            format!("contains \"{continent}\"")
        }
    }

    // -------------------- Command input ---------------------- //

    fn enter_cmd_mode(&mut self) {
        trace!("Entering continent input ...");
        self.previous_modus = self.modus;
        self.modus = Modus::CMDINPUT;
        self.active_cmdinput = true;
        self.input.set(&self.panel.draft.continent);
        self.last_input = self.input.get();
        self.update_uidata();
    }

    fn raw_input(&mut self, key: KeyEvent) {
        if self.active_cmdinput {
            self.last_input = self.input.read(key);
            if self.last_input.finished {
                self.handle_cmd_input();
            }
            self.update_uidata();
        }
    }

    fn handle_cmd_input(&mut self) {
        trace!("Handle cmd input {:?}", self.last_input);
        self.active_cmdinput = false;
        self.modus = self.previous_modus;
        self.previous_modus = Modus::CMDINPUT;
        if !self.last_input.canceled {
            self.panel.draft.continent = self.last_input.input.trim().to_string();
            self.panel.focus = FilterField::Continent;
        }
    }

    // -------------------- Popup ---------------------- //

    fn show_help(&mut self) {
        self.previous_modus = self.modus;
        self.modus = Modus::POPUP;
        self.update_uidata();
    }

    fn exit_popup(&mut self) {
        trace!("Close popup ...");
        self.modus = self.previous_modus;
        self.previous_modus = Modus::POPUP;
        self.update_uidata();
    }

    // -------------------- UI data ---------------------- //

    fn set_status_message(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
    }

    fn update_uidata(&mut self) {
        let page = self.pagination.slice(&self.ordered);
        let rows: Vec<Vec<String>> = page
            .iter()
            .map(|&idx| {
                let c = &self.countries[idx];
                vec![
                    c.name.clone(),
                    c.code.clone(),
                    c.name_un.clone(),
                    c.continent.clone(),
                    if c.has_states { "Yes" } else { "No" }.to_string(),
                ]
            })
            .collect();
        let headers = SortKey::COLUMNS
            .iter()
            .map(|key| {
                let active = *key == self.sort.key;
                let title = if active {
                    format!("{} {}", key.title(), self.sort.direction.arrow())
                } else {
                    key.title().to_string()
                };
                ColumnHeader { title, active }
            })
            .collect();
        let panel = self.panel.shown.then(|| PanelView {
            states: self.panel.draft.states.label().to_string(),
            continent: Self::continent_label(
                &self.config.continent_names,
                &self.panel.draft.continent,
                &self.continents,
            ),
            focus: self.panel.focus,
        });

        self.uidata = UIData {
            name: "Country Data".to_string(),
            status: self.status,
            tick: self.tick,
            filter_enabled: self.filter_enabled(),
            filter_applied: self.panel.applied,
            panel,
            headers,
            filler_rows: self.pagination.filler_rows(rows.len()),
            rows,
            nrows: self.pagination.total(),
            total_records: self.countries.len(),
            page: self.pagination.page(),
            page_count: self.pagination.page_count(),
            page_size: self.pagination.size(),
            range: self.pagination.range(),
            active_filter: self.criteria.describe(),
            cmdinput: self.last_input.clone(),
            active_cmdinput: self.active_cmdinput,
            show_popup: self.modus == Modus::POPUP,
            popup_message: HELP_TEXT.to_string(),
            status_message: self.status_message.clone(),
        };
    }
}

#[cfg(test)]
impl Model {
    pub fn modus(&self) -> Modus {
        self.modus
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    pub fn sort_criteria(&self) -> SortCriteria {
        self.sort
    }

    pub fn filter_criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn draft_criteria(&self) -> &FilterCriteria {
        &self.panel.draft
    }

    pub fn filter_applied(&self) -> bool {
        self.panel.applied
    }

    pub fn filter_panel_shown(&self) -> bool {
        self.panel.shown
    }

    pub fn visible_rows(&self) -> &[usize] {
        &self.visible
    }

    pub fn page_rows(&self) -> Vec<&Country> {
        self.pagination
            .slice(&self.ordered)
            .iter()
            .map(|&idx| &self.countries[idx])
            .collect()
    }
}
