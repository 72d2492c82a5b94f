use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    symbols::border,
    text::{Line, Span, Text},
    widgets::{Block, Cell, Clear, Paragraph, Row, Table},
};

use crate::model::{FilterField, PanelView, Status, UIData};

pub const PANEL_HEIGHT: u16 = 5;
pub const FOOTER_HEIGHT: u16 = 1;
pub const CMDLINE_HEIGHT: u16 = 1;

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

#[derive(Debug, Default)]
pub struct TableUI;

impl TableUI {
    pub fn new() -> Self {
        Self
    }

    pub fn draw(&self, uidata: &UIData, frame: &mut Frame) {
        let outer = Block::bordered()
            .title(Line::from(format!(" {} ", uidata.name).bold()).centered())
            .title_top(Self::filter_indicator(uidata).right_aligned())
            .title_bottom(Self::instructions().centered())
            .border_set(border::THICK);
        let inner = outer.inner(frame.area());
        frame.render_widget(outer, frame.area());

        let panel_height = if uidata.panel.is_some() { PANEL_HEIGHT } else { 0 };
        let [panel_area, body_area, footer_area, cmdline_area] = Layout::vertical([
            Constraint::Length(panel_height),
            Constraint::Min(3),
            Constraint::Length(FOOTER_HEIGHT),
            Constraint::Length(CMDLINE_HEIGHT),
        ])
        .areas(inner);

        if let Some(panel) = &uidata.panel {
            Self::draw_panel(panel, frame, panel_area);
        }

        match uidata.status {
            Status::LOADING => Self::draw_notice(
                frame,
                body_area,
                Line::from(format!("Loading {}", SPINNER[uidata.tick % SPINNER.len()])),
            ),
            Status::FAILED => Self::draw_notice(
                frame,
                body_area,
                Line::from("Failed to load country data.".red().bold()),
            ),
            Status::READY | Status::QUITTING => {
                if uidata.nrows == 0 {
                    Self::draw_notice(frame, body_area, Line::from("No data to display."));
                } else {
                    Self::draw_table(uidata, frame, body_area);
                    Self::draw_footer(uidata, frame, footer_area);
                }
            }
        }

        Self::draw_cmdline(uidata, frame, cmdline_area);

        if uidata.show_popup {
            Self::draw_popup(&uidata.popup_message, frame);
        }
    }

    fn filter_indicator(uidata: &UIData) -> Line<'static> {
        let style = if !uidata.filter_enabled {
            Style::new().fg(Color::DarkGray)
        } else if uidata.filter_applied {
            Style::new().fg(Color::White).bg(Color::Blue).bold()
        } else {
            Style::new().fg(Color::White).bg(Color::Gray)
        };
        Line::from(vec![Span::styled(" [f] Filter ", style), " ".into()])
    }

    fn instructions() -> Line<'static> {
        Line::from(vec![
            " Page ".into(),
            "<←/→>".blue().bold(),
            " Rows ".into(),
            "<+/->".blue().bold(),
            " Sort ".into(),
            "<1-5>".blue().bold(),
            " Help ".into(),
            "<?>".blue().bold(),
            " Quit ".into(),
            "<Q> ".blue().bold(),
        ])
    }

    fn draw_notice(frame: &mut Frame, area: Rect, line: Line) {
        let [row] = Layout::vertical([Constraint::Length(1)])
            .flex(Flex::Center)
            .areas(area);
        frame.render_widget(Paragraph::new(line).centered(), row);
    }

    fn draw_panel(panel: &PanelView, frame: &mut Frame, area: Rect) {
        let field = |label: &str, value: &str, focused: bool| {
            let value_style = if focused {
                Style::new().add_modifier(Modifier::REVERSED)
            } else {
                Style::new()
            };
            Line::from(vec![
                Span::raw(format!("{label:<20}")),
                Span::styled(format!("< {value} >"), value_style),
            ])
        };
        let text = Text::from(vec![
            field(
                "Filter by States",
                &panel.states,
                panel.focus == FilterField::States,
            ),
            field(
                "Filter by Continent",
                &panel.continent,
                panel.focus == FilterField::Continent,
            ),
            Line::from(vec![
                " Apply Filter ".white().on_blue(),
                " <Enter>  ".into(),
                " Clear Filter ".white().on_dark_gray(),
                " <c>  ".into(),
                "type continent </>".into(),
            ]),
        ]);
        let block = Block::bordered().title(" Filter ");
        frame.render_widget(Paragraph::new(text).block(block), area);
    }

    fn draw_table(uidata: &UIData, frame: &mut Frame, area: Rect) {
        let header = Row::new(uidata.headers.iter().map(|h| {
            let style = if h.active {
                Style::new().bold().underlined()
            } else {
                Style::new().bold()
            };
            Cell::from(h.title.clone()).style(style)
        }))
        .style(Style::new().fg(Color::Yellow));

        // Short pages are padded so the table keeps its height
        let rows = uidata
            .rows
            .iter()
            .map(|r| Row::new(r.clone()))
            .chain((0..uidata.filler_rows).map(|_| Row::new(vec![String::new(); 5])));

        let widths = [
            Constraint::Fill(3),
            Constraint::Length(6),
            Constraint::Fill(4),
            Constraint::Length(11),
            Constraint::Length(12),
        ];
        let table = Table::new(rows, widths).header(header).column_spacing(1);
        frame.render_widget(table, area);
    }

    fn draw_footer(uidata: &UIData, frame: &mut Frame, area: Rect) {
        let (first, last) = uidata.range;
        let mut spans = vec![
            "Rows per page: ".into(),
            uidata.page_size.to_string().bold(),
            format!("   {first}–{last} of {}", uidata.nrows).into(),
            format!("   Page {}/{}", uidata.page + 1, uidata.page_count).into(),
        ];
        if uidata.nrows != uidata.total_records {
            spans.push(format!("   (filtered from {})", uidata.total_records).into());
        }
        spans.push(format!("   Filter: {}", uidata.active_filter).dark_gray());
        frame.render_widget(Paragraph::new(Line::from(spans)).right_aligned(), area);
    }

    fn draw_cmdline(uidata: &UIData, frame: &mut Frame, area: Rect) {
        if uidata.active_cmdinput {
            let prompt = "Continent: ";
            let line = Line::from(vec![
                prompt.yellow().bold(),
                Span::raw(uidata.cmdinput.input.clone()),
            ]);
            frame.render_widget(Paragraph::new(line), area);
            let offset =
                u16::try_from(prompt.len() + uidata.cmdinput.cursor_pos).unwrap_or(u16::MAX);
            let x = area.x.saturating_add(offset);
            frame.set_cursor_position((x.min(area.right().saturating_sub(1)), area.y));
        } else {
            frame.render_widget(
                Paragraph::new(uidata.status_message.clone().dark_gray()),
                area,
            );
        }
    }

    fn draw_popup(message: &str, frame: &mut Frame) {
        let area = Self::popup_area(frame.area(), 60, 80);
        let block = Block::bordered()
            .title(Line::from(" Help ".bold()).centered())
            .title_bottom(Line::from(" <Esc> close ").centered())
            .border_set(border::ROUNDED);
        frame.render_widget(Clear, area);
        frame.render_widget(Paragraph::new(message.to_string()).block(block), area);
    }

    fn popup_area(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
        let [area] = Layout::vertical([Constraint::Percentage(percent_y)])
            .flex(Flex::Center)
            .areas(area);
        let [area] = Layout::horizontal([Constraint::Percentage(percent_x)])
            .flex(Flex::Center)
            .areas(area);
        area
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::country::country;
    use crate::domain::{CTVConfig, CTVError, Message};
    use crate::model::Model;
    use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::{Terminal, backend::TestBackend};

    fn screen(model: &Model) -> String {
        let mut terminal = Terminal::new(TestBackend::new(110, 30)).unwrap();
        let ui = TableUI::new();
        terminal.draw(|f| ui.draw(model.get_uidata(), f)).unwrap();
        let buffer = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    fn ready() -> Model {
        let mut model = Model::init(&CTVConfig::default());
        model.finish_loading(Ok(vec![
            country("JP", "Japan", "AS", false),
            country("FR", "French Republic", "EU", false),
            country("IN", "Republic of India", "AS", true),
        ]));
        model
    }

    #[test]
    fn renders_busy_indicator_while_loading() {
        let model = Model::init(&CTVConfig::default());
        let out = screen(&model);
        assert!(out.contains("Loading"));
        assert!(!out.contains("Country NameUn"));
    }

    #[test]
    fn renders_failure_distinct_from_empty() {
        let mut model = Model::init(&CTVConfig::default());
        model.finish_loading(Err(CTVError::LoadingFailed("gone".into())));
        let out = screen(&model);
        assert!(out.contains("Failed to load country data."));
        assert!(!out.contains("No data to display."));
        assert!(!out.contains("Loading"));
    }

    #[test]
    fn renders_table_with_sort_marker_and_summary() {
        let model = ready();
        let out = screen(&model);
        assert!(out.contains("Country NameUn ▲"));
        assert!(out.contains("French Republic"));
        assert!(out.contains("1–3 of 3"));
        assert!(out.contains("Page 1/1"));
        let french = out.find("French Republic").unwrap();
        let japan = out.find("Japan (short)").unwrap();
        assert!(french < japan);
    }

    #[test]
    fn renders_no_data_notice_instead_of_table() {
        let mut model = ready();
        model.update(Some(Message::ToggleFilter)).unwrap();
        model.update(Some(Message::MoveRight)).unwrap();
        model.update(Some(Message::MoveDown)).unwrap();
        model.update(Some(Message::MoveRight)).unwrap();
        model.update(Some(Message::MoveRight)).unwrap();
        model.update(Some(Message::Enter)).unwrap();
        let out = screen(&model);
        assert!(out.contains("No data to display."));
        assert!(!out.contains("Country NameUn"));
    }

    #[test]
    fn renders_filter_panel_with_continent_label() {
        let mut model = ready();
        model.update(Some(Message::ToggleFilter)).unwrap();
        model.update(Some(Message::MoveDown)).unwrap();
        model.update(Some(Message::MoveRight)).unwrap();
        let out = screen(&model);
        assert!(out.contains("Filter by States"));
        assert!(out.contains("< Asia >"));
    }

    #[test]
    fn long_continent_input_keeps_cursor_on_screen() {
        let mut model = ready();
        model.update(Some(Message::ToggleFilter)).unwrap();
        model.update(Some(Message::EnterCommand)).unwrap();
        for _ in 0..300 {
            let key = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE);
            model.update(Some(Message::RawKey(key))).unwrap();
        }
        assert_eq!(model.get_uidata().cmdinput.cursor_pos, 300);

        let mut terminal = Terminal::new(TestBackend::new(110, 30)).unwrap();
        let ui = TableUI::new();
        terminal.draw(|f| ui.draw(model.get_uidata(), f)).unwrap();
        let cursor = terminal.get_cursor_position().unwrap();
        assert_eq!((cursor.x, cursor.y), (108, 28));
    }

    #[test]
    fn renders_help_popup() {
        let mut model = ready();
        model.update(Some(Message::Help)).unwrap();
        let out = screen(&model);
        assert!(out.contains("Help"));
        assert!(out.contains("first/last page"));
    }
}
