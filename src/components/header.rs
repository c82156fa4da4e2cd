use artbox::{fonts, integrations::ratatui::ArtBox, Alignment as ArtAlignment, Renderer};
use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tui_dispatch::EventKind;

use super::{
    Component, ACCENT_GOLD, ACCENT_TEAL, BG_PANEL, MONO_BG, MONO_FG, TEXT_DIM, TEXT_MAIN,
};
use crate::action::Action;
use crate::state::DisplayMode;

pub const TITLE: &str = "Pokemon Explorer";
pub const SEARCH_PLACEHOLDER: &str = "Search Pokemon...";

/// Rows the header needs: a bordered title/search block in modern mode,
/// FIGlet title plus the bracketed search line in ascii mode.
pub fn header_height(mode: DisplayMode) -> u16 {
    match mode {
        DisplayMode::Modern => 4,
        DisplayMode::Ascii => 9,
    }
}

pub struct Header;

pub struct HeaderProps<'a> {
    pub mode: DisplayMode,
    pub query: &'a str,
    pub search_active: bool,
    pub is_focused: bool,
}

impl Header {
    fn search_text(props: &HeaderProps<'_>) -> String {
        match (props.query.is_empty(), props.search_active) {
            (true, true) => "_".to_string(),
            (true, false) => SEARCH_PLACEHOLDER.to_string(),
            (false, true) => format!("{}_", props.query),
            (false, false) => props.query.to_string(),
        }
    }

    fn render_modern(&self, frame: &mut Frame, area: Rect, props: &HeaderProps<'_>) {
        let search_style = if props.query.is_empty() && !props.search_active {
            Style::default().fg(TEXT_DIM)
        } else {
            Style::default().fg(ACCENT_TEAL)
        };
        let lines = vec![
            Line::from(Span::styled(
                TITLE,
                Style::default().fg(ACCENT_GOLD).add_modifier(Modifier::BOLD),
            )),
            Line::from(vec![
                Span::styled("/ ", Style::default().fg(ACCENT_TEAL)),
                Span::styled(Self::search_text(props), search_style),
            ]),
        ];
        let border = if props.search_active {
            ACCENT_TEAL
        } else {
            TEXT_DIM
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN));
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn render_ascii(&self, frame: &mut Frame, area: Rect, props: &HeaderProps<'_>) {
        let base = Style::default().bg(MONO_BG).fg(MONO_FG);
        frame.render_widget(Block::default().style(base), area);

        let chunks = Layout::vertical([
            Constraint::Fill(1),   // FIGlet title
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Search
        ])
        .split(area);

        let renderer = Renderer::new(fonts::stack(&["terminus", "miniwi"]))
            .with_plain_fallback()
            .with_alignment(ArtAlignment::Center);
        frame.render_widget(ArtBox::new(&renderer, "POKEDEX"), chunks[0]);

        let search = Line::from(vec![
            Span::styled("[/] ", base),
            Span::styled(
                format!("[ {} ]", Self::search_text(props)),
                base.add_modifier(if props.search_active {
                    Modifier::BOLD
                } else {
                    Modifier::empty()
                }),
            ),
        ]);
        frame.render_widget(Paragraph::new(search).style(base), chunks[2]);
    }
}

impl Component<Action> for Header {
    type Props<'a> = HeaderProps<'a>;

    /// Keys while the search field is focused.
    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused || !props.search_active {
            return None;
        }
        let EventKind::Key(key) = event else {
            return None;
        };
        match key.code {
            KeyCode::Esc => Some(Action::SearchCancel),
            KeyCode::Enter => Some(Action::SearchSubmit),
            KeyCode::Backspace => Some(Action::SearchBackspace),
            KeyCode::Char(ch) => Some(Action::SearchInput(ch)),
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        match props.mode {
            DisplayMode::Modern => self.render_modern(frame, area, &props),
            DisplayMode::Ascii => self.render_ascii(frame, area, &props),
        }
    }
}
