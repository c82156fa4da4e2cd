use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tui_dispatch::EventKind;
use tui_dispatch_components::{
    BaseStyle, Padding, SelectList, SelectListBehavior, SelectListProps, SelectListStyle,
    SelectionStyle,
};

use super::{
    dex_number, format_name, type_color, Component, ACCENT_GOLD, BG_HIGHLIGHT, BG_PANEL, MONO_BG,
    MONO_FG, TEXT_DIM, TEXT_MAIN,
};
use crate::action::Action;
use crate::ascii::type_badge;
use crate::state::{AppState, DisplayMode, Pokemon};

pub const LOADING_MORE: &str = "Loading more Pokemon...";
pub const ALL_LOADED: &str = "All Pokemon loaded";

const PAGE_JUMP: i16 = 10;
const NAME_WIDTH: usize = 14;

pub struct Roster {
    list: SelectList,
}

pub struct RosterProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

impl Default for Roster {
    fn default() -> Self {
        Self {
            list: SelectList::new(),
        }
    }
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }
}

pub fn modern_row(pokemon: &Pokemon) -> Line<'static> {
    let mut spans = vec![
        Span::styled(dex_number(pokemon.id), Style::default().fg(TEXT_DIM)),
        Span::raw("  "),
        Span::styled(
            format!("{:<width$}", format_name(&pokemon.name), width = NAME_WIDTH),
            Style::default().add_modifier(Modifier::BOLD),
        ),
    ];
    for name in &pokemon.types {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(name.clone(), Style::default().fg(type_color(name))));
    }
    Line::from(spans)
}

pub fn ascii_row(pokemon: &Pokemon) -> Line<'static> {
    Line::from(format!(
        "║ {} {} [{}] ║",
        dex_number(pokemon.id),
        pokemon.name.to_uppercase(),
        type_badge(&pokemon.types)
    ))
}

/// Line shown under the list: paging progress in browse mode, the empty
/// result message in search mode.
pub fn footer_text(state: &AppState) -> Option<String> {
    let visible = state.visible().len();
    if state.is_search_mode() {
        let settled = state.names.is_loaded() && state.pending_in_roster() == 0;
        if visible == 0 && settled {
            return Some(format!(
                "No Pokemon found matching \"{}\"",
                state.search.query.trim()
            ));
        }
        return None;
    }
    if state.pager.is_in_flight() && state.pager.total() > 0 {
        Some(LOADING_MORE.to_string())
    } else if !state.pager.has_more && visible > 0 {
        Some(ALL_LOADED.to_string())
    } else {
        None
    }
}

fn list_style(mode: DisplayMode) -> SelectListStyle {
    let (fg, selection) = match mode {
        DisplayMode::Modern => (
            TEXT_MAIN,
            Style::default()
                .bg(BG_HIGHLIGHT)
                .fg(TEXT_MAIN)
                .add_modifier(Modifier::BOLD),
        ),
        DisplayMode::Ascii => (
            MONO_FG,
            Style::default().add_modifier(Modifier::REVERSED),
        ),
    };
    SelectListStyle {
        base: BaseStyle {
            border: None,
            padding: Padding::xy(1, 0),
            bg: None,
            fg: Some(fg),
        },
        selection: SelectionStyle {
            style: Some(selection),
            marker: None,
            disabled: false,
        },
        ..SelectListStyle::default()
    }
}

fn items(state: &AppState) -> Vec<Line<'static>> {
    let row: fn(&Pokemon) -> Line<'static> = match state.mode {
        DisplayMode::Modern => modern_row,
        DisplayMode::Ascii => ascii_row,
    };
    state.visible().into_iter().map(row).collect()
}

impl Component<Action> for Roster {
    type Props<'a> = RosterProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return Vec::new();
        }
        let action = match event {
            EventKind::Key(key) => match key.code {
                KeyCode::Down | KeyCode::Char('j') => Some(Action::SelectionMove(1)),
                KeyCode::Up | KeyCode::Char('k') => Some(Action::SelectionMove(-1)),
                KeyCode::PageDown => Some(Action::SelectionMove(PAGE_JUMP)),
                KeyCode::PageUp => Some(Action::SelectionMove(-PAGE_JUMP)),
                KeyCode::Home | KeyCode::Char('g') => Some(Action::SelectionJumpTop),
                KeyCode::End | KeyCode::Char('G') => Some(Action::SelectionJumpBottom),
                KeyCode::Enter => Some(Action::DetailOpen),
                KeyCode::Char('n') => Some(Action::ListLoadMore),
                _ => None,
            },
            EventKind::Scroll { delta, .. } => Some(Action::SelectionMove((*delta * 3) as i16)),
            _ => None,
        };
        if let Some(action) = action {
            return vec![action];
        }

        let items = items(props.state);
        let list_props = SelectListProps {
            items: &items,
            count: items.len(),
            selected: props.state.selected_index.min(items.len().saturating_sub(1)),
            is_focused: true,
            style: list_style(props.state.mode),
            behavior: SelectListBehavior {
                show_scrollbar: true,
                wrap_navigation: false,
            },
            on_select: Action::DexSelect,
            render_item: &|item| item.clone(),
        };
        self.list.handle_event(event, list_props).into_iter().collect()
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let state = props.state;
        let ascii = state.mode.is_ascii();
        let (base, border) = if ascii {
            (Style::default().bg(MONO_BG).fg(MONO_FG), Style::default().fg(MONO_FG))
        } else {
            (
                Style::default().bg(BG_PANEL).fg(TEXT_MAIN),
                Style::default().fg(if props.is_focused { ACCENT_GOLD } else { TEXT_DIM }),
            )
        };
        let title = if state.is_search_mode() {
            format!(" Results ({}) ", state.visible().len())
        } else {
            format!(" Pokemon ({}) ", state.visible().len())
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_set(if ascii {
                ratatui::symbols::border::DOUBLE
            } else {
                ratatui::symbols::border::ROUNDED
            })
            .title(title)
            .style(base)
            .border_style(border);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(inner);

        let items = items(state);
        if items.is_empty() {
            let text = match footer_text(state) {
                Some(text) => text,
                None if state.is_list_loading() => {
                    let text = if ascii { "[...] Loading..." } else { "Loading..." };
                    text.to_string()
                }
                None => String::new(),
            };
            let text = if ascii && !text.is_empty() && !text.starts_with('[') {
                format!("[ {text} ]")
            } else {
                text
            };
            frame.render_widget(
                Paragraph::new(text).alignment(Alignment::Center).style(base),
                chunks[0],
            );
            return;
        }

        let list_props = SelectListProps {
            items: &items,
            count: items.len(),
            selected: state.selected_index.min(items.len().saturating_sub(1)),
            is_focused: props.is_focused,
            style: list_style(state.mode),
            behavior: SelectListBehavior {
                show_scrollbar: true,
                wrap_navigation: false,
            },
            on_select: Action::DexSelect,
            render_item: &|item| item.clone(),
        };
        self.list.render(frame, chunks[0], list_props);

        if let Some(text) = footer_text(state) {
            let text = if ascii && text == LOADING_MORE {
                format!("[...] {text}")
            } else {
                text
            };
            frame.render_widget(
                Paragraph::new(text)
                    .alignment(Alignment::Center)
                    .style(Style::default().fg(if ascii { MONO_FG } else { TEXT_DIM })),
                chunks[1],
            );
        }
    }
}
