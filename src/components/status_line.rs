use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::Span,
    widgets::Borders,
    Frame,
};
use tui_dispatch::EventKind;
use tui_dispatch_components::{
    BaseStyle, BorderStyle, Padding, StatusBar, StatusBarHint, StatusBarItem, StatusBarProps,
    StatusBarSection, StatusBarStyle,
};

use super::{
    Component, ACCENT_GOLD, ACCENT_RED, ACCENT_TEAL, BG_PANEL, MONO_BG, MONO_FG, TEXT_DIM,
    TEXT_MAIN,
};
use crate::action::Action;
use crate::state::{AppState, DisplayMode};

pub struct StatusLine {
    bar: StatusBar,
}

pub struct StatusLineProps<'a> {
    pub state: &'a AppState,
}

impl Default for StatusLine {
    fn default() -> Self {
        Self {
            bar: StatusBar::new(),
        }
    }
}

impl StatusLine {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Load progress, error text, or nothing when the roster is settled.
pub fn status_message(state: &AppState) -> Option<(String, bool)> {
    if let Some(error) = state.load_error() {
        return Some((format!("Error loading data: {error}"), true));
    }
    let mut parts = Vec::new();
    let pending = state.pending_in_roster();
    if pending > 0 {
        parts.push(format!("Loading {pending} pokemon..."));
    }
    let failed = state.failed_in_roster();
    if failed > 0 {
        parts.push(format!("{failed} failed to load"));
    }
    if parts.is_empty() {
        None
    } else {
        Some((parts.join("  "), failed > 0))
    }
}

pub fn hints(state: &AppState) -> Vec<StatusBarHint<'static>> {
    if state.search.active {
        return vec![
            StatusBarHint::new("Enter", "Apply"),
            StatusBarHint::new("Esc", "Cancel"),
            StatusBarHint::new("Bksp", "Delete"),
        ];
    }
    if state.detail.is_some() {
        return vec![
            StatusBarHint::new("Esc", "Close"),
            StatusBarHint::new("m", "Mode"),
            StatusBarHint::new("q", "Quit"),
        ];
    }
    let mut hints = vec![
        StatusBarHint::new("j/k", "Move"),
        StatusBarHint::new("Enter", "Details"),
        StatusBarHint::new("/", "Search"),
    ];
    if !state.is_search_mode() && state.pager.has_more {
        hints.push(StatusBarHint::new("n", "More"));
    }
    hints.push(StatusBarHint::new("m", "Mode"));
    hints.push(StatusBarHint::new("q", "Quit"));
    hints
}

fn bar_style(mode: DisplayMode) -> StatusBarStyle {
    match mode {
        DisplayMode::Modern => StatusBarStyle {
            base: BaseStyle {
                border: Some(BorderStyle {
                    borders: Borders::ALL,
                    style: Style::default().fg(TEXT_DIM),
                    focused_style: Some(Style::default().fg(ACCENT_TEAL)),
                }),
                padding: Padding::xy(1, 0),
                bg: Some(BG_PANEL),
                fg: Some(TEXT_MAIN),
            },
            text: Style::default().fg(TEXT_DIM),
            hint_key: Style::default()
                .fg(ACCENT_TEAL)
                .add_modifier(Modifier::BOLD),
            hint_label: Style::default().fg(TEXT_DIM),
            separator: Style::default().fg(TEXT_DIM),
        },
        DisplayMode::Ascii => {
            let mono = Style::default().fg(MONO_FG);
            StatusBarStyle {
                base: BaseStyle {
                    border: Some(BorderStyle {
                        borders: Borders::ALL,
                        style: mono,
                        focused_style: None,
                    }),
                    padding: Padding::xy(1, 0),
                    bg: Some(MONO_BG),
                    fg: Some(MONO_FG),
                },
                text: mono,
                hint_key: mono.add_modifier(Modifier::BOLD),
                hint_label: mono,
                separator: mono,
            }
        }
    }
}

impl Component<Action> for StatusLine {
    type Props<'a> = StatusLineProps<'a>;

    fn handle_event(
        &mut self,
        _event: &EventKind,
        _props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        None
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let state = props.state;
        let ascii = state.mode.is_ascii();
        let hints = hints(state);

        let message = status_message(state);
        let message_items: Vec<StatusBarItem<'_>> = match &message {
            Some((text, is_error)) => {
                let color = match (ascii, is_error) {
                    (true, _) => MONO_FG,
                    (false, true) => ACCENT_RED,
                    (false, false) => ACCENT_GOLD,
                };
                vec![StatusBarItem::span(Span::styled(
                    text.as_str(),
                    Style::default().fg(color),
                ))]
            }
            None => Vec::new(),
        };

        let mode_label = if ascii {
            format!("[{}]", state.mode.label())
        } else {
            state.mode.label().to_string()
        };
        let mode_items = [StatusBarItem::span(Span::styled(
            mode_label.as_str(),
            Style::default().fg(if ascii { MONO_FG } else { ACCENT_TEAL }),
        ))];

        let left = if message_items.is_empty() {
            StatusBarSection::empty()
        } else {
            StatusBarSection::items(&message_items)
        };

        let props = StatusBarProps {
            left,
            center: StatusBarSection::hints(&hints).with_separator("  "),
            right: StatusBarSection::items(&mode_items),
            style: bar_style(state.mode),
            is_focused: false,
        };
        Component::<Action>::render(&mut self.bar, frame, area, props);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tui_dispatch::testing::*;

    use super::*;

    #[test]
    fn test_error_takes_priority() {
        let mut state = AppState::default();
        state.pending.insert(1);
        state.roster = vec![1];
        state.list_error = Some("timeout".into());
        assert_eq!(
            status_message(&state),
            Some(("Error loading data: timeout".to_string(), true))
        );
    }

    #[test]
    fn test_pending_and_failed_counts() {
        let mut state = AppState::default();
        state.roster = vec![1, 2, 3];
        state.pending.insert(1);
        state.pending.insert(2);
        state.failed.insert(3);
        assert_eq!(
            status_message(&state),
            Some(("Loading 2 pokemon...  1 failed to load".to_string(), true))
        );

        state.pending.clear();
        state.failed.clear();
        assert_eq!(status_message(&state), None);
    }

    #[test]
    fn test_render_shows_mode_and_message() {
        let mut state = AppState::default();
        state.roster = vec![7];
        state.pending.insert(7);
        let mut render = RenderHarness::new(100, 3);
        let mut line = StatusLine::new();
        let output = render.render_to_string_plain(|frame| {
            line.render(frame, frame.area(), StatusLineProps { state: &state });
        });
        assert!(output.contains("Loading 1 pokemon..."));
        assert!(output.contains(DisplayMode::Modern.label()));
    }
}
