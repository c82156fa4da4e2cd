use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use tui_dispatch::{DataResource, EventKind};
use tui_dispatch_components::{
    centered_rect, BaseStyle, BorderStyle, Modal, ModalBehavior, ModalProps, ModalStyle, Padding,
};

use super::{
    dex_number, format_name, type_color, Component, ACCENT_GOLD, ACCENT_RED, ACCENT_TEAL,
    BG_PANEL, MONO_BG, MONO_FG, TEXT_DIM, TEXT_MAIN,
};
use crate::action::Action;
use crate::ascii::{format_stat_name, stat_bar, type_badge, STAT_BAR_WIDTH, STAT_MAX};
use crate::sprite::{ascii_sprite, sprite_fit, SpriteData, SpriteView};
use crate::state::{DisplayMode, Pokemon};

const MODAL_WIDTH_PERCENT: u16 = 70;
const MODAL_HEIGHT: u16 = 30;
const LABEL_WIDTH: usize = 12;
const SPRITE_PANEL_WIDTH: u16 = 24;
const SPRITE_PANEL_HEIGHT: u16 = 12;
/// Narrower cards drop the sprite panel and keep the text only.
const MIN_WIDTH_WITH_SPRITE: u16 = 64;

pub struct DetailCard {
    modal: Modal,
}

pub struct DetailCardProps<'a> {
    pub pokemon: &'a Pokemon,
    pub mode: DisplayMode,
    pub banner: Option<&'a str>,
    pub banner_loading: bool,
    pub sprite: Option<&'a DataResource<SpriteData>>,
    pub is_focused: bool,
}

impl Default for DetailCard {
    fn default() -> Self {
        Self {
            modal: Modal::new(),
        }
    }
}

impl DetailCard {
    pub fn new() -> Self {
        Self::default()
    }
}

pub fn modal_area(area: Rect) -> Rect {
    centered_rect(MODAL_WIDTH_PERCENT, MODAL_HEIGHT.min(area.height), area)
}

fn close_detail() -> Action {
    Action::DetailClose
}

fn stat_color(value: u16) -> ratatui::style::Color {
    match value {
        0..=59 => ACCENT_RED,
        60..=99 => ACCENT_GOLD,
        _ => ACCENT_TEAL,
    }
}

fn modern_lines(pokemon: &Pokemon) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(vec![
            Span::styled(dex_number(pokemon.id), Style::default().fg(TEXT_DIM)),
            Span::raw("  "),
            Span::styled(
                format_name(&pokemon.name),
                Style::default().fg(TEXT_MAIN).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::default(),
    ];

    let mut tags = Vec::new();
    for name in &pokemon.types {
        tags.push(Span::styled(
            format!(" {} ", name.to_uppercase()),
            Style::default()
                .bg(type_color(name))
                .fg(BG_PANEL)
                .add_modifier(Modifier::BOLD),
        ));
        tags.push(Span::raw(" "));
    }
    lines.push(Line::from(tags));
    lines.push(Line::default());

    lines.push(Line::styled("Stats", Style::default().fg(ACCENT_GOLD)));
    for stat in &pokemon.stats {
        let bar = stat_bar(stat.value, STAT_MAX);
        let filled: String = bar.chars().take_while(|c| *c == '█').collect();
        let empty = "·".repeat(STAT_BAR_WIDTH - filled.chars().count());
        lines.push(Line::from(vec![
            Span::raw(format!(
                "{:<width$}",
                format_stat_name(&stat.name),
                width = LABEL_WIDTH
            )),
            Span::styled(filled, Style::default().fg(stat_color(stat.value))),
            Span::styled(empty, Style::default().fg(TEXT_DIM)),
            Span::styled(format!(" {:>3}", stat.value), Style::default().fg(TEXT_DIM)),
        ]));
    }
    lines.push(Line::default());

    lines.push(Line::styled("Abilities", Style::default().fg(ACCENT_GOLD)));
    for ability in &pokemon.abilities {
        let mut spans = vec![Span::raw(format!("• {}", format_name(&ability.name)))];
        if ability.is_hidden {
            spans.push(Span::styled(" (hidden)", Style::default().fg(TEXT_DIM)));
        }
        lines.push(Line::from(spans));
    }
    lines
}

fn ascii_lines(
    pokemon: &Pokemon,
    banner: Option<&str>,
    banner_loading: bool,
) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(format!(
        "{} {}  [{}]",
        dex_number(pokemon.id),
        pokemon.name.to_uppercase(),
        type_badge(&pokemon.types)
    ))];

    match banner {
        Some(art) if !banner_loading => {
            lines.extend(art.lines().map(|line| Line::from(line.to_string())));
        }
        _ => lines.push(Line::from("[...]")),
    }
    lines.push(Line::default());

    lines.push(Line::from("[IMG]"));
    lines.push(Line::from(if pokemon.sprite.is_some() {
        "● Image"
    } else {
        "○ No Image"
    }));
    lines.push(Line::default());

    lines.push(Line::from("Stats:"));
    for stat in &pokemon.stats {
        lines.push(Line::from(format!(
            "{:<width$} [{}] {:>3}",
            format_stat_name(&stat.name),
            stat_bar(stat.value, STAT_MAX),
            stat.value,
            width = LABEL_WIDTH
        )));
    }
    lines.push(Line::default());

    lines.push(Line::from("Abilities:"));
    for ability in &pokemon.abilities {
        let hidden = if ability.is_hidden { " (hidden)" } else { "" };
        lines.push(Line::from(format!("• {}{hidden}", ability.name.to_uppercase())));
    }
    lines
}

pub fn detail_lines(props: &DetailCardProps<'_>) -> Vec<Line<'static>> {
    match props.mode {
        DisplayMode::Modern => modern_lines(props.pokemon),
        DisplayMode::Ascii => ascii_lines(props.pokemon, props.banner, props.banner_loading),
    }
}

/// Text area and, when the card is wide enough, the sprite panel on its right.
fn split_content(area: Rect) -> (Rect, Option<Rect>) {
    if area.width < MIN_WIDTH_WITH_SPRITE {
        return (area, None);
    }
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(SPRITE_PANEL_WIDTH)])
        .split(area);
    let panel = Rect {
        height: columns[1].height.min(SPRITE_PANEL_HEIGHT),
        ..columns[1]
    };
    (columns[0], Some(panel))
}

fn render_sprite(
    frame: &mut Frame,
    area: Rect,
    sprite: Option<&DataResource<SpriteData>>,
    mode: DisplayMode,
) {
    let Some(data) = sprite.and_then(DataResource::data) else {
        let placeholder = if sprite.is_some_and(DataResource::is_loading) {
            "[loading sprite]"
        } else {
            "[no sprite]"
        };
        let placeholder = Paragraph::new(placeholder)
            .alignment(Alignment::Center)
            .style(Style::default().fg(TEXT_DIM));
        frame.render_widget(placeholder, area);
        return;
    };
    match mode {
        DisplayMode::Modern => frame.render_widget(SpriteView::new(data), area),
        DisplayMode::Ascii => {
            let (cols, rows) = sprite_fit(data, area.width, area.height);
            let centered = Rect {
                x: area.x + (area.width - cols) / 2,
                y: area.y + (area.height - rows) / 2,
                width: cols,
                height: rows,
            };
            let lines: Vec<Line> = ascii_sprite(data, cols, rows)
                .into_iter()
                .map(Line::from)
                .collect();
            frame.render_widget(Paragraph::new(lines), centered);
        }
    }
}

fn modal_style(mode: DisplayMode) -> ModalStyle {
    let (bg, fg, border) = match mode {
        DisplayMode::Modern => (BG_PANEL, TEXT_MAIN, ACCENT_TEAL),
        DisplayMode::Ascii => (MONO_BG, MONO_FG, MONO_FG),
    };
    ModalStyle {
        dim_factor: 0.6,
        base: BaseStyle {
            border: Some(BorderStyle {
                borders: Borders::ALL,
                style: Style::default().fg(TEXT_DIM),
                focused_style: Some(Style::default().fg(border)),
            }),
            padding: Padding::xy(2, 1),
            bg: Some(bg),
            fg: Some(fg),
        },
    }
}

impl Component<Action> for DetailCard {
    type Props<'a> = DetailCardProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return Vec::new();
        }
        if let EventKind::Key(key) = event {
            if matches!(key.code, KeyCode::Enter | KeyCode::Backspace) {
                return vec![Action::DetailClose];
            }
        }
        let mut noop_render = |_frame: &mut Frame, _area: Rect| {};
        let modal_props = ModalProps {
            is_open: true,
            is_focused: true,
            area: Rect::default(),
            style: modal_style(props.mode),
            behavior: ModalBehavior {
                close_on_esc: true,
                close_on_backdrop: false,
            },
            on_close: close_detail,
            render_content: &mut noop_render,
        };
        self.modal
            .handle_event(event, modal_props)
            .into_iter()
            .collect()
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let lines = detail_lines(&props);
        let title = match props.mode {
            DisplayMode::Modern => " Pokemon Details ",
            DisplayMode::Ascii => "[ Pokemon Details ]",
        };
        let (sprite, mode) = (props.sprite, props.mode);
        let mut render_content = |frame: &mut Frame, content: Rect| {
            let block = Block::default().title(title);
            let inner = block.inner(content);
            frame.render_widget(block, content);

            let (text_area, sprite_area) = split_content(inner);
            let paragraph = Paragraph::new(lines.clone()).wrap(Wrap { trim: false });
            frame.render_widget(paragraph, text_area);
            if let Some(sprite_area) = sprite_area {
                render_sprite(frame, sprite_area, sprite, mode);
            }
        };
        self.modal.render(
            frame,
            area,
            ModalProps {
                is_open: true,
                is_focused: props.is_focused,
                area: modal_area(area),
                style: modal_style(props.mode),
                behavior: ModalBehavior {
                    close_on_esc: true,
                    close_on_backdrop: false,
                },
                on_close: close_detail,
                render_content: &mut render_content,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use tui_dispatch::testing::*;

    use super::*;
    use crate::state::{PokemonAbility, PokemonStat};

    fn pikachu() -> Pokemon {
        Pokemon {
            id: 25,
            name: "pikachu".into(),
            types: vec!["electric".into()],
            stats: vec![
                PokemonStat {
                    name: "hp".into(),
                    value: 35,
                },
                PokemonStat {
                    name: "attack".into(),
                    value: 55,
                },
            ],
            abilities: vec![
                PokemonAbility {
                    name: "static".into(),
                    is_hidden: false,
                },
                PokemonAbility {
                    name: "lightning-rod".into(),
                    is_hidden: true,
                },
            ],
            sprite: Some("https://example.test/25.png".into()),
        }
    }

    fn text(lines: &[Line<'_>]) -> String {
        lines
            .iter()
            .map(|line| {
                line.spans
                    .iter()
                    .map(|span| span.content.as_ref())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_ascii_card_content() {
        let pokemon = pikachu();
        let props = DetailCardProps {
            pokemon: &pokemon,
            mode: DisplayMode::Ascii,
            banner: Some("PIKA\nCHU"),
            banner_loading: false,
            sprite: None,
            is_focused: true,
        };
        let output = text(&detail_lines(&props));
        assert!(output.contains("#025 PIKACHU  [ELECTRIC]"));
        assert!(output.contains("PIKA\nCHU"));
        assert!(output.contains("● Image"));
        assert!(output.contains(&format!(
            "Attack       [{}{}]  55",
            "█".repeat(4),
            "░".repeat(16)
        )));
        assert!(output.contains("• LIGHTNING-ROD (hidden)"));
    }

    #[test]
    fn test_ascii_card_while_banner_renders() {
        let mut pokemon = pikachu();
        pokemon.sprite = None;
        let props = DetailCardProps {
            pokemon: &pokemon,
            mode: DisplayMode::Ascii,
            banner: None,
            banner_loading: true,
            sprite: None,
            is_focused: true,
        };
        let output = text(&detail_lines(&props));
        assert!(output.contains("[...]"));
        assert!(output.contains("○ No Image"));
    }

    #[test]
    fn test_modern_card_content() {
        let pokemon = pikachu();
        let props = DetailCardProps {
            pokemon: &pokemon,
            mode: DisplayMode::Modern,
            banner: None,
            banner_loading: false,
            sprite: None,
            is_focused: true,
        };
        let output = text(&detail_lines(&props));
        assert!(output.contains("#025  Pikachu"));
        assert!(output.contains(" ELECTRIC "));
        assert!(output.contains("• Lightning Rod (hidden)"));
        assert!(!output.contains("[IMG]"));
    }

    #[test]
    fn test_enter_closes() {
        let pokemon = pikachu();
        let mut card = DetailCard::new();
        let actions: Vec<_> = card
            .handle_event(
                &EventKind::Key(crossterm::event::KeyEvent::new(
                    KeyCode::Enter,
                    crossterm::event::KeyModifiers::NONE,
                )),
                DetailCardProps {
                    pokemon: &pokemon,
                    mode: DisplayMode::Modern,
                    banner: None,
                    banner_loading: false,
                    sprite: None,
                    is_focused: true,
                },
            )
            .into_iter()
            .collect();
        actions.assert_first(Action::DetailClose);
    }

    #[test]
    fn test_wide_card_draws_sprite_panel() {
        let pokemon = pikachu();
        let sprite = DataResource::Loaded(crate::sprite::tests::block_sprite());
        let mut render = RenderHarness::new(120, 34);
        let mut card = DetailCard::new();

        let output = render.render_to_string_plain(|frame| {
            let props = DetailCardProps {
                pokemon: &pokemon,
                mode: DisplayMode::Modern,
                banner: None,
                banner_loading: false,
                sprite: Some(&sprite),
                is_focused: true,
            };
            card.render(frame, frame.area(), props);
        });
        assert!(output.contains('▀'), "{output}");
        assert!(output.contains("#025  Pikachu"));
    }

    #[test]
    fn test_sprite_panel_placeholders() {
        let pokemon = pikachu();
        let loading = DataResource::Loading;
        let failed = DataResource::Failed("HTTP 404".into());
        let mut render = RenderHarness::new(120, 34);
        let mut card = DetailCard::new();

        for (sprite, expected) in [(&loading, "[loading sprite]"), (&failed, "[no sprite]")] {
            let output = render.render_to_string_plain(|frame| {
                let props = DetailCardProps {
                    pokemon: &pokemon,
                    mode: DisplayMode::Ascii,
                    banner: None,
                    banner_loading: false,
                    sprite: Some(sprite),
                    is_focused: true,
                };
                card.render(frame, frame.area(), props);
            });
            assert!(output.contains(expected), "{output}");
        }
    }

    #[test]
    fn test_narrow_card_has_no_sprite_panel() {
        let pokemon = pikachu();
        let loading = DataResource::Loading;
        let mut render = RenderHarness::new(60, 34);
        let mut card = DetailCard::new();

        let output = render.render_to_string_plain(|frame| {
            let props = DetailCardProps {
                pokemon: &pokemon,
                mode: DisplayMode::Modern,
                banner: None,
                banner_loading: false,
                sprite: Some(&loading),
                is_focused: true,
            };
            card.render(frame, frame.area(), props);
        });
        assert!(!output.contains("[loading sprite]"));
    }
}
