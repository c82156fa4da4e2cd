use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::Block,
    Frame,
};
use tui_dispatch::{EventContext, EventKind, EventRoutingState, HandlerResponse, RenderContext};

use crate::action::Action;
use crate::components::{
    detail_card, header::header_height, Component, DetailCard, DetailCardProps, Header,
    HeaderProps, Roster, RosterProps, StatusLine, StatusLineProps, BG_BASE, MONO_BG,
};
use crate::state::AppState;

const STATUS_HEIGHT: u16 = 3;

#[derive(tui_dispatch::ComponentId, Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum PokedexComponentId {
    Header,
    Roster,
    Detail,
}

#[derive(tui_dispatch::BindingContext, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PokedexContext {
    Search,
    Roster,
    Detail,
}

impl EventRoutingState<PokedexComponentId, PokedexContext> for AppState {
    fn focused(&self) -> Option<PokedexComponentId> {
        if self.search.active {
            Some(PokedexComponentId::Header)
        } else if self.detail.is_some() {
            Some(PokedexComponentId::Detail)
        } else {
            Some(PokedexComponentId::Roster)
        }
    }

    fn modal(&self) -> Option<PokedexComponentId> {
        if self.search.active {
            Some(PokedexComponentId::Header)
        } else if self.detail.is_some() {
            Some(PokedexComponentId::Detail)
        } else {
            None
        }
    }

    fn binding_context(&self, id: PokedexComponentId) -> PokedexContext {
        match id {
            PokedexComponentId::Header => PokedexContext::Search,
            PokedexComponentId::Roster => PokedexContext::Roster,
            PokedexComponentId::Detail => PokedexContext::Detail,
        }
    }

    fn default_context(&self) -> PokedexContext {
        PokedexContext::Roster
    }
}

pub struct PokedexUi {
    header: Header,
    roster: Roster,
    detail: DetailCard,
    status: StatusLine,
}

impl Default for PokedexUi {
    fn default() -> Self {
        Self::new()
    }
}

impl PokedexUi {
    pub fn new() -> Self {
        Self {
            header: Header,
            roster: Roster::new(),
            detail: DetailCard::new(),
            status: StatusLine::new(),
        }
    }

    pub fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &AppState,
        render_ctx: RenderContext,
        event_ctx: &mut EventContext<PokedexComponentId>,
    ) {
        let bg = if state.mode.is_ascii() { MONO_BG } else { BG_BASE };
        frame.render_widget(Block::default().style(Style::default().bg(bg)), area);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(header_height(state.mode)),
                Constraint::Min(3),
                Constraint::Length(STATUS_HEIGHT),
            ])
            .split(area);

        event_ctx.set_component_area(PokedexComponentId::Header, layout[0]);
        self.header.render(
            frame,
            layout[0],
            HeaderProps {
                mode: state.mode,
                query: &state.search.query,
                search_active: state.search.active,
                is_focused: render_ctx.is_focused() && state.search.active,
            },
        );

        event_ctx.set_component_area(PokedexComponentId::Roster, layout[1]);
        self.roster.render(
            frame,
            layout[1],
            RosterProps {
                state,
                is_focused: render_ctx.is_focused()
                    && !state.search.active
                    && state.detail.is_none(),
            },
        );

        self.status
            .render(frame, layout[2], StatusLineProps { state });

        match state.detail_pokemon() {
            Some(pokemon) => {
                event_ctx
                    .set_component_area(PokedexComponentId::Detail, detail_card::modal_area(area));
                let banner = state.banners.get(&pokemon.name).map(String::as_str);
                let banner_loading = state.banner_loading.as_deref() == Some(pokemon.name.as_str());
                self.detail.render(
                    frame,
                    area,
                    DetailCardProps {
                        pokemon,
                        mode: state.mode,
                        banner,
                        banner_loading,
                        sprite: state.detail_sprite(),
                        is_focused: render_ctx.is_focused(),
                    },
                );
            }
            None => {
                event_ctx
                    .component_areas
                    .remove(&PokedexComponentId::Detail);
            }
        }
    }

    pub fn handle_header_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let props = HeaderProps {
            mode: state.mode,
            query: &state.search.query,
            search_active: state.search.active,
            is_focused: true,
        };
        let actions: Vec<_> = self.header.handle_event(event, props).into_iter().collect();
        if state.search.active {
            // The search field swallows every key while it is open.
            HandlerResponse {
                actions,
                consumed: true,
                needs_render: false,
            }
        } else {
            handler_response(actions)
        }
    }

    pub fn handle_roster_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let props = RosterProps {
            state,
            is_focused: true,
        };
        let actions: Vec<_> = self.roster.handle_event(event, props).into_iter().collect();
        handler_response(actions)
    }

    pub fn handle_detail_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let Some(pokemon) = state.detail_pokemon() else {
            return handler_response(vec![Action::DetailClose]);
        };
        let props = DetailCardProps {
            pokemon,
            mode: state.mode,
            banner: None,
            banner_loading: false,
            sprite: None,
            is_focused: true,
        };
        let actions: Vec<_> = self.detail.handle_event(event, props).into_iter().collect();
        handler_response(actions)
    }
}

/// Keys that work outside of any focused component.
pub fn handle_global_event(event: &EventKind, state: &AppState) -> HandlerResponse<Action> {
    match event {
        EventKind::Resize(width, height) => {
            HandlerResponse::action(Action::UiTerminalResize(*width, *height)).with_render()
        }
        EventKind::Key(key) if !state.search.active => match key.code {
            KeyCode::Char('q') => HandlerResponse::action(Action::Quit),
            KeyCode::Char('m') => HandlerResponse::action(Action::UiToggleMode),
            KeyCode::Char('/') if state.detail.is_none() => {
                HandlerResponse::action(Action::SearchStart)
            }
            _ => HandlerResponse::ignored(),
        },
        _ => HandlerResponse::ignored(),
    }
}

fn handler_response(actions: Vec<Action>) -> HandlerResponse<Action> {
    if actions.is_empty() {
        HandlerResponse::ignored()
    } else {
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }
}
