//! Rendering both display modes with RenderHarness

use tui_dispatch::{testing::*, DataResource};
use pokedex::{
    components::{
        roster::{ALL_LOADED, LOADING_MORE},
        Component, DetailCard, DetailCardProps, Header, HeaderProps, Roster, RosterProps,
        StatusLine, StatusLineProps,
    },
    sprite::SpriteData,
    state::{
        AppState, DisplayMode, ListingPage, NameEntry, Pokemon, PokemonAbility, PokemonStat,
    },
};

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
                name: "special-attack".into(),
                value: 255,
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
        sprite: None,
    }
}

/// One listed and cached entity.
fn listed_state(mode: DisplayMode, has_more: bool) -> AppState {
    let mut state = AppState {
        mode,
        ..Default::default()
    };
    state.pager.begin_next();
    state.pager.complete(ListingPage {
        entries: vec![NameEntry {
            name: "pikachu".into(),
            id: 25,
        }],
        has_more,
    });
    state.rebuild_roster();
    state.entities.insert(25, pikachu());
    state
}

fn render_roster(state: &AppState) -> String {
    let mut render = RenderHarness::new(60, 12);
    let mut roster = Roster::new();
    render.render_to_string_plain(|frame| {
        let props = RosterProps {
            state,
            is_focused: true,
        };
        roster.render(frame, frame.area(), props);
    })
}

#[test]
fn test_render_modern_roster() {
    let output = render_roster(&listed_state(DisplayMode::Modern, false));

    assert!(output.contains("Pokemon (1)"));
    assert!(output.contains("#025"));
    assert!(output.contains("Pikachu"));
    assert!(output.contains("electric"));
    assert!(output.contains(ALL_LOADED));
}

#[test]
fn test_render_ascii_roster() {
    let output = render_roster(&listed_state(DisplayMode::Ascii, false));

    assert!(output.contains("#025 PIKACHU [ELECTRIC]"));
    assert!(output.contains("╔"), "Ascii mode uses double borders");
}

#[test]
fn test_render_loading_more_footer() {
    let mut state = listed_state(DisplayMode::Modern, true);
    state.pager.begin_next();

    let output = render_roster(&state);
    assert!(output.contains(LOADING_MORE));
}

#[test]
fn test_render_initial_loading() {
    let mut state = AppState::default();
    state.pager.begin_next();

    let output = render_roster(&state);
    assert!(output.contains("Loading..."));
}

#[test]
fn test_render_ascii_detail_card() {
    let pokemon = pikachu();
    let mut render = RenderHarness::new(80, 34);
    let mut card = DetailCard::new();

    let output = render.render_to_string_plain(|frame| {
        let props = DetailCardProps {
            pokemon: &pokemon,
            mode: DisplayMode::Ascii,
            banner: Some("+---------+\n| PIKACHU |\n+---------+"),
            banner_loading: false,
            sprite: None,
            is_focused: true,
        };
        card.render(frame, frame.area(), props);
    });

    assert!(output.contains("| PIKACHU |"));
    assert!(output.contains("[IMG]"));
    assert!(output.contains("○ No Image"));
    assert!(output.contains(&format!("Sp. Attack   [{}] 255", "█".repeat(20))));
    assert!(output.contains("• LIGHTNING-ROD (hidden)"));
}

#[test]
fn test_render_modern_detail_card() {
    let pokemon = pikachu();
    let mut render = RenderHarness::new(80, 34);
    let mut card = DetailCard::new();

    let output = render.render_to_string_plain(|frame| {
        let props = DetailCardProps {
            pokemon: &pokemon,
            mode: DisplayMode::Modern,
            banner: None,
            banner_loading: false,
            sprite: None,
            is_focused: true,
        };
        card.render(frame, frame.area(), props);
    });

    assert!(output.contains("#025  Pikachu"));
    assert!(output.contains("ELECTRIC"));
    assert!(output.contains("Sp. Attack"));
    assert!(output.contains("Lightning Rod (hidden)"));
    assert!(!output.contains("[IMG]"));
}

#[test]
fn test_render_modern_detail_sprite() {
    let pokemon = pikachu();
    let sprite = DataResource::Loaded(SpriteData {
        width: 4,
        height: 4,
        pixels: vec![[250, 210, 40, 255]; 16],
    });
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

    // 4x4 pixels fit in 4 columns of 2 half-block rows.
    assert_eq!(output.matches('▀').count(), 8, "{output}");
}

#[test]
fn test_render_ascii_detail_sprite() {
    let pokemon = pikachu();
    let sprite = DataResource::Loaded(SpriteData {
        width: 4,
        height: 2,
        pixels: vec![[255, 255, 255, 255]; 8],
    });
    let mut render = RenderHarness::new(120, 34);
    let mut card = DetailCard::new();

    let output = render.render_to_string_plain(|frame| {
        let props = DetailCardProps {
            pokemon: &pokemon,
            mode: DisplayMode::Ascii,
            banner: None,
            banner_loading: false,
            sprite: Some(&sprite),
            is_focused: true,
        };
        card.render(frame, frame.area(), props);
    });

    assert!(output.contains("@@@@"), "{output}");
    assert!(output.contains("[IMG]"));
}

#[test]
fn test_render_header_modes() {
    let mut render = RenderHarness::new(60, 9);
    let mut header = Header;

    let output = render.render_to_string_plain(|frame| {
        let props = HeaderProps {
            mode: DisplayMode::Modern,
            query: "pika",
            search_active: false,
            is_focused: false,
        };
        header.render(frame, frame.area(), props);
    });
    assert!(output.contains("Pokemon Explorer"));
    assert!(output.contains("pika"));

    let output = render.render_to_string_plain(|frame| {
        let props = HeaderProps {
            mode: DisplayMode::Ascii,
            query: "",
            search_active: false,
            is_focused: false,
        };
        header.render(frame, frame.area(), props);
    });
    assert!(output.contains("[ Search Pokemon... ]"));
}

fn render_status(state: &AppState) -> String {
    let mut render = RenderHarness::new(120, 3);
    let mut status = StatusLine::new();
    render.render_to_string_plain(|frame| {
        status.render(frame, frame.area(), StatusLineProps { state });
    })
}

#[test]
fn test_render_error_status() {
    let state = AppState {
        list_error: Some("timeout".into()),
        ..Default::default()
    };
    assert!(render_status(&state).contains("Error loading data: timeout"));
}

#[test]
fn test_render_name_index_error_only_when_searching() {
    let mut state = listed_state(DisplayMode::Modern, true);
    state.names = DataResource::Failed("timeout".into());
    state.pending.insert(26);
    state.roster.push(26);

    let output = render_status(&state);
    assert!(!output.contains("Error loading data"));
    assert!(output.contains("Loading 1 pokemon..."), "{output}");

    state.search.query = "pi".into();
    assert!(render_status(&state).contains("Error loading data: timeout"));
}
