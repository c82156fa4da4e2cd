//! Pokedex - Pokemon catalogue TUI

use std::cell::RefCell;
use std::io::{self, Read};
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tui_dispatch::{
    EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventBus, Keybindings, TaskKey,
};
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{
    DebugCliArgs, DebugRunOutput, DebugSession, DebugSessionError, ReplayItem,
};

use pokedex::action::Action;
use pokedex::api::{self, Catalogue, PokeApi};
use pokedex::ascii::{self, endpoint, endpoint::RenderRequest};
use pokedex::effect::Effect;
use pokedex::logging;
use pokedex::reducer::reducer;
use pokedex::sprite;
use pokedex::state::{AppState, POKEMON_PER_PAGE};
use pokedex::ui::{self, PokedexComponentId, PokedexContext, PokedexUi};

const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);
const TICK_INTERVAL: Duration = Duration::from_millis(120);

#[derive(Parser, Debug)]
#[command(name = "pokedex")]
#[command(about = "Pokemon catalogue TUI with modern and ASCII display modes")]
struct Args {
    /// Base URL of a PokeAPI-compatible upstream
    #[arg(long, default_value = api::API_BASE)]
    api_base: String,

    /// Entries per listing page (minimum 1)
    #[arg(long, default_value_t = POKEMON_PER_PAGE, value_parser = clap::value_parser!(u32).range(1..))]
    page_size: u32,

    /// Directory with extra FIGlet `.flf` fonts
    #[arg(long)]
    font_dir: Option<PathBuf>,

    /// Write logs to this file (filter with RUST_LOG)
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[command(flatten)]
    debug: DebugCliArgs,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render text as ASCII art: BODY is `{"text": ..., "font": ...}`, read from stdin when omitted
    Render {
        body: Option<String>,

        /// Print the art for TEXT directly; falls back to the plain text
        #[arg(long, conflicts_with = "body")]
        text: Option<String>,

        #[arg(long, requires = "text")]
        font: Option<String>,
    },
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let Args {
        api_base,
        page_size,
        font_dir,
        log_file,
        debug: debug_args,
        command,
    } = Args::parse();

    ascii::install(font_dir);

    if let Some(Command::Render { body, text, font }) = command {
        logging::init_stderr()?;
        if let Some(text) = text {
            let mut request = RenderRequest::new(text);
            request.font = font;
            println!("{}", endpoint::request(ascii::shared(), &request));
            return Ok(());
        }
        let success = run_render(body)?;
        if !success {
            std::process::exit(1);
        }
        return Ok(());
    }

    if let Some(path) = &log_file {
        logging::init(path)?;
    }
    let client = PokeApi::install(api_base);
    tracing::info!(api_base = client.base_url(), page_size, "starting pokedex");

    let debug = DebugSession::new(debug_args);

    let state = debug
        .load_state_or_else_async(move || async move {
            Ok::<AppState, io::Error>(AppState::with_page_size(page_size))
        })
        .await
        .map_err(debug_error)?;
    let replay_actions = debug.load_replay_items().map_err(debug_error)?;
    let (middleware, recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);

    // ===== Terminal setup =====
    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &debug, store, replay_actions).await;

    // ===== Cleanup =====
    if use_alt_screen {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
    }

    let run_output = result?;
    run_output.write_render_output()?;
    debug.save_actions(recorder.as_ref()).map_err(debug_error)?;
    Ok(())
}

/// Headless render endpoint. Prints the reply JSON and reports whether it was 2xx.
fn run_render(body: Option<String>) -> io::Result<bool> {
    let body = match body {
        Some(body) => body,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    let reply = endpoint::handle(ascii::shared(), body.as_bytes());
    if !reply.is_success() {
        tracing::warn!(status = reply.status, "render request failed");
    }
    println!("{}", reply.to_json());
    Ok(reply.is_success())
}

fn debug_error(error: DebugSessionError) -> io::Error {
    io::Error::other(format!("debug session error: {error}"))
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    debug: &DebugSession,
    store: impl EffectStoreLike<AppState, Action, Effect>,
    replay_actions: Vec<ReplayItem<Action>>,
) -> io::Result<DebugRunOutput<AppState>> {
    let ui = Rc::new(RefCell::new(PokedexUi::new()));
    let mut bus: EventBus<AppState, Action, PokedexComponentId, PokedexContext> = EventBus::new();
    let keybindings: Keybindings<PokedexContext> = Keybindings::new();

    let ui_header = Rc::clone(&ui);
    bus.register(PokedexComponentId::Header, move |event, state| {
        ui_header
            .borrow_mut()
            .handle_header_event(&event.kind, state)
    });

    let ui_roster = Rc::clone(&ui);
    bus.register(PokedexComponentId::Roster, move |event, state| {
        ui_roster
            .borrow_mut()
            .handle_roster_event(&event.kind, state)
    });

    let ui_detail = Rc::clone(&ui);
    bus.register(PokedexComponentId::Detail, move |event, state| {
        ui_detail
            .borrow_mut()
            .handle_detail_event(&event.kind, state)
    });

    bus.register_global(|event, state| ui::handle_global_event(&event.kind, state));

    debug
        .run_effect_app_with_bus(
            terminal,
            store,
            DebugLayer::simple(),
            replay_actions,
            Some(Action::Init),
            Some(Action::Quit),
            |runtime| {
                if debug.render_once() {
                    return;
                }
                runtime
                    .subscriptions()
                    .interval("tick", TICK_INTERVAL, || Action::Tick);
            },
            &mut bus,
            &keybindings,
            |frame, area, state, render_ctx, event_ctx| {
                ui.borrow_mut()
                    .render(frame, area, state, render_ctx, event_ctx);
            },
            |action| matches!(action, Action::Quit),
            handle_effect,
        )
        .await
}

fn handle_effect(effect: Effect, ctx: &mut EffectContext<Action>) {
    match effect {
        Effect::LoadNameIndex => {
            ctx.tasks().spawn(TaskKey::new("name_index"), async {
                match api::shared().fetch_all_names().await {
                    Ok(names) => Action::NameIndexDidLoad(names),
                    Err(error) => Action::NameIndexDidError(error.to_string()),
                }
            });
        }
        Effect::LoadListingPage { offset, limit } => {
            let key = format!("listing_{offset}");
            ctx.tasks().spawn(TaskKey::new(key), async move {
                match api::shared().fetch_listing_page(offset, limit).await {
                    Ok(page) => Action::ListingPageDidLoad(page),
                    Err(error) => Action::ListingPageDidError(error.to_string()),
                }
            });
        }
        Effect::LoadEntities { batch, ids } => {
            let key = format!("entities_{batch}");
            ctx.tasks().spawn(TaskKey::new(key), async move {
                Action::EntitiesDidLoad(api::fetch_entities(api::shared(), &ids).await)
            });
        }
        Effect::DebounceSearch { query } => {
            ctx.tasks()
                .debounce("search", SEARCH_DEBOUNCE, async move {
                    Action::SearchSettled(query)
                });
        }
        Effect::RenderBanner { name } => {
            let key = format!("banner_{name}");
            ctx.tasks().spawn(TaskKey::new(key), async move {
                let text = name.clone();
                let art = match tokio::task::spawn_blocking(move || {
                    ascii::banner(ascii::shared(), &text)
                })
                .await
                {
                    Ok(art) => art,
                    Err(error) => {
                        tracing::warn!(%name, error = %error, "banner render task failed");
                        ascii::box_banner(&name)
                    }
                };
                Action::BannerDidRender { name, art }
            });
        }
        Effect::LoadSprite { name, url } => {
            let key = format!("sprite_{name}");
            ctx.tasks().spawn(TaskKey::new(key), async move {
                let bytes = match api::shared().fetch_bytes(&url).await {
                    Ok(bytes) => bytes,
                    Err(error) => {
                        return Action::SpriteDidError {
                            name,
                            error: error.to_string(),
                        }
                    }
                };
                match tokio::task::spawn_blocking(move || sprite::decode_sprite(&bytes)).await {
                    Ok(Ok(sprite)) => Action::SpriteDidLoad { name, sprite },
                    Ok(Err(error)) => {
                        tracing::warn!(%name, %url, error = %error, "sprite did not decode");
                        Action::SpriteDidError {
                            name,
                            error: error.to_string(),
                        }
                    }
                    Err(error) => Action::SpriteDidError {
                        name,
                        error: error.to_string(),
                    },
                }
            });
        }
    }
}
