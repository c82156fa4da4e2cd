//! Reducer - pure function: (state, action) -> DispatchResult

use tui_dispatch::{DataResource, DispatchResult};

use crate::action::Action;
use crate::effect::Effect;
use crate::state::AppState;

pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        Action::Init => {
            state.names = DataResource::Loading;
            state.list_error = None;
            let mut effects = vec![Effect::LoadNameIndex];
            effects.extend(next_page(state));
            DispatchResult::changed_with_many(effects)
        }

        // ===== Name index =====
        Action::NameIndexDidLoad(entries) => {
            state.names = DataResource::Loaded(entries);
            if !state.is_search_mode() {
                return DispatchResult::changed();
            }
            state.rebuild_roster();
            with_effects(fetch_missing(state).into_iter().collect())
        }

        Action::NameIndexDidError(error) => {
            state.names = DataResource::Failed(error);
            if state.is_search_mode() {
                state.rebuild_roster();
            }
            DispatchResult::changed()
        }

        // ===== Listing =====
        Action::ListLoadMore => match load_more(state) {
            Some(effect) => DispatchResult::changed_with(effect),
            None => DispatchResult::unchanged(),
        },

        Action::ListingPageDidLoad(page) => {
            state.pager.complete(page);
            state.list_error = None;
            if state.is_search_mode() {
                return DispatchResult::changed();
            }
            state.rebuild_roster();
            with_effects(fetch_missing(state).into_iter().collect())
        }

        Action::ListingPageDidError(error) => {
            state.pager.fail();
            state.list_error = Some(error);
            DispatchResult::changed()
        }

        Action::EntitiesDidLoad(batch) => {
            for pokemon in batch.entities {
                state.pending.remove(&pokemon.id);
                state.entities.entry(pokemon.id).or_insert(pokemon);
            }
            for id in batch.failed {
                state.pending.remove(&id);
                state.failed.insert(id);
            }
            let len = state.visible().len();
            if state.selected_index >= len {
                state.selected_index = len.saturating_sub(1);
            }
            DispatchResult::changed()
        }

        // ===== Search =====
        Action::SearchStart => {
            if state.search.active {
                return DispatchResult::unchanged();
            }
            state.search.active = true;
            state.search.query.clear();
            let mut effects: Vec<Effect> = reload_names(state).into_iter().collect();
            effects.extend(query_effects(state));
            with_effects(effects)
        }

        Action::SearchInput(ch) => {
            state.search.query.push(ch);
            apply_query(state)
        }

        Action::SearchBackspace => {
            if state.search.query.pop().is_none() {
                return DispatchResult::unchanged();
            }
            apply_query(state)
        }

        Action::SearchCancel => {
            if !state.search.active && state.search.query.is_empty() {
                return DispatchResult::unchanged();
            }
            state.search.active = false;
            state.search.query.clear();
            apply_query(state)
        }

        Action::SearchSubmit => {
            state.search.active = false;
            with_effects(fetch_missing(state).into_iter().collect())
        }

        Action::SearchSettled(query) => {
            if query != state.search.query {
                return DispatchResult::unchanged();
            }
            match fetch_missing(state) {
                Some(effect) => DispatchResult::changed_with(effect),
                None => DispatchResult::unchanged(),
            }
        }

        // ===== Selection =====
        Action::SelectionMove(delta) => {
            let index = (state.selected_index as i64 + i64::from(delta)).max(0) as usize;
            let moved = state.set_selected_index(index);
            let effects: Vec<Effect> = if delta > 0 || moved {
                scroll_load(state).into_iter().collect()
            } else {
                Vec::new()
            };
            if !moved && effects.is_empty() {
                return DispatchResult::unchanged();
            }
            with_effects(effects)
        }

        Action::DexSelect(index) => {
            if !state.set_selected_index(index) {
                return DispatchResult::unchanged();
            }
            with_effects(scroll_load(state).into_iter().collect())
        }

        Action::SelectionJumpTop => {
            if !state.set_selected_index(0) {
                return DispatchResult::unchanged();
            }
            DispatchResult::changed()
        }

        Action::SelectionJumpBottom => {
            let last = state.visible().len().saturating_sub(1);
            let moved = state.set_selected_index(last);
            let effects: Vec<Effect> = scroll_load(state).into_iter().collect();
            if !moved && effects.is_empty() {
                return DispatchResult::unchanged();
            }
            with_effects(effects)
        }

        Action::DetailOpen => {
            let Some(id) = state.selected().map(|pokemon| pokemon.id) else {
                return DispatchResult::unchanged();
            };
            state.detail = Some(id);
            let effects = request_banner(state).into_iter().chain(request_sprite(state));
            with_effects(effects.collect())
        }

        Action::DetailClose => {
            if state.detail.take().is_none() {
                return DispatchResult::unchanged();
            }
            DispatchResult::changed()
        }

        // ===== UI =====
        Action::UiToggleMode => {
            state.mode = state.mode.toggle();
            with_effects(request_banner(state).into_iter().collect())
        }

        Action::UiTerminalResize(width, height) => {
            if state.terminal_size == (width, height) {
                return DispatchResult::unchanged();
            }
            state.terminal_size = (width, height);
            DispatchResult::changed()
        }

        Action::BannerDidRender { name, art } => {
            if state.banner_loading.as_deref() == Some(name.as_str()) {
                state.banner_loading = None;
            }
            state.banners.insert(name, art);
            DispatchResult::changed()
        }

        Action::SpriteDidLoad { name, sprite } => {
            state.sprites.insert(name, DataResource::Loaded(sprite));
            DispatchResult::changed()
        }

        Action::SpriteDidError { name, error } => {
            state.sprites.insert(name, DataResource::Failed(error));
            DispatchResult::changed()
        }

        Action::Tick => {
            state.tick = state.tick.wrapping_add(1);
            if state.is_list_loading()
                || state.banner_loading.is_some()
                || state.is_sprite_loading()
            {
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::Quit => DispatchResult::unchanged(),
    }
}

fn with_effects(effects: Vec<Effect>) -> DispatchResult<Effect> {
    if effects.is_empty() {
        DispatchResult::changed()
    } else {
        DispatchResult::changed_with_many(effects)
    }
}

fn next_page(state: &mut AppState) -> Option<Effect> {
    state
        .pager
        .begin_next()
        .map(|request| Effect::LoadListingPage {
            offset: request.offset,
            limit: request.limit,
        })
}

fn load_more(state: &mut AppState) -> Option<Effect> {
    if state.is_search_mode() {
        return None;
    }
    next_page(state)
}

/// Load the next page once the selection is close to the end of the list.
fn scroll_load(state: &mut AppState) -> Option<Effect> {
    if !state.near_list_end() {
        return None;
    }
    load_more(state)
}

/// Claim every roster id that is not cached, pending or failed as one batch.
fn fetch_missing(state: &mut AppState) -> Option<Effect> {
    let ids = state.missing_ids();
    if ids.is_empty() {
        return None;
    }
    state.batch_seq += 1;
    state.pending.extend(ids.iter().copied());
    Some(Effect::LoadEntities {
        batch: state.batch_seq,
        ids,
    })
}

/// Refilter at once; in search mode the entity fetch waits for the debounce.
fn apply_query(state: &mut AppState) -> DispatchResult<Effect> {
    with_effects(query_effects(state))
}

fn query_effects(state: &mut AppState) -> Vec<Effect> {
    state.rebuild_roster();
    state.selected_index = 0;
    if !state.is_search_mode() {
        return fetch_missing(state).into_iter().collect();
    }
    let mut effects: Vec<Effect> = reload_names(state).into_iter().collect();
    effects.push(Effect::DebounceSearch {
        query: state.search.query.clone(),
    });
    effects
}

/// A failed name index is fetched again the next time the user searches.
fn reload_names(state: &mut AppState) -> Option<Effect> {
    if state.names.error().is_none() {
        return None;
    }
    state.names = DataResource::Loading;
    Some(Effect::LoadNameIndex)
}

fn request_banner(state: &mut AppState) -> Option<Effect> {
    if !state.mode.is_ascii() {
        return None;
    }
    let name = state.detail_pokemon()?.name.clone();
    if state.banners.contains_key(&name)
        || state.banner_loading.as_deref() == Some(name.as_str())
    {
        return None;
    }
    state.banner_loading = Some(name.clone());
    Some(Effect::RenderBanner { name })
}

/// Sprites are fetched once per name; a failed one is not retried.
fn request_sprite(state: &mut AppState) -> Option<Effect> {
    let pokemon = state.detail_pokemon()?;
    let url = pokemon.sprite.clone()?;
    let name = pokemon.name.clone();
    if state.sprites.contains_key(&name) {
        return None;
    }
    state.sprites.insert(name.clone(), DataResource::Loading);
    Some(Effect::LoadSprite { name, url })
}
