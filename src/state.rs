use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tui_dispatch::DataResource;
use tui_dispatch_debug::debug::{ron_string, DebugSection, DebugState};

use crate::pager::Pager;
use crate::search::{self, SearchResult};
use crate::sprite::SpriteData;

pub const POKEMON_PER_PAGE: u32 = 20;

/// Rows from the end of the visible list at which the next page is requested.
pub const LOAD_MORE_THRESHOLD: usize = 4;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PokemonStat {
    pub name: String,
    pub value: u16,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PokemonAbility {
    pub name: String,
    pub is_hidden: bool,
}

/// A single catalogued Pokemon. Immutable once fetched.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pokemon {
    pub id: u32,
    pub name: String,
    pub types: Vec<String>,
    pub stats: Vec<PokemonStat>,
    pub abilities: Vec<PokemonAbility>,
    pub sprite: Option<String>,
}

impl Pokemon {
    pub fn stat(&self, name: &str) -> Option<u16> {
        self.stats
            .iter()
            .find(|stat| stat.name == name)
            .map(|stat| stat.value)
    }
}

/// One `(name, id)` pair from the upstream listing endpoints.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameEntry {
    pub name: String,
    pub id: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ListingPage {
    pub entries: Vec<NameEntry>,
    pub has_more: bool,
}

/// Result of one aggregated entity fetch. `failed` keeps the ids that did not
/// resolve so callers can tell "no results" apart from "some failed".
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityBatch {
    pub entities: Vec<Pokemon>,
    pub failed: Vec<u32>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayMode {
    #[default]
    Modern,
    Ascii,
}

impl DisplayMode {
    pub fn toggle(&self) -> Self {
        match self {
            DisplayMode::Modern => DisplayMode::Ascii,
            DisplayMode::Ascii => DisplayMode::Modern,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DisplayMode::Modern => "modern",
            DisplayMode::Ascii => "ascii",
        }
    }

    pub fn is_ascii(&self) -> bool {
        matches!(self, DisplayMode::Ascii)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchState {
    pub active: bool,
    pub query: String,
}

impl SearchState {
    pub fn is_search_mode(&self) -> bool {
        search::is_search(&self.query)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AppState {
    pub terminal_size: (u16, u16),
    pub mode: DisplayMode,

    pub pager: Pager,
    pub names: DataResource<Vec<NameEntry>>,
    pub search: SearchState,

    /// Ids the list is currently built from, in display order.
    pub roster: Vec<u32>,
    pub entities: HashMap<u32, Pokemon>,
    pub pending: HashSet<u32>,
    pub failed: HashSet<u32>,
    pub batch_seq: u64,

    pub selected_index: usize,
    pub detail: Option<u32>,
    pub banners: HashMap<String, String>,
    pub banner_loading: Option<String>,
    /// Detail sprites by pokemon name. Failures are kept so they are not refetched.
    pub sprites: HashMap<String, DataResource<SpriteData>>,

    pub list_error: Option<String>,
    pub tick: u64,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_page_size(POKEMON_PER_PAGE)
    }
}

impl AppState {
    pub fn with_page_size(page_size: u32) -> Self {
        Self {
            terminal_size: (80, 24),
            mode: DisplayMode::Modern,
            pager: Pager::new(page_size),
            names: DataResource::Empty,
            search: SearchState::default(),
            roster: Vec::new(),
            entities: HashMap::new(),
            pending: HashSet::new(),
            failed: HashSet::new(),
            batch_seq: 0,
            selected_index: 0,
            detail: None,
            banners: HashMap::new(),
            banner_loading: None,
            sprites: HashMap::new(),
            list_error: None,
            tick: 0,
        }
    }

    /// Entities for the current roster, in roster order. Ids that are not
    /// cached (pending or failed) are skipped.
    pub fn visible(&self) -> Vec<&Pokemon> {
        self.roster
            .iter()
            .filter_map(|id| self.entities.get(id))
            .collect()
    }

    pub fn selected(&self) -> Option<&Pokemon> {
        self.visible().get(self.selected_index).copied()
    }

    pub fn detail_pokemon(&self) -> Option<&Pokemon> {
        self.detail.and_then(|id| self.entities.get(&id))
    }

    pub fn detail_sprite(&self) -> Option<&DataResource<SpriteData>> {
        self.detail_pokemon()
            .and_then(|pokemon| self.sprites.get(&pokemon.name))
    }

    pub fn is_sprite_loading(&self) -> bool {
        self.sprites.values().any(DataResource::is_loading)
    }

    pub fn set_selected_index(&mut self, index: usize) -> bool {
        let len = self.visible().len();
        if len == 0 {
            self.selected_index = 0;
            return false;
        }
        let bounded = index.min(len - 1);
        if bounded != self.selected_index {
            self.selected_index = bounded;
            return true;
        }
        false
    }

    pub fn is_search_mode(&self) -> bool {
        self.search.is_search_mode()
    }

    /// Recompute the roster from the pager or the name index.
    pub fn rebuild_roster(&mut self) {
        self.roster = if self.is_search_mode() {
            match self.names.data() {
                Some(index) => match search::filter(index, &self.search.query) {
                    SearchResult::Browse => self.pager.ids(),
                    SearchResult::Matches(entries) => {
                        entries.into_iter().map(|entry| entry.id).collect()
                    }
                },
                None => Vec::new(),
            }
        } else {
            self.pager.ids()
        };

        let len = self.visible().len();
        if self.selected_index >= len {
            self.selected_index = len.saturating_sub(1);
        }
    }

    /// Roster ids that still need a fetch: not cached, not in flight, not failed.
    pub fn missing_ids(&self) -> Vec<u32> {
        self.roster
            .iter()
            .copied()
            .filter(|id| {
                !self.entities.contains_key(id)
                    && !self.pending.contains(id)
                    && !self.failed.contains(id)
            })
            .collect()
    }

    pub fn pending_in_roster(&self) -> usize {
        self.roster
            .iter()
            .filter(|id| self.pending.contains(id))
            .count()
    }

    pub fn failed_in_roster(&self) -> usize {
        self.roster
            .iter()
            .filter(|id| self.failed.contains(id))
            .count()
    }

    pub fn is_list_loading(&self) -> bool {
        if self.is_search_mode() {
            self.names.is_loading() || self.pending_in_roster() > 0
        } else {
            (self.pager.is_in_flight() && self.pager.total() == 0) || self.pending_in_roster() > 0
        }
    }

    pub fn near_list_end(&self) -> bool {
        let len = self.visible().len();
        len > 0 && self.selected_index + LOAD_MORE_THRESHOLD >= len
    }

    /// The error banner text. A name index failure only matters while searching.
    pub fn load_error(&self) -> Option<&str> {
        self.list_error.as_deref().or_else(|| {
            if self.is_search_mode() {
                self.names.error()
            } else {
                None
            }
        })
    }
}

impl DebugState for AppState {
    fn debug_sections(&self) -> Vec<DebugSection> {
        vec![
            DebugSection::new("Catalogue")
                .entry("pages", ron_string(&self.pager.pages.len()))
                .entry("listed", ron_string(&self.pager.total()))
                .entry("has_more", ron_string(&self.pager.has_more))
                .entry("in_flight", ron_string(&self.pager.is_in_flight()))
                .entry(
                    "name_index",
                    ron_string(&self.names.data().map(|index| index.len())),
                )
                .entry("cached", ron_string(&self.entities.len())),
            DebugSection::new("View")
                .entry("mode", ron_string(&self.mode))
                .entry("search", ron_string(&self.search.query))
                .entry("search_active", ron_string(&self.search.active))
                .entry("roster", ron_string(&self.roster.len()))
                .entry("selected", ron_string(&self.selected_index))
                .entry("detail", ron_string(&self.detail)),
            DebugSection::new("Status")
                .entry("pending", ron_string(&self.pending.len()))
                .entry("failed", ron_string(&self.failed.len()))
                .entry("banner_loading", ron_string(&self.banner_loading))
                .entry(
                    "sprites",
                    ron_string(&self.sprites.values().filter(|s| s.is_loaded()).count()),
                )
                .entry("sprite_loading", ron_string(&self.is_sprite_loading()))
                .entry("list_error", ron_string(&self.list_error))
                .entry("names_error", ron_string(&self.names.error())),
        ]
    }
}
