use serde::{Deserialize, Serialize};

use crate::sprite::SpriteData;
use crate::state::{EntityBatch, ListingPage, NameEntry};

#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[action(infer_categories)]
pub enum Action {
    Init,

    // ===== Name index =====
    NameIndexDidLoad(Vec<NameEntry>),
    NameIndexDidError(String),

    // ===== Listing =====
    /// Request the next listing page (no-op while searching or in flight)
    ListLoadMore,
    ListingPageDidLoad(ListingPage),
    ListingPageDidError(String),

    /// Result of one aggregated entity fetch
    EntitiesDidLoad(EntityBatch),

    // ===== Search =====
    SearchStart,
    SearchInput(char),
    SearchBackspace,
    SearchCancel,
    SearchSubmit,
    /// Debounce timer fired for this query
    SearchSettled(String),

    // ===== Selection =====
    SelectionMove(i16),
    SelectionJumpTop,
    SelectionJumpBottom,
    DexSelect(usize),

    DetailOpen,
    DetailClose,

    // ===== UI =====
    UiToggleMode,
    UiTerminalResize(u16, u16),

    BannerDidRender { name: String, art: String },

    SpriteDidLoad { name: String, sprite: SpriteData },
    SpriteDidError { name: String, error: String },

    Tick,
    Quit,
}
