//! Side effects declared by the reducer and run by the effect handler in `main`.

#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    LoadNameIndex,
    LoadListingPage { offset: u32, limit: u32 },
    /// Fetch entities concurrently; `batch` makes the task key unique.
    LoadEntities { batch: u64, ids: Vec<u32> },
    /// Restart the search debounce timer for `query`.
    DebounceSearch { query: String },
    RenderBanner { name: String },
    /// Download and decode the detail sprite at `url`.
    LoadSprite { name: String, url: String },
}
