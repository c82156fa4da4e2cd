//! Incremental listing controller: pages are fetched one at a time and appended.

use serde::{Deserialize, Serialize};

use crate::state::ListingPage;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub offset: u32,
    pub limit: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pager {
    pub page_size: u32,
    pub pages: Vec<ListingPage>,
    pub has_more: bool,
    in_flight: bool,
}

impl Default for Pager {
    fn default() -> Self {
        Self::new(crate::state::POKEMON_PER_PAGE)
    }
}

impl Pager {
    pub fn new(page_size: u32) -> Self {
        Self {
            page_size: page_size.max(1),
            pages: Vec::new(),
            has_more: true,
            in_flight: false,
        }
    }

    /// Claim the next page. Returns `None` while a page is in flight or once
    /// the listing is exhausted, so repeated triggers collapse into one fetch.
    pub fn begin_next(&mut self) -> Option<PageRequest> {
        if self.in_flight || !self.has_more {
            return None;
        }
        // An offset past u32 cannot be addressed upstream; the listing ends there.
        let Some(offset) = u32::try_from(self.pages.len())
            .ok()
            .and_then(|pages| pages.checked_mul(self.page_size))
        else {
            self.has_more = false;
            return None;
        };
        self.in_flight = true;
        Some(PageRequest {
            offset,
            limit: self.page_size,
        })
    }

    pub fn complete(&mut self, page: ListingPage) {
        self.has_more = page.has_more;
        self.pages.push(page);
        self.in_flight = false;
    }

    pub fn fail(&mut self) {
        self.in_flight = false;
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn total(&self) -> usize {
        self.pages.iter().map(|page| page.entries.len()).sum()
    }

    pub fn ids(&self) -> Vec<u32> {
        self.pages
            .iter()
            .flat_map(|page| page.entries.iter().map(|entry| entry.id))
            .collect()
    }
}
