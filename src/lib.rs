//! Pokedex - a Pokemon catalogue TUI built on tui-dispatch
//!
//! The library exposes the app's modules for the binary and for testing.

pub mod action;
pub mod api;
pub mod ascii;
pub mod components;
pub mod effect;
pub mod logging;
pub mod pager;
pub mod reducer;
pub mod search;
pub mod sprite;
pub mod state;
pub mod ui;
