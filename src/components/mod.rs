pub mod detail_card;
pub mod header;
pub mod roster;
pub mod status_line;

use ratatui::style::Color;

pub use tui_dispatch::Component;

pub use detail_card::{DetailCard, DetailCardProps};
pub use header::{Header, HeaderProps};
pub use roster::{Roster, RosterProps};
pub use status_line::{StatusLine, StatusLineProps};

pub const BG_BASE: Color = Color::Rgb(12, 18, 28);
pub const BG_PANEL: Color = Color::Rgb(20, 32, 46);
pub const BG_HIGHLIGHT: Color = Color::Rgb(28, 92, 110);
pub const TEXT_MAIN: Color = Color::Rgb(232, 242, 244);
pub const TEXT_DIM: Color = Color::Rgb(176, 195, 207);
pub const ACCENT_TEAL: Color = Color::Rgb(72, 204, 184);
pub const ACCENT_GOLD: Color = Color::Rgb(228, 176, 88);
pub const ACCENT_RED: Color = Color::Rgb(230, 96, 96);

/// Ascii mode is monochrome.
pub const MONO_FG: Color = Color::Rgb(210, 210, 210);
pub const MONO_BG: Color = Color::Black;

pub fn type_color(name: &str) -> Color {
    match name {
        "fire" => Color::Rgb(239, 68, 68),
        "water" => Color::Rgb(59, 130, 246),
        "electric" => Color::Rgb(250, 204, 21),
        "grass" => Color::Rgb(34, 197, 94),
        "ice" => Color::Rgb(103, 232, 249),
        "fighting" => Color::Rgb(185, 28, 28),
        "poison" => Color::Rgb(168, 85, 247),
        "ground" => Color::Rgb(217, 119, 6),
        "flying" => Color::Rgb(129, 140, 248),
        "psychic" => Color::Rgb(236, 72, 153),
        "bug" => Color::Rgb(132, 204, 22),
        "rock" => Color::Rgb(146, 64, 14),
        "ghost" => Color::Rgb(126, 34, 206),
        "dragon" => Color::Rgb(67, 56, 202),
        "dark" => Color::Rgb(31, 41, 55),
        "steel" => Color::Rgb(107, 114, 128),
        "fairy" => Color::Rgb(249, 168, 212),
        _ => Color::Rgb(156, 163, 175),
    }
}

/// `special-attack` -> `Special Attack`
pub fn format_name(name: &str) -> String {
    name.split('-')
        .map(crate::ascii::capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn dex_number(id: u32) -> String {
    format!("#{id:03}")
}
