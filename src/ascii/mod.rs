//! Text-to-block-art rendering with a deterministic box fallback, plus the
//! small text helpers the ascii display mode draws with.

pub mod endpoint;
pub mod figlet;

use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

pub use figlet::FigletGlyphs;

pub const DEFAULT_FONT: &str = "Standard";

/// Names longer than this skip FIGlet and go straight to the box banner.
pub const BANNER_MAX_CHARS: usize = 10;

pub const STAT_BAR_WIDTH: usize = 20;

/// Highest base stat a bar is scaled against.
pub const STAT_MAX: u16 = 255;

const BOX_MIN_WIDTH: usize = 20;
const BOX_MIN_TEXT: usize = 16;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("text renderer is unavailable")]
    Unavailable,
    #[error("font '{font}' could not be loaded: {reason}")]
    Font { font: String, reason: String },
    #[error("font '{font}' cannot render the given text")]
    Glyphs { font: String },
}

/// A text-to-block-art integration.
pub trait Glyphs: Send + Sync {
    fn render(&self, text: &str, font: &str) -> Result<String, RenderError>;
}

#[derive(Clone, Default)]
pub struct AsciiArt {
    glyphs: Option<Arc<dyn Glyphs>>,
}

impl std::fmt::Debug for AsciiArt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsciiArt")
            .field("available", &self.is_available())
            .finish()
    }
}

impl AsciiArt {
    pub fn new(glyphs: impl Glyphs + 'static) -> Self {
        Self {
            glyphs: Some(Arc::new(glyphs)),
        }
    }

    pub fn unavailable() -> Self {
        Self { glyphs: None }
    }

    pub fn is_available(&self) -> bool {
        self.glyphs.is_some()
    }

    /// Render `text` in `font`. A failing non-default font is retried once
    /// with [`DEFAULT_FONT`]; when that fails too the first error is returned.
    pub fn render(&self, text: &str, font: &str) -> Result<String, RenderError> {
        let glyphs = self.glyphs.as_ref().ok_or(RenderError::Unavailable)?;

        match glyphs.render(text, font) {
            Ok(art) => Ok(art),
            Err(err) if is_default_font(font) => {
                tracing::warn!(%font, error = %err, "render failed");
                Err(err)
            }
            Err(err) => {
                tracing::warn!(%font, error = %err, "render failed, retrying with default font");
                glyphs.render(text, DEFAULT_FONT).map_err(|fallback| {
                    tracing::warn!(error = %fallback, "default font render failed");
                    err
                })
            }
        }
    }
}

pub fn is_default_font(font: &str) -> bool {
    font.eq_ignore_ascii_case(DEFAULT_FONT)
}

/// Three-line double-border frame around the upper-cased text.
pub fn box_banner(text: &str) -> String {
    let upper = text.to_uppercase();
    let len = upper.chars().count();
    let border = "═".repeat((len + 4).max(BOX_MIN_WIDTH));
    let width = len.max(BOX_MIN_TEXT);
    format!("╔{border}╗\n║  {upper:<width$}  ║\n╚{border}╝")
}

/// Name banner for the detail card: short names go through the render
/// endpoint, long ones and any failure use [`box_banner`].
pub fn banner(art: &AsciiArt, text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    if text.chars().count() > BANNER_MAX_CHARS {
        return box_banner(text);
    }
    endpoint::request_or(art, &endpoint::RenderRequest::new(text), box_banner)
}

pub fn stat_bar(value: u16, max: u16) -> String {
    let filled = if max == 0 {
        0
    } else {
        usize::from(value.min(max)) * STAT_BAR_WIDTH / usize::from(max)
    };
    let mut bar = "█".repeat(filled);
    bar.push_str(&"░".repeat(STAT_BAR_WIDTH - filled));
    bar
}

pub fn format_stat_name(name: &str) -> String {
    match name {
        "hp" => "HP".to_string(),
        "attack" => "Attack".to_string(),
        "defense" => "Defense".to_string(),
        "special-attack" => "Sp. Attack".to_string(),
        "special-defense" => "Sp. Defense".to_string(),
        "speed" => "Speed".to_string(),
        other => other
            .split('-')
            .map(capitalize)
            .collect::<Vec<_>>()
            .join(" "),
    }
}

pub fn type_badge(types: &[String]) -> String {
    types
        .iter()
        .map(|name| name.to_uppercase())
        .collect::<Vec<_>>()
        .join("/")
}

pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

static SHARED: OnceLock<AsciiArt> = OnceLock::new();

/// Install the process-wide renderer backed by FIGlet. The first call wins.
pub fn install(font_dir: Option<PathBuf>) -> &'static AsciiArt {
    SHARED.get_or_init(|| AsciiArt::new(FigletGlyphs::new(font_dir)))
}

pub fn shared() -> &'static AsciiArt {
    SHARED.get_or_init(|| AsciiArt::new(FigletGlyphs::default()))
}
