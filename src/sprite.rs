//! Pokemon sprites: PNG bytes decoded with `image`, cropped to their opaque
//! bounds and drawn into the terminal as half-block cells or ascii shading.

use image::imageops::{self, FilterType};
use ratatui::{buffer::Buffer, layout::Rect, style::Color, widgets::Widget};
use serde::{Deserialize, Serialize};

/// Terminal cells are roughly twice as tall as they are wide.
const CELL_ASPECT: f32 = 2.0;

/// Larger images are scaled down to this edge before they are cached.
const MAX_EDGE: u32 = 128;

const ALPHA_CUTOFF: u8 = 128;

/// Darkest to brightest.
const SHADES: &[char] = &['.', ':', '-', '=', '+', '*', '#', '%', '@'];

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SpriteError {
    #[error("image decode failed: {0}")]
    Decode(String),
    #[error("image has no visible pixels")]
    Empty,
}

/// Decoded RGBA pixels, row-major.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpriteData {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<[u8; 4]>,
}

impl SpriteData {
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get((y * self.width + x) as usize).copied()
    }

    /// The pixel at `(x, y)` if it is opaque enough to draw.
    fn visible(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.pixel(x, y).filter(|pixel| pixel[3] >= ALPHA_CUTOFF)
    }
}

pub fn decode_sprite(bytes: &[u8]) -> Result<SpriteData, SpriteError> {
    let rgba = image::load_from_memory(bytes)
        .map_err(|err| SpriteError::Decode(err.to_string()))?
        .to_rgba8();

    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for (x, y, pixel) in rgba.enumerate_pixels() {
        if pixel[3] < ALPHA_CUTOFF {
            continue;
        }
        bounds = Some(match bounds {
            None => (x, y, x, y),
            Some((min_x, min_y, max_x, max_y)) => {
                (min_x.min(x), min_y.min(y), max_x.max(x), max_y.max(y))
            }
        });
    }
    let (min_x, min_y, max_x, max_y) = bounds.ok_or(SpriteError::Empty)?;

    let mut cropped =
        imageops::crop_imm(&rgba, min_x, min_y, max_x - min_x + 1, max_y - min_y + 1).to_image();
    let (width, height) = cropped.dimensions();
    if width.max(height) > MAX_EDGE {
        let scale = MAX_EDGE as f32 / width.max(height) as f32;
        let new_width = ((width as f32 * scale).round() as u32).max(1);
        let new_height = ((height as f32 * scale).round() as u32).max(1);
        cropped = imageops::resize(&cropped, new_width, new_height, FilterType::Nearest);
    }

    let (width, height) = cropped.dimensions();
    Ok(SpriteData {
        width,
        height,
        pixels: cropped.pixels().map(|pixel| pixel.0).collect(),
    })
}

/// Largest `(cols, rows)` inside the given cell box that keeps the image
/// aspect ratio. Never scales past one cell column per pixel.
pub fn sprite_fit(sprite: &SpriteData, max_cols: u16, max_rows: u16) -> (u16, u16) {
    if max_cols == 0 || max_rows == 0 || sprite.width == 0 || sprite.height == 0 {
        return (0, 0);
    }
    let max_cols = max_cols.min(u16::try_from(sprite.width).unwrap_or(u16::MAX));
    let image_ratio = sprite.width as f32 / sprite.height as f32;
    let max_cols_f = max_cols as f32;
    let max_rows_f = max_rows as f32;
    let cols_for_max_rows = image_ratio * max_rows_f * CELL_ASPECT;
    if cols_for_max_rows <= max_cols_f {
        let cols = cols_for_max_rows.max(1.0).round() as u16;
        return (cols.max(1), max_rows.max(1));
    }
    let rows_for_max_cols = max_cols_f / (image_ratio * CELL_ASPECT);
    let rows = rows_for_max_cols.max(1.0).round() as u16;
    (max_cols.max(1), rows.min(max_rows).max(1))
}

/// Nearest-neighbour source pixel for sub-row `sub` of `subs` at column `col`.
fn sample(
    sprite: &SpriteData,
    (cols, rows): (u16, u16),
    col: u16,
    sub: u32,
    subs: u32,
) -> Option<[u8; 4]> {
    let x = u32::from(col) * sprite.width / u32::from(cols);
    let y = sub * sprite.height / (u32::from(rows) * subs);
    sprite.visible(x, y)
}

fn rgb(pixel: [u8; 4]) -> Color {
    Color::Rgb(pixel[0], pixel[1], pixel[2])
}

/// Half-block rendering: each cell shows two stacked pixels, `▀` with the
/// top one as foreground and the bottom one as background.
pub struct SpriteView<'a> {
    sprite: &'a SpriteData,
}

impl<'a> SpriteView<'a> {
    pub fn new(sprite: &'a SpriteData) -> Self {
        Self { sprite }
    }
}

impl Widget for SpriteView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let size = sprite_fit(self.sprite, area.width, area.height);
        let (cols, rows) = size;
        if cols == 0 || rows == 0 {
            return;
        }
        let left = area.x + (area.width - cols) / 2;
        let top = area.y + (area.height - rows) / 2;

        for row in 0..rows {
            for col in 0..cols {
                let upper = sample(self.sprite, size, col, u32::from(row) * 2, 2);
                let lower = sample(self.sprite, size, col, u32::from(row) * 2 + 1, 2);
                let Some(cell) = buf.cell_mut((left + col, top + row)) else {
                    continue;
                };
                match (upper, lower) {
                    (Some(upper), Some(lower)) => {
                        cell.set_symbol("▀").set_fg(rgb(upper)).set_bg(rgb(lower));
                    }
                    (Some(upper), None) => {
                        cell.set_symbol("▀").set_fg(rgb(upper));
                    }
                    (None, Some(lower)) => {
                        cell.set_symbol("▄").set_fg(rgb(lower));
                    }
                    (None, None) => {}
                }
            }
        }
    }
}

fn shade(pixel: [u8; 4]) -> char {
    let luma = (299 * u32::from(pixel[0]) + 587 * u32::from(pixel[1]) + 114 * u32::from(pixel[2]))
        / 1000;
    let index = luma as usize * (SHADES.len() - 1) / 255;
    SHADES[index]
}

/// Monochrome rendering for the ascii display mode, one character per cell.
pub fn ascii_sprite(sprite: &SpriteData, max_cols: u16, max_rows: u16) -> Vec<String> {
    let size = sprite_fit(sprite, max_cols, max_rows);
    let (cols, rows) = size;
    (0..rows)
        .map(|row| {
            let line: String = (0..cols)
                .map(|col| {
                    sample(sprite, size, col, u32::from(row) * 2 + 1, 2)
                        .map(shade)
                        .unwrap_or(' ')
                })
                .collect();
            line.trim_end().to_string()
        })
        .collect()
}
