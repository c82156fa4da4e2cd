use std::path::{Path, PathBuf};

use figlet_rs::FIGfont;

use super::{is_default_font, Glyphs, RenderError};

/// FIGlet-backed glyph renderer. The standard font is built in; any other
/// font name is looked up as `<font_dir>/<name>.flf`.
#[derive(Clone, Debug, Default)]
pub struct FigletGlyphs {
    font_dir: Option<PathBuf>,
}

impl FigletGlyphs {
    pub fn new(font_dir: Option<PathBuf>) -> Self {
        Self { font_dir }
    }

    fn load(&self, font: &str) -> Result<FIGfont, RenderError> {
        if is_default_font(font) {
            return FIGfont::standard().map_err(|reason| RenderError::Font {
                font: font.to_string(),
                reason,
            });
        }

        let dir = self.font_dir.as_deref().ok_or_else(|| RenderError::Font {
            font: font.to_string(),
            reason: "no font directory configured".to_string(),
        })?;
        let path = font_path(dir, font).ok_or_else(|| RenderError::Font {
            font: font.to_string(),
            reason: "invalid font name".to_string(),
        })?;
        let path = path.to_str().ok_or_else(|| RenderError::Font {
            font: font.to_string(),
            reason: "font path is not valid UTF-8".to_string(),
        })?;
        FIGfont::from_file(path).map_err(|reason| RenderError::Font {
            font: font.to_string(),
            reason,
        })
    }
}

impl Glyphs for FigletGlyphs {
    fn render(&self, text: &str, font: &str) -> Result<String, RenderError> {
        let figfont = self.load(font)?;
        let figure = figfont.convert(text).ok_or_else(|| RenderError::Glyphs {
            font: font.to_string(),
        })?;
        Ok(figure.to_string())
    }
}

/// Font names are plain file stems; anything that could escape the font
/// directory is rejected.
fn font_path(dir: &Path, font: &str) -> Option<PathBuf> {
    let valid = !font.is_empty()
        && font
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ' '));
    valid.then(|| dir.join(format!("{font}.flf")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_font_renders_multiline() {
        let art = FigletGlyphs::default().render("Hi", "Standard").unwrap();
        assert!(art.lines().count() > 1);
    }

    #[test]
    fn test_standard_lookup_is_case_insensitive() {
        assert!(FigletGlyphs::default().render("Hi", "standard").is_ok());
    }

    #[test]
    fn test_unknown_font_without_dir_fails() {
        let err = FigletGlyphs::default().render("Hi", "Doom").unwrap_err();
        assert!(matches!(err, RenderError::Font { ref font, .. } if font == "Doom"));
    }

    #[test]
    fn test_missing_font_file_fails() {
        let glyphs = FigletGlyphs::new(Some(std::env::temp_dir().join("pokedex-no-fonts")));
        assert!(matches!(
            glyphs.render("Hi", "Doom"),
            Err(RenderError::Font { .. })
        ));
    }

    #[test]
    fn test_font_path_rejects_traversal() {
        let dir = Path::new("/fonts");
        assert_eq!(font_path(dir, "big"), Some(PathBuf::from("/fonts/big.flf")));
        assert_eq!(font_path(dir, "../etc/passwd"), None);
        assert_eq!(font_path(dir, ""), None);
    }
}
