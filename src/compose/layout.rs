//! Pure layout calculations for the image composer.
//!
//! Everything here is arithmetic on dimensions and strings — no pixel
//! work, no I/O — so the wrap and geometry rules are unit testable
//! without font or image assets. The [`render`](super::render) module
//! turns these numbers into pixels.

/// Quote font height as a fraction of image height (48px on a 792px image).
pub const FONT_SIZE_RATIO: f32 = 48.0 / 792.0;

/// Horizontal text padding, in estimated character widths, per side.
pub const LANDSCAPE_TEXT_PADDING: u32 = 10;
pub const PORTRAIT_TEXT_PADDING: u32 = 5;

/// Watermark area as a fraction of image area (150x150 on 1920x1080).
pub const WATERMARK_AREA_RATIO: f64 = (150.0 * 150.0) / (1920.0 * 1080.0);
pub const WATERMARK_PADDING_RATIO: f64 = 1.0 / 5.0;
pub const WATERMARK_OUTLINE_RATIO: f64 = 1.0 / 40.0;

pub const DARK_OPAQUE: [u8; 4] = [53, 56, 57, 250];
pub const DARK_TRANSPARENT: [u8; 4] = [53, 56, 57, 190];
pub const LIGHT_OPAQUE: [u8; 4] = [248, 248, 255, 250];
pub const LIGHT_TRANSPARENT: [u8; 4] = [248, 248, 255, 190];

/// Overlay color scheme, chosen from image luminance so text and
/// watermark stay legible.
///
/// `Dark` means the *image* is dark: overlays use the light colors.
/// Opaque is used for text, translucent for the box fill and the
/// watermark outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Dark,
    Light,
}

impl Scheme {
    /// Decision boundary is exactly `mean <= 127` — dark image, light overlays.
    pub fn from_mean_luminance(mean: f64) -> Self {
        if mean <= 127.0 { Self::Dark } else { Self::Light }
    }

    pub fn text(self) -> [u8; 4] {
        match self {
            Self::Dark => LIGHT_OPAQUE,
            Self::Light => DARK_OPAQUE,
        }
    }

    /// Translucent fill for the text box and the watermark outline.
    pub fn translucent(self) -> [u8; 4] {
        match self {
            Self::Dark => LIGHT_TRANSPARENT,
            Self::Light => DARK_TRANSPARENT,
        }
    }
}

/// Quote font size in pixels for an image of the given height.
pub fn quote_font_px(image_height: u32) -> f32 {
    (image_height as f32 * FONT_SIZE_RATIO).floor()
}

/// Author font size: 3/4 of the quote size.
pub fn author_font_px(quote_px: f32) -> f32 {
    (quote_px * 3.0 / 4.0).floor()
}

/// Estimate how many characters fit on one line.
///
/// `avg_glyph_width` is the measured width of the full quote divided by
/// its character count. This is an approximation, not exact glyph
/// metrics; the greedy wrap re-measures nothing further. Padding is
/// wider for landscape images (width >= height) than portrait.
pub fn chars_per_line(width: u32, height: u32, avg_glyph_width: f32) -> usize {
    let padding = if width >= height {
        LANDSCAPE_TEXT_PADDING
    } else {
        PORTRAIT_TEXT_PADDING
    };
    let estimate = width as f32 / avg_glyph_width - (2 * padding) as f32;
    estimate.max(1.0) as usize
}

/// Greedy word wrap bounded by an estimated character width.
///
/// Never splits a word: a word longer than `width` gets its own line.
/// Joining all lines with single spaces reproduces the input (modulo
/// collapsed whitespace).
pub fn wrap_greedy(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_chars = 0usize;

    for word in text.split_whitespace() {
        let word_chars = word.chars().count();
        if current.is_empty() {
            current.push_str(word);
            current_chars = word_chars;
        } else if current_chars + 1 + word_chars <= width {
            current.push(' ');
            current.push_str(word);
            current_chars += 1 + word_chars;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
            current_chars = word_chars;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Vertical placement of the quote box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextBoxLayout {
    /// Top edge of the box (and of the first quote line).
    pub top: f32,
    pub line_height: f32,
    pub author_line_height: f32,
    /// Total box height: `line_height * lines + author_line_height`.
    pub height: f32,
}

/// Center the quote box vertically. The box spans the full image width.
pub fn text_box(
    image_height: u32,
    line_height: f32,
    line_count: usize,
    author_line_height: f32,
) -> TextBoxLayout {
    let height = line_height * line_count as f32 + author_line_height;
    TextBoxLayout {
        top: (image_height as f32 - height) / 2.0,
        line_height,
        author_line_height,
        height,
    }
}

/// Size and position of the circular watermark in the bottom-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatermarkLayout {
    /// Diameter of the circle (edge of the fitted square).
    pub edge: u32,
    pub x: u32,
    pub y: u32,
    pub padding: u32,
    pub outline_width: u32,
}

pub fn watermark_layout(width: u32, height: u32) -> WatermarkLayout {
    let area = width as f64 * height as f64 * WATERMARK_AREA_RATIO;
    let edge = area.sqrt() as u32;
    let padding = (edge as f64 * WATERMARK_PADDING_RATIO) as u32;
    WatermarkLayout {
        edge,
        x: padding,
        y: height.saturating_sub(edge + padding),
        padding,
        outline_width: ((edge as f64 * WATERMARK_OUTLINE_RATIO) as u32).max(1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // Contrast scheme
    // =========================================================================

    #[test]
    fn scheme_boundary_is_127() {
        assert_eq!(Scheme::from_mean_luminance(127.0), Scheme::Dark);
        assert_eq!(Scheme::from_mean_luminance(127.1), Scheme::Light);
        assert_eq!(Scheme::from_mean_luminance(0.0), Scheme::Dark);
        assert_eq!(Scheme::from_mean_luminance(255.0), Scheme::Light);
    }

    #[test]
    fn dark_image_gets_light_overlays() {
        let s = Scheme::Dark;
        assert_eq!(s.text(), LIGHT_OPAQUE);
        assert_eq!(s.translucent(), LIGHT_TRANSPARENT);
    }

    #[test]
    fn light_image_gets_dark_overlays() {
        let s = Scheme::Light;
        assert_eq!(s.text(), DARK_OPAQUE);
        assert_eq!(s.translucent(), DARK_TRANSPARENT);
    }

    #[test]
    fn identical_means_pick_identical_schemes() {
        for mean in [0.0, 64.5, 127.0, 128.0, 200.25] {
            assert_eq!(
                Scheme::from_mean_luminance(mean),
                Scheme::from_mean_luminance(mean)
            );
        }
    }

    // =========================================================================
    // Font sizing
    // =========================================================================

    #[test]
    fn quote_font_matches_reference_height() {
        assert_eq!(quote_font_px(792), 48.0);
    }

    #[test]
    fn author_font_is_three_quarters() {
        assert_eq!(author_font_px(48.0), 36.0);
        // Truncates like integer math
        assert_eq!(author_font_px(quote_font_px(600)), 27.0);
    }

    // =========================================================================
    // Line width estimate
    // =========================================================================

    #[test]
    fn landscape_uses_wider_padding() {
        // Same width and glyph size; the landscape image loses 20 chars
        // of padding, the portrait one only 10.
        let landscape = chars_per_line(1000, 600, 10.0);
        let portrait = chars_per_line(1000, 1600, 10.0);
        assert_eq!(landscape, 80);
        assert_eq!(portrait, 90);
    }

    #[test]
    fn square_image_counts_as_landscape() {
        assert_eq!(chars_per_line(800, 800, 10.0), 60);
    }

    #[test]
    fn chars_per_line_never_below_one() {
        assert_eq!(chars_per_line(10, 5, 100.0), 1);
    }

    // =========================================================================
    // Greedy wrap
    // =========================================================================

    fn assert_wrap_invariant(text: &str, width: usize) {
        let lines = wrap_greedy(text, width);
        for line in &lines {
            for word in line.split(' ') {
                assert!(
                    text.split_whitespace().any(|w| w == word),
                    "line split a word: {word:?}"
                );
            }
        }
        let rejoined = lines.join(" ");
        let normalized: Vec<&str> = text.split_whitespace().collect();
        assert_eq!(rejoined, normalized.join(" "));
    }

    #[test]
    fn wrap_reassembles_to_original() {
        assert_wrap_invariant("The clearest way into the Universe is through a forest wilderness", 20);
        assert_wrap_invariant("\"Life is beautiful\"", 8);
        assert_wrap_invariant("one", 1);
    }

    #[test]
    fn wrap_respects_width_when_words_fit() {
        let lines = wrap_greedy("aa bb cc dd", 5);
        assert_eq!(lines, vec!["aa bb", "cc dd"]);
        for line in &lines {
            assert!(line.chars().count() <= 5);
        }
    }

    #[test]
    fn wrap_never_splits_long_words() {
        let lines = wrap_greedy("tiny incomprehensibilities tiny", 6);
        assert_eq!(lines, vec!["tiny", "incomprehensibilities", "tiny"]);
    }

    #[test]
    fn wrap_single_line_when_text_fits() {
        let lines = wrap_greedy("\"Life is beautiful\"", 51);
        assert_eq!(lines, vec!["\"Life is beautiful\""]);
    }

    #[test]
    fn wrap_empty_text_yields_no_lines() {
        assert!(wrap_greedy("", 10).is_empty());
        assert!(wrap_greedy("   ", 10).is_empty());
    }

    #[test]
    fn wrap_zero_width_treated_as_one() {
        let lines = wrap_greedy("a b c", 0);
        assert_eq!(lines.len(), 3);
    }

    // =========================================================================
    // Box geometry
    // =========================================================================

    #[test]
    fn box_is_vertically_centered() {
        let layout = text_box(600, 50.0, 4, 36.0);
        assert_eq!(layout.height, 236.0);
        assert_eq!(layout.top, (600.0 - 236.0) / 2.0);
    }

    #[test]
    fn box_with_no_lines_is_author_row_only() {
        let layout = text_box(600, 50.0, 0, 36.0);
        assert_eq!(layout.height, 36.0);
    }

    // =========================================================================
    // Watermark geometry
    // =========================================================================

    #[test]
    fn watermark_reference_frame() {
        // 1920x1080 is the reference: 150px circle, 30px padding, 3px outline.
        let w = watermark_layout(1920, 1080);
        assert_eq!(w.edge, 150);
        assert_eq!(w.padding, 30);
        assert_eq!(w.x, 30);
        assert_eq!(w.y, 1080 - 150 - 30);
        assert_eq!(w.outline_width, 3);
    }

    #[test]
    fn watermark_scales_with_area() {
        let small = watermark_layout(960, 540);
        assert_eq!(small.edge, 75);
        assert_eq!(small.padding, 15);
    }

    #[test]
    fn watermark_outline_is_at_least_one_pixel() {
        let tiny = watermark_layout(64, 64);
        assert!(tiny.outline_width >= 1);
    }

    #[test]
    fn watermark_sits_in_bottom_left() {
        let w = watermark_layout(1000, 600);
        assert!(w.y + w.edge + w.padding <= 600);
        assert_eq!(w.x, w.padding);
    }
}
