//! Word-wrapped text measurement.
//!
//! Glyph metrics belong to the renderer; the core only needs a width for a
//! run of text in a given font. `ApproxMeasure` is the headless fallback.

use crate::element::TextAttrs;
use crate::style::FontSpec;

/// Measures the advance width of a single line of text.
pub trait TextMeasure {
    fn measure_width(&self, text: &str, font: &FontSpec) -> f32;
}

/// Average-glyph approximation: every char is `0.6 × font size` wide.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproxMeasure;

impl TextMeasure for ApproxMeasure {
    fn measure_width(&self, text: &str, font: &FontSpec) -> f32 {
        text.chars().count() as f32 * font.size * 0.6
    }
}

/// Break `text` into lines no wider than `max_width`.
///
/// Explicit newlines always break. Words are packed greedily; a single word
/// wider than the line stays on its own line rather than being split.
pub fn wrap_lines(
    text: &str,
    max_width: f32,
    font: &FontSpec,
    measure: &dyn TextMeasure,
) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            if current.is_empty() {
                current.push_str(word);
                continue;
            }
            let candidate = format!("{current} {word}");
            if measure.measure_width(&candidate, font) > max_width {
                lines.push(std::mem::take(&mut current));
                current.push_str(word);
            } else {
                current = candidate;
            }
        }
        lines.push(current);
    }
    lines
}

/// Height a text element needs to show all wrapped lines at `width`.
pub fn text_height(attrs: &TextAttrs, width: f32, measure: &dyn TextMeasure) -> f32 {
    let font = attrs.font();
    let lines = wrap_lines(&attrs.content, width, &font, measure).len().max(1);
    lines as f32 * font.line_height()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn font(size: f32) -> FontSpec {
        FontSpec {
            family: "Arial".into(),
            size,
            bold: false,
            italic: false,
        }
    }

    #[test]
    fn short_text_is_one_line() {
        let lines = wrap_lines("hello world", 500.0, &font(10.0), &ApproxMeasure);
        assert_eq!(lines, vec!["hello world"]);
    }

    #[test]
    fn long_text_wraps_on_words() {
        // 6px per char: "aaaa bbbb" = 54px > 40px
        let lines = wrap_lines("aaaa bbbb cccc", 40.0, &font(10.0), &ApproxMeasure);
        assert_eq!(lines, vec!["aaaa", "bbbb", "cccc"]);
    }

    #[test]
    fn newlines_force_breaks_and_keep_empty_lines() {
        let lines = wrap_lines("a\n\nb", 500.0, &font(10.0), &ApproxMeasure);
        assert_eq!(lines, vec!["a", "", "b"]);
    }

    #[test]
    fn height_is_lines_times_line_height() {
        let attrs = TextAttrs {
            content: "aaaa bbbb".into(),
            font_size: 10.0,
            ..TextAttrs::default()
        };
        assert!((text_height(&attrs, 500.0, &ApproxMeasure) - 12.0).abs() < 0.01);
        assert!((text_height(&attrs, 30.0, &ApproxMeasure) - 24.0).abs() < 0.01);
    }
}
