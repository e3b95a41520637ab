//! Label fitting for the SVG panels. The browser picks the actual sans-serif
//! face, so widths are approximated from typical advance widths per glyph class.

const ELLIPSIS: char = '…';

/// Advance width of `ch` as a fraction of the font size.
fn advance_em(ch: char) -> f32 {
    match ch {
        'i' | 'j' | 'l' | '.' | ',' | '\'' | '|' | '!' | ':' | ';' => 0.28,
        ' ' | 'f' | 't' | 'r' | 'I' | '(' | ')' | '-' => 0.36,
        'm' | 'w' | 'M' | 'W' => 0.86,
        '0'..='9' | '…' => 0.56,
        c if c.is_ascii_uppercase() => 0.68,
        c if c.is_ascii_lowercase() => 0.54,
        _ => 0.62,
    }
}

/// Estimated rendered width of `text` in pixels at `font_px`.
pub fn text_width_px(text: &str, font_px: u32) -> u32 {
    let em: f32 = text.chars().map(advance_em).sum();
    (em * font_px as f32).ceil() as u32
}

/// Cut `text` so it fits in `max_px`, ending with an ellipsis when shortened.
/// Returns an empty string when not even the ellipsis fits.
pub fn fit_label(text: &str, font_px: u32, max_px: u32) -> String {
    if text_width_px(text, font_px) <= max_px {
        return text.to_string();
    }
    let budget = max_px as f32 / font_px.max(1) as f32 - advance_em(ELLIPSIS);
    if budget < 0.0 {
        return String::new();
    }
    let mut used = 0.0;
    let mut out: String = text
        .chars()
        .take_while(|&ch| {
            used += advance_em(ch);
            used <= budget
        })
        .collect();
    out.truncate(out.trim_end().len());
    out.push(ELLIPSIS);
    out
}
