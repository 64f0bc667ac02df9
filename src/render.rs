use ratatui::{
    style::Style,
    text::{Line, Span},
};
use unicode_width::UnicodeWidthChar;

use crate::palette::Rgba;
use crate::surface::{CharRange, TextSurface};
use crate::theme::Theme;

/// Rendered view of the surface: styled lines plus the cell-to-offset map
/// used to resolve pointer positions back to document offsets.
#[derive(Debug)]
pub struct RenderResult {
    pub lines: Vec<Line<'static>>,
    pub total_lines: usize,
    cell_offsets: Vec<Vec<Option<usize>>>,
}

impl RenderResult {
    /// Resolve a visual position (line index within the full render, cell
    /// column) to the character offset rendered there. `None` when the cell
    /// is past the end of its line or below the text.
    pub fn offset_at(&self, line: usize, column: u16) -> Option<usize> {
        self.cell_offsets
            .get(line)?
            .get(column as usize)
            .copied()
            .flatten()
    }
}

/// Render the surface into wrapped, styled lines.
///
/// Each cell's background is the composite highlight color reported by
/// `color_at`, flattened against the theme background; the selection is
/// painted with the theme's selection style on top of everything.
pub fn render_surface<F>(
    surface: &TextSurface,
    width: usize,
    selection: Option<CharRange>,
    theme: &Theme,
    color_at: F,
) -> RenderResult
where
    F: Fn(usize) -> Option<Rgba>,
{
    let text = surface.text();
    let chars: Vec<(usize, char)> = text.chars().enumerate().collect();
    let wrapped = wrap_chars(&chars, width);

    let style_for = |offset: usize| -> Style {
        if selection.is_some_and(|sel| sel.contains(offset)) {
            theme.selection_style()
        } else if let Some(color) = color_at(offset) {
            Style::default()
                .fg(theme.text_fg)
                .bg(color.blend_onto(theme.background_rgb))
        } else {
            theme.text_style()
        }
    };

    let mut lines = Vec::with_capacity(wrapped.len());
    let mut cell_offsets = Vec::with_capacity(wrapped.len());
    for visual in &wrapped {
        let mut row: Vec<Option<usize>> = Vec::new();
        let mut spans: Vec<Span<'static>> = Vec::new();
        let mut pending = String::new();
        let mut pending_style = Style::default();

        for &(offset, ch, ch_width) in visual {
            let style = style_for(offset);
            if style != pending_style && !pending.is_empty() {
                spans.push(Span::styled(std::mem::take(&mut pending), pending_style));
            }
            pending_style = style;
            pending.push(ch);
            for _ in 0..ch_width {
                row.push(Some(offset));
            }
        }
        if !pending.is_empty() {
            spans.push(Span::styled(pending, pending_style));
        }

        lines.push(Line::from(spans));
        cell_offsets.push(row);
    }

    let total_lines = lines.len();
    RenderResult {
        lines,
        total_lines,
        cell_offsets,
    }
}

/// Greedy word wrap over `(offset, char)` pairs. Lines break after the last
/// space that fits; a line without one breaks hard at the width limit.
/// Zero-width characters are dropped from the visual output.
fn wrap_chars(chars: &[(usize, char)], width: usize) -> Vec<Vec<(usize, char, u16)>> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current: Vec<(usize, char, u16)> = Vec::new();
    let mut current_width = 0usize;

    for &(offset, ch) in chars {
        if ch == '\n' {
            lines.push(std::mem::take(&mut current));
            current_width = 0;
            continue;
        }
        let ch_width = UnicodeWidthChar::width(ch).unwrap_or(0);
        if ch_width == 0 {
            continue;
        }

        if current_width + ch_width > width && !current.is_empty() {
            let break_at = current
                .iter()
                .rposition(|&(_, c, _)| c == ' ')
                .map(|index| index + 1);
            match break_at {
                Some(split) if split < current.len() => {
                    let carry = current.split_off(split);
                    lines.push(std::mem::take(&mut current));
                    current = carry;
                    current_width = current.iter().map(|&(_, _, w)| w as usize).sum();
                }
                _ => {
                    lines.push(std::mem::take(&mut current));
                    current_width = 0;
                }
            }
        }

        current.push((offset, ch, ch_width as u16));
        current_width += ch_width;
    }

    lines.push(current);
    lines
}

#[cfg(test)]
#[path = "render_tests.rs"]
mod render_tests;
