use unicode_width::UnicodeWidthChar;

use crate::application::CaretLocator;
use crate::domain::{floor_char_boundary, CaretRect, TextBox};

/// One visual row of laid-out text, as a byte range of the source string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisualLine {
    pub start: usize,
    pub end: usize,
}

/// Off-screen layout of text in a box `width` cells wide.
///
/// Pre-wrap semantics: explicit newlines are kept, lines wrap at whitespace,
/// and a word wider than the whole line is broken between characters.
/// Whitespace that overflows a row hangs at its end instead of wrapping.
/// Tabs advance to the next multiple of `tab_width`.
#[derive(Debug, Clone)]
pub struct MirrorLayout {
    lines: Vec<VisualLine>,
    width: usize,
    tab_width: usize,
    end_row: usize,
    end_column: usize,
}

struct Cursor {
    lines: Vec<VisualLine>,
    line_start: usize,
    row: usize,
    column: usize,
}

impl Cursor {
    fn break_at(&mut self, offset: usize, next_start: usize) {
        self.lines.push(VisualLine {
            start: self.line_start,
            end: offset,
        });
        self.line_start = next_start;
        self.row += 1;
        self.column = 0;
    }
}

fn char_width(c: char, column: usize, tab_width: usize) -> usize {
    if c == '\t' {
        tab_width - column % tab_width
    } else {
        c.width().unwrap_or(0)
    }
}

impl MirrorLayout {
    pub fn measure(text: &str, width: u16, tab_width: u16) -> Self {
        let width = usize::from(width.max(1));
        let tab_width = usize::from(tab_width.max(1));

        let mut cursor = Cursor {
            lines: Vec::new(),
            line_start: 0,
            row: 0,
            column: 0,
        };
        let mut after_space = true;

        for (i, c) in text.char_indices() {
            if c == '\n' {
                cursor.break_at(i, i + 1);
                after_space = true;
                continue;
            }

            let w = char_width(c, cursor.column, tab_width);
            if c.is_whitespace() {
                cursor.column = (cursor.column + w).min(width);
                after_space = true;
                continue;
            }

            if after_space && cursor.column > 0 {
                let word: usize = text[i..]
                    .chars()
                    .take_while(|c| !c.is_whitespace())
                    .map(|c| c.width().unwrap_or(0))
                    .sum();
                if word <= width && cursor.column + word > width {
                    cursor.break_at(i, i);
                }
            }
            if cursor.column > 0 && cursor.column + w > width {
                cursor.break_at(i, i);
            }

            cursor.column += w;
            after_space = false;
        }

        let Cursor {
            mut lines,
            line_start,
            row,
            column,
        } = cursor;
        lines.push(VisualLine {
            start: line_start,
            end: text.len(),
        });

        Self {
            lines,
            width,
            tab_width,
            end_row: row,
            end_column: column,
        }
    }

    pub fn lines(&self) -> &[VisualLine] {
        &self.lines
    }

    pub fn row_count(&self) -> usize {
        self.lines.len()
    }

    /// `(row, column)` of a zero-width marker placed after the text.
    pub fn end_position(&self) -> (usize, usize) {
        (self.end_row, self.end_column)
    }

    /// `(row, column)` of byte `offset` within the laid-out `text`, which must
    /// be the string this layout was measured from.
    ///
    /// An offset on a wrap boundary belongs to the row that starts there.
    pub fn position_of(&self, text: &str, offset: usize) -> (usize, usize) {
        let offset = floor_char_boundary(text, offset);
        let row = self
            .lines
            .iter()
            .rposition(|line| line.start <= offset)
            .unwrap_or(0);
        let Some(&line) = self.lines.get(row) else {
            return (0, 0);
        };
        let end = offset.min(line.end);

        let mut column = 0;
        for c in text[line.start..end].chars() {
            let w = char_width(c, column, self.tab_width);
            column = if c.is_whitespace() {
                (column + w).min(self.width)
            } else {
                column + w
            };
        }
        (row, column)
    }
}

/// Text of a visual line with tabs expanded to spaces.
pub fn expand_tabs(line: &str, tab_width: u16) -> String {
    let tab_width = usize::from(tab_width.max(1));
    let mut out = String::with_capacity(line.len());
    let mut column = 0;
    for c in line.chars() {
        if c == '\t' {
            let n = tab_width - column % tab_width;
            out.extend(std::iter::repeat(' ').take(n));
            column += n;
        } else {
            out.push(c);
            column += c.width().unwrap_or(0);
        }
    }
    out
}

/// Locates the caret of a terminal text box by laying out the text before
/// the caret in a mirror of the box and reading where it ends.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalCaretLocator;

impl TerminalCaretLocator {
    pub fn new() -> Self {
        Self
    }

    /// Visual row of the caret in the full layout, before scrolling is applied.
    pub fn caret_row(&self, text_box: &TextBox<'_>) -> Option<usize> {
        let content = text_box.style.content_bounds(text_box.bounds);
        if content.is_empty() {
            return None;
        }
        let mirror = MirrorLayout::measure(text_box.text, content.width, text_box.style.tab_width);
        Some(mirror.position_of(text_box.text, text_box.caret).0)
    }

    /// Screen cell of the drawn caret.
    ///
    /// Unlike [`locate`](CaretLocator::locate), which measures only the text
    /// before the caret, this lays out the whole buffer exactly as the text
    /// box draws it, so a caret inside a word that wraps lands on the word's row.
    pub fn cursor(&self, text_box: &TextBox<'_>) -> Option<CaretRect> {
        let content = text_box.style.content_bounds(text_box.bounds);
        if content.is_empty() {
            return None;
        }
        let mirror = MirrorLayout::measure(text_box.text, content.width, text_box.style.tab_width);
        let (row, column) = mirror.position_of(text_box.text, text_box.caret);
        place(text_box, row, column)
    }
}

fn place(text_box: &TextBox<'_>, row: usize, column: usize) -> Option<CaretRect> {
    let style = text_box.style;
    let content = style.content_bounds(text_box.bounds);

    let row = row.checked_sub(usize::from(text_box.scroll_row))?;
    let line_height = usize::from(style.line_height.max(1));

    let left = usize::from(content.x) + column;
    let top = usize::from(content.y) + row * line_height;
    let max_left = usize::from(content.right().saturating_sub(1));
    let max_top = usize::from(content.bottom().saturating_sub(1));

    Some(CaretRect {
        left: u16::try_from(left.min(max_left)).unwrap_or(u16::MAX),
        top: u16::try_from(top.min(max_top)).unwrap_or(u16::MAX),
        height: style.line_height.max(1),
    })
}

impl CaretLocator for TerminalCaretLocator {
    fn locate(&self, text_box: &TextBox<'_>) -> Option<CaretRect> {
        let style = text_box.style;
        let content = style.content_bounds(text_box.bounds);
        if content.is_empty() {
            return None;
        }

        let caret = floor_char_boundary(text_box.text, text_box.caret);
        let mirror = MirrorLayout::measure(&text_box.text[..caret], content.width, style.tab_width);
        let (row, column) = mirror.end_position();
        place(text_box, row, column)
    }
}
