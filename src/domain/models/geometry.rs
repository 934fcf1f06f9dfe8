use serde::Serialize;

/// Viewport rectangle in terminal cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Bounds {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Bounds {
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> u16 {
        self.x.saturating_add(self.width)
    }

    pub fn bottom(&self) -> u16 {
        self.y.saturating_add(self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn contains(&self, column: u16, row: u16) -> bool {
        column >= self.x && column < self.right() && row >= self.y && row < self.bottom()
    }
}

/// Caret position in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CaretRect {
    pub left: u16,
    pub top: u16,
    pub height: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Edges {
    pub top: u16,
    pub right: u16,
    pub bottom: u16,
    pub left: u16,
}

impl Edges {
    pub const fn uniform(width: u16) -> Self {
        Self {
            top: width,
            right: width,
            bottom: width,
            left: width,
        }
    }

    pub fn horizontal(&self) -> u16 {
        self.left.saturating_add(self.right)
    }

    pub fn vertical(&self) -> u16 {
        self.top.saturating_add(self.bottom)
    }
}

/// Layout-affecting properties of a text box. Sizing is border-box: the
/// bounds of a box include its padding and border.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextBoxStyle {
    pub padding: Edges,
    pub border: Edges,
    pub tab_width: u16,
    pub line_height: u16,
}

impl Default for TextBoxStyle {
    fn default() -> Self {
        Self {
            padding: Edges::default(),
            border: Edges::uniform(1),
            tab_width: 4,
            line_height: 1,
        }
    }
}

impl TextBoxStyle {
    /// Width available to text inside a box of `outer_width` cells.
    pub fn content_width(&self, outer_width: u16) -> u16 {
        outer_width
            .saturating_sub(self.padding.horizontal())
            .saturating_sub(self.border.horizontal())
    }

    pub fn content_height(&self, outer_height: u16) -> u16 {
        outer_height
            .saturating_sub(self.padding.vertical())
            .saturating_sub(self.border.vertical())
    }

    /// The content area of a box placed at `bounds`.
    pub fn content_bounds(&self, bounds: Bounds) -> Bounds {
        Bounds::new(
            bounds
                .x
                .saturating_add(self.border.left)
                .saturating_add(self.padding.left),
            bounds
                .y
                .saturating_add(self.border.top)
                .saturating_add(self.padding.top),
            self.content_width(bounds.width),
            self.content_height(bounds.height),
        )
    }
}

/// Everything a caret locator needs to know about a text box.
#[derive(Debug, Clone, Copy)]
pub struct TextBox<'a> {
    pub text: &'a str,
    pub caret: usize,
    pub bounds: Bounds,
    pub style: TextBoxStyle,
    /// First visual row shown at the top of the content area.
    pub scroll_row: u16,
}

impl<'a> TextBox<'a> {
    pub fn new(text: &'a str, caret: usize, bounds: Bounds) -> Self {
        Self {
            text,
            caret,
            bounds,
            style: TextBoxStyle::default(),
            scroll_row: 0,
        }
    }

    pub fn with_style(mut self, style: TextBoxStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_scroll_row(mut self, scroll_row: u16) -> Self {
        self.scroll_row = scroll_row;
        self
    }
}
