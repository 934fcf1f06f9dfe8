use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::application::{
    ChatInput, Message, SelectorOverlay, StatusRole, SELECTOR_HELP,
};
use crate::connector::adapter::{expand_tabs, MirrorLayout, TerminalCaretLocator};
use crate::domain::{Bounds, TextBoxStyle};

pub const INPUT_HEIGHT: u16 = 7;
pub const OVERLAY_WIDTH: u16 = 64;
pub const MAX_VISIBLE_OPTIONS: usize = 6;

const FOOTER_HELP: &str = "Ctrl+S send • Ctrl+X drop last reference • Ctrl+C quit";

/// Screen regions from the last frame, used to hit-test mouse events.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameLayout {
    pub text_box: Bounds,
    pub overlay: Option<Bounds>,
    /// First screen row of the option list inside the overlay.
    pub list_top: u16,
    /// Index of the option drawn on `list_top`.
    pub list_offset: usize,
    pub list_rows: usize,
}

pub struct ViewState<'a> {
    pub input: &'a ChatInput,
    pub transcript: &'a [Message],
    pub notice: Option<&'a str>,
    pub scroll_row: &'a mut u16,
}

pub fn to_bounds(rect: Rect) -> Bounds {
    Bounds::new(rect.x, rect.y, rect.width, rect.height)
}

pub fn to_rect(bounds: Bounds) -> Rect {
    Rect::new(bounds.x, bounds.y, bounds.width, bounds.height)
}

pub fn draw(frame: &mut Frame, view: ViewState<'_>) -> FrameLayout {
    let [transcript_area, chips_area, input_area, footer_area] = Layout::vertical([
        Constraint::Min(1),
        Constraint::Length(1),
        Constraint::Length(INPUT_HEIGHT),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    draw_transcript(frame, transcript_area, view.transcript);
    draw_chips(frame, chips_area, view.input);

    let style = TextBoxStyle::default();
    let text_box_bounds = to_bounds(input_area);
    keep_caret_visible(view.input, text_box_bounds, style, &mut *view.scroll_row);
    let text_box = view.input.text_box(text_box_bounds, style, *view.scroll_row);
    draw_text_box(frame, input_area, view.input, style, *view.scroll_row);

    let locator = TerminalCaretLocator::new();
    if let Some(caret) = locator.cursor(&text_box) {
        frame.set_cursor_position((caret.left, caret.top));
    }

    let footer = view.notice.unwrap_or(FOOTER_HELP);
    frame.render_widget(
        Paragraph::new(footer).style(Style::default().fg(Color::DarkGray)),
        footer_area,
    );

    let mut layout = FrameLayout {
        text_box: text_box_bounds,
        ..FrameLayout::default()
    };

    if let Some(selector) = view.input.selector() {
        let height = overlay_height(selector);
        let viewport = to_bounds(frame.area());
        if let Some(bounds) =
            view.input
                .overlay_bounds(&locator, &text_box, OVERLAY_WIDTH, height, viewport)
        {
            let (list_offset, list_rows) = draw_overlay(frame, to_rect(bounds), selector);
            layout.overlay = Some(bounds);
            layout.list_top = bounds.y + 1;
            layout.list_offset = list_offset;
            layout.list_rows = list_rows;
        }
    }

    layout
}

fn keep_caret_visible(input: &ChatInput, bounds: Bounds, style: TextBoxStyle, scroll_row: &mut u16) {
    let visible = usize::from(style.content_height(bounds.height).max(1));
    let text_box = input.text_box(bounds, style, 0);
    let Some(row) = TerminalCaretLocator::new().caret_row(&text_box) else {
        return;
    };
    let mut first = usize::from(*scroll_row);
    if row < first {
        first = row;
    } else if row >= first + visible {
        first = row + 1 - visible;
    }
    *scroll_row = u16::try_from(first).unwrap_or(u16::MAX);
}

fn draw_transcript(frame: &mut Frame, area: Rect, transcript: &[Message]) {
    let mut lines: Vec<Line> = Vec::new();
    for message in transcript {
        for (i, text) in message.text.lines().enumerate() {
            let marker = if i == 0 { "> " } else { "  " };
            lines.push(Line::from(vec![
                Span::styled(marker, Style::default().fg(Color::Cyan)),
                Span::raw(text.to_string()),
            ]));
        }
        for reference in &message.references {
            lines.push(Line::from(Span::styled(
                format!("  ↳ {} {}", reference.token(), reference.url()),
                Style::default().fg(Color::DarkGray),
            )));
        }
        lines.push(Line::default());
    }

    let block = Block::default().title("Conversation").borders(Borders::ALL);
    let inner_height = usize::from(area.height.saturating_sub(2));
    let skip = lines.len().saturating_sub(inner_height);
    let lines: Vec<Line> = lines.into_iter().skip(skip).collect();
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_chips(frame: &mut Frame, area: Rect, input: &ChatInput) {
    let mut spans = Vec::new();
    for reference in input.references() {
        spans.push(Span::styled(
            format!(" {} {} ", reference.connector().provider_initial(), reference.label()),
            Style::default().fg(Color::Black).bg(Color::LightBlue),
        ));
        spans.push(Span::raw(" "));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_text_box(frame: &mut Frame, area: Rect, input: &ChatInput, style: TextBoxStyle, scroll_row: u16) {
    let content = style.content_bounds(to_bounds(area));
    let mirror = MirrorLayout::measure(input.text(), content.width, style.tab_width);
    let lines: Vec<Line> = mirror
        .lines()
        .iter()
        .skip(usize::from(scroll_row))
        .take(usize::from(content.height))
        .map(|line| Line::raw(expand_tabs(&input.text()[line.start..line.end], style.tab_width)))
        .collect();

    let mut block = Block::default().title("Message").borders(Borders::ALL);
    if let Some(listbox) = input.controls() {
        block = block
            .title_bottom(Line::from(format!(" {} ", listbox)).right_aligned())
            .border_style(Style::default().fg(Color::LightBlue));
    }
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn overlay_height(selector: &SelectorOverlay) -> u16 {
    let rows = if selector.items().is_empty() {
        1
    } else {
        selector.items().len().min(MAX_VISIBLE_OPTIONS)
    };
    // Borders plus the help line.
    u16::try_from(rows).unwrap_or(1) + 3
}

/// Returns the index of the first visible option and the number of rows drawn.
fn draw_overlay(frame: &mut Frame, area: Rect, selector: &SelectorOverlay) -> (usize, usize) {
    frame.render_widget(Clear, area);
    let block = Block::default()
        .title(selector.title())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::LightBlue));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [list_area, help_area] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(inner);

    frame.render_widget(
        Paragraph::new(SELECTOR_HELP).style(Style::default().fg(Color::DarkGray)),
        help_area,
    );

    if let Some((text, role)) = selector.status() {
        let style = match role {
            StatusRole::Alert => Style::default().fg(Color::Red),
            StatusRole::Status => Style::default().fg(Color::Gray),
        };
        frame.render_widget(Paragraph::new(text).style(style), list_area);
        return (0, 0);
    }

    let rows = usize::from(list_area.height).max(1);
    let offset = selector.active_index().saturating_sub(rows - 1);
    let initial = selector.connector().provider_initial();

    let lines: Vec<Line> = selector
        .items()
        .iter()
        .enumerate()
        .skip(offset)
        .take(rows)
        .map(|(i, item)| {
            let mut line = Line::from(vec![
                Span::styled(format!(" {} ", initial), Style::default().fg(Color::LightBlue)),
                Span::styled(item.title().to_string(), Style::default().add_modifier(Modifier::BOLD)),
                Span::raw("  "),
                Span::styled(item.subtitle().to_string(), Style::default().fg(Color::Gray)),
                Span::styled(format!("  {}", item.item_type()), Style::default().fg(Color::DarkGray)),
            ]);
            if i == selector.active_index() {
                line = line.style(Style::default().add_modifier(Modifier::REVERSED));
            }
            line
        })
        .collect();

    let drawn = lines.len();
    frame.render_widget(Paragraph::new(lines), list_area);
    (offset, drawn)
}
