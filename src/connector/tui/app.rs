use std::io::{self, Stdout};

use anyhow::Result;
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture, Event,
    EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use futures_util::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::application::{ChatInput, InputKey, InputOutcome, Message, PointerTarget};
use crate::connector::api::Container;
use crate::domain::StructuredReference;

use super::render::{self, FrameLayout, ViewState};

type ChatTerminal = Terminal<CrosstermBackend<Stdout>>;

/// Terminal chat screen: a transcript of sent messages above a chat input
/// with the connector typeahead overlay.
pub struct ChatApp {
    input: ChatInput,
    transcript: Vec<Message>,
    selected: mpsc::UnboundedReceiver<StructuredReference>,
    notice: Option<String>,
    scroll_row: u16,
    layout: FrameLayout,
    should_quit: bool,
}

impl ChatApp {
    pub fn new(mut input: ChatInput) -> Self {
        let (tx, selected) = mpsc::unbounded_channel();
        input.on_reference_selected(move |reference| {
            let _ = tx.send(reference.clone());
        });

        Self {
            input,
            transcript: Vec::new(),
            selected,
            notice: None,
            scroll_row: 0,
            layout: FrameLayout::default(),
            should_quit: false,
        }
    }

    pub fn input(&self) -> &ChatInput {
        &self.input
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub async fn run(&mut self, terminal: &mut ChatTerminal) -> Result<()> {
        let mut events = EventStream::new();

        loop {
            self.drain_selected();
            terminal.draw(|frame| {
                self.layout = render::draw(
                    frame,
                    ViewState {
                        input: &self.input,
                        transcript: &self.transcript,
                        notice: self.notice.as_deref(),
                        scroll_row: &mut self.scroll_row,
                    },
                );
            })?;

            if self.should_quit {
                return Ok(());
            }

            tokio::select! {
                maybe_event = events.next() => match maybe_event {
                    Some(Ok(event)) => self.handle_event(event),
                    Some(Err(e)) => return Err(e.into()),
                    None => return Ok(()),
                },
                _ = self.input.wait_for_search() => {}
            }
        }
    }

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Paste(text) => self.input.insert_str(&text),
            _ => {}
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') | KeyCode::Char('q') => self.should_quit = true,
                KeyCode::Char('s') => self.send(),
                KeyCode::Char('x') => {
                    let last = self.input.references().len().checked_sub(1);
                    if let Some(removed) = last.and_then(|i| self.input.remove_reference(i)) {
                        self.notice = Some(format!("Removed {}", removed.token()));
                    }
                }
                _ => {}
            }
            return;
        }

        let Some(input_key) = map_key(key.code) else {
            return;
        };
        self.notice = None;
        if let InputOutcome::Selected(reference) = self.input.handle_key(input_key) {
            debug!("Inserted {}", reference.token());
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let target = self.hit_test(mouse.column, mouse.row);
                self.input.pointer_down(target);
            }
            MouseEventKind::Moved => {
                if let PointerTarget::Option(index) = self.hit_test(mouse.column, mouse.row) {
                    self.input.pointer_hover(index);
                }
            }
            _ => {}
        }
    }

    fn hit_test(&self, column: u16, row: u16) -> PointerTarget {
        if let Some(overlay) = self.layout.overlay {
            if overlay.contains(column, row) {
                let list_row = usize::from(row.saturating_sub(self.layout.list_top));
                if row >= self.layout.list_top && list_row < self.layout.list_rows {
                    return PointerTarget::Option(self.layout.list_offset + list_row);
                }
                return PointerTarget::Overlay;
            }
        }
        if self.layout.text_box.contains(column, row) {
            return PointerTarget::TextBox;
        }
        PointerTarget::Outside
    }

    fn send(&mut self) {
        if let Some(message) = self.input.take_message() {
            info!(
                "Sending message with {} reference(s)",
                message.references.len()
            );
            self.scroll_row = 0;
            self.notice = None;
            self.transcript.push(message);
        }
    }

    fn drain_selected(&mut self) {
        while let Ok(reference) = self.selected.try_recv() {
            self.notice = Some(format!("Linked {} ({})", reference.token(), reference.url()));
        }
    }
}

fn map_key(code: KeyCode) -> Option<InputKey> {
    Some(match code {
        KeyCode::Char(c) => InputKey::Char(c),
        KeyCode::Backspace => InputKey::Backspace,
        KeyCode::Delete => InputKey::Delete,
        KeyCode::Left => InputKey::Left,
        KeyCode::Right => InputKey::Right,
        KeyCode::Home => InputKey::Home,
        KeyCode::End => InputKey::End,
        KeyCode::Up => InputKey::Up,
        KeyCode::Down => InputKey::Down,
        KeyCode::Enter => InputKey::Enter,
        KeyCode::Tab => InputKey::Tab,
        KeyCode::Esc => InputKey::Escape,
        _ => return None,
    })
}

/// Run the interactive chat until the user quits, restoring the terminal
/// even when the loop fails.
pub async fn run_chat(container: &Container) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableBracketedPaste,
        EnableMouseCapture
    )?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    terminal.clear()?;

    let mut app = ChatApp::new(container.chat_input());
    let result = app.run(&mut terminal).await;

    restore_terminal(&mut terminal)?;
    result
}

fn restore_terminal(terminal: &mut ChatTerminal) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::api::ContainerConfig;
    use crate::domain::Bounds;

    fn app() -> ChatApp {
        let container = Container::new(ContainerConfig {
            mock_connectors: true,
            ..ContainerConfig::default()
        })
        .unwrap();
        ChatApp::new(container.chat_input())
    }

    fn press(app: &mut ChatApp, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_text(app: &mut ChatApp, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_enter_selects_and_ctrl_s_sends() {
        let mut app = app();
        type_text(&mut app, "see @jira_OPS-14");
        app.input.wait_for_search().await;

        press(&mut app, KeyCode::Enter);
        app.drain_selected();
        assert_eq!(app.input().text(), "see [@jira OPS-14] ");
        assert!(app.notice().is_some_and(|n| n.starts_with("Linked [@jira OPS-14]")));

        app.handle_key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL));
        assert_eq!(app.transcript().len(), 1);
        assert_eq!(app.transcript()[0].references[0].id(), "OPS-14");
        assert_eq!(app.input().text(), "");
    }

    #[tokio::test]
    async fn test_ctrl_c_quits() {
        let mut app = app();
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit());
        assert_eq!(app.input().text(), "");
    }

    #[tokio::test]
    async fn test_hit_test_maps_option_rows() {
        let mut app = app();
        app.layout = FrameLayout {
            text_box: Bounds::new(0, 20, 80, 7),
            overlay: Some(Bounds::new(4, 10, 64, 6)),
            list_top: 11,
            list_offset: 2,
            list_rows: 3,
        };

        assert_eq!(app.hit_test(10, 12), PointerTarget::Option(3));
        assert_eq!(app.hit_test(10, 14), PointerTarget::Overlay);
        assert_eq!(app.hit_test(10, 22), PointerTarget::TextBox);
        assert_eq!(app.hit_test(10, 2), PointerTarget::Outside);
    }
}
