use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};
use uuid::Uuid;

use crate::application::use_cases::{
    ConnectorRegistry, DebouncedSearch, SearchConnectorUseCase, SearchOutcome, SelectorAction,
    SelectorKey, SelectorOverlay,
};
use crate::application::CaretLocator;
use crate::domain::{
    compose_reference, floor_char_boundary, place_overlay, Bounds, Selection, StructuredReference,
    TextBox, TextBoxStyle, TriggerMatch,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKey {
    Char(char),
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,
    Up,
    Down,
    Enter,
    Tab,
    Escape,
}

impl InputKey {
    fn as_selector_key(self) -> Option<SelectorKey> {
        match self {
            InputKey::Up => Some(SelectorKey::Up),
            InputKey::Down => Some(SelectorKey::Down),
            InputKey::Enter => Some(SelectorKey::Enter),
            InputKey::Tab => Some(SelectorKey::Tab),
            InputKey::Escape => Some(SelectorKey::Escape),
            _ => None,
        }
    }
}

/// Where a pointer press landed, as hit-tested by the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    TextBox,
    Overlay,
    Option(usize),
    Outside,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputOutcome {
    Ignored,
    Edited,
    CaretMoved,
    /// The overlay consumed the event (navigation, hover).
    Overlay,
    Closed,
    Selected(StructuredReference),
}

/// A composed message and the references picked while typing it.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub text: String,
    pub references: Vec<StructuredReference>,
}

type ReferenceCallback = Box<dyn FnMut(&StructuredReference) + Send>;

/// Text buffer with connector typeahead.
///
/// Every edit or caret move re-parses the trigger at the caret. A trigger
/// opens the selector overlay and schedules a debounced search; losing the
/// trigger closes the overlay and cancels the search. Committing a selection
/// inserts the reference token, records the reference as a chip and fires
/// the `on_reference_selected` callback once.
pub struct ChatInput {
    registry: Arc<ConnectorRegistry>,
    search: DebouncedSearch,
    text: String,
    caret: usize,
    trigger: Option<TriggerMatch>,
    selector: Option<SelectorOverlay>,
    references: Vec<StructuredReference>,
    listbox_id: String,
    on_reference_selected: Option<ReferenceCallback>,
}

impl ChatInput {
    pub fn new(use_case: Arc<SearchConnectorUseCase>) -> Self {
        let registry = Arc::clone(use_case.registry());
        Self {
            registry,
            search: DebouncedSearch::new(use_case),
            text: String::new(),
            caret: 0,
            trigger: None,
            selector: None,
            references: Vec::new(),
            listbox_id: format!("connector-listbox-{}", Uuid::new_v4().simple()),
            on_reference_selected: None,
        }
    }

    pub fn with_debounce(mut self, delay: Duration) -> Self {
        self.search = self.search.with_delay(delay);
        self
    }

    pub fn on_reference_selected<F>(&mut self, callback: F)
    where
        F: FnMut(&StructuredReference) + Send + 'static,
    {
        self.on_reference_selected = Some(Box::new(callback));
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn caret(&self) -> usize {
        self.caret
    }

    pub fn registry(&self) -> &Arc<ConnectorRegistry> {
        &self.registry
    }

    pub fn trigger(&self) -> Option<&TriggerMatch> {
        self.trigger.as_ref()
    }

    pub fn selector(&self) -> Option<&SelectorOverlay> {
        self.selector.as_ref()
    }

    pub fn is_selector_open(&self) -> bool {
        self.selector.is_some()
    }

    pub fn references(&self) -> &[StructuredReference] {
        &self.references
    }

    pub fn listbox_id(&self) -> &str {
        &self.listbox_id
    }

    /// Listbox controlled by the text box while the overlay is open.
    pub fn controls(&self) -> Option<&str> {
        self.selector.as_ref().map(|_| self.listbox_id.as_str())
    }

    /// Id of the highlighted option while the overlay shows results.
    pub fn active_descendant(&self) -> Option<String> {
        self.selector.as_ref().and_then(SelectorOverlay::active_descendant)
    }

    /// Replace the whole buffer, e.g. after an external edit.
    pub fn set_text(&mut self, text: impl Into<String>, caret: usize) {
        self.text = text.into();
        self.caret = floor_char_boundary(&self.text, caret);
        self.sync_trigger();
    }

    pub fn set_caret(&mut self, caret: usize) -> InputOutcome {
        let caret = floor_char_boundary(&self.text, caret);
        if caret == self.caret {
            return InputOutcome::Ignored;
        }
        self.caret = caret;
        self.sync_trigger();
        InputOutcome::CaretMoved
    }

    pub fn insert_char(&mut self, c: char) {
        self.text.insert(self.caret, c);
        self.caret += c.len_utf8();
        self.sync_trigger();
    }

    pub fn insert_str(&mut self, s: &str) {
        if s.is_empty() {
            return;
        }
        self.text.insert_str(self.caret, s);
        self.caret += s.len();
        self.sync_trigger();
    }

    pub fn backspace(&mut self) -> InputOutcome {
        let Some(c) = self.text[..self.caret].chars().next_back() else {
            return InputOutcome::Ignored;
        };
        self.caret -= c.len_utf8();
        self.text.remove(self.caret);
        self.sync_trigger();
        InputOutcome::Edited
    }

    pub fn delete(&mut self) -> InputOutcome {
        if self.caret >= self.text.len() {
            return InputOutcome::Ignored;
        }
        self.text.remove(self.caret);
        self.sync_trigger();
        InputOutcome::Edited
    }

    /// Type a string one char at a time, as a user would.
    pub fn type_str(&mut self, s: &str) {
        for c in s.chars() {
            self.handle_key(InputKey::Char(c));
        }
    }

    pub fn handle_key(&mut self, key: InputKey) -> InputOutcome {
        if let (Some(selector), Some(selector_key)) = (self.selector.as_mut(), key.as_selector_key())
        {
            match selector.handle_key(selector_key) {
                SelectorAction::Handled => return InputOutcome::Overlay,
                SelectorAction::Close => {
                    self.close_selector();
                    return InputOutcome::Closed;
                }
                SelectorAction::Commit(selection) => {
                    return InputOutcome::Selected(self.commit(selection));
                }
                SelectorAction::Ignored => {}
            }
        }

        match key {
            InputKey::Char(c) => {
                self.insert_char(c);
                InputOutcome::Edited
            }
            InputKey::Enter => {
                self.insert_char('\n');
                InputOutcome::Edited
            }
            InputKey::Backspace => self.backspace(),
            InputKey::Delete => self.delete(),
            InputKey::Left => {
                let prev = self.text[..self.caret]
                    .chars()
                    .next_back()
                    .map_or(self.caret, |c| self.caret - c.len_utf8());
                self.set_caret(prev)
            }
            InputKey::Right => {
                let next = self.text[self.caret..]
                    .chars()
                    .next()
                    .map_or(self.caret, |c| self.caret + c.len_utf8());
                self.set_caret(next)
            }
            InputKey::Home => {
                let line_start = self.text[..self.caret].rfind('\n').map_or(0, |i| i + 1);
                self.set_caret(line_start)
            }
            InputKey::End => {
                let line_end = self.text[self.caret..]
                    .find('\n')
                    .map_or(self.text.len(), |i| self.caret + i);
                self.set_caret(line_end)
            }
            InputKey::Up | InputKey::Down | InputKey::Tab | InputKey::Escape => InputOutcome::Ignored,
        }
    }

    pub fn pointer_down(&mut self, target: PointerTarget) -> InputOutcome {
        match target {
            PointerTarget::Outside if self.selector.is_some() => {
                self.close_selector();
                InputOutcome::Closed
            }
            PointerTarget::Option(index) => {
                match self.selector.as_mut().and_then(|s| s.click(index)) {
                    Some(selection) => InputOutcome::Selected(self.commit(selection)),
                    None => InputOutcome::Ignored,
                }
            }
            _ => InputOutcome::Ignored,
        }
    }

    pub fn pointer_hover(&mut self, index: usize) -> InputOutcome {
        match self.selector.as_mut() {
            Some(selector) => {
                if selector.hover(index) {
                    InputOutcome::Overlay
                } else {
                    InputOutcome::Ignored
                }
            }
            None => InputOutcome::Ignored,
        }
    }

    /// Feed a search outcome to the overlay. Returns whether anything changed.
    pub fn apply_search_outcome(&mut self, outcome: SearchOutcome) -> bool {
        match self.selector.as_mut() {
            Some(selector) => selector.apply(outcome),
            None => false,
        }
    }

    /// Apply every outcome that has already arrived.
    pub fn poll_search(&mut self) -> bool {
        let mut changed = false;
        while let Some(outcome) = self.search.try_next() {
            changed |= self.apply_search_outcome(outcome);
        }
        changed
    }

    /// Wait for the next current search outcome and apply it. Cancel safe.
    pub async fn wait_for_search(&mut self) -> bool {
        match self.search.next().await {
            Some(outcome) => self.apply_search_outcome(outcome),
            None => false,
        }
    }

    pub fn remove_reference(&mut self, index: usize) -> Option<StructuredReference> {
        (index < self.references.len()).then(|| self.references.remove(index))
    }

    /// Take the composed message and its references, leaving an empty buffer.
    pub fn take_message(&mut self) -> Option<Message> {
        if self.text.trim().is_empty() {
            return None;
        }
        self.close_selector();
        self.trigger = None;
        self.caret = 0;
        Some(Message {
            text: std::mem::take(&mut self.text),
            references: std::mem::take(&mut self.references),
        })
    }

    pub fn text_box(&self, bounds: Bounds, style: TextBoxStyle, scroll_row: u16) -> TextBox<'_> {
        TextBox::new(&self.text, self.caret, bounds)
            .with_style(style)
            .with_scroll_row(scroll_row)
    }

    /// Where to draw the overlay, or `None` when it is closed or the caret
    /// cannot be measured.
    pub fn overlay_bounds(
        &self,
        locator: &dyn CaretLocator,
        text_box: &TextBox<'_>,
        width: u16,
        height: u16,
        viewport: Bounds,
    ) -> Option<Bounds> {
        self.selector.as_ref()?;
        let caret = locator.locate(text_box)?;
        place_overlay(caret, width, height, viewport)
    }

    fn sync_trigger(&mut self) {
        let Some(trigger) = self.registry.parse_trigger_at_caret(&self.text, self.caret) else {
            if self.trigger.take().is_some() || self.selector.is_some() {
                debug!("Trigger gone, closing selector");
                self.close_selector();
            }
            return;
        };

        let same_session = self
            .trigger
            .as_ref()
            .is_some_and(|previous| previous.same_session(&trigger));

        let selector = match self.selector.take() {
            Some(selector) if same_session => {
                if selector.query() == trigger.query() {
                    self.selector = Some(selector);
                    self.trigger = Some(trigger);
                    return;
                }
                selector
            }
            _ => {
                let display_name = self
                    .registry
                    .get(trigger.connector())
                    .map(|adapter| adapter.display_name().to_string())
                    .unwrap_or_else(|| trigger.connector().display_name().to_string());
                debug!(
                    "Opening {} selector at offset {}",
                    trigger.connector(),
                    trigger.start()
                );
                SelectorOverlay::new(trigger.connector(), display_name, self.listbox_id.clone())
            }
        };

        let mut selector = selector;
        let generation = self.search.request(trigger.connector(), trigger.query());
        selector.begin_query(trigger.query(), generation);
        self.selector = Some(selector);
        self.trigger = Some(trigger);
    }

    fn close_selector(&mut self) {
        self.selector = None;
        self.search.cancel();
    }

    fn commit(&mut self, selection: Selection) -> StructuredReference {
        let reference = selection.reference;

        if let Some(trigger) = self.trigger.take() {
            let composed = compose_reference(&self.text, self.caret, &trigger, &reference);
            self.text = composed.text;
            self.caret = composed.caret;
        }
        self.close_selector();

        info!(
            "Selected {} reference {} ({})",
            reference.connector(),
            reference.id(),
            reference.title()
        );
        self.references.push(reference.clone());
        if let Some(callback) = self.on_reference_selected.as_mut() {
            callback(&reference);
        }
        reference
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::MockConnector;
    use crate::domain::{ConnectorId, SearchItem};
    use std::sync::Mutex;

    fn chat_input() -> ChatInput {
        let registry = ConnectorRegistry::builder()
            .register(Arc::new(MockConnector::new(ConnectorId::Jira)))
            .register(Arc::new(MockConnector::new(ConnectorId::Confluence)))
            .build()
            .unwrap();
        ChatInput::new(Arc::new(SearchConnectorUseCase::new(Arc::new(registry))))
    }

    #[tokio::test]
    async fn test_typing_trigger_opens_selector() {
        let mut input = chat_input();

        input.type_str("hi @jira_TE");

        let selector = input.selector().expect("selector");
        assert_eq!(selector.connector(), ConnectorId::Jira);
        assert_eq!(selector.query(), "TE");
        assert!(selector.is_loading());
        assert_eq!(input.controls(), Some(input.listbox_id()));
    }

    #[tokio::test]
    async fn test_space_closes_selector() {
        let mut input = chat_input();
        input.type_str("@jira_TE");
        input.handle_key(InputKey::Char(' '));

        assert!(!input.is_selector_open());
        assert!(input.trigger().is_none());
        assert_eq!(input.controls(), None);
    }

    #[tokio::test]
    async fn test_moving_caret_away_closes_selector() {
        let mut input = chat_input();
        input.type_str("ok @jira_A");

        input.handle_key(InputKey::Home);

        assert!(!input.is_selector_open());
    }

    #[tokio::test(start_paused = true)]
    async fn test_escape_closes_without_selection() {
        let mut input = chat_input();
        let calls = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&calls);
        input.on_reference_selected(move |_| *counter.lock().unwrap() += 1);

        input.type_str("@jira_TEST");
        input.wait_for_search().await;

        assert_eq!(input.handle_key(InputKey::Escape), InputOutcome::Closed);
        assert!(!input.is_selector_open());
        assert_eq!(input.text(), "@jira_TEST");
        assert_eq!(*calls.lock().unwrap(), 0);

        // The next keystroke re-evaluates the trigger.
        input.handle_key(InputKey::Char('-'));
        assert!(input.is_selector_open());
    }

    #[tokio::test(start_paused = true)]
    async fn test_enter_commits_and_fires_callback_once() {
        let mut input = chat_input();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        input.on_reference_selected(move |r| sink.lock().unwrap().push(r.clone()));

        input.type_str("Please see @jira_TEST-1");
        assert!(input.wait_for_search().await);
        assert_eq!(
            input.active_descendant(),
            Some(format!("{}-option-0", input.listbox_id()))
        );

        let outcome = input.handle_key(InputKey::Enter);

        assert!(matches!(outcome, InputOutcome::Selected(ref r) if r.id() == "TEST-1"));
        assert_eq!(input.text(), "Please see [@jira TEST-1] ");
        assert_eq!(input.caret(), input.text().len());
        assert!(!input.is_selector_open());
        assert_eq!(input.references().len(), 1);

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].connector(), ConnectorId::Jira);
        assert_eq!(seen[0].id(), "TEST-1");
    }

    #[tokio::test]
    async fn test_enter_without_selector_inserts_newline() {
        let mut input = chat_input();
        input.type_str("line");
        input.handle_key(InputKey::Enter);
        assert_eq!(input.text(), "line\n");
    }

    #[tokio::test(start_paused = true)]
    async fn test_pointer_outside_closes() {
        let mut input = chat_input();
        input.type_str("@confluence_Hand");

        assert_eq!(input.pointer_down(PointerTarget::TextBox), InputOutcome::Ignored);
        assert!(input.is_selector_open());
        assert_eq!(input.pointer_down(PointerTarget::Outside), InputOutcome::Closed);
        assert!(!input.is_selector_open());
    }

    #[tokio::test(start_paused = true)]
    async fn test_click_option_commits_confluence_title() {
        let mut input = chat_input();
        input.type_str("read @confluence_Hand");
        input.wait_for_search().await;

        let outcome = input.pointer_down(PointerTarget::Option(0));

        assert!(matches!(outcome, InputOutcome::Selected(_)));
        assert_eq!(input.text(), "read [@confluence Team Handbook] ");
    }

    #[tokio::test(start_paused = true)]
    async fn test_hover_moves_active_option_before_enter() {
        let items = vec![
            SearchItem::new("OPS-1", "First", "https://jira.test/OPS-1", "issue"),
            SearchItem::new("OPS-2", "Second", "https://jira.test/OPS-2", "issue"),
        ];
        let registry = ConnectorRegistry::builder()
            .register(Arc::new(MockConnector::with_items(ConnectorId::Jira, items)))
            .build()
            .unwrap();
        let mut input = ChatInput::new(Arc::new(SearchConnectorUseCase::new(Arc::new(registry))));
        input.type_str("@jira_OPS");
        input.wait_for_search().await;

        assert_eq!(input.pointer_hover(1), InputOutcome::Overlay);
        assert_eq!(input.pointer_hover(1), InputOutcome::Ignored);
        assert_eq!(input.pointer_hover(7), InputOutcome::Ignored);
        assert_eq!(
            input.active_descendant(),
            Some(format!("{}-option-1", input.listbox_id()))
        );

        let outcome = input.handle_key(InputKey::Enter);

        assert!(matches!(outcome, InputOutcome::Selected(ref r) if r.id() == "OPS-2"));
        assert_eq!(input.text(), "[@jira OPS-2] ");
    }

    #[tokio::test]
    async fn test_hover_without_selector_is_ignored() {
        let mut input = chat_input();
        input.type_str("plain text");

        assert_eq!(input.pointer_hover(0), InputOutcome::Ignored);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_outcome_after_close_is_dropped() {
        let mut input = chat_input();
        input.type_str("@jira_TEST");
        input.handle_key(InputKey::Escape);

        tokio::time::sleep(Duration::from_secs(1)).await;

        assert!(!input.poll_search());
        assert!(!input.is_selector_open());
    }

    #[tokio::test]
    async fn test_remove_reference_and_take_message() {
        let mut input = chat_input();
        let item = SearchItem::new("A-1", "Alpha", "u", "issue");
        input.type_str("@jira_A");
        input.commit(Selection::new(ConnectorId::Jira, item));
        input.type_str("and @jira_B");
        input.commit(Selection::new(ConnectorId::Jira, SearchItem::new("B-2", "Beta", "u", "issue")));

        assert_eq!(input.text(), "[@jira A-1] and [@jira B-2] ");
        assert_eq!(input.remove_reference(0).map(|r| r.id().to_string()), Some("A-1".into()));
        assert!(input.remove_reference(5).is_none());

        let message = input.take_message().expect("message");
        assert_eq!(message.references.len(), 1);
        assert_eq!(input.text(), "");
        assert!(input.take_message().is_none());
    }
}
