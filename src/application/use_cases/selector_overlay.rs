use tracing::debug;

use crate::application::use_cases::SearchOutcome;
use crate::domain::{ConnectorId, SearchItem, Selection};

pub const SELECTOR_HELP: &str = "↑/↓ to navigate • Enter select • Esc close";
pub const SEARCHING_TEXT: &str = "Searching…";

#[derive(Debug, Clone, PartialEq)]
pub enum SelectorState {
    Loading,
    Results(Vec<SearchItem>),
    Empty,
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorKey {
    Up,
    Down,
    Enter,
    Tab,
    Escape,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SelectorAction {
    /// Not for the overlay; the host should handle the key itself.
    Ignored,
    Handled,
    Close,
    Commit(Selection),
}

/// How a status line should be announced: `Alert` for failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusRole {
    Status,
    Alert,
}

/// Result list state machine for one trigger session.
#[derive(Debug, Clone)]
pub struct SelectorOverlay {
    connector: ConnectorId,
    display_name: String,
    listbox_id: String,
    query: String,
    generation: u64,
    state: SelectorState,
    active_index: usize,
}

impl SelectorOverlay {
    pub fn new(
        connector: ConnectorId,
        display_name: impl Into<String>,
        listbox_id: impl Into<String>,
    ) -> Self {
        Self {
            connector,
            display_name: display_name.into(),
            listbox_id: listbox_id.into(),
            query: String::new(),
            generation: 0,
            state: SelectorState::Loading,
            active_index: 0,
        }
    }

    /// A new query was sent for this session; wait for its outcome.
    pub fn begin_query(&mut self, query: impl Into<String>, generation: u64) {
        self.query = query.into();
        self.generation = generation;
        self.state = SelectorState::Loading;
    }

    /// Apply a search outcome. Returns `false` when the outcome belongs to an
    /// older query and was ignored.
    pub fn apply(&mut self, outcome: SearchOutcome) -> bool {
        if outcome.generation != self.generation || outcome.connector != self.connector {
            debug!(
                "Overlay ignoring outcome #{} (waiting for #{})",
                outcome.generation, self.generation
            );
            return false;
        }

        self.state = match outcome.result {
            Ok(items) if items.is_empty() => SelectorState::Empty,
            Ok(items) => {
                self.active_index = 0;
                SelectorState::Results(items)
            }
            Err(e) => SelectorState::Error(e.to_string()),
        };
        true
    }

    pub fn handle_key(&mut self, key: SelectorKey) -> SelectorAction {
        if key == SelectorKey::Escape {
            return SelectorAction::Close;
        }

        let len = self.items().len();
        match key {
            SelectorKey::Down => {
                if len > 0 {
                    self.active_index = (self.active_index + 1).min(len - 1);
                }
                SelectorAction::Handled
            }
            SelectorKey::Up => {
                self.active_index = self.active_index.saturating_sub(1);
                SelectorAction::Handled
            }
            SelectorKey::Enter | SelectorKey::Tab => match self.selection(self.active_index) {
                Some(selection) => SelectorAction::Commit(selection),
                None => SelectorAction::Ignored,
            },
            SelectorKey::Escape => SelectorAction::Close,
        }
    }

    /// Pointer moved over option `index`.
    pub fn hover(&mut self, index: usize) -> bool {
        if index < self.items().len() && index != self.active_index {
            self.active_index = index;
            return true;
        }
        false
    }

    /// Pointer clicked option `index`: highlight it and commit.
    pub fn click(&mut self, index: usize) -> Option<Selection> {
        let selection = self.selection(index)?;
        self.active_index = index;
        Some(selection)
    }

    fn selection(&self, index: usize) -> Option<Selection> {
        self.items()
            .get(index)
            .map(|item| Selection::new(self.connector, item.clone()))
    }

    pub fn connector(&self) -> ConnectorId {
        self.connector
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn state(&self) -> &SelectorState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, SelectorState::Loading)
    }

    pub fn items(&self) -> &[SearchItem] {
        match &self.state {
            SelectorState::Results(items) => items,
            _ => &[],
        }
    }

    pub fn active_index(&self) -> usize {
        self.active_index
    }

    pub fn active_item(&self) -> Option<&SearchItem> {
        self.items().get(self.active_index)
    }

    pub fn listbox_id(&self) -> &str {
        &self.listbox_id
    }

    pub fn option_id(&self, index: usize) -> String {
        format!("{}-option-{}", self.listbox_id, index)
    }

    /// Id of the highlighted option, for the host's active-descendant.
    pub fn active_descendant(&self) -> Option<String> {
        self.active_item().map(|_| self.option_id(self.active_index))
    }

    pub fn title(&self) -> String {
        format!("{} • Suggestions", self.display_name)
    }

    /// Status line shown instead of the list, if any.
    pub fn status(&self) -> Option<(String, StatusRole)> {
        match &self.state {
            SelectorState::Loading => Some((SEARCHING_TEXT.to_string(), StatusRole::Status)),
            SelectorState::Empty => {
                let query = if self.query.is_empty() { "…" } else { &self.query };
                Some((format!("No results for “{}”.", query), StatusRole::Status))
            }
            SelectorState::Error(message) => Some((message.clone(), StatusRole::Alert)),
            SelectorState::Results(_) => None,
        }
    }
}
