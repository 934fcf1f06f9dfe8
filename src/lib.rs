pub mod application;
pub mod cli;
pub mod connector;
pub mod domain;

pub use cli::{Commands, OutputFormat};

pub use application::{
    CaretLocator, ChatInput, ConnectorAdapter, ConnectorRegistry, DebouncedSearch, InputKey,
    InputOutcome, Message, PointerTarget, SearchConnectorUseCase, SearchOptions, SearchOutcome,
    SelectorAction, SelectorKey, SelectorOverlay, SelectorState, StatusRole,
};

pub use connector::{
    Container, ContainerConfig, HttpConnector, MirrorLayout, MockConnector, Router,
    TerminalCaretLocator,
};

pub use domain::{
    compose_reference, parse_trigger_at_caret, place_overlay, Bounds, CaretRect, Composition,
    ConnectorId, CreateResult, DomainError, SearchItem, Selection, StructuredReference, TextBox,
    TextBoxStyle, TriggerMatch,
};
