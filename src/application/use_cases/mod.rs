mod chat_input;
mod connector_registry;
mod debounced_search;
mod search_connector;
mod selector_overlay;

pub use chat_input::*;
pub use connector_registry::*;
pub use debounced_search::*;
pub use search_connector::*;
pub use selector_overlay::*;
