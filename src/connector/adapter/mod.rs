mod http_connector;
mod mock_connector;
mod terminal_caret_locator;

pub use http_connector::*;
pub use mock_connector::*;
pub use terminal_caret_locator::*;
