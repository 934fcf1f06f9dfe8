mod caret_locator;
mod connector_adapter;

pub use caret_locator::*;
pub use connector_adapter::*;
