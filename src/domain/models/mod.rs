mod connector;
mod geometry;
mod search_item;
mod structured_reference;
mod trigger_match;

pub use connector::*;
pub use geometry::*;
pub use search_item::*;
pub use structured_reference::*;
pub use trigger_match::*;
