pub mod complete_controller;
pub mod connectors_controller;
pub mod create_controller;
pub mod parse_controller;
pub mod search_controller;

pub use complete_controller::CompleteController;
pub use connectors_controller::ConnectorsController;
pub use create_controller::CreateController;
pub use parse_controller::ParseController;
pub use search_controller::SearchController;

use crate::domain::SearchItem;

/// One result per block: provider initial, id, title and type, then the
/// snippet (or url) indented below.
pub(crate) fn format_items(items: &[SearchItem], initial: char) -> String {
    let mut output = String::new();
    for (i, item) in items.iter().enumerate() {
        output.push_str(&format!(
            "{}. [{}] {}  {}  ({})\n",
            i + 1,
            initial,
            item.id(),
            item.title(),
            item.item_type()
        ));
        output.push_str(&format!("   {}\n", item.subtitle()));
    }
    output
}
