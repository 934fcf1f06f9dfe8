use crate::domain::{CaretRect, TextBox};

/// Maps a caret offset inside a text box to viewport coordinates.
///
/// Returning `None` means the caret could not be measured; callers skip
/// positioning (and drawing) the overlay rather than failing.
pub trait CaretLocator: Send + Sync {
    fn locate(&self, text_box: &TextBox<'_>) -> Option<CaretRect>;
}
