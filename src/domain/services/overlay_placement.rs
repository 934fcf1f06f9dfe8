use crate::domain::{Bounds, CaretRect};

/// Cells kept free between the overlay and the left/right viewport edges.
pub const OVERLAY_MARGIN: u16 = 1;

/// Anchor an overlay of `width` x `height` cells to the caret.
///
/// The overlay opens on the line below the caret and flips above it when
/// there is not enough room underneath. It is shifted horizontally and, if
/// needed, shrunk so that it stays fully inside `viewport`. Returns `None`
/// when the viewport cannot hold any part of it.
pub fn place_overlay(caret: CaretRect, width: u16, height: u16, viewport: Bounds) -> Option<Bounds> {
    let usable_width = viewport.width.saturating_sub(OVERLAY_MARGIN * 2);
    let width = width.min(usable_width);
    if width == 0 || height == 0 || viewport.is_empty() {
        return None;
    }

    let min_left = viewport.x + OVERLAY_MARGIN;
    let max_left = viewport.right().saturating_sub(OVERLAY_MARGIN + width).max(min_left);
    let left = caret.left.clamp(min_left, max_left);

    let below = caret
        .top
        .saturating_add(caret.height)
        .clamp(viewport.y, viewport.bottom());
    let space_below = viewport.bottom() - below;
    let caret_top = caret.top.clamp(viewport.y, viewport.bottom());
    let space_above = caret_top - viewport.y;

    let (top, height) = if height <= space_below {
        (below, height)
    } else if height <= space_above {
        (caret_top - height, height)
    } else if space_below >= space_above {
        (below, space_below)
    } else {
        (viewport.y, space_above)
    };

    if height == 0 {
        return None;
    }

    Some(Bounds::new(left, top, width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Bounds = Bounds::new(0, 0, 80, 24);

    fn caret(left: u16, top: u16) -> CaretRect {
        CaretRect {
            left,
            top,
            height: 1,
        }
    }

    #[test]
    fn test_opens_below_caret() {
        let placed = place_overlay(caret(10, 5), 30, 8, VIEWPORT).unwrap();
        assert_eq!(placed, Bounds::new(10, 6, 30, 8));
    }

    #[test]
    fn test_flips_above_when_no_room_below() {
        let placed = place_overlay(caret(10, 20), 30, 8, VIEWPORT).unwrap();
        assert_eq!(placed, Bounds::new(10, 12, 30, 8));
    }

    #[test]
    fn test_shifts_left_to_stay_in_viewport() {
        let placed = place_overlay(caret(70, 2), 30, 4, VIEWPORT).unwrap();
        assert_eq!(placed.right(), 79);
        assert_eq!(placed.x, 49);
    }

    #[test]
    fn test_shrinks_to_fit_small_viewport() {
        let viewport = Bounds::new(0, 0, 20, 6);
        let placed = place_overlay(caret(2, 1), 40, 10, viewport).unwrap();

        assert_eq!(placed.width, 18);
        assert_eq!(placed.y, 2);
        assert_eq!(placed.height, 4);
    }

    #[test]
    fn test_no_room_returns_none() {
        assert_eq!(place_overlay(caret(0, 0), 10, 3, Bounds::new(0, 0, 2, 1)), None);
    }
}
