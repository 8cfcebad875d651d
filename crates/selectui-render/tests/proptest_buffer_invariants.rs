//! Property tests for buffer clipping.

use proptest::prelude::*;
use selectui_core::geometry::Rect;
use selectui_render::buffer::Buffer;
use selectui_render::cell::Cell;

fn arb_rect() -> impl Strategy<Value = Rect> {
    (0u16..30, 0u16..30, 0u16..30, 0u16..30).prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
}

proptest! {
    #[test]
    fn writes_never_escape_scissor(
        scissor in arb_rect(),
        writes in prop::collection::vec((0u16..40, 0u16..40, prop::sample::select(vec!['a', '中'])), 0..50),
    ) {
        let mut buf = Buffer::new(24, 24);
        buf.push_scissor(scissor);
        let clip = buf.current_scissor();
        for (x, y, c) in writes {
            buf.set(x, y, Cell::from_char(c));
        }
        for y in 0..buf.height() {
            for x in 0..buf.width() {
                let cell = buf.get(x, y).copied().unwrap_or_default();
                if !clip.contains(x, y) {
                    prop_assert!(cell.is_empty(), "write escaped scissor at ({x},{y})");
                }
            }
        }
    }

    #[test]
    fn continuation_always_follows_a_wide_head(
        writes in prop::collection::vec((0u16..8, prop::sample::select(vec!['a', '中', 'b'])), 0..40),
    ) {
        let mut buf = Buffer::new(8, 1);
        for (x, c) in writes {
            buf.set(x, 0, Cell::from_char(c));
        }
        let row = buf.row_cells(0);
        for (i, cell) in row.iter().enumerate() {
            if cell.is_continuation() {
                prop_assert!(i > 0);
                prop_assert_eq!(row[i - 1].content.width(), 2);
            }
        }
    }
}
