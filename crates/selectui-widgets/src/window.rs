#![forbid(unsafe_code)]

//! Windowing math for long option lists.
//!
//! Given how many items exist, how tall the scroll container and one item
//! are, and how far the container is scrolled, [`compute_window`] decides
//! which items to materialize. Heights are in rows.
//!
//! # Invariants
//!
//! 1. `0 <= start_index <= end_index <= total_items`
//! 2. Without virtualization the window is `[0, total_items)`
//! 3. A virtualized window never starts past `total_items - visible_count`,
//!    so scrolling to the bottom always materializes the last item

use std::ops::Range;

/// Scroll container height used before the first layout pass.
pub const DEFAULT_CONTAINER_HEIGHT: u16 = 6;

/// Item height used before the first layout pass.
pub const DEFAULT_ITEM_HEIGHT: u16 = 1;

/// The contiguous run of items to materialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Window {
    pub start_index: usize,
    /// Exclusive.
    pub end_index: usize,
    pub is_virtualized: bool,
}

impl Window {
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.end_index - self.start_index
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start_index == self.end_index
    }

    #[inline]
    #[must_use]
    pub fn indices(&self) -> Range<usize> {
        self.start_index..self.end_index
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        self.indices().contains(&index)
    }
}

/// Number of items that fit in the container, plus one for the partially
/// visible item at the bottom edge.
#[inline]
#[must_use]
pub fn visible_count(container_height: u32, item_height: u32) -> usize {
    let item_height = item_height.max(1);
    container_height.div_ceil(item_height) as usize + 1
}

/// Compute which items to materialize.
///
/// `item_height` of 0 is treated as 1.
#[must_use]
pub fn compute_window(
    total_items: usize,
    virtualize_requested: bool,
    container_height: u32,
    item_height: u32,
    scroll_offset: u32,
) -> Window {
    let item_height = item_height.max(1);
    let visible = visible_count(container_height, item_height);
    let is_virtualized = virtualize_requested && total_items > visible;

    if !is_virtualized {
        return Window {
            start_index: 0,
            end_index: total_items,
            is_virtualized: false,
        };
    }

    let raw_start = (scroll_offset / item_height) as usize;
    let max_start = total_items.saturating_sub(visible);
    let start_index = raw_start.min(max_start);
    let end_index = total_items.min(start_index + visible);

    Window {
        start_index,
        end_index,
        is_virtualized,
    }
}

/// Total height of all items stacked.
#[inline]
#[must_use]
pub fn content_height(total_items: usize, item_height: u32) -> u64 {
    total_items as u64 * u64::from(item_height.max(1))
}

/// Largest scroll offset that still shows a full container.
#[must_use]
pub fn max_scroll_offset(total_items: usize, container_height: u32, item_height: u32) -> u32 {
    let overflow = content_height(total_items, item_height).saturating_sub(container_height.into());
    u32::try_from(overflow).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn large_list_starts_at_top() {
        let w = compute_window(1000, true, 210, 35, 0);
        assert_eq!(visible_count(210, 35), 7);
        assert_eq!(
            w,
            Window {
                start_index: 0,
                end_index: 7,
                is_virtualized: true
            }
        );
    }

    #[test]
    fn scrolled_window_follows_offset() {
        let w = compute_window(1000, true, 210, 35, 35 * 40 + 10);
        assert_eq!(w.indices(), 40..47);
        assert_eq!(w.len(), 7);
    }

    #[test]
    fn scroll_past_end_clamps_to_last_items() {
        let w = compute_window(1000, true, 210, 35, u32::MAX);
        assert_eq!(w.indices(), 993..1000);
        assert!(w.contains(999));
        assert!(!w.contains(1000));
    }

    #[test]
    fn disabled_virtualization_returns_everything() {
        let w = compute_window(1000, false, 210, 35, 5000);
        assert_eq!(w.indices(), 0..1000);
        assert!(!w.is_virtualized);
    }

    #[test]
    fn short_list_is_not_virtualized() {
        let w = compute_window(7, true, 210, 35, 0);
        assert_eq!(w.indices(), 0..7);
        assert!(!w.is_virtualized);

        let w = compute_window(8, true, 210, 35, 0);
        assert!(w.is_virtualized);
    }

    #[test]
    fn empty_list_is_empty_window() {
        let w = compute_window(0, true, 6, 1, 10);
        assert!(w.is_empty());
        assert!(!w.is_virtualized);
    }

    #[test]
    fn zero_item_height_falls_back_to_one() {
        assert_eq!(compute_window(50, true, 6, 0, 3), compute_window(50, true, 6, 1, 3));
        assert_eq!(visible_count(6, 0), 7);
    }

    #[test]
    fn zero_container_height_still_shows_one_item() {
        let w = compute_window(10, true, 0, 1, 0);
        assert_eq!(w.indices(), 0..1);
        assert!(w.is_virtualized);
    }

    #[test]
    fn scroll_limits() {
        assert_eq!(content_height(1000, 1), 1000);
        assert_eq!(max_scroll_offset(1000, 6, 1), 994);
        assert_eq!(max_scroll_offset(3, 6, 1), 0);
        assert_eq!(max_scroll_offset(10, 6, 0), 4);
    }
}
