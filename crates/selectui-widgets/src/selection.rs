#![forbid(unsafe_code)]

//! Selection state machine.
//!
//! A dropdown either owns its selection (uncontrolled) or mirrors a value
//! held by its host (controlled). The mode is fixed when the state is built.
//!
//! In both modes a user action produces a *change*: the new list is parked in
//! an outbox until the owner drains it with [`SelectionState::take_change`]
//! and hands it to the change callback. Uncontrolled state applies the change
//! immediately. Controlled state leaves the displayed value alone and records
//! the proposal as pending until the host feeds a value back through
//! [`SelectionState::sync_controlled`].

use crate::option::SelectOption;

/// A selection as reported to, or supplied by, the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionValue {
    /// Single-select: the chosen option, if any.
    Single(Option<SelectOption>),
    /// Multi-select: the chosen options in click order.
    Multi(Vec<SelectOption>),
}

impl SelectionValue {
    /// An empty value in the shape matching `multi_select`.
    #[must_use]
    pub fn empty(multi_select: bool) -> Self {
        if multi_select {
            Self::Multi(Vec::new())
        } else {
            Self::Single(None)
        }
    }

    /// Normalize to a list: `Single(Some(o))` is `[o]`, `Single(None)` is `[]`.
    #[must_use]
    pub fn into_vec(self) -> Vec<SelectOption> {
        match self {
            Self::Single(option) => option.into_iter().collect(),
            Self::Multi(options) => options,
        }
    }

    #[must_use]
    pub fn as_slice(&self) -> &[SelectOption] {
        match self {
            Self::Single(option) => option.as_slice(),
            Self::Multi(options) => options,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    fn from_list(mut list: Vec<SelectOption>, multi_select: bool) -> Self {
        if multi_select {
            Self::Multi(list)
        } else {
            Self::Single(if list.is_empty() {
                None
            } else {
                Some(list.swap_remove(0))
            })
        }
    }
}

/// Where the displayed selection lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionSource {
    /// Uncontrolled: the widget owns the list.
    Owned(Vec<SelectOption>),
    /// Controlled: a copy of the host's value plus the proposal the host has
    /// not answered yet.
    Mirrored {
        value: Vec<SelectOption>,
        pending: Option<Vec<SelectOption>>,
    },
}

/// Result of a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleOutcome {
    /// The menu should close (single-select picks close it).
    pub close_menu: bool,
}

#[derive(Debug, Clone)]
pub struct SelectionState {
    source: SelectionSource,
    multi_select: bool,
    outbox: Option<Vec<SelectOption>>,
}

impl SelectionState {
    /// Build the state. `Some(value)` makes it controlled.
    #[must_use]
    pub fn new(multi_select: bool, controlled: Option<SelectionValue>) -> Self {
        let source = match controlled {
            Some(value) => SelectionSource::Mirrored {
                value: value.into_vec(),
                pending: None,
            },
            None => SelectionSource::Owned(Vec::new()),
        };
        Self {
            source,
            multi_select,
            outbox: None,
        }
    }

    #[must_use]
    pub fn uncontrolled(multi_select: bool) -> Self {
        Self::new(multi_select, None)
    }

    #[must_use]
    pub fn controlled(multi_select: bool, value: SelectionValue) -> Self {
        Self::new(multi_select, Some(value))
    }

    /// Same source, different shape. Only meaningful before first use.
    #[must_use]
    pub fn with_multi_select(mut self, multi_select: bool) -> Self {
        self.multi_select = multi_select;
        self
    }

    #[inline]
    pub fn is_multi_select(&self) -> bool {
        self.multi_select
    }

    #[inline]
    pub fn is_controlled(&self) -> bool {
        matches!(self.source, SelectionSource::Mirrored { .. })
    }

    pub fn source(&self) -> &SelectionSource {
        &self.source
    }

    /// The displayed selection, in click order.
    pub fn current(&self) -> &[SelectOption] {
        match &self.source {
            SelectionSource::Owned(list) => list,
            SelectionSource::Mirrored { value, .. } => value,
        }
    }

    /// The proposal awaiting host feedback (controlled only).
    pub fn pending(&self) -> Option<&[SelectOption]> {
        match &self.source {
            SelectionSource::Mirrored {
                pending: Some(p), ..
            } => Some(p),
            _ => None,
        }
    }

    pub fn is_selected(&self, option: &SelectOption) -> bool {
        self.contains_value(option.value())
    }

    pub fn contains_value(&self, value: &str) -> bool {
        self.current().iter().any(|o| o.value() == value)
    }

    /// Whether the selection count equals `total`.
    pub fn is_all_selected(&self, total: usize) -> bool {
        self.current().len() == total
    }

    /// React to a click on `option`.
    ///
    /// Single-select replaces the selection and asks to close the menu.
    /// Multi-select removes the option if present, else appends it.
    pub fn toggle(&mut self, option: &SelectOption) -> ToggleOutcome {
        if !self.multi_select {
            self.commit(vec![option.clone()]);
            return ToggleOutcome { close_menu: true };
        }

        let mut next = self.current().to_vec();
        match next.iter().position(|o| o == option) {
            Some(pos) => {
                next.remove(pos);
            }
            None => next.push(option.clone()),
        }
        self.commit(next);
        ToggleOutcome { close_menu: false }
    }

    /// Select every option, or clear when all are already selected.
    ///
    /// Returns `false` (and does nothing) in single-select.
    pub fn select_all(&mut self, options: &[SelectOption]) -> bool {
        if !self.multi_select {
            return false;
        }
        let next = if self.is_all_selected(options.len()) {
            Vec::new()
        } else {
            options.to_vec()
        };
        self.commit(next);
        true
    }

    /// Feed the host's value back into a controlled state.
    ///
    /// Uncontrolled state ignores this: switching modes needs a new widget.
    pub fn sync_controlled(&mut self, value: SelectionValue) {
        match &mut self.source {
            SelectionSource::Mirrored {
                value: mirrored,
                pending,
            } => {
                *mirrored = value.into_vec();
                *pending = None;
            }
            SelectionSource::Owned(_) => {
                selectui_core::warn!("controlled value supplied to an uncontrolled selection; ignored");
            }
        }
    }

    /// Drain the change produced by the last action, if any.
    pub fn take_change(&mut self) -> Option<SelectionValue> {
        self.outbox
            .take()
            .map(|list| SelectionValue::from_list(list, self.multi_select))
    }

    fn commit(&mut self, next: Vec<SelectOption>) {
        match &mut self.source {
            SelectionSource::Owned(list) => *list = next.clone(),
            SelectionSource::Mirrored { pending, .. } => *pending = Some(next.clone()),
        }
        self.outbox = Some(next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(labels: &[&str]) -> Vec<SelectOption> {
        labels
            .iter()
            .map(|l| SelectOption::new(*l, l.to_lowercase()))
            .collect()
    }

    #[test]
    fn single_uncontrolled_replaces_and_closes() {
        let options = opts(&["A", "B", "C", "D", "E"]);
        let mut state = SelectionState::uncontrolled(false);

        let outcome = state.toggle(&options[1]);
        assert!(outcome.close_menu);
        assert_eq!(state.current(), &options[1..2]);
        assert_eq!(
            state.take_change(),
            Some(SelectionValue::Single(Some(options[1].clone())))
        );
        assert_eq!(state.take_change(), None);

        state.toggle(&options[3]);
        assert_eq!(state.current(), &options[3..4]);
    }

    #[test]
    fn single_reclick_keeps_selection() {
        let options = opts(&["A"]);
        let mut state = SelectionState::uncontrolled(false);
        state.toggle(&options[0]);
        state.toggle(&options[0]);
        assert_eq!(state.current(), &options[..]);
    }

    #[test]
    fn multi_toggle_twice_restores() {
        let options = opts(&["A", "B", "C"]);
        let mut state = SelectionState::uncontrolled(true);
        state.toggle(&options[0]);
        state.toggle(&options[2]);
        let before = state.current().to_vec();

        let outcome = state.toggle(&options[1]);
        assert!(!outcome.close_menu);
        state.toggle(&options[1]);
        assert_eq!(state.current(), &before[..]);
    }

    #[test]
    fn multi_keeps_click_order() {
        let options = opts(&["A", "B", "C"]);
        let mut state = SelectionState::uncontrolled(true);
        state.toggle(&options[2]);
        state.toggle(&options[0]);
        assert_eq!(
            state.take_change(),
            Some(SelectionValue::Multi(vec![options[2].clone(), options[0].clone()]))
        );
    }

    #[test]
    fn select_all_partial_then_full() {
        let options = opts(&["A", "B", "C"]);
        let mut state = SelectionState::uncontrolled(true);
        state.toggle(&options[1]);

        assert!(state.select_all(&options));
        assert_eq!(state.current(), &options[..]);
        assert!(state.is_all_selected(options.len()));

        assert!(state.select_all(&options));
        assert!(state.current().is_empty());
        assert_eq!(state.take_change(), Some(SelectionValue::Multi(Vec::new())));
    }

    #[test]
    fn select_all_is_noop_in_single_select() {
        let options = opts(&["A", "B"]);
        let mut state = SelectionState::uncontrolled(false);
        assert!(!state.select_all(&options));
        assert!(state.current().is_empty());
        assert_eq!(state.take_change(), None);
    }

    #[test]
    fn controlled_multi_proposes_without_applying() {
        let options = opts(&["A", "B"]);
        let mut state = SelectionState::controlled(true, SelectionValue::Multi(Vec::new()));
        assert!(state.is_controlled());

        state.toggle(&options[0]);
        assert!(state.current().is_empty());
        assert_eq!(state.pending(), Some(&options[0..1]));
        assert_eq!(
            state.take_change(),
            Some(SelectionValue::Multi(vec![options[0].clone()]))
        );

        state.sync_controlled(SelectionValue::Multi(vec![options[0].clone()]));
        assert_eq!(state.current(), &options[0..1]);
        assert_eq!(state.pending(), None);
    }

    #[test]
    fn controlled_proposals_build_on_mirrored_value() {
        let options = opts(&["A", "B"]);
        let mut state = SelectionState::controlled(true, SelectionValue::Multi(Vec::new()));
        state.toggle(&options[0]);
        state.toggle(&options[1]);
        assert_eq!(state.pending(), Some(&options[1..2]));
    }

    #[test]
    fn controlled_single_normalizes_input() {
        let options = opts(&["A", "B"]);
        let state =
            SelectionState::controlled(false, SelectionValue::Single(Some(options[1].clone())));
        assert_eq!(state.current(), &options[1..2]);
        assert!(state.is_selected(&options[1]));
        assert!(!state.is_selected(&options[0]));

        let empty = SelectionState::controlled(false, SelectionValue::Single(None));
        assert!(empty.current().is_empty());
        assert!(empty.is_controlled());
    }

    #[test]
    fn unknown_controlled_values_match_nothing() {
        let options = opts(&["A"]);
        let ghost = SelectOption::new("Ghost", "ghost");
        let state = SelectionState::controlled(true, SelectionValue::Multi(vec![ghost]));
        assert!(state.contains_value("ghost"));
        assert!(!state.is_selected(&options[0]));
        assert_eq!(state.current().len(), 1);
    }

    #[test]
    fn sync_is_ignored_when_uncontrolled() {
        let options = opts(&["A"]);
        let mut state = SelectionState::uncontrolled(true);
        state.sync_controlled(SelectionValue::Multi(options.clone()));
        assert!(state.current().is_empty());
        assert!(!state.is_controlled());
    }

    #[test]
    fn value_normalization() {
        let a = SelectOption::new("A", "a");
        assert_eq!(SelectionValue::Single(Some(a.clone())).into_vec(), vec![a.clone()]);
        assert!(SelectionValue::Single(None).into_vec().is_empty());
        assert_eq!(SelectionValue::empty(true), SelectionValue::Multi(Vec::new()));
        assert_eq!(SelectionValue::empty(false), SelectionValue::Single(None));
        assert!(SelectionValue::empty(false).is_empty());
        assert_eq!(SelectionValue::Multi(vec![a.clone()]).as_slice(), &[a][..]);
    }
}
