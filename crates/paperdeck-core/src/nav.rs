//! Client-side navigation state: the loaded list, a cursor into it, and the
//! mode that produced the list.

use crate::model::PaperSummary;
use crate::view::PageIndicator;

/// Which backend listing the current items came from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    All,
    Search,
    Bookmarks,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Prev,
    Next,
}

/// Loaded summaries plus the cursor.
///
/// Invariant: `current_index < items.len()` whenever `items` is non-empty,
/// and `current_index == 0` when it is empty.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NavigationState {
    items: Vec<PaperSummary>,
    current_index: usize,
    mode: Mode,
}

impl NavigationState {
    pub fn items(&self) -> &[PaperSummary] {
        &self.items
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn current(&self) -> Option<&PaperSummary> {
        self.items.get(self.current_index)
    }

    pub fn current_mut(&mut self) -> Option<&mut PaperSummary> {
        self.items.get_mut(self.current_index)
    }

    /// Page indicator for the cursor, or `None` for an empty list.
    pub fn position(&self) -> Option<PageIndicator> {
        if self.items.is_empty() {
            None
        } else {
            Some(PageIndicator::new(self.current_index + 1, self.items.len()))
        }
    }

    /// Move the cursor one step. Returns `false` at either end; there is no
    /// wraparound.
    pub fn step(&mut self, direction: Direction) -> bool {
        match direction {
            Direction::Prev if self.current_index > 0 => {
                self.current_index -= 1;
                true
            }
            Direction::Next if self.current_index + 1 < self.items.len() => {
                self.current_index += 1;
                true
            }
            _ => false,
        }
    }

    /// Swap in a freshly fetched list and rewind the cursor.
    pub fn replace(&mut self, items: Vec<PaperSummary>, mode: Mode) {
        self.items = items;
        self.current_index = 0;
        self.mode = mode;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with(n: usize) -> NavigationState {
        let mut state = NavigationState::default();
        let items = (1..=n as i64)
            .map(|id| PaperSummary::new(id, format!("Paper {id}")))
            .collect();
        state.replace(items, Mode::All);
        state
    }

    #[test]
    fn starts_empty_in_all_mode() {
        let state = NavigationState::default();
        assert!(state.is_empty());
        assert_eq!(state.mode(), Mode::All);
        assert_eq!(state.current_index(), 0);
        assert!(state.current().is_none());
        assert!(state.position().is_none());
    }

    #[test]
    fn step_stops_at_both_ends() {
        let mut state = state_with(3);
        assert!(!state.step(Direction::Prev));
        assert_eq!(state.current_index(), 0);

        assert!(state.step(Direction::Next));
        assert!(state.step(Direction::Next));
        assert!(!state.step(Direction::Next));
        assert_eq!(state.current_index(), 2);
        assert_eq!(state.current().map(|p| p.id), Some(3));
    }

    #[test]
    fn step_on_empty_list_is_noop() {
        let mut state = NavigationState::default();
        assert!(!state.step(Direction::Next));
        assert!(!state.step(Direction::Prev));
        assert_eq!(state.current_index(), 0);
    }

    #[test]
    fn replace_rewinds_cursor_and_sets_mode() {
        let mut state = state_with(4);
        state.step(Direction::Next);
        state.step(Direction::Next);

        state.replace(vec![PaperSummary::new(9, "Only")], Mode::Search);
        assert_eq!(state.current_index(), 0);
        assert_eq!(state.mode(), Mode::Search);
        assert_eq!(state.items().len(), 1);
    }

    #[test]
    fn cursor_stays_in_bounds_under_any_walk() {
        let mut state = state_with(5);
        let walk = [
            Direction::Prev,
            Direction::Next,
            Direction::Next,
            Direction::Next,
            Direction::Next,
            Direction::Next,
            Direction::Next,
            Direction::Prev,
        ];
        for dir in walk {
            state.step(dir);
            assert!(state.current_index() < state.items().len());
        }
        assert_eq!(state.current_index(), 3);
    }

    #[test]
    fn position_is_one_based() {
        let mut state = state_with(5);
        state.step(Direction::Next);
        let pos = state.position().unwrap();
        assert_eq!(pos.current, 2);
        assert_eq!(pos.total, 5);
    }
}
