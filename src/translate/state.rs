//! Walk state with scoped enter/restore.
//!
//! Container rules never mutate [`TranslationState`] directly. They call an
//! `enter_*` method, which applies the change and returns a [`Scope`]; the
//! scope dereferences to the state, so the recursive descent runs through
//! it, and dropping it restores what was there before. Early returns via `?`
//! therefore leave the state exactly as the container found it.

use std::ops::{Deref, DerefMut};

/// Kind of an open list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Ordered,
    Unordered,
}

impl ListKind {
    /// Item marker, including the trailing space.
    pub const fn marker(self) -> &'static str {
        match self {
            Self::Ordered => "1. ",
            Self::Unordered => "- ",
        }
    }
}

/// State of the innermost open table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableState {
    /// Separator row already written after the first row.
    pub header_emitted: bool,
}

/// Mutable context of one document walk.
#[derive(Debug, Default)]
pub struct TranslationState {
    preformatted: bool,
    lists: Vec<ListKind>,
    table: Option<TableState>,
    header_demotion: bool,
}

impl TranslationState {
    pub fn new(header_demotion: bool) -> Self {
        Self {
            header_demotion,
            ..Self::default()
        }
    }

    #[inline]
    pub fn preformatted(&self) -> bool {
        self.preformatted
    }

    #[inline]
    pub fn header_demotion(&self) -> bool {
        self.header_demotion
    }

    /// Number of open lists.
    #[inline]
    pub fn list_depth(&self) -> usize {
        self.lists.len()
    }

    /// Innermost open list.
    #[inline]
    pub fn current_list(&self) -> Option<ListKind> {
        self.lists.last().copied()
    }

    #[inline]
    pub fn in_table(&self) -> bool {
        self.table.is_some()
    }

    /// Latch the separator row of the innermost table.
    ///
    /// Returns `true` exactly once per table, for its first row.
    pub fn take_first_row(&mut self) -> bool {
        match &mut self.table {
            Some(table) if !table.header_emitted => {
                table.header_emitted = true;
                true
            }
            _ => false,
        }
    }

    pub fn enter_preformatted(&mut self) -> Scope<'_> {
        let previous = std::mem::replace(&mut self.preformatted, true);
        Scope::new(self, Restore::Preformatted(previous))
    }

    pub fn enter_list(&mut self, kind: ListKind) -> Scope<'_> {
        self.lists.push(kind);
        Scope::new(self, Restore::List)
    }

    /// Open a table; a table nested in a cell gets its own separator latch.
    pub fn enter_table(&mut self) -> Scope<'_> {
        let previous = self.table.replace(TableState::default());
        Scope::new(self, Restore::Table(previous))
    }
}

#[derive(Debug, Clone, Copy)]
enum Restore {
    Preformatted(bool),
    List,
    Table(Option<TableState>),
}

/// Guard returned by the `enter_*` methods.
#[derive(Debug)]
pub struct Scope<'s> {
    state: &'s mut TranslationState,
    restore: Restore,
}

impl<'s> Scope<'s> {
    fn new(state: &'s mut TranslationState, restore: Restore) -> Self {
        Self { state, restore }
    }
}

impl Deref for Scope<'_> {
    type Target = TranslationState;

    fn deref(&self) -> &Self::Target {
        self.state
    }
}

impl DerefMut for Scope<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.state
    }
}

impl Drop for Scope<'_> {
    fn drop(&mut self) {
        match self.restore {
            Restore::Preformatted(previous) => self.state.preformatted = previous,
            Restore::List => {
                self.state.lists.pop();
            }
            Restore::Table(previous) => self.state.table = previous,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preformatted_restored() {
        let mut state = TranslationState::new(false);
        {
            let mut outer = state.enter_preformatted();
            assert!(outer.preformatted());
            {
                let inner = outer.enter_preformatted();
                assert!(inner.preformatted());
            }
            assert!(outer.preformatted());
        }
        assert!(!state.preformatted());
    }

    #[test]
    fn test_list_stack_nesting() {
        let mut state = TranslationState::new(false);
        {
            let mut ordered = state.enter_list(ListKind::Ordered);
            {
                let unordered = ordered.enter_list(ListKind::Unordered);
                assert_eq!(unordered.list_depth(), 2);
                assert_eq!(unordered.current_list(), Some(ListKind::Unordered));
            }
            assert_eq!(ordered.list_depth(), 1);
            assert_eq!(ordered.current_list(), Some(ListKind::Ordered));
        }
        assert_eq!(state.list_depth(), 0);
        assert_eq!(state.current_list(), None);
    }

    #[test]
    fn test_table_separator_latch() {
        let mut state = TranslationState::new(false);
        assert!(!state.take_first_row());
        {
            let mut table = state.enter_table();
            assert!(table.in_table());
            assert!(table.take_first_row());
            {
                let mut nested = table.enter_table();
                assert!(nested.take_first_row());
                assert!(!nested.take_first_row());
            }
            assert!(table.in_table());
            assert!(!table.take_first_row());
        }
        assert!(!state.in_table());
    }

    #[test]
    fn test_restore_on_early_return() {
        fn fails(state: &mut TranslationState) -> Result<(), ()> {
            let mut list = state.enter_list(ListKind::Unordered);
            let _pre = list.enter_preformatted();
            Err(())
        }

        let mut state = TranslationState::new(true);
        assert!(fails(&mut state).is_err());
        assert_eq!(state.list_depth(), 0);
        assert!(!state.preformatted());
        assert!(state.header_demotion());
    }

    #[test]
    fn test_markers() {
        assert_eq!(ListKind::Ordered.marker(), "1. ");
        assert_eq!(ListKind::Unordered.marker(), "- ");
    }
}
