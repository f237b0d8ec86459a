//! Cell semantics supplied by the caller.
//!
//! The engine treats a cell's status as opaque. What a status means, how it
//! looks and how it reacts to a click all come from a [`CellPolicy`]. Policy
//! functions must be pure: the engine calls them as often as it needs to and
//! in no guaranteed order.

use std::fmt;

use crate::render::CssColor;

/// Capability interface for status defaults, appearance and click behaviour.
pub trait CellPolicy {
    /// Caller-defined cell state.
    type Status: Clone;

    /// Status of a cell that has never been written.
    fn default_status(&self, row: i64, col: i64) -> Self::Status;

    /// Fill color for a cell.
    fn color(&self, status: &Self::Status, row: i64, col: i64) -> CssColor;

    /// Text drawn inside a cell.
    fn text(&self, status: &Self::Status, row: i64, col: i64) -> String;

    /// New status after the cell is clicked.
    fn on_click(&self, status: &Self::Status, row: i64, col: i64) -> Self::Status;
}

type DefaultFn<S> = Box<dyn Fn(i64, i64) -> S>;
type ColorFn<S> = Box<dyn Fn(&S, i64, i64) -> CssColor>;
type TextFn<S> = Box<dyn Fn(&S, i64, i64) -> String>;
type ClickFn<S> = Box<dyn Fn(&S, i64, i64) -> S>;

/// A [`CellPolicy`] assembled from closures.
///
/// Unset hooks fall back to white cells, no text and clicks that keep the
/// status unchanged.
pub struct FnPolicy<S> {
    default_status: DefaultFn<S>,
    color: ColorFn<S>,
    text: TextFn<S>,
    on_click: ClickFn<S>,
}

impl<S: Clone + 'static> FnPolicy<S> {
    pub fn new(default_status: impl Fn(i64, i64) -> S + 'static) -> Self {
        Self {
            default_status: Box::new(default_status),
            color: Box::new(|_, _, _| "white".to_string()),
            text: Box::new(|_, _, _| String::new()),
            on_click: Box::new(|status: &S, _, _| status.clone()),
        }
    }

    #[must_use]
    pub fn with_color(mut self, f: impl Fn(&S, i64, i64) -> CssColor + 'static) -> Self {
        self.color = Box::new(f);
        self
    }

    #[must_use]
    pub fn with_text(mut self, f: impl Fn(&S, i64, i64) -> String + 'static) -> Self {
        self.text = Box::new(f);
        self
    }

    #[must_use]
    pub fn with_on_click(mut self, f: impl Fn(&S, i64, i64) -> S + 'static) -> Self {
        self.on_click = Box::new(f);
        self
    }
}

impl<S: Clone + Default + 'static> Default for FnPolicy<S> {
    fn default() -> Self {
        Self::new(|_, _| S::default())
    }
}

impl<S> fmt::Debug for FnPolicy<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnPolicy").finish_non_exhaustive()
    }
}

impl<S: Clone> CellPolicy for FnPolicy<S> {
    type Status = S;

    fn default_status(&self, row: i64, col: i64) -> S {
        (self.default_status)(row, col)
    }

    fn color(&self, status: &S, row: i64, col: i64) -> CssColor {
        (self.color)(status, row, col)
    }

    fn text(&self, status: &S, row: i64, col: i64) -> String {
        (self.text)(status, row, col)
    }

    fn on_click(&self, status: &S, row: i64, col: i64) -> S {
        (self.on_click)(status, row, col)
    }
}

/// Dead/alive cells that flip on click, as used by cellular-automaton boards.
#[derive(Debug, Clone)]
pub struct BinaryPolicy {
    pub alive_color: CssColor,
    pub dead_color: CssColor,
}

impl Default for BinaryPolicy {
    fn default() -> Self {
        Self {
            alive_color: "black".to_string(),
            dead_color: "white".to_string(),
        }
    }
}

impl CellPolicy for BinaryPolicy {
    type Status = bool;

    fn default_status(&self, _row: i64, _col: i64) -> bool {
        false
    }

    fn color(&self, status: &bool, _row: i64, _col: i64) -> CssColor {
        if *status {
            self.alive_color.clone()
        } else {
            self.dead_color.clone()
        }
    }

    fn text(&self, _status: &bool, _row: i64, _col: i64) -> String {
        String::new()
    }

    fn on_click(&self, status: &bool, _row: i64, _col: i64) -> bool {
        !status
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    #[test]
    fn test_fn_policy_defaults() {
        let policy: FnPolicy<i32> = FnPolicy::default();
        assert_eq!(policy.default_status(4, -4), 0);
        assert_eq!(policy.color(&7, 0, 0), "white");
        assert_eq!(policy.text(&7, 0, 0), "");
        assert_eq!(policy.on_click(&7, 0, 0), 7);
    }

    #[test]
    fn test_fn_policy_hooks_see_position() {
        let policy = FnPolicy::new(|row, col| row * 10 + col)
            .with_color(|s: &i64, _, _| if *s > 0 { "red".into() } else { "blue".into() })
            .with_text(|s: &i64, row, col| format!("{s}@{row},{col}"))
            .with_on_click(|s: &i64, _, _| s + 1);
        assert_eq!(policy.default_status(2, 3), 23);
        assert_eq!(policy.color(&1, 0, 0), "red");
        assert_eq!(policy.text(&5, -1, 2), "5@-1,2");
        assert_eq!(policy.on_click(&5, 0, 0), 6);
    }

    #[test]
    fn test_binary_policy_toggles() {
        let policy = BinaryPolicy::default();
        assert!(!policy.default_status(100, -100));
        assert!(policy.on_click(&false, 0, 0));
        assert!(!policy.on_click(&true, 0, 0));
        assert_eq!(policy.color(&true, 0, 0), "black");
        assert_eq!(policy.color(&false, 0, 0), "white");
    }
}
