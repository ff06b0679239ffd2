//! Finite-state cursor over an ordered list of wizard steps

/// Cursor over a fixed, ordered list of named steps.
///
/// Forward movement is one step at a time and only ever requested after
/// the current step validated clean; the controller itself refuses to
/// move past the final step, which is left to an explicit `submit`.
/// Backward movement is unguarded. Every setter clamps, so a corrupted
/// index can never escape `[0, len-1]`.
#[derive(Debug, Clone)]
pub struct StepController {
    steps: Vec<String>,
    index: usize,
    submitted: bool,
}

impl StepController {
    pub fn new(steps: &[&str]) -> Self {
        debug_assert!(!steps.is_empty());
        Self {
            steps: steps.iter().map(|s| (*s).to_string()).collect(),
            index: 0,
            submitted: false,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().map(String::as_str)
    }

    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 == self.steps.len()
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    /// Move one step forward. No-op on the final step; finishing from
    /// there goes through `mark_submitted` instead.
    pub fn advance(&mut self) {
        if !self.is_last() {
            self.index += 1;
        }
    }

    /// Move one step back. No-op on the first step.
    pub fn retreat(&mut self) {
        self.index = self.index.saturating_sub(1);
    }

    /// Set the cursor directly, clamping into the valid range.
    pub fn set_index(&mut self, index: i64) {
        let last = (self.steps.len() - 1) as i64;
        self.index = index.clamp(0, last) as usize;
    }

    /// Enter the terminal submitted state. Only reachable from the final
    /// step; anywhere else the call is refused.
    pub fn mark_submitted(&mut self) -> bool {
        if self.is_last() {
            self.submitted = true;
        }
        self.submitted
    }

    /// Back to step 0, not submitted.
    pub fn reset(&mut self) {
        self.index = 0;
        self.submitted = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn controller() -> StepController {
        StepController::new(&["Account", "Profile", "Preferences"])
    }

    #[test]
    fn test_starts_at_first_step() {
        let c = controller();
        assert_eq!(c.index(), 0);
        assert!(c.is_first());
        assert!(!c.is_last());
        assert_eq!(c.names().next(), Some("Account"));
    }

    #[test]
    fn test_advance_stops_at_last() {
        let mut c = controller();
        c.advance();
        c.advance();
        assert!(c.is_last());
        c.advance();
        assert_eq!(c.index(), 2);
    }

    #[test]
    fn test_retreat_stops_at_first() {
        let mut c = controller();
        c.retreat();
        assert_eq!(c.index(), 0);
        c.advance();
        c.retreat();
        assert_eq!(c.index(), 0);
    }

    #[test]
    fn test_retreat_then_advance_round_trips() {
        let mut c = controller();
        c.advance();
        let before = c.index();
        c.retreat();
        c.advance();
        assert_eq!(c.index(), before);
    }

    #[test]
    fn test_set_index_clamps() {
        let mut c = controller();
        c.set_index(-5);
        assert_eq!(c.index(), 0);
        c.set_index(99);
        assert_eq!(c.index(), 2);
        c.set_index(1);
        assert_eq!(c.index(), 1);
    }

    #[test]
    fn test_submit_only_from_last_step() {
        let mut c = controller();
        assert!(!c.mark_submitted());
        c.set_index(2);
        assert!(c.mark_submitted());
        assert!(c.is_submitted());
    }

    #[test]
    fn test_reset_returns_to_start() {
        let mut c = controller();
        c.set_index(2);
        c.mark_submitted();
        c.reset();
        assert_eq!(c.index(), 0);
        assert!(!c.is_submitted());
    }
}
