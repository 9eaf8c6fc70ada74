use std::collections::BTreeSet;

/// Question cursor. Forward movement past the furthest visited question only
/// happens through [`Navigator::advance`]; `go_next`/`go_previous` move
/// between questions that have already been reached.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Navigator {
    current: usize,
    total: usize,
    visited: BTreeSet<usize>,
}

impl Navigator {
    pub fn new(total: usize) -> Self {
        Self {
            current: 0,
            total,
            visited: BTreeSet::from([0]),
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn visited(&self) -> &BTreeSet<usize> {
        &self.visited
    }

    /// True once the cursor has moved past the last question.
    pub fn is_finished(&self) -> bool {
        self.current >= self.total
    }

    pub fn can_go_next(&self) -> bool {
        self.current + 1 < self.total && self.visited.contains(&(self.current + 1))
    }

    pub fn can_go_previous(&self) -> bool {
        !self.is_finished() && self.current > 0 && self.visited.contains(&(self.current - 1))
    }

    pub fn go_next(&mut self) -> bool {
        if !self.can_go_next() {
            return false;
        }
        self.current += 1;
        true
    }

    pub fn go_previous(&mut self) -> bool {
        if !self.can_go_previous() {
            return false;
        }
        self.current -= 1;
        true
    }

    /// Marks the following question visited and moves onto it. Moving past
    /// the last question enters the finished state.
    pub fn advance(&mut self) -> bool {
        if self.is_finished() {
            return false;
        }
        self.current += 1;
        if self.current < self.total {
            self.visited.insert(self.current);
        }
        true
    }

    pub fn restart(&mut self) {
        *self = Self::new(self.total);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_zero_with_zero_visited() {
        let nav = Navigator::new(3);
        assert_eq!(nav.current(), 0);
        assert!(nav.visited().contains(&0));
        assert!(!nav.can_go_next());
        assert!(!nav.can_go_previous());
    }

    #[test]
    fn next_requires_visited_neighbor() {
        let mut nav = Navigator::new(3);
        assert!(!nav.go_next());
        assert!(nav.advance());
        assert_eq!(nav.current(), 1);
        assert!(nav.go_previous());
        assert_eq!(nav.current(), 0);
        assert!(nav.go_next());
        assert_eq!(nav.current(), 1);
        // question 2 not reached yet
        assert!(!nav.go_next());
    }

    #[test]
    fn advance_past_last_finishes() {
        let mut nav = Navigator::new(1);
        assert!(nav.advance());
        assert!(nav.is_finished());
        assert!(!nav.advance());
        assert!(!nav.go_previous());
        assert_eq!(nav.visited().len(), 1);
    }

    #[test]
    fn restart_forgets_progress() {
        let mut nav = Navigator::new(4);
        nav.advance();
        nav.advance();
        nav.restart();
        assert_eq!(nav, Navigator::new(4));
    }
}
