//! FIFO task queue with enqueue-time deduplication.

use std::collections::{HashSet, VecDeque};

use wayfinder_protocols::ExplorationTask;

/// Outcome of [`Frontier::push`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Enqueue {
    Added,
    /// Same signature was already enqueued this run.
    Duplicate,
    /// Queue is at capacity; the task was dropped.
    Overflow,
}

/// Breadth-first frontier owned by a single run.
#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<ExplorationTask>,
    seen: HashSet<String>,
    max_size: usize,
}

impl Frontier {
    /// `max_size` of 0 means unlimited.
    pub fn new(max_size: usize) -> Self {
        Self {
            queue: VecDeque::new(),
            seen: HashSet::new(),
            max_size,
        }
    }

    pub fn push(&mut self, task: ExplorationTask) -> Enqueue {
        let signature = task.signature();
        if self.seen.contains(&signature) {
            return Enqueue::Duplicate;
        }
        if self.max_size > 0 && self.queue.len() >= self.max_size {
            return Enqueue::Overflow;
        }
        self.seen.insert(signature);
        self.queue.push_back(task);
        Enqueue::Added
    }

    pub fn pop(&mut self) -> Option<ExplorationTask> {
        self.queue.pop_front()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wayfinder_protocols::{Bounds, CandidateElement};

    fn click(purpose: &str, x: f64) -> ExplorationTask {
        ExplorationTask::click(
            "https://app.test/",
            CandidateElement::new(purpose, Bounds::new(x, 0.0, 10.0, 10.0)),
        )
    }

    #[test]
    fn test_fifo_order() {
        let mut frontier = Frontier::new(0);
        frontier.push(ExplorationTask::navigate("https://app.test/"));
        frontier.push(click("a", 1.0));
        frontier.push(click("b", 2.0));

        assert_eq!(frontier.len(), 3);
        assert!(matches!(frontier.pop(), Some(ExplorationTask::Navigate { .. })));
        assert_eq!(frontier.pop().unwrap().element().unwrap().purpose, "a");
        assert_eq!(frontier.pop().unwrap().element().unwrap().purpose, "b");
        assert!(frontier.is_empty());
    }

    #[test]
    fn test_duplicate_signature_rejected_even_after_pop() {
        let mut frontier = Frontier::new(0);
        assert_eq!(frontier.push(click("a", 1.0)), Enqueue::Added);
        frontier.pop();
        assert_eq!(frontier.push(click("a", 1.0)), Enqueue::Duplicate);
        assert_eq!(frontier.push(click("a", 2.0)), Enqueue::Added);
    }

    #[test]
    fn test_overflow_drops_task() {
        let mut frontier = Frontier::new(1);
        assert_eq!(frontier.push(click("a", 1.0)), Enqueue::Added);
        assert_eq!(frontier.push(click("b", 2.0)), Enqueue::Overflow);
        frontier.pop();
        assert_eq!(frontier.push(click("b", 2.0)), Enqueue::Added);
    }
}
