use std::collections::VecDeque;

/// Pending input for a computer. Values are consumed in the order they were
/// pushed; when the queue runs dry the default, if one is set, stands in.
#[derive(Debug, Clone, Default)]
pub struct InputQueue {
    values: VecDeque<i64>,
    default: Option<i64>,
}

impl InputQueue {
    pub fn new(values: &[i64]) -> Self {
        InputQueue {
            values: values.iter().copied().collect(),
            default: None,
        }
    }

    /// append to the back of the queue
    pub fn push(&mut self, value: i64) {
        self.values.push_back(value);
    }

    /// consume the next value, falling back to the default
    pub fn pop(&mut self) -> Option<i64> {
        self.values.pop_front().or(self.default)
    }

    pub fn set_default(&mut self, default: Option<i64>) {
        self.default = default;
    }

    pub fn default_value(&self) -> Option<i64> {
        self.default
    }

    /// queued values, not counting the default
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo() {
        let mut q = InputQueue::new(&[1, 2]);
        q.push(3);
        assert_eq!(q.pop(), Some(1));
        assert_eq!(q.pop(), Some(2));
        assert_eq!(q.pop(), Some(3));
        assert_eq!(q.pop(), None);
    }

    #[test]
    fn test_default_only_when_empty() {
        let mut q = InputQueue::new(&[5]);
        q.set_default(Some(-1));
        assert_eq!(q.len(), 1);
        assert_eq!(q.pop(), Some(5));
        assert_eq!(q.pop(), Some(-1));
        assert_eq!(q.pop(), Some(-1));
        assert!(q.is_empty());
    }

    #[test]
    fn test_unset_default() {
        let mut q = InputQueue::new(&[]);
        q.set_default(Some(0));
        assert_eq!(q.default_value(), Some(0));
        q.set_default(None);
        assert_eq!(q.pop(), None);
    }
}
