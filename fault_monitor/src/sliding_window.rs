use std::collections::VecDeque;

/// Fixed-capacity window keeping the most recent `window_size` elements in
/// insertion order.
#[derive(Debug)]
pub struct SlidingWindow<T> {
    window_size: usize,
    elements: VecDeque<T>,
}

impl<T: Clone> SlidingWindow<T> {
    pub fn new(window_size: usize) -> SlidingWindow<T> {
        SlidingWindow {
            window_size,
            elements: VecDeque::with_capacity(window_size),
        }
    }

    pub fn add(&mut self, element: T) {
        self.elements.push_back(element);
        if self.elements.len() > self.window_size {
            self.elements.pop_front();
        }
    }

    pub fn snapshot(&self) -> Vec<T> {
        self.elements.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn capacity(&self) -> usize {
        self.window_size
    }
}
