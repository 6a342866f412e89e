//! Discrete player intents and the bounded queue they wait in
//!
//! Host input callbacks push intents; the controller drains them once per
//! tick, in arrival order.

use std::collections::VecDeque;

use crate::consts::INPUT_QUEUE_CAPACITY;
use crate::sim::Direction;

/// A single player intent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Turn(Direction),
    TogglePause,
    Reset,
    Start,
}

/// FIFO of intents with a fixed capacity
#[derive(Debug, Clone)]
pub struct InputQueue {
    queue: VecDeque<Intent>,
    capacity: usize,
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::with_capacity(INPUT_QUEUE_CAPACITY)
    }
}

impl InputQueue {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            queue: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Queue an intent. When full the new intent is dropped and false returned.
    pub fn push(&mut self, intent: Intent) -> bool {
        if self.queue.len() >= self.capacity {
            log::debug!("Input queue full, dropping {:?}", intent);
            return false;
        }
        self.queue.push_back(intent);
        true
    }

    pub fn pop(&mut self) -> Option<Intent> {
        self.queue.pop_front()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
