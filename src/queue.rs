//! Blocking FIFO task queue with a one-way abort switch.
//!
//! Consumers block in [`TaskQueue::pop`] until an item is available or the
//! queue is aborted. Once aborted, `pop` returns `None` for every caller,
//! including those already waiting, and never hands out the items that were
//! still pending. Those can be recovered with [`TaskQueue::drain`].
//!
//! The queue is unbounded: `push` never blocks and never fails. Producers
//! that need backpressure must bound their own submissions.

use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug)]
pub struct TaskQueue<T> {
    items: Mutex<VecDeque<T>>,
    available: Condvar,
    aborted: AtomicBool,
}

impl<T> TaskQueue<T> {
    pub fn new() -> Self {
        Self {
            items: Mutex::new(VecDeque::new()),
            available: Condvar::new(),
            aborted: AtomicBool::new(false),
        }
    }

    /// Append `item` at the tail and wake one waiting consumer.
    ///
    /// Pushing after [`abort`](Self::abort) still succeeds; the item just
    /// never comes back out of `pop`.
    pub fn push(&self, item: T) {
        let mut items = self.items.lock();
        items.push_back(item);
        self.available.notify_one();
    }

    /// Remove the head item, blocking while the queue is empty.
    ///
    /// Returns `None` as soon as the queue is aborted, whether or not items
    /// remain.
    pub fn pop(&self) -> Option<T> {
        let mut items = self.items.lock();

        // re-checked on every wakeup, spurious ones included
        while items.is_empty() && !self.is_aborted() {
            self.available.wait(&mut items);
        }

        if self.is_aborted() {
            return None;
        }

        items.pop_front()
    }

    /// Non-blocking variant of [`pop`](Self::pop).
    pub fn try_pop(&self) -> Option<T> {
        if self.is_aborted() {
            return None;
        }
        self.items.lock().pop_front()
    }

    /// Flip the abort flag and wake every waiter. Idempotent.
    pub fn abort(&self) {
        // store under the lock so a consumer between its predicate check and
        // its wait cannot miss the broadcast
        let _items = self.items.lock();
        self.aborted.store(true, Ordering::Release);
        self.available.notify_all();
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted.load(Ordering::Acquire)
    }

    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }

    /// Take every pending item, in FIFO order.
    pub fn drain(&self) -> Vec<T> {
        self.items.lock().drain(..).collect()
    }
}

impl<T> Default for TaskQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::{Duration, Instant};

    #[test]
    fn test_fifo_order() {
        let queue = TaskQueue::new();
        for i in 0..5 {
            queue.push(i);
        }

        assert_eq!(queue.len(), 5);
        let popped: Vec<_> = (0..5).map(|_| queue.pop().unwrap()).collect();
        assert_eq!(popped, vec![0, 1, 2, 3, 4]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_pop_blocks_until_push() {
        let queue = Arc::new(TaskQueue::new());

        let consumer = {
            let queue = queue.clone();
            thread::spawn(move || queue.pop())
        };

        thread::sleep(Duration::from_millis(50));
        assert!(!consumer.is_finished());

        queue.push(42);
        assert_eq!(consumer.join().unwrap(), Some(42));
    }

    #[test]
    fn test_abort_wakes_all_waiters() {
        let queue: Arc<TaskQueue<u32>> = Arc::new(TaskQueue::new());

        let waiters: Vec<_> = (0..4)
            .map(|_| {
                let queue = queue.clone();
                thread::spawn(move || queue.pop())
            })
            .collect();

        thread::sleep(Duration::from_millis(50));
        let start = Instant::now();
        queue.abort();

        for waiter in waiters {
            assert_eq!(waiter.join().unwrap(), None);
        }
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn test_abort_abandons_pending_items() {
        let queue = TaskQueue::new();
        queue.push("a");
        queue.push("b");
        queue.abort();

        assert!(queue.pop().is_none());
        assert!(queue.try_pop().is_none());
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.drain(), vec!["a", "b"]);
    }

    #[test]
    fn test_abort_is_idempotent() {
        let queue: TaskQueue<()> = TaskQueue::new();
        queue.abort();
        queue.abort();
        assert!(queue.is_aborted());
        assert!(queue.pop().is_none());
    }

    #[test]
    fn test_push_after_abort_is_silent() {
        let queue = TaskQueue::new();
        queue.abort();
        queue.push(1);
        assert_eq!(queue.len(), 1);
        assert!(queue.pop().is_none());
    }

    #[test]
    fn test_try_pop_empty() {
        let queue: TaskQueue<u8> = TaskQueue::default();
        assert!(queue.try_pop().is_none());
        queue.push(7);
        assert_eq!(queue.try_pop(), Some(7));
    }
}
