use std::cmp::Ordering;
use std::collections::HashMap;
use std::hash::Hash;

/// Indexed binary min-heap over unique keys.
///
/// Enqueueing a key that is already present replaces its priority in place,
/// so the queue never holds stale duplicates. Equal priorities come out in
/// the order they were last enqueued.
#[derive(Debug, Clone)]
pub struct PriorityQueue<K> {
    heap: Vec<Entry<K>>,
    slots: HashMap<K, usize>,
    next_seq: u64,
}

#[derive(Debug, Clone)]
struct Entry<K> {
    key: K,
    priority: f32,
    seq: u64,
}

impl<K> Entry<K> {
    fn precedes(&self, other: &Self) -> bool {
        self.priority
            .total_cmp(&other.priority)
            .then(self.seq.cmp(&other.seq))
            == Ordering::Less
    }
}

impl<K: Copy + Eq + Hash> Default for PriorityQueue<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Copy + Eq + Hash> PriorityQueue<K> {
    pub fn new() -> Self {
        Self {
            heap: Vec::new(),
            slots: HashMap::new(),
            next_seq: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.slots.contains_key(key)
    }

    /// Current priority of `key`, if queued.
    pub fn priority(&self, key: &K) -> Option<f32> {
        self.slots.get(key).map(|&i| self.heap[i].priority)
    }

    /// Insert `key`, or replace its priority if it is already queued.
    pub fn enqueue(&mut self, key: K, priority: f32) {
        let seq = self.next_seq;
        self.next_seq += 1;
        match self.slots.get(&key).copied() {
            Some(i) => {
                self.heap[i].priority = priority;
                self.heap[i].seq = seq;
                let i = self.sift_up(i);
                self.sift_down(i);
            }
            None => {
                let i = self.heap.len();
                self.heap.push(Entry { key, priority, seq });
                self.slots.insert(key, i);
                self.sift_up(i);
            }
        }
    }

    /// Remove and return the key with the lowest priority.
    pub fn dequeue(&mut self) -> Option<K> {
        self.dequeue_with_priority().map(|(key, _)| key)
    }

    /// Remove and return the lowest-priority key together with its priority.
    pub fn dequeue_with_priority(&mut self) -> Option<(K, f32)> {
        if self.heap.is_empty() {
            return None;
        }
        let last = self.heap.len() - 1;
        self.swap(0, last);
        let entry = self.heap.pop()?;
        self.slots.remove(&entry.key);
        if !self.heap.is_empty() {
            self.sift_down(0);
        }
        Some((entry.key, entry.priority))
    }

    /// Lowest-priority key without removing it.
    pub fn peek(&self) -> Option<(K, f32)> {
        self.heap.first().map(|e| (e.key, e.priority))
    }

    pub fn clear(&mut self) {
        self.heap.clear();
        self.slots.clear();
    }

    fn sift_up(&mut self, mut i: usize) -> usize {
        while i > 0 {
            let parent = (i - 1) / 2;
            if !self.heap[i].precedes(&self.heap[parent]) {
                break;
            }
            self.swap(i, parent);
            i = parent;
        }
        i
    }

    fn sift_down(&mut self, mut i: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * i + 1;
            let right = left + 1;
            let mut smallest = i;
            if left < len && self.heap[left].precedes(&self.heap[smallest]) {
                smallest = left;
            }
            if right < len && self.heap[right].precedes(&self.heap[smallest]) {
                smallest = right;
            }
            if smallest == i {
                return;
            }
            self.swap(i, smallest);
            i = smallest;
        }
    }

    fn swap(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        self.heap.swap(a, b);
        self.slots.insert(self.heap[a].key, a);
        self.slots.insert(self.heap[b].key, b);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dequeues_in_priority_order() {
        let mut q = PriorityQueue::new();
        for (key, p) in [(1, 5.0), (2, 1.0), (3, 3.0), (4, 4.0), (5, 2.0)] {
            q.enqueue(key, p);
        }
        let order: Vec<i32> = std::iter::from_fn(|| q.dequeue()).collect();
        assert_eq!(order, vec![2, 5, 3, 4, 1]);
        assert!(q.is_empty());
    }

    #[test]
    fn empty_queue_yields_none() {
        let mut q: PriorityQueue<u32> = PriorityQueue::new();
        assert_eq!(q.dequeue(), None);
        assert_eq!(q.peek(), None);
    }

    #[test]
    fn reenqueue_lowers_priority_without_duplicate() {
        let mut q = PriorityQueue::new();
        q.enqueue('a', 10.0);
        q.enqueue('b', 5.0);
        q.enqueue('a', 1.0);
        assert_eq!(q.len(), 2);
        assert_eq!(q.priority(&'a'), Some(1.0));
        assert_eq!(q.dequeue_with_priority(), Some(('a', 1.0)));
        assert_eq!(q.dequeue(), Some('b'));
        assert_eq!(q.dequeue(), None);
    }

    #[test]
    fn reenqueue_can_raise_priority() {
        let mut q = PriorityQueue::new();
        q.enqueue('a', 1.0);
        q.enqueue('b', 2.0);
        q.enqueue('c', 3.0);
        q.enqueue('a', 9.0);
        assert_eq!(q.dequeue(), Some('b'));
        assert_eq!(q.dequeue(), Some('c'));
        assert_eq!(q.dequeue(), Some('a'));
    }

    #[test]
    fn ties_come_out_in_enqueue_order() {
        let mut q = PriorityQueue::new();
        q.enqueue(3, 1.0);
        q.enqueue(1, 1.0);
        q.enqueue(2, 1.0);
        assert_eq!(q.dequeue(), Some(3));
        assert_eq!(q.dequeue(), Some(1));
        assert_eq!(q.dequeue(), Some(2));
    }

    #[test]
    fn heap_stays_consistent_under_mixed_updates() {
        let mut q = PriorityQueue::new();
        for i in 0..50u32 {
            q.enqueue(i, ((i * 37) % 50) as f32);
        }
        for i in (0..50u32).step_by(3) {
            q.enqueue(i, -(i as f32));
        }
        let mut last = f32::NEG_INFINITY;
        let mut seen = 0;
        while let Some((key, p)) = q.dequeue_with_priority() {
            assert!(p >= last, "key {key} came out of order");
            assert!(!q.contains(&key));
            last = p;
            seen += 1;
        }
        assert_eq!(seen, 50);
    }
}
