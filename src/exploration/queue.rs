//! Bucket priority queue keyed by exploration cost.
//!
//! Costs are small non-negative integers, so a vector of buckets beats a
//! heap: pushes are O(1) and pops scan monotonically forward through the
//! cost range. Entries are never removed early; the engine drops stale
//! entries (those whose recorded cost exceeds the fact's current label) at
//! pop time. Clearing keeps the allocated buckets for the next run.

#[derive(Debug, Default)]
pub(crate) struct BucketQueue {
    buckets: Vec<Vec<usize>>,
    current: usize,
    len: usize,
}

impl BucketQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
        self.current = 0;
        self.len = 0;
    }

    pub fn push(&mut self, cost: usize, item: usize) {
        if cost >= self.buckets.len() {
            self.buckets.resize_with(cost + 1, Vec::new);
        }
        self.buckets[cost].push(item);
        self.len += 1;
        // Only relevant when the queue was drained past this cost and a
        // cheaper entry arrives; pops stay non-decreasing regardless.
        if cost < self.current {
            self.current = cost;
        }
    }

    pub fn pop(&mut self) -> Option<(usize, usize)> {
        if self.len == 0 {
            return None;
        }
        while self.buckets[self.current].is_empty() {
            self.current += 1;
        }
        self.len -= 1;
        let item = self.buckets[self.current].pop().unwrap();
        Some((self.current, item))
    }
}
