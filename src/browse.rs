//! Navigation state for stepping through posts and a post's attachments.

/// Position within the ascending list of post ids.
#[derive(Debug, Clone)]
pub struct PostPager {
    ids: Vec<i64>,
    index: usize,
}

impl PostPager {
    pub fn new(ids: Vec<i64>) -> Self {
        Self { ids, index: 0 }
    }

    /// Starts at `post_id`, or at the first post when it is not in `ids`.
    pub fn with_position(ids: Vec<i64>, post_id: i64) -> Self {
        let index = ids.iter().position(|&id| id == post_id).unwrap_or(0);
        Self { ids, index }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// One-based position of the current post.
    pub fn position(&self) -> usize {
        if self.ids.is_empty() { 0 } else { self.index + 1 }
    }

    pub fn current(&self) -> Option<i64> {
        self.ids.get(self.index).copied()
    }

    pub fn first(&mut self) -> Option<i64> {
        self.index = 0;
        self.current()
    }

    pub fn last(&mut self) -> Option<i64> {
        self.index = self.ids.len().saturating_sub(1);
        self.current()
    }

    /// Moves forward; stays on the last post at the end.
    pub fn next(&mut self) -> Option<i64> {
        if self.index + 1 < self.ids.len() {
            self.index += 1;
        }
        self.current()
    }

    /// Moves back; stays on the first post at the start.
    pub fn prev(&mut self) -> Option<i64> {
        self.index = self.index.saturating_sub(1);
        self.current()
    }

    pub fn peek_next(&self) -> Option<i64> {
        self.ids.get(self.index + 1).copied()
    }

    pub fn peek_prev(&self) -> Option<i64> {
        self.index.checked_sub(1).and_then(|i| self.ids.get(i).copied())
    }
}

/// Index into a post's attachments that wraps around in both directions.
#[derive(Debug, Clone, Copy)]
pub struct AttachmentCursor {
    count: usize,
    index: usize,
}

impl AttachmentCursor {
    pub fn new(count: usize) -> Self {
        Self { count, index: 0 }
    }

    /// Starts at `index`, reduced modulo the attachment count.
    pub fn at(count: usize, index: usize) -> Self {
        let index = if count == 0 { 0 } else { index % count };
        Self { count, index }
    }

    pub fn current(&self) -> Option<usize> {
        (self.count > 0).then_some(self.index)
    }

    pub fn next(&mut self) -> Option<usize> {
        if self.count > 0 {
            self.index = (self.index + 1) % self.count;
        }
        self.current()
    }

    pub fn prev(&mut self) -> Option<usize> {
        if self.count > 0 {
            self.index = (self.index + self.count - 1) % self.count;
        }
        self.current()
    }
}
