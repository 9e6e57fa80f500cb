use std::collections::{BTreeMap, VecDeque};
use tracing::{debug, trace};

/// The shared buffer behind every [`Feed`](crate::Feed) created from one source.
///
/// Tokens are addressed by absolute position. The window only holds the span
/// between the smallest and the largest position any live cursor sits on, and
/// pulls from the source on demand when a cursor steps past the last buffered
/// token.
///
/// Invariants:
/// - `buffer_start` is the smallest position in `clients` whenever `clients`
///   is not empty.
/// - Every position in `clients` lies in `buffer_start..=buffer_end()`, and a
///   position equal to `buffer_end()` only exists once the source is exhausted.
/// - `clients` never holds a zero count.
pub struct Window<I: Iterator> {
    /// `None` once the source reported exhaustion.
    source: Option<I>,
    buffer: VecDeque<I::Item>,
    /// Absolute position of `buffer[0]`.
    buffer_start: usize,
    /// Absolute position -> number of live cursors sitting there.
    clients: BTreeMap<usize, usize>,
}

impl<I: Iterator> Window<I> {
    /// Creates a window over `source` with one live cursor at position 0.
    ///
    /// The first token is pulled eagerly so that the initial cursor can
    /// tell an empty source from a non-empty one.
    pub fn new(source: I) -> Self {
        let mut window = Self {
            source: Some(source),
            buffer: VecDeque::new(),
            buffer_start: 0,
            clients: BTreeMap::new(),
        };
        window.pull();
        window.clients.insert(0, 1);
        window
    }

    fn buffer_end(&self) -> usize {
        self.buffer_start + self.buffer.len()
    }

    fn pull(&mut self) {
        let Some(source) = self.source.as_mut() else {
            return;
        };
        match source.next() {
            Some(token) => {
                self.buffer.push_back(token);
                trace!(pos = self.buffer_end() - 1, "pulled token");
            }
            None => {
                debug!(len = self.buffer_end(), "source exhausted");
                self.source = None;
            }
        }
    }

    /// Registers one more cursor at `pos`.
    ///
    /// # Panics
    ///
    /// Panics if no cursor sits at `pos` already: new positions are only
    /// reached through [`advance`](Self::advance).
    pub fn add_client(&mut self, pos: usize) {
        match self.clients.get_mut(&pos) {
            Some(count) => *count += 1,
            None => panic!("Window: add_client at position {pos} with no live cursor"),
        }
    }

    /// Releases one cursor at `pos`, trimming the front of the buffer when
    /// the smallest live position moves.
    ///
    /// # Panics
    ///
    /// Panics if no cursor sits at `pos`.
    pub fn remove_client(&mut self, pos: usize) {
        let Some(count) = self.clients.get_mut(&pos) else {
            panic!("Window: remove_client at position {pos} with no live cursor");
        };
        *count -= 1;
        if *count > 0 {
            return;
        }
        self.clients.remove(&pos);

        let Some((&next_start, _)) = self.clients.first_key_value() else {
            // The last cursor is going away, and the window with it.
            trace!(pos, "last cursor released");
            return;
        };

        if pos == self.buffer_start {
            let evicted = next_start - self.buffer_start;
            self.buffer.drain(..evicted);
            trace!(
                old_start = self.buffer_start,
                new_start = next_start,
                evicted,
                "trimmed window"
            );
            self.buffer_start = next_start;
        }
    }

    /// Returns the token at `pos`.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is not inside the buffered window.
    pub fn get(&self, pos: usize) -> &I::Item {
        assert!(
            pos >= self.buffer_start && pos < self.buffer_end(),
            "Window: position {pos} is outside the buffered window {}..{}",
            self.buffer_start,
            self.buffer_end()
        );
        &self.buffer[pos - self.buffer_start]
    }

    /// Moves one cursor from `pos` to `pos + 1` and returns `pos + 1`.
    ///
    /// Pulls the next token first if `pos` is the last buffered one. The
    /// target count is raised before the old one is released so the trim in
    /// [`remove_client`](Self::remove_client) never drops the token the
    /// cursor is moving onto.
    ///
    /// # Panics
    ///
    /// Panics if there is no token at `pos`.
    pub fn advance(&mut self, pos: usize) -> usize {
        assert!(
            pos >= self.buffer_start && pos < self.buffer_end(),
            "Window: cannot advance past the end of the feed (position {pos})"
        );
        if pos + 1 == self.buffer_end() {
            self.pull();
        }

        *self.clients.entry(pos + 1).or_insert(0) += 1;
        self.remove_client(pos);

        pos + 1
    }

    /// Returns true if the source is exhausted and `pos` is one past the last token.
    pub fn is_end(&self, pos: usize) -> bool {
        debug_assert!(pos >= self.buffer_start && pos <= self.buffer_end());
        self.source.is_none() && pos == self.buffer_end()
    }

    /// Absolute position of the first buffered token.
    pub fn start(&self) -> usize {
        self.buffer_start
    }

    /// Number of buffered tokens.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Total number of live cursors.
    pub fn live_cursors(&self) -> usize {
        self.clients.values().sum()
    }

    /// Number of live cursors at `pos`.
    pub fn live_at(&self, pos: usize) -> usize {
        self.clients.get(&pos).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_pulls_first_token() {
        let window = Window::new(vec![1, 2, 3].into_iter());
        assert_eq!(window.len(), 1);
        assert_eq!(*window.get(0), 1);
        assert_eq!(window.live_at(0), 1);
        assert!(!window.is_end(0));
    }

    #[test]
    fn test_new_on_empty_source() {
        let window = Window::new(std::iter::empty::<i32>());
        assert!(window.is_empty());
        assert!(window.is_end(0));
        assert_eq!(window.live_cursors(), 1);
    }

    #[test]
    fn test_advance_moves_count() {
        let mut window = Window::new(vec![1, 2, 3].into_iter());
        assert_eq!(window.advance(0), 1);
        assert_eq!(window.live_at(0), 0);
        assert_eq!(window.live_at(1), 1);
        assert_eq!(window.start(), 1);
        assert_eq!(window.len(), 1);
        assert_eq!(*window.get(1), 2);
    }

    #[test]
    fn test_trim_waits_for_minimum() {
        let mut window = Window::new(vec![1, 2, 3, 4].into_iter());
        window.add_client(0);

        let mut pos = 0;
        for _ in 0..3 {
            pos = window.advance(pos);
        }
        assert_eq!(pos, 3);
        // The second cursor still pins position 0.
        assert_eq!(window.start(), 0);
        assert_eq!(window.len(), 4);

        window.remove_client(0);
        assert_eq!(window.start(), 3);
        assert_eq!(window.len(), 1);
        assert_eq!(*window.get(3), 4);
    }

    #[test]
    fn test_removing_non_minimum_keeps_buffer() {
        let mut window = Window::new(vec![1, 2, 3].into_iter());
        window.add_client(0);
        let pos = window.advance(0);
        window.remove_client(pos);
        assert_eq!(window.start(), 0);
        assert_eq!(window.len(), 2);
        assert_eq!(window.live_cursors(), 1);
    }

    #[test]
    fn test_no_zero_entries() {
        let mut window = Window::new(vec![1, 2].into_iter());
        window.add_client(0);
        window.remove_client(0);
        assert_eq!(window.live_at(0), 1);
        window.advance(0);
        assert!(!window.clients.contains_key(&0));
        assert!(window.clients.values().all(|&count| count > 0));
    }

    #[test]
    fn test_end_after_last_token() {
        let mut window = Window::new(vec![1, 2].into_iter());
        let pos = window.advance(0);
        assert!(!window.is_end(pos));
        let pos = window.advance(pos);
        assert!(window.is_end(pos));
        assert!(window.is_empty());
    }

    #[test]
    fn test_last_release_abandons() {
        let mut window = Window::new(vec![1, 2].into_iter());
        window.remove_client(0);
        assert_eq!(window.live_cursors(), 0);
    }

    #[test]
    #[should_panic(expected = "no live cursor")]
    fn test_add_client_requires_existing_cursor() {
        let mut window = Window::new(vec![1, 2].into_iter());
        window.add_client(1);
    }

    #[test]
    #[should_panic(expected = "no live cursor")]
    fn test_remove_client_requires_existing_cursor() {
        let mut window = Window::new(vec![1, 2].into_iter());
        window.remove_client(1);
    }

    #[test]
    #[should_panic(expected = "outside the buffered window")]
    fn test_get_outside_window() {
        let window = Window::new(vec![1, 2].into_iter());
        window.get(1);
    }

    #[test]
    #[should_panic(expected = "past the end")]
    fn test_advance_past_end() {
        let mut window = Window::new(std::iter::empty::<i32>());
        window.advance(0);
    }
}
