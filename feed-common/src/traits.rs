use crate::error::{FeedError, Result};

/// A forward read position over a token feed.
///
/// This is the whole surface a tokenizer or parser needs: look at the
/// current token, step past it, ask whether anything is left, and copy the
/// cursor to keep a checkpoint. Cloning never copies token data.
pub trait FeedCursor: Clone {
    /// The token type yielded by the feed.
    type Token;

    /// Returns the current token, or `None` if nothing is available.
    fn peek(&self) -> Option<Self::Token>;

    /// Steps past the current token.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is empty.
    fn advance(&mut self);

    /// Returns true if no token is available at this position right now.
    fn is_empty(&self) -> bool;

    /// Returns true if no token will ever be available at this position.
    fn is_end(&self) -> bool;

    /// Like [`peek`](Self::peek), but reports exhaustion as an error.
    fn try_get(&self) -> Result<Self::Token> {
        self.peek().ok_or(FeedError::Exhausted)
    }

    /// Creates a checkpoint that can be restored later.
    fn checkpoint(&self) -> Self {
        self.clone()
    }

    /// Restores the cursor to a previous checkpoint.
    fn restore(&mut self, checkpoint: &Self) {
        self.clone_from(checkpoint);
    }
}

/// Helpers available on every [`FeedCursor`].
pub trait FeedCursorExt: FeedCursor {
    /// Advances by up to `n` tokens, stopping early when the cursor empties.
    /// Returns how many tokens were skipped.
    fn advance_n(&mut self, n: usize) -> usize {
        let mut count = 0;
        while count < n && !self.is_empty() {
            self.advance();
            count += 1;
        }
        count
    }

    /// Consumes tokens while the predicate returns true.
    fn consume_while<F>(&mut self, mut predicate: F) -> Vec<Self::Token>
    where
        F: FnMut(&Self::Token) -> bool,
    {
        let mut taken = Vec::new();
        while let Some(token) = self.peek() {
            if !predicate(&token) {
                break;
            }
            self.advance();
            taken.push(token);
        }
        taken
    }

    /// Runs `attempt` on a copy of the cursor.
    ///
    /// On `Some` the copy replaces the cursor; on `None` the cursor is left
    /// where it was.
    fn speculate<R, F>(&mut self, attempt: F) -> Option<R>
    where
        F: FnOnce(&mut Self) -> Option<R>,
    {
        let mut trial = self.checkpoint();
        let result = attempt(&mut trial)?;
        *self = trial;
        Some(result)
    }

    /// Collects every token currently available without moving the cursor.
    fn remaining(&self) -> Vec<Self::Token> {
        let mut copy = self.checkpoint();
        let mut tokens = Vec::new();
        while let Some(token) = copy.peek() {
            copy.advance();
            tokens.push(token);
        }
        tokens
    }
}

impl<C: FeedCursor> FeedCursorExt for C {}
