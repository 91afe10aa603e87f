use std::collections::VecDeque;

use crate::config::ConfigError;

/// Outcome of an expansion change
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Expansion {
    /// Chunk opened; `evicted` is the chunk closed to make room
    Opened { evicted: Option<usize> },
    /// Chunk closed by a toggle
    Closed,
    /// Chunk was already open
    Unchanged,
    /// Index outside the current chunk range
    Ignored,
}

/// Bounded set of expanded chunks.
///
/// Open chunks are kept in the order they were opened, oldest at the front.
/// Opening a chunk while `max_open` are already open closes the oldest one.
#[derive(Clone, Debug)]
pub struct ExpansionCache {
    /// Open chunk indices, oldest first
    open: VecDeque<usize>,

    /// Maximum concurrently open chunks
    max_open: usize,

    /// Chunks in the current log
    chunk_count: usize,
}

impl ExpansionCache {
    pub fn new(max_open: usize) -> Result<Self, ConfigError> {
        if max_open == 0 {
            return Err(ConfigError::ZeroMaxOpen);
        }
        Ok(Self {
            open: VecDeque::with_capacity(max_open + 1),
            max_open,
            chunk_count: 0,
        })
    }

    /// Reset for a log with `chunk_count` chunks; the last chunk starts open
    pub fn initialize(&mut self, chunk_count: usize) {
        self.open.clear();
        self.chunk_count = chunk_count;
        if let Some(last) = chunk_count.checked_sub(1) {
            self.open.push_back(last);
        }
    }

    /// Flip a chunk between open and closed
    pub fn toggle(&mut self, index: usize) -> Expansion {
        if index >= self.chunk_count {
            return Expansion::Ignored;
        }

        match self.position(index) {
            Some(pos) => {
                self.open.remove(pos);
                tracing::debug!(chunk = index, "collapsed chunk");
                Expansion::Closed
            }
            None => self.open_chunk(index),
        }
    }

    /// Make sure a chunk is open without ever closing it
    pub fn reveal(&mut self, index: usize) -> Expansion {
        if index >= self.chunk_count {
            return Expansion::Ignored;
        }

        if self.is_open(index) {
            Expansion::Unchanged
        } else {
            self.open_chunk(index)
        }
    }

    pub fn is_open(&self, index: usize) -> bool {
        self.open.contains(&index)
    }

    /// Open indices, oldest first
    pub fn open_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.open.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.open.len()
    }

    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }

    pub fn max_open(&self) -> usize {
        self.max_open
    }

    pub fn chunk_count(&self) -> usize {
        self.chunk_count
    }

    fn position(&self, index: usize) -> Option<usize> {
        self.open.iter().position(|&i| i == index)
    }

    fn open_chunk(&mut self, index: usize) -> Expansion {
        self.open.push_back(index);

        // `index` sits at the back, so the front is never the chunk just opened
        let evicted = if self.open.len() > self.max_open {
            self.open.pop_front()
        } else {
            None
        };

        tracing::debug!(chunk = index, ?evicted, "expanded chunk");
        Expansion::Opened { evicted }
    }
}
