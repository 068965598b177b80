//! Chunked mutable text store.
//!
//! Invariants (hold after every public call):
//! * No chunk is empty; deletes prune emptied chunks.
//! * No chunk is longer than `chunk_size` after an insert. `append` is the
//!   bulk-load path and trusts the caller to respect the bound (see
//!   [`ChunkedBuffer::from_text`]).
//! * `len` equals the sum of chunk lengths and the concatenation of all chunks
//!   in order is the document text.
//!
//! Lookup is a linear scan over accumulated chunk lengths. At the chunk counts
//! a single notes file produces this is cheap; a cumulative-offset index would
//! make it logarithmic if that ever matters.

use crate::{byte_offset, unit_len};
use tracing::trace;

/// Default `chunk_size` used when no configuration overrides it.
pub const DEFAULT_CHUNK_SIZE: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Chunk {
    text: String,
    /// Cached unit length of `text`.
    len: usize,
}

impl Chunk {
    fn new(text: String) -> Self {
        let len = unit_len(&text);
        Self { text, len }
    }
}

/// Ordered sequence of bounded text chunks.
#[derive(Debug, Clone)]
pub struct ChunkedBuffer {
    chunks: Vec<Chunk>,
    len: usize,
    chunk_size: usize,
}

impl Default for ChunkedBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE)
    }
}

impl ChunkedBuffer {
    /// Empty buffer. A `chunk_size` of zero is treated as one.
    pub fn new(chunk_size: usize) -> Self {
        Self {
            chunks: Vec::new(),
            len: 0,
            chunk_size: chunk_size.max(1),
        }
    }

    /// Bulk-load `text`, appending it in `chunk_size` pieces.
    pub fn from_text(text: &str, chunk_size: usize) -> Self {
        let mut buffer = Self::new(chunk_size);
        let mut rest = text;
        while !rest.is_empty() {
            let cut = byte_offset(rest, buffer.chunk_size);
            let (piece, tail) = rest.split_at(cut);
            buffer.append(piece);
            rest = tail;
        }
        trace!(target: "text.buffer", len = buffer.len, chunks = buffer.chunks.len(), "bulk_load");
        buffer
    }

    /// Total length in units.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Chunk contents in document order.
    pub fn chunks(&self) -> impl Iterator<Item = &str> + '_ {
        self.chunks.iter().map(|c| c.text.as_str())
    }

    /// Chunk lengths in document order.
    pub fn chunk_lens(&self) -> impl Iterator<Item = usize> + '_ {
        self.chunks.iter().map(|c| c.len)
    }

    /// Every unit of the document in order.
    pub fn chars(&self) -> impl Iterator<Item = char> + '_ {
        self.chunks.iter().flat_map(|c| c.text.chars())
    }

    /// Add `text` as a new chunk at the end, unconditionally.
    ///
    /// Bulk load only; interactive edits go through [`ChunkedBuffer::insert`].
    pub fn append(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let chunk = Chunk::new(text.to_string());
        self.len += chunk.len;
        self.chunks.push(chunk);
    }

    /// Insert `text` at `offset`.
    ///
    /// Panics if `offset > self.len()`; the cursor layer never produces such a request.
    pub fn insert(&mut self, text: &str, offset: usize) {
        assert!(
            offset <= self.len,
            "insert offset {offset} past buffer length {}",
            self.len
        );
        if text.is_empty() {
            return;
        }
        let inserted = unit_len(text);
        let touched = self.splice(text, inserted, offset);
        self.len += inserted;
        self.split_oversized(touched);
        trace!(
            target: "text.buffer",
            offset,
            inserted,
            chunk = touched,
            chunks = self.chunks.len(),
            "insert"
        );
    }

    /// Place `text` into the chunk list, returning the index of the chunk that received it.
    fn splice(&mut self, text: &str, inserted: usize, offset: usize) -> usize {
        let mut start = 0;
        let mut target = None;
        for (idx, chunk) in self.chunks.iter().enumerate() {
            if offset == start {
                target = Some((idx, None));
                break;
            }
            let end = start + chunk.len;
            if offset < end {
                target = Some((idx, Some(offset - start)));
                break;
            }
            start = end;
        }
        match target {
            // Chunk boundary: new text gets its own chunk.
            Some((idx, None)) => {
                self.chunks.insert(idx, Chunk::new(text.to_string()));
                return idx;
            }
            Some((idx, Some(local))) => {
                let chunk = &mut self.chunks[idx];
                let at = byte_offset(&chunk.text, local);
                chunk.text.insert_str(at, text);
                chunk.len += inserted;
                return idx;
            }
            None => {}
        }
        // End of document: extend the last chunk while it has room.
        if let Some(last) = self.chunks.last_mut()
            && last.len + inserted <= self.chunk_size
        {
            last.text.push_str(text);
            last.len += inserted;
            return self.chunks.len() - 1;
        }
        self.chunks.push(Chunk::new(text.to_string()));
        self.chunks.len() - 1
    }

    fn split_oversized(&mut self, mut idx: usize) {
        let bound = self.chunk_size;
        while self.chunks[idx].len > bound {
            let chunk = &mut self.chunks[idx];
            let cut = byte_offset(&chunk.text, bound);
            let tail = chunk.text.split_off(cut);
            let tail_len = chunk.len - bound;
            chunk.len = bound;
            self.chunks.insert(
                idx + 1,
                Chunk {
                    text: tail,
                    len: tail_len,
                },
            );
            idx += 1;
        }
    }

    /// Remove `length` units starting at `offset`.
    ///
    /// Panics if `offset + length > self.len()`.
    pub fn delete(&mut self, offset: usize, length: usize) {
        assert!(
            offset
                .checked_add(length)
                .is_some_and(|end| end <= self.len),
            "delete range {offset}+{length} past buffer length {}",
            self.len
        );
        if length == 0 {
            return;
        }
        let mut remaining = length;
        let mut at = offset;
        let mut start = 0;
        for chunk in self.chunks.iter_mut() {
            if remaining == 0 {
                break;
            }
            let chunk_start = start;
            start += chunk.len;
            if at >= start {
                continue;
            }
            let local = at - chunk_start;
            let take = remaining.min(chunk.len - local);
            let lo = byte_offset(&chunk.text, local);
            let hi = byte_offset(&chunk.text, local + take);
            chunk.text.replace_range(lo..hi, "");
            chunk.len -= take;
            remaining -= take;
            at += take;
        }
        self.len -= length;
        self.chunks.retain(|c| c.len > 0);
        trace!(target: "text.buffer", offset, length, chunks = self.chunks.len(), "delete");
    }

    /// Text in `[offset, offset + length)`, clipped to the buffer bounds.
    pub fn get(&self, offset: usize, length: usize) -> String {
        let lo = offset.min(self.len);
        let hi = offset.saturating_add(length).min(self.len);
        let mut out = String::new();
        if lo >= hi {
            return out;
        }
        let mut start = 0;
        for chunk in &self.chunks {
            let chunk_start = start;
            start += chunk.len;
            if start <= lo {
                continue;
            }
            if chunk_start >= hi {
                break;
            }
            let local_lo = lo.saturating_sub(chunk_start);
            let local_hi = (hi - chunk_start).min(chunk.len);
            let b0 = byte_offset(&chunk.text, local_lo);
            let b1 = byte_offset(&chunk.text, local_hi);
            out.push_str(&chunk.text[b0..b1]);
        }
        out
    }

    /// The whole document.
    pub fn text(&self) -> String {
        self.chunks.iter().map(|c| c.text.as_str()).collect()
    }
}
