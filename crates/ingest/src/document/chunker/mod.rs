//! Overlapping character-window chunking.
//!
//! Windows are `chunk_size` characters wide. Each window's right edge is
//! pulled back to the best separator in its overlap zone (page break, then
//! paragraph break, sentence end, whitespace) and the next window starts
//! `chunk_overlap` characters before that edge, snapped to a word start.

mod helpers;
mod splitter;
mod types;

pub use splitter::Chunker;
pub use types::{chunk_id, Chunk, ChunkConfig};
