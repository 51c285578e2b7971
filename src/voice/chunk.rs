//! Sentence-aligned text chunking for length-limited synthesis.
//!
//! Speech backends cap utterance length, so long assistant replies are
//! split at sentence boundaries (`.`, `!`, `?`) and greedily packed into
//! chunks bounded by a character budget.  Sentences are never split: a
//! single sentence longer than the budget is kept whole, which is an
//! accepted edge case rather than an error.

// ---------------------------------------------------------------------------
// Sentence scanning
// ---------------------------------------------------------------------------

/// Split `text` into sentences, each keeping its trailing run of
/// terminators.  A trailing fragment without a terminator is kept as a
/// final sentence; text containing no terminator at all yields itself.
fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut in_terminator = false;

    for (idx, ch) in text.char_indices() {
        let is_terminator = matches!(ch, '.' | '!' | '?');
        if in_terminator && !is_terminator {
            sentences.push(&text[start..idx]);
            start = idx;
        }
        in_terminator = is_terminator;
    }

    if start < text.len() {
        sentences.push(&text[start..]);
    }

    sentences
}

// ---------------------------------------------------------------------------
// Chunking
// ---------------------------------------------------------------------------

/// Split `text` into synthesis chunks of at most `max_len` characters,
/// breaking only at sentence boundaries.
///
/// Consecutive sentences are packed into the running chunk while the
/// combined length stays within `max_len`; when the next sentence would
/// exceed the budget the chunk is closed and a new one starts with that
/// sentence.  Chunks are trimmed of surrounding whitespace and empty chunks
/// are dropped.
///
/// # Example
/// ```rust
/// use edubridge_tutor::voice::split_into_chunks;
///
/// let chunks = split_into_chunks("One. Two. Three.", 8);
/// assert_eq!(chunks, vec!["One.", "Two.", "Three."]);
/// ```
pub fn split_into_chunks(text: &str, max_len: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for sentence in split_sentences(text) {
        let sentence = sentence.trim();
        if sentence.is_empty() {
            continue;
        }

        let packed_len = if current.is_empty() {
            sentence.chars().count()
        } else {
            current.chars().count() + 1 + sentence.chars().count()
        };

        if packed_len > max_len && !current.is_empty() {
            chunks.push(std::mem::replace(&mut current, sentence.to_string()));
        } else {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(sentence);
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
