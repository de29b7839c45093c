/// Splits `text` on whitespace into chunks of at most `max_words` words.
///
/// Every chunk except the last holds exactly `max_words` words; empty chunks are never
/// produced, so blank input yields no chunks. A `max_words` of 0 is treated as 1.
pub fn chunk_words(text: &str, max_words: usize) -> Vec<String> {
    let max_words = max_words.max(1);
    let mut chunks = Vec::new();
    let mut buf: Vec<&str> = Vec::with_capacity(max_words);

    for word in text.split_whitespace() {
        buf.push(word);
        if buf.len() >= max_words {
            chunks.push(buf.join(" "));
            buf.clear();
        }
    }
    if !buf.is_empty() {
        chunks.push(buf.join(" "));
    }

    chunks
}

/// Whitespace-delimited word count, the unit every length check uses.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
