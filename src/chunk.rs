//! Findings text segmenter.
//!
//! Splits a findings document into an ordered sequence of bounded-size
//! chunks, the unit of semantic comparison. Empty lines act as chunk
//! separators; within a paragraph, consecutive lines accumulate greedily
//! until `max_chunk_chars` would be reached.
//!
//! Segmentation is deterministic: the same input always yields the same
//! chunk boundaries, which keeps per-section distances comparable across
//! runs.

/// Default chunk size bound, in characters.
pub const DEFAULT_MAX_CHUNK_CHARS: usize = 500;

/// Split findings text into ordered chunks of at most roughly
/// `max_chunk_chars` characters.
///
/// Each blank-line separator starts a new chunk. Within a paragraph, a line
/// that would push the running buffer to or past the limit flushes the
/// buffer first and starts a new one. Buffer length counts a trailing
/// newline after every accumulated line. Chunks are trimmed of surrounding
/// whitespace; empty chunks are discarded, so empty input yields an empty
/// sequence.
pub fn segment(text: &str, max_chunk_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();

    for paragraph in text.split("\n\n") {
        let mut buf = String::new();
        let mut buf_chars = 0usize;

        for line in paragraph.split('\n') {
            let line_chars = line.chars().count();

            if buf_chars + line_chars >= max_chunk_chars {
                flush(&mut chunks, &mut buf);
                buf_chars = 0;
            }

            buf.push_str(line);
            buf.push('\n');
            buf_chars += line_chars + 1;
        }

        flush(&mut chunks, &mut buf);
    }

    chunks
}

fn flush(chunks: &mut Vec<String>, buf: &mut String) {
    let trimmed = buf.trim();
    if !trimmed.is_empty() {
        chunks.push(trimmed.to_string());
    }
    buf.clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_input_yields_no_chunks() {
        assert_eq!(segment("", DEFAULT_MAX_CHUNK_CHARS), Vec::<String>::new());
    }

    #[test]
    fn test_whitespace_only_yields_no_chunks() {
        assert_eq!(
            segment("  \n\n   \n", DEFAULT_MAX_CHUNK_CHARS),
            Vec::<String>::new()
        );
    }

    #[test]
    fn test_short_text_single_chunk() {
        let chunks = segment("Hello world", DEFAULT_MAX_CHUNK_CHARS);
        assert_eq!(chunks, vec!["Hello world".to_string()]);
    }

    #[test]
    fn test_blank_line_separates_chunks() {
        let chunks = segment("Para one.\n\nPara two.", DEFAULT_MAX_CHUNK_CHARS);
        assert_eq!(chunks, vec!["Para one.".to_string(), "Para two.".to_string()]);
    }

    #[test]
    fn test_lines_within_paragraph_accumulate() {
        let chunks = segment("line one\nline two\nline three", DEFAULT_MAX_CHUNK_CHARS);
        assert_eq!(chunks, vec!["line one\nline two\nline three".to_string()]);
    }

    #[test]
    fn test_long_paragraph_flushes_at_limit() {
        // Each line is 9 chars (+1 separator); with a 25-char bound the
        // third line would push the buffer to 30, so it starts a new chunk.
        let text = "aaaaaaaaa\nbbbbbbbbb\nccccccccc";
        let chunks = segment(text, 25);
        assert_eq!(
            chunks,
            vec!["aaaaaaaaa\nbbbbbbbbb".to_string(), "ccccccccc".to_string()]
        );
    }

    #[test]
    fn test_limit_boundary_is_exclusive() {
        // 9 + 9 + separators = exactly 20: reaching the bound flushes.
        let text = "aaaaaaaaa\nbbbbbbbbb";
        let chunks = segment(text, 19);
        assert_eq!(
            chunks,
            vec!["aaaaaaaaa".to_string(), "bbbbbbbbb".to_string()]
        );
    }

    #[test]
    fn test_char_counting_not_bytes() {
        // Five 3-byte chars per line; char-based counting keeps both lines
        // in one chunk under a 12-char bound (byte counting would split).
        let text = "데이터분석\n데이터분석";
        let chunks = segment(text, 12);
        assert_eq!(chunks.len(), 1);
    }

    #[test]
    fn test_deterministic() {
        let text = "Alpha\n\nBeta\n\nGamma one\nGamma two\n\nDelta";
        let a = segment(text, 12);
        let b = segment(text, 12);
        assert_eq!(a, b);
    }

    #[test]
    fn test_chunks_are_trimmed() {
        let chunks = segment("  padded line  \n\nnext", DEFAULT_MAX_CHUNK_CHARS);
        assert_eq!(chunks, vec!["padded line".to_string(), "next".to_string()]);
    }
}
