//! Shared tokenization for the lexical retriever and reader.

/// Stop words excluded from term statistics.
const STOP_WORDS: &[&str] = &[
    "the", "be", "to", "of", "and", "a", "in", "that", "have", "i", "it", "for", "not", "on",
    "with", "he", "as", "you", "do", "at", "this", "but", "his", "by", "from", "they", "we",
    "say", "her", "she", "or", "an", "will", "my", "one", "all", "would", "there", "their",
    "what", "so", "up", "out", "if", "about", "who", "get", "which", "go", "me", "when", "make",
    "can", "like", "time", "no", "just", "him", "know", "take", "people", "into", "year", "your",
    "good", "some", "could", "them", "see", "other", "than", "then", "now", "look", "only",
    "come", "its", "over", "think", "also", "back", "after", "use", "two", "how", "our", "work",
    "first", "well", "way", "even", "new", "want", "because", "any", "these", "give", "day",
    "most", "us",
];

fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(&word)
}

/// Tokenize text into scoring terms: lowercased, punctuation stripped,
/// short tokens and stop words dropped.
pub(crate) fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(|s| s.chars().filter(|c| c.is_alphanumeric()).collect::<String>())
        .filter(|s| !s.is_empty() && s.len() > 2 && !is_stop_word(s))
        .collect()
}

/// Byte spans of sentence-like segments, split on `.`, `!`, `?`, and
/// newlines. Spans are trimmed of surrounding whitespace; the terminator
/// stays inside its span. Text without terminators yields one span.
pub(crate) fn sentence_spans(text: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut start = 0;
    for (idx, ch) in text.char_indices() {
        if matches!(ch, '.' | '!' | '?' | '\n') {
            let end = idx + ch.len_utf8();
            push_trimmed(text, start, end, &mut spans);
            start = end;
        }
    }
    push_trimmed(text, start, text.len(), &mut spans);
    spans
}

fn push_trimmed(text: &str, start: usize, end: usize, spans: &mut Vec<(usize, usize)>) {
    let segment = &text[start..end];
    let trimmed = segment.trim();
    if trimmed.is_empty() {
        return;
    }
    let lead = segment.len() - segment.trim_start().len();
    let trail = segment.len() - segment.trim_end().len();
    spans.push((start + lead, end - trail));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_drops_stop_words_and_short_tokens() {
        let terms = tokenize("The BM25 ranking, as you know, is a bag-of-words function!");
        assert_eq!(terms, vec!["bm25", "ranking", "bagofwords", "function"]);
    }

    #[test]
    fn sentence_spans_cover_trimmed_sentences() {
        let text = "First sentence. Second one!  Third";
        let spans = sentence_spans(text);
        let sentences: Vec<&str> = spans.iter().map(|&(s, e)| &text[s..e]).collect();
        assert_eq!(sentences, vec!["First sentence.", "Second one!", "Third"]);
    }

    #[test]
    fn sentence_spans_handle_multibyte_content() {
        let text = "Größe zählt. Ähm ja?";
        for (s, e) in sentence_spans(text) {
            // Slicing must not split a UTF-8 sequence.
            let _ = &text[s..e];
        }
    }

    #[test]
    fn text_without_terminator_is_one_span() {
        assert_eq!(sentence_spans("no terminator here"), vec![(0, 18)]);
    }
}
