/// Telegram rejects messages longer than this many UTF-16 code units.
pub const TELEGRAM_MESSAGE_LIMIT: usize = 4096;

/// Message length as Telegram counts it.
pub fn telegram_len(text: &str) -> usize {
    text.encode_utf16().count()
}

/// Splits text into chunks of at most `limit` UTF-16 code units, preferring
/// to cut after a newline. Never splits inside a character.
pub fn split_message(text: &str, limit: usize) -> Vec<String> {
    let limit = limit.max(1);
    let mut chunks = Vec::new();
    let mut rest = text;

    while telegram_len(rest) > limit {
        let mut units = 0;
        let mut hard_cut = rest.len();
        for (idx, c) in rest.char_indices() {
            units += c.len_utf16();
            if units > limit {
                hard_cut = idx;
                break;
            }
        }
        // A character wider than the limit still gets its own chunk
        if hard_cut == 0 {
            hard_cut = rest.chars().next().map_or(rest.len(), char::len_utf8);
        }

        let cut = match rest[..hard_cut].rfind('\n') {
            Some(newline) if newline > 0 => newline + 1,
            _ => hard_cut,
        };

        chunks.push(rest[..cut].to_string());
        rest = &rest[cut..];
    }

    if !rest.is_empty() || chunks.is_empty() {
        chunks.push(rest.to_string());
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_is_single_chunk() {
        assert_eq!(split_message("hello", 10), vec!["hello"]);
        assert_eq!(split_message("", 10), vec![""]);
    }

    #[test]
    fn test_split_prefers_newlines() {
        let chunks = split_message("aaaa\nbbbb\ncccc", 10);
        assert_eq!(chunks, vec!["aaaa\nbbbb\n", "cccc"]);
    }

    #[test]
    fn test_split_without_newlines() {
        let chunks = split_message("abcdefghij", 4);
        assert_eq!(chunks, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_split_counts_utf16_units_not_bytes() {
        let text = "ж".repeat(10);
        let chunks = split_message(&text, 4);
        assert_eq!(chunks.len(), 3);
        assert!(chunks.iter().all(|c| telegram_len(c) <= 4));
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn test_emoji_count_as_two_units() {
        let text = "😀".repeat(10);
        assert_eq!(telegram_len(&text), 20);

        let chunks = split_message(&text, 4);
        assert_eq!(chunks.len(), 5);
        assert!(chunks.iter().all(|c| telegram_len(c) <= 4));
        assert_eq!(chunks.concat(), text);

        // Limit narrower than one emoji still makes progress
        assert_eq!(split_message("😀😀", 1), vec!["😀", "😀"]);
    }
}
