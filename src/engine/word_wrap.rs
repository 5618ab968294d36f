/// Greedy line fill at `limit` characters.
///
/// Words are whitespace-delimited within a line and hard line breaks in
/// `text` are kept. A word longer than `limit` goes on its own line unsplit.
pub fn wrap_text(text: &str, limit: usize) -> String {
    let mut lines: Vec<String> = Vec::new();

    for source_line in text.lines() {
        let mut current = String::new();
        let mut current_len = 0;

        for word in source_line.split_whitespace() {
            let word_len = word.chars().count();

            if current.is_empty() {
                current.push_str(word);
                current_len = word_len;
            } else if current_len + 1 + word_len <= limit {
                current.push(' ');
                current.push_str(word);
                current_len += 1 + word_len;
            } else {
                lines.push(std::mem::take(&mut current));
                current.push_str(word);
                current_len = word_len;
            }
        }

        lines.push(current);
    }

    lines.join("\n")
}

/// Keep the first `max_words` space-delimited words.
pub fn truncate_words(text: &str, max_words: usize) -> String {
    text.split(' ').take(max_words).collect::<Vec<_>>().join(" ")
}

/// `\r\n` and lone `\r` become `\n`.
pub fn normalize_line_breaks(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_example() {
        assert_eq!(wrap_text("the quick brown fox", 10), "the quick\nbrown fox");
    }

    #[test]
    fn long_word_stands_alone() {
        let wrapped = wrap_text("a extraordinarily long word", 8);
        assert_eq!(wrapped, "a\nextraordinarily\nlong\nword");
    }

    #[test]
    fn no_line_exceeds_limit_unless_single_word() {
        let text = "Greetings traveller, the northern pass is closed until the snows melt \
                    and the innkeeper swears he saw a dragon circling the peaks";
        for limit in 1..30 {
            for line in wrap_text(text, limit).lines() {
                let len = line.chars().count();
                assert!(len <= limit || !line.contains(' '), "limit {limit}: {line:?}");
            }
        }
    }

    #[test]
    fn rewrapping_is_stable() {
        let text = "You seek the amulet? Many have tried.\nFew returned with more than stories.";
        for limit in [1, 5, 12, 20, 40] {
            let once = wrap_text(text, limit);
            assert_eq!(wrap_text(&once, limit), once);
        }
    }

    #[test]
    fn counts_characters_not_bytes() {
        assert_eq!(wrap_text("héllo wörld", 11), "héllo wörld");
    }

    #[test]
    fn empty_text() {
        assert_eq!(wrap_text("", 10), "");
    }

    #[test]
    fn truncation_keeps_first_words_in_order() {
        assert_eq!(truncate_words("one two three four", 2), "one two");
        assert_eq!(truncate_words("one two", 5), "one two");
        assert_eq!(truncate_words("one two", 0), "");

        let words: Vec<String> = (0..60).map(|i| format!("w{i}")).collect();
        let out = truncate_words(&words.join(" "), 50);
        assert_eq!(out.split(' ').count(), 50);
        assert!(out.starts_with("w0 w1 ") && out.ends_with(" w49"));
    }

    #[test]
    fn line_breaks_are_normalized() {
        assert_eq!(normalize_line_breaks("a\r\nb\rc\nd"), "a\nb\nc\nd");
    }
}
