// Line reconstruction for OCR and translation output
//
// Recognizers and translators wrap text at arbitrary widths. A line break is
// kept only where a sentence ends and more text follows; everything else is
// merged back into one line.

/// Characters treated as the end of a sentence.
pub const TERMINAL_PUNCTUATION: [char; 3] = ['.', '!', '?'];

/// Reformat a raw text block so line breaks follow sentence boundaries.
///
/// Empty and all-blank input yields an empty string.
pub fn reconstruct(text: &str) -> String {
    reconstruct_lines(text).join("\n")
}

/// Same as [`reconstruct`], but returns the output lines before joining.
/// Empty strings in the result are paragraph markers.
pub fn reconstruct_lines(text: &str) -> Vec<String> {
    let raw: Vec<&str> = text.split('\n').map(str::trim_end).collect();

    // Blank lines at the edges of the block are noise, not paragraph markers
    let Some(first) = raw.iter().position(|line| !line.is_empty()) else {
        return Vec::new();
    };
    let last = raw.iter().rposition(|line| !line.is_empty()).unwrap_or(first);
    let lines = &raw[first..=last];

    let mut output = Vec::new();
    let mut i = 0;
    while i < lines.len() {
        if lines[i].is_empty() {
            output.push(String::new());
            i += 1;
            continue;
        }

        let mut buffer = lines[i].to_string();
        i += 1;
        while !ends_sentence(&buffer) && i < lines.len() {
            // An unfinished sentence swallows blank lines too
            if !lines[i].is_empty() {
                buffer.push(' ');
                buffer.push_str(lines[i]);
            }
            i += 1;
        }
        output.push(buffer);
    }

    let mut output: Vec<String> = output.iter().map(|line| collapse_spaces(line)).collect();
    if let Some(head) = output.first_mut() {
        *head = head.trim_start().to_string();
    }
    output
}

/// True when the line ends with `.`, `!` or `?`.
pub fn ends_sentence(line: &str) -> bool {
    line.ends_with(&TERMINAL_PUNCTUATION[..])
}

/// Collapse runs of spaces into one. Tabs and other whitespace are left alone.
fn collapse_spaces(line: &str) -> String {
    let mut result = String::with_capacity(line.len());
    let mut previous_space = false;
    for c in line.chars() {
        if c == ' ' {
            if previous_space {
                continue;
            }
            previous_space = true;
        } else {
            previous_space = false;
        }
        result.push(c);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert_eq!(reconstruct(""), "");
        assert_eq!(reconstruct("\n\n\n"), "");
        assert_eq!(reconstruct("   \n \t \n"), "");
    }

    #[test]
    fn test_single_sentence_passes_through() {
        assert_eq!(reconstruct("Hello world."), "Hello world.");
        assert_eq!(reconstruct("no punctuation here"), "no punctuation here");
    }

    #[test]
    fn test_mid_sentence_wrap_is_merged() {
        assert_eq!(reconstruct("Hello\nworld."), "Hello world.");
        assert_eq!(
            reconstruct("The quick brown\nfox jumps over\nthe lazy dog!"),
            "The quick brown fox jumps over the lazy dog!"
        );
    }

    #[test]
    fn test_sentence_boundary_keeps_break() {
        assert_eq!(
            reconstruct("Hello world.\nNext sentence."),
            "Hello world.\nNext sentence."
        );
        assert_eq!(reconstruct("Really?\nYes!\nOk."), "Really?\nYes!\nOk.");
    }

    #[test]
    fn test_paragraph_marker_kept() {
        assert_eq!(
            reconstruct("Hello world.\n\nNext paragraph."),
            "Hello world.\n\nNext paragraph."
        );
        assert_eq!(reconstruct("One.\n\n\nTwo."), "One.\n\n\nTwo.");
    }

    #[test]
    fn test_unfinished_sentence_merges_across_blank_line() {
        assert_eq!(reconstruct("Hello\n\nworld."), "Hello world.");
    }

    #[test]
    fn test_spaces_collapsed_and_edges_trimmed() {
        assert_eq!(reconstruct("  Hi   there  "), "Hi there");
        assert_eq!(reconstruct("a  b\n   c."), "a b c.");
        assert_eq!(reconstruct("tab\tstays."), "tab\tstays.");
    }

    #[test]
    fn test_indent_after_first_line_collapses_to_one_space() {
        // Only the start of the block is trimmed; later indents shrink to one space
        assert_eq!(reconstruct("A.\n\n   B."), "A.\n\n B.");
        assert_eq!(reconstruct("A.\n\t  B."), "A.\n\t B.");
        assert_eq!(reconstruct(&reconstruct("A.\n\n   B.")), "A.\n\n B.");
    }

    #[test]
    fn test_crlf_and_form_feed() {
        assert_eq!(reconstruct("Hello\r\nworld.\r\n\x0c"), "Hello world.");
    }

    #[test]
    fn test_trailing_fragment_kept() {
        assert_eq!(
            reconstruct("Done.\nand then some\ntrailing words"),
            "Done.\nand then some trailing words"
        );
    }

    #[test]
    fn test_abbreviation_splits() {
        // Known limitation of a punctuation-only heuristic
        assert_eq!(reconstruct("Ask Mr.\nSmith about it."), "Ask Mr.\nSmith about it.");
    }

    #[test]
    fn test_reconstruct_lines_markers() {
        assert_eq!(
            reconstruct_lines("A.\n\nB\nc."),
            vec!["A.".to_string(), String::new(), "B c.".to_string()]
        );
    }
}
