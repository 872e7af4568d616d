// Filter out ANSI escape sequences and control characters before OCR or
// translated text is printed to the terminal

/// Check if a character may be printed as part of recognized text
pub fn is_allowed_char(c: char) -> bool {
    match c {
        // Layout characters the viewer handles itself
        '\n' | '\t' => true,

        // Allow Unicode printable characters (non-control)
        ch if !ch.is_control() => true,

        // Block everything else (including ESC, CR, form feed)
        _ => false,
    }
}

/// Strip ANSI escape sequences from a string
pub fn strip_ansi_codes(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\x1B' {
            result.push(c);
            continue;
        }
        match chars.peek() {
            Some('[') => {
                // CSI sequence - ends with a letter
                chars.next();
                for c in chars.by_ref() {
                    if c.is_ascii_alphabetic() {
                        break;
                    }
                }
            }
            Some(']') => {
                // OSC sequence - ends with BEL or ST (ESC \)
                chars.next();
                while let Some(c) = chars.next() {
                    if c == '\x07' {
                        break;
                    }
                    if c == '\x1B' && chars.peek() == Some(&'\\') {
                        chars.next();
                        break;
                    }
                }
            }
            Some(_) => {
                // Other escape sequences - usually single character
                chars.next();
            }
            None => {}
        }
    }

    result
}

/// Clean text for display in the viewer
pub fn clean_text_for_display(text: &str) -> String {
    strip_ansi_codes(text)
        .chars()
        .filter(|c| is_allowed_char(*c))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_ansi_codes() {
        assert_eq!(strip_ansi_codes("Hello\x1B[31mRed\x1B[0mWorld"), "HelloRedWorld");
        assert_eq!(strip_ansi_codes("\x1B[2J\x1B[H"), "");
        assert_eq!(strip_ansi_codes("\x1B]0;title\x07text"), "text");
        assert_eq!(strip_ansi_codes("Normal text"), "Normal text");
    }

    #[test]
    fn test_allowed_chars() {
        assert!(is_allowed_char('a'));
        assert!(is_allowed_char('ệ'));
        assert!(is_allowed_char(' '));
        assert!(is_allowed_char('\n'));
        assert!(is_allowed_char('\t'));
        assert!(!is_allowed_char('\x1B'));  // ESC
        assert!(!is_allowed_char('\x00'));  // NULL
        assert!(!is_allowed_char('\x0C'));  // Form feed from tesseract
    }

    #[test]
    fn test_clean_text_for_display() {
        assert_eq!(clean_text_for_display("Xin chào\x0c\r\n\x1B[1mbold"), "Xin chào\nbold");
    }
}
