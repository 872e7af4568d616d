use ocr_translate::reconstruct::{ends_sentence, reconstruct, reconstruct_lines};

const CORPUS: &[&str] = &[
    "",
    "\n\n\n",
    "Hello world.",
    "Hello\nworld.",
    "Hello world.\nNext sentence.",
    "Hello world.\n\nNext paragraph.",
    "  Hi   there  ",
    "The invoice total\nis due within\n30 days. Late\npayments incur\na fee!\n\nQuestions?\nCall us\n",
    "\n\n  Indented start\nof a paragraph.\n   \n\nSecond  paragraph with   gaps\nstill going\n",
    "Ask Mr.\nSmith.\nVersion 2.\n5 shipped?",
    "no terminal punctuation anywhere\njust wrapped\nlines",
    "One.\n\n\n\nTwo.\n",
    "Trailing spaces.   \nAnd tabs\t\nhere.",
    "Xin chào.\nĐây là\nmột câu.",
];

#[test]
fn test_documented_examples() {
    assert_eq!(reconstruct(""), "");
    assert_eq!(reconstruct("Hello world."), "Hello world.");
    assert_eq!(reconstruct("Hello\nworld."), "Hello world.");
    assert_eq!(reconstruct("Hello world.\nNext sentence."), "Hello world.\nNext sentence.");
    assert_eq!(reconstruct("Hello world.\n\nNext paragraph."), "Hello world.\n\nNext paragraph.");
    assert_eq!(reconstruct("  Hi   there  "), "Hi there");
    assert_eq!(reconstruct("\n\n\n"), "");
}

#[test]
fn test_idempotent_over_corpus() {
    for input in CORPUS {
        let once = reconstruct(input);
        assert_eq!(reconstruct(&once), once, "not idempotent for {:?}", input);
    }
}

#[test]
fn test_only_last_line_may_lack_terminal_punctuation() {
    for input in CORPUS {
        let lines = reconstruct_lines(input);
        let Some((_, body)) = lines.split_last() else { continue };
        for line in body.iter().filter(|l| !l.is_empty()) {
            assert!(ends_sentence(line), "{:?} from {:?}", line, input);
        }
    }
}

#[test]
fn test_no_edge_blank_lines_or_double_spaces() {
    for input in CORPUS {
        let lines = reconstruct_lines(input);
        if let (Some(first), Some(last)) = (lines.first(), lines.last()) {
            assert!(!first.is_empty() && !last.is_empty(), "{:?}", input);
        }
        assert!(lines.iter().all(|l| !l.contains("  ")), "{:?}", input);
    }
}

#[test]
fn test_longer_document() {
    let raw = "The invoice total\nis due within\n30 days. Late\npayments incur\na fee!\n\nQuestions?\nCall us\n";
    assert_eq!(
        reconstruct(raw),
        "The invoice total is due within 30 days. Late payments incur a fee!\n\nQuestions?\nCall us"
    );
}

#[test]
fn test_decimal_at_line_end_splits() {
    assert_eq!(reconstruct("Version 2.\n5 shipped?"), "Version 2.\n5 shipped?");
}
