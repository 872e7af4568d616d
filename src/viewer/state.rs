// Viewer state: tabs, read-only text panes and key handling
use std::path::{Path, PathBuf};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use unicode_width::UnicodeWidthChar;

use crate::error::PipelineError;
use crate::sanitize::clean_text_for_display;

pub const PLACEHOLDER_ORIGINAL: &str = "No image selected. Press 'o' to choose an image.";
pub const RUNNING_OCR: &str = "Running OCR...";
pub const TRANSLATING: &str = "Translating...";
pub const TRANSLATION_DISABLED: &str = "Translation is switched off (--no-translate).";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Original,
    Translation,
}

impl Tab {
    pub fn title(self) -> &'static str {
        match self {
            Tab::Original => " Original (OCR) ",
            Tab::Translation => " Translation ",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            Tab::Original => Tab::Translation,
            Tab::Translation => Tab::Original,
        }
    }
}

/// What the event loop should do after a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    Redraw,
    OpenPicker,
    Quit,
}

/// A read-only, word-wrapped, scrollable block of text
#[derive(Debug, Default)]
pub struct TextPane {
    text: String,
    scroll: usize,
}

impl TextPane {
    pub fn new(text: &str) -> Self {
        let mut pane = Self::default();
        pane.set_text(text);
        pane
    }

    pub fn set_text(&mut self, text: &str) {
        self.text = clean_text_for_display(text).replace('\t', "    ");
        self.scroll = 0;
    }

    pub fn clear(&mut self) {
        self.set_text("");
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    pub fn line_count(&self, width: usize) -> usize {
        wrap_text(&self.text, width).len()
    }

    /// Move by `delta` lines, staying within the wrapped text.
    pub fn scroll_by(&mut self, delta: isize, width: usize, height: usize) {
        let max = self.max_scroll(width, height);
        let target = self.scroll as isize + delta;
        self.scroll = target.clamp(0, max as isize) as usize;
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll = 0;
    }

    pub fn scroll_to_end(&mut self, width: usize, height: usize) {
        self.scroll = self.max_scroll(width, height);
    }

    fn max_scroll(&self, width: usize, height: usize) -> usize {
        self.line_count(width).saturating_sub(height)
    }

    /// Lines that fit in a `width` x `height` viewport at the current scroll.
    pub fn visible_lines(&self, width: usize, height: usize) -> Vec<String> {
        let lines = wrap_text(&self.text, width);
        let start = self.scroll.min(lines.len().saturating_sub(height));
        lines.into_iter().skip(start).take(height).collect()
    }
}

/// Terminal columns taken by `c`. CJK and other wide glyphs take two.
fn char_width(c: char) -> usize {
    c.width().unwrap_or(1)
}

/// Terminal columns taken by `text`.
pub fn display_width(text: &str) -> usize {
    text.chars().map(char_width).sum()
}

/// Longest prefix of `text` that fits in `max_width` columns.
pub fn fit_width(text: &str, max_width: usize) -> String {
    let mut used = 0;
    text.chars()
        .take_while(|&c| {
            used += char_width(c);
            used <= max_width
        })
        .collect()
}

/// Word-wrap text to `width` terminal columns. Words longer than a line are
/// broken. Empty lines are kept as paragraph gaps.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();

    for raw in text.split('\n') {
        let mut current = String::new();
        let mut used = 0;

        for word in raw.split(' ') {
            if used > 0 && used + 1 + display_width(word) > width {
                lines.push(std::mem::take(&mut current));
                used = 0;
            }
            if used > 0 {
                current.push(' ');
                used += 1;
            }
            for c in word.chars() {
                let w = char_width(c);
                if used > 0 && used + w > width {
                    lines.push(std::mem::take(&mut current));
                    used = 0;
                }
                current.push(c);
                used += w;
            }
        }
        lines.push(current);
    }

    lines
}

pub struct ViewerState {
    pub active_tab: Tab,
    pub original: TextPane,
    pub translation: TextPane,
    pub image_path: Option<PathBuf>,
    pub status_message: String,
    /// Text viewport size from the last draw, used for scrolling
    pub view_size: (usize, usize),
    pub needs_redraw: bool,
}

impl Default for ViewerState {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewerState {
    pub fn new() -> Self {
        Self {
            active_tab: Tab::Original,
            original: TextPane::new(PLACEHOLDER_ORIGINAL),
            translation: TextPane::default(),
            image_path: None,
            status_message: "o: Open image | Tab: Switch tab | ↑/↓ PgUp/PgDn: Scroll | q: Quit".to_string(),
            view_size: (80, 20),
            needs_redraw: true,
        }
    }

    pub fn active_pane(&self) -> &TextPane {
        match self.active_tab {
            Tab::Original => &self.original,
            Tab::Translation => &self.translation,
        }
    }

    pub fn active_pane_mut(&mut self) -> &mut TextPane {
        match self.active_tab {
            Tab::Original => &mut self.original,
            Tab::Translation => &mut self.translation,
        }
    }

    pub fn select_tab(&mut self, tab: Tab) {
        if self.active_tab != tab {
            self.active_tab = tab;
            self.needs_redraw = true;
        }
    }

    /// Show the in-progress messages for a freshly picked image.
    pub fn begin_processing(&mut self, path: &Path) {
        self.image_path = Some(path.to_path_buf());
        self.original.set_text(RUNNING_OCR);
        self.translation.set_text(TRANSLATING);
        self.active_tab = Tab::Original;
        self.status_message = format!("Processing {}", path.display());
        self.needs_redraw = true;
    }

    /// The image could not be opened or OCR produced nothing usable.
    pub fn show_ocr_failure(&mut self, err: &PipelineError) {
        if matches!(err, PipelineError::ImageOpen { .. }) {
            self.image_path = None;
        }
        self.original.set_text(&err.user_message());
        self.translation.clear();
        self.active_tab = Tab::Original;
        self.status_message = format!("Failed: {}", err.kind());
        self.needs_redraw = true;
    }

    pub fn show_original(&mut self, text: &str) {
        self.original.set_text(text);
        self.needs_redraw = true;
    }

    /// Successful translations bring their tab to the front.
    pub fn show_translation(&mut self, result: Result<String, PipelineError>) {
        match result {
            Ok(text) => {
                self.translation.set_text(&text);
                self.active_tab = Tab::Translation;
                self.status_message = "Done".to_string();
            }
            Err(err) => {
                self.translation.set_text(&err.user_message());
                self.status_message = format!("Failed: {}", err.kind());
            }
        }
        self.needs_redraw = true;
    }

    /// The picker could not list files; the session carries on.
    pub fn show_picker_failure(&mut self, err: &anyhow::Error) {
        self.status_message = format!("Image picker failed: {:#}", err);
        self.needs_redraw = true;
    }

    pub fn show_translation_disabled(&mut self) {
        self.translation.set_text(TRANSLATION_DISABLED);
        self.status_message = "Done".to_string();
        self.needs_redraw = true;
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        if key.kind != KeyEventKind::Press {
            return Action::None;
        }

        let (width, height) = self.view_size;
        let page = height.max(1) as isize;

        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return Action::Quit,
            KeyCode::Char('q') | KeyCode::Esc => return Action::Quit,
            KeyCode::Char('o') => return Action::OpenPicker,
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Left | KeyCode::Right => {
                self.active_tab = self.active_tab.toggle();
            }
            KeyCode::Char('1') => self.active_tab = Tab::Original,
            KeyCode::Char('2') => self.active_tab = Tab::Translation,
            KeyCode::Up | KeyCode::Char('k') => self.active_pane_mut().scroll_by(-1, width, height),
            KeyCode::Down | KeyCode::Char('j') => self.active_pane_mut().scroll_by(1, width, height),
            KeyCode::PageUp => self.active_pane_mut().scroll_by(-page, width, height),
            KeyCode::PageDown | KeyCode::Char(' ') => self.active_pane_mut().scroll_by(page, width, height),
            KeyCode::Home => self.active_pane_mut().scroll_to_top(),
            KeyCode::End => self.active_pane_mut().scroll_to_end(width, height),
            _ => return Action::None,
        }

        self.needs_redraw = true;
        Action::Redraw
    }
}
