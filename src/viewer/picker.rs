use anyhow::{Context, Result};
use crossterm::{
    cursor::MoveTo,
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};
use nucleo::{Config, Nucleo, Utf32String};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;

use super::state::{display_width, fit_width};
use crate::config::picker::{IMAGE_EXTENSIONS, MAX_VISIBLE_MATCHES};

/// Fuzzy-pick an image file under `root`.
///
/// Expects the terminal to already be in raw mode on the alternate screen.
pub fn pick_image_file(root: &Path) -> Result<Option<PathBuf>> {
    let files = find_image_files(root)?;
    crate::log_debug!("Picker found {} images under {}", files.len(), root.display());
    run_fuzzy_picker(&files, root)
}

/// Run the interactive fuzzy picker
fn run_fuzzy_picker(files: &[String], root: &Path) -> Result<Option<PathBuf>> {
    let mut stdout = io::stdout();

    let mut nucleo = Nucleo::<Arc<str>>::new(
        Config::DEFAULT,
        Arc::new(|| {}),
        None,
        1,
    );

    let injector = nucleo.injector();
    for file in files {
        let file_arc: Arc<str> = Arc::from(file.as_str());
        let _ = injector.push(file_arc, |data, cols: &mut [Utf32String]| {
            cols[0] = data.as_ref().into();
        });
    }

    let mut query = String::new();
    let mut selected_index = 0usize;

    execute!(stdout, Clear(ClearType::All))?;

    loop {
        execute!(
            stdout,
            MoveTo(0, 0),
            Clear(ClearType::CurrentLine),
            SetForegroundColor(Color::Rgb { r: 129, g: 162, b: 190 }), // Soft blue
            Print("  SELECT AN IMAGE TO EXTRACT & TRANSLATE"),
            ResetColor,
            MoveTo(0, 1),
            Clear(ClearType::CurrentLine),
            SetForegroundColor(Color::Rgb { r: 96, g: 99, b: 102 }), // Dim text
            Print(format!("  {} image(s) under {}", files.len(), root.display())),
            ResetColor,
            MoveTo(0, 3),
            Clear(ClearType::CurrentLine),
            SetForegroundColor(Color::Rgb { r: 143, g: 161, b: 179 }), // Muted cyan
            Print("  Search: "),
            SetForegroundColor(Color::Rgb { r: 197, g: 200, b: 198 }), // Primary text
            Print(&query),
            SetForegroundColor(Color::Rgb { r: 96, g: 99, b: 102 }),
            Print("_"),
            ResetColor
        )?;

        let snapshot = nucleo.snapshot();
        let matches = snapshot
            .matched_items(..)
            .take(MAX_VISIBLE_MATCHES)
            .collect::<Vec<_>>();

        let (term_width, term_height) = terminal::size().unwrap_or((80, 24));
        let max_path_width = (term_width as usize).saturating_sub(5); // "  ▶ " prefix and margin
        selected_index = selected_index.min(matches.len().saturating_sub(1));

        for i in 0..MAX_VISIBLE_MATCHES {
            let line_pos = 5 + i as u16;
            execute!(stdout, MoveTo(0, line_pos), Clear(ClearType::CurrentLine))?;

            let Some(item) = matches.get(i) else { continue };
            let display = display_path(item.data.as_ref(), root, max_path_width);

            if i == selected_index {
                execute!(
                    stdout,
                    SetForegroundColor(Color::Rgb { r: 181, g: 189, b: 104 }), // Success green
                    Print("  ▶ "),
                    SetForegroundColor(Color::Rgb { r: 197, g: 200, b: 198 }),
                    Print(&display),
                    ResetColor
                )?;
            } else {
                execute!(
                    stdout,
                    Print("    "),
                    SetForegroundColor(Color::Rgb { r: 150, g: 152, b: 150 }), // Secondary text
                    Print(&display),
                    ResetColor
                )?;
            }
        }

        if files.is_empty() {
            execute!(
                stdout,
                MoveTo(0, 5),
                Print("    No images found - set --picker-root or pass an image path"),
            )?;
        }

        let help_line = (5 + MAX_VISIBLE_MATCHES as u16 + 1).min(term_height.saturating_sub(1));
        execute!(
            stdout,
            MoveTo(0, help_line),
            Clear(ClearType::CurrentLine),
            SetForegroundColor(Color::Rgb { r: 96, g: 99, b: 102 }),
            Print("  ↑/↓ Navigate  •  Enter Select  •  Esc Cancel  •  Type to search"),
            ResetColor
        )?;

        stdout.flush()?;

        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match key.code {
                    KeyCode::Esc => return Ok(None),
                    KeyCode::Enter => {
                        if let Some(item) = matches.get(selected_index) {
                            return Ok(Some(PathBuf::from(item.data.as_ref())));
                        }
                    }
                    KeyCode::Up => {
                        selected_index = selected_index.saturating_sub(1);
                    }
                    KeyCode::Down => {
                        if selected_index + 1 < matches.len() {
                            selected_index += 1;
                        }
                    }
                    KeyCode::Backspace => {
                        query.pop();
                        selected_index = 0;
                        nucleo.pattern.reparse(
                            0,
                            &query,
                            nucleo::pattern::CaseMatching::Smart,
                            nucleo::pattern::Normalization::Smart,
                            false,
                        );
                    }
                    KeyCode::Char(c) => {
                        query.push(c);
                        selected_index = 0;
                        nucleo.pattern.reparse(
                            0,
                            &query,
                            nucleo::pattern::CaseMatching::Smart,
                            nucleo::pattern::Normalization::Smart,
                            true,
                        );
                    }
                    _ => {}
                }
            }
        }

        // Let nucleo process
        nucleo.tick(10);
    }
}

/// Find image files under `root`, preferring `fd` over `find`.
fn find_image_files(root: &Path) -> Result<Vec<String>> {
    let output = if command_exists("fd") {
        Command::new("fd").args(fd_args(root)).output().context("Failed to run fd")?
    } else {
        Command::new("find").args(find_args(root)).output().context("Failed to run find")?
    };

    if !output.status.success() {
        crate::log_warn!("Image search under {} failed", root.display());
        return Ok(Vec::new());
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    Ok(stdout
        .lines()
        .map(str::to_string)
        .filter(|s| !s.is_empty())
        .collect())
}

fn fd_args(root: &Path) -> Vec<String> {
    let mut args = vec!["-t".to_string(), "f".to_string()];
    for ext in IMAGE_EXTENSIONS {
        args.push("-e".to_string());
        args.push(ext.to_string());
    }
    args.push(".".to_string());
    args.push(root.display().to_string());
    args
}

fn find_args(root: &Path) -> Vec<String> {
    let mut args = vec![root.display().to_string(), "-type".to_string(), "f".to_string(), "(".to_string()];
    for (i, ext) in IMAGE_EXTENSIONS.iter().enumerate() {
        if i > 0 {
            args.push("-o".to_string());
        }
        args.push("-iname".to_string());
        args.push(format!("*.{}", ext));
    }
    args.push(")".to_string());
    args
}

/// Check if a command exists
fn command_exists(cmd: &str) -> bool {
    Command::new("which")
        .arg(cmd)
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

/// Path relative to the picker root, shortened to fit `max_width` columns.
fn display_path(path: &str, root: &Path, max_width: usize) -> String {
    let relative = Path::new(path)
        .strip_prefix(root)
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| path.to_string());

    if display_width(&relative) <= max_width {
        return relative;
    }

    // Try to show just the filename if it fits
    let filename = relative.rsplit('/').next().unwrap_or(&relative);
    if display_width(filename) + 4 <= max_width {
        return format!(".../{}", filename);
    }

    let keep = max_width.saturating_sub(3);
    format!("{}...", fit_width(filename, keep))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_path_strips_root() {
        let root = Path::new("/home/me/Pictures");
        assert_eq!(display_path("/home/me/Pictures/scans/page1.png", root, 80), "scans/page1.png");
        assert_eq!(display_path("/tmp/other.png", root, 80), "/tmp/other.png");
    }

    #[test]
    fn test_display_path_truncates() {
        let root = Path::new("/r");
        assert_eq!(display_path("/r/a/very/deep/folder/shot.png", root, 14), ".../shot.png");
        assert_eq!(display_path("/r/a_really_long_file_name.png", root, 10), "a_reall...");
        assert_eq!(display_path("/r/スクリーンショット.png", root, 12), "スクリー...");
    }

    #[test]
    fn test_search_args_cover_all_extensions() {
        let root = Path::new("/data");
        let fd = fd_args(root);
        assert_eq!(fd.iter().filter(|a| *a == "-e").count(), IMAGE_EXTENSIONS.len());
        assert_eq!(fd.last().map(String::as_str), Some("/data"));

        let find = find_args(root);
        assert_eq!(find[0], "/data");
        assert_eq!(find.iter().filter(|a| *a == "-iname").count(), IMAGE_EXTENSIONS.len());
        assert_eq!(find.iter().filter(|a| *a == "-o").count(), IMAGE_EXTENSIONS.len() - 1);
    }
}
