// Drawing for the two-pane viewer
use anyhow::Result;
use crossterm::{
    cursor::MoveTo,
    queue,
    style::Print,
    terminal::{Clear, ClearType},
};
use image::DynamicImage;
use std::io::{Stdout, Write};

use super::image_display;
use super::state::{display_width, fit_width, Tab, ViewerState};
use crate::config::{colors, layout, rgb_bg, rgb_fg};

/// Screen split: image on the left, text tabs on the right
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub image_width: u16,
    pub text_x: u16,
    pub text_y: u16,
    pub text_width: u16,
    pub text_height: u16,
    pub body_height: u16,
}

impl Layout {
    pub fn compute(term_width: u16, term_height: u16) -> Self {
        let image_width = (term_width as u32 * layout::IMAGE_PANE_PERCENT as u32 / 100) as u16;
        let image_width = image_width.max(layout::MIN_IMAGE_PANE_WIDTH).min(term_width / 2);
        let text_x = image_width + 2; // divider plus one column of padding
        let body_height = term_height.saturating_sub(1 + layout::STATUS_BAR_HEIGHT);
        Self {
            image_width,
            text_x,
            text_y: 1 + layout::TAB_BAR_HEIGHT,
            text_width: term_width.saturating_sub(text_x + 1),
            text_height: body_height.saturating_sub(layout::TAB_BAR_HEIGHT),
            body_height,
        }
    }
}

pub fn draw(
    stdout: &mut Stdout,
    state: &mut ViewerState,
    image: Option<&DynamicImage>,
    term_size: (u16, u16),
) -> Result<()> {
    let (term_width, term_height) = term_size;
    let layout = Layout::compute(term_width, term_height);
    state.view_size = (layout.text_width as usize, layout.text_height as usize);

    image_display::clear_graphics()?;
    queue!(stdout, Clear(ClearType::All))?;

    // Title bar
    let title = match &state.image_path {
        Some(path) => format!(" OCR & Translate - {}", path.display()),
        None => " OCR & Translate".to_string(),
    };
    let title = fit_width(&title, term_width as usize);
    let (bg, fg) = (colors::ACCENT_BG, colors::ACCENT_FG);
    queue!(
        stdout,
        MoveTo(0, 0),
        Print(format!(
            "{}{}\x1b[1m{}{}\x1b[0m",
            rgb_bg(bg.0, bg.1, bg.2),
            rgb_fg(fg.0, fg.1, fg.2),
            title,
            " ".repeat((term_width as usize).saturating_sub(display_width(&title)))
        ))
    )?;

    // Divider between image and text
    let divider = colors::DIVIDER_FG;
    for row in 1..=layout.body_height {
        queue!(
            stdout,
            MoveTo(layout.image_width, row),
            Print(format!("{}│\x1b[0m", rgb_fg(divider.0, divider.1, divider.2)))
        )?;
    }

    if image.is_none() {
        queue!(stdout, MoveTo(1, 2), Print("No image selected"))?;
    }

    draw_tab_bar(stdout, state, &layout)?;

    let pane = state.active_pane();
    for (i, line) in pane
        .visible_lines(layout.text_width as usize, layout.text_height as usize)
        .iter()
        .enumerate()
    {
        queue!(stdout, MoveTo(layout.text_x, layout.text_y + i as u16), Print(line))?;
    }

    // Status bar with scroll position
    let total = pane.line_count(layout.text_width as usize);
    let position = if total > layout.text_height as usize {
        format!(" [{}/{}]", pane.scroll() + 1, total)
    } else {
        String::new()
    };
    let status = fit_width(&format!(" {}{}", state.status_message, position), term_width as usize);
    let dim = colors::STATUS_FG;
    queue!(
        stdout,
        MoveTo(0, term_height.saturating_sub(1)),
        Print(format!("{}{}\x1b[0m", rgb_fg(dim.0, dim.1, dim.2), status))
    )?;

    stdout.flush()?;

    if let Some(image) = image {
        if let Err(e) = image_display::display_image(
            image,
            0,
            1,
            layout.image_width.saturating_sub(1),
            layout.body_height,
        ) {
            crate::log_warn!("Image preview failed: {}", e);
        }
    }

    Ok(())
}

fn draw_tab_bar(stdout: &mut Stdout, state: &ViewerState, layout: &Layout) -> Result<()> {
    let mut x = layout.text_x;
    for tab in [Tab::Original, Tab::Translation] {
        let title = tab.title();
        let styled = if tab == state.active_tab {
            let (bg, fg) = (colors::ACCENT_BG, colors::ACCENT_FG);
            format!("{}{}\x1b[1m{}\x1b[0m", rgb_bg(bg.0, bg.1, bg.2), rgb_fg(fg.0, fg.1, fg.2), title)
        } else {
            let fg = colors::INACTIVE_TAB_FG;
            format!("{}{}\x1b[0m", rgb_fg(fg.0, fg.1, fg.2), title)
        };
        queue!(stdout, MoveTo(x, 1), Print(styled))?;
        x += display_width(title) as u16 + 1;
    }

    let rule: String = "─".repeat(layout.text_width as usize);
    let divider = colors::DIVIDER_FG;
    queue!(
        stdout,
        MoveTo(layout.text_x, 2),
        Print(format!("{}{}\x1b[0m", rgb_fg(divider.0, divider.1, divider.2), rule))
    )?;
    Ok(())
}
