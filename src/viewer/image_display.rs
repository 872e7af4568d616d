use anyhow::Result;
use viuer::{Config, print};
use std::io::{self, Write};

/// Display the source image using viuer inside the given cell rectangle.
///
/// viuer picks the Kitty or iTerm protocol when the terminal supports one
/// and falls back to half-block characters otherwise.
pub fn display_image(
    image: &image::DynamicImage,
    x: u16,
    y: u16,
    max_width: u16,
    max_height: u16,
) -> Result<()> {
    if max_width == 0 || max_height == 0 {
        return Ok(());
    }

    // Save cursor position so the text panes are not disturbed
    print!("\x1b[s");
    io::stdout().flush()?;

    let config = Config {
        transparent: true,
        absolute_offset: true,
        x,
        y: y as i16,
        // Don't restore cursor - we handle that manually
        restore_cursor: false,
        // viuer keeps the aspect ratio inside these bounds
        width: Some(max_width as u32),
        height: Some(max_height as u32),
        truecolor: true,
        use_kitty: true,
        use_iterm: true,
        ..Default::default()
    };

    // Convert to image 0.24 for viuer compatibility
    let rgba = image.to_rgba8();
    let (width, height) = (rgba.width(), rgba.height());
    let old_image = image_0_24::ImageBuffer::from_raw(width, height, rgba.into_raw())
        .ok_or_else(|| anyhow::anyhow!("Failed to create image buffer"))?;
    let old_dynamic = image_0_24::DynamicImage::ImageRgba8(old_image);

    // Some terminals make viuer panic on unexpected replies
    let print_result = std::panic::catch_unwind(|| {
        print(&old_dynamic, &config)
    });

    match print_result {
        Ok(Ok(_)) => {},
        Ok(Err(e)) => return Err(anyhow::anyhow!("Viuer display error: {}", e)),
        Err(_) => return Err(anyhow::anyhow!("Viuer display panicked")),
    }

    print!("\x1b[u");
    io::stdout().flush()?;

    Ok(())
}

/// Clear any displayed graphics
///
/// Viuer has no clear call, so send the protocol-specific delete sequences
/// and clear the screen for the block fallback.
pub fn clear_graphics() -> Result<()> {
    let term_program = std::env::var("TERM_PROGRAM").unwrap_or_default();

    if std::env::var("KITTY_WINDOW_ID").is_ok() || term_program == "ghostty" {
        print!("\x1b_Ga=d\x1b\\");
    }

    if term_program == "iTerm.app" {
        print!("\x1b]1337;File=inline=0:\x07");
    }

    print!("\x1b[2J");
    io::stdout().flush()?;

    Ok(())
}
