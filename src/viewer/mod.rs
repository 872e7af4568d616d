// Terminal viewer: image on the left, OCR and translation tabs on the right
pub mod image_display;
pub mod picker;
pub mod render;
pub mod state;

use anyhow::Result;
use crossterm::{
    cursor,
    event::{self, Event},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use image::DynamicImage;
use std::io::{self, Stdout};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::config::layout;
use crate::ocr::Recognizer;
use crate::pipeline::Pipeline;
use crate::translate::Translator;

pub use state::{Action, Tab, TextPane, ViewerState};

struct Viewer<'a, R, T> {
    pipeline: &'a Pipeline<R, T>,
    state: ViewerState,
    image: Option<DynamicImage>,
    stdout: Stdout,
}

/// Run the viewer until the user quits, optionally starting on `initial`.
pub async fn run<R, T>(
    pipeline: &Pipeline<R, T>,
    initial: Option<PathBuf>,
) -> Result<()>
where
    R: Recognizer + Clone + Send + 'static,
    T: Translator,
{
    setup_terminal()?;
    let mut viewer = Viewer {
        pipeline,
        state: ViewerState::new(),
        image: None,
        stdout: io::stdout(),
    };
    let result = viewer.event_loop(initial).await;
    restore_terminal()?;
    result
}

fn setup_terminal() -> Result<()> {
    terminal::enable_raw_mode()?;
    execute!(io::stdout(), EnterAlternateScreen, cursor::Hide)?;
    Ok(())
}

fn restore_terminal() -> Result<()> {
    image_display::clear_graphics()?;
    execute!(io::stdout(), cursor::Show, LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    Ok(())
}

impl<R, T> Viewer<'_, R, T>
where
    R: Recognizer + Clone + Send + 'static,
    T: Translator,
{
    async fn event_loop(&mut self, initial: Option<PathBuf>) -> Result<()> {
        let mut last_size = (0, 0);

        if let Some(path) = initial {
            if self.process(&path).await? == Action::Quit {
                return Ok(());
            }
        }

        loop {
            let size = terminal::size()?;
            if size != last_size {
                self.state.needs_redraw = true;
                last_size = size;
            }

            if self.state.needs_redraw {
                self.redraw()?;
            }

            if !event::poll(Duration::from_millis(layout::FRAME_TIME_MS))? {
                continue;
            }

            match event::read()? {
                Event::Key(key) => match self.state.handle_key(key) {
                    Action::Quit => break,
                    Action::OpenPicker => {
                        let root = self.pipeline.settings().picker_root();
                        self.state.needs_redraw = true;
                        match picker::pick_image_file(&root) {
                            Ok(Some(path)) => {
                                if self.process(&path).await? == Action::Quit {
                                    break;
                                }
                            }
                            Ok(None) => {}
                            Err(err) => {
                                crate::log_error!("Image picker failed: {:#}", err);
                                self.state.show_picker_failure(&err);
                            }
                        }
                    }
                    Action::Redraw | Action::None => {}
                },
                Event::Resize(_, _) => self.state.needs_redraw = true,
                _ => {}
            }
        }

        Ok(())
    }

    fn redraw(&mut self) -> Result<()> {
        let size = terminal::size()?;
        render::draw(&mut self.stdout, &mut self.state, self.image.as_ref(), size)?;
        self.state.needs_redraw = false;
        Ok(())
    }

    /// Keep handling keys and resizes until `task` completes.
    /// Returns `None` when the user quits first.
    async fn wait_for<O>(&mut self, task: JoinHandle<O>) -> Result<Option<O>> {
        while !task.is_finished() {
            if self.state.needs_redraw {
                self.redraw()?;
            }
            if !event::poll(Duration::from_millis(layout::FRAME_TIME_MS))? {
                continue;
            }
            match event::read()? {
                Event::Key(key) => {
                    if self.state.handle_key(key) == Action::Quit {
                        task.abort();
                        return Ok(None);
                    }
                }
                Event::Resize(_, _) => self.state.needs_redraw = true,
                _ => {}
            }
        }
        Ok(Some(task.await?))
    }

    /// Run the pipeline step by step so each stage shows up on screen.
    /// Returns [`Action::Quit`] when the user quit while OCR was running.
    async fn process(&mut self, path: &Path) -> Result<Action> {
        self.state.begin_processing(path);
        self.image = None;
        self.redraw()?;

        let image = match self.pipeline.open_image(path) {
            Ok(image) => image,
            Err(err) => {
                self.state.show_ocr_failure(&err);
                self.redraw()?;
                return Ok(Action::Redraw);
            }
        };
        self.image = Some(image.clone());
        self.redraw()?;

        let task = self.pipeline.spawn_extract(image);
        let Some(extracted) = self.wait_for(task).await? else {
            return Ok(Action::Quit);
        };
        let original = match extracted {
            Ok(text) => text,
            Err(err) => {
                self.state.show_ocr_failure(&err);
                self.redraw()?;
                return Ok(Action::Redraw);
            }
        };
        self.state.show_original(&original);
        self.redraw()?;

        if self.pipeline.settings().translate {
            let translation = self.pipeline.translate_text(&original).await;
            self.state.show_translation(translation);
        } else {
            self.state.show_translation_disabled();
        }
        self.redraw()?;
        Ok(Action::Redraw)
    }
}
