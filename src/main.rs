// ocr-translate - pick an image, OCR it, reflow the text and translate it
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use ocr_translate::config::{self, EngineKind, Settings};
use ocr_translate::ocr::{Engine, TesseractEngine};
use ocr_translate::translate::GoogleTranslator;
use ocr_translate::{log_debug, reconstruct, viewer, Pipeline};

#[derive(Parser, Debug)]
#[command(name = "ocr-translate", version, about = "Extract text from images and translate it")]
struct Cli {
    #[command(flatten)]
    options: GlobalOptions,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args, Debug)]
struct GlobalOptions {
    /// Path to the tesseract binary (auto-detected when omitted)
    #[arg(long, global = true, env = config::env::TESSERACT)]
    tesseract: Option<PathBuf>,

    /// OCR language code(s) understood by tesseract, e.g. "eng" or "eng+vie"
    #[arg(long, global = true, env = config::env::LANG, default_value = config::ocr::DEFAULT_LANGUAGE)]
    lang: String,

    /// Source language for translation
    #[arg(long, global = true, default_value = config::translate::DEFAULT_SOURCE)]
    source: String,

    /// Target language for translation
    #[arg(long, global = true, env = config::env::TARGET, default_value = config::translate::DEFAULT_TARGET)]
    target: String,

    /// Recognition engine
    #[arg(long, global = true, value_enum, default_value_t = EngineKind::Tesseract)]
    engine: EngineKind,

    /// Keep light-on-dark images as they are
    #[arg(long, global = true)]
    no_invert: bool,

    /// Only run OCR
    #[arg(long, global = true)]
    no_translate: bool,

    /// Translation request timeout
    #[arg(long, global = true, default_value_t = config::translate::TIMEOUT_SECS)]
    timeout_secs: u64,

    /// Directory searched by the image picker
    #[arg(long, global = true)]
    picker_root: Option<PathBuf>,
}

impl GlobalOptions {
    fn into_settings(self) -> Settings {
        Settings {
            engine: self.engine,
            tesseract_path: self.tesseract,
            ocr_language: self.lang,
            source_language: self.source,
            target_language: self.target,
            translate: !self.no_translate,
            auto_invert: !self.no_invert,
            timeout_secs: self.timeout_secs,
            picker_root: self.picker_root,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Interactive viewer (default)
    View {
        /// Image to open right away
        image: Option<PathBuf>,
    },
    /// OCR and translate one image, print the result
    Run {
        image: PathBuf,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Reflow text from a file or stdin into sentence-aligned lines
    Reformat {
        file: Option<PathBuf>,
    },
    /// List the languages installed for tesseract
    Langs,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let settings = cli.options.into_settings();
    log_debug!("Starting with {:?}", settings);

    match cli.command.unwrap_or(Commands::View { image: None }) {
        Commands::View { image } => {
            let pipeline = build_pipeline(settings).await?;
            viewer::run(&pipeline, image).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Run { image, json } => {
            let pipeline = build_pipeline(settings).await?;
            run_once(&pipeline, image, json).await
        }
        Commands::Reformat { file } => {
            let text = match file {
                Some(path) => std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read {}", path.display()))?,
                None => {
                    let mut text = String::new();
                    std::io::stdin().read_to_string(&mut text).context("Failed to read stdin")?;
                    text
                }
            };
            println!("{}", reconstruct(&text));
            Ok(ExitCode::SUCCESS)
        }
        Commands::Langs => {
            let engine = TesseractEngine::from_settings(&settings);
            for lang in engine.list_languages()? {
                println!("{}", lang);
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// The engine is shared so the viewer can run OCR off the UI task.
type AppPipeline = Pipeline<Arc<Engine>, GoogleTranslator>;

async fn build_pipeline(settings: Settings) -> Result<AppPipeline> {
    let engine = Arc::new(Engine::from_settings(&settings).await?);
    let translator = GoogleTranslator::from_settings(&settings)?;
    Ok(Pipeline::new(engine, translator, settings))
}

async fn run_once(
    pipeline: &AppPipeline,
    image: PathBuf,
    json: bool,
) -> Result<ExitCode> {
    let output = match pipeline.run(&image).await {
        Ok(output) => output,
        Err(err) => {
            eprintln!("{}", err.user_message());
            return Ok(ExitCode::FAILURE);
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(ExitCode::SUCCESS);
    }

    println!("== Original (OCR) ==\n{}", output.original);
    match output.translation {
        Some(Ok(text)) => println!("\n== Translation ({}) ==\n{}", pipeline.settings().target_language, text),
        Some(Err(err)) => eprintln!("\n{}", err.user_message()),
        None => {}
    }
    Ok(ExitCode::SUCCESS)
}
