mod clipboard;
mod config;
mod terminal;

use std::{path::PathBuf, process::ExitCode, sync::Arc};

use anyhow::{bail, Result};
use clap::Parser;
use client_core::{
    GenerationCoordinator, HttpQrApi, Presenter, QrApi, ShareAction, ShareOutcome, StepNavigator,
};
use shared::domain::{
    ErrorCorrectionLevel, GenerationRequest, ImageFilter, ModuleShape, StylingOptions, Version,
};
use tokio::{
    io::{AsyncBufReadExt, BufReader, Lines, Stdin},
    sync::mpsc::{self, UnboundedReceiver},
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{
    clipboard::SystemClipboard,
    terminal::{CliSignal, TerminalPresenter},
};

#[derive(Parser, Debug)]
#[command(name = "qrgen", about = "Generate styled QR codes through a qrgen server")]
struct Args {
    /// Text or URL to encode.
    content: String,
    /// Overrides `server_url` from qrgen.toml and the environment.
    #[arg(long)]
    server_url: Option<String>,
    #[arg(long, default_value = "L")]
    ecl: ErrorCorrectionLevel,
    /// 1-40, or `auto`.
    #[arg(long, default_value = "auto")]
    version: Version,
    #[arg(long, default_value_t = 3)]
    unit_size: u8,
    #[arg(long, default_value_t = 4)]
    margin: u8,
    #[arg(long, default_value_t = 4)]
    border_size: u8,
    #[arg(long)]
    no_frame: bool,
    #[arg(long, default_value = "black")]
    fg_color: String,
    #[arg(long, default_value = "white")]
    bg_color: String,
    #[arg(long, default_value = "square")]
    module_shape: ModuleShape,
    #[arg(long, default_value = "none")]
    filter: ImageFilter,
    /// Display size in pixels.
    #[arg(long, default_value_t = 300)]
    size: u32,
    /// Page through the encoder's construction steps afterwards.
    #[arg(long)]
    steps: bool,
    /// Copy an absolute link to the generated image.
    #[arg(long)]
    share: bool,
    /// Save the generated image (and step frames) here.
    #[arg(long, short)]
    output: Option<PathBuf>,
}

impl Args {
    fn request(&self) -> GenerationRequest {
        GenerationRequest {
            content: self.content.clone(),
            ecl: self.ecl,
            version: self.version,
            styling: StylingOptions {
                unit_size: self.unit_size,
                margin: self.margin,
                border_size: self.border_size,
                frame: !self.no_frame,
                foreground_color: self.fg_color.clone(),
                background_color: self.bg_color.clone(),
                module_shape: self.module_shape,
                filter_name: self.filter,
            },
            size: self.size,
            show_steps: self.steps,
        }
    }
}

struct Input {
    lines: Lines<BufReader<Stdin>>,
    open: bool,
}

impl Input {
    fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
            open: true,
        }
    }

    async fn next_line(&mut self) -> Option<String> {
        match self.lines.next_line().await {
            Ok(Some(line)) => Some(line),
            _ => {
                self.open = false;
                None
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = config::load_settings()?;
    if let Some(url) = &args.server_url {
        settings.server_url = url.clone();
    }
    let request = args.request();
    request.validate()?;

    let api: Arc<dyn QrApi> = Arc::new(HttpQrApi::new(
        &settings.server_url,
        settings.request_timeout(),
    )?);
    let (tx, mut signals) = mpsc::unbounded_channel();
    let terminal = Arc::new(TerminalPresenter::new(tx, args.output.clone()));
    let presenter: Arc<dyn Presenter> = terminal.clone();
    let navigator = StepNavigator::new(api.clone(), presenter.clone());
    let coordinator = GenerationCoordinator::new(
        api,
        presenter.clone(),
        navigator.clone(),
        settings.coordinator_config(),
    );
    info!(server_url = %settings.server_url, "qrgen starting");

    let mut input = Input::new();
    coordinator.submit(request).await;

    let success = loop {
        tokio::select! {
            signal = signals.recv() => match signal {
                Some(CliSignal::Resolved { success }) => break success,
                Some(_) => {}
                None => bail!("presenter channel closed"),
            },
            line = input.next_line(), if input.open => {
                if line.is_some() {
                    coordinator.dismiss_reveal().await;
                }
            }
        }
    };
    if !success {
        return Ok(ExitCode::FAILURE);
    }

    if args.share {
        if let Some(artifact) = coordinator.current_artifact().await {
            let action = ShareAction::new(
                settings.server_url.clone(),
                None,
                Arc::new(SystemClipboard),
                presenter.clone(),
            );
            if let ShareOutcome::Failed(failure) = action.share(&artifact).await {
                eprintln!("{failure}");
            }
        }
    }

    if args.steps && wait_for_steps(&mut signals).await {
        browse_steps(&navigator, &mut input).await;
    }

    terminal.flush().await;
    Ok(ExitCode::SUCCESS)
}

async fn wait_for_steps(signals: &mut UnboundedReceiver<CliSignal>) -> bool {
    while let Some(signal) = signals.recv().await {
        match signal {
            CliSignal::StepsReady => return true,
            CliSignal::StepsFailed => return false,
            CliSignal::Resolved { .. } => {}
        }
    }
    false
}

async fn browse_steps(navigator: &StepNavigator, input: &mut Input) {
    while input.open {
        let Some(line) = input.next_line().await else {
            break;
        };
        match line.trim() {
            "" | "n" => {
                navigator.next().await;
            }
            "p" => {
                navigator.previous().await;
            }
            "q" => break,
            other => match other.parse::<i64>() {
                Ok(number) => {
                    navigator.show(number - 1).await;
                }
                Err(_) => eprintln!("unknown command '{other}'"),
            },
        }
    }
    navigator.close().await;
}
