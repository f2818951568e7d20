//! Terminal rendering of coordinator and navigator output.

use std::{
    fs, mem,
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};

use anyhow::{anyhow, Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use client_core::{Artifact, Presenter, StepView};
use shared::domain::CycleToken;
use tokio::{sync::mpsc::UnboundedSender, task::JoinHandle};
use tracing::{debug, error};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliSignal {
    Resolved { success: bool },
    StepsReady,
    StepsFailed,
}

pub struct TerminalPresenter {
    signals: UnboundedSender<CliSignal>,
    output: Option<PathBuf>,
    pending_writes: Mutex<Vec<JoinHandle<()>>>,
}

impl TerminalPresenter {
    pub fn new(signals: UnboundedSender<CliSignal>, output: Option<PathBuf>) -> Self {
        Self {
            signals,
            output,
            pending_writes: Mutex::new(Vec::new()),
        }
    }

    /// Waits for every queued image write to land on disk.
    pub async fn flush(&self) {
        let pending = mem::take(
            &mut *self
                .pending_writes
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        );
        for handle in pending {
            if let Err(err) = handle.await {
                error!(error = %err, "image write task failed");
            }
        }
    }

    fn signal(&self, signal: CliSignal) {
        if self.signals.send(signal).is_err() {
            debug!(?signal, "signal receiver dropped");
        }
    }

    /// Presenter calls run under the controller locks, so the write goes
    /// to the blocking pool.
    fn save(&self, path: PathBuf, data_uri: String) {
        let handle = tokio::task::spawn_blocking(move || {
            match decode_data_uri(&data_uri).and_then(|bytes| {
                fs::write(&path, bytes)
                    .with_context(|| format!("failed to write {}", path.display()))
            }) {
                Ok(()) => println!("Saved image to {}", path.display()),
                Err(err) => error!(error = %err, "could not save image"),
            }
        });
        self.pending_writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(handle);
    }
}

impl Presenter for TerminalPresenter {
    fn begin_cycle(&self, token: CycleToken) {
        debug!(cycle = %token, "cycle started");
        println!("Generating QR code... (press Enter to skip the animation)");
    }

    fn close_reveal(&self) {
        debug!("reveal closed");
    }

    fn set_loading(&self, visible: bool) {
        debug!(visible, "loading indicator");
    }

    fn display_artifact(&self, artifact: &Artifact, display_size: u32) {
        let version = artifact.version.as_deref().unwrap_or("?");
        println!("QR code ready: version {version}, display size {display_size}px");
        println!("Download: {}", artifact.url);
        if let Some(path) = &self.output {
            self.save(path.clone(), artifact.data.clone());
        }
        self.signal(CliSignal::Resolved { success: true });
    }

    fn show_success_alert(&self) {
        println!("QR code generated successfully!");
    }

    fn hide_success_alert(&self) {}

    fn show_error(&self, message: &str) {
        eprintln!("error: {message}");
        self.signal(CliSignal::Resolved { success: false });
    }

    fn open_step_viewer(&self) {
        println!();
        println!("Construction steps ([n]ext, [p]revious, <number>, [q]uit)");
        self.signal(CliSignal::StepsReady);
    }

    fn close_step_viewer(&self) {
        println!("Step viewer closed.");
    }

    fn show_step(&self, view: StepView<'_>) {
        let prev = if view.can_go_previous() { "p" } else { "-" };
        let next = if view.can_go_next() { "n" } else { "-" };
        println!();
        println!("{}  [{prev}|{next}]", view.indicator());
        println!("{}", strip_markup(&view.frame.description));
        if let Some(path) = &self.output {
            self.save(step_image_path(path, view.index), view.frame.image.clone());
        }
    }

    fn report_step_error(&self, message: &str) {
        eprintln!("{message}");
        self.signal(CliSignal::StepsFailed);
    }

    fn confirm_link_copied(&self, url: &str) {
        println!("Link copied to clipboard! {url}");
    }
}

pub fn decode_data_uri(data_uri: &str) -> Result<Vec<u8>> {
    let payload = match data_uri.split_once(";base64,") {
        Some((_, payload)) => payload,
        None if data_uri.starts_with("data:") => {
            return Err(anyhow!("image data is not base64 encoded"))
        }
        None => data_uri,
    };
    STANDARD
        .decode(payload.trim())
        .context("invalid base64 image data")
}

/// Flattens the step description to plain text, one block per line.
pub fn strip_markup(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => {
                in_tag = false;
                if !out.ends_with('\n') && !out.is_empty() {
                    out.push('\n');
                }
            }
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out.trim().to_string()
}

fn step_image_path(output: &Path, index: usize) -> PathBuf {
    let stem = output
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("qrcode");
    output.with_file_name(format!("{stem}-step-{}.png", index + 1))
}
