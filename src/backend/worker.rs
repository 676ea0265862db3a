//! Loader Worker Thread Implementation
//!
//! This module contains the worker loop that runs in a separate thread and
//! reads CSV files. It communicates with the UI thread through crossbeam
//! channels and blocks on the command channel while idle.

use crate::backend::{LoadCommand, LoadMessage, LoadMode};
use crate::dataset::load_csv;
use chrono::FixedOffset;
use crossbeam_channel::{Receiver, Sender};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// The loader worker
pub struct LoaderWorker {
    /// Command receiver from the UI
    command_rx: Receiver<LoadCommand>,
    /// Message sender to the UI
    message_tx: Sender<LoadMessage>,
    /// Running flag
    running: Arc<AtomicBool>,
    /// Woken after each message so results show without user input
    repaint: Option<egui::Context>,
    /// Files loaded so far
    files_loaded: usize,
}

impl LoaderWorker {
    /// Create a new loader worker
    pub fn new(
        command_rx: Receiver<LoadCommand>,
        message_tx: Sender<LoadMessage>,
        running: Arc<AtomicBool>,
    ) -> Self {
        Self {
            command_rx,
            message_tx,
            running,
            repaint: None,
            files_loaded: 0,
        }
    }

    /// Request a repaint of `ctx` after every message
    pub fn with_repaint(mut self, ctx: egui::Context) -> Self {
        self.repaint = Some(ctx);
        self
    }

    /// Run the worker loop until shutdown or until the UI hangs up
    pub fn run(&mut self) {
        tracing::info!("Loader worker started");

        while self.running.load(Ordering::SeqCst) {
            match self.command_rx.recv() {
                Ok(cmd) => self.handle_command(cmd),
                Err(_) => {
                    self.running.store(false, Ordering::SeqCst);
                }
            }
        }

        self.send(LoadMessage::Shutdown);
        tracing::info!("Loader worker stopped after {} files", self.files_loaded);
    }

    /// Handle a single command
    fn handle_command(&mut self, cmd: LoadCommand) {
        match cmd {
            LoadCommand::Load { path, mode, offset } => self.load(path, mode, offset),
            LoadCommand::Shutdown => {
                self.running.store(false, Ordering::SeqCst);
            }
        }
    }

    fn load(&mut self, path: PathBuf, mode: LoadMode, offset: FixedOffset) {
        tracing::debug!("Loading {:?} ({:?})", path, mode);
        self.send(LoadMessage::Started { path: path.clone() });

        let started = Instant::now();
        match load_csv(&path, offset) {
            Ok(dataset) => {
                self.files_loaded += 1;
                self.send(LoadMessage::Loaded {
                    path,
                    mode,
                    dataset: Box::new(dataset),
                    elapsed: started.elapsed(),
                });
            }
            Err(e) => {
                tracing::error!("Failed to load {:?}: {}", path, e);
                self.send(LoadMessage::Failed {
                    path,
                    mode,
                    error: e.to_string(),
                });
            }
        }
    }

    fn send(&self, msg: LoadMessage) {
        if self.message_tx.send(msg).is_err() {
            tracing::debug!("UI receiver dropped, discarding loader message");
        }
        if let Some(ctx) = &self.repaint {
            ctx.request_repaint();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::loader_channels;
    use std::io::Write;

    fn offset() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    #[test]
    fn test_load_then_shutdown() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Timestamp,temp").unwrap();
        writeln!(file, "0,1.0").unwrap();
        writeln!(file, "1,2.0").unwrap();
        file.flush().unwrap();

        let (mut worker, handle) = loader_channels();
        assert!(handle.open(file.path().to_path_buf(), offset()));
        handle.shutdown();
        worker.run();

        let messages = handle.drain();
        assert!(matches!(messages[0], LoadMessage::Started { .. }));
        match &messages[1] {
            LoadMessage::Loaded { dataset, mode, .. } => {
                assert_eq!(*mode, LoadMode::Replace);
                assert_eq!(dataset.len(), 2);
            }
            other => panic!("unexpected message {:?}", other),
        }
        assert!(matches!(messages.last(), Some(LoadMessage::Shutdown)));
    }

    #[test]
    fn test_missing_file_reports_failure() {
        let (mut worker, handle) = loader_channels();
        handle.append(PathBuf::from("/definitely/not/here.csv"), offset());
        handle.shutdown();
        worker.run();

        let failed = handle
            .drain()
            .into_iter()
            .find(|m| matches!(m, LoadMessage::Failed { .. }));
        match failed {
            Some(LoadMessage::Failed { mode, error, .. }) => {
                assert_eq!(mode, LoadMode::Append);
                assert!(error.contains("Failed to open"));
            }
            _ => panic!("expected a failure message"),
        }
    }

    #[test]
    fn test_stops_when_ui_hangs_up() {
        let (mut worker, handle) = loader_channels();
        drop(handle);
        worker.run();
        assert!(!worker.running.load(Ordering::SeqCst));
    }
}
