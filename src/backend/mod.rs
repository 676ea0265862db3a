//! Background CSV loading
//!
//! Parsing a large sensor log takes long enough to freeze the window, so files
//! are read on a worker thread. It uses crossbeam channels for thread-safe
//! communication with the frontend.
//!
//! # Architecture
//!
//! - [`LoadCommand`] - Messages sent from UI to the loader (open, append, shutdown)
//! - [`LoadMessage`] - Messages sent from the loader to the UI (started, loaded, failed)
//! - [`LoaderHandle`] - UI-side handle for sending commands and receiving messages
//! - [`LoaderWorker`] - The worker loop, see [`worker`]
//!
//! # Example
//!
//! ```ignore
//! use sensorscope::backend::{spawn_loader, LoadMessage};
//!
//! let (join, loader) = spawn_loader(None)?;
//! loader.open("/data/line3.csv".into(), offset);
//!
//! for msg in loader.drain() {
//!     if let LoadMessage::Loaded { dataset, .. } = msg {
//!         // Replace or merge the dataset
//!     }
//! }
//! ```

pub mod worker;

pub use worker::LoaderWorker;

use crate::dataset::Dataset;
use chrono::FixedOffset;
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

/// What to do with a loaded file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMode {
    /// Replace the current dataset
    Replace,
    /// Merge into the current dataset
    Append,
}

/// Message sent from the UI to the loader
#[derive(Debug, Clone)]
pub enum LoadCommand {
    /// Read a CSV file
    Load {
        path: PathBuf,
        mode: LoadMode,
        /// Display offset for epoch timestamps
        offset: FixedOffset,
    },
    /// Stop the loader thread
    Shutdown,
}

/// Message sent from the loader to the UI
#[derive(Debug)]
pub enum LoadMessage {
    /// Parsing of a file started
    Started { path: PathBuf },
    /// A file was parsed
    Loaded {
        path: PathBuf,
        mode: LoadMode,
        dataset: Box<Dataset>,
        elapsed: Duration,
    },
    /// A file could not be parsed
    Failed {
        path: PathBuf,
        mode: LoadMode,
        error: String,
    },
    /// Loader is shutting down
    Shutdown,
}

/// UI-side handle to the loader thread
pub struct LoaderHandle {
    /// Receiver for loader messages
    pub receiver: Receiver<LoadMessage>,
    /// Sender for commands to the loader
    pub command_sender: Sender<LoadCommand>,
}

impl LoaderHandle {
    /// Receive all pending messages
    pub fn drain(&self) -> Vec<LoadMessage> {
        let mut messages = Vec::new();
        while let Ok(msg) = self.receiver.try_recv() {
            messages.push(msg);
        }
        messages
    }

    /// Send a command to the loader
    pub fn send_command(&self, cmd: LoadCommand) -> bool {
        self.command_sender.send(cmd).is_ok()
    }

    /// Load a file, replacing the current dataset
    pub fn open(&self, path: PathBuf, offset: FixedOffset) -> bool {
        self.send_command(LoadCommand::Load {
            path,
            mode: LoadMode::Replace,
            offset,
        })
    }

    /// Load a file and merge it into the current dataset
    pub fn append(&self, path: PathBuf, offset: FixedOffset) -> bool {
        self.send_command(LoadCommand::Load {
            path,
            mode: LoadMode::Append,
            offset,
        })
    }

    /// Request shutdown
    pub fn shutdown(&self) {
        let _ = self.command_sender.send(LoadCommand::Shutdown);
    }
}

/// Create a worker and its UI handle without starting a thread
pub fn loader_channels() -> (LoaderWorker, LoaderHandle) {
    let (command_sender, command_rx) = unbounded();
    let (message_tx, receiver) = unbounded();
    let running = Arc::new(AtomicBool::new(true));

    let worker = LoaderWorker::new(command_rx, message_tx, running);
    let handle = LoaderHandle {
        receiver,
        command_sender,
    };
    (worker, handle)
}

/// Spawn the loader thread
///
/// When `repaint` is given, the UI is woken after every message.
pub fn spawn_loader(repaint: Option<egui::Context>) -> std::io::Result<(JoinHandle<()>, LoaderHandle)> {
    let (mut worker, handle) = loader_channels();
    if let Some(ctx) = repaint {
        worker = worker.with_repaint(ctx);
    }
    let join = std::thread::Builder::new()
        .name("csv-loader".to_string())
        .spawn(move || worker.run())?;
    Ok((join, handle))
}
