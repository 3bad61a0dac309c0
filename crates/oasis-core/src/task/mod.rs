// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Hand-off of CPU work from a worker thread to the device thread.
//!
//! Resource wrappers are bound to the thread that owns the device context. Work
//! that only produces plain data, such as generating a [`MeshData`], runs on a
//! [`BackgroundTask`]; the device thread polls for the result once per frame and
//! applies it itself.
//!
//! [`MeshData`]: crate::renderer::MeshData

use std::fmt;
use std::thread;

use flume::{Receiver, TryRecvError};

/// Errors that can occur while running or collecting a background task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    /// The worker thread could not be started.
    Spawn(String),
    /// The worker ended without producing a result, usually because it panicked.
    WorkerLost,
    /// The result was already collected.
    AlreadyTaken,
}

impl fmt::Display for TaskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskError::Spawn(msg) => write!(f, "Failed to spawn background task: {msg}"),
            TaskError::WorkerLost => write!(f, "Background task ended without a result."),
            TaskError::AlreadyTaken => write!(f, "Background task result was already taken."),
        }
    }
}

impl std::error::Error for TaskError {}

/// A computation running on its own thread whose result is collected by polling.
#[derive(Debug)]
pub struct BackgroundTask<T: Send + 'static> {
    name: String,
    receiver: Receiver<T>,
    taken: bool,
}

impl<T: Send + 'static> BackgroundTask<T> {
    /// Starts `work` on a new named thread.
    pub fn spawn<F>(name: impl Into<String>, work: F) -> Result<Self, TaskError>
    where
        F: FnOnce() -> T + Send + 'static,
    {
        let name = name.into();
        let (sender, receiver) = flume::bounded(1);

        thread::Builder::new()
            .name(name.clone())
            .spawn(move || {
                let result = work();
                if sender.send(result).is_err() {
                    log::trace!("Background task result dropped, the task handle is gone.");
                }
            })
            .map_err(|e| TaskError::Spawn(e.to_string()))?;

        log::debug!("Spawned background task '{name}'.");
        Ok(Self {
            name,
            receiver,
            taken: false,
        })
    }

    /// The name of the worker thread.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `true` once the result has been collected.
    pub fn is_taken(&self) -> bool {
        self.taken
    }

    /// Collects the result without blocking.
    ///
    /// Returns `Ok(None)` while the worker is still running.
    pub fn try_take(&mut self) -> Result<Option<T>, TaskError> {
        if self.taken {
            return Err(TaskError::AlreadyTaken);
        }
        match self.receiver.try_recv() {
            Ok(result) => {
                self.taken = true;
                log::debug!("Background task '{}' completed.", self.name);
                Ok(Some(result))
            }
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => {
                self.taken = true;
                log::error!("Background task '{}' ended without a result.", self.name);
                Err(TaskError::WorkerLost)
            }
        }
    }

    /// Blocks until the result is available.
    pub fn wait(mut self) -> Result<T, TaskError> {
        if self.taken {
            return Err(TaskError::AlreadyTaken);
        }
        self.taken = true;
        self.receiver.recv().map_err(|_| TaskError::WorkerLost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn wait_returns_result() {
        let task = BackgroundTask::spawn("sum", || (1..=10).sum::<u32>()).unwrap();
        assert_eq!(task.name(), "sum");
        assert_eq!(task.wait(), Ok(55));
    }

    #[test]
    fn try_take_polls_until_ready() {
        let (gate_tx, gate_rx) = flume::bounded::<()>(0);
        let mut task = BackgroundTask::spawn("gated", move || {
            let _ = gate_rx.recv();
            7
        })
        .unwrap();

        assert_eq!(task.try_take(), Ok(None));
        gate_tx.send(()).unwrap();

        let mut result = None;
        for _ in 0..200 {
            if let Some(value) = task.try_take().unwrap() {
                result = Some(value);
                break;
            }
            thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(result, Some(7));
        assert!(task.is_taken());
        assert_eq!(task.try_take(), Err(TaskError::AlreadyTaken));
    }

    #[test]
    fn panicking_worker_is_reported() {
        let task: BackgroundTask<u8> = BackgroundTask::spawn("panics", || panic!("boom")).unwrap();
        assert_eq!(task.wait(), Err(TaskError::WorkerLost));
    }
}
