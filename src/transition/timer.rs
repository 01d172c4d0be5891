use std::collections::HashMap;
use std::time::Duration;

use tokio::runtime::{Builder, Handle, Runtime};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tokio::task::JoinHandle;

use crate::error::{SlideError, SlideResult};

struct TimerRuntime {
    owned: Option<Runtime>,
    handle: Handle,
}

impl TimerRuntime {
    fn new() -> SlideResult<Self> {
        if let Ok(handle) = Handle::try_current() {
            return Ok(Self {
                owned: None,
                handle,
            });
        }

        let runtime = Builder::new_multi_thread()
            .worker_threads(1)
            .enable_time()
            .thread_name("slide-routes-timer")
            .build()
            .map_err(|source| {
                SlideError::io_with_context(source, "failed to start exit timer runtime")
            })?;
        let handle = runtime.handle().clone();
        Ok(Self {
            owned: Some(runtime),
            handle,
        })
    }
}

/// Fire-once exit timers. Each elapsed timer reports its id over a channel
/// that the owner drains on its own schedule.
pub(crate) struct ExitTimers {
    runtime: Option<TimerRuntime>,
    tx: UnboundedSender<u64>,
    rx: UnboundedReceiver<u64>,
    pending: HashMap<u64, JoinHandle<()>>,
}

impl ExitTimers {
    pub(crate) fn new() -> Self {
        let (tx, rx) = unbounded_channel();
        Self {
            runtime: None,
            tx,
            rx,
            pending: HashMap::new(),
        }
    }

    pub(crate) fn schedule(&mut self, exit_id: u64, after: Duration) -> SlideResult<()> {
        if self.runtime.is_none() {
            self.runtime = Some(TimerRuntime::new()?);
        }
        let Some(runtime) = self.runtime.as_ref() else {
            return Ok(());
        };

        let tx = self.tx.clone();
        let task = runtime.handle.spawn(async move {
            tokio::time::sleep(after).await;
            let _ = tx.send(exit_id);
        });
        self.pending.insert(exit_id, task);
        Ok(())
    }

    pub(crate) fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Ids of timers that fired since the last call.
    pub(crate) fn drain(&mut self) -> Vec<u64> {
        let mut fired = Vec::new();
        while let Ok(exit_id) = self.rx.try_recv() {
            self.pending.remove(&exit_id);
            fired.push(exit_id);
        }
        fired
    }

    /// Waits for the next timer; `None` when none is pending.
    pub(crate) async fn recv(&mut self) -> Option<u64> {
        if self.pending.is_empty() {
            return None;
        }
        let exit_id = self.rx.recv().await?;
        self.pending.remove(&exit_id);
        Some(exit_id)
    }

    pub(crate) fn shutdown(&mut self) {
        for (_, task) in self.pending.drain() {
            task.abort();
        }
        while self.rx.try_recv().is_ok() {}
    }
}

impl Drop for ExitTimers {
    fn drop(&mut self) {
        self.shutdown();
        // An owned runtime may be dropped from inside another runtime, where a
        // blocking shutdown panics.
        if let Some(owned) = self.runtime.take().and_then(|runtime| runtime.owned) {
            owned.shutdown_background();
        }
    }
}
