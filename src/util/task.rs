use tokio::task::JoinHandle;

/// Holder for the one background flow (authorize, then fetch). Spawning a
/// replacement aborts whatever was still running.
#[derive(Default)]
pub struct SessionTask {
    handle: Option<JoinHandle<()>>,
}

impl SessionTask {
    pub fn new() -> Self {
        Self { handle: None }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    pub fn replace(&mut self, task: JoinHandle<()>) {
        if let Some(previous) = self.handle.replace(task) {
            previous.abort();
        }
    }

    pub fn abort(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
