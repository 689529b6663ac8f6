//! Tokio Runtime Bridge
//!
//! GPUI drives its own executor, while reqwest and tokio-tungstenite need a
//! tokio reactor. REST calls and the notification socket run on one shared
//! multi-threaded runtime; GPUI tasks await their results through
//! [`run_in_tokio`].
//!
//! ```text
//! cx.spawn(async move |_, cx| {
//!     let tasks = run_in_tokio(async move { api.tasks(scope).await }).await;
//!     entity.update(cx, ...)
//! })
//! ```

use std::future::Future;
use std::sync::OnceLock;
use tokio::runtime::{Builder, Runtime};
use tokio::task::JoinHandle;

static TOKIO_RUNTIME: OnceLock<Runtime> = OnceLock::new();

fn get_runtime() -> &'static Runtime {
    TOKIO_RUNTIME.get_or_init(|| {
        Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("taskdesk-io")
            .enable_all()
            .build()
            .expect("Failed to create tokio runtime")
    })
}

/// Run a future on the shared runtime and await its output from any executor.
///
/// A panic inside the future is resumed on the awaiting side.
pub async fn run_in_tokio<F, T>(future: F) -> T
where
    F: Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    let handle = get_runtime().spawn(future);
    match handle.await {
        Ok(result) => result,
        Err(e) => std::panic::resume_unwind(e.into_panic()),
    }
}

/// Spawn a long-running task (e.g. the notification socket loop).
///
/// Dropping the returned handle detaches the task; call `abort` to stop it.
pub fn spawn_named_in_tokio<F>(name: &'static str, future: F) -> JoinHandle<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    tracing::debug!(task = name, "Spawning tokio task");
    get_runtime().spawn(async move {
        future.await;
        tracing::debug!(task = name, "Tokio task completed");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[test]
    fn test_spawn_named_in_tokio() {
        let flag = Arc::new(AtomicBool::new(false));
        let flag_clone = flag.clone();

        spawn_named_in_tokio("flag", async move {
            flag_clone.store(true, Ordering::SeqCst);
        });

        std::thread::sleep(std::time::Duration::from_millis(100));
        assert!(flag.load(Ordering::SeqCst));
    }

    #[test]
    fn test_run_in_tokio_from_foreign_executor() {
        let value = futures::executor::block_on(run_in_tokio(async {
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
            21 * 2
        }));
        assert_eq!(value, 42);
    }
}
