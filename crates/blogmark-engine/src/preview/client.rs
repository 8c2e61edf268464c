use blogmark_config::PreviewConfig;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::{Handle, Runtime};
use tokio::sync::watch;

use super::{PreviewCard, PreviewFetchError, PreviewFetcher, PreviewRequest, Provider};

/// Runs preview fetches to completion, one at a time, from synchronous code.
///
/// Each fetch is bounded by the provider's timeout and raced against the
/// client's cancellation signal. The client owns a current-thread runtime
/// and cannot block on it from inside another async runtime; there every
/// preview is skipped.
pub struct PreviewClient {
    fetcher: Arc<dyn PreviewFetcher>,
    /// Only `None` while dropping.
    runtime: Option<Runtime>,
    timeout: Duration,
    github_timeout: Duration,
    cancel: Arc<watch::Sender<bool>>,
}

/// Cancels every pending and future fetch of the client it came from.
#[derive(Clone)]
pub struct CancelHandle(Arc<watch::Sender<bool>>);

impl CancelHandle {
    pub fn cancel(&self) {
        self.0.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.0.borrow()
    }
}

impl PreviewClient {
    pub fn new(
        config: &PreviewConfig,
        fetcher: impl PreviewFetcher + 'static,
    ) -> std::io::Result<Self> {
        Self::with_timeouts(
            fetcher,
            Duration::from_secs(config.timeout_secs),
            Duration::from_secs(config.github_timeout_secs),
        )
    }

    pub fn with_timeouts(
        fetcher: impl PreviewFetcher + 'static,
        timeout: Duration,
        github_timeout: Duration,
    ) -> std::io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()?;
        let (cancel, _) = watch::channel(false);

        Ok(Self {
            fetcher: Arc::new(fetcher),
            runtime: Some(runtime),
            timeout,
            github_timeout,
            cancel: Arc::new(cancel),
        })
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle(Arc::clone(&self.cancel))
    }

    fn timeout_for(&self, provider: Provider) -> Duration {
        match provider {
            Provider::GitHub => self.github_timeout,
            _ => self.timeout,
        }
    }

    /// Fetch a preview card; any failure is logged and yields `None`.
    pub fn preview(&self, request: &PreviewRequest) -> Option<PreviewCard> {
        match self.fetch(request) {
            Ok(card) => Some(card),
            Err(error @ PreviewFetchError::Timeout(_)) => {
                log::warn!("no preview for {request:?}: {error}");
                None
            }
            Err(error) => {
                log::debug!("no preview for {request:?}: {error}");
                None
            }
        }
    }

    fn fetch(&self, request: &PreviewRequest) -> Result<PreviewCard, PreviewFetchError> {
        if Handle::try_current().is_ok() {
            return Err(PreviewFetchError::InsideRuntime);
        }
        let Some(runtime) = self.runtime.as_ref() else {
            return Err(PreviewFetchError::Cancelled);
        };

        let mut cancelled = self.cancel.subscribe();
        if *cancelled.borrow_and_update() {
            return Err(PreviewFetchError::Cancelled);
        }

        let timeout = self.timeout_for(request.provider());
        runtime.block_on(async {
            tokio::select! {
                outcome = tokio::time::timeout(timeout, self.fetcher.fetch(request)) => {
                    outcome.unwrap_or(Err(PreviewFetchError::Timeout(timeout)))
                }
                _ = wait_for_cancel(&mut cancelled) => Err(PreviewFetchError::Cancelled),
            }
        })
    }
}

impl Drop for PreviewClient {
    fn drop(&mut self) {
        // A plain runtime drop panics when it happens inside another runtime.
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}

/// Resolves once the flag flips to `true`; never resolves if the sender is gone.
async fn wait_for_cancel(cancelled: &mut watch::Receiver<bool>) {
    if cancelled.wait_for(|flag| *flag).await.is_err() {
        std::future::pending::<()>().await;
    }
}
