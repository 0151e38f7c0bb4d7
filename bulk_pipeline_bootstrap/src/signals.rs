// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # System Signal Handling
//!
//! Cross-platform OS signal handling for graceful shutdown. Unix listens for
//! `SIGTERM`, `SIGINT`, and `SIGHUP`; Windows listens for Ctrl+C. A no-op
//! implementation lets tests exercise shutdown paths without touching
//! process-wide signal state.

use std::future::Future;
use std::pin::Pin;

/// Callback invoked once a shutdown signal has been received.
pub type ShutdownCallback = Box<dyn FnOnce() + Send + 'static>;

/// Abstraction over OS signal handling.
pub trait SystemSignals: Send + Sync {
    /// Waits for a shutdown-triggering signal, then runs `on_shutdown`.
    fn wait_for_signal<'a>(&'a self, on_shutdown: ShutdownCallback) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>>;
}

#[cfg(unix)]
pub struct UnixSignalHandler;

#[cfg(unix)]
impl UnixSignalHandler {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(unix)]
impl Default for UnixSignalHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(unix)]
impl SystemSignals for UnixSignalHandler {
    fn wait_for_signal<'a>(&'a self, on_shutdown: ShutdownCallback) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
        Box::pin(async move {
            use tokio::signal::unix::{signal, SignalKind};

            let mut sigterm = match signal(SignalKind::terminate()) {
                Ok(s) => s,
                Err(e) => {
                    tracing::error!("failed to install SIGTERM handler: {e}");
                    return;
                }
            };
            let mut sigint = match signal(SignalKind::interrupt()) {
                Ok(s) => s,
                Err(e) => {
                    tracing::error!("failed to install SIGINT handler: {e}");
                    return;
                }
            };
            let mut sighup = match signal(SignalKind::hangup()) {
                Ok(s) => s,
                Err(e) => {
                    tracing::error!("failed to install SIGHUP handler: {e}");
                    return;
                }
            };

            tokio::select! {
                _ = sigterm.recv() => tracing::info!("received SIGTERM"),
                _ = sigint.recv() => tracing::info!("received SIGINT"),
                _ = sighup.recv() => tracing::info!("received SIGHUP"),
            }

            on_shutdown();
        })
    }
}

#[cfg(windows)]
pub struct WindowsSignalHandler;

#[cfg(windows)]
impl WindowsSignalHandler {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(windows)]
impl Default for WindowsSignalHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(windows)]
impl SystemSignals for WindowsSignalHandler {
    fn wait_for_signal<'a>(&'a self, on_shutdown: ShutdownCallback) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
        Box::pin(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("failed to listen for ctrl-c: {e}");
                return;
            }
            tracing::info!("received Ctrl+C");
            on_shutdown();
        })
    }
}

/// Test double that never fires; used so unit tests can race it against a
/// timeout without touching real process signal state.
pub struct NoOpSignalHandler;

impl NoOpSignalHandler {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NoOpSignalHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemSignals for NoOpSignalHandler {
    fn wait_for_signal<'a>(&'a self, _on_shutdown: ShutdownCallback) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
        Box::pin(std::future::pending())
    }
}

/// Creates the signal handler appropriate for the current platform.
pub fn create_signal_handler() -> Box<dyn SystemSignals> {
    #[cfg(unix)]
    {
        Box::new(UnixSignalHandler::new())
    }

    #[cfg(windows)]
    {
        Box::new(WindowsSignalHandler::new())
    }

    #[cfg(not(any(unix, windows)))]
    {
        compile_error!("unsupported platform: no signal handler implementation available");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn noop_handler_never_fires() {
        let handler = NoOpSignalHandler::new();
        let fired = Arc::new(AtomicBool::new(false));
        let fired_clone = fired.clone();

        let wait = handler.wait_for_signal(Box::new(move || {
            fired_clone.store(true, Ordering::SeqCst);
        }));

        let result = tokio::time::timeout(Duration::from_millis(20), wait).await;
        assert!(result.is_err());
        assert!(!fired.load(Ordering::SeqCst));
    }

    #[test]
    fn create_signal_handler_does_not_panic() {
        let _handler = create_signal_handler();
    }
}
