//! Termination signal handling.
//!
//! A background task waits for SIGINT (Ctrl+C) or SIGTERM and publishes the
//! signal name on a watch channel. The dispatcher selects on that channel
//! alongside its timer and any running traversal.

use tokio::signal;
use tokio::sync::watch;

/// Receiving side of the shutdown notification.
#[derive(Clone)]
pub struct Shutdown {
    rx: watch::Receiver<Option<&'static str>>,
}

/// Sending side, held by the signal task (or a test).
pub struct ShutdownTrigger {
    tx: watch::Sender<Option<&'static str>>,
}

impl ShutdownTrigger {
    /// Notifies every `Shutdown` that `reason` stopped the bot.
    pub fn fire(&self, reason: &'static str) {
        // No receivers left means nothing is running to stop.
        let _ = self.tx.send(Some(reason));
    }
}

impl Shutdown {
    /// Creates a connected trigger/receiver pair.
    pub fn channel() -> (ShutdownTrigger, Shutdown) {
        let (tx, rx) = watch::channel(None);
        (ShutdownTrigger { tx }, Shutdown { rx })
    }

    /// Spawns the signal listener task and returns the receiving side.
    pub fn listen() -> Shutdown {
        let (trigger, shutdown) = Self::channel();
        tokio::spawn(async move {
            if let Some(name) = wait_for_signal().await {
                log::info!("Received {}, exiting.", name);
                trigger.fire(name);
            }
        });
        shutdown
    }

    /// Resolves with the signal name once shutdown was requested.
    ///
    /// Never resolves if the trigger is dropped without firing.
    pub async fn signalled(&mut self) -> &'static str {
        match self.rx.wait_for(Option::is_some).await {
            Ok(reason) => (*reason).unwrap_or("shutdown"),
            Err(_) => std::future::pending().await,
        }
    }
}

/// Waits for Ctrl+C, or SIGTERM on Unix. Returns `None` if no handler could
/// be installed.
async fn wait_for_signal() -> Option<&'static str> {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => Some("interrupt"),
            Err(e) => {
                log::error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending().await
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => stream.recv().await.map(|_| "terminated"),
            Err(e) => {
                log::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending().await
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<Option<&'static str>>();

    tokio::select! {
        name = ctrl_c => name,
        name = terminate => name,
    }
}
