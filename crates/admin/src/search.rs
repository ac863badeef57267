//! Trailing debounce for admin search boxes.
//!
//! Keystrokes are pushed as they happen; a term is emitted only after
//! the input has been quiet for the debounce window, and identical
//! consecutive terms are suppressed. Structured filters (status,
//! category) bypass this and refetch immediately.

use std::time::Duration;

use tokio::sync::{mpsc, watch};

/// Quiet window before a search term is emitted.
pub const DEBOUNCE_DELAY: Duration = Duration::from_millis(500);

/// Debounced input channel. Push raw input; receive settled terms.
#[derive(Debug)]
pub struct Debouncer {
    tx: watch::Sender<String>,
}

impl Debouncer {
    /// Create a debouncer and the receiver of settled terms. Spawns a
    /// worker task, so a tokio runtime must be running.
    #[must_use]
    pub fn new(delay: Duration) -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, mut input) = watch::channel(String::new());
        let (out, settled) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            let mut last_emitted: Option<String> = None;
            while input.changed().await.is_ok() {
                // Keep resetting the window while keystrokes arrive.
                loop {
                    let quiet = tokio::time::sleep(delay);
                    tokio::pin!(quiet);
                    tokio::select! {
                        () = &mut quiet => break,
                        changed = input.changed() => {
                            if changed.is_err() {
                                return;
                            }
                        }
                    }
                }
                let term = input.borrow_and_update().clone();
                if last_emitted.as_ref() != Some(&term) {
                    last_emitted = Some(term.clone());
                    if out.send(term).is_err() {
                        return;
                    }
                }
            }
        });

        (Self { tx }, settled)
    }

    /// Push the current input text.
    pub fn push(&self, text: impl Into<String>) {
        let _ = self.tx.send(text.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn emits_once_after_quiet_window() {
        let (debouncer, mut settled) = Debouncer::new(DEBOUNCE_DELAY);
        debouncer.push("w");
        debouncer.push("wa");
        debouncer.push("watch");

        assert_eq!(settled.recv().await.as_deref(), Some("watch"));
        // Nothing else settled from the burst.
        assert!(settled.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn suppresses_repeated_terms() {
        let (debouncer, mut settled) = Debouncer::new(DEBOUNCE_DELAY);
        debouncer.push("shoes");
        assert_eq!(settled.recv().await.as_deref(), Some("shoes"));

        // Same term again after the window: no new emission.
        debouncer.push("shoes");
        tokio::time::sleep(DEBOUNCE_DELAY * 3).await;
        assert!(settled.try_recv().is_err());

        debouncer.push("boots");
        assert_eq!(settled.recv().await.as_deref(), Some("boots"));
    }
}
