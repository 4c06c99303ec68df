//! # Request Dispatcher
//!
//! Runs gateway calls on background tasks and hands their results back to
//! the owning controller through a channel, so the controller stays
//! responsive while requests are in flight.
//!
//! Each dispatcher owns a [`CancellationToken`]. Cancelling it (controller
//! teardown) stops pending tasks at their next suspension point and makes
//! the receiving side refuse anything that still arrives, so no result is
//! ever applied after teardown.
//!
//! A task that ends without producing its result (it panicked) still
//! reports back, so the in-flight count always returns to zero.

use std::future::Future;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// What a spawned task sends back
enum Delivery<M> {
    Done(M),
    Lost(&'static str),
}

/// Reports a task as lost if it is dropped before delivering
struct DeliveryGuard<M> {
    sender: Option<mpsc::UnboundedSender<Delivery<M>>>,
    label: &'static str,
}

impl<M> DeliveryGuard<M> {
    fn new(sender: mpsc::UnboundedSender<Delivery<M>>, label: &'static str) -> Self {
        Self {
            sender: Some(sender),
            label,
        }
    }

    fn deliver(mut self, message: M) {
        if let Some(sender) = self.sender.take() {
            // Receiver may already be gone with its controller
            let _ = sender.send(Delivery::Done(message));
        }
    }

    /// Stop without reporting; used when the task was cancelled
    fn dismiss(mut self) {
        self.sender = None;
    }
}

impl<M> Drop for DeliveryGuard<M> {
    fn drop(&mut self) {
        if let Some(sender) = self.sender.take() {
            tracing::warn!("'{}' ended without a result", self.label);
            let _ = sender.send(Delivery::Lost(self.label));
        }
    }
}

/// Background task runner bound to one controller instance
pub struct Dispatcher<M> {
    token: CancellationToken,
    sender: mpsc::UnboundedSender<Delivery<M>>,
    receiver: mpsc::UnboundedReceiver<Delivery<M>>,
    in_flight: usize,
}

impl<M: Send + 'static> Dispatcher<M> {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            token: CancellationToken::new(),
            sender,
            receiver,
            in_flight: 0,
        }
    }

    /// Spawn a request; its output is delivered through [`Dispatcher::next`]
    ///
    /// Ignored once the dispatcher has been cancelled.
    pub fn spawn<F>(&mut self, label: &'static str, task: F)
    where
        F: Future<Output = M> + Send + 'static,
    {
        if self.token.is_cancelled() {
            tracing::debug!("Not starting '{}': dispatcher already torn down", label);
            return;
        }

        let token = self.token.clone();
        let guard = DeliveryGuard::new(self.sender.clone(), label);
        self.in_flight += 1;
        tracing::debug!("Starting '{}' ({} in flight)", label, self.in_flight);

        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {
                    tracing::debug!("'{}' cancelled before completion", label);
                    guard.dismiss();
                }
                message = task => guard.deliver(message),
            }
        });
    }

    /// Take a finished result without waiting
    pub fn try_next(&mut self) -> Option<M> {
        if self.token.is_cancelled() {
            return None;
        }
        while let Ok(delivery) = self.receiver.try_recv() {
            self.in_flight = self.in_flight.saturating_sub(1);
            if let Some(message) = Self::unwrap_delivery(delivery) {
                return Some(message);
            }
        }
        None
    }

    /// Wait for the next finished result
    ///
    /// Returns `None` immediately when nothing is in flight, and as soon as
    /// the dispatcher is cancelled.
    pub async fn next(&mut self) -> Option<M> {
        while self.in_flight > 0 && !self.token.is_cancelled() {
            let delivery = tokio::select! {
                biased;
                _ = self.token.cancelled() => None,
                delivery = self.receiver.recv() => delivery,
            };

            let delivery = delivery?;
            self.in_flight = self.in_flight.saturating_sub(1);
            if let Some(message) = Self::unwrap_delivery(delivery) {
                return Some(message);
            }
        }
        None
    }

    fn unwrap_delivery(delivery: Delivery<M>) -> Option<M> {
        match delivery {
            Delivery::Done(message) => Some(message),
            Delivery::Lost(label) => {
                tracing::warn!("Dropping '{}': task ended without a result", label);
                None
            }
        }
    }

    /// Cancel every pending request and drop results already delivered
    pub fn cancel(&mut self) {
        if self.token.is_cancelled() {
            return;
        }
        self.token.cancel();
        self.in_flight = 0;
        while self.receiver.try_recv().is_ok() {}
        tracing::debug!("Dispatcher cancelled");
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Number of requests started but not yet received
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }
}

impl<M: Send + 'static> Default for Dispatcher<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> Drop for Dispatcher<M> {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
