//! Defines an abstraction over the event sending mechanism.

use super::events::UserEvent;
use tao::event_loop::EventLoopProxy;

/// The hand-off from workers (and the IPC callback) to the UI thread.
/// This is "fire-and-forget" and doesn't return a result, simplifying its use.
pub trait EventProxy: Send + Sync + Clone + 'static {
    fn send_event(&self, event: UserEvent);
}

/// Implement the trait for the real `tao::event_loop::EventLoopProxy`.
impl EventProxy for EventLoopProxy<UserEvent> {
    fn send_event(&self, event: UserEvent) {
        // Sending only fails once the event loop has exited, at which point
        // nobody is left to render the result.
        if let Err(e) = self.send_event(event) {
            tracing::warn!("Failed to send event to event loop: {}", e);
        }
    }
}
