use std::sync::mpsc::Sender;

use pmmap_core::TopicId;

use crate::app_event::AppEvent;

#[derive(Clone, Debug)]
pub(crate) struct AppEventSender {
    app_event_tx: Sender<AppEvent>,
}

impl AppEventSender {
    pub(crate) fn new(app_event_tx: Sender<AppEvent>) -> Self {
        Self { app_event_tx }
    }

    /// Send an event to the app event channel. If it fails, we swallow the
    /// error and log it.
    pub(crate) fn send(&self, event: AppEvent) {
        #[cfg(feature = "debug-logs")]
        tracing::trace!(?event, "app event");
        if let Err(e) = self.app_event_tx.send(event) {
            tracing::error!("failed to send event: {e}");
        }
    }

    pub(crate) fn activate_topic(&self, id: TopicId) {
        self.send(AppEvent::ActivateTopic(id));
    }

    pub(crate) fn close_panel(&self) {
        self.send(AppEvent::ClosePanel);
    }
}
