//! Per-click driver for the admin page's start/stop scraping links.
//!
//! The browser flow is Idle -> Pending -> full page reload, with the reload
//! terminal in both branches. The driver takes the page pieces as injected
//! capabilities (backend call, clicked element, reload effect) so the flow
//! is testable without a browser.

use async_trait::async_trait;
use serde_json::Value;

use crate::{AdminClientError, PlatformAdminClient};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrapingAction {
    Start,
    Stop,
}

impl ScrapingAction {
    /// Label shown on the clicked link while the request is in flight.
    #[must_use]
    pub fn pending_label(self) -> &'static str {
        match self {
            Self::Start => "Starting...",
            Self::Stop => "Stopping...",
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Stop => "stop",
        }
    }
}

/// Backend operations the admin page triggers.
#[async_trait]
pub trait ScrapingBackend: Send + Sync {
    async fn scraping_start(&self, platform_id: &str) -> Result<Value, AdminClientError>;
    async fn scraping_stop(&self, platform_id: &str) -> Result<Value, AdminClientError>;
}

#[async_trait]
impl ScrapingBackend for PlatformAdminClient {
    async fn scraping_start(&self, platform_id: &str) -> Result<Value, AdminClientError> {
        PlatformAdminClient::scraping_start(self, platform_id).await
    }

    async fn scraping_stop(&self, platform_id: &str) -> Result<Value, AdminClientError> {
        PlatformAdminClient::scraping_stop(self, platform_id).await
    }
}

/// The clicked element: label text plus pointer interactivity.
pub trait ActionSurface {
    /// Save the current label, show the pending one, disable interaction.
    fn begin_pending(&mut self, pending_label: &str);
    /// Put the saved label back and re-enable interaction.
    fn restore(&mut self);
}

/// In-memory stand-in for the admin page link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerLink {
    label: String,
    interactive: bool,
    saved_label: Option<String>,
}

impl TriggerLink {
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            interactive: true,
            saved_label: None,
        }
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn is_interactive(&self) -> bool {
        self.interactive
    }
}

impl ActionSurface for TriggerLink {
    fn begin_pending(&mut self, pending_label: &str) {
        self.saved_label = Some(std::mem::replace(&mut self.label, pending_label.to_string()));
        self.interactive = false;
    }

    fn restore(&mut self) {
        if let Some(original) = self.saved_label.take() {
            self.label = original;
        }
        self.interactive = true;
    }
}

/// Full-page reload, the terminal effect of every click.
pub trait PageReloader {
    fn reload(&self);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Success(Value),
    Failure(String),
}

/// Runs one click of the given action against `backend`.
///
/// On success the payload is logged and the page reloads with the pending
/// label still showing. On failure (transport and non-2xx collapsed into one
/// branch, as on the admin page itself) the surface is restored first, then
/// the page reloads. Exactly one reload either way.
pub async fn run_scraping_action(
    action: ScrapingAction,
    platform_id: &str,
    backend: &dyn ScrapingBackend,
    surface: &mut dyn ActionSurface,
    reloader: &dyn PageReloader,
) -> ActionOutcome {
    surface.begin_pending(action.pending_label());

    let result = match action {
        ScrapingAction::Start => backend.scraping_start(platform_id).await,
        ScrapingAction::Stop => backend.scraping_stop(platform_id).await,
    };

    match result {
        Ok(payload) => {
            tracing::info!(
                platform_id,
                action = action.as_str(),
                payload = %payload,
                "scraping action succeeded"
            );
            reloader.reload();
            ActionOutcome::Success(payload)
        }
        Err(error) => {
            tracing::error!(
                platform_id,
                action = action.as_str(),
                %error,
                "scraping action failed"
            );
            surface.restore();
            reloader.reload();
            ActionOutcome::Failure(error.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use reqwest::StatusCode;
    use serde_json::json;

    use super::*;

    type EventLog = Arc<Mutex<Vec<String>>>;

    fn log_event(events: &EventLog, event: impl Into<String>) {
        events.lock().expect("event log lock").push(event.into());
    }

    enum StubBehavior {
        Respond(Value),
        FailHttp(u16),
    }

    struct StubBackend {
        behavior: StubBehavior,
        calls: EventLog,
    }

    impl StubBackend {
        fn call(&self, action: &str, platform_id: &str) -> Result<Value, AdminClientError> {
            log_event(&self.calls, format!("{action}:{platform_id}"));
            match &self.behavior {
                StubBehavior::Respond(payload) => Ok(payload.clone()),
                StubBehavior::FailHttp(status) => Err(AdminClientError::Http {
                    status: StatusCode::from_u16(*status).expect("status code"),
                    body: "stub failure".to_string(),
                }),
            }
        }
    }

    #[async_trait]
    impl ScrapingBackend for StubBackend {
        async fn scraping_start(&self, platform_id: &str) -> Result<Value, AdminClientError> {
            self.call("start", platform_id)
        }

        async fn scraping_stop(&self, platform_id: &str) -> Result<Value, AdminClientError> {
            self.call("stop", platform_id)
        }
    }

    struct RecordingSurface {
        events: EventLog,
    }

    impl ActionSurface for RecordingSurface {
        fn begin_pending(&mut self, pending_label: &str) {
            log_event(&self.events, format!("pending:{pending_label}"));
        }

        fn restore(&mut self) {
            log_event(&self.events, "restore");
        }
    }

    struct RecordingReloader {
        events: EventLog,
    }

    impl PageReloader for RecordingReloader {
        fn reload(&self) {
            log_event(&self.events, "reload");
        }
    }

    fn recorded(events: &EventLog) -> Vec<String> {
        events.lock().expect("event log lock").clone()
    }

    #[tokio::test]
    async fn success_reloads_without_restoring() {
        let events: EventLog = Arc::default();
        let backend = StubBackend {
            behavior: StubBehavior::Respond(json!({"status": "started"})),
            calls: events.clone(),
        };
        let mut surface = RecordingSurface {
            events: events.clone(),
        };
        let reloader = RecordingReloader {
            events: events.clone(),
        };

        let outcome =
            run_scraping_action(ScrapingAction::Start, "42", &backend, &mut surface, &reloader)
                .await;

        assert_eq!(outcome, ActionOutcome::Success(json!({"status": "started"})));
        assert_eq!(
            recorded(&events),
            vec!["pending:Starting...", "start:42", "reload"]
        );
    }

    #[tokio::test]
    async fn failure_restores_label_before_reloading() {
        let events: EventLog = Arc::default();
        let backend = StubBackend {
            behavior: StubBehavior::FailHttp(500),
            calls: events.clone(),
        };
        let mut surface = RecordingSurface {
            events: events.clone(),
        };
        let reloader = RecordingReloader {
            events: events.clone(),
        };

        let outcome =
            run_scraping_action(ScrapingAction::Stop, "7", &backend, &mut surface, &reloader)
                .await;

        assert!(matches!(outcome, ActionOutcome::Failure(_)));
        assert_eq!(
            recorded(&events),
            vec!["pending:Stopping...", "stop:7", "restore", "reload"]
        );
    }

    #[tokio::test]
    async fn trigger_link_tracks_pending_and_restore() {
        let mut link = TriggerLink::new("Start scraping");

        link.begin_pending(ScrapingAction::Start.pending_label());
        assert_eq!(link.label(), "Starting...");
        assert!(!link.is_interactive());

        link.restore();
        assert_eq!(link.label(), "Start scraping");
        assert!(link.is_interactive());
    }

    #[tokio::test]
    async fn success_leaves_trigger_link_pending() {
        let events: EventLog = Arc::default();
        let backend = StubBackend {
            behavior: StubBehavior::Respond(json!({"status": "stopped"})),
            calls: events.clone(),
        };
        let mut link = TriggerLink::new("Stop scraping");
        let reloader = RecordingReloader {
            events: events.clone(),
        };

        let outcome =
            run_scraping_action(ScrapingAction::Stop, "7", &backend, &mut link, &reloader).await;

        // The pending label is never restored on success; the reload wipes it.
        assert!(matches!(outcome, ActionOutcome::Success(_)));
        assert_eq!(link.label(), "Stopping...");
        assert!(!link.is_interactive());
    }
}
