//! Running session work off the caller's thread
//!
//! Key generation, signing and verification are CPU-bound and blocking.
//! Front ends with an event loop hand them to tokio's blocking pool and
//! await the result. Tasks are not cancellable once started.

use std::sync::Arc;

use crate::error::{QrsavError, Result};
use crate::session::{ScanReport, Session};

#[derive(Clone)]
pub struct SessionWorker {
    session: Arc<Session>,
}

impl SessionWorker {
    pub fn new(session: Session) -> Self {
        Self::from_shared(Arc::new(session))
    }

    pub fn from_shared(session: Arc<Session>) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub async fn generate_signed_payload(&self, message: impl Into<String>) -> Result<String> {
        self.generate_payload(message, true).await
    }

    pub async fn generate_payload(&self, message: impl Into<String>, signing: bool) -> Result<String> {
        let message = message.into();
        self.run(move |session| session.generate_payload(&message, signing))
            .await?
    }

    pub async fn process_scanned_text(&self, text: impl Into<String>) -> Result<ScanReport> {
        let text = text.into();
        self.run(move |session| session.process_scanned_text(&text))
            .await
    }

    async fn run<T, F>(&self, task: F) -> Result<T>
    where
        F: FnOnce(&Session) -> T + Send + 'static,
        T: Send + 'static,
    {
        let session = Arc::clone(&self.session);
        tokio::task::spawn_blocking(move || task(&session))
            .await
            .map_err(|e| QrsavError::Worker(e.to_string()))
    }
}
