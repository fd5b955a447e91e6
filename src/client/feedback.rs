//! # Feedback Service
//!
//! Submits feedback online when possible and falls back to the offline
//! queue when the network is not.
//!
//! ## Submit Decision
//!
//! | Network | Server answer | Result |
//! |---|---|---|
//! | offline | not asked | `Queued` |
//! | online | 2xx | `Submitted` |
//! | online | transport failure or timeout | `Queued` |
//! | online | non-2xx | `Err(Status)`, nothing queued |
//!
//! The draft of the category is cleared whenever the feedback was either
//! submitted or queued.

use crate::client::api::{ApiGateway, HttpApiClient};
use crate::client::draft::{compose_feedback_text, DraftAnswers, DraftCache};
use crate::client::error::{ClientError, ClientResult};
use crate::client::offline::{OfflineFeedbackQueue, OfflineFeedbackRecord};
use crate::client::session::SessionStore;
use crate::client::sync::NetworkMonitor;
use crate::shared::{require_non_empty, FeedbackItem, FeedbackRequest, FeedbackResponse, FeedbackTemplate};
use std::sync::Arc;

/// Where a submitted feedback ended up
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Accepted by the server
    Submitted(FeedbackResponse),
    /// Stored locally; delivered by the next sync
    Queued(OfflineFeedbackRecord),
}

#[derive(Clone)]
pub struct FeedbackService {
    session: SessionStore,
    queue: OfflineFeedbackQueue,
    drafts: DraftCache,
    monitor: Arc<NetworkMonitor>,
    gateway: Arc<dyn ApiGateway>,
    http: Arc<HttpApiClient>,
}

impl std::fmt::Debug for FeedbackService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedbackService").finish_non_exhaustive()
    }
}

impl FeedbackService {
    pub fn new(
        session: SessionStore,
        queue: OfflineFeedbackQueue,
        drafts: DraftCache,
        monitor: Arc<NetworkMonitor>,
        gateway: Arc<dyn ApiGateway>,
        http: Arc<HttpApiClient>,
    ) -> Self {
        Self {
            session,
            queue,
            drafts,
            monitor,
            gateway,
            http,
        }
    }

    /// Submit feedback, or queue it when the server cannot be reached
    pub async fn submit(&self, category: &str, feedback: &str) -> ClientResult<SubmitOutcome> {
        require_non_empty("category", category)?;
        require_non_empty("feedback", feedback)?;
        let token = self.require_token().await?;

        let outcome = if self.monitor.is_online() {
            let request = FeedbackRequest {
                category: category.to_string(),
                feedback: feedback.to_string(),
            };
            match self.gateway.submit_feedback(&token, &request).await {
                Ok(response) => {
                    tracing::info!("Feedback submitted: id={}, category={}", response.id, category);
                    SubmitOutcome::Submitted(response)
                }
                Err(e) if e.is_network() => {
                    tracing::warn!("Submit failed ({}); storing feedback offline", e);
                    SubmitOutcome::Queued(self.queue.enqueue(category, feedback).await?)
                }
                Err(e) => return Err(e),
            }
        } else {
            tracing::warn!("No network; storing feedback offline");
            SubmitOutcome::Queued(self.queue.enqueue(category, feedback).await?)
        };

        self.drafts.clear_draft(category).await?;
        Ok(outcome)
    }

    /// Compose answers to `template` into one text and submit it
    pub async fn submit_answers(
        &self,
        template: &FeedbackTemplate,
        answers: &DraftAnswers,
    ) -> ClientResult<SubmitOutcome> {
        let text = compose_feedback_text(template, answers)?;
        self.submit(&template.category, &text).await
    }

    /// Feedback the current user submitted earlier
    pub async fn history(&self) -> ClientResult<Vec<FeedbackItem>> {
        let token = self.require_token().await?;
        self.http.feedback_history(&token).await
    }

    /// Question template for `category`
    pub async fn questions(&self, category: &str) -> ClientResult<FeedbackTemplate> {
        require_non_empty("category", category)?;
        let token = self.require_token().await?;
        self.http.feedback_template(&token, category).await
    }

    pub async fn save_draft(&self, category: &str, answers: &DraftAnswers) -> ClientResult<()> {
        self.drafts.save_draft(category, answers).await
    }

    pub async fn load_draft(&self, category: &str) -> ClientResult<DraftAnswers> {
        self.drafts.load_draft(category).await
    }

    pub async fn clear_draft(&self, category: &str) -> ClientResult<()> {
        self.drafts.clear_draft(category).await
    }

    async fn require_token(&self) -> ClientResult<String> {
        self.session.get_token().await?.ok_or(ClientError::NotAuthenticated)
    }
}
