//! Admin Service
//!
//! Template management, moderation, user management, analytics and
//! broadcast notifications. Every call checks the session first: no valid
//! token is `NotAuthenticated`, no admin flag is `Forbidden`, and in both
//! cases nothing is sent.

use crate::client::api::HttpApiClient;
use crate::client::error::{ClientError, ClientResult};
use crate::client::session::SessionStore;
use crate::shared::{
    require_non_empty, AdminFeedbackItem, AnalyticsResponse, FeedbackTemplate, MessageResponse,
    ModerationStatus, NotificationItem, NotificationRequest, QuestionItem, SharedError,
    TemplateRequest, UserProfile, UserUpdate,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct AdminService {
    session: SessionStore,
    http: Arc<HttpApiClient>,
}

impl std::fmt::Debug for AdminService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminService").finish_non_exhaustive()
    }
}

impl AdminService {
    pub fn new(session: SessionStore, http: Arc<HttpApiClient>) -> Self {
        Self { session, http }
    }

    // ---- templates ----

    pub async fn list_templates(&self) -> ClientResult<Vec<FeedbackTemplate>> {
        let token = self.authorize().await?;
        self.http.list_templates(&token).await
    }

    pub async fn template(&self, category: &str) -> ClientResult<FeedbackTemplate> {
        require_non_empty("category", category)?;
        let token = self.authorize().await?;
        self.http.feedback_template(&token, category).await
    }

    pub async fn create_template(&self, category: &str, questions: Vec<QuestionItem>) -> ClientResult<()> {
        require_non_empty("category", category)?;
        let questions = clean_questions(questions)?;
        let token = self.authorize().await?;

        let request = TemplateRequest {
            category: Some(category.trim().to_string()),
            questions,
        };
        self.http.create_template(&token, &request).await?;
        tracing::info!("Created feedback template for {}", category);
        Ok(())
    }

    /// Replace the questions of an existing category
    pub async fn update_template(&self, category: &str, questions: Vec<QuestionItem>) -> ClientResult<()> {
        require_non_empty("category", category)?;
        let questions = clean_questions(questions)?;
        let token = self.authorize().await?;

        let request = TemplateRequest {
            category: None,
            questions,
        };
        self.http.update_template(&token, category, &request).await?;
        tracing::info!("Updated feedback template for {}", category);
        Ok(())
    }

    pub async fn delete_template(&self, category: &str) -> ClientResult<()> {
        require_non_empty("category", category)?;
        let token = self.authorize().await?;
        self.http.delete_template(&token, category).await?;
        tracing::info!("Deleted feedback template for {}", category);
        Ok(())
    }

    // ---- feedback moderation ----

    pub async fn all_feedback(&self) -> ClientResult<Vec<AdminFeedbackItem>> {
        let token = self.authorize().await?;
        self.http.all_feedback(&token).await
    }

    pub async fn moderate_feedback(
        &self,
        feedback_id: &str,
        status: ModerationStatus,
    ) -> ClientResult<AdminFeedbackItem> {
        require_non_empty("feedback_id", feedback_id)?;
        let token = self.authorize().await?;
        let item = self.http.moderate_feedback(&token, feedback_id, status).await?;
        tracing::info!("Feedback {} marked {}", feedback_id, status);
        Ok(item)
    }

    pub async fn delete_feedback(&self, feedback_id: &str) -> ClientResult<()> {
        require_non_empty("feedback_id", feedback_id)?;
        let token = self.authorize().await?;
        self.http.delete_feedback(&token, feedback_id).await
    }

    // ---- users ----

    pub async fn list_users(&self) -> ClientResult<Vec<UserProfile>> {
        let token = self.authorize().await?;
        self.http.list_users(&token).await
    }

    pub async fn update_user(&self, user_id: &str, update: &UserUpdate) -> ClientResult<UserProfile> {
        require_non_empty("user_id", user_id)?;
        require_non_empty("name", &update.name)?;
        let token = self.authorize().await?;
        self.http.update_user(&token, user_id, update).await
    }

    pub async fn delete_user(&self, user_id: &str) -> ClientResult<()> {
        require_non_empty("user_id", user_id)?;
        let token = self.authorize().await?;
        self.http.delete_user(&token, user_id).await
    }

    // ---- analytics & notifications ----

    pub async fn analytics(&self) -> ClientResult<AnalyticsResponse> {
        let token = self.authorize().await?;
        self.http.analytics(&token).await
    }

    /// Send to one recipient, or to everyone when `recipient` is `None`
    pub async fn send_notification(&self, notification: &NotificationRequest) -> ClientResult<MessageResponse> {
        require_non_empty("title", &notification.title)?;
        require_non_empty("message", &notification.message)?;
        let token = self.authorize().await?;
        self.http.send_notification(&token, notification).await
    }

    pub async fn all_notifications(&self) -> ClientResult<Vec<NotificationItem>> {
        let token = self.authorize().await?;
        self.http.all_notifications(&token).await
    }

    async fn authorize(&self) -> ClientResult<String> {
        let token = self
            .session
            .get_token()
            .await?
            .ok_or(ClientError::NotAuthenticated)?;
        if !self.session.is_admin().await? {
            tracing::warn!("Admin operation refused: session lacks admin role");
            return Err(ClientError::Forbidden);
        }
        Ok(token)
    }
}

/// Trim questions, drop blank ones and blank choices; at least one must remain
fn clean_questions(questions: Vec<QuestionItem>) -> Result<Vec<QuestionItem>, SharedError> {
    let cleaned: Vec<QuestionItem> = questions
        .into_iter()
        .filter(|q| !q.question.trim().is_empty())
        .map(|q| QuestionItem {
            question: q.question.trim().to_string(),
            choices: q
                .choices
                .into_iter()
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .collect(),
        })
        .collect();

    if cleaned.is_empty() {
        return Err(SharedError::validation(
            "questions",
            "At least one question is required",
        ));
    }
    Ok(cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(text: &str, choices: &[&str]) -> QuestionItem {
        QuestionItem {
            question: text.to_string(),
            choices: choices.iter().map(|c| c.to_string()).collect(),
        }
    }

    #[test]
    fn test_clean_questions_trims_and_drops_blanks() {
        let cleaned = clean_questions(vec![
            question("  Clarity ", &["Good", " ", "Bad "]),
            question("   ", &["x"]),
        ])
        .unwrap();
        assert_eq!(cleaned, vec![question("Clarity", &["Good", "Bad"])]);
    }

    #[test]
    fn test_clean_questions_requires_one() {
        let result = clean_questions(vec![question("", &[])]);
        assert!(matches!(result, Err(SharedError::ValidationError { .. })));
    }
}
