//! REST Wire Types
//!
//! Request and response bodies exchanged with the feedback server. Field
//! names follow the server's JSON (`_id`, `isAdmin`, ...), so most structs
//! carry serde renames.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Successful login or registration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(rename = "isAdmin", default)]
    pub is_admin: bool,
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetPasswordRequest {
    pub token: String,
    #[serde(rename = "newPassword")]
    pub new_password: String,
}

/// Generic `{ "message": ... }` body returned by several endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRequest {
    pub category: String,
    pub feedback: String,
}

/// Feedback as stored on the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub category: String,
    pub feedback: String,
    pub status: String,
}

/// Entry of the user's feedback history
pub type FeedbackItem = FeedbackResponse;

/// Entry of the admin moderation list
pub type AdminFeedbackItem = FeedbackResponse;

/// Moderation state of a feedback entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModerationStatus {
    Pending,
    Approved,
    Rejected,
}

impl ModerationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModerationStatus::Pending => "pending",
            ModerationStatus::Approved => "approved",
            ModerationStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ModerationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One multiple-choice question of a template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionItem {
    pub question: String,
    #[serde(default)]
    pub choices: Vec<String>,
}

/// Admin-defined question set for a category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackTemplate {
    #[serde(rename = "_id", default)]
    pub id: String,
    pub category: String,
    #[serde(default)]
    pub questions: Vec<QuestionItem>,
}

impl FeedbackTemplate {
    /// Question texts in template order
    pub fn question_texts(&self) -> impl Iterator<Item = &str> {
        self.questions.iter().map(|q| q.question.as_str())
    }
}

/// Body for creating (with category) or updating (without) a template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateRequest {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub category: Option<String>,
    pub questions: Vec<QuestionItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(rename = "isAdmin", default)]
    pub is_admin: bool,
}

/// Admin-side user edit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserUpdate {
    pub name: String,
    #[serde(rename = "isAdmin")]
    pub is_admin: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationItem {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub recipient: Option<String>,
    #[serde(rename = "createdAt", default)]
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationRequest {
    pub title: String,
    pub message: String,
    pub recipient: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryCount {
    #[serde(rename = "_id", default = "unknown_category")]
    pub category: String,
    #[serde(default)]
    pub count: u64,
}

fn unknown_category() -> String {
    "Unknown".to_string()
}

/// Dashboard counters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalyticsResponse {
    pub total_feedback: u64,
    pub total_users: u64,
    pub pending_feedback: u64,
    pub approved_feedback: u64,
    pub rejected_feedback: u64,
    pub feedback_by_category: Vec<CategoryCount>,
}
