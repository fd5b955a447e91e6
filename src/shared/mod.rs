//! Shared Module
//!
//! Types shared by every part of the client: the REST wire format, shared
//! error types and base configuration.
//!
//! # Overview
//!
//! The wire types mirror the JSON the feedback server speaks, including its
//! `_id` and camelCase field names. They carry no behavior beyond
//! serialization.

/// REST request/response types
pub mod models;

/// Shared error types
pub mod error;

/// Application configuration
pub mod config;

/// Re-export commonly used types for convenience
pub use error::{require_non_empty, SharedError};
pub use config::{AppConfig, AppConfigBuilder, ConfigError};
pub use models::{
    AdminFeedbackItem, AnalyticsResponse, AuthResponse, CategoryCount, FeedbackItem,
    FeedbackRequest, FeedbackResponse, FeedbackTemplate, ForgotPasswordRequest, LoginRequest,
    MessageResponse, ModerationStatus, NotificationItem, NotificationRequest, QuestionItem,
    RegisterRequest, ResetPasswordRequest, TemplateRequest, UserProfile, UserUpdate,
};
