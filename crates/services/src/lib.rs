#![forbid(unsafe_code)]

pub mod ai;
pub mod app_services;
pub mod error;
pub mod question_bank;
pub mod sessions;
pub mod writing_lab_service;

pub use prep_core::Clock;
pub use sessions as session;

pub use app_services::AppServices;
pub use error::{AiError, AppServicesError, GenerationError, SessionError, WritingLabError};
pub use question_bank::{GenerativeQuestionBank, QuestionBank, QuestionProvider, StaticQuestionBank};
pub use writing_lab_service::{
    ChatRole, ChatTurn, EssayFeedback, SupportText, WritingLabService, WritingPrompt,
};

pub use sessions::{
    PerformanceListItem, PerformanceStatsService, SessionAnswerResult, SessionEngine,
    SessionLoopService, SessionOutcome, SessionProgress, SessionState, Transition,
};
