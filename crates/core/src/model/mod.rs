mod answer;
mod ids;
mod question;
mod record;
mod review;
mod study_days;

pub use ids::{ParseIdError, QuestionId, RecordId};

pub use answer::Answer;
pub use question::{ILLUSTRATED_SUBJECT, OPTION_COUNT, Question, QuestionError};
pub use record::{Difficulty, ParseDifficultyError, PerformanceRecord, RecordError, SessionKind};
pub use review::{ReviewItem, review_items};
pub use study_days::CompletedStudyDays;
