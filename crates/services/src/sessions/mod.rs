mod progress;
mod service;
mod view;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use progress::SessionProgress;
pub use service::{SessionEngine, SessionOutcome, SessionState, Transition};
pub use view::{PerformanceListItem, PerformanceStatsService};
pub use workflow::{SessionAnswerResult, SessionLoopService};
