pub mod config;
pub mod identity;
pub mod progress;
pub mod retry;

pub use config::FeedbackConfig;
pub use identity::ContestantId;
pub use progress::{AnswerOption, ProgressError, QuizProgress};
pub use retry::RetryPolicy;
