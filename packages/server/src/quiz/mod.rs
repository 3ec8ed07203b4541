//! Quiz domain services.
//!
//! Each service borrows a connection and is cheap to build per request.
//! Progress is always derived from the stored counters, so any number of
//! server instances can share one database.

pub mod catalog;
pub mod error;
pub mod grader;
pub mod leaderboard;
pub mod progression;
pub mod registry;
pub mod store;

pub use catalog::{Catalog, QuizSummary};
pub use error::QuizError;
pub use grader::{Feedback, GradeOutcome, Grader, LineChooser, RandomChooser};
pub use leaderboard::{Leaderboard, Score, Scoreboard, format_elapsed, rank_scores};
pub use progression::{NextQuestion, Progression, QuestionView};
pub use registry::{Registration, Registry};
