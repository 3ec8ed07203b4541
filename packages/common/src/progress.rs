use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of answer options every question carries.
pub const OPTION_COUNT: u8 = 4;

/// Position of a contestant within a quiz.
///
/// Nothing stores this directly. It is rebuilt from the contestant's
/// `started`/`finished` stamps and `questions_answered` counter each time,
/// so every request sees the same state the store holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum QuizProgress {
    /// Registered but never served a question.
    Registered,
    /// Served question 1, nothing answered yet.
    Started,
    /// At least one answer graded, more questions remain.
    Answering { answered: u32 },
    /// Last active question graded.
    Finished,
}

/// Client-reported progress that disagrees with the store.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ProgressError {
    #[error("quiz has not been started")]
    NotStarted,

    #[error("quiz is already finished")]
    AlreadyFinished,

    #[error("expected an answer to question {expected}, got question {got}")]
    OutOfOrder { expected: u32, got: u32 },

    #[error("client reports {claimed} questions answered, store has {stored}")]
    Stale { claimed: u32, stored: u32 },
}

impl QuizProgress {
    /// Rebuild the state from stored counters.
    pub fn derive(started: bool, finished: bool, answered: u32, total: u32) -> Self {
        if finished {
            return Self::Finished;
        }
        if !started {
            return Self::Registered;
        }
        if answered >= total {
            Self::Finished
        } else if answered == 0 {
            Self::Started
        } else {
            Self::Answering { answered }
        }
    }

    /// 1-based number of the question to serve next, `None` once finished.
    pub fn next_question(&self) -> Option<u32> {
        match self {
            Self::Registered | Self::Started => Some(1),
            Self::Answering { answered } => Some(answered + 1),
            Self::Finished => None,
        }
    }

    /// Check a client's "last answered question" against the stored counter.
    ///
    /// A missing value means the client believes it is on its first visit.
    pub fn check_reported(claimed: Option<u32>, stored_answered: u32) -> Result<(), ProgressError> {
        let claimed = claimed.unwrap_or(0);
        if claimed != stored_answered {
            return Err(ProgressError::Stale {
                claimed,
                stored: stored_answered,
            });
        }
        Ok(())
    }

    /// Check that `question` is the one this contestant may answer now.
    pub fn check_answer(&self, question: u32) -> Result<(), ProgressError> {
        match self {
            Self::Registered => Err(ProgressError::NotStarted),
            Self::Finished => Err(ProgressError::AlreadyFinished),
            _ => {
                // Registered is handled above, so next_question is Some here.
                let expected = self.next_question().unwrap_or(1);
                if question == expected {
                    Ok(())
                } else {
                    Err(ProgressError::OutOfOrder {
                        expected,
                        got: question,
                    })
                }
            }
        }
    }
}

impl fmt::Display for QuizProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Registered => f.write_str("registered"),
            Self::Started => f.write_str("started"),
            Self::Answering { answered } => write!(f, "answering ({answered} answered)"),
            Self::Finished => f.write_str("finished"),
        }
    }
}

/// A selected answer option, 1 through [`OPTION_COUNT`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct AnswerOption(u8);

/// Error when a submitted selection is not an option number.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid answer '{invalid}'. Expected a number from 1 to {OPTION_COUNT}")]
pub struct ParseAnswerError {
    invalid: String,
}

impl AnswerOption {
    pub fn new(n: u8) -> Option<Self> {
        (1..=OPTION_COUNT).contains(&n).then_some(Self(n))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl FromStr for AnswerOption {
    type Err = ParseAnswerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u8>()
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| ParseAnswerError {
                invalid: s.to_string(),
            })
    }
}

impl TryFrom<u8> for AnswerOption {
    type Error = ParseAnswerError;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        Self::new(n).ok_or_else(|| ParseAnswerError {
            invalid: n.to_string(),
        })
    }
}

impl From<AnswerOption> for u8 {
    fn from(option: AnswerOption) -> Self {
        option.0
    }
}
