use serde::Deserialize;

/// Lines shown to a contestant after an answer is graded.
///
/// Read once at startup and handed to the grader; never mutated afterwards.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct FeedbackConfig {
    /// Pool for correct answers. Default: the stock affirmations.
    #[serde(default = "default_correct_lines")]
    pub correct: Vec<String>,
    /// Pool for incorrect answers. Default: the stock commiserations.
    #[serde(default = "default_incorrect_lines")]
    pub incorrect: Vec<String>,
}

fn default_correct_lines() -> Vec<String> {
    [
        "Well done, you're smarter than you look",
        "Come on, that was a lucky guess wasn't it? I won't tell anyone...",
        "Way to go",
        "Your knowledge is impressive",
        "Even Santa couldn't answer that one!",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_incorrect_lines() -> Vec<String> {
    [
        "Better luck with the next one",
        "Rudolph could have answered it",
        "You may get replaced by ChatGPT at this rate...",
        "How did you not know that?!?",
        "You've made the elves cry",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            correct: default_correct_lines(),
            incorrect: default_incorrect_lines(),
        }
    }
}

impl FeedbackConfig {
    /// Replace empty pools with the defaults so selection always has a line.
    pub fn normalized(mut self) -> Self {
        if self.correct.is_empty() {
            self.correct = default_correct_lines();
        }
        if self.incorrect.is_empty() {
            self.incorrect = default_incorrect_lines();
        }
        self
    }
}
