use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::shared::string_or_number;
use crate::quiz::Score;

#[derive(Deserialize, ToSchema)]
pub struct RegisterRequest {
    /// Display name, 1-64 characters after trimming.
    #[schema(example = "Alice")]
    pub name: String,
}

#[derive(Deserialize, ToSchema)]
pub struct NextQuestionRequest {
    /// Falls back to the `contestant-id` cookie when absent.
    pub contestant_id: Option<String>,
    /// Number of the last question the client answered. Omit on the first visit.
    #[schema(example = 2)]
    pub last_answered: Option<u32>,
}

#[derive(Deserialize, ToSchema)]
pub struct AnswerRequest {
    /// Falls back to the `contestant-id` cookie when absent.
    pub contestant_id: Option<String>,
    /// 1-based question number being answered.
    #[schema(example = 1)]
    pub question: u32,
    /// Selected option, 1-4. Sent as a string or a number.
    #[serde(deserialize_with = "string_or_number")]
    #[schema(value_type = String, example = "3")]
    pub answer: String,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ScoreboardQuery {
    /// Contestant id. Falls back to the `contestant-id` cookie when absent.
    pub c: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct GroupScoreboardResponse {
    pub quiz_id: String,
    pub group: String,
    pub scores: Vec<Score>,
}
