use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One contestant's registration and running tally.
///
/// Created at registration and only ever mutated by single-statement
/// updates (counter increments and `IS NULL`-guarded timestamps).
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "score")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Derived from (name, quiz, group); see `common::identity`.
    #[sea_orm(unique)]
    pub contestant_id: String,

    #[sea_orm(unique_key = "quiz_group_name")]
    pub quiz_id: String,

    /// Always stored lowercase.
    #[sea_orm(column_name = "group_name", unique_key = "quiz_group_name")]
    pub group: String,

    #[sea_orm(unique_key = "quiz_group_name")]
    pub name: String,

    pub correct_answers: i32,
    pub questions_answered: i32,

    pub started: Option<DateTimeUtc>,
    pub finished: Option<DateTimeUtc>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
