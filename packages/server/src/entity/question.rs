use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "question")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique_key = "quiz_position")]
    pub quiz_id: String,

    /// Unique within a quiz; gaps are allowed.
    #[sea_orm(unique_key = "quiz_position")]
    pub sort_order: i32,

    #[sea_orm(column_type = "Text")]
    pub question: String,

    pub answer_1: String,
    pub answer_2: String,
    pub answer_3: String,
    pub answer_4: String,

    /// Index of the correct answer, 1-4.
    pub correct_answer: i32,

    /// Soft-delete flag. Inactive questions are neither served nor counted.
    #[sea_orm(default_value = true)]
    pub active: bool,
}

impl Model {
    /// Answer texts in option order (option 1 first).
    pub fn answers(&self) -> [&str; 4] {
        [
            self.answer_1.as_str(),
            self.answer_2.as_str(),
            self.answer_3.as_str(),
            self.answer_4.as_str(),
        ]
    }
}

impl ActiveModelBehavior for ActiveModel {}
