use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A quiz. Seeded ahead of time and read-only while contestants play.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "quiz")]
pub struct Model {
    /// Lowercase slug used in URLs.
    #[sea_orm(primary_key, auto_increment = false)]
    pub quiz_id: String,

    pub name: String,
}

impl ActiveModelBehavior for ActiveModel {}
