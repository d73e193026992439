//! Users table.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

use crate::{ResultEngine, Role};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for User {
    type Error = crate::EngineError;

    fn try_from(value: Model) -> ResultEngine<Self> {
        Ok(Self {
            id: value.id,
            role: Role::try_from(value.role.as_str())?,
            name: value.name,
            created_at: value.created_at,
            updated_at: value.updated_at,
        })
    }
}
