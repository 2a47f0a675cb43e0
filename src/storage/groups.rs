use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, ToSchema)]
#[sea_orm(table_name = "groups")]
#[serde(rename_all = "camelCase")]
#[schema(as = Group)]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub group_name: String,
    pub creator_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub async fn create<C: ConnectionTrait>(
    db: &C,
    group_name: String,
    creator_id: i32,
    now: DateTime<Utc>,
) -> Result<Model, DbErr> {
    ActiveModel {
        group_name: Set(group_name),
        creator_id: Set(creator_id),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
}

pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: i32) -> Result<Option<Model>, DbErr> {
    Entity::find_by_id(id).one(db).await
}

pub async fn find_all<C: ConnectionTrait>(db: &C) -> Result<Vec<Model>, DbErr> {
    Entity::find().order_by_asc(Column::Id).all(db).await
}

/// Groups whose name contains `pattern` (SQL `LIKE '%pattern%'`)
pub async fn find_by_name_pattern<C: ConnectionTrait>(
    db: &C,
    pattern: &str,
) -> Result<Vec<Model>, DbErr> {
    Entity::find()
        .filter(Column::GroupName.contains(pattern))
        .order_by_asc(Column::Id)
        .all(db)
        .await
}
