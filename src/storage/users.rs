use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{
    ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QuerySelect, Set, SqlErr,
};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, ToSchema)]
#[sea_orm(table_name = "users")]
#[serde(rename_all = "camelCase")]
#[schema(as = User)]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub email: String,
    /// argon2id PHC string
    #[serde(skip)]
    pub password: String,
    pub name: String,
    #[serde(rename = "GroupId")]
    pub group_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Data for inserting a user; `password_hash` is already hashed
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub name: String,
}

/// Patchable user fields
#[derive(Debug, Default)]
pub struct UserChanges {
    pub name: Option<String>,
    pub group_id: Option<Option<i32>>,
}

pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: i32) -> Result<Option<Model>, DbErr> {
    Entity::find_by_id(id).one(db).await
}

pub async fn find_by_email<C: ConnectionTrait>(
    db: &C,
    email: &str,
) -> Result<Option<Model>, DbErr> {
    Entity::find().filter(Column::Email.eq(email)).one(db).await
}

pub async fn email_exists<C: ConnectionTrait>(db: &C, email: &str) -> Result<bool, DbErr> {
    let count = Entity::find()
        .filter(Column::Email.eq(email))
        .count(db)
        .await?;
    Ok(count > 0)
}

/// True when `err` came from the unique index on `email`
pub fn is_duplicate_email(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

pub async fn create<C: ConnectionTrait>(
    db: &C,
    new_user: NewUser,
    now: DateTime<Utc>,
) -> Result<Model, DbErr> {
    ActiveModel {
        email: Set(new_user.email),
        password: Set(new_user.password_hash),
        name: Set(new_user.name),
        group_id: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
}

/// Apply `changes` to the row with `id`; `None` when the row is gone
pub async fn update<C: ConnectionTrait>(
    db: &C,
    id: i32,
    changes: UserChanges,
    now: DateTime<Utc>,
) -> Result<Option<Model>, DbErr> {
    let Some(current) = find_by_id(db, id).await? else {
        return Ok(None);
    };

    let mut active: ActiveModel = current.into();
    if let Some(name) = changes.name {
        active.name = Set(name);
    }
    if let Some(group_id) = changes.group_id {
        active.group_id = Set(group_id);
    }
    active.updated_at = Set(now);

    active.update(db).await.map(Some)
}

/// Display names of every user
pub async fn list_names<C: ConnectionTrait>(db: &C) -> Result<Vec<String>, DbErr> {
    Entity::find()
        .select_only()
        .column(Column::Name)
        .into_tuple::<String>()
        .all(db)
        .await
}
