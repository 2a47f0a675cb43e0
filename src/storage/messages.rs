use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::Serialize;
use utoipa::ToSchema;

/// `kind` value marking a group-join request
pub const JOIN_REQUEST: &str = "join";

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, ToSchema)]
#[sea_orm(table_name = "messages")]
#[serde(rename_all = "camelCase")]
#[schema(as = Message)]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub subject: String,
    pub body: String,
    #[sea_orm(column_name = "type")]
    #[serde(rename = "type")]
    pub kind: String,
    pub sender_id: i32,
    /// Sender's display name at send time
    pub sender_name: String,
    #[serde(rename = "recepientId")]
    pub recipient_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub struct NewMessage {
    pub subject: String,
    pub body: String,
    pub kind: String,
    pub sender_id: i32,
    pub sender_name: String,
    pub recipient_id: i32,
}

pub async fn create<C: ConnectionTrait>(
    db: &C,
    message: NewMessage,
    now: DateTime<Utc>,
) -> Result<Model, DbErr> {
    ActiveModel {
        subject: Set(message.subject),
        body: Set(message.body),
        kind: Set(message.kind),
        sender_id: Set(message.sender_id),
        sender_name: Set(message.sender_name),
        recipient_id: Set(message.recipient_id),
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

/// Messages addressed to `recipient_id`, newest first
pub async fn find_for_recipient<C: ConnectionTrait>(
    db: &C,
    recipient_id: i32,
) -> Result<Vec<Model>, DbErr> {
    Entity::find()
        .filter(Column::RecipientId.eq(recipient_id))
        .order_by_desc(Column::Id)
        .all(db)
        .await
}

/// Returns true if a row was deleted
pub async fn delete<C: ConnectionTrait>(db: &C, id: i32) -> Result<bool, DbErr> {
    let result = Entity::delete_by_id(id).exec(db).await?;
    Ok(result.rows_affected > 0)
}
