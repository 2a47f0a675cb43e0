use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::Serialize;
use utoipa::ToSchema;

use crate::authz::Owned;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, ToSchema)]
#[sea_orm(table_name = "groceries")]
#[serde(rename_all = "camelCase")]
#[schema(as = Grocery)]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub grocery_name: String,
    pub quantity: i32,
    pub complete: bool,
    #[serde(rename = "UserId")]
    pub user_id: i32,
    #[serde(rename = "GroupId")]
    pub group_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Owned for Model {
    const RESOURCE: &'static str = "Grocery";

    fn id(&self) -> i32 {
        self.id
    }

    fn owner_id(&self) -> i32 {
        self.user_id
    }

    fn group_id(&self) -> i32 {
        self.group_id
    }
}

pub struct NewGrocery {
    pub grocery_name: String,
    pub quantity: i32,
    pub user_id: i32,
    pub group_id: i32,
}

#[derive(Debug, Default)]
pub struct GroceryChanges {
    pub grocery_name: Option<String>,
    pub quantity: Option<i32>,
    pub complete: Option<bool>,
}

pub async fn create<C: ConnectionTrait>(
    db: &C,
    grocery: NewGrocery,
    now: DateTime<Utc>,
) -> Result<Model, DbErr> {
    ActiveModel {
        grocery_name: Set(grocery.grocery_name),
        quantity: Set(grocery.quantity),
        complete: Set(false),
        user_id: Set(grocery.user_id),
        group_id: Set(grocery.group_id),
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

pub async fn find_for_group<C: ConnectionTrait>(
    db: &C,
    group_id: i32,
) -> Result<Vec<Model>, DbErr> {
    Entity::find()
        .filter(Column::GroupId.eq(group_id))
        .order_by_asc(Column::Id)
        .all(db)
        .await
}

pub async fn update<C: ConnectionTrait>(
    db: &C,
    current: Model,
    changes: GroceryChanges,
    now: DateTime<Utc>,
) -> Result<Model, DbErr> {
    let mut active: ActiveModel = current.into();
    if let Some(grocery_name) = changes.grocery_name {
        active.grocery_name = Set(grocery_name);
    }
    if let Some(quantity) = changes.quantity {
        active.quantity = Set(quantity);
    }
    if let Some(complete) = changes.complete {
        active.complete = Set(complete);
    }
    active.updated_at = Set(now);

    active.update(db).await
}

pub async fn delete<C: ConnectionTrait>(db: &C, id: i32) -> Result<bool, DbErr> {
    let result = Entity::delete_by_id(id).exec(db).await?;
    Ok(result.rows_affected > 0)
}
