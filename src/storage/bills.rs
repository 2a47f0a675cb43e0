use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::Serialize;
use utoipa::ToSchema;

use crate::authz::Owned;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, ToSchema)]
#[sea_orm(table_name = "bills")]
#[serde(rename_all = "camelCase")]
#[schema(as = Bill)]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub bill_name: String,
    pub amount: f64,
    pub complete: bool,
    #[serde(rename = "UserId")]
    pub user_id: i32,
    #[serde(rename = "GroupId")]
    pub group_id: i32,
    /// Empty when no attachment was uploaded
    pub file_url: String,
    pub thumb_url: String,
    pub month: String,
    pub year: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Owned for Model {
    const RESOURCE: &'static str = "Bill";

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

pub struct NewBill {
    pub bill_name: String,
    pub amount: f64,
    pub user_id: i32,
    pub group_id: i32,
    pub file_url: String,
    pub thumb_url: String,
    pub month: String,
    pub year: i32,
}

#[derive(Debug, Default)]
pub struct BillChanges {
    pub bill_name: Option<String>,
    pub amount: Option<f64>,
    pub month: Option<String>,
    pub complete: Option<bool>,
}

/// Insert a bill; new bills always start incomplete
pub async fn create<C: ConnectionTrait>(
    db: &C,
    bill: NewBill,
    now: DateTime<Utc>,
) -> Result<Model, DbErr> {
    ActiveModel {
        bill_name: Set(bill.bill_name),
        amount: Set(bill.amount),
        complete: Set(false),
        user_id: Set(bill.user_id),
        group_id: Set(bill.group_id),
        file_url: Set(bill.file_url),
        thumb_url: Set(bill.thumb_url),
        month: Set(bill.month),
        year: Set(bill.year),
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

/// Bills of a group, optionally narrowed to a month and/or year
pub async fn find_for_group<C: ConnectionTrait>(
    db: &C,
    group_id: i32,
    month: Option<&str>,
    year: Option<i32>,
) -> Result<Vec<Model>, DbErr> {
    let mut query = Entity::find().filter(Column::GroupId.eq(group_id));
    if let Some(month) = month {
        query = query.filter(Column::Month.eq(month));
    }
    if let Some(year) = year {
        query = query.filter(Column::Year.eq(year));
    }
    query.order_by_asc(Column::Id).all(db).await
}

/// Apply `changes` to an already loaded row and return the stored result
pub async fn update<C: ConnectionTrait>(
    db: &C,
    current: Model,
    changes: BillChanges,
    now: DateTime<Utc>,
) -> Result<Model, DbErr> {
    let mut active: ActiveModel = current.into();
    if let Some(bill_name) = changes.bill_name {
        active.bill_name = Set(bill_name);
    }
    if let Some(amount) = changes.amount {
        active.amount = Set(amount);
    }
    if let Some(month) = changes.month {
        active.month = Set(month);
    }
    if let Some(complete) = changes.complete {
        active.complete = Set(complete);
    }
    active.updated_at = Set(now);

    active.update(db).await
}

/// Returns true if a row was deleted
pub async fn delete<C: ConnectionTrait>(db: &C, id: i32) -> Result<bool, DbErr> {
    let result = Entity::delete_by_id(id).exec(db).await?;
    Ok(result.rows_affected > 0)
}
