use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::Serialize;
use utoipa::ToSchema;

use crate::authz::Owned;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, ToSchema)]
#[sea_orm(table_name = "chores")]
#[serde(rename_all = "camelCase")]
#[schema(as = Chore)]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub chore: String,
    pub complete: bool,
    /// Weekday abbreviation ("Mon".."Sun") the chore recurs on
    pub recur_date: String,
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
    const RESOURCE: &'static str = "Chore";

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

pub struct NewChore {
    pub chore: String,
    pub recur_date: String,
    pub user_id: i32,
    pub group_id: i32,
}

#[derive(Debug, Default)]
pub struct ChoreChanges {
    pub chore: Option<String>,
    pub recur_date: Option<String>,
    pub complete: Option<bool>,
}

pub async fn create<C: ConnectionTrait>(
    db: &C,
    chore: NewChore,
    now: DateTime<Utc>,
) -> Result<Model, DbErr> {
    ActiveModel {
        chore: Set(chore.chore),
        complete: Set(false),
        recur_date: Set(chore.recur_date),
        user_id: Set(chore.user_id),
        group_id: Set(chore.group_id),
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
    changes: ChoreChanges,
    now: DateTime<Utc>,
) -> Result<Model, DbErr> {
    let mut active: ActiveModel = current.into();
    if let Some(chore) = changes.chore {
        active.chore = Set(chore);
    }
    if let Some(recur_date) = changes.recur_date {
        active.recur_date = Set(recur_date);
    }
    if let Some(complete) = changes.complete {
        active.complete = Set(complete);
    }
    active.updated_at = Set(now);

    active.update(db).await
}

/// Mark every chore, in every group, incomplete unless it recurs on `today`.
///
/// Returns the number of rows touched.
pub async fn reset_stale<C: ConnectionTrait>(db: &C, today: &str) -> Result<u64, DbErr> {
    let result = Entity::update_many()
        .col_expr(Column::Complete, Expr::value(false))
        .filter(Column::RecurDate.ne(today))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

pub async fn delete<C: ConnectionTrait>(db: &C, id: i32) -> Result<bool, DbErr> {
    let result = Entity::delete_by_id(id).exec(db).await?;
    Ok(result.rows_affected > 0)
}
