//! Relational store: sea-orm entities and the queries the handlers issue
//!
//! Each submodule owns one table. Query helpers take any connection so they
//! can run against a pool or a transaction.

pub mod bills;
pub mod chores;
pub mod groceries;
pub mod groups;
pub mod messages;
pub mod users;

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Schema};
use tracing::info;

use crate::config::DatabaseConfig;

/// Open the connection pool described by the configuration
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .sqlx_logging(config.sqlx_logging);

    // Every pooled connection to an in-memory SQLite url is its own database
    if config.url.contains(":memory:") {
        options.max_connections(1).min_connections(1);
    }

    let db = Database::connect(options).await?;
    info!(backend = ?db.get_database_backend(), "Connected to database");
    Ok(db)
}

/// Create all tables that do not exist yet
pub async fn init_schema<C>(db: &C) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    let statements = [
        schema.create_table_from_entity(groups::Entity),
        schema.create_table_from_entity(users::Entity),
        schema.create_table_from_entity(messages::Entity),
        schema.create_table_from_entity(bills::Entity),
        schema.create_table_from_entity(groceries::Entity),
        schema.create_table_from_entity(chores::Entity),
    ];

    for mut statement in statements {
        statement.if_not_exists();
        db.execute(backend.build(&statement)).await?;
    }

    Ok(())
}
