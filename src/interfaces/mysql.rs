use itertools::Itertools;
use sqlx::mysql::MySqlConnectOptions;
use sqlx::{ConnectOptions, Connection};
use thiserror::Error;

use crate::data_mgmt::payload::MeasurementMap;
use crate::node_mgmt::config::MysqlServer;

#[derive(Error, Debug)]
pub enum MysqlSinkError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
    #[error("could not start database runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// `db.table` is quoted part by part
fn quote_table(name: &str) -> String {
    name.split('.').map(quote_identifier).join(".")
}

/// `INSERT` with one column per measurement and a placeholder per value
pub fn insert_statement<'a>(table: &str, columns: impl Iterator<Item = &'a str>) -> String {
    let columns = columns.map(quote_identifier).collect::<Vec<_>>();
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_table(table),
        columns.join(", "),
        std::iter::repeat("?").take(columns.len()).join(", ")
    )
}

/// Insert one row in its own transaction and close the connection
pub fn insert_report(
    server: &MysqlServer,
    measurements: &MeasurementMap,
) -> Result<u64, MysqlSinkError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(insert_row(server, measurements))
}

async fn insert_row(
    server: &MysqlServer,
    measurements: &MeasurementMap,
) -> Result<u64, MysqlSinkError> {
    let mut conn = MySqlConnectOptions::new()
        .host(&server.hostname)
        .port(server.port())
        .username(&server.username)
        .password(&server.password)
        .database(&server.database)
        .connect()
        .await?;

    let statement = insert_statement(&server.table, measurements.names());
    log::debug!("{} <- {:?}", statement, measurements);

    let mut tx = conn.begin().await?;
    let mut query = sqlx::query(&statement);
    for value in measurements.values() {
        query = query.bind(value);
    }
    let rows = query.execute(&mut *tx).await?.rows_affected();
    tx.commit().await?;

    conn.close().await?;
    Ok(rows)
}
