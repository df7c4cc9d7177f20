use thiserror::Error;

pub mod host_info;
pub mod http_api;
pub mod mysql;

pub use host_info::{HostInfo, SystemHostInfo};
pub use http_api::HttpSinkError;
pub use mysql::MysqlSinkError;

use crate::data_mgmt::payload::ReportPayload;
use crate::node_mgmt::config::ServerConfig;

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("HTTP report failed: {0}")]
    Http(#[from] HttpSinkError),
    #[error("MySQL insert failed: {0}")]
    Mysql(#[from] MysqlSinkError),
}

/// Deliver one report to a server, returning any variable names requested in reply
pub trait Dispatch {
    fn dispatch(
        &mut self,
        server: &ServerConfig,
        payload: &ReportPayload,
    ) -> Result<Vec<String>, DispatchError>;
}

/// Sends reports over the configured transports
#[derive(Clone, Copy, Debug, Default)]
pub struct SinkDispatcher;

impl Dispatch for SinkDispatcher {
    fn dispatch(
        &mut self,
        server: &ServerConfig,
        payload: &ReportPayload,
    ) -> Result<Vec<String>, DispatchError> {
        match server {
            ServerConfig::Http(http) => {
                let agent = http_api::agent(http.certificate);
                Ok(http_api::post_report(&agent, http, payload)?)
            }
            ServerConfig::Mysql(db) => {
                let rows = mysql::insert_report(db, &payload.m)?;
                log::debug!("Inserted {} row(s) into {}", rows, db.table);
                Ok(Vec::new())
            }
        }
    }
}
