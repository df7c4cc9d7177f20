use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::Value;
use thiserror::Error;
use ureq::tls::{TlsConfig, TlsProvider};

use crate::data_mgmt::payload::ReportPayload;
use crate::node_mgmt::config::HttpServer;

const ON_DEMAND_PREFIX: &str = "variable";

#[derive(Error, Debug)]
pub enum HttpSinkError {
    #[error("invalid server URL: {0}")]
    Url(#[from] url::ParseError),
    #[error(transparent)]
    Request(#[from] ureq::Error),
    #[error("could not parse response JSON: {0}")]
    Response(#[from] serde_json::Error),
}

/// Blocking agent using the platform TLS stack, with transport-default timeouts
pub fn agent(verify_tls: bool) -> ureq::Agent {
    let tls = TlsConfig::builder()
        .provider(TlsProvider::NativeTls)
        .disable_verification(!verify_tls)
        .build();
    ureq::Agent::new_with_config(ureq::Agent::config_builder().tls_config(tls).build())
}

fn basic_auth(username: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{username}:{password}")))
}

/// POST a report and return the variable names the collector asked for in reply
pub fn post_report(
    agent: &ureq::Agent,
    server: &HttpServer,
    payload: &ReportPayload,
) -> Result<Vec<String>, HttpSinkError> {
    let url = server.endpoint()?;
    log::debug!("POST {}: {:?}", url, payload);

    let mut response = agent
        .post(url.as_str())
        .header(
            "Authorization",
            basic_auth(&server.username, &server.password).as_str(),
        )
        .send_json(payload)?;
    let body = response.body_mut().read_to_string()?;
    log::debug!("Response from {}: {}", url, body);

    Ok(on_demand_variables(&body)?)
}

/// Names under `variable0`, `variable1`, ... until the first missing slot
///
/// An empty body or a non-object response requests nothing; blank names are skipped.
pub fn on_demand_variables(body: &str) -> Result<Vec<String>, serde_json::Error> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }
    let Value::Object(response) = serde_json::from_str::<Value>(body)? else {
        return Ok(Vec::new());
    };

    let mut names = Vec::new();
    for index in 0usize.. {
        match response.get(&format!("{ON_DEMAND_PREFIX}{index}")) {
            None | Some(Value::Null) => break,
            Some(Value::String(name)) if name.is_empty() => {}
            Some(Value::String(name)) => names.push(name.clone()),
            Some(Value::Number(n)) => names.push(n.to_string()),
            Some(other) => {
                log::warn!("Ignoring on-demand slot {}{}: {}", ON_DEMAND_PREFIX, index, other)
            }
        }
    }
    Ok(names)
}
