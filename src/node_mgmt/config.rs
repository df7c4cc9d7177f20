//! Software configuration record (`cS.json`)
//!
//! The on-disk format numbers its entries positionally (`combination0`, `variable3`,
//! `variableAlternate1`, ...). Loading walks each numbered sequence from zero until the
//! first missing key and turns it into an ordered list, then checks that every
//! combination points at a measurement set and a server that exist.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use chrono_tz::Tz;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use url::Url;

use crate::constants::defaults;
use crate::readers::sanity::Sanity;

use super::de::lenient_opt;

const COMBINATION_PREFIX: &str = "combination";
const VARIABLE_PREFIX: &str = "variable";
const ALTERNATE_PREFIX: &str = "variableAlternate";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("could not parse config JSON: {0}")]
    ParseJson(#[from] serde_json::Error),
    #[error("combination {index} references unknown measurement set '{name}'")]
    UnknownMeasurementSet { index: usize, name: String },
    #[error("combination {index} references unknown server '{name}'")]
    UnknownServer { index: usize, name: String },
    #[error("invalid timezone '{0}'")]
    Timezone(String),
}

#[derive(Clone, Debug)]
pub struct Config {
    pub servers: HashMap<String, ServerConfig>,
    pub measurement_sets: HashMap<String, MeasurementSet>,
    pub combinations: Vec<Combination>,
    pub timezone: Tz,
    pub stop_on_empty_set: bool,
}

impl Config {
    pub fn measurement_set(&self, name: &str) -> Option<&MeasurementSet> {
        self.measurement_sets.get(name)
    }

    pub fn server(&self, name: &str) -> Option<&ServerConfig> {
        self.servers.get(name)
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(tag = "protocol", rename_all = "lowercase")]
pub enum ServerConfig {
    Http(HttpServer),
    Mysql(MysqlServer),
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct HttpServer {
    pub hostname: String,
    #[serde(default, deserialize_with = "lenient_opt")]
    pub portnumber: Option<u16>,
    #[serde(default = "default_path")]
    pub path: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    /// Verify the server's TLS certificate
    #[serde(default = "default_true")]
    pub certificate: bool,
    #[serde(default = "default_scheme")]
    pub scheme: String,
}

impl HttpServer {
    pub fn endpoint(&self) -> Result<Url, url::ParseError> {
        let port = self
            .portnumber
            .map(|p| format!(":{p}"))
            .unwrap_or_default();
        let path = if self.path.starts_with('/') {
            self.path.clone()
        } else {
            format!("/{}", self.path)
        };
        Url::parse(&format!("{}://{}{}{}", self.scheme, self.hostname, port, path))
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct MysqlServer {
    pub hostname: String,
    #[serde(default, deserialize_with = "lenient_opt")]
    pub portnumber: Option<u16>,
    pub username: String,
    #[serde(default)]
    pub password: String,
    pub database: String,
    pub table: String,
}

impl MysqlServer {
    pub fn port(&self) -> u16 {
        self.portnumber.unwrap_or(defaults::MYSQL_PORT)
    }
}

/// Variables reported to one server, with a fallback list for an unsane device
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(try_from = "HashMap<String, Value>")]
pub struct MeasurementSet {
    pub variables: Vec<String>,
    pub alternates: Vec<String>,
}

impl MeasurementSet {
    /// Names to report given the device's current sanity
    pub fn select(&self, sanity: Sanity) -> &[String] {
        if sanity.is_bad() {
            &self.alternates
        } else {
            &self.variables
        }
    }
}

impl TryFrom<HashMap<String, Value>> for MeasurementSet {
    type Error = String;

    fn try_from(slots: HashMap<String, Value>) -> Result<Self, Self::Error> {
        Ok(MeasurementSet {
            variables: walk_slots(&slots, VARIABLE_PREFIX)?,
            alternates: walk_slots(&slots, ALTERNATE_PREFIX)?,
        })
    }
}

/// Collect `{prefix}0`, `{prefix}1`, ... until the first missing or null slot.
/// Blank names keep their position but are not reported.
fn walk_slots(slots: &HashMap<String, Value>, prefix: &str) -> Result<Vec<String>, String> {
    let mut names = Vec::new();
    for index in 0usize.. {
        match slots.get(&format!("{prefix}{index}")) {
            None | Some(Value::Null) => break,
            Some(Value::String(name)) if name.is_empty() => {}
            Some(Value::String(name)) => names.push(name.clone()),
            Some(Value::Number(n)) => names.push(n.to_string()),
            Some(other) => {
                return Err(format!(
                    "slot {prefix}{index} must name a measurement, found {other}"
                ))
            }
        }
    }
    Ok(names)
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Combination {
    pub measurement_set: String,
    pub server: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawConfig {
    servers: HashMap<String, ServerConfig>,
    measurement_sets: HashMap<String, MeasurementSet>,
    combinations: HashMap<String, Combination>,
    #[serde(default)]
    timezone: Option<String>,
    #[serde(default = "default_true")]
    stop_on_empty_set: bool,
}

impl TryFrom<RawConfig> for Config {
    type Error = ConfigError;

    fn try_from(mut raw: RawConfig) -> Result<Self, Self::Error> {
        let mut combinations = Vec::new();
        while let Some(combination) = raw
            .combinations
            .remove(&format!("{COMBINATION_PREFIX}{}", combinations.len()))
        {
            let index = combinations.len();
            if !raw.measurement_sets.contains_key(&combination.measurement_set) {
                return Err(ConfigError::UnknownMeasurementSet {
                    index,
                    name: combination.measurement_set,
                });
            }
            if !raw.servers.contains_key(&combination.server) {
                return Err(ConfigError::UnknownServer {
                    index,
                    name: combination.server,
                });
            }
            combinations.push(combination);
        }
        for key in raw.combinations.keys() {
            log::warn!("Ignoring unreachable combination '{}'", key);
        }

        let timezone_name = raw.timezone.as_deref().unwrap_or(defaults::TIMEZONE);
        let timezone = timezone_name
            .parse::<Tz>()
            .map_err(|_| ConfigError::Timezone(timezone_name.to_string()))?;

        Ok(Config {
            servers: raw.servers,
            measurement_sets: raw.measurement_sets,
            combinations,
            timezone,
            stop_on_empty_set: raw.stop_on_empty_set,
        })
    }
}

pub fn from_str(config_raw: &str) -> Result<Config, ConfigError> {
    serde_json::from_str::<RawConfig>(config_raw)?.try_into()
}

pub fn load(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|e| ConfigError::Read {
        path: path.display().to_string(),
        source: e,
    })?;
    let config = from_str(&raw)?;
    log::debug!(
        "Loaded software configuration: {} server(s), {} measurement set(s), {} combination(s)",
        config.servers.len(),
        config.measurement_sets.len(),
        config.combinations.len()
    );
    Ok(config)
}

fn default_true() -> bool {
    true
}

fn default_path() -> String {
    String::from("/")
}

fn default_scheme() -> String {
    String::from("http")
}

#[cfg(test)]
mod tests {
    use super::*;

    use once_cell::sync::Lazy;

    static SAMPLE_CONFIG: Lazy<Config> = Lazy::new(|| {
        from_str(
            r#"
        {
            "servers": {
                "cloud": {
                    "protocol": "http",
                    "hostname": "collector.example.com",
                    "portnumber": "8080",
                    "path": "/api/report",
                    "username": "node",
                    "password": "secret"
                },
                "archive": {
                    "protocol": "mysql",
                    "hostname": "db.local",
                    "username": "writer",
                    "password": "pwd",
                    "database": "plant",
                    "table": "readings"
                }
            },
            "measurementSets": {
                "full": {
                    "variable0": "voltagePV",
                    "variable1": "currentPV",
                    "variable2": "",
                    "variable3": "powerGrid",
                    "variable5": "orphaned",
                    "variableAlternate0": "temperature_cpu"
                },
                "lean": {"variable0": "powerGrid"}
            },
            "combinations": {
                "combination0": {"measurementSet": "full", "server": "cloud"},
                "combination1": {"measurementSet": "lean", "server": "archive"}
            }
        }
        "#,
        )
        .unwrap()
    });

    #[test]
    fn test_slots_become_ordered_lists() {
        let full = SAMPLE_CONFIG.measurement_set("full").unwrap();
        assert_eq!(full.variables, vec!["voltagePV", "currentPV", "powerGrid"]);
        assert_eq!(full.alternates, vec!["temperature_cpu"]);

        let lean = SAMPLE_CONFIG.measurement_set("lean").unwrap();
        assert!(lean.alternates.is_empty());
    }

    #[test]
    fn test_select_follows_sanity() {
        let full = SAMPLE_CONFIG.measurement_set("full").unwrap();
        assert_eq!(full.select(Sanity::Bad), &["temperature_cpu".to_string()]);
        assert_eq!(full.select(Sanity::Good).len(), 3);
        assert_eq!(full.select(Sanity::Unknown).len(), 3);
    }

    #[test]
    fn test_combinations_in_order() {
        assert_eq!(SAMPLE_CONFIG.combinations.len(), 2);
        assert_eq!(SAMPLE_CONFIG.combinations[0].server, "cloud");
        assert_eq!(SAMPLE_CONFIG.combinations[1].measurement_set, "lean");
    }

    #[test]
    fn test_defaults() {
        assert_eq!(SAMPLE_CONFIG.timezone, chrono_tz::Asia::Calcutta);
        assert!(SAMPLE_CONFIG.stop_on_empty_set);
        let Some(ServerConfig::Mysql(archive)) = SAMPLE_CONFIG.server("archive") else {
            panic!("archive should be a mysql server");
        };
        assert_eq!(archive.port(), 3306);
    }

    #[test]
    fn test_http_endpoint() {
        let Some(ServerConfig::Http(cloud)) = SAMPLE_CONFIG.server("cloud") else {
            panic!("cloud should be an http server");
        };
        assert!(cloud.certificate);
        assert_eq!(
            cloud.endpoint().unwrap().as_str(),
            "http://collector.example.com:8080/api/report"
        );

        let bare = HttpServer {
            portnumber: None,
            path: "ingest".into(),
            scheme: "https".into(),
            ..cloud.clone()
        };
        assert_eq!(
            bare.endpoint().unwrap().as_str(),
            "https://collector.example.com/ingest"
        );
    }

    #[test]
    fn test_dangling_references_are_rejected() {
        let result = from_str(
            r#"
        {
            "servers": {},
            "measurementSets": {"lean": {"variable0": "powerGrid"}},
            "combinations": {"combination0": {"measurementSet": "lean", "server": "nowhere"}}
        }
        "#,
        );
        assert!(matches!(
            result,
            Err(ConfigError::UnknownServer { index: 0, ref name }) if name == "nowhere"
        ));

        let result = from_str(
            r#"
        {
            "servers": {},
            "measurementSets": {},
            "combinations": {"combination0": {"measurementSet": "missing", "server": "nowhere"}}
        }
        "#,
        );
        assert!(matches!(
            result,
            Err(ConfigError::UnknownMeasurementSet { index: 0, .. })
        ));
    }

    #[test]
    fn test_bad_timezone_and_slot() {
        let result = from_str(
            r#"{"servers": {}, "measurementSets": {}, "combinations": {}, "timezone": "Mars/Olympus"}"#,
        );
        assert!(matches!(result, Err(ConfigError::Timezone(_))));

        let result = from_str(
            r#"{"servers": {}, "measurementSets": {"s": {"variable0": ["x"]}}, "combinations": {}}"#,
        );
        assert!(matches!(result, Err(ConfigError::ParseJson(_))));
    }

    #[test]
    fn test_gap_in_combinations_stops_the_walk() {
        let config = from_str(
            r#"
        {
            "servers": {"db": {"protocol": "mysql", "hostname": "h", "username": "u", "database": "d", "table": "t"}},
            "measurementSets": {"s": {"variable0": "powerGrid"}},
            "combinations": {
                "combination0": {"measurementSet": "s", "server": "db"},
                "combination2": {"measurementSet": "s", "server": "db"}
            },
            "stopOnEmptySet": false,
            "timezone": "UTC"
        }
        "#,
        )
        .unwrap();
        assert_eq!(config.combinations.len(), 1);
        assert!(!config.stop_on_empty_set);
        assert_eq!(config.timezone, Tz::UTC);
    }
}
