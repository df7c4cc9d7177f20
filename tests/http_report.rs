use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;

use marshal::data_mgmt::run_cycle;
use marshal::interfaces::SinkDispatcher;
use marshal::node_mgmt::config::{self, Config};

mod stubs;

use stubs::station::{builder, station};

fn http_config(server: &ServerGuard) -> Config {
    let url = url::Url::parse(&server.url()).unwrap();
    let raw = json!({
        "servers": {
            "collector": {
                "protocol": "http",
                "hostname": url.host_str().unwrap(),
                "portnumber": url.port().unwrap(),
                "path": "/report",
                "username": "node",
                "password": "secret",
                "certificate": false
            }
        },
        "measurementSets": {
            "pv": {"variable0": "currentPV", "variable1": "hostname"}
        },
        "combinations": {
            "combination0": {"measurementSet": "pv", "server": "collector"}
        },
        "timezone": "Asia/Kolkata"
    });
    config::from_str(&raw.to_string()).unwrap()
}

#[test]
fn test_on_demand_follow_up_is_posted() {
    let mut server = Server::new();
    let first = server
        .mock("POST", "/report")
        .match_header("Authorization", "Basic bm9kZTpzZWNyZXQ=")
        .match_body(Matcher::PartialJson(json!({
            "h": {"isOnDemand": "False", "isSane": true},
            "m": {"currentPV": "50.0", "hostname": "pi-7"}
        })))
        .with_body(r#"{"variable0": "voltagePV"}"#)
        .expect(1)
        .create();
    let second = server
        .mock("POST", "/report")
        .match_body(Matcher::PartialJson(json!({
            "t": "2023-11-15 03:43:20.000000",
            "h": {"isOnDemand": "True"},
            "m": {"voltagePV": "2300.0"}
        })))
        .with_body("{}")
        .expect(1)
        .create();

    let config = http_config(&server);
    let (mut station, measures) = station(stubs::config::HARDWARE_CONFIG);
    let summary =
        run_cycle(&config, &mut station, &builder(&config), &mut SinkDispatcher).unwrap();

    first.assert();
    second.assert();
    assert_eq!(summary.dispatched, 1);
    assert_eq!(summary.on_demand, 1);
    assert_eq!(measures.get(), 2);
}

#[test]
fn test_no_follow_up_without_variables() {
    let mut server = Server::new();
    let report = server
        .mock("POST", "/report")
        .match_body(Matcher::PartialJson(json!({"h": {"isOnDemand": "False"}})))
        .with_body(r#"{"status": "ok"}"#)
        .expect(1)
        .create();
    let follow_up = server
        .mock("POST", "/report")
        .match_body(Matcher::PartialJson(json!({"h": {"isOnDemand": "True"}})))
        .expect(0)
        .create();

    let config = http_config(&server);
    let (mut station, _) = station(stubs::config::HARDWARE_CONFIG);
    let summary =
        run_cycle(&config, &mut station, &builder(&config), &mut SinkDispatcher).unwrap();

    report.assert();
    follow_up.assert();
    assert_eq!(summary.on_demand, 0);
}

#[test]
fn test_server_error_fails_the_cycle() {
    let mut server = Server::new();
    let _report = server.mock("POST", "/report").with_status(500).create();

    let config = http_config(&server);
    let (mut station, _) = station(stubs::config::HARDWARE_CONFIG);
    assert!(run_cycle(&config, &mut station, &builder(&config), &mut SinkDispatcher).is_err());
}
