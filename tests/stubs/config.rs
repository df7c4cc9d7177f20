#![allow(dead_code)]

pub const SOFTWARE_CONFIG: &str = r#"
{
    "servers": {
        "collector": {
            "protocol": "http",
            "hostname": "collector.example.com",
            "path": "/report",
            "username": "node",
            "password": "secret"
        },
        "archive": {
            "protocol": "mysql",
            "hostname": "db.example.com",
            "username": "writer",
            "password": "pwd",
            "database": "plant",
            "table": "readings"
        }
    },
    "measurementSets": {
        "pv": {
            "variable0": "voltagePV",
            "variable1": "currentPV",
            "variable2": "hostname",
            "variableAlternate0": "voltagePV"
        },
        "host": {
            "variable0": "hostname",
            "variable1": "uptime"
        }
    },
    "combinations": {
        "combination0": {"measurementSet": "pv", "server": "collector"},
        "combination1": {"measurementSet": "host", "server": "archive"}
    },
    "timezone": "Asia/Kolkata",
    "stopOnEmptySet": true
}
"#;

/// Host-only set first, so an unsane device leaves it empty
pub const EMPTY_FIRST_CONFIG: &str = r#"
{
    "servers": {
        "collector": {"protocol": "http", "hostname": "collector.example.com"}
    },
    "measurementSets": {
        "host": {"variable0": "hostname"},
        "pv": {"variable0": "voltagePV", "variableAlternate0": "voltagePV"}
    },
    "combinations": {
        "combination0": {"measurementSet": "host", "server": "collector"},
        "combination1": {"measurementSet": "pv", "server": "collector"}
    },
    "stopOnEmptySet": true
}
"#;

pub const BAD_SOFTWARE_CONFIG: &str = r#"
{
    "servers": {},
    "measurementSets": {"pv": {"variable0": "voltagePV"}},
    "combinations": {"combination0": {"measurementSet": "pv", "server": "collector"}}
}
"#;

pub const HARDWARE_CONFIG: &str = r#"
{
    "type": "inverter",
    "manufacturer": "ABB",
    "modelNumber": "PVS800",
    "serialNumber": 1109384,
    "toStore": "roof",
    "identity": {"IPAddress": "127.0.0.1"}
}
"#;

pub const HARDWARE_CONFIG_MAX_VOLTAGE: &str = r#"
{
    "type": "inverter",
    "manufacturer": "ABB",
    "modelNumber": "PVS800",
    "serialNumber": 1109384,
    "toStore": "roof",
    "identity": {
        "IPAddress": "127.0.0.1",
        "threshold": {"voltagePV": {"type": "max", "value": "2000"}}
    }
}
"#;

pub const UNSUPPORTED_HARDWARE_CONFIG: &str = r#"
{
    "type": "inverter",
    "manufacturer": "Delta Electronics",
    "modelNumber": "RPI",
    "serialNumber": "D-1",
    "toStore": "",
    "identity": {}
}
"#;

pub const WEBBOX_PAGE: &str = r#"
<table>
  <tr><td>Power</td><td id="Power">2 kW</td></tr>
  <tr><td>Day yield</td><td id="DailyYield">1500 Wh</td></tr>
  <tr><td>Total yield</td><td id="TotalYield">3 MWh</td></tr>
</table>
"#;

pub fn webbox_hardware_config(address: &str) -> String {
    serde_json::json!({
        "type": "logger",
        "manufacturer": "SMA Solar Technology",
        "modelNumber": "Sunny Web Box",
        "serialNumber": "WB-150",
        "toStore": "",
        "identity": {"address": address}
    })
    .to_string()
}
