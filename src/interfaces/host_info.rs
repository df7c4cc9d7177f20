//! Pseudo-measurements describing the host the agent runs on
//!
//! Names that are not device labels are resolved here: temperatures, OS identity strings
//! and interface addresses of the (usually Raspberry Pi) host.

use std::fs;
use std::io;
use std::net::Ipv4Addr;
use std::process::Command;
use std::str::FromStr;
use std::string::FromUtf8Error;

use thiserror::Error;

/// Resolve a host parameter by name
pub trait HostInfo {
    /// `None` when the name is not a host parameter at all. A known parameter whose
    /// source is unavailable resolves to an empty string.
    fn lookup(&self, name: &str) -> Option<String>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostParameter {
    TemperatureGpu,
    TemperatureCpu,
    Uname,
    Reference,
    ReleaseOs,
    RevisionProcessor,
    SerialnumberProcessor,
    Hostname,
    Username,
    Date,
    Ipv4Eth0,
    Ipv4Wlan0,
}

const PARAMETER_NAMES: &[(&str, HostParameter)] = &[
    ("temperature_gpu", HostParameter::TemperatureGpu),
    ("temperature_cpu", HostParameter::TemperatureCpu),
    ("uname", HostParameter::Uname),
    ("reference", HostParameter::Reference),
    ("release_os", HostParameter::ReleaseOs),
    ("revision_processor", HostParameter::RevisionProcessor),
    ("serialnumber_processor", HostParameter::SerialnumberProcessor),
    ("hostname", HostParameter::Hostname),
    ("username", HostParameter::Username),
    ("date", HostParameter::Date),
    ("ipv4_eth0", HostParameter::Ipv4Eth0),
    ("ipv4_wlan0", HostParameter::Ipv4Wlan0),
];

#[derive(Error, Debug, PartialEq, Eq)]
#[error("'{0}' is not a host parameter")]
pub struct UnknownParameter(String);

impl FromStr for HostParameter {
    type Err = UnknownParameter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PARAMETER_NAMES
            .iter()
            .find(|(name, _)| *name == s)
            .map(|(_, parameter)| *parameter)
            .ok_or_else(|| UnknownParameter(s.to_string()))
    }
}

impl HostParameter {
    pub fn name(self) -> &'static str {
        PARAMETER_NAMES
            .iter()
            .find(|(_, p)| *p == self)
            .map(|(name, _)| *name)
            .unwrap_or_default()
    }
}

#[derive(Error, Debug)]
pub enum HostInfoError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Utf8(#[from] FromUtf8Error),
    #[error(transparent)]
    Nix(#[from] nix::Error),
    #[error("{0} not available")]
    Unavailable(&'static str),
}

const THERMAL_ZONE: &str = "/sys/class/thermal/thermal_zone0/temp";
const RPI_ISSUE: &str = "/etc/rpi-issue";
const OS_RELEASE: &str = "/etc/os-release";
const CPUINFO: &str = "/proc/cpuinfo";

/// Reads parameters from the running system
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemHostInfo;

impl HostInfo for SystemHostInfo {
    fn lookup(&self, name: &str) -> Option<String> {
        let parameter = name.parse::<HostParameter>().ok()?;
        match self.query(parameter) {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("Could not read host parameter {}: {}", name, e);
                Some(String::new())
            }
        }
    }
}

impl SystemHostInfo {
    pub fn query(&self, parameter: HostParameter) -> Result<String, HostInfoError> {
        match parameter {
            HostParameter::TemperatureGpu => {
                let output = command_output("vcgencmd", &["measure_temp"])?;
                Ok(gpu_temperature(&output).to_string())
            }
            HostParameter::TemperatureCpu => read_file(THERMAL_ZONE),
            HostParameter::Uname => command_output("uname", &["-a"]),
            HostParameter::Reference => read_file(RPI_ISSUE),
            HostParameter::ReleaseOs => read_file(OS_RELEASE),
            HostParameter::RevisionProcessor => {
                cpuinfo_field(&fs::read_to_string(CPUINFO)?, "Revision")
                    .ok_or(HostInfoError::Unavailable("processor revision"))
            }
            HostParameter::SerialnumberProcessor => {
                cpuinfo_field(&fs::read_to_string(CPUINFO)?, "Serial")
                    .ok_or(HostInfoError::Unavailable("processor serial number"))
            }
            HostParameter::Hostname => {
                sysinfo::System::host_name().ok_or(HostInfoError::Unavailable("hostname"))
            }
            HostParameter::Username => command_output("whoami", &[]),
            HostParameter::Date => command_output("date", &[]),
            HostParameter::Ipv4Eth0 => interface_ipv4("eth0"),
            HostParameter::Ipv4Wlan0 => interface_ipv4("wlan0"),
        }
    }
}

fn strip_optional_newline(s: String) -> String {
    s.strip_suffix('\n').unwrap_or(&s).to_string()
}

fn command_output(program: &str, args: &[&str]) -> Result<String, HostInfoError> {
    let output = Command::new(program).args(args).output()?;
    Ok(strip_optional_newline(String::from_utf8(output.stdout)?))
}

fn read_file(path: &str) -> Result<String, HostInfoError> {
    Ok(strip_optional_newline(fs::read_to_string(path)?))
}

/// `temp=48.3'C` -> `48.3`
fn gpu_temperature(output: &str) -> &str {
    let reading = output.trim().strip_prefix("temp=").unwrap_or(output.trim());
    reading.split('\'').next().unwrap_or(reading)
}

/// Value of the first `key : value` line in `/proc/cpuinfo` format
fn cpuinfo_field(cpuinfo: &str, key: &str) -> Option<String> {
    cpuinfo.lines().find_map(|line| {
        let (k, v) = line.split_once(':')?;
        (k.trim() == key).then(|| v.trim().to_string())
    })
}

fn interface_ipv4(interface: &'static str) -> Result<String, HostInfoError> {
    nix::ifaddrs::getifaddrs()?
        .filter(|ifaddr| ifaddr.interface_name == interface)
        .find_map(|ifaddr| {
            ifaddr
                .address
                .as_ref()
                .and_then(|addr| addr.as_sockaddr_in())
                .map(|sin| Ipv4Addr::from(sin.ip()).to_string())
        })
        .ok_or(HostInfoError::Unavailable(interface))
}
