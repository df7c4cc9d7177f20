//! SMA Sunny WebBox data logger, read by scraping its status page

use chrono::Utc;
use url::Url;

mod parse;

pub use parse::{parse_status_page, ParseError};

use super::{AttachError, Driver, MeasureError};
use crate::interfaces::http_api;
use crate::node_mgmt::hardware::Identity;

const LABELS: &[&str] = &["power_D", "energyToday_D", "energyCumulative_D"];
const FACTORS: &[f64] = &[1.0, 1.0, 1.0];
const STATUS_PAGE: &str = "home.htm";

pub struct SunnyWebBox {
    base_url: Url,
    agent: Option<ureq::Agent>,
}

impl SunnyWebBox {
    pub fn attach(identity: &Identity) -> Result<Self, AttachError> {
        let address = identity
            .address
            .as_deref()
            .filter(|a| !a.is_empty())
            .ok_or(AttachError::MissingParameter("address"))?;
        let base_url = Url::parse(address).map_err(|e| AttachError::InvalidParameter {
            name: "address",
            reason: e.to_string(),
        })?;
        Ok(SunnyWebBox {
            base_url,
            agent: Some(http_api::agent(true)),
        })
    }

    /// Status page URL; the query defeats caching on the logger
    fn status_url(&self) -> String {
        format!(
            "{}{}?saltpepper={}",
            self.base_url,
            STATUS_PAGE,
            Utc::now().timestamp_millis()
        )
    }
}

impl Driver for SunnyWebBox {
    fn labels(&self) -> &'static [&'static str] {
        LABELS
    }

    fn factors(&self) -> &'static [f64] {
        FACTORS
    }

    fn measure(&mut self) -> Result<Vec<f64>, MeasureError> {
        let agent = self.agent.as_ref().ok_or(MeasureError::NotAttached)?;
        let url = self.status_url();
        log::debug!("Fetching {}", url);
        let text = agent.get(&url).call()?.body_mut().read_to_string()?;
        Ok(parse_status_page(&text)?)
    }

    fn detach(&mut self) {
        self.agent = None;
    }
}
