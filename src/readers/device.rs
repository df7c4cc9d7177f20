use crate::readers::sanity::{self, Sanity, Thresholds};

use super::{Driver, MeasureError};

/// An attached driver plus the cached, scaled payload of its last measurement
pub struct MeasurementDevice {
    driver: Box<dyn Driver>,
    thresholds: Thresholds,
    payload: Vec<String>,
    sanity: Sanity,
}

impl MeasurementDevice {
    pub fn new(driver: Box<dyn Driver>, thresholds: Thresholds) -> Self {
        MeasurementDevice {
            driver,
            thresholds,
            payload: Vec::new(),
            sanity: Sanity::Unknown,
        }
    }

    pub fn labels(&self) -> &'static [&'static str] {
        self.driver.labels()
    }

    /// 1-based index of a label, as accepted by [`MeasurementDevice::read`]
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.labels().iter().position(|l| *l == label).map(|p| p + 1)
    }

    pub fn sanity(&self) -> Sanity {
        self.sanity
    }

    pub fn payload(&self) -> &[String] {
        &self.payload
    }

    /// Poll the equipment once and replace the cached payload
    ///
    /// On failure the previous payload is kept and sanity becomes bad.
    pub fn measure(&mut self) -> Result<(), MeasureError> {
        match self.scaled_readings() {
            Ok(payload) => {
                log::debug!("Measured payload: {:?}", payload);
                self.payload = payload;
                self.sanity = Sanity::Good;
                Ok(())
            }
            Err(e) => {
                self.sanity = Sanity::Bad;
                Err(e)
            }
        }
    }

    fn scaled_readings(&mut self) -> Result<Vec<String>, MeasureError> {
        let raw = self.driver.measure()?;
        let factors = self.driver.factors();
        if raw.len() != factors.len() {
            return Err(MeasureError::Length {
                expected: factors.len(),
                found: raw.len(),
            });
        }
        Ok(raw
            .iter()
            .zip(factors)
            .map(|(value, factor)| format_value(value / factor))
            .collect())
    }

    /// Verdict of the threshold rules against the cached payload
    pub fn filter(&self) -> Sanity {
        sanity::evaluate(self.labels(), &self.payload, &self.thresholds)
    }

    /// Value at the 1-based label `index`, measuring first unless the cache is good
    pub fn read(&mut self, index: usize) -> Option<&str> {
        if !self.sanity.is_good() {
            match self.measure() {
                Ok(()) => self.sanity = self.filter(),
                Err(e) => log::warn!("Measurement failed: {}", e),
            }
        }
        index
            .checked_sub(1)
            .and_then(|i| self.payload.get(i))
            .map(String::as_str)
    }

    /// Invalidate the cache so the next read polls the equipment again
    pub fn cancel(&mut self) {
        self.payload.clear();
        self.sanity = Sanity::Unknown;
    }

    pub fn detach(&mut self) {
        self.driver.detach();
        self.cancel();
    }
}

/// Shortest round-trip decimal form that always carries a fraction (`2300.0`, `0.25`)
fn format_value(value: f64) -> String {
    format!("{value:?}")
}
