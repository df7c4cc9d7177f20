use itertools::Itertools;

use crate::data_mgmt::station::Station;
use crate::node_mgmt::config::{Config, MeasurementSet};

/// Every primary variable the configured combinations need, each read once per cycle
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeasurementCatalog {
    names: Vec<String>,
    values: Vec<Option<String>>,
}

impl MeasurementCatalog {
    /// Names in order of first appearance across the sets
    pub fn from_sets<'a>(sets: impl IntoIterator<Item = &'a MeasurementSet>) -> Self {
        let names = sets
            .into_iter()
            .flat_map(|set| set.variables.iter())
            .unique()
            .cloned()
            .collect::<Vec<_>>();
        let values = vec![None; names.len()];
        MeasurementCatalog { names, values }
    }

    pub fn build(config: &Config) -> Self {
        Self::from_sets(
            config
                .combinations
                .iter()
                .filter_map(|c| config.measurement_set(&c.measurement_set)),
        )
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Read every entry through the station, in catalog order
    pub fn read_all(&mut self, station: &mut Station) {
        for (name, value) in self.names.iter().zip(self.values.iter_mut()) {
            *value = Some(station.read(name));
        }
        log::debug!("Catalog values: {:?}", self.values);
    }

    /// Value read for `name`; `None` for names outside the catalog or not yet read
    pub fn value_of(&self, name: &str) -> Option<&str> {
        let position = self.names.iter().position(|n| n == name)?;
        self.values[position].as_deref()
    }
}
