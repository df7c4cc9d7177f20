use crate::data_mgmt::catalog::MeasurementCatalog;
use crate::data_mgmt::payload::MeasurementMap;
use crate::node_mgmt::config::MeasurementSet;
use crate::readers::Sanity;

/// Resolve a measurement set against the catalog values
///
/// Alternates are used when the device is unsane. A name without a catalog value maps
/// to an empty string. Returns `None` when the set resolves to no names at all.
pub fn route(
    set: &MeasurementSet,
    sanity: Sanity,
    catalog: &MeasurementCatalog,
) -> Option<MeasurementMap> {
    let names = set.select(sanity);
    if names.is_empty() {
        return None;
    }
    let mut measurements = MeasurementMap::new();
    for name in names {
        measurements.insert(name.as_str(), catalog.value_of(name).unwrap_or_default());
    }
    Some(measurements)
}
