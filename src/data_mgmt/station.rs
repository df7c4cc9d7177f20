use crate::data_mgmt::payload::HostData;
use crate::interfaces::HostInfo;
use crate::node_mgmt::hardware::DeviceDescriptor;
use crate::readers::{self, AttachError, MeasurementDevice, Sanity};

/// The attached device together with the host it is wired to
///
/// Measurement names resolve to device labels first and to host parameters otherwise.
pub struct Station {
    descriptor: DeviceDescriptor,
    device: MeasurementDevice,
    host_info: Box<dyn HostInfo>,
}

impl Station {
    pub fn new(
        descriptor: DeviceDescriptor,
        device: MeasurementDevice,
        host_info: Box<dyn HostInfo>,
    ) -> Self {
        Station {
            descriptor,
            device,
            host_info,
        }
    }

    pub fn attach(
        descriptor: DeviceDescriptor,
        host_info: Box<dyn HostInfo>,
    ) -> Result<Self, AttachError> {
        let device = readers::attach(&descriptor)?;
        Ok(Self::new(descriptor, device, host_info))
    }

    pub fn descriptor(&self) -> &DeviceDescriptor {
        &self.descriptor
    }

    pub fn device(&self) -> &MeasurementDevice {
        &self.device
    }

    pub fn sanity(&self) -> Sanity {
        self.device.sanity()
    }

    /// Value for `name`; empty when neither the device nor the host provides it
    pub fn read(&mut self, name: &str) -> String {
        if let Some(index) = self.device.index_of(name) {
            return match self.device.read(index) {
                Some(value) => value.to_string(),
                None => {
                    log::warn!("No value available for {}", name);
                    String::new()
                }
            };
        }
        self.host_info.lookup(name).unwrap_or_else(|| {
            log::warn!("Unknown measurement {}", name);
            String::new()
        })
    }

    pub fn host_data(&self) -> HostData {
        HostData::new(&self.descriptor, self.sanity())
    }

    pub fn cancel(&mut self) {
        self.device.cancel();
    }

    pub fn detach(&mut self) {
        self.device.detach();
        log::debug!("Detached {}", self.descriptor.model_number);
    }
}
