//! Test doubles shared by the probe and command tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use uuid::Uuid;

use hkdfu_proto::{
    ACCESSORY_INFORMATION_UUID, DFU_CONTROL_POINT_UUID, DFU_SERVICE_UUID, FIRMWARE_VERSION_UUID,
    HARDWARE_VERSION_UUID, KnownUuid,
};

use crate::accessory::{CharacteristicDescriptor, ServiceDescriptor};
use crate::endpoint::{CharacteristicEndpoint, EndpointError};

/// Scriptable endpoint: fixed read results per characteristic, one write
/// result, and an optional write latency for timer tests.
pub(crate) struct MockEndpoint {
    reads: HashMap<Uuid, Result<Vec<u8>, EndpointError>>,
    read_count: Mutex<u32>,
    write_result: Result<(), EndpointError>,
    write_delay: Duration,
    writes: Mutex<Vec<(Uuid, Vec<u8>)>>,
}

impl MockEndpoint {
    pub(crate) fn new() -> Self {
        Self {
            reads: HashMap::new(),
            read_count: Mutex::new(0),
            write_result: Ok(()),
            write_delay: Duration::ZERO,
            writes: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn with_read(mut self, id: Uuid, result: Result<Vec<u8>, EndpointError>) -> Self {
        self.reads.insert(id, result);
        self
    }

    pub(crate) fn with_write_result(mut self, result: Result<(), EndpointError>) -> Self {
        self.write_result = result;
        self
    }

    pub(crate) fn with_write_delay(mut self, delay: Duration) -> Self {
        self.write_delay = delay;
        self
    }

    pub(crate) fn writes(&self) -> Vec<(Uuid, Vec<u8>)> {
        self.writes.lock().unwrap().clone()
    }

    pub(crate) fn read_count(&self) -> u32 {
        *self.read_count.lock().unwrap()
    }
}

impl CharacteristicEndpoint for MockEndpoint {
    async fn read_value(&self, id: Uuid) -> Result<Vec<u8>, EndpointError> {
        *self.read_count.lock().unwrap() += 1;
        self.reads
            .get(&id)
            .cloned()
            .unwrap_or_else(|| Err(EndpointError::Transport("no such characteristic".into())))
    }

    async fn write_value(&self, id: Uuid, payload: &[u8]) -> Result<(), EndpointError> {
        self.writes.lock().unwrap().push((id, payload.to_vec()));
        if self.write_delay > Duration::ZERO {
            tokio::time::sleep(self.write_delay).await;
        }
        self.write_result.clone()
    }
}

pub(crate) fn accessory_info_service() -> ServiceDescriptor {
    ServiceDescriptor {
        id: ACCESSORY_INFORMATION_UUID,
        description: KnownUuid::AccessoryInformation.label().to_string(),
        characteristics: vec![
            CharacteristicDescriptor::new(
                FIRMWARE_VERSION_UUID,
                KnownUuid::FirmwareVersion.label(),
            ),
            CharacteristicDescriptor::new(
                HARDWARE_VERSION_UUID,
                KnownUuid::HardwareVersion.label(),
            ),
        ],
    }
}

pub(crate) fn dfu_service() -> ServiceDescriptor {
    ServiceDescriptor {
        id: DFU_SERVICE_UUID,
        description: KnownUuid::DfuService.label().to_string(),
        characteristics: vec![CharacteristicDescriptor::new(
            DFU_CONTROL_POINT_UUID,
            KnownUuid::DfuControlPoint.label(),
        )],
    }
}
