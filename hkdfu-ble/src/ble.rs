//! btleplug-backed endpoint: find an accessory, snapshot its services, and
//! expose characteristic reads/writes to the controller core.

use std::time::Duration;

use btleplug::api::{Central, Characteristic, Manager as _, Peripheral as _, ScanFilter, WriteType};
use btleplug::platform::{Adapter, Manager, Peripheral};
use uuid::Uuid;

use hkdfu_controller::{
    CharacteristicDescriptor, CharacteristicEndpoint, EndpointError, ServiceDescriptor,
};
use hkdfu_proto::{DFU_SERVICE_UUID, KnownUuid};

/// A nearby peripheral seen during a scan
#[derive(Debug, Clone)]
pub struct ScannedDevice {
    pub name: String,
    pub address: String,
    pub rssi: Option<i16>,
    /// Advertises the DFU service, so the jump command should apply.
    pub advertises_dfu: bool,
}

/// Get the default Bluetooth adapter
pub async fn get_adapter() -> Result<Adapter, Box<dyn std::error::Error>> {
    let manager = Manager::new().await?;
    let adapters = manager.adapters().await?;
    adapters
        .into_iter()
        .next()
        .ok_or_else(|| "No Bluetooth adapter found".into())
}

/// Scan for nearby accessories
pub async fn scan(duration_secs: u64) -> Result<Vec<ScannedDevice>, Box<dyn std::error::Error>> {
    let adapter = get_adapter().await?;

    adapter.start_scan(ScanFilter::default()).await?;
    tokio::time::sleep(Duration::from_secs(duration_secs)).await;

    let peripherals = adapter.peripherals().await?;
    let mut devices = Vec::new();

    for peripheral in peripherals {
        if let Some(props) = peripheral.properties().await? {
            let name = props.local_name.unwrap_or_else(|| "Unknown".to_string());
            let address = peripheral.address().to_string();
            let rssi = props.rssi;
            let advertises_dfu = props.services.contains(&DFU_SERVICE_UUID);

            devices.push(ScannedDevice {
                name,
                address,
                rssi,
                advertises_dfu,
            });
        }
    }

    adapter.stop_scan().await?;
    Ok(devices)
}

/// Find an accessory by name/address pattern, or any accessory advertising
/// the DFU service
pub async fn find_device(target: Option<&str>) -> Result<Peripheral, Box<dyn std::error::Error>> {
    let adapter = get_adapter().await?;

    adapter.start_scan(ScanFilter::default()).await?;
    tokio::time::sleep(Duration::from_secs(5)).await;

    let peripherals = adapter.peripherals().await?;

    for peripheral in peripherals {
        if let Some(props) = peripheral.properties().await? {
            let name = props.local_name.unwrap_or_default();
            let addr = peripheral.address().to_string();

            let matches = match target {
                Some(t) => name.contains(t) || addr.contains(t),
                None => props.services.contains(&DFU_SERVICE_UUID),
            };

            if matches {
                adapter.stop_scan().await?;
                return Ok(peripheral);
            }
        }
    }

    adapter.stop_scan().await?;
    Err("No matching accessory found".into())
}

/// A connected accessory, usable as a [`CharacteristicEndpoint`]
pub struct BleEndpoint {
    peripheral: Peripheral,
}

impl BleEndpoint {
    /// Find, connect, and discover services
    pub async fn connect(target: Option<&str>) -> Result<Self, Box<dyn std::error::Error>> {
        let peripheral = find_device(target).await?;
        peripheral.connect().await?;
        peripheral.discover_services().await?;
        Ok(Self { peripheral })
    }

    pub async fn name(&self) -> String {
        match self.peripheral.properties().await {
            Ok(Some(props)) => props
                .local_name
                .unwrap_or_else(|| "Unknown".to_string()),
            _ => "Unknown".to_string(),
        }
    }

    pub fn address(&self) -> String {
        self.peripheral.address().to_string()
    }

    /// Snapshot of the accessory's services and characteristics, labeled
    /// from the identifier table where known
    pub fn services(&self) -> Vec<ServiceDescriptor> {
        self.peripheral
            .services()
            .into_iter()
            .map(|service| ServiceDescriptor {
                id: service.uuid,
                description: describe(service.uuid),
                characteristics: service
                    .characteristics
                    .into_iter()
                    .map(|c| CharacteristicDescriptor::new(c.uuid, describe(c.uuid)))
                    .collect(),
            })
            .collect()
    }

    pub async fn disconnect(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.peripheral.disconnect().await?;
        Ok(())
    }

    fn characteristic(&self, id: Uuid) -> Result<Characteristic, EndpointError> {
        self.peripheral
            .characteristics()
            .into_iter()
            .find(|c| c.uuid == id)
            .ok_or_else(|| EndpointError::Transport(format!("characteristic {id} not found")))
    }
}

impl CharacteristicEndpoint for BleEndpoint {
    async fn read_value(&self, id: Uuid) -> Result<Vec<u8>, EndpointError> {
        let characteristic = self.characteristic(id)?;
        self.peripheral.read(&characteristic).await.map_err(map_err)
    }

    async fn write_value(&self, id: Uuid, payload: &[u8]) -> Result<(), EndpointError> {
        let characteristic = self.characteristic(id)?;
        self.peripheral
            .write(&characteristic, payload, WriteType::WithResponse)
            .await
            .map_err(map_err)
    }
}

fn describe(uuid: Uuid) -> String {
    match KnownUuid::lookup(uuid) {
        Some(known) => known.label().to_string(),
        None => uuid.to_string(),
    }
}

fn map_err(error: btleplug::Error) -> EndpointError {
    match error {
        btleplug::Error::TimedOut(_) => EndpointError::TimedOut,
        other => EndpointError::Transport(other.to_string()),
    }
}
