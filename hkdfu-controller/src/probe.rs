//! Capability probe: version strings and the DFU control point.

use uuid::Uuid;

use hkdfu_proto::{
    ACCESSORY_INFORMATION_UUID, DFU_CONTROL_POINT_UUID, DFU_SERVICE_UUID, FIRMWARE_VERSION_UUID,
    HARDWARE_VERSION_UUID,
};

use crate::accessory::{CharacteristicDescriptor, ServiceDescriptor};
use crate::endpoint::CharacteristicEndpoint;

/// Shown in place of a version string that could not be read.
pub const NOT_AVAILABLE: &str = "N/A";

/// What the probe learned about one accessory.
///
/// Built once per connection; [`CapabilityState::has_control_point`] gates
/// the jump command.
#[derive(Debug, Clone)]
pub struct CapabilityState {
    pub firmware_version: String,
    pub hardware_version: String,
    /// The DFU control point characteristic, when the accessory has one.
    pub control_point: Option<CharacteristicDescriptor>,
}

impl CapabilityState {
    pub fn has_control_point(&self) -> bool {
        self.control_point.is_some()
    }
}

/// Scan a service snapshot for the accessory-information and DFU services.
///
/// Version reads are independent: a failed read substitutes [`NOT_AVAILABLE`]
/// and the scan continues. Re-running over the same snapshot yields the same
/// state.
pub async fn probe<E: CharacteristicEndpoint>(
    endpoint: &E,
    services: &[ServiceDescriptor],
) -> CapabilityState {
    let mut firmware_version = NOT_AVAILABLE.to_string();
    let mut hardware_version = NOT_AVAILABLE.to_string();
    let mut control_point = None;

    for service in services {
        if service.id == ACCESSORY_INFORMATION_UUID {
            for characteristic in &service.characteristics {
                if characteristic.id == FIRMWARE_VERSION_UUID {
                    firmware_version = read_version(endpoint, characteristic.id).await;
                } else if characteristic.id == HARDWARE_VERSION_UUID {
                    hardware_version = read_version(endpoint, characteristic.id).await;
                }
            }
        } else if service.id == DFU_SERVICE_UUID {
            for characteristic in &service.characteristics {
                if characteristic.id == DFU_CONTROL_POINT_UUID {
                    control_point = Some(characteristic.clone());
                }
            }
        }
    }

    CapabilityState {
        firmware_version,
        hardware_version,
        control_point,
    }
}

async fn read_version<E: CharacteristicEndpoint>(endpoint: &E, id: Uuid) -> String {
    match endpoint.read_value(id).await {
        Ok(bytes) => match String::from_utf8(bytes) {
            Ok(text) if !text.is_empty() => text,
            _ => NOT_AVAILABLE.to_string(),
        },
        Err(_) => NOT_AVAILABLE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::EndpointError;
    use crate::testing::{accessory_info_service, dfu_service, MockEndpoint};

    #[tokio::test]
    async fn finds_control_point_and_versions() {
        let endpoint = MockEndpoint::new()
            .with_read(FIRMWARE_VERSION_UUID, Ok(b"1.0.1".to_vec()))
            .with_read(HARDWARE_VERSION_UUID, Ok(b"rev C".to_vec()));
        let services = [accessory_info_service(), dfu_service()];

        let state = probe(&endpoint, &services).await;
        assert!(state.has_control_point());
        assert_eq!(state.control_point.as_ref().map(|c| c.id), Some(DFU_CONTROL_POINT_UUID));
        assert_eq!(state.firmware_version, "1.0.1");
        assert_eq!(state.hardware_version, "rev C");
    }

    #[tokio::test]
    async fn missing_dfu_service_means_no_control_point() {
        let endpoint = MockEndpoint::new().with_read(FIRMWARE_VERSION_UUID, Ok(b"1.0.1".to_vec()));
        let mut info = accessory_info_service();
        // fw only, no hw characteristic
        info.characteristics.truncate(1);
        let services = [info];

        let state = probe(&endpoint, &services).await;
        assert!(!state.has_control_point());
        assert_eq!(state.firmware_version, "1.0.1");
        assert_eq!(state.hardware_version, NOT_AVAILABLE);
    }

    #[tokio::test]
    async fn failed_version_read_does_not_abort_scan() {
        let endpoint = MockEndpoint::new()
            .with_read(
                FIRMWARE_VERSION_UUID,
                Err(EndpointError::Transport("accessory unreachable".into())),
            )
            .with_read(HARDWARE_VERSION_UUID, Ok(b"rev C".to_vec()));
        let services = [accessory_info_service(), dfu_service()];

        let state = probe(&endpoint, &services).await;
        assert_eq!(state.firmware_version, NOT_AVAILABLE);
        assert_eq!(state.hardware_version, "rev C");
        assert!(state.has_control_point());
        // both reads were still issued
        assert_eq!(endpoint.read_count(), 2);
    }

    #[tokio::test]
    async fn non_text_version_payload_is_not_available() {
        let endpoint = MockEndpoint::new()
            .with_read(FIRMWARE_VERSION_UUID, Ok(vec![0xff, 0xfe]))
            .with_read(HARDWARE_VERSION_UUID, Ok(Vec::new()));
        let services = [accessory_info_service()];

        let state = probe(&endpoint, &services).await;
        assert_eq!(state.firmware_version, NOT_AVAILABLE);
        assert_eq!(state.hardware_version, NOT_AVAILABLE);
    }

    #[tokio::test]
    async fn probe_is_idempotent_over_a_snapshot() {
        let endpoint = MockEndpoint::new()
            .with_read(FIRMWARE_VERSION_UUID, Ok(b"1.0.1".to_vec()))
            .with_read(HARDWARE_VERSION_UUID, Ok(b"rev C".to_vec()));
        let services = [accessory_info_service(), dfu_service()];

        let first = probe(&endpoint, &services).await;
        let second = probe(&endpoint, &services).await;
        assert_eq!(first.firmware_version, second.firmware_version);
        assert_eq!(first.hardware_version, second.hardware_version);
        assert_eq!(
            first.control_point.map(|c| c.id),
            second.control_point.map(|c| c.id)
        );
    }
}
