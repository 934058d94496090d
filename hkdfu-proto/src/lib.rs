//! Wire-level identifiers for accessory DFU triggering.
//!
//! The DFU service and control point are the Nordic buttonless-DFU UUIDs;
//! the accessory-information identifiers are the short-form Apple-defined
//! UUIDs under the base 0000xxxx-0000-1000-8000-0026BB765291.

use uuid::Uuid;

/// Nordic DFU service
pub const DFU_SERVICE_UUID: Uuid = Uuid::from_u128(0x00001530_1212_EFDE_1523_785FEABCD123);

/// DFU control point characteristic (write)
pub const DFU_CONTROL_POINT_UUID: Uuid = Uuid::from_u128(0x00001531_1212_EFDE_1523_785FEABCD123);

/// Accessory information service
pub const ACCESSORY_INFORMATION_UUID: Uuid = Uuid::from_u128(0x0000003E_0000_1000_8000_0026BB765291);

/// Hardware revision characteristic (read)
pub const HARDWARE_VERSION_UUID: Uuid = Uuid::from_u128(0x00000053_0000_1000_8000_0026BB765291);

/// Firmware revision characteristic (read)
pub const FIRMWARE_VERSION_UUID: Uuid = Uuid::from_u128(0x00000052_0000_1000_8000_0026BB765291);

/// Command bytes written to the DFU control point
pub mod commands {
    /// Jump to bootloader - accessory disconnects and restarts in DFU mode
    pub const JUMP_TO_BOOTLOADER: u8 = 0x01;
}

/// Identifiers this toolkit understands, with display labels.
///
/// Kept as a single lookup enum so a protocol-id revision touches one place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KnownUuid {
    DfuService,
    DfuControlPoint,
    AccessoryInformation,
    HardwareVersion,
    FirmwareVersion,
}

impl KnownUuid {
    pub fn uuid(self) -> Uuid {
        match self {
            KnownUuid::DfuService => DFU_SERVICE_UUID,
            KnownUuid::DfuControlPoint => DFU_CONTROL_POINT_UUID,
            KnownUuid::AccessoryInformation => ACCESSORY_INFORMATION_UUID,
            KnownUuid::HardwareVersion => HARDWARE_VERSION_UUID,
            KnownUuid::FirmwareVersion => FIRMWARE_VERSION_UUID,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            KnownUuid::DfuService => "DFU",
            KnownUuid::DfuControlPoint => "DFU Control Point",
            KnownUuid::AccessoryInformation => "Accessory Information",
            KnownUuid::HardwareVersion => "Hardware Version",
            KnownUuid::FirmwareVersion => "Firmware Version",
        }
    }

    pub fn lookup(uuid: Uuid) -> Option<Self> {
        [
            KnownUuid::DfuService,
            KnownUuid::DfuControlPoint,
            KnownUuid::AccessoryInformation,
            KnownUuid::HardwareVersion,
            KnownUuid::FirmwareVersion,
        ]
        .into_iter()
        .find(|k| k.uuid() == uuid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_matches_constants() {
        assert_eq!(KnownUuid::lookup(DFU_CONTROL_POINT_UUID), Some(KnownUuid::DfuControlPoint));
        assert_eq!(KnownUuid::lookup(Uuid::from_u128(0xdead_beef)), None);
    }

    #[test]
    fn identifier_text_forms() {
        // The hyphenated forms are what the platform reports; keep them stable.
        assert_eq!(
            DFU_SERVICE_UUID.to_string().to_uppercase(),
            "00001530-1212-EFDE-1523-785FEABCD123"
        );
        assert_eq!(
            ACCESSORY_INFORMATION_UUID.to_string().to_uppercase(),
            "0000003E-0000-1000-8000-0026BB765291"
        );
    }
}
