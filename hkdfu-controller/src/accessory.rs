//! Service/characteristic snapshot of a paired accessory.

use uuid::Uuid;

/// One service on the accessory, with its characteristics in discovery order.
///
/// Snapshots are taken once per connection; only characteristic values change
/// afterwards, and only as the result of reads.
#[derive(Debug, Clone)]
pub struct ServiceDescriptor {
    pub id: Uuid,
    pub description: String,
    pub characteristics: Vec<CharacteristicDescriptor>,
}

/// A single readable/writable value on a service.
#[derive(Debug, Clone)]
pub struct CharacteristicDescriptor {
    pub id: Uuid,
    pub description: String,
    /// Last value read from the accessory, if any.
    pub value: Option<Vec<u8>>,
}

impl CharacteristicDescriptor {
    pub fn new(id: Uuid, description: impl Into<String>) -> Self {
        Self {
            id,
            description: description.into(),
            value: None,
        }
    }

    /// Human-readable name for display.
    pub fn display_name(&self) -> &str {
        if self.description.is_empty() {
            "Characteristic"
        } else {
            &self.description
        }
    }

    /// Render the last-read value: text when it is text, hex otherwise,
    /// "Not available" when nothing has been read.
    pub fn display_value(&self) -> String {
        match &self.value {
            None => "Not available".to_string(),
            Some(bytes) => match std::str::from_utf8(bytes) {
                Ok(text) if !text.is_empty() && !text.chars().any(char::is_control) => {
                    text.to_string()
                }
                _ => format!("0x{}", data_encoding::HEXLOWER.encode(bytes)),
            },
        }
    }
}
