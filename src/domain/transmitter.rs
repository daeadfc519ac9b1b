// Transmitter domain model
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transmitter {
    pub id: u32,
    pub name: String,
}

impl Transmitter {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            name: format!("Transmitter {}", id),
        }
    }

    /// Path segment under which the store keeps this unit's readings.
    pub fn store_path(&self) -> String {
        format!("transmitter_{}", self.id)
    }
}
