// Transmitter service - Use case for listing and resolving transmitters
use crate::domain::transmitter::Transmitter;

#[derive(Clone)]
pub struct TransmitterService {
    transmitters: Vec<Transmitter>,
}

impl TransmitterService {
    pub fn new(ids: &[u32]) -> Self {
        Self {
            transmitters: ids.iter().copied().map(Transmitter::new).collect(),
        }
    }

    pub fn list(&self) -> &[Transmitter] {
        &self.transmitters
    }

    /// Only configured identifiers resolve.
    pub fn find(&self, id: u32) -> Option<&Transmitter> {
        self.transmitters.iter().find(|t| t.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_and_find() {
        let service = TransmitterService::new(&[101, 102, 103]);

        let names: Vec<&str> = service.list().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Transmitter 101", "Transmitter 102", "Transmitter 103"]);
        assert_eq!(service.find(102).map(|t| t.id), Some(102));
        assert!(service.find(104).is_none());
    }
}
