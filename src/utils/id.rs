use uuid::Uuid;

/// Length of generated record identifiers.
pub const ID_LENGTH: usize = 16;

const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-";

/// Source of record identifiers.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> String;
}

/// URL-safe random tokens of [`ID_LENGTH`] characters.
///
/// Each character takes six bits from a fresh v4 UUID, so a token carries
/// 96 bits drawn from the UUID's random payload.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIdGenerator;

impl IdGenerator for RandomIdGenerator {
    fn next_id(&self) -> String {
        let mut bits = Uuid::new_v4().as_u128();
        let mut id = String::with_capacity(ID_LENGTH);
        for _ in 0..ID_LENGTH {
            id.push(ALPHABET[(bits & 0x3f) as usize] as char);
            bits >>= 6;
        }
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn ids_are_fixed_length_and_url_safe() {
        let id = RandomIdGenerator.next_id();
        assert_eq!(id.len(), ID_LENGTH);
        assert!(id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-'));
    }

    #[test]
    fn ids_do_not_repeat() {
        let ids: HashSet<_> = (0..1000).map(|_| RandomIdGenerator.next_id()).collect();
        assert_eq!(ids.len(), 1000);
    }
}
