use chrono::Utc;
use rand::distributions::Alphanumeric;
use rand::Rng;

const SUFFIX_LEN: usize = 6;

/// Timestamp + random suffix id generator for blocks and documents
///
/// Ids look like `block-18c4f1a2b3d-k3x9q0`. They are unique in practice;
/// callers that need a hard guarantee re-draw on collision.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    prefix: String,
    count: u64,
}

impl IdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            count: 0,
        }
    }

    /// Generate the next id
    pub fn new_id(&mut self) -> String {
        self.count += 1;

        let suffix: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(SUFFIX_LEN)
            .map(|byte| char::from(byte).to_ascii_lowercase())
            .collect();

        format!("{}-{:x}-{}", self.prefix, Utc::now().timestamp_millis(), suffix)
    }

    /// Number of ids handed out so far
    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new("block")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_id_shape() {
        let mut gen = IdGenerator::new("doc");
        let id = gen.new_id();

        let parts: Vec<&str> = id.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "doc");
        assert!(u64::from_str_radix(parts[1], 16).is_ok());
        assert_eq!(parts[2].len(), SUFFIX_LEN);
        assert!(parts[2].chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }

    #[test]
    fn test_ids_are_distinct() {
        let mut gen = IdGenerator::default();
        let ids: HashSet<String> = (0..500).map(|_| gen.new_id()).collect();
        assert_eq!(ids.len(), 500);
        assert_eq!(gen.count(), 500);
    }
}
