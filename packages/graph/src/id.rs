use crc32fast::Hasher;

/// Generate a stable document id from a path using CRC32.
pub fn document_seed(path: &str) -> String {
    let mut buff = String::from(path);
    if !path.starts_with("file://") {
        buff = format!("file://{}", buff);
    }

    let mut hasher = Hasher::new();
    hasher.update(buff.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Sequential id generator for nodes and edges within one editing session.
///
/// Ids are `<seed>-<n>` where the seed identifies the document. The counter
/// never resets, so ids stay unique for the session even across undo cycles.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    seed: String,
    count: u32,
}

impl IdGenerator {
    pub fn new(path: &str) -> Self {
        Self {
            seed: document_seed(path),
            count: 0,
        }
    }

    pub fn from_seed(seed: String) -> Self {
        Self { seed, count: 0 }
    }

    /// Generate the next sequential id.
    pub fn new_id(&mut self) -> String {
        self.count += 1;
        format!("{}-{}", self.seed, self.count)
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_seed_is_stable() {
        let a = document_seed("/posts/whiteboard-intro.md");
        let b = document_seed("/posts/whiteboard-intro.md");
        assert_eq!(a, b);

        let c = document_seed("/posts/other.md");
        assert_ne!(a, c);
    }

    #[test]
    fn test_ids_are_sequential_and_unique() {
        let mut ids = IdGenerator::from_seed("abc123".to_string());
        let first = ids.new_id();
        let second = ids.new_id();

        assert_eq!(first, "abc123-1");
        assert_eq!(second, "abc123-2");
        assert_ne!(first, second);
    }
}
