use crc32fast::Hasher;
use std::collections::HashSet;

/// Stable short hash of a document id, used to seed element ids and slugs
pub fn document_seed(document_id: &str) -> String {
    let mut hasher = Hasher::new();
    hasher.update(document_id.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Sequential element id generator scoped to one document.
///
/// Ids look like `<seed>-<n>`. Ids already present in the document are
/// registered up front and skipped, so a reloaded document never hands out
/// a duplicate.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    seed: String,
    count: u32,
    taken: HashSet<String>,
}

impl IdGenerator {
    pub fn new(document_id: &str) -> Self {
        Self::from_seed(document_seed(document_id))
    }

    pub fn from_seed(seed: String) -> Self {
        Self {
            seed,
            count: 0,
            taken: HashSet::new(),
        }
    }

    /// Mark ids as used
    pub fn reserve<'a>(&mut self, ids: impl IntoIterator<Item = &'a str>) {
        self.taken.extend(ids.into_iter().map(str::to_string));
    }

    pub fn new_id(&mut self) -> String {
        loop {
            self.count += 1;
            let id = format!("{}-{}", self.seed, self.count);
            if self.taken.insert(id.clone()) {
                return id;
            }
        }
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }
}
