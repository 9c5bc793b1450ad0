//! Group rank persistence (`rank.json`).

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::storage::Store;

#[derive(Debug, Serialize, Deserialize)]
struct RankFile {
    rank: u32,
}

impl Default for RankFile {
    fn default() -> Self {
        Self { rank: 1 }
    }
}

const RANK_FILE: &str = "rank.json";

impl Store {
    /// Current group rank level; 1 when nothing is stored.
    pub fn load_rank(&self) -> Result<u32> {
        let file: RankFile = self.load_json(RANK_FILE)?;
        Ok(file.rank.max(1))
    }

    /// Persist a new group rank level.
    pub fn save_rank(&self, level: u32) -> Result<()> {
        self.update(RANK_FILE, |file: &mut RankFile| {
            file.rank = level;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::storage::Store;
    use tempfile::tempdir;

    #[test]
    fn test_default_rank_is_one() {
        let dir = tempdir().unwrap();
        let store = Store::at(dir.path());
        assert_eq!(store.load_rank().unwrap(), 1);
    }

    #[test]
    fn test_rank_round_trips() {
        let dir = tempdir().unwrap();
        let store = Store::at(dir.path());
        store.save_rank(7).unwrap();
        assert_eq!(store.load_rank().unwrap(), 7);
    }
}
