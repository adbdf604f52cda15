use crate::core::trend::HistoryPoint;
use anyhow::{Context, Result};
use fjall::{Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};
use std::path::Path;
use tracing::debug;

const PARTITION: &str = "history";

/// Append-only log of portfolio totals on a fjall keyspace.
///
/// Keys are big-endian sequence numbers, so a forward scan yields points in
/// the order they were recorded.
pub struct HistoryStore {
    keyspace: Keyspace,
    partition: PartitionHandle,
}

impl HistoryStore {
    pub fn open(path: &Path) -> Result<Self> {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create history directory: {}", path.display()))?;

        let keyspace = fjall::Config::new(path)
            .open()
            .with_context(|| format!("Failed to open history store at {}", path.display()))?;
        let partition = keyspace.open_partition(PARTITION, PartitionCreateOptions::default())?;
        debug!("Opened history store at {}", path.display());

        Ok(Self {
            keyspace,
            partition,
        })
    }

    fn next_sequence(&self) -> Result<u64> {
        match self.partition.last_key_value()? {
            Some((key, _)) => {
                let bytes = <[u8; 8]>::try_from(&*key).context("Corrupt history key")?;
                Ok(u64::from_be_bytes(bytes) + 1)
            }
            None => Ok(0),
        }
    }

    /// Appends a point and flushes it to disk. Returns its sequence number.
    pub fn append(&self, point: &HistoryPoint) -> Result<u64> {
        let sequence = self.next_sequence()?;
        self.partition
            .insert(&sequence.to_be_bytes()[..], serde_json::to_vec(point)?)?;
        self.keyspace.persist(PersistMode::SyncAll)?;
        debug!(sequence, ?point, "Appended history point");
        Ok(sequence)
    }

    /// All points, oldest first.
    pub fn load(&self) -> Result<Vec<HistoryPoint>> {
        let points = self
            .partition
            .iter()
            .map(|item| {
                let (_, value) = item?;
                serde_json::from_slice(&value).context("Corrupt history entry")
            })
            .collect::<Result<Vec<HistoryPoint>>>()?;
        debug!("Loaded {} history points", points.len());
        Ok(points)
    }
}
