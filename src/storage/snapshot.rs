//! Snapshot persistence for the location catalog.
//!
//! A snapshot holds the full record set. Each save writes a temp file next to
//! the target and renames it into place, so a crash mid-write leaves the
//! previous snapshot intact.
//!
//! Layout: magic, format version byte, write timestamp (secs u64 + nanos
//! u32, little endian), then the bincode-encoded record list.

use crate::config::SnapshotConfig;
use crate::error::{CragmapError, Result};
use cragmap_types::location::ClimbingLocation;
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

const SNAPSHOT_MAGIC: &[u8] = b"CRAGMAP_SNAPSHOT";
const SNAPSHOT_VERSION: u8 = 1;

pub struct SnapshotFile {
    path: PathBuf,
    config: SnapshotConfig,
    ops_since_snapshot: usize,
}

impl SnapshotFile {
    pub fn new<P: AsRef<Path>>(path: P, config: SnapshotConfig) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            config,
            ops_since_snapshot: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read every record. A missing or empty file yields no records.
    pub fn load(&self) -> Result<Vec<ClimbingLocation>> {
        if !self.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)?;
        if file.metadata()?.len() == 0 {
            return Ok(Vec::new());
        }

        let mut reader = BufReader::new(file);

        let mut magic = vec![0u8; SNAPSHOT_MAGIC.len()];
        reader.read_exact(&mut magic)?;
        if magic != SNAPSHOT_MAGIC {
            return Err(CragmapError::store(
                "snapshot load",
                format!("{} is not a catalog snapshot", self.path.display()),
            ));
        }

        let mut version = [0u8; 1];
        reader.read_exact(&mut version)?;
        if version[0] != SNAPSHOT_VERSION {
            return Err(CragmapError::store(
                "snapshot load",
                format!("unsupported snapshot version {}", version[0]),
            ));
        }

        let mut timestamp = [0u8; 12];
        reader.read_exact(&mut timestamp)?;

        let records: Vec<ClimbingLocation> = bincode::deserialize_from(&mut reader)?;
        log::debug!(
            "Loaded {} records from snapshot {}",
            records.len(),
            self.path.display()
        );
        Ok(records)
    }

    pub fn save(&mut self, records: &[ClimbingLocation]) -> Result<()> {
        let temp_path = self.temp_path();

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)?;
        let mut writer = BufWriter::new(file);

        writer.write_all(SNAPSHOT_MAGIC)?;
        writer.write_all(&[SNAPSHOT_VERSION])?;

        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| CragmapError::store("snapshot save", e))?;
        writer.write_all(&now.as_secs().to_le_bytes())?;
        writer.write_all(&now.subsec_nanos().to_le_bytes())?;

        bincode::serialize_into(&mut writer, records)?;

        writer.flush()?;
        let file = writer.into_inner().map_err(|e| e.into_error())?;
        file.sync_all()?;
        drop(file);

        std::fs::rename(&temp_path, &self.path)?;
        self.sync_parent_dir()?;

        self.ops_since_snapshot = 0;
        Ok(())
    }

    pub fn record_operation(&mut self) {
        self.ops_since_snapshot += 1;
    }

    pub fn reset_operations(&mut self) {
        self.ops_since_snapshot = 0;
    }

    pub fn should_snapshot(&self) -> bool {
        match self.config.auto_snapshot_ops {
            Some(threshold) => self.ops_since_snapshot >= threshold,
            None => false,
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut temp = self.path.clone();
        if let Some(name) = temp.file_name() {
            let mut new_name = name.to_string_lossy().into_owned();
            new_name.push_str(".tmp");
            temp.set_file_name(new_name);
        }
        temp
    }

    fn sync_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            File::open(parent)?.sync_all()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cragmap_types::location::{ClimbingType, NewLocation};
    use tempfile::{NamedTempFile, tempdir};

    fn records() -> Vec<ClimbingLocation> {
        vec![
            ClimbingLocation::create(
                NewLocation::new("Eldorado", ClimbingType::Boulder, 39.93, -105.28)
                    .with_difficulty("V6")
                    .with_description("Canyon boulders"),
                SystemTime::now(),
            ),
            ClimbingLocation::create(
                NewLocation::new("Earth Treks", ClimbingType::Gym, 39.65, -104.99),
                SystemTime::now(),
            ),
        ]
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let dir = tempdir().unwrap();
        let mut snapshot = SnapshotFile::new(dir.path().join("catalog.snap"), SnapshotConfig::default());

        let data = records();
        snapshot.save(&data).unwrap();

        let loaded = snapshot.load().unwrap();
        assert_eq!(loaded, data);
        assert!(!dir.path().join("catalog.snap.tmp").exists());
    }

    #[test]
    fn test_auto_snapshot_threshold() {
        let temp = NamedTempFile::new().unwrap();
        let config = SnapshotConfig {
            auto_snapshot_ops: Some(3),
        };
        let mut snapshot = SnapshotFile::new(temp.path(), config);

        assert!(!snapshot.should_snapshot());
        snapshot.record_operation();
        snapshot.record_operation();
        assert!(!snapshot.should_snapshot());
        snapshot.record_operation();
        assert!(snapshot.should_snapshot());

        snapshot.save(&[]).unwrap();
        assert!(!snapshot.should_snapshot());

        for _ in 0..3 {
            snapshot.record_operation();
        }
        snapshot.reset_operations();
        assert!(!snapshot.should_snapshot());
    }

    #[test]
    fn test_load_nonexistent_or_empty() {
        let temp = NamedTempFile::new().unwrap();
        let snapshot = SnapshotFile::new(temp.path(), SnapshotConfig::default());
        assert!(snapshot.load().unwrap().is_empty());

        let missing = SnapshotFile::new(
            temp.path().with_extension("missing"),
            SnapshotConfig::default(),
        );
        assert!(missing.load().unwrap().is_empty());
    }

    #[test]
    fn test_invalid_magic() {
        let temp = NamedTempFile::new().unwrap();
        let mut file = File::create(temp.path()).unwrap();
        file.write_all(b"NOT_A_SNAPSHOT_AT_ALL").unwrap();
        file.sync_all().unwrap();
        drop(file);

        let snapshot = SnapshotFile::new(temp.path(), SnapshotConfig::default());
        let err = snapshot.load().unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::StoreUnavailable);
    }
}
