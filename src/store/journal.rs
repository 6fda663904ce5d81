use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use crate::codec::mapper::EntityMapper;
use crate::core::config::{StoreConfig, SyncMode};
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::logging::targets;
use crate::core::types::{EntityId, SearchEntity};
use crate::store::PrimaryStore;

const MAX_ENTRY_LEN: usize = 16 * 1024 * 1024;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    pub sequence: u64,
    pub operation: Operation,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Operation {
    Save { id: EntityId, payload: String },
    Delete { id: EntityId },
}

struct JournalState<E> {
    rows: BTreeMap<EntityId, E>,
    file: File,
    sequence: u64,
    next_id: u64,
}

/// Primary store whose every mutation is appended to a write-ahead journal.
///
/// Frames are `u32` little-endian length + bincode entry; entity payloads
/// are the mapper's JSON. Opening replays the journal, so state and the id
/// sequence survive restarts. A torn final frame is cut off with a warning.
pub struct JournalStore<E> {
    path: PathBuf,
    mapper: EntityMapper,
    sync_mode: SyncMode,
    state: RwLock<JournalState<E>>,
}

impl<E: SearchEntity> JournalStore<E> {
    pub fn open(dir: &Path, mapper: EntityMapper, sync_mode: SyncMode) -> Result<Self> {
        fs::create_dir_all(dir)?;
        let path = dir.join(format!("{}.journal", E::INDEX_NAME));
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&path)?;

        let (entries, valid_len) = read_entries(&mut file, &path)?;
        if file.metadata()?.len() > valid_len {
            tracing::warn!(
                target: targets::STORE,
                path = %path.display(),
                valid_len,
                "discarding torn journal tail"
            );
            file.set_len(valid_len)?;
        }

        let shape = E::shape();
        let mut rows = BTreeMap::new();
        let mut next_id = 1;
        let mut sequence = 0;
        for entry in entries {
            sequence = entry.sequence + 1;
            match entry.operation {
                Operation::Save { id, payload } => {
                    let entity: E = mapper.map_to_object(&payload, &shape)?;
                    next_id = next_id.max(id.0.saturating_add(1));
                    rows.insert(id, entity);
                }
                Operation::Delete { id } => {
                    rows.remove(&id);
                }
            }
        }

        tracing::debug!(
            target: targets::STORE,
            path = %path.display(),
            entities = rows.len(),
            sequence,
            "journal replayed"
        );

        Ok(JournalStore {
            path,
            mapper,
            sync_mode,
            state: RwLock::new(JournalState {
                rows,
                file,
                sequence,
                next_id,
            }),
        })
    }

    pub fn open_with_config(config: &StoreConfig, mapper: EntityMapper) -> Result<Self> {
        Self::open(&config.journal_dir, mapper, config.sync_mode)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.state.read().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().rows.is_empty()
    }

    /// Rewrites the journal as one `Save` per live entity.
    pub fn compact(&self) -> Result<()> {
        let mut state = self.state.write();
        let tmp_path = self.path.with_extension("journal.tmp");

        let mut tmp = File::create(&tmp_path)?;
        let mut sequence = 0;
        for (id, entity) in &state.rows {
            let operation = Operation::Save {
                id: *id,
                payload: self.mapper.map_to_string(entity)?,
            };
            write_entry(&mut tmp, sequence, operation)?;
            sequence += 1;
        }
        tmp.sync_all()?;
        drop(tmp);

        fs::rename(&tmp_path, &self.path)?;
        state.file = OpenOptions::new().read(true).append(true).open(&self.path)?;
        state.sequence = sequence;

        tracing::debug!(
            target: targets::STORE,
            path = %self.path.display(),
            entities = state.rows.len(),
            "journal compacted"
        );
        Ok(())
    }

    fn append(&self, state: &mut JournalState<E>, operation: Operation) -> Result<()> {
        write_entry(&mut state.file, state.sequence, operation)?;
        state.sequence += 1;
        if self.sync_mode == SyncMode::Immediate {
            state.file.sync_data()?;
        }
        Ok(())
    }
}

impl<E: SearchEntity> PrimaryStore<E> for JournalStore<E> {
    fn save(&self, mut entity: E) -> Result<E> {
        let mut state = self.state.write();
        let id = match entity.id() {
            Some(id) => id,
            None => {
                if state.next_id == u64::MAX {
                    return Err(Error::new(
                        ErrorKind::InvalidInput,
                        format!("id sequence of {} exhausted", E::INDEX_NAME),
                    ));
                }
                let id = EntityId(state.next_id);
                entity.set_id(id);
                id
            }
        };

        let payload = self.mapper.map_to_string(&entity)?;
        self.append(&mut state, Operation::Save { id, payload })?;
        state.next_id = state.next_id.max(id.0.saturating_add(1));
        state.rows.insert(id, entity.clone());
        Ok(entity)
    }

    fn find_by_id(&self, id: EntityId) -> Result<Option<E>> {
        Ok(self.state.read().rows.get(&id).cloned())
    }

    fn find_all(&self) -> Result<Vec<E>> {
        Ok(self.state.read().rows.values().cloned().collect())
    }

    fn delete(&self, id: EntityId) -> Result<()> {
        let mut state = self.state.write();
        if !state.rows.contains_key(&id) {
            return Ok(());
        }
        self.append(&mut state, Operation::Delete { id })?;
        state.rows.remove(&id);
        Ok(())
    }
}

/// The parts of an open journal file an append needs.
trait JournalFile: Write {
    fn byte_len(&self) -> io::Result<u64>;

    fn truncate_to(&mut self, len: u64) -> io::Result<()>;
}

impl JournalFile for File {
    fn byte_len(&self) -> io::Result<u64> {
        Ok(self.metadata()?.len())
    }

    fn truncate_to(&mut self, len: u64) -> io::Result<()> {
        self.set_len(len)
    }
}

fn encode_frame(sequence: u64, operation: Operation) -> Result<Vec<u8>> {
    let entry = JournalEntry {
        sequence,
        operation,
        timestamp: Utc::now(),
    };
    let data = bincode::serialize(&entry)?;
    if data.len() > MAX_ENTRY_LEN {
        return Err(Error::new(
            ErrorKind::InvalidInput,
            format!("journal entry of {} bytes exceeds the {} byte limit", data.len(), MAX_ENTRY_LEN),
        ));
    }

    let mut frame = Vec::with_capacity(4 + data.len());
    frame.extend_from_slice(&(data.len() as u32).to_le_bytes());
    frame.extend_from_slice(&data);
    Ok(frame)
}

/// Appends `frame` whole or not at all.
fn append_frame<F: JournalFile>(file: &mut F, frame: &[u8]) -> Result<()> {
    let len = file.byte_len()?;
    if let Err(err) = file.write_all(frame) {
        if let Err(rollback) = file.truncate_to(len) {
            tracing::error!(
                target: targets::STORE,
                len,
                error = %rollback,
                "could not cut off a partially written journal frame"
            );
        }
        return Err(err.into());
    }
    Ok(())
}

fn write_entry(file: &mut File, sequence: u64, operation: Operation) -> Result<()> {
    let frame = encode_frame(sequence, operation)?;
    append_frame(file, &frame)
}

/// Reads every complete frame; returns them with the byte length they span.
fn read_entries(file: &mut File, path: &Path) -> Result<(Vec<JournalEntry>, u64)> {
    let file_len = file.metadata()?.len();
    file.seek(SeekFrom::Start(0))?;
    let mut reader = BufReader::new(&*file);

    let mut entries = Vec::new();
    let mut position = 0u64;
    while file_len - position >= 4 {
        let mut len_buf = [0u8; 4];
        reader.read_exact(&mut len_buf)?;
        let len = u32::from_le_bytes(len_buf) as usize;

        if len > MAX_ENTRY_LEN {
            return Err(Error::new(
                ErrorKind::Parse,
                format!("journal {} corrupted at byte {}: frame of {} bytes", path.display(), position, len),
            ));
        }
        if file_len - position - 4 < len as u64 {
            break;
        }

        let mut data = vec![0u8; len];
        reader.read_exact(&mut data)?;
        let entry: JournalEntry = bincode::deserialize(&data).map_err(|e| {
            Error::with_source(
                ErrorKind::Parse,
                format!("journal {} corrupted at byte {}", path.display(), position),
                *e,
            )
        })?;

        entries.push(entry);
        position += 4 + len as u64;
    }

    Ok((entries, position))
}
