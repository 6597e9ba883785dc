use std::{
    fs::{self, File},
    io::{self, Write},
    path::{Path, PathBuf},
};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tracing::{info, warn};

use crate::{
    errors::{LedgerError, Result},
    ledger::StockLedger,
};

pub const DEFAULT_FILE_NAME: &str = "inventory.json";
const TMP_SUFFIX: &str = "tmp";
const INDENT: &[u8] = b"    ";

/// Single-file JSON snapshot store for one ledger.
#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn default_path() -> PathBuf {
        PathBuf::from(DEFAULT_FILE_NAME)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the snapshot held on disk.
    ///
    /// A missing or malformed file yields an empty ledger. Any other IO
    /// failure is returned to the caller.
    pub fn load(&self) -> Result<StockLedger> {
        let ledger = load_ledger_from_path(&self.path)?;
        info!(path = %self.path.display(), items = ledger.len(), "ledger loaded");
        Ok(ledger)
    }

    pub fn save(&self, ledger: &StockLedger) -> Result<()> {
        save_ledger_to_path(ledger, &self.path)?;
        info!(path = %self.path.display(), items = ledger.len(), "ledger saved");
        Ok(())
    }
}

impl Default for JsonStore {
    fn default() -> Self {
        Self::new(Self::default_path())
    }
}

/// Writes the full snapshot, staging it in a sibling temp file first so an
/// interrupted write leaves the previous snapshot intact.
///
/// A read-only destination is refused rather than replaced, and an existing
/// snapshot keeps its permissions. Symlinked destinations are written through
/// to the file they point at.
pub fn save_ledger_to_path(ledger: &StockLedger, path: &Path) -> Result<()> {
    let data = serialize_ledger(ledger)?;
    let target = resolve_target(path);
    let existing = match fs::metadata(&target) {
        Ok(meta) => Some(meta.permissions()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => None,
        Err(err) => return Err(err.into()),
    };
    if existing.as_ref().is_some_and(|perms| perms.readonly()) {
        return Err(LedgerError::Io(io::Error::new(
            io::ErrorKind::PermissionDenied,
            format!("snapshot `{}` is read-only", target.display()),
        )));
    }

    let tmp = tmp_path(&target);
    let staged = write_atomic(&tmp, &data).and_then(|()| {
        if let Some(perms) = existing {
            fs::set_permissions(&tmp, perms)?;
        }
        fs::rename(&tmp, &target)?;
        Ok(())
    });
    if staged.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    staged
}

fn resolve_target(path: &Path) -> PathBuf {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.file_type().is_symlink() => {
            fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
        }
        _ => path.to_path_buf(),
    }
}

/// Reads a snapshot, recovering to an empty ledger when the file is absent or
/// its contents are not a valid snapshot.
pub fn load_ledger_from_path(path: &Path) -> Result<StockLedger> {
    let data = match fs::read_to_string(path) {
        Ok(data) => data,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            info!(path = %path.display(), "no snapshot found, starting empty");
            return Ok(StockLedger::new());
        }
        Err(err) if err.kind() == io::ErrorKind::InvalidData => {
            warn!(path = %path.display(), "snapshot is not valid UTF-8, starting empty");
            return Ok(StockLedger::new());
        }
        Err(err) => return Err(LedgerError::Io(err)),
    };

    match parse_snapshot(&data) {
        Ok(ledger) => Ok(ledger),
        Err(reason) => {
            warn!(path = %path.display(), %reason, "malformed snapshot, starting empty");
            Ok(StockLedger::new())
        }
    }
}

fn parse_snapshot(data: &str) -> std::result::Result<StockLedger, String> {
    let ledger: StockLedger = serde_json::from_str(data).map_err(|err| err.to_string())?;
    if ledger.iter().any(|(item, _)| item.is_empty()) {
        return Err("snapshot contains an empty item name".into());
    }
    Ok(ledger)
}

fn serialize_ledger(ledger: &StockLedger) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(INDENT));
    ledger.serialize(&mut serializer)?;
    Ok(buffer)
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let mut file = File::create(path)?;
    file.write_all(data)?;
    file.flush()?;
    Ok(())
}
