use crate::domain::constants::datastore;
use crate::domain::{Ecid, IdentityError, IdentityProperties};
use crate::ports::IdentityStore;
use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File-backed implementation of [`IdentityStore`].
///
/// The aggregate is persisted as one JSON document
/// (`identity.properties`) in the data directory. Writes go through a
/// temporary file and an atomic rename so consecutive saves are ordered and a
/// crash never leaves a half-written document. The legacy migration read
/// inspects the direct identity component's own store file in the same
/// directory.
pub struct FileIdentityStore {
    data_dir: PathBuf,
}

impl FileIdentityStore {
    /// Create a store rooted at `data_dir`, creating the directory if needed.
    pub fn new(data_dir: impl Into<PathBuf>) -> Result<Self, IdentityError> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir)?;
        Ok(Self { data_dir })
    }

    fn properties_path(&self) -> PathBuf {
        self.data_dir.join(datastore::IDENTITY_PROPERTIES)
    }

    fn direct_store_path(&self) -> PathBuf {
        self.data_dir.join(datastore::IDENTITY_DIRECT_PROPERTIES)
    }

    fn read_json(path: &Path) -> Result<Option<Value>, IdentityError> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(err) => {
                // Unreadable store content degrades to "no data".
                debug!(path = %path.display(), error = %err, "Ignoring malformed store file");
                Ok(None)
            }
        }
    }
}

impl IdentityStore for FileIdentityStore {
    fn load(&self) -> Result<Option<IdentityProperties>, IdentityError> {
        let Some(value) = Self::read_json(&self.properties_path())? else {
            return Ok(None);
        };
        Ok(Some(serde_json::from_value(value)?))
    }

    fn save(&self, properties: &IdentityProperties) -> Result<(), IdentityError> {
        let path = self.properties_path();
        let tmp = path.with_extension("tmp");

        let json = serde_json::to_string(properties)?;
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn load_legacy_ecid(&self) -> Result<Option<Ecid>, IdentityError> {
        let Some(value) = Self::read_json(&self.direct_store_path())? else {
            return Ok(None);
        };

        let ecid = value
            .get(datastore::IDENTITY_DIRECT_ECID_KEY)
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .map(Ecid::from_string);
        Ok(ecid)
    }
}
