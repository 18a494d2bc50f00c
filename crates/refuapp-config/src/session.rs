// ── File-backed session store ──
//
// One TOML file holds a table per profile:
//
//     [default]
//     token = "eyJhbGciOi..."
//
// Every call re-reads the file, so concurrent CLI invocations see each
// other's logins.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use refuapp_core::{CoreError, KeyValueStore};
use toml::{Table, Value};
use tracing::debug;

/// [`KeyValueStore`] scoped to one profile inside a shared TOML file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    scope: String,
    /// Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>, scope: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            scope: scope.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// The session file for `profile` at the platform data location.
    pub fn for_profile(profile: &str) -> Self {
        Self::new(crate::session_path(), profile)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Table, CoreError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Table::new()),
            Err(e) => {
                return Err(CoreError::storage(format!(
                    "cannot read {}: {e}",
                    self.path.display()
                )));
            }
        };
        raw.parse::<Table>().map_err(|e| {
            CoreError::storage(format!("corrupt session file {}: {e}", self.path.display()))
        })
    }

    fn write(&self, table: &Table) -> Result<(), CoreError> {
        let io_err =
            |e: std::io::Error| CoreError::storage(format!("cannot write {}: {e}", self.path.display()));

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let raw = toml::to_string_pretty(table)
            .map_err(|e| CoreError::storage(format!("cannot encode session: {e}")))?;
        std::fs::write(&self.path, raw).map_err(io_err)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))
                .map_err(io_err)?;
        }
        Ok(())
    }

    fn update(&self, change: impl FnOnce(&mut Table)) -> Result<(), CoreError> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| CoreError::storage("session store lock poisoned"))?;
        let mut table = self.read()?;
        change(&mut table);
        self.write(&table)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        let table = self.read()?;
        Ok(table
            .get(&self.scope)
            .and_then(Value::as_table)
            .and_then(|scope| scope.get(key))
            .and_then(Value::as_str)
            .map(str::to_owned))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CoreError> {
        debug!(scope = %self.scope, key, "storing session value");
        self.update(|table| {
            let scope = table
                .entry(self.scope.clone())
                .or_insert_with(|| Value::Table(Table::new()));
            if !scope.is_table() {
                *scope = Value::Table(Table::new());
            }
            if let Value::Table(scope) = scope {
                scope.insert(key.to_owned(), Value::String(value.to_owned()));
            }
        })
    }

    fn remove(&self, key: &str) -> Result<(), CoreError> {
        if self.get(key)?.is_none() {
            return Ok(());
        }
        debug!(scope = %self.scope, key, "removing session value");
        self.update(|table| {
            if let Some(Value::Table(scope)) = table.get_mut(&self.scope) {
                scope.remove(key);
            }
        })
    }
}
