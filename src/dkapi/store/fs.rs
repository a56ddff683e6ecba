use super::StateStore;
use crate::config::DkapiPaths;
use crate::error::{DkapiError, Result};
use crate::model::{mask_secret, State};
use crate::parametrics::ParametricsCache;
use serde::Serialize;
use serde_json::Value;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::Path;

pub struct FileStore {
    paths: DkapiPaths,
}

impl FileStore {
    pub fn new(paths: DkapiPaths) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &DkapiPaths {
        &self.paths
    }
}

impl StateStore for FileStore {
    fn load_state(&self) -> Result<State> {
        let content = fs::read_to_string(&self.paths.state_file).map_err(DkapiError::Io)?;
        let value: Value = serde_json::from_str(&content).map_err(DkapiError::Serialization)?;
        let state = State::from_value(value)?;
        tracing::debug!(
            path = %self.paths.state_file.display(),
            client_id = %mask_secret(&state.client_id),
            has_refresh_token = state.auth_context.refresh_token().is_some(),
            "loaded state/config"
        );
        Ok(state)
    }

    fn save_state(&mut self, state: &State) -> Result<()> {
        let mut value = serde_json::to_value(state).map_err(DkapiError::Serialization)?;
        sort_keys(&mut value);
        write_json_atomic(&self.paths.state_file, &value)
    }

    fn load_parametrics(&self) -> ParametricsCache {
        let loaded = fs::read_to_string(&self.paths.parametrics_file)
            .map_err(DkapiError::Io)
            .and_then(|content| serde_json::from_str(&content).map_err(DkapiError::Serialization));

        match loaded {
            Ok(cache) => cache,
            Err(e) => {
                tracing::debug!(error = %e, "starting with an empty parametrics cache");
                ParametricsCache::default()
            }
        }
    }

    fn save_parametrics(&mut self, cache: &ParametricsCache) -> Result<()> {
        write_json_atomic(&self.paths.parametrics_file, cache)
    }
}

/// Order every object's keys, nested ones included.
fn sort_keys(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.sort_keys();
            map.values_mut().for_each(sort_keys);
        }
        Value::Array(items) => items.iter_mut().for_each(sort_keys),
        _ => {}
    }
}

/// Write `value` as 4-space indented JSON next to `path`, then rename it
/// into place so a crash never leaves a half-written file behind.
fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            fs::create_dir_all(dir).map_err(DkapiError::Io)?;
        }
    }

    let mut content = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut content, formatter);
    value
        .serialize(&mut serializer)
        .map_err(DkapiError::Serialization)?;

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = std::path::PathBuf::from(tmp_name);

    let mut file = create_private(&tmp_path).map_err(DkapiError::Io)?;
    file.write_all(&content).map_err(DkapiError::Io)?;
    file.sync_all().map_err(DkapiError::Io)?;
    drop(file);
    // A stale temp file keeps its old mode; the create mode only applies to new files.
    restrict_permissions(&tmp_path)?;
    fs::rename(&tmp_path, path).map_err(DkapiError::Io)?;
    Ok(())
}

/// Open `path` for writing. New files are created 0600, so the secrets
/// are never readable by others, not even before the first write.
fn create_private(path: &Path) -> std::io::Result<File> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    options.open(path)
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600)).map_err(DkapiError::Io)
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<()> {
    Ok(())
}
