//! [`BootstrapSource`] reading the JSON datasets bundled with the device.

use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::Value;

use devmgmt_app::ports::{BootstrapSource, ResourceBundleFile};
use devmgmt_domain::error::DevMgmtError;
use devmgmt_domain::location::LocationRecord;

use crate::error::FsError;

/// Dataset reader rooted at the device data directory.
#[derive(Debug, Clone)]
pub struct FsDatasets {
    root: PathBuf,
}

impl FsDatasets {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn location_file(&self, name: &str) -> PathBuf {
        self.root.join("location").join(name)
    }
}

async fn read_json(path: &Path) -> Result<Option<Value>, FsError> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(FsError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    serde_json::from_str(&content)
        .map(Some)
        .map_err(|source| FsError::Json {
            path: path.to_path_buf(),
            source,
        })
}

/// Records under `result.response`; a missing file yields no records.
async fn read_records(path: &Path) -> Result<Vec<LocationRecord>, FsError> {
    let Some(mut json) = read_json(path).await? else {
        return Ok(Vec::new());
    };
    let records = json
        .pointer_mut("/result/response")
        .map(Value::take)
        .unwrap_or_else(|| Value::Array(Vec::new()));
    serde_json::from_value(records).map_err(|source| FsError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Every `*.json` file below `dir`, sorted by path.
async fn collect_json_files(dir: &Path) -> Result<Vec<PathBuf>, FsError> {
    let mut pending = vec![dir.to_path_buf()];
    let mut files = Vec::new();
    while let Some(current) = pending.pop() {
        let mut entries = match tokio::fs::read_dir(&current).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => continue,
            Err(source) => return Err(FsError::Io { path: current, source }),
        };
        loop {
            let entry = entries.next_entry().await.map_err(|source| FsError::Io {
                path: current.clone(),
                source,
            })?;
            let Some(entry) = entry else { break };
            let path = entry.path();
            let file_type = entry.file_type().await.map_err(|source| FsError::Io {
                path: path.clone(),
                source,
            })?;
            if file_type.is_dir() {
                pending.push(path);
            } else if path.extension().is_some_and(|ext| ext == "json") {
                files.push(path);
            }
        }
    }
    files.sort();
    Ok(files)
}

impl BootstrapSource for FsDatasets {
    fn read_states(&self) -> impl Future<Output = Result<Vec<LocationRecord>, DevMgmtError>> + Send {
        let path = self.location_file("state.json");
        async move { Ok(read_records(&path).await?) }
    }

    fn read_districts(
        &self,
        state_id: &str,
    ) -> impl Future<Output = Result<Vec<LocationRecord>, DevMgmtError>> + Send {
        let path = self.location_file(&format!("district-{state_id}.json"));
        async move { Ok(read_records(&path).await?) }
    }

    fn read_resource_bundles(
        &self,
    ) -> impl Future<Output = Result<Vec<ResourceBundleFile>, DevMgmtError>> + Send {
        let dir = self.root.join("resourceBundles");
        async move {
            let mut bundles = Vec::new();
            for path in collect_json_files(&dir).await? {
                let Some(id) = path.file_stem().and_then(|stem| stem.to_str()) else {
                    continue;
                };
                let id = id.to_string();
                match read_json(&path).await? {
                    Some(mut json) => {
                        let body = json.get_mut("result").map(Value::take).unwrap_or(json);
                        bundles.push(ResourceBundleFile { id, body });
                    }
                    None => tracing::warn!(path = %path.display(), "resource bundle vanished"),
                }
            }
            Ok(bundles)
        }
    }
}
