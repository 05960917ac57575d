//! Topology descriptor loading.
//!
//! Descriptor text can come from a resource compiled into the binary, from
//! object storage, or from the local filesystem. A [`LoaderChain`] tries its
//! sources in order and parses the first non-empty text exactly once.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::ShardTopologySpec;
use crate::config::TopologyConfig;
use crate::error::{Result, ValidateError};

/// Resources compiled into the library, addressable by name.
const EMBEDDED_RESOURCES: &[(&str, &str)] = &[(
    "sample-shard-spec.json",
    include_str!("../../resources/sample-shard-spec.json"),
)];

/// Look up an embedded resource by name.
pub fn embedded_resource(name: &str) -> Option<&'static str> {
    EMBEDDED_RESOURCES
        .iter()
        .find(|(resource, _)| *resource == name)
        .map(|(_, text)| *text)
}

/// One place a topology descriptor may live.
#[async_trait]
pub trait TopologySource: Send + Sync {
    /// Human-readable description for logs and errors.
    fn describe(&self) -> String;

    /// Fetch the descriptor text.
    ///
    /// `Ok(None)` means "not here, try the next source". Errors are reserved
    /// for failures that should stop the chain (e.g. permission denied).
    async fn fetch(&self) -> Result<Option<String>>;
}

/// A resource compiled into the binary.
#[derive(Debug, Clone)]
pub struct EmbeddedSource {
    name: String,
}

impl EmbeddedSource {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[async_trait]
impl TopologySource for EmbeddedSource {
    fn describe(&self) -> String {
        format!("embedded resource '{}'", self.name)
    }

    async fn fetch(&self) -> Result<Option<String>> {
        Ok(embedded_resource(&self.name).map(str::to_string))
    }
}

/// A `gs://bucket/object` location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GcsObject {
    pub bucket: String,
    pub object: String,
}

impl GcsObject {
    /// Parse a full `gs://bucket/path/to/object` path.
    ///
    /// Returns `None` for anything that is not a complete object-store path.
    pub fn parse(path: &str) -> Option<Self> {
        let rest = path.trim().strip_prefix("gs://")?;
        let (bucket, object) = rest.split_once('/')?;
        if bucket.is_empty() || object.is_empty() {
            return None;
        }
        Some(Self {
            bucket: bucket.to_string(),
            object: object.to_string(),
        })
    }
}

/// Read access to an object store.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch an object as UTF-8 text; `Ok(None)` if it does not exist.
    async fn get_object(&self, bucket: &str, object: &str) -> Result<Option<String>>;
}

/// Object store backed by a local directory laid out as `root/bucket/object`,
/// e.g. a gcsfuse mount or a synced mirror.
#[derive(Debug, Clone)]
pub struct MirrorObjectStore {
    root: PathBuf,
}

impl MirrorObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl ObjectStore for MirrorObjectStore {
    async fn get_object(&self, bucket: &str, object: &str) -> Result<Option<String>> {
        read_optional(&self.root.join(bucket).join(object)).await
    }
}

/// A descriptor stored in object storage.
pub struct ObjectStoreSource {
    path: String,
    store: Arc<dyn ObjectStore>,
}

impl ObjectStoreSource {
    pub fn new(path: impl Into<String>, store: Arc<dyn ObjectStore>) -> Self {
        Self {
            path: path.into(),
            store,
        }
    }
}

#[async_trait]
impl TopologySource for ObjectStoreSource {
    fn describe(&self) -> String {
        format!("object store path '{}'", self.path)
    }

    async fn fetch(&self) -> Result<Option<String>> {
        let Some(location) = GcsObject::parse(&self.path) else {
            debug!("{} is not an object store path", self.path);
            return Ok(None);
        };
        self.store
            .get_object(&location.bucket, &location.object)
            .await
    }
}

/// A descriptor on the local filesystem.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl TopologySource for FileSource {
    fn describe(&self) -> String {
        format!("file {:?}", self.path)
    }

    async fn fetch(&self) -> Result<Option<String>> {
        read_optional(&self.path).await
    }
}

async fn read_optional(path: &Path) -> Result<Option<String>> {
    match tokio::fs::read_to_string(path).await {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Ordered fallback over topology sources.
#[derive(Default)]
pub struct LoaderChain {
    sources: Vec<Box<dyn TopologySource>>,
}

impl LoaderChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a source; sources are tried in insertion order.
    pub fn with_source(mut self, source: impl TopologySource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// Build the chain described by a run configuration:
    /// embedded resource, then object store, then local file.
    ///
    /// A `gs://` path is also tried as a local path once the object store
    /// comes back empty.
    pub fn from_config(config: &TopologyConfig) -> Self {
        let mut chain = Self::new();

        if let Some(ref resource) = config.resource {
            chain = chain.with_source(EmbeddedSource::new(resource));
        }

        if let Some(ref path) = config.path {
            if GcsObject::parse(path).is_some() {
                match config.object_store_root {
                    Some(ref root) => {
                        let store = Arc::new(MirrorObjectStore::new(root));
                        chain = chain.with_source(ObjectStoreSource::new(path, store));
                    }
                    None => warn!(
                        "Topology path {} is an object store path but no object_store_root is configured",
                        path
                    ),
                }
            }
            chain = chain.with_source(FileSource::new(path));
        }

        chain
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Text of the first source that yields a non-blank descriptor.
    pub async fn load_text(&self) -> Result<String> {
        for source in &self.sources {
            match source.fetch().await? {
                Some(text) if !text.trim().is_empty() => {
                    info!("Loaded topology descriptor from {}", source.describe());
                    return Ok(text);
                }
                Some(_) => debug!("{} is empty, trying next source", source.describe()),
                None => debug!("{} not found, trying next source", source.describe()),
            }
        }

        let tried: Vec<String> = self.sources.iter().map(|s| s.describe()).collect();
        Err(ValidateError::Config(format!(
            "no topology descriptor found (tried: {})",
            if tried.is_empty() {
                "no sources configured".to_string()
            } else {
                tried.join(", ")
            }
        )))
    }

    /// Load and parse the topology.
    pub async fn load(&self) -> Result<ShardTopologySpec> {
        let text = self.load_text().await?;
        ShardTopologySpec::from_json_str(&text)
    }
}
