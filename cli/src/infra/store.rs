//! Object store transport — HTTP (S3-compatible gateway) and local-mirror
//! backends, plus the bounded-retry decorator.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};

use crate::application::ports::{ObjectMeta, ObjectStore};
use crate::domain::config::{RetryConfig, StoreConfig};

/// Build the configured store backend wrapped in the retry policy.
///
/// The backend is chosen from the endpoint scheme: `http(s)://` talks to
/// an S3-compatible gateway, `file://` reads a local mirror (also what the
/// integration tests use).
///
/// # Errors
///
/// Returns an error for an unsupported endpoint scheme.
pub fn open(store: &StoreConfig, retry: &RetryConfig) -> Result<RetryingStore<StoreBackend>> {
    let backend = if let Some(path) = store.endpoint.strip_prefix("file://") {
        StoreBackend::Fs(FsObjectStore::new(Path::new(path).join(&store.bucket)))
    } else if store.endpoint.starts_with("http://") || store.endpoint.starts_with("https://") {
        StoreBackend::Http(HttpObjectStore::new(store))
    } else {
        anyhow::bail!(
            "unsupported object store endpoint {} (expected http(s):// or file://)",
            store.endpoint
        );
    };
    Ok(RetryingStore::new(backend, retry))
}

/// Either production backend, behind one concrete type so the retry
/// decorator stays object-free.
#[derive(Debug)]
pub enum StoreBackend {
    Http(HttpObjectStore),
    Fs(FsObjectStore),
}

impl ObjectStore for StoreBackend {
    fn probe(&self, key: &str) -> Result<Option<ObjectMeta>> {
        match self {
            StoreBackend::Http(store) => store.probe(key),
            StoreBackend::Fs(store) => store.probe(key),
        }
    }

    fn fetch(&self, key: &str, dest: &Path) -> Result<u64> {
        match self {
            StoreBackend::Http(store) => store.fetch(key, dest),
            StoreBackend::Fs(store) => store.fetch(key, dest),
        }
    }
}

// ── HTTP backend ──────────────────────────────────────────────────────────────

/// S3-compatible gateway over blocking HTTP: HEAD to probe, GET to fetch,
/// keyed as `{endpoint}/{bucket}/{key}`.
#[derive(Debug)]
pub struct HttpObjectStore {
    agent: ureq::Agent,
    endpoint: String,
    bucket: String,
    auth_token: Option<String>,
}

impl HttpObjectStore {
    #[must_use]
    pub fn new(config: &StoreConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build();
        Self {
            agent,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            bucket: config.bucket.clone(),
            auth_token: config.auth_token.clone(),
        }
    }

    fn url_for(&self, key: &str) -> String {
        format!("{}/{}/{}", self.endpoint, self.bucket, key)
    }

    fn request(&self, method: &str, url: &str) -> ureq::Request {
        let mut request = self.agent.request(method, url);
        if let Some(token) = &self.auth_token {
            request = request.set("Authorization", &format!("Bearer {token}"));
        }
        request
    }
}

impl ObjectStore for HttpObjectStore {
    fn probe(&self, key: &str) -> Result<Option<ObjectMeta>> {
        let url = self.url_for(key);
        match self.request("HEAD", &url).call() {
            Ok(response) => {
                let size = response
                    .header("Content-Length")
                    .and_then(|value| value.parse().ok());
                Ok(Some(ObjectMeta { size }))
            }
            Err(ureq::Error::Status(404, _)) => Ok(None),
            Err(err) => Err(err).with_context(|| format!("probing {url}")),
        }
    }

    fn fetch(&self, key: &str, dest: &Path) -> Result<u64> {
        let url = self.url_for(key);
        let response = self
            .request("GET", &url)
            .call()
            .with_context(|| format!("downloading {url}"))?;
        let mut file =
            File::create(dest).with_context(|| format!("creating {}", dest.display()))?;
        let bytes = io::copy(&mut response.into_reader(), &mut file)
            .with_context(|| format!("writing {url} to {}", dest.display()))?;
        Ok(bytes)
    }
}

// ── Local mirror backend ──────────────────────────────────────────────────────

/// Bundle store backed by a directory tree (`file://` endpoint), laid out
/// exactly like the bucket: `<mirror>/<bucket>/<key>`.
#[derive(Debug)]
pub struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }
}

impl ObjectStore for FsObjectStore {
    fn probe(&self, key: &str) -> Result<Option<ObjectMeta>> {
        let path = self.root.join(key);
        match std::fs::metadata(&path) {
            Ok(meta) if meta.is_file() => Ok(Some(ObjectMeta {
                size: Some(meta.len()),
            })),
            Ok(_) => Ok(None),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err).with_context(|| format!("probing {}", path.display())),
        }
    }

    fn fetch(&self, key: &str, dest: &Path) -> Result<u64> {
        let path = self.root.join(key);
        std::fs::copy(&path, dest)
            .with_context(|| format!("copying {} to {}", path.display(), dest.display()))
    }
}

// ── Retry decorator ───────────────────────────────────────────────────────────

/// Bounded exponential backoff around any [`ObjectStore`].
///
/// Only transport failures are retried; "object does not exist" is a
/// definitive answer and returns immediately.
#[derive(Debug)]
pub struct RetryingStore<S> {
    inner: S,
    attempts: u32,
    base_delay: Duration,
}

impl<S> RetryingStore<S> {
    #[must_use]
    pub fn new(inner: S, retry: &RetryConfig) -> Self {
        Self {
            inner,
            attempts: retry.attempts.max(1),
            base_delay: retry.base_delay(),
        }
    }

    fn with_retries<T>(&self, mut op: impl FnMut() -> Result<T>) -> Result<T> {
        let mut delay = self.base_delay;
        let mut attempt = 0;
        loop {
            attempt += 1;
            match op() {
                Ok(value) => return Ok(value),
                Err(_) if attempt < self.attempts => {
                    std::thread::sleep(delay);
                    delay = delay.saturating_mul(2);
                }
                Err(err) => return Err(err),
            }
        }
    }
}

impl<S: ObjectStore> ObjectStore for RetryingStore<S> {
    fn probe(&self, key: &str) -> Result<Option<ObjectMeta>> {
        self.with_retries(|| self.inner.probe(key))
    }

    fn fetch(&self, key: &str, dest: &Path) -> Result<u64> {
        self.with_retries(|| self.inner.fetch(key, dest))
    }
}
