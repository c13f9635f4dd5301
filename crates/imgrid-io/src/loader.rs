//! [`ImageLoader`] backed by the local filesystem and, with the `remote`
//! feature, HTTP(S).

use std::time::Duration;

use imgrid_pipeline::{ImageLoader, LoadError};
use serde::{Deserialize, Serialize};

use crate::paths;

/// Settings for [`FsLoader`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Overall time limit for one remote fetch, connect to last byte.
    pub remote_timeout: Duration,

    /// Largest remote response body accepted, in bytes.
    pub max_remote_bytes: u64,
}

impl LoaderConfig {
    /// Default remote timeout.
    pub const DEFAULT_REMOTE_TIMEOUT: Duration = Duration::from_secs(30);

    /// Default remote body limit (64 MiB).
    pub const DEFAULT_MAX_REMOTE_BYTES: u64 = 64 * 1024 * 1024;
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            remote_timeout: Self::DEFAULT_REMOTE_TIMEOUT,
            max_remote_bytes: Self::DEFAULT_MAX_REMOTE_BYTES,
        }
    }
}

/// Reads local files, `file://` URIs and (with the `remote` feature)
/// `http(s)://` or bare `www.` URLs.
///
/// Other schemes such as `ftp:` and `data:` are rejected with
/// [`LoadError::Remote`].
#[derive(Debug, Clone)]
pub struct FsLoader {
    config: LoaderConfig,
    #[cfg(feature = "remote")]
    agent: ureq::Agent,
}

impl FsLoader {
    /// Create a loader with the given settings.
    #[must_use]
    pub fn new(config: LoaderConfig) -> Self {
        Self {
            config,
            #[cfg(feature = "remote")]
            agent: ureq::Agent::config_builder()
                .timeout_global(Some(config.remote_timeout))
                .build()
                .into(),
        }
    }

    /// The active settings.
    #[must_use]
    pub const fn config(&self) -> &LoaderConfig {
        &self.config
    }

    #[cfg(feature = "remote")]
    fn fetch(&self, location: &str) -> Result<Vec<u8>, LoadError> {
        let url = fetch_url(location);
        tracing::debug!(%url, "fetching remote image");
        let mut response = self
            .agent
            .get(&url)
            .call()
            .map_err(|e| LoadError::Remote(e.to_string()))?;
        response
            .body_mut()
            .with_config()
            .limit(self.config.max_remote_bytes)
            .read_to_vec()
            .map_err(|e| LoadError::Remote(e.to_string()))
    }

    #[cfg(not(feature = "remote"))]
    #[allow(clippy::unused_self)]
    fn fetch(&self, location: &str) -> Result<Vec<u8>, LoadError> {
        tracing::debug!(url = %fetch_url(location), "remote fetching not compiled in");
        Err(LoadError::RemoteDisabled)
    }
}

/// URL actually requested for `location`: bare `www.` hosts get an
/// `http://` scheme.
fn fetch_url(location: &str) -> String {
    if location
        .get(..4)
        .is_some_and(|p| p.eq_ignore_ascii_case("www."))
    {
        format!("http://{location}")
    } else {
        location.to_owned()
    }
}

impl Default for FsLoader {
    fn default() -> Self {
        Self::new(LoaderConfig::default())
    }
}

impl ImageLoader for FsLoader {
    fn load(&self, location: &str) -> Result<Vec<u8>, LoadError> {
        if paths::is_http(location) {
            return self.fetch(location);
        }
        if let Some(path) = strip_file_scheme(location) {
            tracing::debug!(path, "reading file URI");
            return Ok(std::fs::read(path)?);
        }
        if paths::is_remote(location) {
            return Err(LoadError::Remote(format!(
                "unsupported scheme in {location}"
            )));
        }
        tracing::debug!(location, "reading local file");
        Ok(std::fs::read(location)?)
    }
}

/// `file:///tmp/a.png` -> `/tmp/a.png`; `file:a.png` -> `a.png`.
fn strip_file_scheme(location: &str) -> Option<&str> {
    let head = location.get(..5)?;
    if !head.eq_ignore_ascii_case("file:") {
        return None;
    }
    let rest = &location[5..];
    Some(rest.strip_prefix("//").unwrap_or(rest))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = LoaderConfig::default();
        assert_eq!(config.remote_timeout, Duration::from_secs(30));
        assert_eq!(config.max_remote_bytes, 64 * 1024 * 1024);
    }

    #[test]
    fn config_json_fills_missing_fields() {
        let config: LoaderConfig =
            serde_json::from_str(r#"{"remote_timeout":{"secs":5,"nanos":0}}"#).unwrap();
        assert_eq!(config.remote_timeout, Duration::from_secs(5));
        assert_eq!(
            config.max_remote_bytes,
            LoaderConfig::DEFAULT_MAX_REMOTE_BYTES
        );
    }

    #[test]
    fn reads_local_file_and_file_uri() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.bin");
        std::fs::write(&path, b"abc").unwrap();
        let loader = FsLoader::default();

        let location = path.to_str().unwrap();
        assert_eq!(loader.load(location).unwrap(), b"abc");

        let uri = format!("file://{location}");
        assert_eq!(loader.load(&uri).unwrap(), b"abc");
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.png");
        let err = FsLoader::default()
            .load(missing.to_str().unwrap())
            .unwrap_err();
        assert!(matches!(err, LoadError::Io(_)));
    }

    #[test]
    fn unsupported_scheme_is_rejected() {
        let err = FsLoader::default()
            .load("ftp://example.com/a.png")
            .unwrap_err();
        assert!(matches!(err, LoadError::Remote(msg) if msg.contains("ftp://")));
    }

    #[cfg(not(feature = "remote"))]
    #[test]
    fn http_without_remote_feature_is_disabled() {
        let err = FsLoader::default()
            .load("https://example.com/a.png")
            .unwrap_err();
        assert!(matches!(err, LoadError::RemoteDisabled));
    }

    #[test]
    fn bare_www_hosts_get_http_scheme() {
        assert_eq!(fetch_url("www.example.com/a.png"), "http://www.example.com/a.png");
        assert_eq!(fetch_url("WWW.example.com/a.png"), "http://WWW.example.com/a.png");
        assert_eq!(fetch_url("https://example.com/a.png"), "https://example.com/a.png");
    }

    #[test]
    fn file_scheme_stripping() {
        assert_eq!(strip_file_scheme("file:///tmp/a.png"), Some("/tmp/a.png"));
        assert_eq!(strip_file_scheme("FILE:a.png"), Some("a.png"));
        assert_eq!(strip_file_scheme("a.png"), None);
    }

    // --- remote fetching (local HTTP server) ---

    #[cfg(feature = "remote")]
    mod remote {
        use std::io::{BufRead, BufReader, Write};
        use std::net::{TcpListener, TcpStream};
        use std::thread::{self, JoinHandle};

        use super::*;

        /// Read one request's header block.
        fn read_request(stream: &TcpStream) {
            let mut reader = BufReader::new(stream);
            let mut line = String::new();
            while reader.read_line(&mut line).unwrap_or(0) > 0 {
                if line == "\r\n" {
                    break;
                }
                line.clear();
            }
        }

        /// Serve `status` with `body` to one client; return its base URL.
        fn serve_once(status: &'static str, body: Vec<u8>) -> (String, JoinHandle<()>) {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            let url = format!("http://{}", listener.local_addr().unwrap());
            let handle = thread::spawn(move || {
                let (mut stream, _) = listener.accept().unwrap();
                read_request(&stream);
                let head = format!(
                    "HTTP/1.1 {status}\r\nContent-Type: image/png\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    body.len()
                );
                let _ = stream.write_all(head.as_bytes());
                let _ = stream.write_all(&body);
                let _ = stream.flush();
            });
            (url, handle)
        }

        fn png_bytes() -> Vec<u8> {
            let mut bytes = b"\x89PNG\r\n\x1a\n".to_vec();
            bytes.extend(0_u8..64);
            bytes
        }

        #[test]
        fn fetches_body_over_http() {
            let body = png_bytes();
            let (url, server) = serve_once("200 OK", body.clone());
            let loaded = FsLoader::default().load(&format!("{url}/cat.png")).unwrap();
            assert_eq!(loaded, body);
            server.join().unwrap();
        }

        #[test]
        fn http_error_status_is_remote_error() {
            let (url, server) = serve_once("404 Not Found", Vec::new());
            let err = FsLoader::default()
                .load(&format!("{url}/missing.png"))
                .unwrap_err();
            assert!(matches!(err, LoadError::Remote(_)));
            server.join().unwrap();
        }

        #[test]
        fn body_over_limit_is_remote_error() {
            let (url, server) = serve_once("200 OK", png_bytes());
            let loader = FsLoader::new(LoaderConfig {
                max_remote_bytes: 8,
                ..LoaderConfig::default()
            });
            let err = loader.load(&format!("{url}/big.png")).unwrap_err();
            assert!(matches!(err, LoadError::Remote(_)));
            server.join().unwrap();
        }

        #[test]
        fn silent_server_times_out() {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            let url = format!("http://{}/slow.png", listener.local_addr().unwrap());
            let (done_tx, done_rx) = std::sync::mpsc::channel::<()>();
            let server = thread::spawn(move || {
                let (stream, _) = listener.accept().unwrap();
                // Hold the connection open without answering.
                let _ = done_rx.recv();
                drop(stream);
            });

            let loader = FsLoader::new(LoaderConfig {
                remote_timeout: Duration::from_millis(200),
                ..LoaderConfig::default()
            });
            let started = std::time::Instant::now();
            let err = loader.load(&url).unwrap_err();
            assert!(matches!(err, LoadError::Remote(_)));
            assert!(started.elapsed() < Duration::from_secs(10));

            done_tx.send(()).unwrap();
            server.join().unwrap();
        }
    }
}
