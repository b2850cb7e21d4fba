use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Local};
use log::{debug, info};
use reqwest::blocking::Client as HttpClient;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use url::Url;

use crate::archive::{Table, extract_first_entry, parse_table, split_lines};
use crate::error::{Error, Result};
use crate::query::Query;
use crate::sources::{FLUVIEW_URL, is_http_url};
use crate::value::ParamValue;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[cfg(windows)]
const LINE_ENDING: &str = "\r\n";
#[cfg(not(windows))]
const LINE_ENDING: &str = "\n";

#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub endpoint: String,
    pub timeout: Duration,
    pub user_agent: String,
    pub verify_tls: bool,
    /// Ignore `HTTP_PROXY`/`HTTPS_PROXY` and connect directly.
    pub no_proxy: bool,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            endpoint: FLUVIEW_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("fluview-rs/{}", env!("CARGO_PKG_VERSION")),
            verify_tls: true,
            no_proxy: false,
        }
    }
}

impl ClientOptions {
    /// Defaults, overridden by `FLUVIEW_URL` and `FLUVIEW_TIMEOUT_SECS` when set.
    pub fn from_env() -> Result<Self> {
        Self::default().with_env_vars(|name| std::env::var(name).ok())
    }

    fn with_env_vars(mut self, var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(url) = var("FLUVIEW_URL") {
            self.endpoint = url;
        }
        if let Some(secs) = var("FLUVIEW_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                Error::Config(format!("FLUVIEW_TIMEOUT_SECS must be whole seconds, got {secs:?}"))
            })?;
            self.timeout = Duration::from_secs(secs);
        }
        Ok(self)
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Blocking client for the FluView download endpoint.
#[derive(Debug, Clone)]
pub struct Client {
    endpoint: Url,
    http: HttpClient,
}

impl Client {
    pub fn new(opts: ClientOptions) -> Result<Self> {
        if !is_http_url(&opts.endpoint) {
            return Err(Error::Config(format!(
                "endpoint must be an http(s) url, got {}",
                opts.endpoint
            )));
        }
        let endpoint = Url::parse(&opts.endpoint)?;

        let mut headers = HeaderMap::new();
        let agent = HeaderValue::from_str(&opts.user_agent)
            .map_err(|_| Error::Config(format!("invalid user agent {:?}", opts.user_agent)))?;
        headers.insert(USER_AGENT, agent);

        let mut builder = HttpClient::builder()
            .default_headers(headers)
            .timeout(opts.timeout);
        if !opts.verify_tls {
            builder = builder.danger_accept_invalid_certs(true);
        }
        if opts.no_proxy {
            builder = builder.no_proxy();
        }
        let http = builder.build()?;

        Ok(Self { endpoint, http })
    }

    pub fn default_client() -> Result<Self> {
        Self::new(ClientOptions::default())
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Download the requested data as a table keyed by the header row.
    pub fn fetch_table(&self, query: &Query) -> Result<Table> {
        let text = self.fetch_text(query)?;
        parse_table(&text)
    }

    /// Download the requested data as non-empty lines, header first.
    pub fn fetch_lines(&self, query: &Query) -> Result<Vec<String>> {
        let text = self.fetch_text(query)?;
        Ok(split_lines(&text))
    }

    /// Download the requested data and write it line by line to `path`.
    ///
    /// Without a path the file is named after the local time, e.g.
    /// `2024-01-31_14:05:09.csv`, in the current directory.
    pub fn save_to_file(&self, query: &Query, path: Option<&Path>) -> Result<PathBuf> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => std::env::current_dir()?.join(default_filename(Local::now())),
        };

        let lines = self.fetch_lines(query)?;
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)?;
        let mut out = BufWriter::new(file);
        for line in &lines {
            out.write_all(line.as_bytes())?;
            out.write_all(LINE_ENDING.as_bytes())?;
        }
        out.flush()?;

        info!("wrote {} lines to {}", lines.len(), path.display());
        Ok(path)
    }

    fn fetch_text(&self, query: &Query) -> Result<String> {
        let payload = self.post(query)?;
        extract_first_entry(&payload)
    }

    fn post(&self, query: &Query) -> Result<Vec<u8>> {
        let form = query.form_fields();
        debug!("form body: {form:?}");
        info!("POST {}", self.endpoint);

        let mut resp = self
            .http
            .post(self.endpoint.clone())
            .form(&form)
            .send()?
            .error_for_status()?;
        let mut buf = Vec::new();
        resp.copy_to(&mut buf)?;

        info!("received {} bytes", buf.len());
        Ok(buf)
    }
}

/// File name used by [`Client::save_to_file`] when no path is given.
pub fn default_filename(now: DateTime<Local>) -> String {
    format!("{}.csv", now.format("%Y-%m-%d_%H:%M:%S"))
}

/// One query bound to one client.
///
/// Validates on construction, then downloads on demand.
#[derive(Debug, Clone)]
pub struct FluView {
    client: Client,
    query: Query,
}

impl FluView {
    pub fn new(
        data_sources: impl Into<ParamValue>,
        seasons: impl Into<ParamValue>,
        region: impl Into<ParamValue>,
        sub_regions: impl Into<ParamValue>,
    ) -> Result<Self> {
        let query = Query::new(data_sources, seasons, region, sub_regions)?;
        Ok(Self::with_client(Client::default_client()?, query))
    }

    pub fn with_client(client: Client, query: Query) -> Self {
        Self { client, query }
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn to_table(&self) -> Result<Table> {
        self.client.fetch_table(&self.query)
    }

    pub fn to_lines(&self) -> Result<Vec<String>> {
        self.client.fetch_lines(&self.query)
    }

    pub fn save_csv(&self, path: Option<&Path>) -> Result<PathBuf> {
        self.client.save_to_file(&self.query, path)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn default_filename_is_a_timestamp() {
        let now = Local.with_ymd_and_hms(2024, 1, 31, 14, 5, 9).unwrap();
        assert_eq!(default_filename(now), "2024-01-31_14:05:09.csv");
    }

    #[test]
    fn options_default_to_portal() {
        let opts = ClientOptions::default();
        assert_eq!(opts.endpoint, FLUVIEW_URL);
        assert_eq!(opts.timeout, Duration::from_secs(30));
        assert!(opts.user_agent.starts_with("fluview-rs/"));
    }

    #[test]
    fn env_vars_override_defaults() {
        let opts = ClientOptions::default()
            .with_env_vars(|name| match name {
                "FLUVIEW_URL" => Some("http://127.0.0.1:9/download".to_string()),
                "FLUVIEW_TIMEOUT_SECS" => Some("5".to_string()),
                _ => None,
            })
            .unwrap();
        assert_eq!(opts.endpoint, "http://127.0.0.1:9/download");
        assert_eq!(opts.timeout, Duration::from_secs(5));

        let e = ClientOptions::default()
            .with_env_vars(|name| (name == "FLUVIEW_TIMEOUT_SECS").then(|| "soon".to_string()))
            .unwrap_err();
        assert_eq!(e.kind(), ErrorKind::Config);
    }

    #[test]
    fn rejects_non_http_endpoint() {
        let e = Client::new(ClientOptions::default().with_endpoint("ftp://example.org/x"))
            .unwrap_err();
        assert_eq!(e.kind(), ErrorKind::Config);
    }

    #[test]
    fn rejects_invalid_user_agent() {
        let opts = ClientOptions {
            user_agent: "fluview-rs\nX-Injected: 1".to_string(),
            ..ClientOptions::default()
        };
        let e = Client::new(opts).unwrap_err();
        assert_eq!(e.kind(), ErrorKind::Config);
        assert!(e.to_string().contains("user agent"));
    }
}
