#![allow(dead_code)]

use std::io::{Cursor, Write};

use chrono::NaiveDate;
use fluview::{Client, ClientOptions, FixedClock, Query};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use zip::write::SimpleFileOptions;

pub const DOWNLOAD_PATH: &str = "/grasp/fluview/download";

pub const ILI_CSV: &str = "REGION TYPE,REGION,YEAR,WEEK,% WEIGHTED ILI,ILITOTAL\n\
                           HHS Regions,Region 1,2023,40,1.2,120\n\
                           \n\
                           HHS Regions,Region 2,2023,40,1.5,340\n\
                           HHS Regions,Region 1,2023,41,1.3,131\n";

pub fn zip_of(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut buffer = Vec::new();
    {
        let mut zip = zip::ZipWriter::new(Cursor::new(&mut buffer));
        for (name, body) in entries {
            zip.start_file(*name, SimpleFileOptions::default()).unwrap();
            zip.write_all(body.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
    }
    buffer
}

/// Mock portal answering every POST to the download path with `payload`.
pub async fn mock_portal(status: u16, payload: Vec<u8>) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(DOWNLOAD_PATH))
        .respond_with(
            ResponseTemplate::new(status)
                .insert_header("content-type", "application/zip")
                .set_body_bytes(payload),
        )
        .expect(1..)
        .mount(&server)
        .await;
    server
}

pub fn download_url(server: &MockServer) -> String {
    format!("{}{DOWNLOAD_PATH}", server.uri())
}

/// Run `f` with a blocking client for `url` on a blocking thread.
///
/// The client is built and dropped on that thread; reqwest's blocking
/// client must not be dropped inside the async runtime.
pub async fn with_client<T, F>(url: String, f: F) -> T
where
    T: Send + 'static,
    F: FnOnce(Client) -> T + Send + 'static,
{
    tokio::task::spawn_blocking(move || f(client_for(&url)))
        .await
        .expect("blocking task panicked")
}

pub fn client_for(url: &str) -> Client {
    let opts = ClientOptions {
        no_proxy: true,
        ..ClientOptions::default().with_endpoint(url)
    };
    Client::new(opts).unwrap()
}

/// ISO 2024-W40, current season 64.
pub fn clock() -> FixedClock {
    FixedClock(NaiveDate::from_ymd_opt(2024, 10, 1).unwrap())
}

pub fn sample_query() -> Query {
    Query::with_clock(vec!["ili", "who"], vec![62, 63], "hhs", vec![1, 2], &clock()).unwrap()
}
