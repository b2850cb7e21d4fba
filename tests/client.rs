mod common;

use std::net::TcpListener;

use fluview::{ErrorKind, FluView};
use wiremock::matchers::{header, header_regex, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{
    DOWNLOAD_PATH, ILI_CSV, client_for, download_url, mock_portal, sample_query, with_client,
    zip_of,
};

#[tokio::test]
async fn posts_the_four_form_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(DOWNLOAD_PATH))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(header_regex("user-agent", "^fluview-rs/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(zip_of(&[("FluViewPhase2Data.csv", ILI_CSV)])),
        )
        .expect(1)
        .mount(&server)
        .await;

    with_client(download_url(&server), |c| c.fetch_lines(&sample_query()))
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let mut form: Vec<(String, String)> = url::form_urlencoded::parse(&requests[0].body)
        .into_owned()
        .collect();
    form.sort();
    assert_eq!(
        form,
        vec![
            ("DataSources".to_string(), "ILINet,WHO_NREVSS".to_string()),
            ("RegionID".to_string(), "1".to_string()),
            ("SeasonsList".to_string(), "62,63".to_string()),
            ("SubRegionsList".to_string(), "1,2".to_string()),
        ]
    );
}

#[tokio::test]
async fn lines_keep_header_and_drop_blanks() {
    let server = mock_portal(200, zip_of(&[("data.csv", ILI_CSV)])).await;
    let lines = with_client(download_url(&server), |c| c.fetch_lines(&sample_query()))
        .await
        .unwrap();

    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("REGION TYPE,REGION"));
    assert!(lines.iter().all(|l| !l.is_empty()));
}

#[tokio::test]
async fn table_uses_header_row() {
    let server = mock_portal(
        200,
        zip_of(&[("data.csv", ILI_CSV), ("extra.csv", "ignored\n")]),
    )
    .await;
    let table = with_client(download_url(&server), |c| c.fetch_table(&sample_query()))
        .await
        .unwrap();

    assert_eq!(table.headers.len(), 6);
    assert_eq!(table.len(), 3);
    assert_eq!(table.column("ILITOTAL").unwrap(), vec!["120", "340", "131"]);
}

#[tokio::test]
async fn save_to_explicit_path() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("ili.csv");

    let server = mock_portal(200, zip_of(&[("data.csv", ILI_CSV)])).await;
    let dest = target.clone();
    let written = with_client(download_url(&server), move |c| {
        FluView::with_client(c, sample_query()).save_csv(Some(&dest))
    })
    .await
    .unwrap();

    assert_eq!(written, target);
    let text = std::fs::read_to_string(&target).unwrap();
    assert_eq!(text.lines().count(), 4);
    assert!(!text.lines().any(str::is_empty));
}

#[tokio::test]
async fn http_error_status_is_transport_failure() {
    let server = mock_portal(500, b"oops".to_vec()).await;
    let e = with_client(download_url(&server), |c| c.fetch_table(&sample_query()))
        .await
        .unwrap_err();
    assert_eq!(e.kind(), ErrorKind::Transport);
}

#[tokio::test]
async fn non_zip_body_is_decode_failure() {
    let server = mock_portal(200, b"<html>maintenance</html>".to_vec()).await;
    let e = with_client(download_url(&server), |c| c.fetch_lines(&sample_query()))
        .await
        .unwrap_err();
    assert_eq!(e.kind(), ErrorKind::Decode);
}

#[test]
fn refused_connection_is_transport_failure() {
    let port = {
        let l = TcpListener::bind("127.0.0.1:0").unwrap();
        l.local_addr().unwrap().port()
    };
    let url = format!("http://127.0.0.1:{port}/download");
    let e = client_for(&url).fetch_lines(&sample_query()).unwrap_err();
    assert_eq!(e.kind(), ErrorKind::Transport);
}
