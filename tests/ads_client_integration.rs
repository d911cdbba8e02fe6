//! Integration tests for the NASA/ADS client against a mock server.

use bibchex_core::ads::{
    AdsClient, AdsToken, BibliographicClient, ClientError, ClientSettings, EXPORT_SORT,
    RESOLVE_FIELDS,
};
use bibchex_core::parser::Query;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod support;
use support::socket_guard::{api_root, start_mock_server_or_skip};

fn client_for(server: &MockServer) -> AdsClient {
    let token = AdsToken::from_value(Some("test-token".to_string())).unwrap();
    let settings = ClientSettings::default().with_api_url(api_root(server));
    AdsClient::new(token, &settings).unwrap()
}

fn doi_query(doi: &str) -> Query {
    Query::new(Some(doi.to_string()), None).unwrap()
}

#[tokio::test]
async fn test_search_sends_bearer_token_query_and_fields() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };

    Mock::given(method("GET"))
        .and(path("/v1/search/query"))
        .and(header("authorization", "Bearer test-token"))
        .and(query_param("q", "doi:10.1093/mnras/stz123"))
        .and(query_param("fl", "bibcode,title"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "responseHeader": {"status": 0},
            "response": {
                "numFound": 1,
                "docs": [{"bibcode": "2019MNRAS.123.456C", "title": ["A Paper"]}]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let record = client
        .search(&doi_query("10.1093/mnras/stz123"), &RESOLVE_FIELDS)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.bibcode, "2019MNRAS.123.456C");
    assert_eq!(record.title, vec!["A Paper".to_string()]);
}

#[tokio::test]
async fn test_search_combined_query_is_space_joined() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };

    Mock::given(method("GET"))
        .and(path("/v1/search/query"))
        .and(query_param("q", "doi:10.1/x arXiv:2101.00001"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "response": {"docs": [{"bibcode": "X.Y.Z"}]}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let query = Query::new(Some("10.1/x".to_string()), Some("2101.00001".to_string())).unwrap();
    let record = client_for(&server)
        .search(&query, &RESOLVE_FIELDS)
        .await
        .unwrap();
    assert_eq!(record.map(|r| r.bibcode), Some("X.Y.Z".to_string()));
}

#[tokio::test]
async fn test_search_with_no_docs_returns_none() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };

    Mock::given(method("GET"))
        .and(path("/v1/search/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "response": {"numFound": 0, "docs": []}
        })))
        .mount(&server)
        .await;

    let result = client_for(&server)
        .search(&doi_query("10.1/none"), &RESOLVE_FIELDS)
        .await
        .unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn test_search_unauthorized_maps_to_status_error() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };

    Mock::given(method("GET"))
        .and(path("/v1/search/query"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .search(&doi_query("10.1/x"), &RESOLVE_FIELDS)
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Status { status: 401, .. }));
    assert!(err.to_string().contains("ADS_TOKEN"));
}

#[tokio::test]
async fn test_search_malformed_body_is_decode_error() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };

    Mock::given(method("GET"))
        .and(path("/v1/search/query"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .search(&doi_query("10.1/x"), &RESOLVE_FIELDS)
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Decode { .. }));
}

#[tokio::test]
async fn test_export_posts_codes_with_sort() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };

    Mock::given(method("POST"))
        .and(path("/v1/export/bibtex"))
        .and(header("authorization", "Bearer test-token"))
        .and(body_json(serde_json::json!({
            "bibcode": ["2019MNRAS.123.456C", "2020ApJ...900L...1B"],
            "sort": "first_author asc"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "msg": "Retrieved 2 abstracts, starting with number 1.",
            "export": "@ARTICLE{2019MNRAS.123.456C,\n}\n\n@ARTICLE{2020ApJ...900L...1B,\n}\n"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let codes = vec![
        "2019MNRAS.123.456C".to_string(),
        "2020ApJ...900L...1B".to_string(),
    ];
    let text = client_for(&server).export(&codes, EXPORT_SORT).await.unwrap();
    assert!(text.starts_with("@ARTICLE{2019MNRAS.123.456C"));
    assert!(text.contains("@ARTICLE{2020ApJ...900L...1B"));
}

#[tokio::test]
async fn test_export_raw_without_sort_omits_field() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };

    Mock::given(method("POST"))
        .and(path("/v1/export/bibtex"))
        .and(body_json(serde_json::json!({"bibcode": ["A.B.C"]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "export": "@MISC{A.B.C,\n}\n"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let body = client_for(&server)
        .export_raw(&["A.B.C".to_string()], None)
        .await
        .unwrap();
    assert!(body.contains("@MISC{A.B.C"));
}

#[tokio::test]
async fn test_export_server_error_maps_to_status() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };

    Mock::given(method("POST"))
        .and(path("/v1/export/bibtex"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .export(&["A.B.C".to_string()], EXPORT_SORT)
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Status { status: 503, .. }));
}

#[test]
fn test_client_rejects_non_http_api_url() {
    let token = AdsToken::from_value(Some("t".to_string())).unwrap();
    let settings = ClientSettings::default().with_api_url("ftp://example.org/v1");
    let err = AdsClient::new(token, &settings).unwrap_err();
    assert!(matches!(err, ClientError::InvalidBaseUrl { .. }));
}

#[test]
fn test_client_debug_hides_token() {
    let token = AdsToken::from_value(Some("super-secret".to_string())).unwrap();
    let client = AdsClient::new(token, &ClientSettings::default()).unwrap();
    let rendered = format!("{client:?}");
    assert!(!rendered.contains("super-secret"));
    assert!(rendered.contains("api.adsabs.harvard.edu"));
}
