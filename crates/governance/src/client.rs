use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, info};

use crate::{FetchError, GovernanceResponse, PendingChange};

/// Public Decentraland governance API.
pub const DEFAULT_GOVERNANCE_URL: &str = "https://governance.decentraland.org/api";

/// Query string of `GET /proposals`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProposalQuery {
    pub limit: u32,
    pub offset: u32,
    pub status: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

impl Default for ProposalQuery {
    fn default() -> Self {
        Self {
            limit: 25,
            offset: 0,
            status: "passed",
            kind: "poi",
        }
    }
}

/// Read access to the governance API.
#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
#[async_trait]
pub trait GovernanceApi: Send + Sync {
    /// Returns one page of passed POI proposals, undecoded beyond the envelope.
    async fn passed_poi_proposals(&self) -> Result<GovernanceResponse, FetchError>;
}

/// Fetches passed POI proposals and maps them to [`PendingChange`]s in API order.
///
/// This is a checked version of [`GovernanceApi::passed_poi_proposals`] that
/// rejects responses flagged with `ok: false`.
pub async fn fetch_passed_poi_proposals(
    api: &impl GovernanceApi,
) -> Result<Vec<PendingChange>, FetchError> {
    let resp = api.passed_poi_proposals().await?;
    if !resp.ok {
        return Err(FetchError::NotOk);
    }

    info!(count = %resp.data.len(), total = %resp.total, "got passed POI proposals");

    let changes = resp
        .data
        .iter()
        .map(|record| {
            let change = PendingChange::from(record);
            debug!(
                id = %record.id,
                action = %change.action,
                coordinates = %change.coordinates,
                "pending POI change"
            );
            change
        })
        .collect();

    Ok(changes)
}

/// HTTP implementation of [`GovernanceApi`].
#[derive(Debug, Clone)]
pub struct GovernanceClient {
    http: reqwest::Client,
    base_url: String,
    query: ProposalQuery,
}

impl GovernanceClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            query: ProposalQuery::default(),
        }
    }

    pub fn with_query(mut self, query: ProposalQuery) -> Self {
        self.query = query;
        self
    }

    fn proposals_request(&self) -> reqwest::Result<reqwest::Request> {
        let url = format!("{}/proposals", self.base_url.trim_end_matches('/'));
        self.http.get(url).query(&self.query).build()
    }
}

impl Default for GovernanceClient {
    fn default() -> Self {
        Self::new(DEFAULT_GOVERNANCE_URL)
    }
}

#[async_trait]
impl GovernanceApi for GovernanceClient {
    async fn passed_poi_proposals(&self) -> Result<GovernanceResponse, FetchError> {
        let req = self.proposals_request()?;
        debug!(url = %req.url(), "fetching governance proposals");

        let resp = self.http.execute(req).await?;
        let status = resp.status();
        let body = resp.bytes().await?;

        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        Ok(serde_json::from_slice(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::{TcpListener, TcpStream},
        task::JoinHandle,
    };

    use super::*;
    use crate::{PoiAction, PoiConfiguration, ProposalRecord};

    /// Serves one canned response per connection and returns the request
    /// lines it saw.
    async fn serve(responses: Vec<(u16, &'static str)>) -> (String, JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let mut seen = Vec::new();
            for (status, body) in responses {
                let (mut stream, _) = listener.accept().await.unwrap();
                seen.push(read_request_line(&mut stream).await);
                let resp = format!(
                    "HTTP/1.1 {status} Canned\r\ncontent-type: application/json\r\n\
                     content-length: {}\r\nconnection: close\r\n\r\n{body}",
                    body.len()
                );
                stream.write_all(resp.as_bytes()).await.unwrap();
                stream.shutdown().await.unwrap();
            }
            seen
        });

        (base_url, handle)
    }

    async fn read_request_line(stream: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = stream.read(&mut chunk).await.unwrap();
            assert!(n > 0, "connection closed before end of headers");
            buf.extend_from_slice(&chunk[..n]);
        }
        let head = String::from_utf8_lossy(&buf).into_owned();
        head.lines().next().unwrap_or_default().to_owned()
    }

    fn record(id: &str, x: i64, y: i64, action: PoiAction) -> ProposalRecord {
        ProposalRecord {
            id: id.to_string(),
            user: String::new(),
            kind: "poi".to_string(),
            status: "passed".to_string(),
            configuration: PoiConfiguration {
                x,
                y,
                action,
                choices: vec![],
                description: String::new(),
            },
            enacted: false,
            deleted: false,
            start_at: None,
            finish_at: None,
        }
    }

    #[test]
    fn test_proposals_request_url() {
        let client = GovernanceClient::new("https://governance.example.org/api/");
        let req = client.proposals_request().expect("valid request");
        assert_eq!(
            req.url().as_str(),
            "https://governance.example.org/api/proposals?limit=25&offset=0&status=passed&type=poi"
        );
        assert_eq!(req.method(), &reqwest::Method::GET);
    }

    #[test]
    fn test_custom_query() {
        let client = GovernanceClient::default().with_query(ProposalQuery {
            limit: 100,
            offset: 25,
            ..Default::default()
        });
        let req = client.proposals_request().expect("valid request");
        assert_eq!(
            req.url().query(),
            Some("limit=100&offset=25&status=passed&type=poi")
        );
    }

    #[tokio::test]
    async fn test_http_fetch_maps_records() {
        let (url, server) = serve(vec![(
            200,
            r#"{"ok":true,"total":1,"data":[{"id":"p1","type":"poi","status":"passed",
                "configuration":{"x":1,"y":2,"type":"add_poi"}}]}"#,
        )])
        .await;

        let changes = fetch_passed_poi_proposals(&GovernanceClient::new(url))
            .await
            .expect("fetch");
        assert_eq!(changes, vec![PendingChange::new(PoiAction::AddPoi, 1, 2)]);

        let seen = server.await.unwrap();
        assert_eq!(
            seen,
            vec!["GET /proposals?limit=25&offset=0&status=passed&type=poi HTTP/1.1"]
        );
    }

    #[tokio::test]
    async fn test_http_error_status() {
        let (url, server) = serve(vec![(503, "upstream down")]).await;

        let err = GovernanceClient::new(url)
            .passed_poi_proposals()
            .await
            .unwrap_err();
        match err {
            FetchError::Status { status, body } => {
                assert_eq!(status, 503);
                assert_eq!(body, "upstream down");
            }
            other => panic!("expected status error, got {other:?}"),
        }
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_http_malformed_body() {
        let (url, server) = serve(vec![(200, "<html>not json</html>")]).await;

        let err = GovernanceClient::new(url)
            .passed_poi_proposals()
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_http_envelope_without_data_fails() {
        let (url, server) = serve(vec![(200, r#"{"ok":true}"#)]).await;

        let err = fetch_passed_poi_proposals(&GovernanceClient::new(url))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_fetch_preserves_order() {
        let mut api = MockGovernanceApi::new();
        api.expect_passed_poi_proposals().times(1).returning(|| {
            Ok(GovernanceResponse {
                ok: true,
                total: 3,
                data: vec![
                    record("1", 3, 3, PoiAction::RemovePoi),
                    record("2", 1, 2, PoiAction::AddPoi),
                    record("3", -7, 0, PoiAction::AddPoi),
                ],
            })
        });

        let changes = fetch_passed_poi_proposals(&api).await.expect("fetch");
        let coords: Vec<_> = changes.iter().map(|c| c.coordinates.as_str()).collect();
        assert_eq!(coords, vec!["3,3", "1,2", "-7,0"]);
        assert_eq!(changes[0].action, PoiAction::RemovePoi);
    }

    #[tokio::test]
    async fn test_fetch_rejects_not_ok() {
        let mut api = MockGovernanceApi::new();
        api.expect_passed_poi_proposals().returning(|| {
            Ok(GovernanceResponse {
                ok: false,
                total: 0,
                data: vec![],
            })
        });

        let err = fetch_passed_poi_proposals(&api).await.unwrap_err();
        assert!(matches!(err, FetchError::NotOk));
    }

    #[tokio::test]
    async fn test_fetch_propagates_status_error() {
        let mut api = MockGovernanceApi::new();
        api.expect_passed_poi_proposals().times(1).returning(|| {
            Err(FetchError::Status {
                status: 503,
                body: "unavailable".to_string(),
            })
        });

        let err = fetch_passed_poi_proposals(&api).await.unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 503, .. }));
    }
}
