//! HTTP client for the external resource tracker.
//!
//! Submissions here are telemetry around scheduling, not a
//! precondition for it: a tracker that is down, unauthorized, or
//! speaking the wrong API version costs a rate-limited warning and a
//! `false`/`None` to the caller, nothing more. The caller decides
//! whether to retry later.

use std::collections::BTreeMap;
use std::time::Duration;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use serde::Serialize;
use tracing::{debug, warn};

use numapack_allocation::{AllocationRequest, Resources, SourceAllocations};
use numapack_topology::NumaTopology;

use crate::limiter::WarnLimiter;
use crate::payload::topology_report;

/// Version header carried on every request.
const API_VERSION_HEADER: &str = "resource-tracker-api-version";
const API_VERSION: &str = "1.15";

/// Client for one resource tracker endpoint.
///
/// Owns its warning limiter, so suppression state lives and dies with
/// the client instance.
pub struct ReportClient {
    /// `host:port` of the tracker.
    authority: String,
    timeout: Duration,
    warn: WarnLimiter,
}

impl ReportClient {
    pub fn new(authority: impl Into<String>) -> Self {
        Self {
            authority: authority.into(),
            timeout: Duration::from_secs(5),
            warn: WarnLimiter::default(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Submit the full NUMA topology for a resource provider.
    ///
    /// Idempotent replace keyed by the provider uuid. Returns whether
    /// the tracker accepted it; a refusal is logged, never raised.
    pub async fn put_numa_topology(&mut self, rp_uuid: &str, topology: &NumaTopology) -> bool {
        let payload = topology_report(topology, rp_uuid);
        let path = format!("/resource_providers/{rp_uuid}/numa_topologies");
        self.put_json(&path, &payload, "numa topology").await
    }

    /// Submit a (typically merged) allocation request for a consumer.
    pub async fn put_allocations(
        &mut self,
        consumer_uuid: &str,
        request: &AllocationRequest,
    ) -> bool {
        let path = format!("/allocations/{consumer_uuid}");
        self.put_json(&path, request, "allocations").await
    }

    /// Fetch the current allocations for a consumer — the read side of
    /// the caller's read-modify-write around a move. `None` on any
    /// failure.
    pub async fn get_allocations(&mut self, consumer_uuid: &str) -> Option<SourceAllocations> {
        let path = format!("/allocations/{consumer_uuid}");
        match self.request(http::Method::GET, &path, None).await {
            Ok((status, body)) if status.is_success() => {
                match serde_json::from_slice::<AllocationsBody>(&body) {
                    Ok(parsed) => Some(
                        parsed
                            .allocations
                            .into_iter()
                            .map(|(uuid, provider)| (uuid, provider.resources))
                            .collect(),
                    ),
                    Err(error) => {
                        warn!(consumer = consumer_uuid, %error, "unparseable allocations body");
                        None
                    }
                }
            }
            Ok((status, _)) => {
                warn!(consumer = consumer_uuid, status = %status, "failed to fetch allocations");
                None
            }
            Err(error) => {
                self.warn_unreachable(&error);
                None
            }
        }
    }

    async fn put_json(&mut self, path: &str, payload: &impl Serialize, what: &str) -> bool {
        let body = match serde_json::to_vec(payload) {
            Ok(body) => body,
            Err(error) => {
                warn!(what, %error, "failed to encode tracker payload");
                return false;
            }
        };
        match self.request(http::Method::PUT, path, Some(body)).await {
            Ok((status, _)) if status.is_success() => true,
            Ok((status, body)) => {
                warn!(
                    what,
                    path,
                    status = %status,
                    body = %String::from_utf8_lossy(&body),
                    "resource tracker rejected submission"
                );
                false
            }
            Err(error) => {
                self.warn_unreachable(&error);
                false
            }
        }
    }

    fn warn_unreachable(&mut self, error: &anyhow::Error) {
        if self.warn.should_warn() {
            warn!(authority = %self.authority, %error, "resource tracker is not responding");
        } else {
            debug!(authority = %self.authority, %error, "resource tracker is not responding (suppressed)");
        }
    }

    async fn request(
        &self,
        method: http::Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> anyhow::Result<(http::StatusCode, Bytes)> {
        let authority = self.authority.clone();
        // Origin-form request target; the host header carries the
        // authority.
        let path = path.to_string();

        let exchange = async move {
            let stream = tokio::net::TcpStream::connect(&authority).await?;
            let io = hyper_util::rt::TokioIo::new(stream);
            let (mut sender, conn) = hyper::client::conn::http1::handshake(io).await?;

            // Drive the connection in the background.
            tokio::spawn(async move {
                let _ = conn.await;
            });

            let builder = http::Request::builder()
                .method(method)
                .uri(&path)
                .header("host", &authority)
                .header("user-agent", "numapack-report/0.1")
                .header("accept", "application/json")
                .header(API_VERSION_HEADER, API_VERSION);
            let request = match body {
                Some(bytes) => builder
                    .header("content-type", "application/json")
                    .body(Full::new(Bytes::from(bytes)))?,
                None => builder.body(Full::new(Bytes::new()))?,
            };

            let response = sender.send_request(request).await?;
            let status = response.status();
            let body = response.into_body().collect().await?.to_bytes();
            Ok::<_, anyhow::Error>((status, body))
        };

        match tokio::time::timeout(self.timeout, exchange).await {
            Ok(result) => result,
            Err(_) => Err(anyhow::anyhow!("resource tracker request timed out")),
        }
    }
}

/// Wire shape of `GET /allocations/{consumer}`.
#[derive(serde::Deserialize)]
struct AllocationsBody {
    allocations: BTreeMap<String, ProviderResources>,
}

#[derive(serde::Deserialize)]
struct ProviderResources {
    resources: Resources,
}

#[cfg(test)]
mod tests {
    use super::*;
    use numapack_allocation::ProviderAllocation;
    use numapack_topology::{CpuSet, NumaNode};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    fn topology() -> NumaTopology {
        NumaTopology::new(vec![
            NumaNode {
                id: 0,
                cpuset: [0, 1].into_iter().collect(),
                pinned_cpus: [0].into_iter().collect(),
                mem_total: 2048,
                mem_available: 1024,
            },
            NumaNode {
                id: 1,
                cpuset: [2, 3].into_iter().collect(),
                pinned_cpus: CpuSet::new(),
                mem_total: 2048,
                mem_available: 2048,
            },
        ])
        .unwrap()
    }

    /// Length of a complete HTTP request in `data`, if one has arrived.
    fn request_complete(data: &[u8]) -> Option<usize> {
        let headers_end = data.windows(4).position(|w| w == b"\r\n\r\n")? + 4;
        let headers = std::str::from_utf8(&data[..headers_end]).ok()?;
        let content_length = headers
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())?
            })
            .unwrap_or(0);
        (data.len() >= headers_end + content_length).then_some(headers_end + content_length)
    }

    /// Serve exactly one request with a canned response; resolves to
    /// the raw request text.
    async fn one_shot_server(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, tokio::task::JoinHandle<String>) {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let authority = listener.local_addr().unwrap().to_string();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut data = Vec::new();
            loop {
                let mut chunk = [0u8; 4096];
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                data.extend_from_slice(&chunk[..n]);
                if let Some(end) = request_complete(&data) {
                    data.truncate(end);
                    break;
                }
            }
            let response = format!(
                "HTTP/1.1 {status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
            String::from_utf8_lossy(&data).into_owned()
        });
        (authority, handle)
    }

    #[tokio::test]
    async fn topology_put_hits_provider_path() {
        let (authority, server) = one_shot_server("200 OK", "{}").await;
        let mut client = ReportClient::new(authority);

        assert!(client.put_numa_topology("rp-1", &topology()).await);

        let request = server.await.unwrap();
        assert!(request.starts_with("PUT /resource_providers/rp-1/numa_topologies"));
        assert!(request.contains(&format!("{API_VERSION_HEADER}: {API_VERSION}")));

        // Body carries nodes in reverse stored order.
        let body_start = request.find("\r\n\r\n").unwrap() + 4;
        let json: serde_json::Value = serde_json::from_str(&request[body_start..]).unwrap();
        assert_eq!(json["uuid"], "rp-1");
        assert_eq!(json["numa_topology"][0]["id"], 1);
        assert_eq!(json["numa_topology"][1]["cpu_usage"], 1);
    }

    #[tokio::test]
    async fn rejected_topology_put_is_nonfatal() {
        let (authority, server) = one_shot_server("503 Service Unavailable", "busy").await;
        let mut client = ReportClient::new(authority);

        assert!(!client.put_numa_topology("rp-1", &topology()).await);
        server.await.unwrap();
    }

    #[tokio::test]
    async fn unreachable_tracker_returns_false() {
        // Bind and immediately drop to get a port nobody is listening on.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let authority = listener.local_addr().unwrap().to_string();
        drop(listener);

        let mut client =
            ReportClient::new(authority).with_timeout(Duration::from_millis(500));
        assert!(!client.put_numa_topology("rp-1", &topology()).await);
    }

    #[tokio::test]
    async fn allocations_put_hits_consumer_path() {
        let (authority, server) = one_shot_server("200 OK", "{}").await;
        let mut client = ReportClient::new(authority);

        let request = AllocationRequest::new(vec![ProviderAllocation::new(
            "rpA",
            [("VCPU".to_string(), 4u64)].into_iter().collect(),
        )]);
        assert!(client.put_allocations("consumer-1", &request).await);

        let raw = server.await.unwrap();
        assert!(raw.starts_with("PUT /allocations/consumer-1"));
        assert!(raw.contains("rpA"));
    }

    #[tokio::test]
    async fn get_allocations_parses_source_shape() {
        let (authority, server) = one_shot_server(
            "200 OK",
            r#"{"allocations":{"rpA":{"resources":{"VCPU":4,"MEMORY_MB":2048}}}}"#,
        )
        .await;
        let mut client = ReportClient::new(authority);

        let allocations = client.get_allocations("consumer-1").await.unwrap();
        assert_eq!(allocations["rpA"]["VCPU"], 4);
        assert_eq!(allocations["rpA"]["MEMORY_MB"], 2048);

        let raw = server.await.unwrap();
        assert!(raw.starts_with("GET /allocations/consumer-1"));
    }

    #[tokio::test]
    async fn get_allocations_is_none_on_garbage() {
        let (authority, server) = one_shot_server("200 OK", "not json").await;
        let mut client = ReportClient::new(authority);

        assert!(client.get_allocations("consumer-1").await.is_none());
        server.await.unwrap();
    }
}
