//! Zabbix JSON-RPC client
//!
//! Implements the monitoring backend on top of the Zabbix IT services API
//! (`service.get`, `service.getsla`, `trigger.get`).

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use svcreport_tree::{BackendError, BackendResult, MonitoringBackend};
use svcreport_types::{
    Percentage, ProblemId, ServiceDescriptor, ServiceFilter, ServiceId, ServiceStatus, TimeWindow,
};
use tracing::{debug, info};

use crate::error::CliResult;

/// HTTP client for the Zabbix API
pub struct ZabbixClient {
    client: Client,
    api_url: String,
    auth: Option<String>,
    next_id: AtomicU64,
}

#[derive(Debug, Serialize)]
struct RpcRequest<'a, P> {
    jsonrpc: &'static str,
    method: &'a str,
    params: P,
    #[serde(skip_serializing_if = "Option::is_none")]
    auth: Option<&'a str>,
    id: u64,
}

#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
    #[serde(default)]
    data: Option<String>,
}

/// Number-or-string scalar; Zabbix encodes most numbers as strings
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Scalar {
    Number(f64),
    Text(String),
}

impl Scalar {
    fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Number(n) => Some(*n),
            Scalar::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// Service record as returned by `service.get`
#[derive(Debug, Deserialize)]
struct ZabbixService {
    serviceid: String,
    name: String,
    status: Scalar,
    goodsla: Scalar,
    #[serde(default)]
    dependencies: Vec<ZabbixDependency>,
    #[serde(default)]
    times: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct ZabbixDependency {
    serviceid: String,
}

/// Per-service entry of a `service.getsla` result
#[derive(Debug, Deserialize)]
struct ZabbixSla {
    /// Object keyed by trigger id, or an empty array when nothing fires
    #[serde(default)]
    problems: Value,
    #[serde(default)]
    sla: Vec<ZabbixSlaInterval>,
}

#[derive(Debug, Deserialize)]
struct ZabbixSlaInterval {
    sla: Scalar,
}

#[derive(Debug, Deserialize)]
struct ZabbixTrigger {
    triggerid: String,
    description: String,
}

impl ZabbixClient {
    /// Create a client for the frontend at `server`
    pub fn new(server: &str, timeout: Duration) -> CliResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_url: format!("{}/api_jsonrpc.php", server.trim_end_matches('/')),
            auth: None,
            next_id: AtomicU64::new(1),
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// API version of the server; needs no session
    pub async fn api_version(&self) -> BackendResult<String> {
        self.call_unauthenticated("apiinfo.version", json!([])).await
    }

    /// Establish a session
    pub async fn login(&mut self, username: &str, password: &str) -> BackendResult<()> {
        let token: String = self
            .call_unauthenticated(
                "user.login",
                json!({ "user": username, "password": password }),
            )
            .await?;
        info!(api = %self.api_url, user = username, "Logged in to Zabbix");
        self.auth = Some(token);
        Ok(())
    }

    async fn call<P: Serialize, T: DeserializeOwned>(
        &self,
        method: &str,
        params: P,
    ) -> BackendResult<T> {
        let auth = self.auth.as_deref().ok_or(BackendError::Unauthenticated)?;
        self.send(method, params, Some(auth)).await
    }

    async fn call_unauthenticated<P: Serialize, T: DeserializeOwned>(
        &self,
        method: &str,
        params: P,
    ) -> BackendResult<T> {
        self.send(method, params, None).await
    }

    async fn send<P: Serialize, T: DeserializeOwned>(
        &self,
        method: &str,
        params: P,
        auth: Option<&str>,
    ) -> BackendResult<T> {
        let request = RpcRequest {
            jsonrpc: "2.0",
            method,
            params,
            auth,
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
        };
        debug!(method, id = request.id, "Zabbix API call");

        let response = self
            .client
            .post(&self.api_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(BackendError::Api {
                code: i64::from(status.as_u16()),
                message,
            });
        }

        let body: RpcResponse<T> = response
            .json()
            .await
            .map_err(|e| BackendError::Malformed(e.to_string()))?;
        unwrap_response(body)
    }
}

fn unwrap_response<T>(response: RpcResponse<T>) -> BackendResult<T> {
    if let Some(error) = response.error {
        let message = match error.data {
            Some(data) if !data.is_empty() => format!("{} {}", error.message, data),
            _ => error.message,
        };
        return Err(BackendError::Api {
            code: error.code,
            message,
        });
    }
    response
        .result
        .ok_or_else(|| BackendError::Malformed("response has neither result nor error".into()))
}

fn service_params(filter: &ServiceFilter) -> Value {
    let mut params = json!({
        "output": "extend",
        "selectDependencies": "extend",
        "selectTimes": "extend",
        "sortfield": "name",
        "sortorder": "ASC",
    });
    match filter {
        ServiceFilter::All => {}
        ServiceFilter::Names(names) => {
            params["filter"] = json!({ "name": names });
        }
        ServiceFilter::Ids(ids) => {
            params["serviceids"] = json!(ids);
        }
    }
    params
}

fn sla_params(service_ids: &[ServiceId], window: TimeWindow) -> Value {
    json!({
        "serviceids": service_ids,
        "intervals": [{
            "from": window.start_timestamp(),
            "to": window.end_timestamp(),
        }],
    })
}

impl TryFrom<ZabbixService> for ServiceDescriptor {
    type Error = BackendError;

    fn try_from(service: ZabbixService) -> Result<Self, Self::Error> {
        let status = service
            .status
            .as_f64()
            .filter(|s| *s >= 0.0 && *s <= f64::from(u8::MAX))
            .ok_or_else(|| {
                BackendError::Malformed(format!("invalid status of service {}", service.name))
            })?;
        let sla_target = service
            .goodsla
            .as_f64()
            .and_then(|v| Percentage::new(v).ok())
            .ok_or_else(|| {
                BackendError::Malformed(format!("invalid SLA target of service {}", service.name))
            })?;

        Ok(ServiceDescriptor {
            id: ServiceId::new(service.serviceid),
            name: service.name,
            status: ServiceStatus::new(status as u8),
            sla_target,
            has_scheduled_times: !service.times.is_empty(),
            dependencies: service
                .dependencies
                .into_iter()
                .map(|d| ServiceId::new(d.serviceid))
                .collect(),
        })
    }
}

fn problem_ids(problems: &Value) -> Vec<ProblemId> {
    match problems {
        Value::Object(map) => map.keys().map(|k| ProblemId::new(k.as_str())).collect(),
        _ => Vec::new(),
    }
}

#[async_trait]
impl MonitoringBackend for ZabbixClient {
    async fn get_services(&self, filter: &ServiceFilter) -> BackendResult<Vec<ServiceDescriptor>> {
        let services: Vec<ZabbixService> = self.call("service.get", service_params(filter)).await?;
        services.into_iter().map(ServiceDescriptor::try_from).collect()
    }

    async fn get_availability(
        &self,
        service_id: &ServiceId,
        window: TimeWindow,
    ) -> BackendResult<f64> {
        let mut result: HashMap<String, ZabbixSla> = self
            .call(
                "service.getsla",
                sla_params(std::slice::from_ref(service_id), window),
            )
            .await?;

        result
            .remove(service_id.as_str())
            .and_then(|entry| entry.sla.into_iter().next())
            .and_then(|interval| interval.sla.as_f64())
            .ok_or_else(|| {
                BackendError::Malformed(format!("no SLA interval for service {}", service_id))
            })
    }

    async fn get_active_problems(
        &self,
        service_ids: &[ServiceId],
        window: TimeWindow,
    ) -> BackendResult<HashMap<ServiceId, Vec<ProblemId>>> {
        let result: HashMap<String, ZabbixSla> = self
            .call("service.getsla", sla_params(service_ids, window))
            .await?;

        Ok(result
            .into_iter()
            .map(|(id, entry)| (ServiceId::new(id), problem_ids(&entry.problems)))
            .collect())
    }

    async fn describe_problems(&self, problem_ids: &[ProblemId]) -> BackendResult<Vec<String>> {
        let triggers: Vec<ZabbixTrigger> = self
            .call(
                "trigger.get",
                json!({ "triggerids": problem_ids, "output": ["triggerid", "description"] }),
            )
            .await?;

        Ok(trigger_descriptions(problem_ids, triggers))
    }
}

/// Descriptions in request order. Triggers the API left out (deleted, or
/// not readable by the API user) are skipped.
fn trigger_descriptions(problem_ids: &[ProblemId], triggers: Vec<ZabbixTrigger>) -> Vec<String> {
    let mut by_id: HashMap<String, String> = triggers
        .into_iter()
        .map(|t| (t.triggerid, t.description))
        .collect();

    problem_ids
        .iter()
        .filter_map(|id| {
            let description = by_id.remove(id.as_str());
            if description.is_none() {
                debug!(trigger = %id, "Trigger not returned, skipping");
            }
            description
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use svcreport_types::ReportWindows;

    #[test]
    fn test_client_creation() {
        let client = ZabbixClient::new("http://zabbix/zabbix", Duration::from_secs(5)).unwrap();
        assert_eq!(client.api_url(), "http://zabbix/zabbix/api_jsonrpc.php");
    }

    #[test]
    fn test_client_endpoint_normalization() {
        let client = ZabbixClient::new("http://zabbix/zabbix/", Duration::from_secs(5)).unwrap();
        assert_eq!(client.api_url(), "http://zabbix/zabbix/api_jsonrpc.php");
    }

    #[tokio::test]
    async fn test_calls_need_session() {
        let client = ZabbixClient::new("http://zabbix", Duration::from_secs(5)).unwrap();
        let err = client.get_services(&ServiceFilter::All).await.unwrap_err();
        assert_eq!(err, BackendError::Unauthenticated);
    }

    #[test]
    fn test_request_serialization() {
        let request = RpcRequest {
            jsonrpc: "2.0",
            method: "service.get",
            params: service_params(&ServiceFilter::Names(vec!["Web".into()])),
            auth: Some("token"),
            id: 7,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["method"], "service.get");
        assert_eq!(value["auth"], "token");
        assert_eq!(value["params"]["filter"]["name"][0], "Web");
        assert_eq!(value["params"]["selectDependencies"], "extend");

        let anonymous = RpcRequest {
            jsonrpc: "2.0",
            method: "apiinfo.version",
            params: json!([]),
            auth: None,
            id: 1,
        };
        assert!(serde_json::to_value(&anonymous).unwrap().get("auth").is_none());
    }

    #[test]
    fn test_id_filter() {
        let params = service_params(&ServiceFilter::by_id(ServiceId::new("12")));
        assert_eq!(params["serviceids"][0], "12");
        assert!(params.get("filter").is_none());
    }

    #[test]
    fn test_sla_params_use_unix_seconds() {
        let windows = ReportWindows::now();
        let range = windows.current_state();
        let params = sla_params(&[ServiceId::new("3")], range);
        assert_eq!(params["intervals"][0]["to"], range.end_timestamp());
        assert_eq!(params["intervals"][0]["from"], range.start_timestamp());
    }

    #[test]
    fn test_error_response() {
        let response: RpcResponse<Value> = serde_json::from_value(json!({
            "jsonrpc": "2.0",
            "error": { "code": -32602, "message": "Invalid params.", "data": "Not authorised." },
            "id": 1
        }))
        .unwrap();

        let err = unwrap_response(response).unwrap_err();
        assert_eq!(
            err,
            BackendError::Api {
                code: -32602,
                message: "Invalid params. Not authorised.".into()
            }
        );
    }

    #[test]
    fn test_service_conversion() {
        let service: ZabbixService = serde_json::from_value(json!({
            "serviceid": "5",
            "name": "Web",
            "status": "2",
            "goodsla": "99.0500",
            "showsla": "1",
            "dependencies": [{ "serviceid": "6", "linkid": "1", "soft": "0" }],
            "times": [{ "type": "1" }]
        }))
        .unwrap();

        let descriptor = ServiceDescriptor::try_from(service).unwrap();
        assert_eq!(descriptor.id, ServiceId::new("5"));
        assert_eq!(descriptor.status, ServiceStatus::new(2));
        assert_eq!(descriptor.sla_target.to_string(), "99.05");
        assert!(descriptor.has_scheduled_times);
        assert_eq!(descriptor.dependencies, vec![ServiceId::new("6")]);
    }

    #[test]
    fn test_service_with_bad_sla_is_malformed() {
        let service: ZabbixService = serde_json::from_value(json!({
            "serviceid": "5",
            "name": "Web",
            "status": "0",
            "goodsla": "n/a"
        }))
        .unwrap();
        assert!(matches!(
            ServiceDescriptor::try_from(service),
            Err(BackendError::Malformed(_))
        ));
    }

    #[test]
    fn test_partial_trigger_result_keeps_request_order() {
        let triggers: Vec<ZabbixTrigger> = serde_json::from_value(json!([
            { "triggerid": "3", "description": "replication lag" },
            { "triggerid": "1", "description": "disk full" }
        ]))
        .unwrap();
        let ids = [ProblemId::new("1"), ProblemId::new("2"), ProblemId::new("3")];

        assert_eq!(
            trigger_descriptions(&ids, triggers),
            vec!["disk full", "replication lag"]
        );
    }

    #[test]
    fn test_no_triggers_returned() {
        let ids = [ProblemId::new("1"), ProblemId::new("2")];
        assert!(trigger_descriptions(&ids, Vec::new()).is_empty());
    }

    #[test]
    fn test_sla_problems_object_or_empty_array() {
        let result: HashMap<String, ZabbixSla> = serde_json::from_value(json!({
            "5": {
                "status": "2",
                "problems": { "13491": { "triggerid": "13491" } },
                "sla": [{ "from": 1, "to": 2, "sla": 98.5, "okTime": 0 }]
            },
            "6": { "status": "0", "problems": [], "sla": [{ "sla": "100.0000" }] }
        }))
        .unwrap();

        assert_eq!(problem_ids(&result["5"].problems), vec![ProblemId::new("13491")]);
        assert!(problem_ids(&result["6"].problems).is_empty());
        assert_eq!(result["6"].sla[0].sla.as_f64(), Some(100.0));
    }
}
