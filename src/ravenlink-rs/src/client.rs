use ravenlink_core::{
    build_url, status_to_response_code, BatchRequest, BatchResponse, ClientConfig,
    CommandResponse, DatabaseSelector, ResponseCode, UpdateDocumentResponse, BULK_DOCS_ENDPOINT,
    DOCS_ENDPOINT, TRANSPORT_FAILURE_STATUS,
};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use crate::transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
use crate::Result;

const NO_IDS: [&str; 0] = [];

/// Document database REST client
///
/// Cheap to clone; clones share the transport. Requests are independent of
/// each other and may run concurrently.
#[derive(Clone)]
pub struct Client {
    config: Arc<ClientConfig>,
    transport: Arc<dyn HttpTransport>,
}

impl Client {
    /// Create a client that talks HTTP through `reqwest`
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(&config)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Create a client on top of a custom transport
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            config: Arc::new(config),
            transport,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Send all commands in one bulk request
    ///
    /// The server applies the batch atomically. Results are decoded by their
    /// `Type` field; entries of unknown type are dropped.
    #[tracing::instrument(skip(self, request), fields(commands = request.len()))]
    pub async fn atomic_update(
        &self,
        request: &BatchRequest,
        database: DatabaseSelector,
    ) -> BatchResponse {
        if request.is_empty() {
            tracing::warn!("Refusing to send an empty batch");
            return BatchResponse::failed(ResponseCode::InvalidRequest);
        }

        let body = match request.to_json() {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("Failed to serialize batch: {}", e);
                return BatchResponse::failed(ResponseCode::SerializationError);
            }
        };

        let url = build_url(&self.config, BULK_DOCS_ENDPOINT, &NO_IDS, database);
        let request = HttpRequest::new(HttpMethod::Post, url).with_json_body(body);

        let response = match self.execute(request).await {
            Some(response) => response,
            None => {
                return BatchResponse::failed(status_to_response_code(TRANSPORT_FAILURE_STATUS))
            }
        };

        if response.status != 201 {
            let code = status_to_response_code(response.status);
            tracing::warn!("Batch rejected with status {} ({})", response.status, code);
            return BatchResponse::failed(code);
        }

        let entries = match results_array(&response.body) {
            Some(entries) => entries,
            None => {
                tracing::warn!("Batch response has no Results array");
                return BatchResponse::failed(ResponseCode::DeserializationError);
            }
        };

        let mut results = Vec::with_capacity(entries.len());
        for entry in &entries {
            match CommandResponse::from_json(entry) {
                Some(result) => results.push(result),
                None => tracing::warn!("Skipping unrecognized batch result: {}", entry),
            }
        }

        BatchResponse {
            success: true,
            code: ResponseCode::Ok,
            results,
        }
    }

    /// Fetch documents as raw JSON text, keyed by id
    ///
    /// `Results[i]` is assigned to `ids[i]`; the server is trusted to answer
    /// in request order. Missing documents (non-object entries) and ids past
    /// the end of `Results` get no entry. When the request fails, every id
    /// maps to an empty string.
    #[tracing::instrument(skip(self, ids), fields(count = ids.len()))]
    pub async fn get_documents(
        &self,
        ids: &[impl AsRef<str>],
        database: DatabaseSelector,
    ) -> HashMap<String, String> {
        let url = build_url(&self.config, DOCS_ENDPOINT, ids, database);

        let response = match self.execute(HttpRequest::new(HttpMethod::Get, url)).await {
            Some(response) if response.status == 200 => response,
            other => {
                if let Some(response) = other {
                    tracing::warn!("Document fetch failed with status {}", response.status);
                }
                return ids
                    .iter()
                    .map(|id| (id.as_ref().to_string(), String::new()))
                    .collect();
            }
        };

        let mut documents = HashMap::new();
        let Some(entries) = results_array(&response.body) else {
            tracing::warn!("Document fetch returned no Results array");
            return documents;
        };

        for (id, entry) in ids.iter().zip(entries.iter()) {
            if entry.is_object() {
                documents.insert(id.as_ref().to_string(), entry.to_string());
            }
        }

        documents
    }

    /// Store a document under `id`
    ///
    /// Any outcome other than `201 Created` is reported as `ClientError`.
    #[tracing::instrument(skip(self, document_json))]
    pub async fn update_document(
        &self,
        id: &str,
        document_json: &str,
        database: DatabaseSelector,
    ) -> UpdateDocumentResponse {
        let url = build_url(&self.config, DOCS_ENDPOINT, &[id], database);
        let request = HttpRequest::new(HttpMethod::Put, url).with_json_body(document_json);

        match self.execute(request).await {
            Some(response) if response.status == 201 => {
                match serde_json::from_str::<Value>(&response.body) {
                    Ok(body) if body.is_object() => UpdateDocumentResponse::from_json(&body),
                    _ => {
                        tracing::warn!("Unparsable body in update response");
                        UpdateDocumentResponse::failed(ResponseCode::DeserializationError)
                    }
                }
            }
            Some(response) => {
                tracing::warn!("Update rejected with status {}", response.status);
                UpdateDocumentResponse::failed(ResponseCode::ClientError)
            }
            None => UpdateDocumentResponse::failed(ResponseCode::ClientError),
        }
    }

    /// Delete a document, optionally guarded by its change vector
    ///
    /// An empty `expected_change_vector` deletes unconditionally. Returns
    /// `true` only on `204 No Content`; a concurrency conflict is `false`
    /// like any other failure.
    #[tracing::instrument(skip(self))]
    pub async fn delete_document_if_match(
        &self,
        id: &str,
        expected_change_vector: &str,
        database: DatabaseSelector,
    ) -> bool {
        let url = build_url(&self.config, DOCS_ENDPOINT, &[id], database);
        let mut request = HttpRequest::new(HttpMethod::Delete, url);
        if !expected_change_vector.is_empty() {
            request = request.with_header("If-Match", expected_change_vector);
        }

        match self.execute(request).await {
            Some(response) if response.status == 204 => true,
            Some(response) => {
                tracing::warn!(
                    "Delete failed with status {} ({})",
                    response.status,
                    status_to_response_code(response.status)
                );
                false
            }
            None => false,
        }
    }

    /// Delete a document without a concurrency check
    pub async fn delete_document(&self, id: &str, database: DatabaseSelector) {
        self.delete_document_if_match(id, "", database).await;
    }

    async fn execute(&self, request: HttpRequest) -> Option<HttpResponse> {
        tracing::debug!("{} {}", request.method, request.url);

        match self.transport.send(request).await {
            Ok(response) => Some(response),
            Err(e) => {
                tracing::warn!("Transport failure: {}", e);
                None
            }
        }
    }
}

/// Pull the `Results` array out of a JSON response body
fn results_array(body: &str) -> Option<Vec<Value>> {
    let mut value: Value = serde_json::from_str(body).ok()?;
    match value.get_mut("Results")?.take() {
        Value::Array(entries) => Some(entries),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::TransportError;
    use async_trait::async_trait;
    use ravenlink_core::{
        measure_latency, DeleteCommand, DeleteCommandResponse, PutCommand, PutCommandResponse,
    };
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays scripted responses and records every request it sees
    #[derive(Default)]
    struct FakeTransport {
        responses: Mutex<VecDeque<std::result::Result<HttpResponse, TransportError>>>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl FakeTransport {
        fn replying(status: u16, body: &str) -> Arc<Self> {
            let fake = Self::default();
            fake.responses
                .lock()
                .unwrap()
                .push_back(Ok(HttpResponse::new(status, body)));
            Arc::new(fake)
        }

        fn unreachable() -> Arc<Self> {
            let fake = Self::default();
            fake.responses
                .lock()
                .unwrap()
                .push_back(Err(TransportError::Unavailable("connection refused".into())));
            Arc::new(fake)
        }

        fn requests(&self) -> Vec<HttpRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl HttpTransport for FakeTransport {
        async fn send(
            &self,
            request: HttpRequest,
        ) -> std::result::Result<HttpResponse, TransportError> {
            self.requests.lock().unwrap().push(request);
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(TransportError::Unavailable("no scripted response".into())))
        }
    }

    fn client(transport: &Arc<FakeTransport>) -> Client {
        Client::with_transport(ClientConfig::new("http://db:8080"), transport.clone())
    }

    fn sample_batch() -> BatchRequest {
        let mut batch = BatchRequest::new();
        batch.push(PutCommand::new("docs/1", json!({ "Name": "Anvil" })));
        batch.push(DeleteCommand::new("docs/2").with_change_vector("A:3"));
        batch
    }

    #[tokio::test]
    async fn test_atomic_update_success() {
        let transport = FakeTransport::replying(
            201,
            r#"{"Results":[{"Type":"PUT","@id":"docs/1","@change-vector":"A:1"},{"Type":"DELETE","Id":"docs/2","Deleted":true}]}"#,
        );
        let response = client(&transport)
            .atomic_update(&sample_batch(), DatabaseSelector::Exchange)
            .await;

        assert!(response.success);
        assert_eq!(response.code, ResponseCode::Ok);
        assert_eq!(
            response.results,
            vec![
                CommandResponse::Put(PutCommandResponse {
                    id: "docs/1".to_string(),
                    change_vector: "A:1".to_string(),
                }),
                CommandResponse::Delete(DeleteCommandResponse {
                    id: "docs/2".to_string(),
                    deleted: true,
                }),
            ]
        );
    }

    #[tokio::test]
    async fn test_atomic_update_sends_single_ordered_post() {
        let transport = FakeTransport::replying(201, r#"{"Results":[]}"#);
        client(&transport)
            .atomic_update(&sample_batch(), DatabaseSelector::Inventory)
            .await;

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);

        let request = &requests[0];
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.url, "http://db:8080/databases/Inventory/bulk_docs");
        assert_eq!(request.header("Content-Type"), Some("application/json"));

        let body: Value = serde_json::from_str(request.body.as_deref().unwrap()).unwrap();
        assert_eq!(
            body,
            json!({
                "Commands": [
                    { "Type": "PUT", "Id": "docs/1", "Document": { "Name": "Anvil" }, "ChangeVector": null },
                    { "Type": "DELETE", "Id": "docs/2", "ChangeVector": "A:3" }
                ]
            })
        );
    }

    #[tokio::test]
    async fn test_atomic_update_skips_unknown_result_types() {
        let transport = FakeTransport::replying(
            201,
            r#"{"Results":[{"Type":"PATCH","Id":"docs/5"},42,{"Type":"DELETE","Id":"docs/2","Deleted":false}]}"#,
        );
        let response = client(&transport)
            .atomic_update(&sample_batch(), DatabaseSelector::Exchange)
            .await;

        assert!(response.success);
        assert_eq!(response.results.len(), 1);
        assert_eq!(response.results[0].id(), "docs/2");
    }

    #[tokio::test]
    async fn test_atomic_update_status_translation() {
        for (status, expected) in [
            (409, ResponseCode::ConcurrencyException),
            (500, ResponseCode::ServerError),
            (404, ResponseCode::NotFound),
            (200, ResponseCode::Unknown),
        ] {
            let transport = FakeTransport::replying(status, r#"{"Results":[]}"#);
            let response = client(&transport)
                .atomic_update(&sample_batch(), DatabaseSelector::Exchange)
                .await;

            assert!(!response.success);
            assert_eq!(response.code, expected, "status {}", status);
            assert!(response.results.is_empty());
        }
    }

    #[tokio::test]
    async fn test_atomic_update_transport_failure() {
        let transport = FakeTransport::unreachable();
        let response = client(&transport)
            .atomic_update(&sample_batch(), DatabaseSelector::Exchange)
            .await;

        assert!(!response.success);
        assert_eq!(response.code, ResponseCode::ConnectionRefused);
    }

    #[tokio::test]
    async fn test_atomic_update_bad_bodies() {
        for body in ["not json", r#"{"Other":[]}"#, r#"{"Results":{}}"#] {
            let transport = FakeTransport::replying(201, body);
            let response = client(&transport)
                .atomic_update(&sample_batch(), DatabaseSelector::Exchange)
                .await;

            assert!(!response.success);
            assert_eq!(response.code, ResponseCode::DeserializationError, "body {}", body);
        }
    }

    #[tokio::test]
    async fn test_atomic_update_empty_batch_not_sent() {
        let transport = Arc::new(FakeTransport::default());
        let response = client(&transport)
            .atomic_update(&BatchRequest::new(), DatabaseSelector::Exchange)
            .await;

        assert_eq!(response.code, ResponseCode::InvalidRequest);
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_get_documents_positional() {
        let transport = FakeTransport::replying(
            200,
            r#"{"Results":[{"Name":"Anvil","@metadata":{"@id":"docs/1"}},null,{"Name":"Hammer"}]}"#,
        );
        let docs = client(&transport)
            .get_documents(&["docs/1", "docs/2", "docs/3"], DatabaseSelector::Exchange)
            .await;

        assert_eq!(docs.len(), 2);
        assert!(!docs.contains_key("docs/2"));

        let first: Value = serde_json::from_str(&docs["docs/1"]).unwrap();
        assert_eq!(first["Name"], "Anvil");
        let third: Value = serde_json::from_str(&docs["docs/3"]).unwrap();
        assert_eq!(third, json!({ "Name": "Hammer" }));

        assert_eq!(
            transport.requests()[0].url,
            "http://db:8080/databases/Exchange/docs?id=docs%2F1&id=docs%2F2&id=docs%2F3"
        );
        assert_eq!(transport.requests()[0].method, HttpMethod::Get);
    }

    #[tokio::test]
    async fn test_get_documents_truncated_results() {
        let transport = FakeTransport::replying(200, r#"{"Results":[{"Name":"Anvil"}]}"#);
        let docs = client(&transport)
            .get_documents(&["docs/1", "docs/2"], DatabaseSelector::Exchange)
            .await;

        assert_eq!(docs.len(), 1);
        assert!(docs.contains_key("docs/1"));
        assert!(!docs.contains_key("docs/2"));
    }

    #[tokio::test]
    async fn test_get_documents_failure_maps_to_empty_strings() {
        for transport in [FakeTransport::replying(404, ""), FakeTransport::unreachable()] {
            let docs = client(&transport)
                .get_documents(&["docs/1", "docs/2"], DatabaseSelector::Inventory)
                .await;

            assert_eq!(docs.len(), 2);
            assert_eq!(docs["docs/1"], "");
            assert_eq!(docs["docs/2"], "");
        }
    }

    #[tokio::test]
    async fn test_get_documents_malformed_body_is_empty() {
        let transport = FakeTransport::replying(200, "<html>");
        let docs = client(&transport)
            .get_documents(&["docs/1"], DatabaseSelector::Exchange)
            .await;
        assert!(docs.is_empty());
    }

    #[tokio::test]
    async fn test_update_document_success() {
        let transport =
            FakeTransport::replying(201, r#"{"Id":"docs/1","ChangeVector":"A:9-abc"}"#);
        let document = r#"{"Name":"Anvil","Weight":50}"#;
        let response = client(&transport)
            .update_document("docs/1", document, DatabaseSelector::Exchange)
            .await;

        assert!(response.success);
        assert_eq!(response.code, ResponseCode::Ok);
        assert_eq!(response.id, "docs/1");
        assert_eq!(response.change_vector, "A:9-abc");

        let request = &transport.requests()[0];
        assert_eq!(request.method, HttpMethod::Put);
        assert_eq!(request.url, "http://db:8080/databases/Exchange/docs?id=docs%2F1");
        assert_eq!(request.body.as_deref(), Some(document));
        assert_eq!(request.header("Content-Type"), Some("application/json"));
    }

    #[tokio::test]
    async fn test_update_document_unparsable_body() {
        let transport = FakeTransport::replying(201, "{ truncated");
        let response = client(&transport)
            .update_document("docs/1", "{}", DatabaseSelector::Exchange)
            .await;

        assert!(!response.success);
        assert_eq!(response.code, ResponseCode::DeserializationError);
    }

    #[tokio::test]
    async fn test_update_document_failures_are_client_errors() {
        for transport in [
            FakeTransport::replying(409, ""),
            FakeTransport::replying(500, ""),
            FakeTransport::unreachable(),
        ] {
            let response = client(&transport)
                .update_document("docs/1", "{}", DatabaseSelector::Exchange)
                .await;

            assert!(!response.success);
            assert_eq!(response.code, ResponseCode::ClientError);
        }
    }

    #[tokio::test]
    async fn test_delete_with_change_vector() {
        let transport = FakeTransport::replying(204, "");
        let deleted = client(&transport)
            .delete_document_if_match("docs/1", "A:5", DatabaseSelector::Inventory)
            .await;

        assert!(deleted);
        let request = &transport.requests()[0];
        assert_eq!(request.method, HttpMethod::Delete);
        assert_eq!(request.url, "http://db:8080/databases/Inventory/docs?id=docs%2F1");
        assert_eq!(request.header("If-Match"), Some("A:5"));
        assert!(request.body.is_none());
    }

    #[tokio::test]
    async fn test_delete_without_change_vector_has_no_if_match() {
        let transport = FakeTransport::replying(204, "");
        client(&transport)
            .delete_document("docs/1", DatabaseSelector::Exchange)
            .await;

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].header("If-Match").is_none());
    }

    #[tokio::test]
    async fn test_delete_failures_are_false() {
        for transport in [
            FakeTransport::replying(409, ""),
            FakeTransport::replying(200, ""),
            FakeTransport::unreachable(),
        ] {
            let deleted = client(&transport)
                .delete_document_if_match("docs/9", "", DatabaseSelector::Exchange)
                .await;
            assert!(!deleted);
        }
    }

    #[tokio::test]
    async fn test_timed_request_keeps_response() {
        let transport = FakeTransport::replying(204, "");
        let client = client(&transport);

        let timed = measure_latency(|| {
            client.delete_document_if_match("docs/1", "", DatabaseSelector::Exchange)
        })
        .await;

        assert!(timed.response);
        assert!(timed.latency >= 0.0);
    }

    #[test]
    fn test_client_new_with_reqwest() {
        let client = Client::new(ClientConfig::default()).unwrap();
        assert_eq!(client.config().base_url(), "http://127.0.0.1:8080");
    }
}
