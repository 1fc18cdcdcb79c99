//! Remote collection operations.

use crate::client::ClientInner;
use crate::completion::Completion;
use crate::error::{RemoteError, RemoteResult};
use crate::protocol::ServiceRequest;
use opaldb_document::{Document, ValueKind};
use serde_json::{json, Value};
use std::sync::Arc;

/// Options shaping the results of a find.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindOptions {
    /// Maximum number of documents to return; 0 means no limit.
    pub limit: u64,
    /// Projection document, if any.
    pub projection: Option<Document>,
    /// Sort document, if any.
    pub sort: Option<Document>,
}

/// A find operation, as selected by the caller.
///
/// The two variants correspond to the two shapes a caller can issue:
/// filter-only, or filter plus result-shaping options.
#[derive(Debug, Clone, PartialEq)]
pub enum FindRequest {
    /// Find matching a filter, with default result shaping.
    Filter(Document),
    /// Find matching a filter, shaped by explicit options.
    WithOptions {
        /// Filter document.
        filter: Document,
        /// Result-shaping options.
        options: FindOptions,
    },
}

/// A proxy for a server-side document collection.
///
/// Operations are asynchronous: each dispatches one service call onto the
/// client's execution context and fulfills its completion exactly once.
pub struct RemoteCollection {
    inner: Arc<ClientInner>,
    database: String,
    collection: String,
}

impl RemoteCollection {
    pub(crate) fn new(inner: Arc<ClientInner>, database: &str, collection: &str) -> Self {
        Self {
            inner,
            database: database.to_string(),
            collection: collection.to_string(),
        }
    }

    /// Returns the database name.
    pub fn database(&self) -> &str {
        &self.database
    }

    /// Returns the collection name.
    pub fn name(&self) -> &str {
        &self.collection
    }

    /// Finds documents matching the request.
    ///
    /// The completion receives the matching documents, or `None` when the
    /// service reports no result set.
    pub fn find(&self, request: FindRequest, completion: Completion<Option<Vec<Document>>>) {
        let mut arguments = Document::new();
        match request {
            FindRequest::Filter(filter) => {
                arguments.insert("query", filter.into_value());
            }
            FindRequest::WithOptions { filter, options } => {
                arguments.insert("query", filter.into_value());
                arguments.insert("limit", json!(options.limit));
                if let Some(projection) = options.projection {
                    arguments.insert("project", projection.into_value());
                }
                if let Some(sort) = options.sort {
                    arguments.insert("sort", sort.into_value());
                }
            }
        }

        self.call("find", arguments, completion, |result| match result {
            Some(value) => decode_documents(value).map(Some),
            None => Ok(None),
        });
    }

    /// Counts documents matching `filter`, up to `limit` (0 means no limit).
    pub fn count(&self, filter: Document, limit: u64, completion: Completion<i64>) {
        let mut arguments = Document::new();
        arguments.insert("query", filter.into_value());
        arguments.insert("limit", json!(limit));

        self.call("count", arguments, completion, |result| {
            let value = result.ok_or_else(|| RemoteError::Protocol("count produced no result".into()))?;
            value
                .as_i64()
                .ok_or_else(|| RemoteError::Protocol(format!("count result must be an integer, found {}", ValueKind::of(&value))))
        });
    }

    /// Inserts one document; the completion receives the inserted id.
    pub fn insert_one(&self, document: Document, completion: Completion<Value>) {
        let mut arguments = Document::new();
        arguments.insert("document", document.into_value());

        self.call("insertOne", arguments, completion, |result| {
            result.ok_or_else(|| RemoteError::Protocol("insertOne produced no result".into()))
        });
    }

    /// Inserts many documents; the completion receives the inserted ids.
    pub fn insert_many(&self, documents: Vec<Document>, completion: Completion<Vec<Value>>) {
        let mut arguments = Document::new();
        let items: Vec<Value> = documents.into_iter().map(Document::into_value).collect();
        arguments.insert("documents", Value::Array(items));

        self.call("insertMany", arguments, completion, |result| match result {
            Some(Value::Array(ids)) => Ok(ids),
            Some(other) => Err(RemoteError::Protocol(format!(
                "insertMany result must be an array, found {}",
                ValueKind::of(&other)
            ))),
            None => Err(RemoteError::Protocol("insertMany produced no result".into())),
        });
    }

    /// Builds the service request and dispatches it with a result mapper.
    fn call<T>(
        &self,
        name: &'static str,
        arguments: Document,
        completion: Completion<T>,
        map: impl FnOnce(Option<Value>) -> RemoteResult<T> + Send + 'static,
    ) where
        T: Send + 'static,
    {
        let request = ServiceRequest::new(name, &self.database, &self.collection, arguments);
        let transport = self.inner.transport();
        tracing::debug!(
            request_id = %request.request_id,
            name,
            database = %self.database,
            collection = %self.collection,
            "dispatching remote call"
        );

        self.inner
            .dispatch(move || transport.call(&request)?.into_result().and_then(map), completion);
    }
}

fn decode_documents(value: Value) -> RemoteResult<Vec<Document>> {
    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(RemoteError::Protocol(format!(
                "find result must be an array, found {}",
                ValueKind::of(&other)
            )))
        }
    };
    items
        .into_iter()
        .map(|item| {
            Document::from_value(item).map_err(|kind| {
                RemoteError::Protocol(format!("find result elements must be documents, found {kind}"))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::RemoteClient;
    use crate::transport::{MockTransport, RemoteTransport};
    use opaldb_document::parse_document;
    use std::sync::mpsc;
    use std::time::Duration;

    const WAIT: Duration = Duration::from_secs(5);

    fn harness() -> (Arc<MockTransport>, RemoteClient) {
        let transport = Arc::new(MockTransport::new());
        let shared = Arc::clone(&transport) as Arc<dyn RemoteTransport>;
        (transport, RemoteClient::with_transport(shared).unwrap())
    }

    fn completion<T: Send + 'static>() -> (Completion<T>, mpsc::Receiver<RemoteResult<T>>) {
        let (tx, rx) = mpsc::channel();
        let completion = Completion::new(move |result| {
            let _ = tx.send(result);
        });
        (completion, rx)
    }

    #[test]
    fn find_with_options_forwards_documents_and_limit() {
        let (transport, client) = harness();
        transport.enqueue_result(Some(json!([])));

        let filter = parse_document(r#"{"hello": "world"}"#, "filter").unwrap();
        let projection = parse_document(r#"{"hello": 1}"#, "projection").unwrap();
        let sort = parse_document(r#"{"hello": -1}"#, "sort").unwrap();

        let (done, rx) = completion();
        client.collection("test_data", "events").find(
            FindRequest::WithOptions {
                filter: filter.clone(),
                options: FindOptions {
                    limit: 0,
                    projection: Some(projection.clone()),
                    sort: Some(sort.clone()),
                },
            },
            done,
        );

        rx.recv_timeout(WAIT).unwrap().unwrap();

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.name, "find");
        assert_eq!(request.database, "test_data");
        assert_eq!(request.collection, "events");
        assert_eq!(request.arguments.get("query"), Some(&json!({"hello": "world"})));
        assert_eq!(request.arguments.get("project"), Some(&json!({"hello": 1})));
        assert_eq!(request.arguments.get("sort"), Some(&json!({"hello": -1})));
        assert_eq!(request.arguments.get("limit"), Some(&json!(0)));
    }

    #[test]
    fn simple_find_sends_only_the_query() {
        let (transport, client) = harness();
        transport.enqueue_result(Some(json!([{"hello": "world"}])));

        let filter = parse_document(r#"{"hello": "world"}"#, "filter").unwrap();
        let (done, rx) = completion();
        client
            .collection("test_data", "events")
            .find(FindRequest::Filter(filter), done);

        let documents = rx.recv_timeout(WAIT).unwrap().unwrap().unwrap();
        assert_eq!(documents.len(), 1);

        let request = &transport.requests()[0];
        assert!(request.arguments.get("query").is_some());
        assert_eq!(request.arguments.get("project"), None);
        assert_eq!(request.arguments.get("sort"), None);
        assert_eq!(request.arguments.get("limit"), None);
    }

    #[test]
    fn find_with_empty_result_set_yields_none() {
        let (transport, client) = harness();
        transport.enqueue_result(None);

        let (done, rx) = completion();
        client
            .collection("test_data", "events")
            .find(FindRequest::Filter(Document::new()), done);

        assert_eq!(rx.recv_timeout(WAIT).unwrap().unwrap(), None);
    }

    #[test]
    fn find_rejects_non_array_result() {
        let (transport, client) = harness();
        transport.enqueue_result(Some(json!({"not": "an array"})));

        let (done, rx) = completion();
        client
            .collection("test_data", "events")
            .find(FindRequest::Filter(Document::new()), done);

        let err = rx.recv_timeout(WAIT).unwrap().unwrap_err();
        assert!(matches!(err, RemoteError::Protocol(_)));
    }

    #[test]
    fn count_maps_integer_results() {
        let (transport, client) = harness();
        transport.enqueue_result(Some(json!(3)));

        let (done, rx) = completion();
        client
            .collection("test_data", "events")
            .count(Document::new(), 0, done);

        assert_eq!(rx.recv_timeout(WAIT).unwrap().unwrap(), 3);

        let request = &transport.requests()[0];
        assert_eq!(request.name, "count");
        assert_eq!(request.arguments.get("limit"), Some(&json!(0)));
    }

    #[test]
    fn insert_one_returns_the_inserted_id() {
        let (transport, client) = harness();
        transport.enqueue_result(Some(json!({"$oid": "5f0cbd1f"})));

        let document = parse_document(r#"{"hello": "world"}"#, "document").unwrap();
        let (done, rx) = completion();
        client
            .collection("test_data", "events")
            .insert_one(document, done);

        let id = rx.recv_timeout(WAIT).unwrap().unwrap();
        assert_eq!(id, json!({"$oid": "5f0cbd1f"}));

        let request = &transport.requests()[0];
        assert_eq!(request.name, "insertOne");
        assert_eq!(request.arguments.get("document"), Some(&json!({"hello": "world"})));
    }

    #[test]
    fn insert_many_returns_all_ids() {
        let (transport, client) = harness();
        transport.enqueue_result(Some(json!(["a", "b"])));

        let documents = vec![
            parse_document(r#"{"n": 1}"#, "documents").unwrap(),
            parse_document(r#"{"n": 2}"#, "documents").unwrap(),
        ];
        let (done, rx) = completion();
        client
            .collection("test_data", "events")
            .insert_many(documents, done);

        let ids = rx.recv_timeout(WAIT).unwrap().unwrap();
        assert_eq!(ids, vec![json!("a"), json!("b")]);

        let request = &transport.requests()[0];
        assert_eq!(request.name, "insertMany");
        assert_eq!(
            request.arguments.get("documents"),
            Some(&json!([{"n": 1}, {"n": 2}]))
        );
    }

    #[test]
    fn service_failures_arrive_as_errors() {
        let (transport, client) = harness();
        transport.enqueue_failure("no such collection");

        let (done, rx) = completion();
        client
            .collection("test_data", "missing")
            .find(FindRequest::Filter(Document::new()), done);

        let err = rx.recv_timeout(WAIT).unwrap().unwrap_err();
        assert!(matches!(err, RemoteError::Service(_)));
        assert!(err.to_string().contains("no such collection"));
    }
}
