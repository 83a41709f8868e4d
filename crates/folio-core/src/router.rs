//! Request orchestration
//!
//! [`dispatch`] maps one transport-neutral [`Request`] onto a store
//! operation. There is no route table: the resolved path and the method
//! alone decide what happens.

use serde_json::{json, Value};

use crate::query::{self, QueryParams};
use crate::storage::{resolve, CollectionListing, DocumentStorage, Store};
use crate::types::{Document, DocumentId, Error, Fields, Result};
use crate::log_debug;

/// Request method
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    /// GET
    Get,
    /// HEAD, answered as GET
    Head,
    /// POST
    Post,
    /// PUT
    Put,
    /// PATCH
    Patch,
    /// DELETE
    Delete,
    /// Anything else, upper-cased
    Other(String),
}

impl Method {
    /// Parse a method name, case-insensitively
    pub fn parse(name: &str) -> Self {
        match name.to_ascii_uppercase().as_str() {
            "GET" => Method::Get,
            "HEAD" => Method::Head,
            "POST" => Method::Post,
            "PUT" => Method::Put,
            "PATCH" => Method::Patch,
            "DELETE" => Method::Delete,
            other => Method::Other(other.to_string()),
        }
    }

    /// Canonical upper-case name
    pub fn as_str(&self) -> &str {
        match self {
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
            Method::Other(name) => name,
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request as seen by the core
#[derive(Debug, Clone)]
pub struct Request {
    /// Request method
    pub method: Method,
    /// Path, still percent-encoded
    pub path: String,
    /// Query string without the leading `?`, still percent-encoded
    pub query: String,
    /// Raw body bytes
    pub body: Vec<u8>,
}

impl Request {
    /// Build a request with an empty query and body
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self { method, path: path.into(), query: String::new(), body: Vec::new() }
    }

    /// Set the query string
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    /// Set the body
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Parse the body as a JSON object. An empty body is `{}`.
    pub fn json_body(&self) -> Result<Fields> {
        if self.body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Fields::new());
        }
        match serde_json::from_slice::<Value>(&self.body) {
            Ok(Value::Object(fields)) => Ok(fields),
            Ok(_) => Err(Error::invalid_body("expected a JSON object")),
            Err(e) => Err(Error::invalid_body(e.to_string())),
        }
    }
}

/// Successful outcome of a request
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// Queried collection listing
    Collection(Vec<Document>),
    /// A single document
    Document(Document),
    /// A newly created document
    Created(Document),
    /// Confirmation of a deletion
    Deleted(DocumentId),
}

impl Response {
    /// HTTP status code of the outcome
    pub fn status(&self) -> u16 {
        match self {
            Response::Created(_) => 201,
            _ => 200,
        }
    }

    /// JSON body of the outcome
    pub fn into_json(self) -> Value {
        match self {
            Response::Collection(documents) => Value::Array(documents.into_iter().map(Value::from).collect()),
            Response::Document(document) | Response::Created(document) => document.into(),
            Response::Deleted(id) => json!({ "message": "Document deleted", "id": id.to_string() }),
        }
    }
}

fn require_id(method: &Method, id: Option<DocumentId>) -> Result<DocumentId> {
    id.ok_or_else(|| Error::missing_identifier(method.as_str()))
}

/// Handle one request against `store`
pub fn dispatch<S: DocumentStorage>(store: &Store<S>, request: &Request) -> Result<Response> {
    let resolved = resolve(&request.path);
    log_debug!("{} {} resolved to {}", request.method, request.path, resolved.describe());
    let collection = &resolved.collection;

    match (&request.method, resolved.id) {
        (Method::Get | Method::Head, Some(id)) => Ok(Response::Document(store.get_document(collection, &id)?)),
        (Method::Get | Method::Head, None) => match store.list_collection(collection)? {
            CollectionListing::Missing => Ok(Response::Collection(Vec::new())),
            CollectionListing::NotADirectory => Err(Error::not_found(collection.to_string())),
            CollectionListing::Singleton(document) => Ok(Response::Document(document)),
            CollectionListing::Populated(documents) => {
                let params = QueryParams::parse(&request.query);
                Ok(Response::Collection(query::apply(documents, &params)))
            }
        },
        (Method::Post, None) => {
            let body = request.json_body()?;
            let id = DocumentId::generate();
            Ok(Response::Created(store.create_document(collection, &id, body)?))
        }
        (Method::Put, id) => {
            let id = require_id(&request.method, id)?;
            let body = request.json_body()?;
            Ok(Response::Document(store.replace_document(collection, &id, body)?))
        }
        (Method::Patch, id) => {
            let id = require_id(&request.method, id)?;
            let body = request.json_body()?;
            Ok(Response::Document(store.patch_document(collection, &id, body)?))
        }
        (Method::Delete, id) => {
            let id = require_id(&request.method, id)?;
            store.delete_document(collection, &id)?;
            Ok(Response::Deleted(id))
        }
        (method, _) => Err(Error::route_not_found(method.as_str(), request.path.as_str())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileStorage, MemoryStorage};
    use crate::types::PutSemantics;

    fn store() -> Store<MemoryStorage> {
        Store::new(MemoryStorage::new(), PutSemantics::Replace)
    }

    fn post(store: &Store<MemoryStorage>, path: &str, body: Value) -> Document {
        let request = Request::new(Method::Post, path).with_body(body.to_string());
        match dispatch(store, &request).unwrap() {
            Response::Created(document) => document,
            other => panic!("unexpected response: {:?}", other),
        }
    }

    fn id_of(document: &Document) -> String {
        document.id().unwrap().to_string()
    }

    #[test]
    fn test_method_parse() {
        assert_eq!(Method::parse("get"), Method::Get);
        assert_eq!(Method::parse("PATCH"), Method::Patch);
        assert_eq!(Method::parse("options"), Method::Other("OPTIONS".into()));
        assert_eq!(Method::Other("TRACE".into()).to_string(), "TRACE");
    }

    #[test]
    fn test_create_then_fetch() {
        let store = store();
        let created = post(&store, "/items", json!({"name": "X", "price": 10}));
        assert!(DocumentId::is_canonical(&id_of(&created)));
        assert!(created.get("createdAt").is_some());

        let request = Request::new(Method::Get, format!("/items/{}", id_of(&created)));
        assert_eq!(dispatch(&store, &request).unwrap(), Response::Document(created));
    }

    #[test]
    fn test_head_is_get() {
        let store = store();
        let created = post(&store, "/items", json!({"a": 1}));
        let request = Request::new(Method::Head, format!("/items/{}", id_of(&created)));
        assert_eq!(dispatch(&store, &request).unwrap(), Response::Document(created));
    }

    #[test]
    fn test_missing_collection_is_empty() {
        let response = dispatch(&store(), &Request::new(Method::Get, "/missing-collection")).unwrap();
        assert_eq!(response, Response::Collection(Vec::new()));
        assert_eq!(response.into_json(), json!([]));
    }

    #[test]
    fn test_listing_applies_query() {
        let store = store();
        for price in [1, 10, 25] {
            post(&store, "/items", json!({"price": price}));
        }
        let request = Request::new(Method::Get, "/items").with_query("price>=5&price<=20");
        match dispatch(&store, &request).unwrap() {
            Response::Collection(documents) => {
                assert_eq!(documents.len(), 1);
                assert_eq!(documents[0].get("price"), Some(&json!(10)));
            }
            other => panic!("unexpected response: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_identifier_is_not_found() {
        let request = Request::new(Method::Get, format!("/items/{}", DocumentId::generate()));
        assert!(matches!(dispatch(&store(), &request), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_writes_require_identifier() {
        for method in [Method::Put, Method::Patch, Method::Delete] {
            let request = Request::new(method.clone(), "/items").with_body("{}");
            match dispatch(&store(), &request) {
                Err(Error::MissingIdentifier { method: name }) => assert_eq!(name, method.as_str()),
                other => panic!("unexpected outcome: {:?}", other),
            }
        }
    }

    #[test]
    fn test_post_with_identifier_is_not_a_route() {
        let request = Request::new(Method::Post, format!("/items/{}", DocumentId::generate()));
        assert!(matches!(dispatch(&store(), &request), Err(Error::RouteNotFound { .. })));
    }

    #[test]
    fn test_other_methods_are_not_routes() {
        let request = Request::new(Method::parse("OPTIONS"), "/items");
        match dispatch(&store(), &request) {
            Err(Error::RouteNotFound { method, path }) => {
                assert_eq!(method, "OPTIONS");
                assert_eq!(path, "/items");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_body_rules() {
        let store = store();
        // Empty body is an empty object
        let empty = dispatch(&store, &Request::new(Method::Post, "/items")).unwrap();
        assert_eq!(empty.status(), 201);

        for bad in ["[1,2]", "42", "{not json"] {
            let request = Request::new(Method::Post, "/items").with_body(bad);
            assert!(matches!(dispatch(&store, &request), Err(Error::InvalidBody(_))), "{}", bad);
        }
    }

    #[test]
    fn test_put_patch_delete_cycle() {
        let store = store();
        let created = post(&store, "/items", json!({"name": "X", "price": 10}));
        let path = format!("/items/{}", id_of(&created));

        let put = Request::new(Method::Put, path.as_str()).with_body(r#"{"name":"Y"}"#);
        match dispatch(&store, &put).unwrap() {
            Response::Document(document) => {
                assert_eq!(document.get("name"), Some(&json!("Y")));
                assert_eq!(document.get("price"), None);
            }
            other => panic!("unexpected response: {:?}", other),
        }

        let patch = Request::new(Method::Patch, path.as_str()).with_body(r#"{"price":12}"#);
        match dispatch(&store, &patch).unwrap() {
            Response::Document(document) => {
                assert_eq!(document.get("name"), Some(&json!("Y")));
                assert_eq!(document.get("price"), Some(&json!(12)));
            }
            other => panic!("unexpected response: {:?}", other),
        }

        let deleted = dispatch(&store, &Request::new(Method::Delete, path.as_str())).unwrap();
        assert_eq!(
            deleted.into_json(),
            json!({"message": "Document deleted", "id": id_of(&created)})
        );

        let gone = dispatch(&store, &Request::new(Method::Get, path.as_str()));
        assert!(matches!(gone, Err(Error::NotFound(_))));
    }

    #[test]
    fn test_singleton_and_plain_file_listings() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("settings.json"), r#"{"theme":"dark"}"#).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "hello").unwrap();
        let store = Store::new(FileStorage::new(dir.path()), PutSemantics::Replace);

        match dispatch(&store, &Request::new(Method::Get, "/settings.json")).unwrap() {
            Response::Document(document) => assert_eq!(document.get("theme"), Some(&json!("dark"))),
            other => panic!("unexpected response: {:?}", other),
        }

        let plain = dispatch(&store, &Request::new(Method::Get, "/notes.txt"));
        assert!(matches!(plain, Err(Error::NotFound(_))));
    }

    #[test]
    fn test_unreachable_locations_are_not_found() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("readme"), "hello").unwrap();
        let store = Store::new(FileStorage::new(dir.path()), PutSemantics::Replace);
        let below_file = format!("/readme/{}", DocumentId::generate());

        let get = dispatch(&store, &Request::new(Method::Get, below_file.as_str()));
        assert!(matches!(get, Err(Error::NotFound(_))));
        let delete = dispatch(&store, &Request::new(Method::Delete, below_file.as_str()));
        assert!(matches!(delete, Err(Error::NotFound(_))));

        let nested = dispatch(&store, &Request::new(Method::Get, "/readme/sub")).unwrap();
        assert_eq!(nested, Response::Collection(Vec::new()));

        let overlong = dispatch(&store, &Request::new(Method::Get, format!("/{}", "a".repeat(300)))).unwrap();
        assert_eq!(overlong, Response::Collection(Vec::new()));
    }
}
