//! Cloud Firestore backend speaking the v1 REST API.
//!
//! Documents travel as Firestore typed values; this module converts them to and from the plain
//! JSON objects the rest of the crate works with.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde_json::{json, Map, Number, Value};
use tracing::{debug, instrument};

use super::{Document, DocumentId, DocumentStore, SortDirection, StoreError};
use crate::config::FirestoreConfig;

pub struct FirestoreStore {
    client: Client,
    documents_url: String,
    api_key: Option<String>,
}

impl FirestoreStore {
    pub fn new(config: &FirestoreConfig, timeout: Duration) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| StoreError::Read(format!("failed to build http client: {err}")))?;
        let documents_url = format!(
            "{}/projects/{}/databases/(default)/documents",
            config.base_url.trim_end_matches('/'),
            config.project_id
        );
        Ok(Self {
            client,
            documents_url,
            api_key: config.api_key.clone(),
        })
    }

    fn collection_url(&self, collection: &str) -> String {
        format!("{}/{}", self.documents_url, collection)
    }

    fn document_url(&self, collection: &str, id: &DocumentId) -> String {
        format!("{}/{}/{}", self.documents_url, collection, id)
    }

    fn with_key(&self, mut query: Vec<(&'static str, String)>) -> Vec<(&'static str, String)> {
        if let Some(key) = &self.api_key {
            query.push(("key", key.clone()));
        }
        query
    }
}

#[async_trait]
impl DocumentStore for FirestoreStore {
    fn backend_tag(&self) -> &'static str {
        "firestore"
    }

    #[instrument(skip(self, payload))]
    async fn create(
        &self,
        collection: &str,
        payload: Map<String, Value>,
    ) -> Result<DocumentId, StoreError> {
        let response = self
            .client
            .post(self.collection_url(collection))
            .query(&self.with_key(Vec::new()))
            .json(&json!({ "fields": encode_fields(&payload) }))
            .send()
            .await
            .map_err(|err| StoreError::Write(err.to_string()))?;

        let body = success_body(response, StoreError::Write).await?;
        let name = body
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| StoreError::Write("create response missing document name".to_string()))?;
        let id = document_id_from_name(name)
            .ok_or_else(|| StoreError::Write(format!("malformed document name '{name}'")))?;
        debug!(%id, "firestore created document");
        Ok(id)
    }

    #[instrument(skip(self))]
    async fn list(
        &self,
        collection: &str,
        order_by: &str,
        direction: SortDirection,
    ) -> Result<Vec<Document>, StoreError> {
        let direction = match direction {
            SortDirection::Ascending => "ASCENDING",
            SortDirection::Descending => "DESCENDING",
        };
        let query = json!({
            "structuredQuery": {
                "from": [{ "collectionId": collection }],
                "orderBy": [{ "field": { "fieldPath": order_by }, "direction": direction }],
            }
        });

        let response = self
            .client
            .post(format!("{}:runQuery", self.documents_url))
            .query(&self.with_key(Vec::new()))
            .json(&query)
            .send()
            .await
            .map_err(|err| StoreError::Read(err.to_string()))?;

        let body = success_body(response, StoreError::Read).await?;
        let rows = body
            .as_array()
            .ok_or_else(|| StoreError::Read("runQuery response is not an array".to_string()))?;

        // Empty result sets come back as a single row carrying only `readTime`.
        rows.iter()
            .filter_map(|row| row.get("document"))
            .map(|document| decode_document(document).ok_or_else(malformed_document))
            .collect()
    }

    #[instrument(skip(self))]
    async fn fetch(
        &self,
        collection: &str,
        id: &DocumentId,
    ) -> Result<Option<Document>, StoreError> {
        let response = self
            .client
            .get(self.document_url(collection, id))
            .query(&self.with_key(Vec::new()))
            .send()
            .await
            .map_err(|err| StoreError::Read(err.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let body = success_body(response, StoreError::Read).await?;
        decode_document(&body).map(Some).ok_or_else(malformed_document)
    }

    #[instrument(skip(self, value))]
    async fn update_field(
        &self,
        collection: &str,
        id: &DocumentId,
        field: &str,
        value: Value,
    ) -> Result<(), StoreError> {
        let query = self.with_key(vec![
            ("updateMask.fieldPaths", field.to_string()),
            ("currentDocument.exists", "true".to_string()),
        ]);
        let mut fields = Map::new();
        fields.insert(field.to_string(), encode_value(&value));

        let response = self
            .client
            .patch(self.document_url(collection, id))
            .query(&query)
            .json(&json!({ "fields": fields }))
            .send()
            .await
            .map_err(|err| StoreError::Write(err.to_string()))?;

        match response.status() {
            StatusCode::NOT_FOUND | StatusCode::PRECONDITION_FAILED => Err(StoreError::Write(
                format!("document {id} not found in {collection}"),
            )),
            _ => success_body(response, StoreError::Write).await.map(|_| ()),
        }
    }
}

async fn success_body(
    response: Response,
    failure: fn(String) -> StoreError,
) -> Result<Value, StoreError> {
    let status = response.status();
    if !status.is_success() {
        let detail = response.text().await.unwrap_or_default();
        return Err(failure(format!("firestore returned {status}: {detail}")));
    }
    response
        .json::<Value>()
        .await
        .map_err(|err| failure(format!("invalid firestore response: {err}")))
}

fn malformed_document() -> StoreError {
    StoreError::Read("firestore returned a malformed document".to_string())
}

fn document_id_from_name(name: &str) -> Option<DocumentId> {
    name.rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
        .map(DocumentId::from)
}

pub(crate) fn decode_document(document: &Value) -> Option<Document> {
    let id = document_id_from_name(document.get("name")?.as_str()?)?;
    let fields = match document.get("fields") {
        Some(Value::Object(fields)) => decode_fields(fields)?,
        None => Map::new(),
        Some(_) => return None,
    };
    Some(Document { id, fields })
}

pub(crate) fn encode_fields(fields: &Map<String, Value>) -> Map<String, Value> {
    fields
        .iter()
        .map(|(key, value)| (key.clone(), encode_value(value)))
        .collect()
}

pub(crate) fn encode_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(flag) => json!({ "booleanValue": flag }),
        Value::Number(number) => match number.as_i64() {
            Some(integer) => json!({ "integerValue": integer.to_string() }),
            None => json!({ "doubleValue": number.as_f64().unwrap_or_default() }),
        },
        Value::String(text) => json!({ "stringValue": text }),
        Value::Array(items) => json!({
            "arrayValue": { "values": items.iter().map(encode_value).collect::<Vec<_>>() }
        }),
        Value::Object(fields) => json!({ "mapValue": { "fields": encode_fields(fields) } }),
    }
}

fn decode_fields(fields: &Map<String, Value>) -> Option<Map<String, Value>> {
    fields
        .iter()
        .map(|(key, value)| decode_value(value).map(|decoded| (key.clone(), decoded)))
        .collect()
}

pub(crate) fn decode_value(value: &Value) -> Option<Value> {
    let (kind, inner) = value.as_object()?.iter().next()?;
    match kind.as_str() {
        "nullValue" => Some(Value::Null),
        "booleanValue" => inner.as_bool().map(Value::Bool),
        "integerValue" => match inner {
            Value::String(raw) => raw.parse::<i64>().ok().map(Value::from),
            Value::Number(number) => Some(Value::Number(number.clone())),
            _ => None,
        },
        "doubleValue" => inner
            .as_f64()
            .and_then(Number::from_f64)
            .map(Value::Number),
        "stringValue" | "timestampValue" | "referenceValue" => {
            inner.as_str().map(|text| Value::String(text.to_string()))
        }
        "arrayValue" => {
            let values = match inner.get("values") {
                Some(Value::Array(values)) => values,
                None => return Some(Value::Array(Vec::new())),
                Some(_) => return None,
            };
            values
                .iter()
                .map(decode_value)
                .collect::<Option<Vec<_>>>()
                .map(Value::Array)
        }
        "mapValue" => match inner.get("fields") {
            Some(Value::Object(fields)) => decode_fields(fields).map(Value::Object),
            None => Some(Value::Object(Map::new())),
            Some(_) => None,
        },
        _ => None,
    }
}
