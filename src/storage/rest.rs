//! PostgREST (Supabase-style) shipment store over HTTP.
//!
//! Talks to `{base_url}/shipments` using PostgREST's query grammar:
//! `status=eq.X`, `title=ilike.*term*`, `order=col.dir`, `offset`, `limit`, and reads the exact
//! count from the `Content-Range` header (`Prefer: count=exact`).

use crate::domain::{ListRequest, ResultPage, ShipmentId, ShipmentRecord, ShipmentWrite};
use crate::storage::{ShipmentStore, StoreError};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_RANGE};
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::Deserialize;

const TABLE: &str = "shipments";
const USER_AGENT: &str = "shipment-catalog/0.1.0";

#[derive(Clone)]
pub struct RestShipmentStore {
    http: Client,
    table_url: Url,
}

#[derive(Debug, Deserialize)]
struct IdRow {
    id: ShipmentId,
}

#[derive(Debug, Deserialize)]
struct PostgrestError {
    message: String,
    #[serde(default)]
    details: Option<String>,
}

impl RestShipmentStore {
    /// `api_key` is sent as `apikey`; the session token (falling back to the key) as bearer auth.
    pub fn new(
        base_url: &str,
        api_key: &str,
        session_token: Option<&str>,
    ) -> anyhow::Result<Self> {
        let mut base = Url::parse(base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let table_url = base.join(TABLE)?;

        let mut headers = HeaderMap::new();
        headers.insert("apikey", HeaderValue::from_str(api_key)?);
        let bearer = format!("Bearer {}", session_token.unwrap_or(api_key));
        headers.insert(AUTHORIZATION, HeaderValue::from_str(&bearer)?);

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;

        Ok(Self { http, table_url })
    }

    pub fn table_url(&self) -> &Url {
        &self.table_url
    }

    fn id_filter(id: ShipmentId) -> [(String, String); 1] {
        [("id".to_string(), format!("eq.{}", id))]
    }

    async fn send(request: RequestBuilder) -> Result<Response, StoreError> {
        let response = request
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<PostgrestError>(&body) {
            Ok(err) => match err.details {
                Some(details) if !details.is_empty() => format!("{} ({})", err.message, details),
                _ => err.message,
            },
            Err(_) if body.is_empty() => format!("store responded with HTTP {}", status),
            Err(_) => body,
        };
        Err(StoreError::Rejected(message))
    }

    async fn returned_ids(response: Response) -> Result<Vec<IdRow>, StoreError> {
        response
            .json::<Vec<IdRow>>()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))
    }
}

/// PostgREST treats `*` as the ILIKE wildcard; escape the LIKE metacharacters in the term.
fn ilike_value(term: &str) -> String {
    let mut out = String::from("ilike.*");
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('*');
    out
}

/// Query string for one listing request.
pub fn list_query(request: &ListRequest) -> Vec<(String, String)> {
    let direction = if request.sort.direction.is_ascending() {
        "asc"
    } else {
        "desc"
    };
    let mut pairs = vec![("select".to_string(), "*".to_string())];
    if let Some(status) = request.filter.status {
        pairs.push(("status".to_string(), format!("eq.{}", status.as_str())));
    }
    if let Some(term) = &request.filter.title_contains {
        pairs.push(("title".to_string(), ilike_value(term)));
    }
    pairs.push((
        "order".to_string(),
        format!(
            "{}.{},id.{}",
            request.sort.column.column_name(),
            direction,
            direction
        ),
    ));
    pairs.push(("offset".to_string(), request.offset.to_string()));
    pairs.push(("limit".to_string(), request.limit.to_string()));
    pairs
}

/// Extracts the total from a `Content-Range` value such as `0-4/42` or `*/0`.
pub fn parse_total(content_range: &str) -> Option<u64> {
    let (_, total) = content_range.trim().rsplit_once('/')?;
    total.parse().ok()
}

#[async_trait]
impl ShipmentStore for RestShipmentStore {
    fn backend(&self) -> &'static str {
        "rest"
    }

    async fn list(&self, request: &ListRequest) -> Result<ResultPage, StoreError> {
        let response = Self::send(
            self.http
                .get(self.table_url.clone())
                .query(&list_query(request))
                .header("Prefer", "count=exact"),
        )
        .await?;

        let total_count = response
            .headers()
            .get(CONTENT_RANGE)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_total)
            .ok_or_else(|| StoreError::Decode("missing exact count in Content-Range".into()))?;

        let records = response
            .json::<Vec<ShipmentRecord>>()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))?;

        Ok(ResultPage {
            records,
            total_count,
        })
    }

    async fn insert(&self, row: &ShipmentWrite) -> Result<ShipmentId, StoreError> {
        let response = Self::send(
            self.http
                .post(self.table_url.clone())
                .header("Prefer", "return=representation")
                .json(row),
        )
        .await?;

        Self::returned_ids(response)
            .await?
            .into_iter()
            .next()
            .map(|r| r.id)
            .ok_or_else(|| StoreError::Decode("insert returned no row".into()))
    }

    async fn update(&self, id: ShipmentId, row: &ShipmentWrite) -> Result<(), StoreError> {
        let response = Self::send(
            self.http
                .patch(self.table_url.clone())
                .query(&Self::id_filter(id))
                .header("Prefer", "return=representation")
                .json(row),
        )
        .await?;

        if Self::returned_ids(response).await?.is_empty() {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    async fn delete(&self, id: ShipmentId) -> Result<(), StoreError> {
        let response = Self::send(
            self.http
                .delete(self.table_url.clone())
                .query(&Self::id_filter(id))
                .header("Prefer", "return=representation"),
        )
        .await?;

        if Self::returned_ids(response).await?.is_empty() {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }
}
