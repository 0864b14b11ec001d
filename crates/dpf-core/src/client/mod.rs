//! Resource client
//!
//! Turns a resource plus an action into one HTTP exchange and the response
//! back into populated resources.
//!
//! - Read-style calls (`read`, `list`, `count`) expect a synchronous
//!   envelope and absorb it into the resource
//! - Mutating calls (`create`, `update`, `delete`, `apply`, `cancel`) accept
//!   a synchronous or an async job envelope and return its `request_id`
//!   without waiting for the job
//! - Unsupported actions fail before any request is made
//!
//! The client never retries; every method issues exactly one request,
//! except [`Client::list_all`] which pages explicitly.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use dpf_core::Client;
//! use dpf_core::config::ClientConfig;
//!
//! let client = Client::from_config(&ClientConfig::new(token))?;
//! let mut zone = Zone { id: "m1".into(), ..Default::default() };
//! let request_id = client.read(&mut zone).await?;
//! ```

mod response;
mod search;

pub use response::AsyncResponse;
pub use search::SearchParams;

use crate::action::Action;
use crate::config::ClientConfig;
use crate::error::{BadResponse, Error, Result};
use crate::projection::{self, Fields};
use crate::traits::{CountableListSpec, HttpRequest, ListSpec, Spec, Transport};
use crate::transport::ReqwestTransport;
use reqwest::{Method, Url};
use response::{CountResult, ErrorBody, SyncResponse};
use std::fmt;
use std::sync::Arc;

/// Longest raw body excerpt kept in a [`BadResponse`]
const MAX_DETAIL_LEN: usize = 512;

/// Client for the DNS platform API
///
/// Cheap to clone; clones share the transport.
#[derive(Clone)]
pub struct Client {
    endpoint: String,
    /// ⚠️ NEVER log this value
    token: String,
    transport: Arc<dyn Transport>,
}

// Custom Debug implementation that hides the API token
impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("endpoint", &self.endpoint)
            .field("token", &"<REDACTED>")
            .finish()
    }
}

/// Status and body of a 2xx exchange
struct Exchange {
    method: Method,
    path: String,
    status: u16,
    body: Vec<u8>,
}

impl Exchange {
    fn bad(&self, detail: impl Into<String>) -> Error {
        Error::from(BadResponse {
            method: self.method.to_string(),
            path: self.path.clone(),
            status: Some(self.status),
            detail: detail.into(),
            ..Default::default()
        })
    }

    fn sync(&self) -> Result<SyncResponse> {
        serde_json::from_slice(&self.body)
            .map_err(|e| self.bad(format!("failed to decode response: {e}")))
    }

    fn result(&self) -> Result<(String, serde_json::Value)> {
        let response = self.sync()?;
        match response.result {
            Some(result) => Ok((response.request_id, result)),
            None => Err(self.bad("response has no `result`")),
        }
    }
}

impl Client {
    /// Create a client over an injected transport
    pub fn new(
        endpoint: impl Into<String>,
        token: impl Into<String>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        let endpoint = endpoint.into().trim_end_matches('/').to_string();
        Self {
            endpoint,
            token: token.into(),
            transport,
        }
    }

    /// Create a client with the default reqwest transport
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        let transport = ReqwestTransport::new(config.timeout(), &config.user_agent)?;
        Ok(Self::new(
            config.endpoint.clone(),
            config.token.clone(),
            Arc::new(transport),
        ))
    }

    /// API base URL
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetch a single resource and absorb it
    pub async fn read<S: Spec + ?Sized>(&self, resource: &mut S) -> Result<String> {
        let (method, path) = route(resource, Action::Read)?;
        let exchange = self.send(method, path, &[], None).await?;
        let (request_id, result) = exchange.result()?;
        resource
            .absorb_fields(result)
            .map_err(|e| exchange.bad(e.to_string()))?;
        resource.init();
        Ok(request_id)
    }

    /// Fetch one page of a collection, replacing the list items
    pub async fn list<L: ListSpec>(
        &self,
        list: &mut L,
        params: Option<&SearchParams>,
    ) -> Result<String> {
        let (method, path) = route(list, Action::List)?;
        let pairs = params.map(SearchParams::pairs).unwrap_or_default();
        let exchange = self.send(method, path, &pairs, None).await?;
        let response = exchange.sync()?;
        let Some(results) = response.results else {
            return Err(exchange.bad("response has no `results`"));
        };

        let mut items = Vec::with_capacity(results.len());
        for (index, value) in results.into_iter().enumerate() {
            let mut item = L::Item::default();
            item.absorb_fields(value)
                .map_err(|e| exchange.bad(format!("results[{index}]: {e}")))?;
            list.prepare_item(&mut item);
            item.init();
            items.push(item);
        }
        *list.items_mut() = items;
        list.init();
        Ok(response.request_id)
    }

    /// Count the members of a collection
    pub async fn count<L: CountableListSpec>(
        &self,
        list: &mut L,
        params: Option<&SearchParams>,
    ) -> Result<String> {
        let (method, path) = route(list, Action::Count)?;
        let pairs = params
            .map(|params| params.without_paging().pairs())
            .unwrap_or_default();
        let exchange = self.send(method, path, &pairs, None).await?;
        let (request_id, result) = exchange.result()?;
        let count: CountResult = serde_json::from_value(result)
            .map_err(|e| exchange.bad(format!("failed to decode count: {e}")))?;
        list.set_count(count.count);
        Ok(request_id)
    }

    /// Fetch every member of a collection: one count, then pages of
    /// `max_limit()` members
    ///
    /// Returns the request id of the last exchange.
    pub async fn list_all<L: CountableListSpec>(
        &self,
        list: &mut L,
        params: Option<&SearchParams>,
    ) -> Result<String> {
        let page_size = list.max_limit();
        if page_size == 0 {
            return Err(Error::invalid_input(format!(
                "{} reports a max_limit of 0",
                list.kind()
            )));
        }

        let keywords = params.map(SearchParams::without_paging).unwrap_or_default();
        let mut request_id = self.count(list, Some(&keywords)).await?;
        let total = list.count();

        let mut items = Vec::new();
        let mut page = list.clone();
        let mut offset = 0;
        while offset < total {
            let page_params = keywords.clone().offset(offset).limit(page_size);
            request_id = self.list(&mut page, Some(&page_params)).await?;
            if page.is_empty() {
                break;
            }
            items.append(page.items_mut());
            offset += page_size;
        }

        tracing::debug!(kind = list.kind(), total, fetched = items.len(), "listed all");
        *list.items_mut() = items;
        Ok(request_id)
    }

    /// Create a resource; `body` overrides the projected resource
    pub async fn create<S: Spec + ?Sized>(
        &self,
        resource: &S,
        body: Option<&dyn Spec>,
    ) -> Result<String> {
        self.mutate(resource, body, Action::Create).await
    }

    /// Update a resource; `body` overrides the projected resource
    pub async fn update<S: Spec + ?Sized>(
        &self,
        resource: &S,
        body: Option<&dyn Spec>,
    ) -> Result<String> {
        self.mutate(resource, body, Action::Update).await
    }

    /// Commit pending changes; `body` overrides the projected resource
    pub async fn apply<S: Spec + ?Sized>(
        &self,
        resource: &S,
        body: Option<&dyn Spec>,
    ) -> Result<String> {
        self.mutate(resource, body, Action::Apply).await
    }

    /// Delete a resource
    pub async fn delete<S: Spec + ?Sized>(&self, resource: &S) -> Result<String> {
        self.mutate(resource, None, Action::Delete).await
    }

    /// Discard pending changes
    pub async fn cancel<S: Spec + ?Sized>(&self, resource: &S) -> Result<String> {
        self.mutate(resource, None, Action::Cancel).await
    }

    async fn mutate<S: Spec + ?Sized>(
        &self,
        resource: &S,
        body: Option<&dyn Spec>,
        action: Action,
    ) -> Result<String> {
        let (method, path) = route(resource, action)?;
        let payload = match body {
            Some(body) => projection::project(body, action)?,
            None => projection::project(resource, action)?,
        };
        let exchange = self.send(method, path, &[], payload).await?;
        let envelope: AsyncResponse = serde_json::from_slice(&exchange.body)
            .map_err(|e| exchange.bad(format!("failed to decode response: {e}")))?;
        if let Some(jobs_url) = &envelope.jobs_url {
            tracing::debug!(
                request_id = %envelope.request_id,
                jobs_url = %jobs_url,
                "job accepted"
            );
        }
        Ok(envelope.request_id)
    }

    /// Perform one exchange; non-2xx and transport failures become
    /// [`Error::BadResponse`]
    async fn send(
        &self,
        method: Method,
        path: String,
        query: &[(String, String)],
        body: Option<Vec<u8>>,
    ) -> Result<Exchange> {
        let mut url = Url::parse(&format!("{}{}", self.endpoint, path))
            .map_err(|e| Error::config(format!("invalid endpoint `{}`: {e}", self.endpoint)))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }

        let mut headers = vec![
            ("Authorization".to_string(), format!("Bearer {}", self.token)),
            ("Accept".to_string(), "application/json".to_string()),
        ];
        if body.is_some() {
            headers.push(("Content-Type".to_string(), "application/json".to_string()));
        }

        let request = HttpRequest {
            method: method.clone(),
            url: url.to_string(),
            headers,
            body,
        };
        tracing::trace!(?request, "sending request");

        let response = match self.transport.execute(request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!(method = %method, path = %path, error = %e, "request failed");
                return Err(BadResponse {
                    method: method.to_string(),
                    path,
                    detail: e.to_string(),
                    ..Default::default()
                }
                .into());
            }
        };

        if !response.is_success() {
            let error: ErrorBody = serde_json::from_slice(&response.body).unwrap_or_default();
            tracing::debug!(
                method = %method,
                path = %path,
                status = response.status,
                request_id = error.request_id.as_deref().unwrap_or("-"),
                "bad response"
            );
            return Err(BadResponse {
                method: method.to_string(),
                path,
                status: Some(response.status),
                request_id: error.request_id,
                error_type: error.error_type,
                error_message: error.error_message,
                error_details: error.error_details,
                detail: excerpt(&response.body),
            }
            .into());
        }

        tracing::debug!(
            method = %method,
            path = %path,
            status = response.status,
            "request completed"
        );
        Ok(Exchange {
            method,
            path,
            status: response.status,
            body: response.body,
        })
    }
}

/// Method and path for `action`, or [`Error::UnsupportedAction`]
fn route<S: Spec + ?Sized>(resource: &S, action: Action) -> Result<(Method, String)> {
    match resource.path_method(action) {
        Some((method, path)) if !path.is_empty() => Ok((method, path)),
        _ => Err(Error::UnsupportedAction {
            kind: resource.kind().to_string(),
            action,
        }),
    }
}

fn excerpt(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    match text.char_indices().nth(MAX_DETAIL_LEN) {
        Some((index, _)) => format!("{}...", &text[..index]),
        None => text.into_owned(),
    }
}
