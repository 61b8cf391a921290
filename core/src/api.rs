//! The remote collection as seen by the synchronizer.
//!
//! `EntityApi` is the seam between screen state and the network. Screens
//! only ever await these three calls; tests substitute scripted fakes and
//! production code uses `HttpApi`, which pairs a `ResourceClient` with a
//! `Transport`.

use crate::client::ResourceClient;
use crate::config::ClientConfig;
use crate::entity::{Draft, Entity};
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::{Transport, UreqTransport};
use crate::types::EntityId;

/// Async CRUD over one remote collection.
#[allow(async_fn_in_trait)]
pub trait EntityApi<E: Entity> {
    async fn list(&self) -> Result<Vec<E>, ApiError>;

    /// Creates a `Draft::New` or updates a `Draft::Existing`, returning the
    /// record as persisted by the server.
    async fn save(&self, draft: &Draft<E>) -> Result<E, ApiError>;

    async fn delete(&self, id: &EntityId) -> Result<(), ApiError>;
}

/// `EntityApi` over HTTP.
#[derive(Debug, Clone)]
pub struct HttpApi<E, T = UreqTransport> {
    client: ResourceClient<E>,
    transport: T,
}

impl<E: Entity> HttpApi<E, UreqTransport> {
    pub fn new(base_url: &str) -> Self {
        Self::with_transport(base_url, UreqTransport::default())
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(&config.api_base_url)
    }
}

impl<E: Entity, T: Transport> HttpApi<E, T> {
    pub fn with_transport(base_url: &str, transport: T) -> Self {
        Self {
            client: ResourceClient::new(base_url),
            transport,
        }
    }

    pub fn client(&self) -> &ResourceClient<E> {
        &self.client
    }

    pub async fn get(&self, id: &EntityId) -> Result<E, ApiError> {
        let response = self.execute(self.client.build_get(id)).await?;
        self.client.parse_get(response)
    }

    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let transport = self.transport.clone();
        tokio::task::spawn_blocking(move || transport.execute(&request))
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?
    }
}

impl<E: Entity, T: Transport> EntityApi<E> for HttpApi<E, T> {
    async fn list(&self) -> Result<Vec<E>, ApiError> {
        let response = self.execute(self.client.build_list()).await?;
        self.client.parse_list(response)
    }

    async fn save(&self, draft: &Draft<E>) -> Result<E, ApiError> {
        let response = self.execute(self.client.build_save(draft)?).await?;
        self.client.parse_save(draft, response)
    }

    async fn delete(&self, id: &EntityId) -> Result<(), ApiError> {
        let response = self.execute(self.client.build_delete(id)).await?;
        self.client.parse_delete(response)
    }
}
