//! Stateless HTTP request builder and response parser for a REST collection.
//!
//! # Design
//! `ResourceClient` holds only the collection URL and carries no mutable
//! state between calls. Each CRUD operation is split into a `build_*` method
//! that produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`. Executing the round-trip is somebody else's job (see
//! `transport`), keeping this module deterministic and free of I/O.

use std::fmt;
use std::marker::PhantomData;

use crate::entity::{Draft, Entity};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::EntityId;

/// Synchronous, stateless client for one entity collection.
pub struct ResourceClient<E> {
    collection_url: String,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for ResourceClient<E> {
    fn clone(&self) -> Self {
        Self {
            collection_url: self.collection_url.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E> fmt::Debug for ResourceClient<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceClient")
            .field("collection_url", &self.collection_url)
            .finish()
    }
}

impl<E: Entity> ResourceClient<E> {
    pub fn new(base_url: &str) -> Self {
        Self {
            collection_url: format!("{}/{}", base_url.trim_end_matches('/'), E::COLLECTION),
            _entity: PhantomData,
        }
    }

    pub fn collection_url(&self) -> &str {
        &self.collection_url
    }

    pub fn build_list(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: self.collection_url.clone(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_get(&self, id: &EntityId) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: self.item_url(id),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_create(&self, fields: &E::Fields) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: self.collection_url.clone(),
            headers: json_headers(),
            body: Some(to_body(fields)?),
        })
    }

    pub fn build_update(&self, id: &EntityId, fields: &E::Fields) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest {
            method: HttpMethod::Put,
            path: self.item_url(id),
            headers: json_headers(),
            body: Some(to_body(fields)?),
        })
    }

    /// Create for `Draft::New`, update for `Draft::Existing`.
    pub fn build_save(&self, draft: &Draft<E>) -> Result<HttpRequest, ApiError> {
        match draft {
            Draft::New(fields) => self.build_create(fields),
            Draft::Existing { id, fields } => self.build_update(id, fields),
        }
    }

    pub fn build_delete(&self, id: &EntityId) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            path: self.item_url(id),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn parse_list(&self, response: HttpResponse) -> Result<Vec<E>, ApiError> {
        check_status(&response, 200)?;
        from_body(&response.body)
    }

    pub fn parse_get(&self, response: HttpResponse) -> Result<E, ApiError> {
        check_status(&response, 200)?;
        from_body(&response.body)
    }

    pub fn parse_create(&self, response: HttpResponse) -> Result<E, ApiError> {
        check_status(&response, 201)?;
        from_body(&response.body)
    }

    pub fn parse_update(&self, response: HttpResponse) -> Result<E, ApiError> {
        check_status(&response, 200)?;
        from_body(&response.body)
    }

    pub fn parse_save(&self, draft: &Draft<E>, response: HttpResponse) -> Result<E, ApiError> {
        if draft.is_new() {
            self.parse_create(response)
        } else {
            self.parse_update(response)
        }
    }

    pub fn parse_delete(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, 204)?;
        Ok(())
    }

    /// Ids are opaque, so they go into the path as one escaped segment.
    fn item_url(&self, id: &EntityId) -> String {
        format!(
            "{}/{}",
            self.collection_url,
            urlencoding::encode(id.as_str())
        )
    }
}

fn json_headers() -> Vec<(String, String)> {
    vec![("content-type".to_string(), "application/json".to_string())]
}

fn to_body<T: serde::Serialize>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string(value).map_err(|e| ApiError::SerializationError(e.to_string()))
}

fn from_body<T: serde::de::DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse, expected: u16) -> Result<(), ApiError> {
    if response.status == expected {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}
