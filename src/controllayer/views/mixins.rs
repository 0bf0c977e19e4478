//! Reusable list/create/retrieve/update/destroy behaviour.
//!
//! A view opts into each action by implementing the matching mixin; the
//! default method bodies do the work through the view's [`ModelResource`].

use async_trait::async_trait;
use axum::{
    Json,
    extract::{FromRequest, Request},
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
};
use serde_json::Value;

use crate::controllayer::pagination::{PageNumberPagination, PageQuery};
use crate::controllayer::views::extract::ApiPayload;
use crate::controllayer::views::resource::{ModelResource, WritableResource};
use crate::errors::ServiceResult;
use crate::state::AppState;

/// Base for every view built from mixins
pub trait GenericApiView: Send + Sync {
    type Resource: ModelResource;

    fn state(&self) -> &AppState;

    /// Paginator for list responses; `None` returns a plain array
    fn pagination(&self) -> Option<PageNumberPagination> {
        None
    }
}

#[async_trait]
pub trait ListModelMixin: GenericApiView {
    /// Only paginated views read the query string of `uri`
    async fn list(&self, uri: &Uri) -> ServiceResult<Response> {
        let records = <Self::Resource as ModelResource>::queryset(self.state()).await?;
        let items: Vec<_> = records
            .iter()
            .map(<Self::Resource as ModelResource>::to_representation)
            .collect();

        match self.pagination() {
            Some(pagination) => {
                let page = pagination.paginate(items, &PageQuery::from_uri(uri), uri)?;
                Ok(Json(page).into_response())
            }
            None => Ok(Json(items).into_response()),
        }
    }
}

#[async_trait]
pub trait CreateModelMixin: GenericApiView
where
    <Self as GenericApiView>::Resource: WritableResource,
{
    /// 201 with the created representation
    async fn create(&self, data: &Value) -> ServiceResult<Response> {
        let created = <Self::Resource as WritableResource>::perform_create(self.state(), data).await?;
        Ok((StatusCode::CREATED, Json(created)).into_response())
    }
}

#[async_trait]
pub trait RetrieveModelMixin: GenericApiView
where
    <Self as GenericApiView>::Resource: WritableResource,
{
    async fn retrieve(&self, id: i64) -> ServiceResult<Response> {
        let record = <Self::Resource as WritableResource>::get_object(self.state(), id).await?;
        let body = <Self::Resource as ModelResource>::to_representation(&record);
        Ok(Json(body).into_response())
    }
}

#[async_trait]
pub trait UpdateModelMixin: GenericApiView
where
    <Self as GenericApiView>::Resource: WritableResource,
{
    /// Full update; 202 with the updated representation
    async fn update(&self, id: i64, request: Request) -> ServiceResult<Response> {
        self.apply_update(id, request, false).await
    }

    async fn partial_update(&self, id: i64, request: Request) -> ServiceResult<Response> {
        self.apply_update(id, request, true).await
    }

    /// The body is read only once the instance is known to exist, so a
    /// missing record reports 404 ahead of any body error.
    async fn apply_update(&self, id: i64, request: Request, partial: bool) -> ServiceResult<Response> {
        let instance = <Self::Resource as WritableResource>::get_object(self.state(), id).await?;
        let ApiPayload(data) = ApiPayload::from_request(request, &()).await?;
        let updated = <Self::Resource as WritableResource>::perform_update(
            self.state(),
            instance,
            &data,
            partial,
        )
        .await?;
        Ok((StatusCode::ACCEPTED, Json(updated)).into_response())
    }
}

#[async_trait]
pub trait DestroyModelMixin: GenericApiView
where
    <Self as GenericApiView>::Resource: WritableResource,
{
    async fn destroy(&self, id: i64) -> ServiceResult<Response> {
        <Self::Resource as WritableResource>::perform_destroy(self.state(), id).await?;
        Ok(StatusCode::NO_CONTENT.into_response())
    }
}
