//! The trait seam between the controller layer and the remote API.
//!
//! Controllers are written against [`Directory`] so tests can script a
//! double instead of standing up an HTTP server.

use abitus_core::filter::Filter;
use abitus_core::page::PageResult;
use abitus_core::person::PersonDetail;
use abitus_core::statistics::Statistics;
use abitus_core::tip::TipSubmission;
use abitus_core::types::DbId;

use crate::api::AbitusApi;
use crate::error::GatewayError;

/// The four remote operations the directory UI is built on.
#[async_trait::async_trait]
pub trait Directory: Send + Sync {
    /// Fetch one page of the filtered listing.
    async fn list_by_filter(&self, filter: &Filter, page: u32)
        -> Result<PageResult, GatewayError>;

    /// Fetch one record's detail.
    async fn get_by_id(&self, id: DbId) -> Result<PersonDetail, GatewayError>;

    /// Fetch the aggregate case counters.
    async fn get_statistics(&self) -> Result<Statistics, GatewayError>;

    /// Submit one tip. Exactly one POST, no retry.
    async fn submit_tip(&self, tip: &TipSubmission) -> Result<(), GatewayError>;
}

#[async_trait::async_trait]
impl Directory for AbitusApi {
    async fn list_by_filter(
        &self,
        filter: &Filter,
        page: u32,
    ) -> Result<PageResult, GatewayError> {
        AbitusApi::list_by_filter(self, filter, page).await
    }

    async fn get_by_id(&self, id: DbId) -> Result<PersonDetail, GatewayError> {
        AbitusApi::get_by_id(self, id).await
    }

    async fn get_statistics(&self) -> Result<Statistics, GatewayError> {
        AbitusApi::get_statistics(self).await
    }

    async fn submit_tip(&self, tip: &TipSubmission) -> Result<(), GatewayError> {
        AbitusApi::submit_tip(self, tip).await
    }
}
