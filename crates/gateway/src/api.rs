//! REST client for the Abitus HTTP endpoints.
//!
//! Wraps the public missing-persons API (filtered listing, detail by
//! id, aggregate statistics, multipart tip submission) using
//! [`reqwest`]. Every method collapses its failure into the two-kind
//! taxonomy of [`GatewayError`]; the technical cause is logged here and
//! never surfaced to the caller.

use std::time::Duration;

use reqwest::multipart::{Form, Part};

use abitus_core::filter::Filter;
use abitus_core::page::PageResult;
use abitus_core::person::PersonDetail;
use abitus_core::statistics::Statistics;
use abitus_core::tip::TipSubmission;
use abitus_core::types::DbId;

use crate::dto::{EstatisticaDto, PageDto, PessoaDto};
use crate::error::{
    ApiFailure, GatewayError, MSG_DATA_UNAVAILABLE, MSG_RECORD_UNAVAILABLE, MSG_SUBMISSION_FAILED,
};
use crate::params::listing_params;

/// Default HTTP request timeout when the caller does not configure one.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for the Abitus API.
pub struct AbitusApi {
    client: reqwest::Client,
    base_url: String,
}

impl AbitusApi {
    /// Create a client for the given base URL with the default request
    /// timeout.
    ///
    /// * `base_url` - e.g. `https://abitus-api.geia.vip`.
    pub fn new(base_url: String) -> Self {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Create a client with an explicit request timeout. The timeout is
    /// the only failure deadline this crate enforces; a request that
    /// exceeds it fails like any other transport error.
    pub fn with_timeout(base_url: String, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self { client, base_url }
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    /// Fetch one page of the filtered listing.
    ///
    /// Sends `GET /pessoas/aberto/filtro` with a 0-based `pagina`, the
    /// fixed page size, and only the filter fields that are actually
    /// set.
    pub async fn list_by_filter(
        &self,
        filter: &Filter,
        page: u32,
    ) -> Result<PageResult, GatewayError> {
        match self.try_list(filter, page).await {
            Ok(result) => Ok(result),
            Err(e) => {
                tracing::warn!(page, error = %e, "person listing fetch failed");
                Err(GatewayError::DataUnavailable(MSG_DATA_UNAVAILABLE))
            }
        }
    }

    /// Fetch one record's detail via `GET /pessoas/{id}`.
    ///
    /// A remote 404 and a transport failure are not distinguished; both
    /// surface as the not-found-flavored [`GatewayError::DataUnavailable`].
    pub async fn get_by_id(&self, id: DbId) -> Result<PersonDetail, GatewayError> {
        match self.try_get_by_id(id).await {
            Ok(detail) => Ok(detail),
            Err(e) => {
                tracing::warn!(id, error = %e, "person detail fetch failed");
                Err(GatewayError::DataUnavailable(MSG_RECORD_UNAVAILABLE))
            }
        }
    }

    /// Fetch the aggregate counters via `GET /pessoas/aberto/estatistico`.
    pub async fn get_statistics(&self) -> Result<Statistics, GatewayError> {
        match self.try_get_statistics().await {
            Ok(statistics) => Ok(statistics),
            Err(e) => {
                tracing::warn!(error = %e, "statistics fetch failed");
                Err(GatewayError::DataUnavailable(MSG_DATA_UNAVAILABLE))
            }
        }
    }

    /// Submit a tip via one multipart `POST /ocorrencias/informacoes-desaparecido`.
    ///
    /// The body carries the occurrence id as a text field, the location
    /// and notes texts, and zero or more `arquivos` file parts. The call
    /// is made exactly once; retries are the user's decision.
    pub async fn submit_tip(&self, tip: &TipSubmission) -> Result<(), GatewayError> {
        match self.try_submit_tip(tip).await {
            Ok(()) => Ok(()),
            Err(e) => {
                tracing::warn!(
                    occurrence_id = tip.occurrence_id,
                    error = %e,
                    "tip submission failed"
                );
                Err(GatewayError::SubmissionFailed(MSG_SUBMISSION_FAILED))
            }
        }
    }

    // ---- transport layer ----

    async fn try_list(&self, filter: &Filter, page: u32) -> Result<PageResult, ApiFailure> {
        let response = self
            .client
            .get(format!("{}/pessoas/aberto/filtro", self.base_url))
            .query(&listing_params(filter, page))
            .send()
            .await?;

        let dto: PageDto = Self::parse_response(response).await?;
        Ok(dto.into_page_result())
    }

    async fn try_get_by_id(&self, id: DbId) -> Result<PersonDetail, ApiFailure> {
        let response = self
            .client
            .get(format!("{}/pessoas/{id}", self.base_url))
            .send()
            .await?;

        let dto: PessoaDto = Self::parse_response(response).await?;
        Ok(dto.into_detail())
    }

    async fn try_get_statistics(&self) -> Result<Statistics, ApiFailure> {
        let response = self
            .client
            .get(format!("{}/pessoas/aberto/estatistico", self.base_url))
            .send()
            .await?;

        let dto: EstatisticaDto = Self::parse_response(response).await?;
        Ok(dto.into_statistics())
    }

    async fn try_submit_tip(&self, tip: &TipSubmission) -> Result<(), ApiFailure> {
        let response = self
            .client
            .post(format!(
                "{}/ocorrencias/informacoes-desaparecido",
                self.base_url
            ))
            .multipart(build_tip_form(tip))
            .send()
            .await?;

        Self::check_status(response).await
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or an [`ApiFailure::Status`]
    /// containing the status and body text on failure.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ApiFailure> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ApiFailure::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiFailure> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }

    /// Assert the response has a success status code, discarding the body.
    async fn check_status(response: reqwest::Response) -> Result<(), ApiFailure> {
        Self::ensure_success(response).await?;
        Ok(())
    }
}

/// The three text fields every tip carries, in wire order.
fn tip_text_fields(tip: &TipSubmission) -> [(&'static str, String); 3] {
    [
        ("ocorrenciaId", tip.occurrence_id.to_string()),
        ("descricaoLocal", tip.location.clone()),
        ("informacao", tip.notes.clone()),
    ]
}

/// Assemble the multipart body: the three text fields plus one
/// `arquivos` part per attached photo.
fn build_tip_form(tip: &TipSubmission) -> Form {
    let mut form = Form::new();
    for (name, value) in tip_text_fields(tip) {
        form = form.text(name, value);
    }
    for photo in &tip.photos {
        let part = Part::bytes(photo.bytes.clone()).file_name(photo.file_name.clone());
        form = form.part("arquivos", part);
    }
    form
}
