//! Wire DTOs for the remote API and their mapping into the domain model.
//!
//! Field names follow the remote contract verbatim (Portuguese,
//! camelCase). Mapping is lossy on purpose: the domain model keeps only
//! what the directory displays, and the location status is derived here
//! so no stored status can drift from the occurrence data.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;

use abitus_core::page::PageResult;
use abitus_core::person::{LocationStatus, PersonDetail, PersonSummary, Poster, Sex};
use abitus_core::statistics::Statistics;
use abitus_core::types::DbId;

// ---------------------------------------------------------------------------
// Wire records
// ---------------------------------------------------------------------------

/// One person record as `/pessoas/aberto/filtro` and `/pessoas/{id}`
/// return it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PessoaDto {
    pub id: DbId,
    pub nome: Option<String>,
    pub idade: Option<u32>,
    pub sexo: Option<String>,
    pub url_foto: Option<String>,
    pub ultima_ocorrencia: Option<UltimaOcorrenciaDto>,
}

/// Last-occurrence block nested inside a person record.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UltimaOcorrenciaDto {
    pub dt_desaparecimento: Option<NaiveDateTime>,
    pub data_localizacao: Option<NaiveDate>,
    pub local_desaparecimento_concat: Option<String>,
    #[serde(rename = "ocorrenciaEntrevDesapDTO")]
    pub entrevista: Option<EntrevistaDto>,
    pub lista_cartaz: Option<Vec<CartazDto>>,
    pub oco_id: Option<DbId>,
}

/// Interview fields of the occurrence.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntrevistaDto {
    pub informacao: Option<String>,
    pub vestimentas_desaparecido: Option<String>,
}

/// One poster entry of the occurrence's `listaCartaz`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartazDto {
    pub url_cartaz: Option<String>,
    pub tipo_cartaz: Option<String>,
}

/// Envelope of the paginated listing endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageDto {
    pub content: Vec<PessoaDto>,
    pub total_pages: u32,
    pub total_elements: u64,
}

/// Envelope of the statistics endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstatisticaDto {
    pub quant_pessoas_desaparecidas: u64,
    pub quant_pessoas_encontradas: u64,
}

// ---------------------------------------------------------------------------
// Mapping
// ---------------------------------------------------------------------------

impl PessoaDto {
    fn sex(&self) -> Sex {
        self.sexo.as_deref().map(Sex::from_wire).unwrap_or(Sex::Unknown)
    }

    fn location_status(&self) -> LocationStatus {
        LocationStatus::from_date_located(
            self.ultima_ocorrencia
                .as_ref()
                .and_then(|o| o.data_localizacao),
        )
    }

    /// Map into a listing card, substituting the sex-appropriate
    /// placeholder when the wire photo URL is absent or blank.
    pub fn into_summary(self) -> PersonSummary {
        let sex = self.sex();
        let location_status = self.location_status();
        let photo_url = match self.url_foto {
            Some(url) if !url.trim().is_empty() => url,
            _ => sex.placeholder_photo().to_string(),
        };
        PersonSummary {
            id: self.id,
            display_name: self.nome.unwrap_or_default(),
            photo_url,
            location_status,
            sex,
            age: self.idade,
        }
    }

    /// Map into the full detail record.
    pub fn into_detail(mut self) -> PersonDetail {
        let occurrence = self.ultima_ocorrencia.take();
        // The status derives from the occurrence just detached.
        let location_status = LocationStatus::from_date_located(
            occurrence.as_ref().and_then(|o| o.data_localizacao),
        );
        let mut summary = self.into_summary();
        summary.location_status = location_status;

        let (disappearance_date, location_description, entrevista, posters, occurrence_id) =
            match occurrence {
                Some(o) => (
                    o.dt_desaparecimento,
                    o.local_desaparecimento_concat,
                    o.entrevista,
                    o.lista_cartaz.unwrap_or_default(),
                    o.oco_id,
                ),
                None => (None, None, None, Vec::new(), None),
            };

        let (info, clothing_description) = match entrevista {
            Some(e) => (e.informacao, e.vestimentas_desaparecido),
            None => (None, None),
        };

        PersonDetail {
            summary,
            disappearance_date,
            location_description,
            clothing_description,
            info,
            occurrence_id,
            posters: posters
                .into_iter()
                .filter_map(|c| {
                    c.url_cartaz.map(|url| Poster {
                        url,
                        kind: c.tipo_cartaz,
                    })
                })
                .collect(),
        }
    }
}

impl PageDto {
    pub fn into_page_result(self) -> PageResult {
        PageResult {
            items: self.content.into_iter().map(PessoaDto::into_summary).collect(),
            total_pages: self.total_pages,
            total_elements: self.total_elements,
        }
    }
}

impl EstatisticaDto {
    pub fn into_statistics(self) -> Statistics {
        Statistics {
            missing_count: self.quant_pessoas_desaparecidas,
            located_count: self.quant_pessoas_encontradas,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use abitus_core::person::PLACEHOLDER_PHOTO_FEMALE;
    use serde_json::json;

    fn pessoa(value: serde_json::Value) -> PessoaDto {
        serde_json::from_value(value).expect("wire record should deserialize")
    }

    // -- derived status ------------------------------------------------------

    #[test]
    fn located_iff_data_localizacao_present() {
        let located = pessoa(json!({
            "id": 1,
            "nome": "Maria Silva",
            "sexo": "FEMININO",
            "ultimaOcorrencia": { "dataLocalizacao": "2024-03-01" }
        }));
        assert_eq!(
            located.into_summary().location_status,
            LocationStatus::Located
        );

        let missing = pessoa(json!({
            "id": 2,
            "nome": "João Santos",
            "sexo": "MASCULINO",
            "ultimaOcorrencia": { "dataLocalizacao": null }
        }));
        assert_eq!(
            missing.into_summary().location_status,
            LocationStatus::Missing
        );
    }

    #[test]
    fn null_ultima_ocorrencia_means_missing() {
        let record = pessoa(json!({ "id": 3, "nome": "Ana", "sexo": "FEMININO" }));
        assert_eq!(record.into_summary().location_status, LocationStatus::Missing);
    }

    // -- placeholder substitution --------------------------------------------

    #[test]
    fn absent_photo_gets_placeholder() {
        let record = pessoa(json!({ "id": 4, "nome": "Ana", "sexo": "FEMININO" }));
        assert_eq!(record.into_summary().photo_url, PLACEHOLDER_PHOTO_FEMALE);
    }

    #[test]
    fn blank_photo_gets_placeholder() {
        let record = pessoa(json!({
            "id": 4,
            "nome": "Ana",
            "sexo": "FEMININO",
            "urlFoto": "   "
        }));
        assert_eq!(record.into_summary().photo_url, PLACEHOLDER_PHOTO_FEMALE);
    }

    #[test]
    fn present_photo_kept() {
        let record = pessoa(json!({
            "id": 4,
            "nome": "Ana",
            "sexo": "FEMININO",
            "urlFoto": "https://fotos.example/4.jpg"
        }));
        assert_eq!(record.into_summary().photo_url, "https://fotos.example/4.jpg");
    }

    // -- detail mapping ------------------------------------------------------

    #[test]
    fn detail_maps_occurrence_fields() {
        let record = pessoa(json!({
            "id": 5,
            "nome": "Carlos Oliveira",
            "idade": 34,
            "sexo": "MASCULINO",
            "ultimaOcorrencia": {
                "dtDesaparecimento": "2024-02-25T17:30:00",
                "dataLocalizacao": null,
                "localDesaparecimentoConcat": "Centro - Cuiabá/MT",
                "ocorrenciaEntrevDesapDTO": {
                    "informacao": "Saiu para o trabalho e não retornou.",
                    "vestimentasDesaparecido": "Camiseta azul, calça jeans."
                },
                "listaCartaz": [
                    { "urlCartaz": "https://cartazes.example/5.pdf", "tipoCartaz": "PDF_DESAPARECIDO" }
                ],
                "ocoId": 991
            }
        }));

        let detail = record.into_detail();
        assert_eq!(detail.summary.display_name, "Carlos Oliveira");
        assert_eq!(detail.summary.age, Some(34));
        assert_eq!(
            detail.location_description.as_deref(),
            Some("Centro - Cuiabá/MT")
        );
        assert_eq!(
            detail.clothing_description.as_deref(),
            Some("Camiseta azul, calça jeans.")
        );
        assert_eq!(detail.occurrence_id, Some(991));
        assert_eq!(detail.posters.len(), 1);
        assert_eq!(detail.posters[0].url, "https://cartazes.example/5.pdf");
    }

    #[test]
    fn detail_keeps_the_derived_status() {
        let record = pessoa(json!({
            "id": 7,
            "nome": "Laura",
            "sexo": "FEMININO",
            "ultimaOcorrencia": {
                "dtDesaparecimento": "2024-01-10T08:00:00",
                "dataLocalizacao": "2024-03-01",
                "ocoId": 55
            }
        }));
        let detail = record.into_detail();
        assert_eq!(detail.summary.location_status, LocationStatus::Located);
        assert_eq!(detail.occurrence_id, Some(55));
    }

    #[test]
    fn detail_without_occurrence_has_all_fields_absent() {
        let record = pessoa(json!({ "id": 6, "nome": "Pedro", "sexo": "MASCULINO" }));
        let detail = record.into_detail();
        assert_eq!(detail.disappearance_date, None);
        assert_eq!(detail.location_description, None);
        assert_eq!(detail.clothing_description, None);
        assert_eq!(detail.info, None);
        assert_eq!(detail.occurrence_id, None);
        assert!(detail.posters.is_empty());
    }

    // -- envelopes -----------------------------------------------------------

    #[test]
    fn page_envelope_maps() {
        let page: PageDto = serde_json::from_value(json!({
            "content": [
                { "id": 1, "nome": "Maria", "sexo": "FEMININO" },
                { "id": 2, "nome": "João", "sexo": "MASCULINO" }
            ],
            "totalPages": 3,
            "totalElements": 25
        }))
        .expect("page envelope should deserialize");

        let result = page.into_page_result();
        assert_eq!(result.items.len(), 2);
        assert_eq!(result.total_pages, 3);
        assert_eq!(result.total_elements, 25);
    }

    #[test]
    fn statistics_envelope_maps() {
        let stats: EstatisticaDto = serde_json::from_value(json!({
            "quantPessoasDesaparecidas": 810,
            "quantPessoasEncontradas": 14
        }))
        .expect("statistics envelope should deserialize");

        let statistics = stats.into_statistics();
        assert_eq!(statistics.missing_count, 810);
        assert_eq!(statistics.located_count, 14);
    }
}
