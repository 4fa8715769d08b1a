//! Query parameter construction for the filtered listing endpoint.

use abitus_core::filter::Filter;
use abitus_core::page::PAGE_SIZE;

/// Build the `/pessoas/aberto/filtro` query string pairs for a filter
/// and a 1-based page number.
///
/// The wire page index is 0-based and the page size is fixed. Unset
/// filter fields (blank text, zero age bounds, unspecified enums) are
/// omitted entirely rather than sent as empty or zero values.
pub fn listing_params(filter: &Filter, page: u32) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("pagina", page.saturating_sub(1).to_string()),
        ("porPagina", PAGE_SIZE.to_string()),
    ];

    let name = filter.search_text.trim();
    if !name.is_empty() {
        params.push(("nome", name.to_string()));
    }
    if filter.min_age > 0 {
        params.push(("faixaIdadeInicial", filter.min_age.to_string()));
    }
    if filter.max_age > 0 {
        params.push(("faixaIdadeFinal", filter.max_age.to_string()));
    }
    if let Some(sex) = filter.sex.as_wire() {
        params.push(("sexo", sex.to_string()));
    }
    if let Some(status) = filter.status.as_wire() {
        params.push(("status", status.to_string()));
    }

    params
}
