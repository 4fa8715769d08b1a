//! Terminal shell for the Abitus missing-persons directory.
//!
//! Wires configuration, logging, the HTTP gateway, and the controllers
//! together and drives every exposed surface through a line-oriented
//! command loop: filtered/paginated listing, record detail, summary
//! counters, and the tip-submission dialog. Presentation is
//! deliberately plain; this binary exists to exercise the core.

use std::io::Write as _;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use abitus_controller::tip_dialog::AUTO_CLOSE_DELAY;
use abitus_controller::{
    DialogState, ListingController, ListingPhase, ListingView, StatisticsCache, StatisticsView,
    TipDialog,
};
use abitus_core::filter::{SexFilter, StatusFilter};
use abitus_core::person::PersonDetail;
use abitus_core::tip::TipPhoto;
use abitus_core::types::DbId;
use abitus_gateway::AbitusApi;

mod config;

use config::AppConfig;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "abitus=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = AppConfig::from_env();
    tracing::info!(api_base_url = %config.api_base_url, "Loaded configuration");

    // --- Gateway and controllers ---
    let api = Arc::new(AbitusApi::with_timeout(
        config.api_base_url.clone(),
        Duration::from_secs(config.request_timeout_secs),
    ));
    let mut listing = ListingController::new(api.clone());
    let mut statistics = StatisticsCache::new(api.clone());
    let mut dialog = TipDialog::new(api.clone());

    println!("Pessoas Desaparecidas — consulta ao acervo Abitus");
    render_statistics(statistics.get().await);
    listing.settle().await;
    render_listing(&listing.view());
    print_help();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush().ok();

        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            _ => break,
        };
        let mut words = line.split_whitespace();
        let command = match words.next() {
            Some(command) => command,
            None => continue,
        };
        let rest: Vec<&str> = words.collect();

        match command {
            "list" => {
                listing.settle().await;
                render_listing(&listing.view());
            }
            "search" => {
                listing.set_search_text(rest.join(" "));
                listing.settle().await;
                render_listing(&listing.view());
            }
            "age" => match parse_age_range(&rest) {
                Some((min, max)) => {
                    listing.set_age_range(min, max);
                    listing.settle().await;
                    render_listing(&listing.view());
                }
                None => println!("uso: age <min> <max>  (0 = sem limite)"),
            },
            "sex" => match rest.first().copied() {
                Some("m") => apply_sex(&mut listing, SexFilter::Male).await,
                Some("f") => apply_sex(&mut listing, SexFilter::Female).await,
                Some("-") => apply_sex(&mut listing, SexFilter::Unspecified).await,
                _ => println!("uso: sex <m|f|->"),
            },
            "status" => match rest.first().copied() {
                Some("missing") => apply_status(&mut listing, StatusFilter::Missing).await,
                Some("located") => apply_status(&mut listing, StatusFilter::Located).await,
                Some("-") => apply_status(&mut listing, StatusFilter::Unspecified).await,
                _ => println!("uso: status <missing|located|->"),
            },
            "page" => match rest.first().and_then(|raw| raw.parse().ok()) {
                Some(page) => {
                    listing.set_page(page);
                    listing.settle().await;
                    render_listing(&listing.view());
                }
                None => println!("uso: page <n>"),
            },
            "next" => {
                let view = listing.view();
                if view.is_stale_data {
                    // Racing ahead of an in-flight fetch skips pages.
                    println!("aguarde a página atual carregar");
                } else {
                    listing.next_page();
                    listing.settle().await;
                    render_listing(&listing.view());
                }
            }
            "prev" => {
                listing.prev_page();
                listing.settle().await;
                render_listing(&listing.view());
            }
            "clear" => {
                listing.clear_filters();
                listing.settle().await;
                render_listing(&listing.view());
            }
            "retry" => {
                listing.retry();
                listing.settle().await;
                render_listing(&listing.view());
            }
            "detail" => match rest.first().and_then(|raw| raw.parse::<DbId>().ok()) {
                Some(id) => match api.get_by_id(id).await {
                    Ok(detail) => render_detail(&detail),
                    Err(error) => println!("{error}"),
                },
                None => println!("uso: detail <id>"),
            },
            "stats" => render_statistics(statistics.get().await),
            "tip" => match rest.first().and_then(|raw| raw.parse::<DbId>().ok()) {
                Some(id) => run_tip_flow(&api, &mut dialog, &mut lines, id).await,
                None => println!("uso: tip <id>"),
            },
            "help" => print_help(),
            "quit" | "exit" => break,
            other => println!("comando desconhecido: {other} (help lista os comandos)"),
        }
    }
}

// ---------------------------------------------------------------------------
// Tip flow
// ---------------------------------------------------------------------------

/// Fetch the record's detail, open the dialog with its occurrence id,
/// collect the fields, and submit once.
async fn run_tip_flow(
    api: &AbitusApi,
    dialog: &mut TipDialog,
    lines: &mut Lines<BufReader<Stdin>>,
    id: DbId,
) {
    let detail = match api.get_by_id(id).await {
        Ok(detail) => detail,
        Err(error) => {
            println!("{error}");
            return;
        }
    };

    println!(
        "Enviar informações sobre {} (vazio cancela)",
        detail.summary.display_name
    );
    dialog.open_for_case(detail.occurrence_id);

    let location = match prompt(lines, "Local avistado: ").await {
        Some(location) if !location.trim().is_empty() => location,
        _ => {
            dialog.cancel();
            println!("envio cancelado");
            return;
        }
    };
    dialog.set_location(location);

    if let Some(notes) = prompt(lines, "Informações: ").await {
        dialog.set_notes(notes);
    }

    while let Some(path) = prompt(lines, "Foto (caminho, vazio para enviar): ").await {
        let path = path.trim().to_string();
        if path.is_empty() {
            break;
        }
        match tokio::fs::read(&path).await {
            Ok(bytes) => {
                let file_name = std::path::Path::new(&path)
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "foto.jpg".into());
                dialog.add_photo(TipPhoto { file_name, bytes });
            }
            Err(error) => println!("não foi possível ler {path}: {error}"),
        }
    }

    dialog.submit().await;
    match dialog.state().clone() {
        DialogState::Succeeded { .. } => {
            println!("Informações enviadas. Obrigado por ajudar.");
            tokio::time::sleep(AUTO_CLOSE_DELAY).await;
            dialog.tick();
        }
        DialogState::Failed { message } => {
            println!("{message}");
            dialog.cancel();
        }
        _ => {}
    }
}

async fn prompt(lines: &mut Lines<BufReader<Stdin>>, label: &str) -> Option<String> {
    print!("{label}");
    std::io::stdout().flush().ok();
    lines.next_line().await.ok().flatten()
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

async fn apply_sex(listing: &mut ListingController, sex: SexFilter) {
    listing.set_sex(sex);
    listing.settle().await;
    render_listing(&listing.view());
}

async fn apply_status(listing: &mut ListingController, status: StatusFilter) {
    listing.set_status(status);
    listing.settle().await;
    render_listing(&listing.view());
}

fn parse_age_range(rest: &[&str]) -> Option<(u32, u32)> {
    match rest {
        [min, max] => Some((min.parse().ok()?, max.parse().ok()?)),
        _ => None,
    }
}

fn render_listing(view: &ListingView) {
    match &view.phase {
        ListingPhase::Failed(message) => println!("{message}"),
        _ if view.items.is_empty() => println!("Nenhum resultado encontrado."),
        _ => {
            for person in &view.items {
                let age = person
                    .age
                    .map(|age| format!("{age} anos"))
                    .unwrap_or_else(|| "idade não informada".into());
                println!(
                    "  [{}] {} — {} — {}",
                    person.id,
                    person.display_name,
                    age,
                    person.location_status.label()
                );
            }
            println!(
                "Página {} de {} ({} registros){}",
                view.page,
                view.total_pages.max(1),
                view.total_elements,
                if view.is_stale_data {
                    " — atualizando…"
                } else {
                    ""
                }
            );
        }
    }
}

fn render_detail(detail: &PersonDetail) {
    let summary = &detail.summary;
    println!("{} — {}", summary.display_name, summary.location_status.label());
    if let Some(age) = summary.age {
        println!("  Idade: {age} anos");
    }
    if let Some(date) = detail.disappearance_date {
        println!("  Desaparecimento: {}", date.format("%d/%m/%Y %H:%M"));
    }
    if let Some(location) = &detail.location_description {
        println!("  Local: {location}");
    }
    if let Some(clothing) = &detail.clothing_description {
        println!("  Vestimentas: {clothing}");
    }
    if let Some(info) = &detail.info {
        println!("  Informações: {info}");
    }
    for poster in &detail.posters {
        println!("  Cartaz: {}", poster.url);
    }
    println!("  Foto: {}", summary.photo_url);
}

fn render_statistics(view: StatisticsView) {
    match view {
        StatisticsView::Ready(statistics) => println!(
            "Desaparecidas: {} | Localizadas: {}",
            statistics.missing_count, statistics.located_count
        ),
        StatisticsView::Pending => println!("Desaparecidas: — | Localizadas: — (carregando)"),
    }
}

fn print_help() {
    println!("comandos:");
    println!("  search <nome>          busca por nome (aplicada após pausa na digitação)");
    println!("  age <min> <max>        faixa etária (0 = sem limite)");
    println!("  sex <m|f|->            filtro por sexo");
    println!("  status <missing|located|->  filtro por situação");
    println!("  page <n> | next | prev navegação");
    println!("  list | clear | stats   listagem, limpar filtros, contadores");
    println!("  retry                  tentar novamente após uma falha");
    println!("  detail <id>            detalhes de um registro");
    println!("  tip <id>               enviar informações sobre um registro");
    println!("  quit                   sair");
}
