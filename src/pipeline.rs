use std::path::PathBuf;

use log::{error, info, warn};

use crate::{
    aggregator::aggregate_term,
    discipline_scraper::fetch_disciplines,
    json_export::write_json,
    models::{IdCounter, TermTable},
    schedule_scraper::fetch_schedule,
    scrape_error::{ExportError, ScrapeError},
    scraping_context::ScrapingContext,
    spreadsheet_writer::{plan_sheets, write_workbook},
    term_scraper::fetch_terms,
};

/// What a scrape produced before anything is written to disk.
#[derive(Debug)]
pub enum ScrapeOutcome {
    NoTerms,
    Collected {
        term_tables: Vec<TermTable>,
        /// Where the id counter stopped; one past the last id handed out.
        next_id: u64,
    },
}

#[derive(Debug, PartialEq)]
pub enum RunOutcome {
    /// The portal offered no terms; nothing was written.
    NoTerms,
    /// Terms were found but none had any schedule rows; nothing was written.
    NoData,
    Written {
        path: PathBuf,
        json_path: Option<PathBuf>,
        sheets: usize,
        rows: usize,
        next_id: u64,
    },
}

/// Walks every term and discipline in order and collects their schedules.
///
/// Failures at any level are logged and count as "no data" for that term or
/// discipline; the walk always carries on with the next one.
pub async fn scrape_all(ctx: &ScrapingContext) -> ScrapeOutcome {
    let terms = match fetch_terms(ctx).await {
        Ok(terms) => terms,
        Err(e) => {
            report("Failed to fetch terms", &e);
            vec![]
        }
    };
    if terms.is_empty() {
        warn!("No terms available to process.");
        return ScrapeOutcome::NoTerms;
    }

    let mut ids = IdCounter::new();
    let mut term_tables = Vec::new();

    for term in &terms {
        info!("Processing term: {} ({})", term.label, term.value);
        let disciplines = match fetch_disciplines(ctx, term).await {
            Ok(disciplines) => disciplines,
            Err(e) => {
                report(&format!("Failed to fetch disciplines for {}", term.value), &e);
                continue;
            }
        };

        let mut tables = Vec::with_capacity(disciplines.len());
        for discipline in &disciplines {
            info!("Scraping schedule for {} - {}", term.label, discipline.label);
            match fetch_schedule(ctx, term, discipline, &mut ids).await {
                Ok(table) if table.is_empty() => {
                    info!("No classes listed for {} - {}", term.value, discipline.value);
                }
                Ok(table) => {
                    info!(
                        "Collected {} rows for {} - {}",
                        table.len(),
                        term.value,
                        discipline.value
                    );
                    tables.push(table);
                }
                Err(e) => report(
                    &format!("Failed to scrape {} - {}", term.value, discipline.value),
                    &e,
                ),
            }
        }

        match aggregate_term(term, tables) {
            Some(term_table) => term_tables.push(term_table),
            None => info!("No schedule data for term {}", term.value),
        }
    }

    ScrapeOutcome::Collected {
        term_tables,
        next_id: ids.peek(),
    }
}

/// Scrapes everything and writes the workbook (and the JSON dump if one is
/// configured). Only writing can fail.
pub async fn run(ctx: &ScrapingContext) -> Result<RunOutcome, ExportError> {
    let (term_tables, next_id) = match scrape_all(ctx).await {
        ScrapeOutcome::NoTerms => return Ok(RunOutcome::NoTerms),
        ScrapeOutcome::Collected {
            term_tables,
            next_id,
        } => (term_tables, next_id),
    };
    if term_tables.is_empty() {
        warn!("No data collected to write to Excel.");
        return Ok(RunOutcome::NoData);
    }

    let config = &ctx.scraping_config;
    let path = config.output_path();
    write_workbook(&term_tables, &path)?;
    info!("Excel file created: {}", path.display());

    let json_path = config.json_output_path();
    if let Some(json_path) = &json_path {
        write_json(&term_tables, json_path)?;
        info!("JSON file created: {}", json_path.display());
    }

    Ok(RunOutcome::Written {
        path,
        json_path,
        sheets: plan_sheets(&term_tables).len(),
        rows: term_tables.iter().map(|t| t.table.len()).sum(),
        next_id,
    })
}

fn report(context: &str, e: &ScrapeError) {
    match e {
        ScrapeError::HttpStatus { status, .. } => {
            error!("{context}: Status Code {status}");
        }
        ScrapeError::ScheduleTableNotFound { .. } => warn!("{context}: {e}"),
        _ => error!("{context}: {e}"),
    }
}
