mod aggregator;
mod config;
mod discipline_scraper;
mod dropdown;
mod html_table;
mod json_export;
mod models;
mod pipeline;
mod requests;
mod schedule_scraper;
mod scrape_error;
mod scraping_context;
mod spreadsheet_writer;
mod term_scraper;
mod text_manipulators;

pub use aggregator::aggregate_term;
pub use config::{ENV_PREFIX, LoadFromEnv, ScrapingConfig, fill_date_placeholder};
pub use discipline_scraper::{DISCIPLINE_FIELD, fetch_disciplines, parse_disciplines};
pub use dropdown::extract_dropdown_options;
pub use html_table::{HtmlTable, parse_tables};
pub use json_export::{term_tables_to_json, write_json};
pub use models::{
    Discipline, DropdownOption, ID_COLUMN, IdCounter, ScheduleRow, ScheduleTable, TERM_COLUMN,
    Term, TermTable,
};
pub use pipeline::{RunOutcome, ScrapeOutcome, run, scrape_all};
pub use requests::RequestClient;
pub use schedule_scraper::{
    SCHEDULE_TABLE_INDEX, fetch_schedule, parse_schedule_page, select_schedule_table, tag_rows,
};
pub use scrape_error::{ExportError, ScrapeError};
pub use scraping_context::ScrapingContext;
pub use spreadsheet_writer::{
    MAX_SHEET_NAME_LEN, build_workbook, plan_sheets, sheet_name_for, write_workbook,
};
pub use term_scraper::{TERM_FIELD, fetch_terms, parse_terms};
