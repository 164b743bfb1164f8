use crate::{
    dropdown::extract_dropdown_options, models::Term, scrape_error::ScrapeError,
    scraping_context::ScrapingContext,
};

/// `name` of the term `<select>` and of the form field carrying a term.
pub const TERM_FIELD: &str = "term_in";

/// Lists the terms offered on the portal's landing page.
pub async fn fetch_terms(ctx: &ScrapingContext) -> Result<Vec<Term>, ScrapeError> {
    let config = &ctx.scraping_config;
    let url = config.url_for(&config.start_path);
    let html = ctx.request_client.fetch_url_body(&url).await?;
    Ok(parse_terms(&html))
}

pub fn parse_terms(html: &str) -> Vec<Term> {
    extract_dropdown_options(html, TERM_FIELD)
        .into_iter()
        .map(Term::from)
        .collect()
}
