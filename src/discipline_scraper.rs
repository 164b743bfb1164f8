use crate::{
    dropdown::extract_dropdown_options,
    models::{Discipline, Term},
    scrape_error::ScrapeError,
    scraping_context::ScrapingContext,
    term_scraper::TERM_FIELD,
};

/// `name` of the discipline `<select>` and of the matching form field.
pub const DISCIPLINE_FIELD: &str = "disc_in";

/// Lists the disciplines offered in `term`.
pub async fn fetch_disciplines(
    ctx: &ScrapingContext,
    term: &Term,
) -> Result<Vec<Discipline>, ScrapeError> {
    let config = &ctx.scraping_config;
    let url = config.url_for(&config.disciplines_path);
    let html = ctx
        .request_client
        .post_form_body(&url, &[(TERM_FIELD, term.value.as_str())])
        .await?;
    Ok(parse_disciplines(&html))
}

pub fn parse_disciplines(html: &str) -> Vec<Discipline> {
    extract_dropdown_options(html, DISCIPLINE_FIELD)
        .into_iter()
        .map(Discipline::from)
        .collect()
}
