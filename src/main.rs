use banner_scraper::{RunOutcome, ScrapingContext, run};
use dotenv::dotenv;

extern crate env_logger;
extern crate log;

use log::LevelFilter;

use log::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    let ctx = ScrapingContext::new()?;
    info!(
        "Scraping {} into {}",
        ctx.scraping_config.base_url,
        ctx.scraping_config.output_path().display()
    );

    match run(&ctx).await {
        Ok(RunOutcome::NoTerms) => info!("Nothing to do: the portal listed no terms."),
        Ok(RunOutcome::NoData) => info!("Nothing written: no term had any classes."),
        Ok(RunOutcome::Written {
            path,
            sheets,
            rows,
            ..
        }) => info!("Wrote {rows} rows across {sheets} sheets to {}", path.display()),
        Err(e) => {
            error!("Failed to write results: {e}");
            return Err(e.into());
        }
    }
    Ok(())
}
