use chrono::NaiveDate;
use std::env;
use std::path::Path;
use weatherscrape::WeatherScraper;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    configure_polars_display();
    let api_key = env::var("WEATHERSCRAPE_API_KEY")?;

    let scraper = WeatherScraper::builder().api_key(api_key).build().await?;

    let report = scraper
        .scrape_to_csv()
        .station("KILCHICA679")
        .start(NaiveDate::from_ymd_opt(2020, 12, 31).unwrap())
        .end(NaiveDate::from_ymd_opt(2021, 1, 1).unwrap())
        .interval("5min".parse()?)
        .output(Path::new("weather_data.csv"))
        .call()
        .await?;

    println!("{}", report.dataset.to_dataframe()?);
    for failure in &report.failures {
        println!("Missing {}", failure);
    }

    Ok(())
}

fn configure_polars_display() {
    // show every column
    env::set_var("POLARS_FMT_MAX_COLS", "-1");
    // show 20 rows
    env::set_var("POLARS_FMT_MAX_ROWS", "20");
}
