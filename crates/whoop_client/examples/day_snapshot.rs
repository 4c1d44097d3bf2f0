use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use whoop_client::{WhoopClient, config::Config, get_day_data, http_client::ReqwestWhoopClient};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Example: expects WHOOP_ACCESS_TOKEN (or a tokens.json) and an optional YYYY-MM-DD argument
    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("config error: {}", e);
            return Ok(());
        }
    };
    let date = match std::env::args().nth(1) {
        Some(s) => NaiveDate::parse_from_str(&s, "%Y-%m-%d")?,
        None => Utc::now().date_naive(),
    };
    let client: Arc<dyn WhoopClient> = Arc::new(ReqwestWhoopClient::from_config(&cfg)?);
    let day = get_day_data(client, date).await?;
    match (&day.cycle, &day.recovery) {
        (None, _) => println!("{date}: no cycle yet"),
        (Some(c), r) => println!(
            "{date}: cycle {} | recovery {} | {} sleeps | {} workouts",
            c.id,
            r.as_ref()
                .and_then(|r| r.scored())
                .map(|s| format!("{:.0}%", s.recovery_score))
                .unwrap_or_else(|| "pending".into()),
            day.sleeps.len(),
            day.workouts.len()
        ),
    }
    Ok(())
}
