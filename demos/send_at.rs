use std::io;
use std::time::Duration;

use esendex_dispatch::{AccountReference, Credentials, EsendexClient, OutboundMessage};
use tracing_subscriber::EnvFilter;

fn required_env(name: &str) -> Result<String, io::Error> {
    std::env::var(name).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{name} environment variable is required"),
        )
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let username = required_env("ESENDEX_USERNAME")?;
    let password = required_env("ESENDEX_PASSWORD")?;
    let reference = required_env("ESENDEX_ACCOUNT_REFERENCE")?;
    let phone = required_env("ESENDEX_PHONE")?;
    let delay_minutes = std::env::var("ESENDEX_DELAY_MINUTES")
        .ok()
        .and_then(|value| value.parse::<i64>().ok())
        .unwrap_or(10);

    let client = EsendexClient::builder(Credentials::new(username, password)?)
        .timeout(Duration::from_secs(30))
        .user_agent("esendex-dispatch-demo")
        .build()?;
    let account = client.account(AccountReference::new(reference)?);

    let send_at = chrono::Utc::now() + chrono::Duration::minutes(delay_minutes);
    let result = account
        .send_at(
            send_at,
            vec![OutboundMessage::new(phone, "Scheduled hello from esendex-dispatch.")],
        )
        .await?;

    println!("batch {} scheduled for {send_at}", result.batch_id);

    Ok(())
}
