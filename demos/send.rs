use std::io;

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
    let message = std::env::var("ESENDEX_MESSAGE")
        .unwrap_or_else(|_| "Hello from the esendex-dispatch demo.".to_owned());

    let client = EsendexClient::new(Credentials::new(username, password)?);
    let account = client.account(AccountReference::new(reference)?);

    let result = account
        .send(vec![OutboundMessage {
            message_type: "SMS".to_owned(),
            ..OutboundMessage::new(phone, message)
        }])
        .await?;

    println!("batch: {}", result.batch_id);
    for message in result.messages {
        println!("  {} {}", message.id, message.uri);
    }

    Ok(())
}
