use anyhow::Result;
use eln2smw::{adapt, config::Config, MessageType};

/// Adapt one record from the command line and print the JSON response
pub async fn adapt_once(config: Config, eln: String, id: String) -> Result<()> {
    let response = adapt(&config, &eln, &id).await?;

    println!("{}", serde_json::to_string_pretty(&response)?);

    let errors = response
        .messages
        .iter()
        .filter(|m| m.kind == MessageType::Error)
        .count();
    if errors > 0 {
        anyhow::bail!("{} error(s) while adapting {} record {}", errors, eln, id);
    }
    Ok(())
}
