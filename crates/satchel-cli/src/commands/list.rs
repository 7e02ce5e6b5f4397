use anyhow::Result;
use std::path::Path;

use satchel_core::types::RecipientId;

pub async fn run(base_dir: &Path, recipient: Option<&str>, manifests: bool) -> Result<()> {
    let client = super::open_client(base_dir)?;

    if manifests {
        let recipients = client.list_manifest_recipients().await?;
        println!("Found {} manifest(s)", recipients.len());
        for recipient in recipients {
            println!("  {recipient}");
        }
        return Ok(());
    }

    let recipient = recipient.map(|r| r.parse::<RecipientId>()).transpose()?;
    let names = client.list_all(recipient.as_ref()).await?;
    println!("Found {} record(s)", names.len());
    for name in names {
        println!("  {name}");
    }
    Ok(())
}
