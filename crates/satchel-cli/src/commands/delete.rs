use anyhow::Result;
use std::path::Path;

use satchel_core::types::RecipientId;

pub async fn run(base_dir: &Path, recipient: &str) -> Result<()> {
    let recipient: RecipientId = recipient.parse()?;
    let client = super::open_client(base_dir)?;
    let count = client.delete_all_for(&recipient).await?;
    println!("Deleted {count} record(s) for {recipient}");
    Ok(())
}
