use anyhow::Result;
use std::path::Path;

use satchel_core::types::RecipientId;

/// Diagnostic round trip: save a test record, verify it, delete it.
pub async fn run(base_dir: &Path, recipient: &str) -> Result<()> {
    let recipient: RecipientId = recipient.parse()?;
    let client = super::open_client(base_dir)?;

    client.check_available().await?;

    let payload = format!("satchel check {}", uuid::Uuid::new_v4());
    let name = client
        .save_test_record(&recipient, payload.as_bytes())
        .await?;
    println!("Saved test record {name}");

    if !client.exists(&name).await? {
        anyhow::bail!("test record missing right after save");
    }
    let downloaded = client.download(&name).await?;
    if downloaded != payload.as_bytes() {
        anyhow::bail!("test record payload mismatch");
    }
    println!("Verified test record payload");

    client.delete(&[name.clone()]).await?;
    println!("Deleted test record {name}");
    println!("Store round trip OK");
    Ok(())
}
