use anyhow::Result;
use std::path::Path;

pub async fn run(base_dir: &Path) -> Result<()> {
    let client = super::open_client(base_dir)?;
    client.check_available().await?;
    println!("Record store is available and accepting backups");
    Ok(())
}
