use anyhow::Result;
use std::path::Path;

pub async fn run(base_dir: &Path) -> Result<()> {
    let client = super::open_client(base_dir)?;
    let cancelled = client.reconcile_startup().await;
    println!("Cancelled {cancelled} stale operation(s)");
    Ok(())
}
