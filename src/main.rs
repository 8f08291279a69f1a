use anyhow::Result;

fn main() -> Result<()> {
    qrsmith::run()?;
    Ok(())
}
