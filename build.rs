use anyhow::Result;
use vergen::EmitBuilder;

// Embeds the git SHA and commit date logged by `aplog-analyzer --debug`.
fn main() -> Result<()> {
    EmitBuilder::builder()
        .git_sha(true)
        .git_commit_date()
        .emit()?;
    Ok(())
}
