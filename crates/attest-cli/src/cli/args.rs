use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "attest",
    version,
    about = "Compliance evidence intake and AI validation"
)]
pub struct Cli {
    /// SQLite database holding evidence items and validation results
    #[arg(long, global = true, env = "ATTEST_DB", default_value = "attest.db")]
    pub db: PathBuf,

    /// Directory where uploaded evidence files are stored
    #[arg(long, global = true, env = "ATTEST_DATA_DIR", default_value = ".attest/objects")]
    pub data_dir: PathBuf,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    Upload(UploadArgs),
    Validate(ValidateArgs),
    List(ListArgs),
    Show(ShowArgs),
    Delete(DeleteArgs),
    Health(HealthArgs),
}

#[derive(clap::Args, Debug, Clone)]
pub struct UploadArgs {
    /// File to ingest as evidence
    pub file: PathBuf,

    /// Declared MIME type (guessed from the extension when omitted)
    #[arg(long)]
    pub content_type: Option<String>,

    /// Principal the evidence belongs to
    #[arg(long, default_value = "anonymous")]
    pub uploaded_by: String,
}

#[derive(clap::Args, Debug, Clone)]
pub struct ValidateArgs {
    /// Evidence item id
    pub id: String,

    /// Restrict the run to items owned by this principal
    #[arg(long)]
    pub principal: Option<String>,

    #[arg(long, default_value = "text")]
    pub format: String, // text|json
}

#[derive(clap::Args, Debug, Clone)]
pub struct ListArgs {
    /// Filter by status (pending|validating|validated|failed)
    #[arg(long)]
    pub status: Option<String>,

    #[arg(long)]
    pub principal: Option<String>,

    #[arg(long, default_value = "50")]
    pub limit: u32,

    #[arg(long, default_value = "0")]
    pub offset: u32,

    #[arg(long, default_value = "text")]
    pub format: String,
}

#[derive(clap::Args, Debug, Clone)]
pub struct ShowArgs {
    pub id: String,

    #[arg(long)]
    pub principal: Option<String>,

    #[arg(long, default_value = "text")]
    pub format: String,
}

#[derive(clap::Args, Debug, Clone)]
pub struct DeleteArgs {
    pub id: String,

    #[arg(long)]
    pub principal: Option<String>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct HealthArgs {
    #[arg(long, default_value = "text")]
    pub format: String,
}
