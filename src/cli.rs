use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "g988",
    version,
    about = "Managed entity catalog extraction from the pre-parsed G.988 document"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Parse(ParseArgs),
    Status(StatusArgs),
    Names(NamesArgs),
    Augment(AugmentArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ParseArgs {
    /// Pre-parsed document (sections and content blocks) as JSON.
    #[arg(long, default_value = "G.988.PreParse.json")]
    pub input: PathBuf,

    /// Attribute hints (type, default, constraint) applied before type inference.
    #[arg(long)]
    pub hints: Option<PathBuf>,

    #[arg(long, default_value = "G.988.Parsed.json")]
    pub output: PathBuf,

    /// Section holding the managed entity class-id table.
    #[arg(long, default_value = "11.2.4")]
    pub class_id_section: String,

    #[arg(long)]
    pub summary_path: Option<PathBuf>,

    /// Restrict extraction to these class ids.
    #[arg(long = "class-id")]
    pub class_ids: Vec<u16>,
}

#[derive(Args, Debug, Clone)]
pub struct StatusArgs {
    #[arg(long, default_value = "G.988.Parsed.json")]
    pub input: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct NamesArgs {
    #[arg(long, default_value = "G.988.Parsed.json")]
    pub input: PathBuf,

    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct AugmentArgs {
    #[arg(long, default_value = "G.988.Parsed.json")]
    pub input: PathBuf,

    /// Existing hint file; its values take precedence.
    #[arg(long)]
    pub existing: Option<PathBuf>,

    #[arg(long, default_value = "G.988.augment.json")]
    pub output: PathBuf,

    /// Classes to augment. Defaults to the commonly used ONU classes.
    #[arg(long = "class-id")]
    pub class_ids: Vec<u16>,
}
