use clap::Parser;

#[derive(Parser)]
#[command(name = "lingo")]
#[command(about = "A layered translation dispatcher with multi-tier caching.")]
#[command(version)]
pub struct Cli {
    /// Source language code, or "auto" to detect
    #[arg(short = 'f', long = "from", default_value = "auto")]
    pub from: String,

    /// Target language code
    #[arg(short = 't', long = "to")]
    pub to: Option<String>,

    /// Use local models only, never call networked backends
    #[arg(long)]
    pub offline: bool,

    /// Don't use cached result
    #[arg(short = 'n', long)]
    pub nocache: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Show dispatcher and cache status
    #[arg(long)]
    pub status: bool,

    /// Show recent translation history
    #[arg(long)]
    pub history: bool,

    /// Clear cached translations
    #[arg(long)]
    pub clear_cache: bool,

    /// Preload common local models
    #[arg(long)]
    pub preload: bool,

    /// Generate config sample
    #[arg(long)]
    pub generate_config: bool,

    /// Text to translate
    #[arg(num_args = 1..)]
    pub text: Vec<String>,
}
