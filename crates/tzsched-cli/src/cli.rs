use clap::{Parser, Subcommand};

/// Timezone-aware weekly schedule compiler
#[derive(Parser, Debug)]
#[command(name = "tzsched")]
#[command(about = "Timezone-aware weekly schedule compiler")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose (debug) logging
    #[arg(long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compile a weekly schedule into UTC regimes
    Compile(CompileArgs),
    /// Show the publish/retract batch for a weekly schedule
    Plan(PlanArgs),
    /// Convert published regimes back to local time
    Localize(LocalizeArgs),
    /// Explain the DST rule derived for a timezone
    Explain(ExplainArgs),
}

#[derive(clap::Args, Debug)]
pub struct CompileArgs {
    /// Schedule file (JSON, use - for stdin)
    pub schedule: String,

    /// IANA timezone, overrides the schedule file
    #[arg(short, long)]
    pub tz: Option<String>,

    /// Year whose DST rule applies, overrides the schedule file
    #[arg(short, long)]
    pub year: Option<i32>,

    /// Output format: json, text
    #[arg(long, default_value = "json")]
    pub output_format: String,
}

#[derive(clap::Args, Debug)]
pub struct PlanArgs {
    /// Schedule file (JSON, use - for stdin)
    pub schedule: String,

    /// IANA timezone, overrides the schedule file
    #[arg(short, long)]
    pub tz: Option<String>,

    /// Year whose DST rule applies, overrides the schedule file
    #[arg(short, long)]
    pub year: Option<i32>,

    /// Months currently published (e.g. 01,06)
    #[arg(long, value_delimiter = ',')]
    pub known: Vec<String>,

    /// Output format: json, text
    #[arg(long, default_value = "json")]
    pub output_format: String,
}

#[derive(clap::Args, Debug)]
pub struct LocalizeArgs {
    /// Published regimes file (JSON array, use - for stdin)
    pub published: String,

    /// IANA timezone
    #[arg(short, long)]
    pub tz: String,

    /// Instant deciding whether DST is active (RFC3339, default: now)
    #[arg(long)]
    pub at: Option<String>,

    /// Output format: json, text
    #[arg(long, default_value = "text")]
    pub output_format: String,
}

#[derive(clap::Args, Debug)]
pub struct ExplainArgs {
    /// IANA timezone
    #[arg(short, long)]
    pub tz: String,

    /// Year whose DST rule applies (default: current year)
    #[arg(short, long)]
    pub year: Option<i32>,

    /// Output format: json, text
    #[arg(long, default_value = "text")]
    pub output_format: String,
}
