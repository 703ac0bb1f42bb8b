//! Command line configuration and logging setup.

use crate::{louvain::Louvain, synthetic::SyntheticConfig};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "email-communities",
    version,
    about = "Components, Louvain communities and cliques of an email graph",
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub analyze: AnalyzeArgs,

    #[command(flatten)]
    pub logging: LoggingConfig,
}

impl Cli {
    /// The subcommand to run; analysis when none is given.
    pub fn into_command(self) -> Command {
        self.command.unwrap_or(Command::Analyze(self.analyze))
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load the email graph and run every analysis (default).
    Analyze(AnalyzeArgs),
    /// Write a synthetic email graph with planted departments.
    Generate(GenerateArgs),
}

#[derive(Debug, Clone, Args)]
pub struct AnalyzeArgs {
    /// Vertex table with `id,dept` columns.
    #[arg(long, env = "EMAIL_VERTICES", default_value = "email_vertices.csv")]
    pub vertices: PathBuf,

    /// Edge table with `from,to` columns.
    #[arg(long, env = "EMAIL_EDGES", default_value = "email_edgelist.csv")]
    pub edges: PathBuf,

    /// Directory for DOT files, images and CSV tables.
    #[arg(long, env = "EMAIL_OUT_DIR", default_value = ".")]
    pub out_dir: PathBuf,

    /// Seed for Louvain node order and the layouts.
    #[arg(long, default_value_t = 123)]
    pub seed: u64,

    /// Louvain resolution.
    #[arg(long, default_value_t = 1.0)]
    pub resolution: f64,

    /// Render the DOT files to PNG with Graphviz.
    #[arg(long)]
    pub render: bool,

    /// Open rendered images (implies --render).
    #[arg(long)]
    pub open: bool,
}

impl AnalyzeArgs {
    pub fn louvain(&self) -> Louvain {
        Louvain::new()
            .with_seed(self.seed)
            .with_resolution(self.resolution)
    }

    pub fn render(&self) -> bool {
        self.render || self.open
    }
}

#[derive(Debug, Clone, Args)]
pub struct GenerateArgs {
    #[arg(long, default_value_t = 200)]
    pub nodes: u32,

    #[arg(long, default_value_t = 1500)]
    pub emails: usize,

    #[arg(long, default_value_t = 8, value_parser = clap::value_parser!(u8).range(1..=42))]
    pub departments: u8,

    /// Share of emails sent across departments.
    #[arg(long, default_value_t = 0.1)]
    pub mixing: f64,

    #[arg(long, default_value_t = 123)]
    pub seed: u64,

    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,
}

impl From<&GenerateArgs> for SyntheticConfig {
    fn from(args: &GenerateArgs) -> Self {
        SyntheticConfig {
            nodes: args.nodes,
            emails: args.emails,
            departments: args.departments,
            mixing: args.mixing,
            seed: args.seed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Args)]
pub struct LoggingConfig {
    /// Log level used when RUST_LOG is not set.
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,
}

impl LoggingConfig {
    pub fn get_log_env(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.log_level))
    }

    /// Installs the global fmt subscriber, writing to stderr.
    pub fn init(&self) {
        tracing_subscriber::fmt()
            .with_env_filter(self.get_log_env())
            .with_writer(std::io::stderr)
            .init();
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analyze_is_the_default() {
        let cli = Cli::try_parse_from(["email-communities", "--seed", "7", "--render"]).unwrap();
        match cli.into_command() {
            Command::Analyze(args) => {
                assert_eq!(args.seed, 7);
                assert!(args.render());
                assert_eq!(args.vertices, PathBuf::from("email_vertices.csv"));
            }
            Command::Generate(_) => panic!("expected analyze"),
        }
    }

    #[test]
    fn generate_parses_its_options() {
        let cli = Cli::try_parse_from([
            "email-communities",
            "generate",
            "--nodes",
            "50",
            "--departments",
            "3",
        ])
        .unwrap();
        let Command::Generate(args) = cli.into_command() else {
            panic!("expected generate");
        };
        let config = SyntheticConfig::from(&args);
        assert_eq!(config.nodes, 50);
        assert_eq!(config.departments, 3);
    }

    #[test]
    fn departments_above_42_are_rejected() {
        let parsed = Cli::try_parse_from(["email-communities", "generate", "--departments", "43"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn resolution_reaches_louvain() {
        use crate::{graph::{EmailGraph, Employee}, modularity::modularity};

        let cli = Cli::try_parse_from(["email-communities", "--resolution", "3.0"]).unwrap();
        let Command::Analyze(args) = cli.into_command() else {
            panic!("expected analyze");
        };
        assert_eq!(args.resolution, 3.0);

        let g = EmailGraph::from_parts([Employee::new(1, 1), Employee::new(2, 2)], [(1, 2)])
            .unwrap();
        let communities = args.louvain().detect(&g).unwrap();
        // at resolution 3 the edge is not worth merging
        assert_eq!(communities.len(), 2);
        assert_eq!(communities.modularity(), modularity(&g, communities.partition()));
    }

    #[test]
    fn open_implies_render() {
        let cli = Cli::try_parse_from(["email-communities", "--open"]).unwrap();
        assert!(cli.analyze.render());
        assert_eq!(cli.logging, LoggingConfig::default());
    }
}
