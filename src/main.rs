use clap::Parser;
use email_communities::{
    Analysis, EmailGraph, SyntheticConfig,
    config::{AnalyzeArgs, Cli, Command, GenerateArgs},
    render::{self, Layout},
    report,
};
use std::{fs, io, process::ExitCode};
use tracing::error;

fn main() -> ExitCode {
    let cli = Cli::parse();
    cli.logging.init();

    let result = match cli.into_command() {
        Command::Analyze(args) => analyze(&args),
        Command::Generate(args) => generate(&args),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn analyze(args: &AnalyzeArgs) -> email_communities::Result<()> {
    // 1. Build the graph
    let graph = EmailGraph::from_csv(&args.vertices, &args.edges)?;

    // 2. Run every analysis
    let analysis = Analysis::run(&graph, &args.louvain())?;

    // 3. Print the report
    let mut stdout = io::stdout().lock();
    report::write_report(&mut stdout, &graph, &analysis)?;

    // 4. Save tables and visualizations
    fs::create_dir_all(&args.out_dir)?;
    let out = &args.out_dir;
    report::write_node_table(
        out.join("nodes.csv"),
        &report::node_rows(&graph, analysis.communities.partition()),
    )?;
    report::write_percentage_table(out.join("department_community.csv"), &analysis.matrix)?;

    let spring = Layout::Spring { seed: args.seed };
    let outputs = [
        (
            out.join("louvain.dot"),
            render::layout_dot(&graph, analysis.communities.partition()),
            spring,
        ),
        (
            out.join("departments.dot"),
            render::layout_dot(&graph, analysis.ground_truth.partition()),
            spring,
        ),
        (
            out.join("heatmap.dot"),
            render::heatmap_dot(&analysis.matrix),
            Layout::Table,
        ),
    ];
    for (path, dot, layout) in &outputs {
        render::write_dot(path, dot)?;
        if args.render() {
            let image = render::render_png(path, *layout)?;
            if args.open {
                render::open_image(&image)?;
            }
        }
    }
    println!("\nLayouts and heat map written to {}", out.display());
    Ok(())
}

fn generate(args: &GenerateArgs) -> email_communities::Result<()> {
    fs::create_dir_all(&args.out_dir)?;
    SyntheticConfig::from(args).write_csv(
        args.out_dir.join("email_vertices.csv"),
        args.out_dir.join("email_edgelist.csv"),
    )
}
