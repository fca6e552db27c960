use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use triage_trace::{
    Graph, LayoutConfig, StyledGraph, TraceCompiler, classify_trace, extract_records,
    reasoning_trace, to_dot, validate,
};

#[derive(Parser, Debug)]
#[command(name = "triage-cli")]
#[command(about = "Compile triage reasoning traces into renderable graphs")]
struct Cli {
    /// Log compiler decisions to stderr (overridden by RUST_LOG).
    #[arg(long, short, global = true, action = ArgAction::SetTrue)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Compile(CompileArgs),
    Check(CheckArgs),
    Classify(ClassifyArgs),
}

#[derive(clap::Args, Debug)]
struct TraceInput {
    #[arg(long)]
    trace_file: Option<PathBuf>,
    /// Traces open with `---`, so hyphen-leading values are accepted.
    #[arg(long, allow_hyphen_values = true)]
    trace_source: Option<String>,
    /// Diagnosis response JSON; the trace is read from deterministic.razonamiento.
    #[arg(long)]
    response_file: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
struct CompileArgs {
    #[command(flatten)]
    input: TraceInput,
    #[arg(long)]
    layout_file: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,
    #[arg(long, action = ArgAction::SetTrue)]
    styled: bool,
    #[arg(long, action = ArgAction::SetTrue)]
    pretty: bool,
}

#[derive(clap::Args, Debug)]
struct CheckArgs {
    #[command(flatten)]
    input: TraceInput,
    #[arg(long)]
    layout_file: Option<PathBuf>,
    #[arg(long, action = ArgAction::SetTrue)]
    json: bool,
}

#[derive(clap::Args, Debug)]
struct ClassifyArgs {
    #[command(flatten)]
    input: TraceInput,
    #[arg(long, action = ArgAction::SetTrue)]
    all_lines: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Json,
    Dot,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Compile(args) => compile_command(args),
        Commands::Check(args) => check_command(args),
        Commands::Classify(args) => classify_command(args),
    };

    match result {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::from(1)
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn compile_command(args: CompileArgs) -> Result<ExitCode, String> {
    let layout = load_layout(args.layout_file.as_deref())?;
    let trace = load_trace(&args.input)?;
    let compiler = TraceCompiler::new(layout);
    let graph = compiler.compile_optional(trace.as_deref());

    let output = match args.format {
        OutputFormat::Dot => to_dot(&graph, compiler.layout()),
        OutputFormat::Json if args.styled => {
            to_json(&StyledGraph::new(&graph, compiler.layout()), args.pretty)?
        }
        OutputFormat::Json => to_json(&graph, args.pretty)?,
    };
    println!("{output}");
    Ok(ExitCode::SUCCESS)
}

fn check_command(args: CheckArgs) -> Result<ExitCode, String> {
    let layout = load_layout(args.layout_file.as_deref())?;
    let trace = load_trace(&args.input)?;
    let graph = TraceCompiler::new(layout).compile_optional(trace.as_deref());
    let diagnostics = validate(&graph, &[]);

    if args.json {
        println!("{}", to_json(&diagnostics, false)?);
    } else {
        print_graph_summary(&graph);
        for diagnostic in &diagnostics {
            println!("{diagnostic}");
        }
    }

    if diagnostics.iter().any(|d| d.is_error()) {
        Ok(ExitCode::from(2))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn classify_command(args: ClassifyArgs) -> Result<ExitCode, String> {
    let trace = load_trace(&args.input)?.unwrap_or_default();
    let classified = classify_trace(&trace);

    println!(
        "dialect: {}{}",
        classified.dialect,
        if classified.dialect_detected { "" } else { " (default)" }
    );
    for line in &classified.lines {
        if line.is_untagged() && !args.all_lines {
            continue;
        }
        let tags: Vec<_> = line.tags.iter().map(|tag| tag.as_str()).collect();
        let tags = if tags.is_empty() { "-".to_string() } else { tags.join(",") };
        println!("{:>4} [{tags}] {}", line.line.index, line.line.text);
    }

    println!("records:");
    for record in extract_records(&classified).records() {
        println!("  {}", to_json(&record, false)?);
    }
    Ok(ExitCode::SUCCESS)
}

fn load_layout(path: Option<&Path>) -> Result<LayoutConfig, String> {
    match path {
        Some(path) => LayoutConfig::load_from_path(path)
            .map_err(|e| format!("failed loading layout '{}': {e}", path.display())),
        None => Ok(LayoutConfig::default()),
    }
}

/// `Ok(None)` means the response carried no usable trace.
fn load_trace(input: &TraceInput) -> Result<Option<String>, String> {
    match (
        input.trace_file.as_deref(),
        input.trace_source.as_deref(),
        input.response_file.as_deref(),
    ) {
        (Some(path), None, None) => std::fs::read(path)
            .map(|bytes| Some(String::from_utf8_lossy(&bytes).into_owned()))
            .map_err(|e| format!("failed reading trace file '{}': {e}", path.display())),
        (None, Some(source), None) => Ok(Some(source.to_string())),
        (None, None, Some(path)) => {
            let raw = std::fs::read_to_string(path)
                .map_err(|e| format!("failed reading response file '{}': {e}", path.display()))?;
            let response: serde_json::Value = serde_json::from_str(&raw)
                .map_err(|e| format!("response file '{}' is not JSON: {e}", path.display()))?;
            let trace = reasoning_trace(&response).map(ToString::to_string);
            if trace.is_none() {
                tracing::warn!(path = %path.display(), "response carries no reasoning trace");
            }
            Ok(trace)
        }
        (None, None, None) => Err(
            "one of --trace-file, --trace-source or --response-file is required".to_string(),
        ),
        _ => Err("provide only one of --trace-file, --trace-source or --response-file".to_string()),
    }
}

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String, String> {
    let result = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    result.map_err(|e| e.to_string())
}

fn print_graph_summary(graph: &Graph) {
    println!("nodes: {}", graph.nodes.len());
    println!("edges: {}", graph.edges.len());
    for node in &graph.nodes {
        println!(
            "  {} ({}) at {},{}",
            node.id,
            node.kind.as_str(),
            node.position.x,
            node.position.y
        );
    }
}
