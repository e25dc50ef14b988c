use clap::Parser;
use std::fs;
use std::io::{self, BufRead, Write};
use std::time::Instant;
use stepflow::prelude::{Branch, Command, EditorConfig, NodeKind, WorkflowEditor, WorkflowSnapshot};
use tracing_subscriber::EnvFilter;

/// Apply editing commands to a workflow graph and print the numbered steps
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to a workflow snapshot JSON file; a lone start node is used if omitted
    snapshot_path: Option<String>,
    /// Path to a JSON array of commands to apply in order
    commands_path: Option<String>,

    /// Path to an editor config JSON file (gap, node heights, start node)
    #[arg(short, long)]
    config: Option<String>,

    /// Write the resulting snapshot to this path
    #[arg(short, long)]
    output: Option<String>,

    /// Print the resulting view as JSON instead of the numbered listing
    #[arg(long)]
    json: bool,

    /// Run in interactive mode, reading commands line by line
    #[arg(short = 'i', long, help = "Run in interactive 'human' mode")]
    human: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let mut editor = load_editor(&cli);

    if cli.human {
        run_interactive(&mut editor);
    } else {
        run_script(&mut editor, cli.commands_path.as_deref());
    }

    if cli.json {
        let json = serde_json::to_string_pretty(&editor.view())
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to serialize view: {}", e)));
        println!("{}", json);
    } else {
        print!("{}", editor.view());
    }

    if let Some(output) = cli.output {
        let json = editor
            .snapshot()
            .to_json_pretty()
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to serialize snapshot: {}", e)));
        fs::write(&output, json).unwrap_or_else(|e| {
            exit_with_error(&format!("Failed to write snapshot to '{}': {}", output, e))
        });
        println!("Snapshot written to '{}'", output);
    }
}

fn load_editor(cli: &Cli) -> WorkflowEditor {
    let config = match &cli.config {
        Some(path) => EditorConfig::from_file(path)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to load config '{}': {}", path, e))),
        None => EditorConfig::default(),
    };
    let builder = WorkflowEditor::builder().with_config(config);

    let builder = match &cli.snapshot_path {
        Some(path) => {
            let snapshot = WorkflowSnapshot::from_file(path).unwrap_or_else(|e| {
                exit_with_error(&format!("Failed to load snapshot '{}': {}", path, e))
            });
            builder
                .with_workflow(snapshot)
                .unwrap_or_else(|e| exit_with_error(&format!("Invalid workflow '{}': {}", path, e)))
        }
        None => builder,
    };
    builder
        .build()
        .unwrap_or_else(|e| exit_with_error(&format!("Invalid editor settings: {}", e)))
}

/// Applies every command of a JSON script, stopping at the first rejection.
fn run_script(editor: &mut WorkflowEditor, commands_path: Option<&str>) {
    let Some(path) = commands_path else {
        return;
    };
    let script = fs::read_to_string(path)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to read commands file '{}': {}", path, e)));
    let commands: Vec<Command> = serde_json::from_str(&script)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse commands JSON: {}", e)));

    let start = Instant::now();
    for (i, command) in commands.into_iter().enumerate() {
        let name = command.name();
        editor.dispatch(command).unwrap_or_else(|e| {
            exit_with_error(&format!("Command #{} ({}) was rejected: {}", i + 1, name, e))
        });
    }
    tracing::info!(path, elapsed = ?start.elapsed(), "command script applied");
}

/// Runs the CLI in an interactive, human-friendly mode.
fn run_interactive(editor: &mut WorkflowEditor) {
    println!("--- Stepflow Interactive Mode ---");
    println!("Commands:");
    println!("  add <source> [branch] <kind>      add a step below <source>");
    println!("  split <edge> <kind>               add a step on an existing edge");
    println!("  connect <source> [branch] <target>");
    println!("  delete <node>");
    println!("  show | quit");
    println!("Kinds: {}", NodeKind::NAMES[1..].join(", "));
    print!("{}", editor.view());

    let stdin = io::stdin();
    loop {
        print!("> ");
        if io::stdout().flush().is_err() {
            break;
        }
        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }

        let words: Vec<&str> = line.split_whitespace().collect();
        match words.as_slice() {
            [] => continue,
            ["quit" | "exit"] => break,
            ["show"] => {
                print!("{}", editor.view());
                continue;
            }
            _ => {}
        }

        match parse_command(&words) {
            Ok(command) => match editor.dispatch(command) {
                Ok(_) => print!("{}", editor.view()),
                Err(e) => println!("Rejected: {}", e),
            },
            Err(message) => println!("{}", message),
        }
    }
}

fn parse_command(words: &[&str]) -> Result<Command, String> {
    match words {
        ["add", source, rest @ ..] => {
            let (branch, kind) = split_branch(rest)?;
            let [kind] = kind else {
                return Err("Usage: add <source> [branch] <kind>".to_string());
            };
            Ok(Command::insert(*source, branch, parse_kind(kind)?))
        }
        ["split", edge, kind] => Ok(Command::InsertOnEdge {
            edge: edge.to_string(),
            kind: parse_kind(kind)?,
        }),
        ["connect", source, rest @ ..] => {
            let (branch, target) = split_branch(rest)?;
            let [target] = target else {
                return Err("Usage: connect <source> [branch] <target>".to_string());
            };
            Ok(Command::Connect {
                source: source.to_string(),
                branch,
                target: target.to_string(),
            })
        }
        ["delete", node] => Ok(Command::delete(*node)),
        _ => Err(format!("Unknown command: '{}'", words.join(" "))),
    }
}

/// Splits an optional leading branch name off the remaining words.
fn split_branch<'a>(words: &'a [&'a str]) -> Result<(Option<Branch>, &'a [&'a str]), String> {
    match words {
        [first, rest @ ..] if !rest.is_empty() => {
            let branch = Branch::from_name(first).ok_or_else(|| format!("Unknown branch: '{}'", first))?;
            Ok((Some(branch), rest))
        }
        _ => Ok((None, words)),
    }
}

fn parse_kind(name: &str) -> Result<NodeKind, String> {
    NodeKind::from_name(name).ok_or_else(|| format!("Unknown step kind: '{}'", name))
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
