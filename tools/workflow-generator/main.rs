use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs;
use stepflow::prelude::{Branch, Command, NodeKind, WorkflowEditor};
use tracing_subscriber::EnvFilter;

/// A CLI tool to generate random workflows for the stepflow editor
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The path to write the generated snapshot JSON file to
    #[arg(short, long, default_value = "generated_workflow.json")]
    output: String,

    /// The number of random edit commands to apply
    #[arg(long, default_value_t = 40)]
    commands: usize,

    /// Chance (0.0 to 1.0) that a command deletes a step instead of adding one
    #[arg(long, default_value_t = 0.2)]
    delete_ratio: f64,

    /// Seed for reproducible output; a random seed is used if omitted
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    if !(0.0..=1.0).contains(&cli.delete_ratio) {
        eprintln!(
            "Error: --delete-ratio ({}) must be between 0.0 and 1.0",
            cli.delete_ratio
        );
        std::process::exit(1);
    }

    let seed = cli.seed.unwrap_or_else(|| rand::rng().random());
    let mut rng = StdRng::seed_from_u64(seed);
    println!(
        "Generating a workflow from {} random commands (seed {})...",
        cli.commands, seed
    );

    let mut editor = WorkflowEditor::new();
    let mut inserted = 0;
    let mut deleted = 0;
    for _ in 0..cli.commands {
        let Some(command) = random_command(&editor, &mut rng, cli.delete_ratio) else {
            continue;
        };
        match &command {
            Command::Delete { .. } => deleted += 1,
            _ => inserted += 1,
        }
        editor.dispatch(command)?;
    }

    println!("-> Inserted {} step(s), deleted {} step(s).", inserted, deleted);
    println!(
        "-> Final workflow has {} numbered step(s) and {} edge(s).",
        editor.step_numbers().len(),
        editor.store().edges().len()
    );

    let json_output = editor.snapshot().to_json_pretty()?;
    fs::write(&cli.output, json_output)?;

    println!(
        "Successfully generated and saved workflow to '{}'",
        cli.output
    );

    Ok(())
}

/// Picks a command that the editor will accept, or `None` if the picked node
/// has no free branch left.
fn random_command(editor: &WorkflowEditor, rng: &mut StdRng, delete_ratio: f64) -> Option<Command> {
    let nodes = editor.store().nodes();
    let node = &nodes[rng.random_range(0..nodes.len())];

    if !node.kind.is_start() && rng.random_bool(delete_ratio) {
        return Some(Command::delete(node.id.clone()));
    }

    let branch = if node.kind.is_branching() {
        let open: Vec<Branch> = node
            .kind
            .branches()
            .iter()
            .copied()
            .filter(|b| editor.store().branch_edge(&node.id, *b).is_none())
            .collect();
        if open.is_empty() {
            return None;
        }
        Some(open[rng.random_range(0..open.len())])
    } else if editor.has_outgoing_connection(&node.id) {
        // Keep linear steps in a single chain.
        return None;
    } else {
        None
    };

    let names = &NodeKind::NAMES[1..];
    let kind = NodeKind::from_name(names[rng.random_range(0..names.len())])?;
    Some(Command::insert(node.id.clone(), branch, kind))
}
