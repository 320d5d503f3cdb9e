//! `tagscript` — render and inspect TagScript templates from the shell.

use std::fs;
use std::io::Read;

use anyhow::{Context as _, Result, bail};
use clap::{Parser, Subcommand};
use serde_json::json;
use tagscript_engine::{
    AssignmentBlock, Block, DEFAULT_VERB_LIMIT, EngineError, Interpreter,
    LooseVariableGetterBlock, ProcessOptions, Response, ShorthandRedirectBlock, StopBlock,
    StringAdapter, Verb, scan_nodes,
};

// ── CLI definition ──────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "tagscript",
    version,
    about = "TagScript toolchain — render and inspect brace-delimited templates"
)]
struct Cli {
    /// Output mode: "pretty" for plain terminal output, "json" for a
    /// machine-readable envelope.
    #[arg(long, global = true, value_parser = ["pretty", "json"], default_value = "pretty")]
    output: String,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Render a template file (or stdin with "-") through the default chain.
    Render {
        /// Template file path, or "-" for stdin.
        #[arg(default_value = "-")]
        file: String,
        /// Seed a variable, as name=value. Repeatable.
        #[arg(long = "var", value_name = "NAME=VALUE")]
        vars: Vec<String>,
        /// Abort once cumulative block output exceeds this many characters.
        #[arg(long)]
        charlimit: Option<usize>,
    },

    /// Scan a template file and print the discovered node coordinates in
    /// resolution order.
    Scan {
        /// Template file path, or "-" for stdin.
        #[arg(default_value = "-")]
        file: String,
    },

    /// Parse one bracketed block and print its (declaration, parameter,
    /// payload) decomposition.
    Verb {
        /// The raw block, e.g. "{embed(title):Hello}".
        block: String,
    },
}

// ── Main ────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    let json_output = cli.output == "json";

    match cli.cmd {
        Cmd::Render {
            file,
            vars,
            charlimit,
        } => cmd_render(&file, &vars, charlimit, json_output),
        Cmd::Scan { file } => cmd_scan(&file, json_output),
        Cmd::Verb { block } => cmd_verb(&block, json_output),
    }
}

fn read_input(file: &str) -> Result<String> {
    if file == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read template from stdin")?;
        Ok(buffer)
    } else {
        fs::read_to_string(file).with_context(|| format!("failed to read template file {file}"))
    }
}

/// The default block chain: assignment, stop, numeric shorthand onto `args`,
/// and the variable getter last so it only sees otherwise-unclaimed verbs.
fn default_chain() -> Result<Interpreter> {
    let blocks: Vec<Box<dyn Block>> = vec![
        Box::new(AssignmentBlock),
        Box::new(StopBlock),
        Box::new(ShorthandRedirectBlock::new("args")),
        Box::new(LooseVariableGetterBlock),
    ];
    Interpreter::new(blocks).context("failed to build the block chain")
}

// ── Commands ────────────────────────────────────────────────────────────

fn cmd_render(file: &str, vars: &[String], charlimit: Option<usize>, json_output: bool) -> Result<()> {
    let source = read_input(file)?;
    let interpreter = default_chain()?;

    let mut options = ProcessOptions {
        charlimit,
        ..ProcessOptions::default()
    };
    for var in vars {
        let Some((name, value)) = var.split_once('=') else {
            bail!("invalid --var {var:?}: expected NAME=VALUE");
        };
        options
            .variables
            .insert(name.to_string(), Box::new(StringAdapter::new(value)));
    }

    let response = match interpreter.process_with(&source, options) {
        Ok(response) => response,
        Err(err @ EngineError::WorkloadExceeded { .. }) => bail!("input too large: {err}"),
        Err(err) => return Err(err).context("template processing failed"),
    };

    if json_output {
        println!("{}", serde_json::to_string_pretty(&render_envelope(&response))?);
    } else {
        println!("{}", response.body.as_deref().unwrap_or(""));
    }
    Ok(())
}

fn render_envelope(response: &Response) -> serde_json::Value {
    let variables: serde_json::Map<String, serde_json::Value> = response
        .variables
        .iter()
        .map(|(name, adapter)| {
            let value = adapter.get_value(&Verb::new(name.clone())).unwrap_or_default();
            (name.clone(), json!(value))
        })
        .collect();
    json!({
        "body": response.body,
        "actions": response.actions,
        "variables": variables,
    })
}

fn cmd_scan(file: &str, json_output: bool) -> Result<()> {
    let source = read_input(file)?;
    let nodes = scan_nodes(&source);
    if json_output {
        println!("{}", serde_json::to_string_pretty(&nodes)?);
    } else if nodes.is_empty() {
        println!("no blocks found");
    } else {
        for node in &nodes {
            println!("({}, {})  {}", node.start, node.end, &source[node.start..=node.end]);
        }
    }
    Ok(())
}

fn cmd_verb(block: &str, json_output: bool) -> Result<()> {
    let verb = Verb::parse(block, DEFAULT_VERB_LIMIT);
    if json_output {
        println!("{}", serde_json::to_string_pretty(&verb)?);
    } else {
        println!("declaration: {}", verb.declaration);
        println!("parameter:   {}", verb.parameter.as_deref().unwrap_or("(absent)"));
        println!("payload:     {}", verb.payload.as_deref().unwrap_or("(absent)"));
    }
    Ok(())
}
