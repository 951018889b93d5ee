//! Saved commands management

use anyhow::{Context, Result, bail};
use clap::Subcommand;

use procrun::ProcessDefinition;
use procrun::config::Config;
use procrun::store::{CommandNode, CommandStore};

#[derive(Subcommand)]
pub enum CommandsAction {
    /// List saved commands
    List {
        /// Print the tree as JSON
        #[arg(long)]
        json: bool,
    },

    /// Save a new command
    Add {
        /// Name shown in the catalogue
        name: String,

        /// Program to run
        #[arg(long)]
        program: String,

        /// Argument (repeatable)
        #[arg(long = "arg", allow_hyphen_values = true)]
        args: Vec<String>,

        /// Working directory
        #[arg(long)]
        cwd: Option<String>,

        /// Line written to stdin (repeatable)
        #[arg(long = "input")]
        inputs: Vec<String>,

        /// Group to put the command in (created if missing)
        #[arg(long)]
        group: Option<String>,
    },

    /// Remove a saved command or group
    Remove {
        /// Name of the entry
        name: String,
    },
}

pub fn commands_command(config: &Config, action: CommandsAction) -> Result<()> {
    let path = config.commands_path();
    let panel = config.settings.panel_name.as_str();
    let mut store = CommandStore::load(&path, panel)?;

    match action {
        CommandsAction::List { json } => {
            if json {
                let content = serde_json::to_string_pretty(store.nodes())
                    .context("Failed to serialize commands")?;
                println!("{}", content);
            } else {
                print_tree(&store);
            }
        }
        CommandsAction::Add {
            name,
            program,
            args,
            cwd,
            inputs,
            group,
        } => {
            let parent = match group {
                Some(group) => match store.find_node(&group) {
                    Some(path) => Some(path),
                    None => Some(store.add_group(None, group)?),
                },
                None => None,
            };

            let definition = ProcessDefinition::new(program)
                .with_args(args)
                .with_working_directory(cwd.unwrap_or_default())
                .with_stdin_lines(inputs);
            store.add_command(parent.as_ref(), name.clone(), definition)?;
            store.save(&path, panel)?;
            println!("Saved '{}' to {}", name, path.display());
        }
        CommandsAction::Remove { name } => {
            let Some(node_path) = store.find_node(&name) else {
                bail!("No saved command named '{}'", name);
            };
            store.remove(&node_path)?;
            store.save(&path, panel)?;
            println!("Removed '{}'", name);
        }
    }

    Ok(())
}

fn print_tree(store: &CommandStore) {
    if store.is_empty() {
        println!("No saved commands.");
        return;
    }

    for (path, node) in store.walk() {
        let indent = "  ".repeat(path.depth() - 1);
        match node {
            CommandNode::Group { name, .. } => println!("{}{}/", indent, name),
            CommandNode::Command { name, definition } => {
                println!("{}{}: {}", indent, name, definition.command_line());
                if definition.has_working_directory() {
                    println!("{}    in {}", indent, definition.working_directory);
                }
            }
        }
    }
}
