//! Folder management CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use super::Catalog;
use crate::output::{self, OutputFormat};
use grimoire_core::FolderId;
use grimoire_core::error::AppError;
use grimoire_entity::{DeletionStrategy, Folder, FolderNode};

/// Arguments for folder commands
#[derive(Debug, Args)]
pub struct FolderArgs {
    /// Folder subcommand
    #[command(subcommand)]
    pub command: FolderCommand,
}

/// Folder subcommands
#[derive(Debug, Subcommand)]
pub enum FolderCommand {
    /// Create a folder
    Create {
        /// Folder name
        name: String,
        /// Parent folder ID (defaults to the root)
        #[arg(short, long)]
        parent: Option<i64>,
    },
    /// Rename a folder
    Rename {
        /// Folder ID
        id: i64,
        /// New name
        name: String,
    },
    /// Move a folder under a new parent
    Move {
        /// Folder ID
        id: i64,
        /// New parent folder ID
        parent: i64,
    },
    /// Delete a folder
    Delete {
        /// Folder ID
        id: i64,
        /// Deletion strategy: empty-only, move-to-parent, or recursive
        #[arg(short, long, default_value = "empty-only")]
        strategy: String,
    },
    /// Show folder contents and counts
    Contents {
        /// Folder ID (defaults to the root)
        #[arg(default_value_t = 1)]
        id: i64,
    },
    /// Print the folder tree
    Tree {
        /// Folder ID to start from (defaults to the root)
        #[arg(default_value_t = 1)]
        id: i64,
    },
    /// Resolve a slash-separated path, or print the path of a folder
    Path {
        /// Path such as `Elementalism/Fire`
        #[arg(conflicts_with = "id")]
        path: Option<String>,
        /// Folder ID
        #[arg(long)]
        id: Option<i64>,
    },
}

/// Folder display row for table output
#[derive(Debug, Serialize, Tabled)]
struct FolderRow {
    /// Folder ID
    id: i64,
    /// Name
    name: String,
    /// Parent ID
    parent: String,
    /// Created at
    created_at: String,
}

impl From<&Folder> for FolderRow {
    fn from(folder: &Folder) -> Self {
        Self {
            id: folder.id.get(),
            name: folder.name.clone(),
            parent: folder
                .parent_id
                .map(|p| p.to_string())
                .unwrap_or_else(|| "-".to_string()),
            created_at: folder.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Execute folder commands
pub async fn execute(
    args: &FolderArgs,
    catalog: &Catalog,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        FolderCommand::Create { name, parent } => {
            let id = catalog
                .folders
                .create_folder(name, parent.map(FolderId))
                .await?;
            output::print_success(&format!("Folder '{}' created with ID {}", name.trim(), id));
        }
        FolderCommand::Rename { id, name } => {
            let folder = catalog.folders.rename_folder(FolderId(*id), name).await?;
            output::print_success(&format!("Folder {} renamed to '{}'", id, folder.name));
        }
        FolderCommand::Move { id, parent } => {
            catalog
                .folders
                .move_folder(FolderId(*id), FolderId(*parent))
                .await?;
            let path = catalog.trees.path_of(FolderId(*id)).await?;
            output::print_success(&format!("Folder {} moved to {}", id, path));
        }
        FolderCommand::Delete { id, strategy } => {
            let strategy: DeletionStrategy = strategy.parse()?;
            let outcome = catalog
                .folders
                .delete_folder(FolderId(*id), strategy)
                .await?;

            match format {
                OutputFormat::Json => output::print_json(&outcome),
                OutputFormat::Table => {
                    output::print_success(&format!("Folder {} deleted ({})", id, strategy));
                    output::print_kv("Folders removed", &outcome.folders_removed.to_string());
                    output::print_kv("Spells removed", &outcome.spells_removed.to_string());
                    output::print_kv(
                        "Folders reparented",
                        &outcome.folders_reparented.to_string(),
                    );
                    output::print_kv("Spells reparented", &outcome.spells_reparented.to_string());
                }
            }
        }
        FolderCommand::Contents { id } => {
            let contents = catalog.folders.get_folder_contents(FolderId(*id)).await?;

            match format {
                OutputFormat::Json => output::print_json(&contents),
                OutputFormat::Table => {
                    let path = catalog.trees.path_of(contents.folder.id).await?;
                    println!("{}", path);
                    output::print_kv("Spells", &contents.spell_count.to_string());
                    output::print_kv("Subfolders", &contents.subfolder_count.to_string());
                    output::print_kv("Spells (total)", &contents.total_spell_count.to_string());
                    output::print_kv(
                        "Subfolders (total)",
                        &contents.total_subfolder_count.to_string(),
                    );
                    println!();
                    if contents.is_empty() {
                        println!("Folder is empty.");
                    } else {
                        let rows: Vec<FolderRow> =
                            contents.subfolders.iter().map(FolderRow::from).collect();
                        output::print_list(&rows, format);
                    }
                }
            }
        }
        FolderCommand::Tree { id } => {
            let tree = catalog.trees.get_tree(FolderId(*id)).await?;

            match format {
                OutputFormat::Json => output::print_json(&tree),
                OutputFormat::Table => {
                    print_node(&tree, 0);
                    println!();
                    println!(
                        "{} folders, {} spells",
                        tree.total_folders(),
                        tree.total_spells()
                    );
                }
            }
        }
        FolderCommand::Path { path, id } => match (path, id) {
            (_, Some(id)) => {
                println!("{}", catalog.trees.path_of(FolderId(*id)).await?);
            }
            (Some(path), None) => {
                let folder = catalog
                    .trees
                    .resolve_path(path)
                    .await?
                    .ok_or_else(|| AppError::not_found(format!("No folder at path '{}'", path)))?;
                output::print_list(&[FolderRow::from(&folder)], format);
            }
            (None, None) => {
                return Err(AppError::validation("Provide a path or --id"));
            }
        },
    }

    Ok(())
}

fn print_node(node: &FolderNode, depth: usize) {
    let label = if depth == 0 && node.id.is_root() {
        "/".to_string()
    } else {
        node.name.clone()
    };
    println!(
        "{}{} [{}] ({} spells)",
        "  ".repeat(depth),
        label,
        node.id,
        node.spell_count
    );
    for child in &node.children {
        print_node(child, depth + 1);
    }
}
