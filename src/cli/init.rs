use crate::cli::args::InitArgs;
use crate::core::config::DEFAULT_WORKFLOW_FILE;
use crate::core::workflow::WorkflowDocument;
use crate::utils::serialization::{FileUtils, JsonSerializer, YamlSerializer};
use crate::Result;
use anyhow::{anyhow, Context};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};

const GITIGNORE: &str = "n8n-data/\n.env\n";
const DEFAULT_PROJECT_NAME: &str = "my-workflow";

/// Files written by `init`, relative to the project directory.
#[derive(Debug, Default)]
pub struct Scaffold {
    pub created: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
}

/// Handles `n8n-workflow init` by scaffolding a workflow project.
pub async fn run(args: InitArgs) -> Result<()> {
    let path = match args.path {
        Some(path) => path,
        None => std::env::current_dir().context("Failed to get current directory")?,
    };
    let name = args.name.unwrap_or_else(|| project_name(&path));

    let scaffold = scaffold_project(&path, &name, args.description)?;

    println!("Workflow project \"{}\" created at {}", name, path.display());
    for file in &scaffold.created {
        println!("  created {}", file.display());
    }
    for file in &scaffold.skipped {
        println!("  kept existing {}", file.display());
    }
    println!("\nNext steps:");
    println!("  1. docker compose up -d");
    println!("  2. Open http://localhost:5678 and create an API key");
    println!("  3. Put N8N_BASE_URL and N8N_API_KEY into .env, then run: n8n-workflow deploy");
    Ok(())
}

/// Write the project files. An existing workflow document is never replaced;
/// the other files are only written when missing.
pub fn scaffold_project(dir: &Path, name: &str, description: Option<String>) -> Result<Scaffold> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory {}", dir.display()))?;

    let workflow_path = dir.join(DEFAULT_WORKFLOW_FILE);
    if workflow_path.exists() {
        return Err(anyhow!(
            "{} already exists at {}; remove it or choose a different path",
            DEFAULT_WORKFLOW_FILE,
            dir.display()
        ));
    }

    let mut scaffold = Scaffold::default();

    let document = WorkflowDocument::empty(name, description);
    FileUtils::save::<_, JsonSerializer>(&workflow_path, &document)?;
    scaffold.created.push(PathBuf::from(DEFAULT_WORKFLOW_FILE));

    let compose_path = dir.join("docker-compose.yml");
    if compose_path.exists() {
        scaffold.skipped.push(PathBuf::from("docker-compose.yml"));
    } else {
        FileUtils::save::<_, YamlSerializer>(&compose_path, &docker_compose())?;
        scaffold.created.push(PathBuf::from("docker-compose.yml"));
    }

    let gitignore_path = dir.join(".gitignore");
    if gitignore_path.exists() {
        scaffold.skipped.push(PathBuf::from(".gitignore"));
    } else {
        fs::write(&gitignore_path, GITIGNORE)
            .with_context(|| format!("failed to write {}", gitignore_path.display()))?;
        scaffold.created.push(PathBuf::from(".gitignore"));
    }

    tracing::info!(dir = %dir.display(), name, "scaffolded workflow project");
    Ok(scaffold)
}

fn project_name(dir: &Path) -> String {
    let absolute = fs::canonicalize(dir).unwrap_or_else(|_| dir.to_path_buf());
    absolute
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty())
        .unwrap_or(DEFAULT_PROJECT_NAME)
        .to_string()
}

fn docker_compose() -> serde_json::Value {
    json!({
        "services": {
            "n8n": {
                "image": "n8nio/n8n",
                "ports": ["5678:5678"],
                "environment": {
                    "N8N_HOST": "localhost",
                    "N8N_PORT": "5678",
                    "N8N_PROTOCOL": "http"
                },
                "volumes": ["./n8n-data:/home/node/.n8n"]
            }
        }
    })
}
