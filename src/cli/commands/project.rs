use std::path::{Path, PathBuf};

use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::{output_empty_collection, output_success};
use crate::cli::OutputFormat;
use crate::models::Project;
use crate::store::{JsonFileStore, ProjectStore};

#[derive(Subcommand)]
pub enum ProjectCommands {
    #[command(about = "List stored projects")]
    List {
        #[arg(long, env = "PORTFOLIO_DB", default_value = "projects.json", help = "Store file")]
        db: PathBuf,
        #[arg(long, help = "Only featured projects")]
        featured: bool,
    },

    #[command(about = "Show one project")]
    Show {
        #[arg(help = "Project id (case-insensitive)")]
        id: String,
        #[arg(long, env = "PORTFOLIO_DB", default_value = "projects.json", help = "Store file")]
        db: PathBuf,
    },
}

pub async fn handle(cmd: ProjectCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        ProjectCommands::List { db, featured } => {
            let projects = load_projects(&db, featured).await?;

            if projects.is_empty() {
                return output_empty_collection(output_format, "projects");
            }

            match output_format {
                OutputFormat::Text => {
                    for project in &projects {
                        println!("{}", summary_line(project));
                    }
                    Ok(())
                }
                OutputFormat::Json => output_success(
                    output_format,
                    &format!("{} projects", projects.len()),
                    Some(json!({ "projects": projects })),
                ),
            }
        }
        ProjectCommands::Show { id, db } => {
            let project = JsonFileStore::open(&db).await?.find(&id).await?;

            match output_format {
                OutputFormat::Text => {
                    println!("{}", summary_line(&project));
                    println!("  summary:     {}", project.summary);
                    println!("  link:        {}", project.link);
                    println!("  description: {}", project.description);
                    Ok(())
                }
                OutputFormat::Json => output_success(
                    output_format,
                    "Project found",
                    Some(json!({ "project": project })),
                ),
            }
        }
    }
}

async fn load_projects(db: &Path, featured: bool) -> anyhow::Result<Vec<Project>> {
    let store = JsonFileStore::open(db).await?;
    let projects = if featured {
        store.list_featured().await?
    } else {
        store.list_all().await?
    };
    Ok(projects)
}

fn summary_line(project: &Project) -> String {
    let marker = if project.featured { "*" } else { " " };
    format!("{} {:<24} {}", marker, project.id, project.name)
}
