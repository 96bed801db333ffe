//! Storyforge CLI - generates Storybook stories from component definitions.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "storyforge")]
#[command(about = "Generates Storybook stories from component definitions")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to stories.toml config file
    #[arg(short, long, default_value = "stories.toml")]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Scaffold stories.toml and the Storybook configuration
    Init {
        /// Overwrite existing files
        #[arg(short, long)]
        yes: bool,
    },

    /// Generate a story template for one component
    #[command(alias = "component-stories")]
    GenerateComponentStories {
        /// Component id to generate stories for (e.g. my_theme:button)
        component_id: String,

        /// Generate even if the story template already exists
        #[arg(long)]
        force: bool,
    },

    /// Generate story templates for all components
    #[command(alias = "all-component-stories")]
    GenerateAllComponentStories {
        /// Generate even if the story templates already exist
        #[arg(long)]
        force: bool,
    },

    /// Generate the stories JSON file for one stories template
    GenerateStories {
        /// Template path, relative to the application root
        template_path: PathBuf,

        /// Generate even if the JSON file is up to date
        #[arg(long)]
        force: bool,

        /// Leave the render endpoint URL out of the JSON file
        #[arg(long)]
        omit_server_url: bool,
    },

    /// Generate stories JSON files for all stories templates
    GenerateAllStories {
        /// Generate even if the JSON files are up to date
        #[arg(long)]
        force: bool,

        /// Embed the render endpoint URL in the JSON files
        #[arg(long)]
        include_server_url: bool,

        /// Leave the render endpoint URL out (takes precedence)
        #[arg(long)]
        omit_server_url: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    match cli.command {
        Commands::Init { yes } => {
            commands::init::run(yes)?;
        }
        Commands::GenerateComponentStories {
            component_id,
            force,
        } => {
            let config = config::load_config(&cli.config)?;
            commands::component::run(&config, &component_id, force)?;
        }
        Commands::GenerateAllComponentStories { force } => {
            let config = config::load_config(&cli.config)?;
            commands::component::run_all(&config, force)?;
        }
        Commands::GenerateStories {
            template_path,
            force,
            omit_server_url,
        } => {
            let config = config::load_config(&cli.config)?;
            commands::template::run(&config, &template_path, force, omit_server_url)?;
        }
        Commands::GenerateAllStories {
            force,
            include_server_url,
            omit_server_url,
        } => {
            let config = config::load_config(&cli.config)?;
            commands::template::run_all(&config, force, include_server_url, omit_server_url)?;
        }
    }

    Ok(())
}
