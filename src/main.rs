//! Marquee CLI - Command-line tool for inspecting CPE media manifests.
//!
//! This is the main entry point for the marquee command-line application.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

use marquee::prelude::*;

/// Marquee - CPE media manifest inspection tool
#[derive(Parser)]
#[command(name = "marquee")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose logging (repeat for debug output)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct LoadArgs {
    /// Path to the Manifest XML file
    #[arg(short, long, env = "MARQUEE_MANIFEST")]
    manifest: PathBuf,

    /// Path to the AppData XML file
    #[arg(short, long)]
    appdata: Option<PathBuf>,

    /// Path to the CPEStyle XML file
    #[arg(short, long)]
    style: Option<PathBuf>,

    /// Device region code for experience filtering
    #[arg(short, long, default_value = "US", env = "MARQUEE_REGION")]
    region: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize a loaded suite
    Info {
        #[command(flatten)]
        load: LoadArgs,

        /// Emit the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the experience tree
    Tree {
        #[command(flatten)]
        load: LoadArgs,
    },

    /// List timed events, optionally for one presentation
    Events {
        #[command(flatten)]
        load: LoadArgs,

        /// Restrict to events tied to this presentation ID
        #[arg(short, long)]
        presentation: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
    .ok();

    match cli.command {
        Commands::Info { load, json } => cmd_info(&load, json),
        Commands::Tree { load } => cmd_tree(&load),
        Commands::Events { load, presentation } => cmd_events(&load, presentation.as_deref()),
    }
}

fn load_suite(args: &LoadArgs) -> Result<std::sync::Arc<Suite>> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    spinner.set_message(format!("Loading {}", args.manifest.display()));

    let manager = SuiteManager::new(Settings::for_region(args.region.clone()));
    let start = Instant::now();
    let suite = manager
        .load(
            DocumentSource::File(args.manifest.clone()),
            args.appdata.clone().map(DocumentSource::File),
            args.style.clone().map(DocumentSource::File),
        )
        .context("Failed to load suite")?;

    spinner.finish_and_clear();
    eprintln!("Loaded suite in {:?}", start.elapsed());

    Ok(suite)
}

#[derive(Serialize)]
struct SuiteSummary {
    main_experience: String,
    out_of_movie_experience: String,
    in_movie_experience: String,
    experiences: usize,
    timed_events: usize,
    app_data_items: usize,
    has_style: bool,
}

fn cmd_info(args: &LoadArgs, json: bool) -> Result<()> {
    let suite = load_suite(args)?;
    let manifest = suite.manifest();

    let summary = SuiteSummary {
        main_experience: manifest.main_experience().id.clone(),
        out_of_movie_experience: manifest.out_of_movie_experience().id.clone(),
        in_movie_experience: manifest.in_movie_experience().id.clone(),
        experiences: manifest.experience_ids().len(),
        timed_events: manifest.timed_events().count(),
        app_data_items: suite.app_data().map(|a| a.len()).unwrap_or(0),
        has_style: suite.style().is_some(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("Main experience:         {}", summary.main_experience);
    println!("Out-of-movie experience: {}", summary.out_of_movie_experience);
    println!("In-movie experience:     {}", summary.in_movie_experience);
    println!("Experiences:             {}", summary.experiences);
    println!("Timed events:            {}", summary.timed_events);
    println!("App data items:          {}", summary.app_data_items);
    println!(
        "Style document:          {}",
        if summary.has_style { "yes" } else { "no" }
    );

    if let Some(title) = manifest
        .main_experience()
        .metadata_id()
        .and_then(|id| manifest.metadata(id))
        .and_then(|m| m.title(&args.region).map(str::to_string))
    {
        println!("Title:                   {}", title);
    }

    Ok(())
}

fn cmd_tree(args: &LoadArgs) -> Result<()> {
    let suite = load_suite(args)?;
    let manifest = suite.manifest();

    let main = manifest.main_experience();
    println!("{} (main)", main.id);
    print_subtree(&suite, main, 1);

    Ok(())
}

fn print_subtree(suite: &Suite, experience: &Experience, depth: usize) {
    if depth > 16 {
        return;
    }
    let manifest = suite.manifest();
    for edge in &experience.children {
        let indent = "  ".repeat(depth);
        match manifest.experience(&edge.experience_id) {
            Some(child) => {
                let kind = if suite.experience_is(child, ExperienceKind::Gallery) {
                    "gallery"
                } else if suite.experience_is(child, ExperienceKind::AudioVisual) {
                    "video"
                } else if suite.experience_is(child, ExperienceKind::App) {
                    "app"
                } else if suite.experience_is(child, ExperienceKind::Location) {
                    "location"
                } else if suite.experience_is(child, ExperienceKind::Product) {
                    "product"
                } else {
                    "menu"
                };
                println!("{}[{}] {} ({})", indent, edge.sequence, child.id, kind);
                print_subtree(suite, child, depth + 1);
            }
            None => println!(
                "{}[{}] {} (unresolved)",
                indent, edge.sequence, edge.experience_id
            ),
        }
    }
}

fn cmd_events(args: &LoadArgs, presentation: Option<&str>) -> Result<()> {
    let suite = load_suite(args)?;
    let manifest = suite.manifest();

    let events: Vec<_> = match presentation {
        Some(id) => manifest.timed_events_for_presentation(id),
        None => manifest.timed_events().collect(),
    };

    for (event, reference) in &events {
        println!(
            "{:>8.1}s - {:>8.1}s  {:<10} (experience {})",
            event.start_seconds,
            event.end_seconds,
            format!("{:?}", event.kind()).to_lowercase(),
            reference.experience_id
        );
    }
    println!("\nTotal: {} events", events.len());

    Ok(())
}
