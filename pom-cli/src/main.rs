//! Command-line front end for pom-editor.
//!
//! Every edit command backs the target up before touching it and leaves the
//! backup in place (unless `--auto-commit` is given), so several edits can
//! be accepted with `commit` or undone with `rollback` as a whole.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use pom_editor::constants::DEFAULT_POM_FILE;
use pom_editor::{
    Change, CommitMode, Coordinate, EditOptions, MergeOutcome, PomEditor, ProfileMode, Property,
    Scope,
};

/// Transactional editing of Maven POM files
#[derive(Parser)]
#[command(name = "pom")]
#[command(version)]
#[command(about = "Transactional editing of Maven POM files", long_about = None)]
struct Cli {
    /// POM file to edit
    #[arg(
        long = "pom",
        visible_alias = "target-path",
        env = "POM_EDITOR_POM",
        default_value = DEFAULT_POM_FILE,
        global = true
    )]
    pom: PathBuf,

    /// More log output (-v debug, -vv trace); RUST_LOG applies otherwise
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a dependency, or update the one with the same groupId:artifactId
    #[command(visible_alias = "add-dep")]
    AddDependency(DependencyArgs),

    /// Add or update a dependency under <dependencyManagement>
    #[command(visible_alias = "add-mdep")]
    AddManagedDependency(DependencyArgs),

    /// Set a property, or remove it when no value is given
    #[command(visible_alias = "change-prop")]
    ChangeProperty {
        /// Property name
        #[arg(long, visible_alias = "name")]
        property: String,

        /// New value; empty or absent removes the property
        #[arg(long)]
        value: Option<String>,

        #[command(flatten)]
        edit: EditArgs,
    },

    /// Accept all edits by deleting the backup
    Commit,

    /// Restore the POM from its backup and delete the backup
    Rollback,
}

#[derive(Args)]
struct DependencyArgs {
    /// Coordinate as groupId:artifactId[:version]
    #[arg(long, value_name = "GROUP:ARTIFACT[:VERSION]")]
    gav: String,

    /// Dependency type, e.g. pom or test-jar
    #[arg(long = "type", value_name = "TYPE")]
    packaging: Option<String>,

    /// Dependency classifier
    #[arg(long)]
    classifier: Option<String>,

    /// Dependency scope, e.g. test or provided
    #[arg(long)]
    scope: Option<String>,

    /// Edit the profile with this id instead of the project
    #[arg(long, value_name = "ID")]
    profile: Option<String>,

    /// Create the profile when it does not exist
    #[arg(long, requires = "profile")]
    add_profile: bool,

    #[command(flatten)]
    edit: EditArgs,
}

#[derive(Args, Clone, Copy)]
struct EditArgs {
    /// Delete the backup as soon as the edit succeeds
    #[arg(long, env = "POM_EDITOR_AUTO_COMMIT")]
    auto_commit: bool,
}

impl EditArgs {
    fn options(self) -> EditOptions {
        EditOptions::new(CommitMode::from_auto_commit(self.auto_commit))
    }
}

impl DependencyArgs {
    fn coordinate(&self) -> pom_editor::Result<Coordinate> {
        Ok(Coordinate::parse_gav(&self.gav)?
            .with_type(self.packaging.clone())
            .with_classifier(self.classifier.clone())
            .with_scope(self.scope.clone()))
    }

    fn target_scope(&self, managed: bool) -> pom_editor::Result<Scope> {
        let scope = match &self.profile {
            Some(id) => Scope::profile(id.as_str(), ProfileMode::from_add_flag(self.add_profile))?,
            None => Scope::Root,
        };
        if managed {
            scope.managed()
        } else {
            Ok(scope)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::AddDependency(args) => run_add_dependency(&cli.pom, &args, false),
        Commands::AddManagedDependency(args) => run_add_dependency(&cli.pom, &args, true),
        Commands::ChangeProperty {
            property,
            value,
            edit,
        } => run_change_property(&cli.pom, &property, value, edit),
        Commands::Commit => run_commit(&cli.pom),
        Commands::Rollback => run_rollback(&cli.pom),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Logs to stderr so stdout stays free for other tools.
fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Adds or updates a dependency, in `<dependencyManagement>` if `managed`.
fn run_add_dependency(pom: &Path, args: &DependencyArgs, managed: bool) -> Result<()> {
    let what = if managed {
        "managed dependency"
    } else {
        "dependency"
    };
    let (coordinate, scope) = args
        .coordinate()
        .and_then(|c| Ok((c, args.target_scope(managed)?)))
        .with_context(|| format!("cannot add the {} '{}' to '{}'", what, args.gav, pom.display()))?;

    info!("adding the {} {} to '{}'", what, coordinate, pom.display());
    let change = Change::scoped_dependency(scope.clone(), coordinate.clone());
    let outcomes = PomEditor::new(pom)
        .with_options(args.edit.options())
        .update_or_add(&[change])
        .with_context(|| format!("cannot add the {} {} to '{}'", what, coordinate, pom.display()))?;

    report(&outcomes, &scope, pom);
    Ok(())
}

/// Sets a property, or removes it for an empty or missing value.
fn run_change_property(
    pom: &Path,
    name: &str,
    value: Option<String>,
    edit: EditArgs,
) -> Result<()> {
    let value = value.filter(|v| !v.is_empty());
    let property = Property::new(name, value)
        .with_context(|| format!("cannot change property '{}' of '{}'", name, pom.display()))?;

    info!("changing property {} of '{}'", property, pom.display());
    let outcomes = PomEditor::new(pom)
        .with_options(edit.options())
        .update_or_add(&[Change::property(property.clone())])
        .with_context(|| format!("cannot change property {} of '{}'", property, pom.display()))?;

    report(&outcomes, &Scope::Root, pom);
    Ok(())
}

fn run_commit(pom: &Path) -> Result<()> {
    let committed = PomEditor::new(pom)
        .commit()
        .with_context(|| format!("cannot commit changes to '{}'", pom.display()))?;
    if !committed {
        info!("no backup of '{}', nothing to commit", pom.display());
    }
    Ok(())
}

fn run_rollback(pom: &Path) -> Result<()> {
    let restored = PomEditor::new(pom)
        .rollback()
        .with_context(|| format!("cannot roll back changes to '{}'", pom.display()))?;
    if !restored {
        info!("no backup of '{}', nothing to roll back", pom.display());
    }
    Ok(())
}

fn report(outcomes: &[MergeOutcome], scope: &Scope, pom: &Path) {
    for outcome in outcomes {
        match outcome {
            MergeOutcome::ScopeAbsent => warn!(
                "{} not found in '{}', nothing changed (use --add-profile to create it)",
                scope,
                pom.display()
            ),
            MergeOutcome::Unchanged => info!("'{}' already up to date", pom.display()),
            other => info!("'{}': {}", pom.display(), other),
        }
    }
}
