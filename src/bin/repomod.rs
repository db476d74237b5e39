use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::process::ExitCode;

use repomod::checkout::check_import_path;
use repomod::{
    BumpType, Checkout, GitRunner, LoadOptions, ModuleShortName, ProcessRunner, Releaser,
    Repository, SemVer, Settings,
};

/// repomod - manage a git repository holding several Go modules
///
/// Run it from inside the checkout. It walks the tree looking for go.mod
/// files, reads module versions from git tags and works on the whole module
/// graph at once. Without --do-it, commands that change anything are only
/// printed.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Actually run edits and git commands instead of printing them
    #[arg(long = "do-it", alias = "doIt", global = true, env = "REPOMOD_DO_IT")]
    do_it: bool,

    /// Directory name to skip while looking for modules (repeatable)
    #[arg(long = "exclude", value_name = "NAME", global = true)]
    exclude: Vec<String>,

    /// Import path of the repository, e.g. sigs.k8s.io/kustomize
    #[arg(long = "import-path", value_name = "PATH", env = "REPOMOD_IMPORT_PATH", global = true)]
    import_path: Option<String>,

    /// Name of the main branch
    #[arg(long = "main-branch", value_name = "BRANCH", env = "REPOMOD_MAIN_BRANCH", global = true)]
    main_branch: Option<String>,

    /// Remote to use, in order of preference (repeatable)
    #[arg(long = "remote", value_name = "NAME", global = true)]
    remote: Vec<String>,

    /// Log every command that is run
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List modules, their versions and intra-repo dependencies
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Run `go mod tidy` in every module
    Tidy,

    /// Require a released version of MODULE wherever it is used
    Pin {
        /// Module short name; {top} is the root module
        module: String,
        /// Version such as v1.2.3; defaults to the module's latest remote version
        version: Option<SemVer>,
    },

    /// Use the in-repo copy of MODULE wherever it is used
    Unpin {
        /// Module short name; {top} is the root module
        module: String,
    },

    /// Tag and push a new version of MODULE
    Release {
        /// Module short name; {top} is the root module
        module: String,
        /// major, minor or patch
        #[arg(default_value = "patch")]
        bump: BumpType,
    },

    /// Delete the latest remote release tag of MODULE
    Unrelease {
        /// Module short name; {top} is the root module
        module: String,
    },
}

impl Commands {
    fn mutates(&self) -> bool {
        !matches!(self, Commands::List { .. })
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            ExitCode::from(1)
        }
    }
}

fn settings_for(cli: &Cli, checkout: &Checkout) -> Result<Settings> {
    let mut settings = Settings::load(checkout.root())?;
    settings.add_exclusions(cli.exclude.iter().cloned());
    if !cli.remote.is_empty() {
        settings.remotes = cli.remote.clone();
    }
    if let Some(branch) = &cli.main_branch {
        settings.main_branch = branch.clone();
    }
    if let Some(path) = &cli.import_path {
        settings.import_path = Some(path.clone());
    }
    Ok(settings)
}

fn run(cli: Cli) -> Result<()> {
    let dry_run = !cli.do_it;
    let checkout = Checkout::discover(std::env::current_dir()?)?;
    let settings = settings_for(&cli, &checkout)?;

    let runner = ProcessRunner;
    let git = GitRunner::new(&runner, checkout.root(), dry_run);
    let remote = git.determine_remote(&settings.remotes)?;
    let import_path = match settings.import_path {
        Some(path) => path,
        None => checkout.import_path(&remote)?,
    };
    check_import_path(&import_path)?;

    let repo = Repository::load(
        LoadOptions {
            root: checkout.root().to_path_buf(),
            import_path,
            remote,
            main_branch: settings.main_branch,
            exclusions: settings.exclusions,
        },
        &git,
    )?;

    if dry_run && cli.command.mutates() {
        println!(
            "{} commands are printed, not run (use --do-it)\n",
            "Dry run mode:".yellow().bold()
        );
    }

    match cli.command {
        Commands::List { json } => {
            if json {
                println!("{}", repo.list_json()?);
            } else {
                repo.print_list();
            }
        }
        Commands::Tidy => repo.tidy(&runner, dry_run)?,
        Commands::Pin { module, version } => {
            let target = repo.require_module(&ModuleShortName::from_arg(&module))?;
            let version = match version {
                Some(v) => v,
                None if !target.version_remote().is_zero() => target.version_remote(),
                None => bail!(
                    "module {} has no release on {}; name a version to pin to",
                    target.short_name(),
                    repo.remote()
                ),
            };
            repo.pin(target, version, &runner, dry_run)?;
        }
        Commands::Unpin { module } => {
            let target = repo.require_module(&ModuleShortName::from_arg(&module))?;
            repo.unpin(target, &runner, dry_run)?;
        }
        Commands::Release { module, bump } => {
            let target = repo.require_module(&ModuleShortName::from_arg(&module))?;
            Releaser::new(&git, repo.remote(), repo.main_branch()).release(target, bump)?;
        }
        Commands::Unrelease { module } => {
            let target = repo.require_module(&ModuleShortName::from_arg(&module))?;
            Releaser::new(&git, repo.remote(), repo.main_branch()).unrelease(target)?;
        }
    }

    Ok(())
}
