use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use handoff_cli::{Home, OutputFormat, commands};
use std::path::PathBuf;
use url::Url;

#[derive(Parser)]
#[command(name = "handoff")]
#[command(author, version, about, long_about = None)]
#[command(
    about = "Route links to the right browser and browser profile",
    long_about = "handoff matches each link you open against an ordered list of rules and \
                  launches the browser (or browser profile) the first matching rule names. \
                  Links no rule claims are left to you to pick from the browsers installed."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "pretty")]
    format: OutputFormat,

    /// Directory holding settings.json and config.json [default: ~/.handoff]
    #[arg(long, global = true, env = "HANDOFF_HOME", value_name = "DIR")]
    home: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open URLs with the browser the first matching rule names
    Open {
        /// URLs to open; only the first is matched against the rules
        #[arg(value_name = "URL", required = true)]
        urls: Vec<Url>,

        /// Print the decision and launch command without launching
        #[arg(long)]
        dry_run: bool,
    },

    /// List the browsers and companion apps that can open URLs
    Choose {
        #[arg(value_name = "URL", required = true)]
        urls: Vec<Url>,
    },

    /// Open URLs with a browser picked by hand
    Launch {
        /// Browser identity, 1-based position, or shortcut character
        #[arg(short, long, value_name = "BROWSER")]
        browser: String,

        /// Open in a private window, if the browser has a private argument
        #[arg(long)]
        incognito: bool,

        /// Print the launch command without launching
        #[arg(long)]
        dry_run: bool,

        #[arg(value_name = "URL", required = true)]
        urls: Vec<Url>,
    },

    /// Manage routing rules
    Rules {
        #[command(subcommand)]
        command: RulesCommands,
    },

    /// Manage the browser list
    Browsers {
        #[command(subcommand)]
        command: BrowsersCommands,
    },

    /// Manage companion apps offered for specific sites
    Apps {
        #[command(subcommand)]
        command: AppsCommands,
    },

    /// List Chromium browser profiles
    Profiles {
        /// Only list profiles of this browser family (chrome, edge)
        #[arg(long, value_name = "FAMILY")]
        family: Option<String>,
    },

    /// Export, import or reset settings
    Settings {
        #[command(subcommand)]
        command: SettingsCommands,
    },

    /// Show or initialize the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completion scripts
    #[command(long_about = "Generate shell completion scripts for handoff.

SUPPORTED SHELLS:
  bash, zsh, fish, powershell, elvish

INSTALLATION:
  Bash:  handoff completion bash > ~/.local/share/bash-completion/completions/handoff
         (or add `source <(handoff completion bash)` to ~/.bashrc)
  Zsh:   handoff completion zsh > ~/.zfunc/_handoff
         (and add `fpath+=~/.zfunc` to ~/.zshrc before compinit)
  Fish:  handoff completion fish > ~/.config/fish/completions/handoff.fish")]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum, value_name = "SHELL")]
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum RulesCommands {
    /// List rules in match order
    List,

    /// Append a rule
    Add {
        /// Regular expression matched case-insensitively against the URL
        #[arg(value_name = "PATTERN")]
        pattern: String,

        /// Browser or application to open matching URLs with
        #[arg(long, value_name = "PATH")]
        app: PathBuf,

        /// Browser profile id (e.g. "Profile 1")
        #[arg(long, value_name = "ID")]
        profile: Option<String>,
    },

    /// Change a rule in place
    Update {
        /// 1-based rule position
        #[arg(value_name = "INDEX")]
        index: usize,

        #[arg(long, value_name = "PATTERN")]
        pattern: Option<String>,

        #[arg(long, value_name = "PATH")]
        app: Option<PathBuf>,

        #[arg(long, value_name = "ID", conflicts_with = "no_profile")]
        profile: Option<String>,

        /// Drop the rule's profile
        #[arg(long)]
        no_profile: bool,
    },

    /// Delete a rule
    Remove {
        #[arg(value_name = "INDEX")]
        index: usize,
    },

    /// Move a rule to another position
    Move {
        #[arg(value_name = "FROM")]
        from: usize,

        #[arg(value_name = "TO")]
        to: usize,
    },

    /// Show which URLs a pattern matches
    Test {
        #[arg(value_name = "PATTERN")]
        pattern: String,

        #[arg(value_name = "URL", required = true)]
        urls: Vec<String>,
    },
}

#[derive(Subcommand)]
enum BrowsersCommands {
    /// List known browsers
    List,

    /// Scan the system for installed browsers and profiles
    Rescan,

    /// Hide a browser from the chooser
    Hide {
        #[arg(value_name = "IDENTITY")]
        identity: String,
    },

    /// Show a hidden browser again
    Show {
        #[arg(value_name = "IDENTITY")]
        identity: String,
    },

    /// Move a browser to another position
    Move {
        #[arg(value_name = "FROM")]
        from: usize,

        #[arg(value_name = "TO")]
        to: usize,
    },

    /// Set or clear the argument that opens a private window
    PrivateArg {
        /// Application id of the browser
        #[arg(value_name = "APP_ID")]
        app_id: String,

        /// Argument such as --incognito; omit to clear
        #[arg(value_name = "ARG", allow_hyphen_values = true)]
        arg: Option<String>,
    },

    /// Set or clear a browser's shortcut character
    Shortcut {
        /// Browser identity or 1-based position
        #[arg(value_name = "KEY")]
        browser: String,

        /// Shortcut character; omit to clear
        #[arg(value_name = "CHAR")]
        key: Option<String>,
    },
}

#[derive(Subcommand)]
enum AppsCommands {
    /// List companion apps
    List,

    /// Offer an app for one host
    Add {
        #[arg(value_name = "HOST")]
        host: String,

        #[arg(value_name = "APP")]
        app: PathBuf,

        /// Replace the URL scheme before handing it to the app
        #[arg(long, value_name = "SCHEME")]
        scheme: Option<String>,
    },

    /// Remove a companion app
    Remove {
        #[arg(value_name = "INDEX")]
        index: usize,
    },
}

#[derive(Subcommand)]
enum SettingsCommands {
    /// Write rules and browser settings to a file
    Export {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Read rules and browser settings from an exported file
    Import {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Delete all settings
    Reset {
        /// Skip confirmation prompt
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the effective configuration
    Show,

    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    let format = cli.format;
    let home = Home::resolve(cli.home)?;

    match cli.command {
        Commands::Open { urls, dry_run } => commands::open::execute(&home, &urls, dry_run, format),
        Commands::Choose { urls } => commands::choose::execute(&home, &urls, format),
        Commands::Launch {
            browser,
            incognito,
            dry_run,
            urls,
        } => commands::launch::execute(&home, &browser, incognito, dry_run, &urls, format),
        Commands::Rules { command } => match command {
            RulesCommands::List => commands::rules::list(&home, format),
            RulesCommands::Add {
                pattern,
                app,
                profile,
            } => commands::rules::add(&home, &pattern, app, profile.as_deref()),
            RulesCommands::Update {
                index,
                pattern,
                app,
                profile,
                no_profile,
            } => commands::rules::update(
                &home,
                index,
                commands::rules::RuleUpdate {
                    pattern,
                    app,
                    profile,
                    no_profile,
                },
            ),
            RulesCommands::Remove { index } => commands::rules::remove(&home, index),
            RulesCommands::Move { from, to } => commands::rules::move_rule(&home, from, to),
            RulesCommands::Test { pattern, urls } => commands::rules::test(&pattern, &urls, format),
        },
        Commands::Browsers { command } => match command {
            BrowsersCommands::List => commands::browsers::list(&home, format),
            BrowsersCommands::Rescan => commands::browsers::rescan(&home, format),
            BrowsersCommands::Hide { identity } => commands::browsers::set_hidden(&home, &identity, true),
            BrowsersCommands::Show { identity } => commands::browsers::set_hidden(&home, &identity, false),
            BrowsersCommands::Move { from, to } => commands::browsers::move_browser(&home, from, to),
            BrowsersCommands::PrivateArg { app_id, arg } => {
                commands::browsers::private_arg(&home, &app_id, arg.as_deref())
            }
            BrowsersCommands::Shortcut { browser, key } => {
                commands::browsers::shortcut(&home, &browser, key.as_deref())
            }
        },
        Commands::Apps { command } => match command {
            AppsCommands::List => commands::apps::list(&home, format),
            AppsCommands::Add { host, app, scheme } => commands::apps::add(&home, host, app, scheme),
            AppsCommands::Remove { index } => commands::apps::remove(&home, index),
        },
        Commands::Profiles { family } => commands::profiles::execute(family.as_deref(), format),
        Commands::Settings { command } => match command {
            SettingsCommands::Export { file } => commands::settings::export(&home, &file),
            SettingsCommands::Import { file } => commands::settings::import(&home, &file, format),
            SettingsCommands::Reset { force } => commands::settings::reset(&home, force),
        },
        Commands::Config { command } => match command {
            ConfigCommands::Show => commands::config::show(&home, format),
            ConfigCommands::Init { force } => commands::config::init(&home, force),
        },
        Commands::Completion { shell } => commands::completion::execute(shell, &mut Cli::command()),
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("handoff=debug,handoff_cli=debug,handoff_core=debug,handoff_browser=debug")
    } else {
        EnvFilter::new("handoff=warn,handoff_cli=warn,handoff_core=warn,handoff_browser=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}
