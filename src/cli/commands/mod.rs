//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod clients;
mod documents;
mod email;
mod helpers;
mod init;
mod process;
mod queue;
mod serve;
mod status;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{load_settings_with_options, LoadOptions};

#[derive(Parser)]
#[command(name = "docsort")]
#[command(about = "Classify, rename and route client document uploads")]
#[command(version)]
pub struct Cli {
    /// Data directory (overrides config file and DOCSORT_DATA_DIR)
    #[arg(long, short = 'd', global = true)]
    data: Option<PathBuf>,

    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Resolve relative paths from current working directory instead of config file location
    #[arg(long, global = true)]
    cwd: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the data directory and store
    Init,

    /// Classify and rename documents
    Process {
        /// Files to process, in order
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// File the results into this client's portal
        #[arg(long = "as", value_name = "EMAIL")]
        client: Option<String>,

        /// Override the detected MIME type for every file
        #[arg(long)]
        mime: Option<String>,

        /// Extractor backend (synthetic, poppler)
        #[arg(long)]
        extractor: Option<String>,

        /// Seed the synthetic extractor for reproducible names
        #[arg(long)]
        seed: Option<u64>,

        /// Do not pause between files
        #[arg(long)]
        no_pacing: bool,

        /// Print results as JSON instead of a table
        #[arg(long)]
        json: bool,

        /// Copy each file into a sorted tree under DIR/processed
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,
    },

    /// List processed documents
    Documents {
        /// Folder to show (all, rdl, rcs, review)
        #[arg(short, long, default_value = "all")]
        folder: String,

        /// Show one client's portal instead of the anonymous session
        #[arg(long, value_name = "EMAIL", conflicts_with = "clients")]
        client: Option<String>,

        /// Show documents of every client (admin view)
        #[arg(long)]
        clients: bool,

        /// Clear the anonymous session documents
        #[arg(long, conflicts_with_all = ["client", "clients"])]
        clear: bool,
    },

    /// Manage client accounts
    Clients {
        #[command(subcommand)]
        command: ClientCommands,
    },

    /// Show documents waiting on an admin
    Queue {
        /// Only show one kind (all, password, review, error)
        #[arg(short, long, default_value = "all")]
        filter: String,
    },

    /// Mark a queue item as handled
    Resolve {
        /// Queue item ID (q_<document id>)
        id: String,
    },

    /// Show a client's notifications
    Notifications {
        /// Client email
        email: String,

        /// Mark all notifications read afterwards
        #[arg(long)]
        mark_read: bool,
    },

    /// Send emails through the email service
    Email {
        #[command(subcommand)]
        command: EmailCommands,
    },

    /// Show configuration and dashboard statistics
    Status,

    /// Start the HTTP API
    Serve {
        /// Bind address: port, host, or host:port (default from config)
        bind: Option<String>,
    },
}

#[derive(Subcommand)]
enum ClientCommands {
    /// List client accounts
    List,

    /// Register a client account
    Add {
        /// Client email
        email: String,

        /// Display name
        name: String,
    },
}

#[derive(Subcommand)]
enum EmailCommands {
    /// Render a template and send it
    Send {
        /// Recipient address
        recipient: String,

        /// Template name (password, completed_rdl, completed_rcs,
        /// review_unwanted, review_unknown, error, general)
        #[arg(short, long)]
        template: Option<String>,

        /// Portal document ID to fill the template from
        #[arg(long)]
        document: Option<String>,

        /// Filename to mention when no document is given
        #[arg(long, default_value = "")]
        filename: String,

        /// Print the email instead of sending it
        #[arg(long)]
        dry_run: bool,
    },

    /// Check that the email service is reachable
    Test,

    /// Show recently sent emails
    Log,

    /// List available templates
    Templates,
}

/// Parse arguments and run the selected command.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let options = LoadOptions {
        config_path: cli.config,
        use_cwd: cli.cwd,
        data: cli.data,
    };
    let (settings, config) = load_settings_with_options(options).await;

    match cli.command {
        Commands::Init => init::cmd_init(&settings, &config).await,
        Commands::Process {
            paths,
            client,
            mime,
            extractor,
            seed,
            no_pacing,
            json,
            output,
        } => {
            let options = process::ProcessOptions {
                client,
                mime,
                extractor,
                seed,
                no_pacing,
                json,
                output,
            };
            process::cmd_process(&settings, &paths, options).await
        }
        Commands::Documents {
            folder,
            client,
            clients,
            clear,
        } => {
            if clear {
                documents::cmd_clear(&settings).await
            } else if let Some(email) = client {
                documents::cmd_portal_documents(&settings, &email, &folder).await
            } else if clients {
                documents::cmd_client_documents(&settings, &folder).await
            } else {
                documents::cmd_session_documents(&settings, &folder).await
            }
        }
        Commands::Clients { command } => match command {
            ClientCommands::List => clients::cmd_clients_list(&settings).await,
            ClientCommands::Add { email, name } => {
                clients::cmd_clients_add(&settings, &email, &name).await
            }
        },
        Commands::Queue { filter } => queue::cmd_queue(&settings, &filter).await,
        Commands::Resolve { id } => queue::cmd_resolve(&settings, &id).await,
        Commands::Notifications { email, mark_read } => {
            clients::cmd_notifications(&settings, &email, mark_read).await
        }
        Commands::Email { command } => match command {
            EmailCommands::Send {
                recipient,
                template,
                document,
                filename,
                dry_run,
            } => {
                email::cmd_email_send(
                    &settings,
                    &recipient,
                    template.as_deref(),
                    document.as_deref(),
                    &filename,
                    dry_run,
                )
                .await
            }
            EmailCommands::Test => email::cmd_email_test(&settings).await,
            EmailCommands::Log => email::cmd_email_log(&settings).await,
            EmailCommands::Templates => email::cmd_email_templates(),
        },
        Commands::Status => status::cmd_status(&settings).await,
        Commands::Serve { bind } => {
            let bind = bind.unwrap_or_else(|| settings.bind.clone());
            serve::cmd_serve(&settings, &bind).await
        }
    }
}
