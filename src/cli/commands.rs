use clap::{Args, Subcommand};

/// Where to find the installation.
#[derive(Args, Debug, Clone)]
pub struct Target {
    /// TOML config file
    #[arg(long)]
    pub config: Option<String>,

    /// Data directory holding mel.db (overrides the config file)
    #[arg(long)]
    pub data_dir: Option<String>,
}

#[derive(Subcommand)]
pub enum AdminCommands {
    /// Initialize the database
    Init {
        #[command(flatten)]
        target: Target,

        /// Seed the passwordless demo account and sample projects
        #[arg(long)]
        demo: bool,

        /// Skip interactive prompts
        #[arg(long)]
        non_interactive: bool,
    },

    /// Grant or revoke the right to create projects
    Bless {
        #[command(flatten)]
        target: Target,

        /// Account to update
        user: String,

        /// Revoke instead of grant
        #[arg(long)]
        revoke: bool,
    },

    /// Reset an account's password
    Password {
        #[command(flatten)]
        target: Target,

        user: String,

        password: String,
    },

    /// Make a user the sole owner of a project
    Transfer {
        #[command(flatten)]
        target: Target,

        project: i64,

        user: String,
    },

    /// List the projects a user owns
    List {
        #[command(flatten)]
        target: Target,

        user: String,
    },
}
