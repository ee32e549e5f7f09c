pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "ignite")]
#[command(about = "Ignite CLI - key management and token tooling for the Ignite API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Generate a random base64 AES-256 key for ENCRYPTION_KEY")]
    Keygen,

    #[command(about = "Encrypt text with ENCRYPTION_KEY")]
    Encrypt {
        #[arg(help = "Plaintext to encrypt")]
        plaintext: String,
    },

    #[command(about = "Decrypt a payload produced by `encrypt` with ENCRYPTION_KEY")]
    Decrypt {
        #[arg(help = "Base64 payload (IV followed by ciphertext)")]
        payload: String,
    },

    #[command(about = "Issue and verify JWTs signed with JWT_SECRET_KEY")]
    Token {
        #[command(subcommand)]
        cmd: commands::token::TokenCommands,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Keygen => commands::keygen::handle(output_format),
        Commands::Encrypt { plaintext } => commands::crypt::encrypt(&plaintext, output_format),
        Commands::Decrypt { payload } => commands::crypt::decrypt(&payload, output_format),
        Commands::Token { cmd } => commands::token::handle(cmd, output_format),
    }
}
