//! xknife CLI
//!
//! Base64 and unicode-escape conversion, and key lookup in JSON documents.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use xknife::text::to_utf16;
use xknife::EscapeOptions;

#[derive(Parser, Debug)]
#[command(name = "xknife")]
#[command(author = "Xiradorn")]
#[command(version)]
#[command(about = "Base64, unicode escape and JSON key extraction tool")]
struct Cli {
    /// Verbose output (debug logging on stderr)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Encode text as Base64 of its UTF-8 bytes
    Encode {
        /// Text to encode (default: stdin)
        text: Option<String>,

        /// Treat the input as `\uXXXX`-escaped UTF-16
        #[arg(short, long)]
        escaped: bool,
    },

    /// Decode Base64 into UTF-8 text
    Decode {
        /// Base64 to decode (default: stdin)
        base64: Option<String>,
    },

    /// Encode a binary file as Base64
    Blob {
        /// File to encode (default: stdin)
        #[arg(short = 'i', long)]
        input: Option<PathBuf>,
    },

    /// Escape text as `\uXXXX` sequences
    Escape {
        /// Text to escape (default: stdin)
        text: Option<String>,

        /// Escape whole code points instead of UTF-16 units
        #[arg(short, long)]
        surrogate_aware: bool,
    },

    /// Replace `\uXXXX` sequences with the characters they name
    Unescape {
        /// Escaped text (default: stdin)
        text: Option<String>,
    },

    /// Collect every value stored under the given keys in a JSON document
    Extract {
        /// Keys to look for
        #[arg(short, long = "key", required = true)]
        keys: Vec<String>,

        /// JSON file to search (default: stdin)
        #[arg(short = 'i', long)]
        input: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Encode { text, escaped } => {
            let text = text_argument(text)?;
            let units = if escaped {
                xknife::from_unicode_escape(&text)
            } else {
                to_utf16(&text)
            };
            match xknife::encode(&units) {
                Some(encoded) => println!("{}", encoded),
                None => bail!("Input contains lone surrogates"),
            }
        }
        Commands::Decode { base64 } => {
            let base64 = text_argument(base64)?;
            match xknife::decode(&to_utf16(base64.trim()))? {
                Some(text) => println!("{}", text),
                None => bail!("Input contains lone surrogates"),
            }
        }
        Commands::Blob { input } => {
            println!("{}", encode_blob(input)?);
        }
        Commands::Escape { text, surrogate_aware } => {
            let text = text_argument(text)?;
            let options = EscapeOptions { surrogate_aware };
            println!("{}", xknife::to_unicode_escape_with(&to_utf16(&text), &options));
        }
        Commands::Unescape { text } => {
            let text = text_argument(text)?;
            println!("{}", xknife::from_unicode_escape_to_string(&text));
        }
        Commands::Extract { keys, input } => {
            extract_keys(keys, input)?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Use the argument if given, otherwise read stdin without its final newline
fn text_argument(arg: Option<String>) -> Result<String> {
    if let Some(text) = arg {
        return Ok(text);
    }

    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .context("Failed to read stdin")?;
    if buffer.ends_with('\n') {
        buffer.pop();
        if buffer.ends_with('\r') {
            buffer.pop();
        }
    }
    Ok(buffer)
}

fn encode_blob(input: Option<PathBuf>) -> Result<String> {
    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;

    runtime.block_on(async {
        match input {
            Some(path) => {
                let file = tokio::fs::File::open(&path)
                    .await
                    .with_context(|| format!("Failed to open: {}", path.display()))?;
                xknife::blob_to_base64(file)
                    .await
                    .with_context(|| format!("Failed to encode: {}", path.display()))
            }
            None => xknife::blob_to_base64(tokio::io::stdin()).await,
        }
    })
}

fn extract_keys(keys: Vec<String>, input: Option<PathBuf>) -> Result<()> {
    let content = if let Some(input_path) = input {
        fs::read_to_string(&input_path)
            .with_context(|| format!("Failed to read: {}", input_path.display()))?
    } else {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    };

    let document: Value = serde_json::from_str(&content).context("Input is not valid JSON")?;
    let found = xknife::extract(&document, &keys);

    let output: serde_json::Map<String, Value> = found
        .into_iter()
        .map(|(key, values)| (key, Value::Array(values.into_iter().cloned().collect())))
        .collect();

    println!("{}", serde_json::to_string_pretty(&Value::Object(output))?);
    Ok(())
}
