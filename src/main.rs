//! ssb-rpc - muxrpc frame encoder
//!
//! Encodes a single request or response frame and prints it as hex.

use clap::{Args, Parser, Subcommand, ValueEnum};
use ssb_rpc_protocol::{BodyType, CodecConfig, Encoder, RpcFlag};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ssb-rpc")]
#[command(about = "Encode Scuttlebutt RPC frames")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a request frame
    Request {
        /// Request number (allocated from 1 if omitted)
        #[arg(short, long)]
        number: Option<i32>,

        #[command(flatten)]
        flags: FlagArgs,

        /// Body, encoded as UTF-8
        body: String,
    },
    /// Encode a response frame
    Response {
        /// Number of the request being answered
        #[arg(short, long)]
        number: i32,

        /// Base flag byte, flags are applied on top of it
        #[arg(long, default_value_t = 0, value_parser = parse_byte)]
        flag_byte: u8,

        #[command(flatten)]
        flags: FlagArgs,

        /// Body, encoded as UTF-8
        body: String,
    },
}

#[derive(Args)]
struct FlagArgs {
    /// Set the stream flag
    #[arg(long)]
    stream: bool,

    /// Set the end/error flag
    #[arg(long)]
    end: bool,

    /// Body type
    #[arg(long = "type", value_enum)]
    body_type: Option<BodyTypeArg>,
}

#[derive(Clone, Copy, ValueEnum)]
enum BodyTypeArg {
    Binary,
    Utf8,
    Json,
}

impl From<BodyTypeArg> for BodyType {
    fn from(arg: BodyTypeArg) -> Self {
        match arg {
            BodyTypeArg::Binary => BodyType::Binary,
            BodyTypeArg::Utf8 => BodyType::Utf8String,
            BodyTypeArg::Json => BodyType::Json,
        }
    }
}

impl FlagArgs {
    fn to_flags(&self) -> Vec<RpcFlag> {
        let mut flags = Vec::new();
        if self.stream {
            flags.push(RpcFlag::STREAM);
        }
        if self.end {
            flags.push(RpcFlag::END);
        }
        if let Some(body_type) = self.body_type {
            flags.push(RpcFlag::BodyType(body_type.into()));
        }
        flags
    }
}

/// Accepts decimal or `0x`-prefixed hex.
fn parse_byte(s: &str) -> Result<u8, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("invalid flag byte '{}': {}", s, e))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match CodecConfig::load() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("Failed to load config: {}", e);
            return Err(e.into());
        }
    };
    tracing::debug!(max_body_len = config.max_body_len, "codec configured");

    let encoder = Encoder::new().with_config(config);

    let encoded = match cli.command {
        Commands::Request {
            number,
            flags,
            body,
        } => {
            let flags = flags.to_flags();
            match number {
                Some(n) => encoder.encode_request_with_number(body.into_bytes(), n, &flags),
                None => encoder.encode_request_str(&body, &flags),
            }
        }
        Commands::Response {
            number,
            flag_byte,
            flags,
            body,
        } => encoder.encode_response(body.into_bytes(), number, flag_byte, &flags.to_flags()),
    };

    match encoded {
        Ok(frame) => {
            println!("{}", hex::encode(&frame));
            Ok(())
        }
        Err(e) => {
            tracing::error!("Failed to encode frame: {}", e);
            Err(e.into())
        }
    }
}
