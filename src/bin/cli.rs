use clap::Parser;

use owlet::client::{ClientMode, ClientOptions};

/// Interactive terminal client for the Owlet tutor service
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Base URL of the tutor service
    #[arg(long, default_value = "http://127.0.0.1:8000")]
    api_url: String,

    /// Interaction mode: 'chat' (with memory) or 'query' (stateless)
    #[arg(long, default_value = "chat")]
    mode: String,

    /// Fetch synthesized audio for each answer
    #[arg(long, default_value_t = false)]
    speak: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mode = match args.mode.to_lowercase().as_str() {
        "query" => ClientMode::Query,
        _ => ClientMode::Chat,
    };

    owlet::client::run(ClientOptions {
        api_url: args.api_url,
        mode,
        speak: args.speak,
    })
    .await
}
