//! Interactive terminal client.
//!
//! A small REPL that talks to the tutor service: control words are
//! handled locally, everything else is sent to `/query` or `/chat`
//! and rendered with an emotion indicator.

use anyhow::{Context, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use colored::Colorize;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use serde::Deserialize;
use serde_json::json;

/// Which endpoint questions are sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientMode {
    /// Stateless `/query` calls.
    Query,
    /// `/chat` calls with a server-tracked session.
    Chat,
}

impl ClientMode {
    fn endpoint(&self) -> &'static str {
        match self {
            ClientMode::Query => "/query",
            ClientMode::Chat => "/chat",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            ClientMode::Query => "query",
            ClientMode::Chat => "chat",
        }
    }

    fn toggled(&self) -> ClientMode {
        match self {
            ClientMode::Query => ClientMode::Chat,
            ClientMode::Chat => ClientMode::Query,
        }
    }
}

/// Client start-up options.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Base URL of the tutor service.
    pub api_url: String,
    /// Initial mode.
    pub mode: ClientMode,
    /// Fetch synthesized audio for each answer.
    pub speak: bool,
}

#[derive(Deserialize)]
struct AnswerPayload {
    text: String,
    emotion: String,
    #[serde(default)]
    sources: Vec<String>,
    #[serde(default)]
    session_id: Option<String>,
}

#[derive(Deserialize)]
struct AudioPayload {
    audio_base64: String,
    format: String,
}

/// Interactive client holding one session identifier across turns.
pub struct TutorClient {
    http: reqwest::Client,
    api_url: String,
    mode: ClientMode,
    speak: bool,
    session_id: Option<String>,
}

impl TutorClient {
    pub fn new(options: ClientOptions) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: options.api_url.trim_end_matches('/').to_string(),
            mode: options.mode,
            speak: options.speak,
            session_id: None,
        }
    }

    /// Run the interaction loop until `exit` or end of input.
    pub async fn run(&mut self) -> Result<()> {
        println!("--- Welcome to the Conversational AI Tutor ---");
        println!(
            "Running in '{}' mode against {}. Type 'help' for commands.",
            self.mode.label(),
            self.api_url
        );

        let mut editor = DefaultEditor::new().context("cannot initialize line editor")?;

        loop {
            match editor.readline("> ") {
                Ok(line) => {
                    let input = line.trim();
                    if input.is_empty() {
                        continue;
                    }
                    let _ = editor.add_history_entry(input);

                    // control words never leave the client
                    match input.to_lowercase().as_str() {
                        "exit" => break,
                        "reset" => {
                            self.session_id = None;
                            println!("{}", "Session cleared.".dimmed());
                        }
                        "mode" => {
                            self.mode = self.mode.toggled();
                            self.session_id = None;
                            println!("Switched to '{}' mode.", self.mode.label());
                        }
                        "help" => print_help(),
                        _ => {
                            if let Err(cause) = self.ask(input).await {
                                eprintln!("{}", format!("Error contacting the API: {:#}", cause).red());
                                eprintln!("{}", "Make sure the backend server is running.".dimmed());
                            }
                        }
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                Err(cause) => return Err(cause).context("failed to read input"),
            }
        }

        println!("Goodbye!");
        Ok(())
    }

    async fn ask(&mut self, question: &str) -> Result<()> {
        let mut body = json!({ "question": question });
        if self.mode == ClientMode::Chat {
            if let Some(session_id) = &self.session_id {
                body["session_id"] = json!(session_id);
            }
        }

        let response = self
            .http
            .post(format!("{}{}", self.api_url, self.mode.endpoint()))
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        let answer: AnswerPayload = response.json().await?;

        if self.mode == ClientMode::Chat {
            if let Some(session_id) = &answer.session_id {
                self.session_id = Some(session_id.clone());
            }
        }

        self.render(&answer);

        if self.speak {
            match self.fetch_audio(&answer).await {
                Ok(Some(path)) => println!("{}", format!("(audio saved to {})", path).dimmed()),
                Ok(None) => println!("{}", "(no audio returned)".dimmed()),
                Err(cause) => eprintln!("{}", format!("(speech failed: {:#})", cause).dimmed()),
            }
        }

        Ok(())
    }

    fn render(&self, answer: &AnswerPayload) {
        let indicator = match answer.emotion.as_str() {
            "happy" => answer.emotion.green(),
            "explaining" => answer.emotion.blue(),
            "thinking" => answer.emotion.yellow(),
            "confused" => answer.emotion.red(),
            "encouraging" => answer.emotion.cyan(),
            _ => answer.emotion.normal(),
        };

        println!("\n[{}] {}", indicator, answer.text);
        if !answer.sources.is_empty() {
            println!("{}", format!("sources: {}", answer.sources.join(", ")).dimmed());
        }
        println!();
    }

    /// Fetch the spoken answer and drop it next to the session for playback.
    async fn fetch_audio(&self, answer: &AnswerPayload) -> Result<Option<String>> {
        let response = self
            .http
            .post(format!("{}/tts/base64", self.api_url))
            .json(&json!({ "text": answer.text, "emotion": answer.emotion }))
            .send()
            .await?
            .error_for_status()?;

        let audio: AudioPayload = response.json().await?;
        let bytes = BASE64_STANDARD
            .decode(audio.audio_base64.as_bytes())
            .context("service returned invalid base64 audio")?;

        if bytes.is_empty() {
            return Ok(None);
        }

        let path = std::env::temp_dir().join(format!("owlet-reply.{}", audio.format));
        std::fs::write(&path, bytes).context("cannot write audio file")?;
        Ok(Some(path.display().to_string()))
    }
}

fn print_help() {
    println!("Commands:");
    println!("  exit   quit the client");
    println!("  reset  clear the held session id");
    println!("  mode   toggle between 'chat' and 'query' mode");
    println!("  help   show this message");
    println!("Anything else is sent to the tutor.");
}

/// Build a client from options and run it.
pub async fn run(options: ClientOptions) -> Result<()> {
    TutorClient::new(options).run().await
}
