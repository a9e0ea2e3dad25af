//! Chat command

use crate::{Config, Terminal};
use anyhow::{Result, bail};
use clap::Args;
use llm::Client;
use openai::OpenAI;
use runtime::{Outcome, Runtime, Session};
use std::io::{BufRead, Write};

/// Chat command arguments
#[derive(Debug, Args)]
pub struct ChatCmd {
    /// The model to use, overrides the config
    #[arg(short, long)]
    pub model: Option<String>,

    /// The sampling temperature, overrides the config
    #[arg(short, long)]
    pub temperature: Option<f32>,

    /// The message to send (if empty, starts interactive mode)
    pub message: Option<String>,
}

impl ChatCmd {
    /// Run the chat command
    pub async fn run(&self) -> Result<()> {
        let mut config = Config::load()?;
        if let Some(model) = &self.model {
            config.model.model = model.clone();
        }
        if let Some(temperature) = self.temperature {
            config.model.temperature = temperature;
        }

        let client = Client::new();
        let provider = provider(&config, client.clone())?;
        let registry = functions::registry(functions::Context {
            client,
            config: config.functions.clone(),
        });
        let runtime = Runtime::new(config.model.clone(), provider, registry);
        tracing::debug!("registered functions: {:?}", runtime.registry());
        let mut session = Session::new(config.system_prompt.clone());
        let mut terminal = Terminal::new();

        if let Some(message) = &self.message {
            return match runtime.turn(&mut session, message, &mut terminal).await {
                Outcome::Aborted(e) => Err(e.into()),
                outcome => {
                    report(&outcome);
                    Ok(())
                }
            };
        }

        let stdin = std::io::stdin();
        let mut stdout = std::io::stdout();
        loop {
            print!("> ");
            stdout.flush()?;

            let mut input = String::new();
            if stdin.lock().read_line(&mut input)? == 0 {
                break;
            }

            let input = input.trim();
            if input.is_empty() {
                continue;
            }
            match input {
                "/quit" | "/exit" => break,
                "/reset" => {
                    session.reset();
                    println!("Started a new chat.");
                    continue;
                }
                _ => {}
            }

            let outcome = runtime.turn(&mut session, input, &mut terminal).await;
            report(&outcome);
        }

        Ok(())
    }
}

/// Build the provider for the configured endpoint.
///
/// Only the OpenAI API itself insists on a key, local servers run without.
fn provider(config: &Config, client: Client) -> Result<OpenAI> {
    let endpoint = config.provider.endpoint.as_str();
    let key = config.key();
    if key.is_none() && endpoint == openai::endpoint::OPENAI {
        bail!(
            "missing API key for {endpoint}, set {} or provider.key in the config",
            crate::config::API_KEY_ENV
        );
    }
    OpenAI::new(client, endpoint, key.as_deref())
}

fn report(outcome: &Outcome) {
    match outcome {
        Outcome::Complete => {}
        Outcome::IterationLimit => {
            println!("(stopped after {} function calls)", runtime::MAX_ITERATIONS)
        }
        Outcome::Aborted(e) => eprintln!("error: {e}"),
    }
}
