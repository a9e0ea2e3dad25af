use anyhow::Result;
use clap::Parser;
use relay::{App, Command, Config, list_functions};

#[tokio::main]
async fn main() -> Result<()> {
    let app = App::parse();
    app.init_tracing();

    match app.command {
        Command::Chat(chat) => chat.run().await?,
        Command::Generate => Config::default().save()?,
        Command::Functions => list_functions(),
    }

    Ok(())
}
