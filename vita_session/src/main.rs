use std::io::{self, Write};

use chrono::Local;
use session::{Composer, Conversation, RelayClient, Role, SubmitOutcome};

mod env {
    pub const RELAY_URL: &str = "VITA_RELAY_URL";
}

const DEFAULT_RELAY_URL: &str = "http://localhost:3000";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let base_url =
        std::env::var(env::RELAY_URL).unwrap_or_else(|_| DEFAULT_RELAY_URL.to_string());
    let composer = Composer::new(RelayClient::new(&base_url)?);
    let mut conversation = Conversation::new();

    println!("Vita chat (relay = {base_url})");
    println!("   - Commands available: [ '.quit' ]");

    let stdin = io::stdin();

    loop {
        println!();
        print!("You: ");
        io::stdout().flush()?;

        let input_txt = read_line(&stdin);
        if input_txt == ".quit" {
            return Ok(());
        }

        match composer.submit(&mut conversation, &input_txt).await {
            SubmitOutcome::Resolved => print_last_reply(&conversation),
            SubmitOutcome::Ignored => continue,
        }
    }
}

fn read_line(stdin: &io::Stdin) -> String {
    let mut input_txt = String::new();
    while let Err(_) = stdin.read_line(&mut input_txt) {}
    input_txt.trim().to_string()
}

fn print_last_reply(conversation: &Conversation) {
    let last_reply = conversation
        .messages()
        .iter()
        .rev()
        .find(|message| message.role == Role::Bot);

    if let Some(message) = last_reply {
        let local_time = message.timestamp.with_timezone(&Local);
        println!("Bot [{}]: {}", local_time.format("%H:%M"), message.text);
    }
}
