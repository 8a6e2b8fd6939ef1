use super::enter;
use crate::{
    cli::globals::Tab,
    flows::ChatSession,
    session::{Location, Route},
};
use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};

const COMMANDS_HINT: &str = "Type a message, or /new, /signout, /quit.";

pub async fn handle(tab: &mut Tab, messages: Vec<String>) -> Result<()> {
    enter(tab, &Location::new(Route::Chat))?;

    let store = tab.machine.store().clone();
    let mut session = ChatSession::open(store.clone(), tab.backends.clone());

    if session.first_visit() {
        let name = store.cached_profile().and_then(|profile| profile.name);
        match name {
            Some(name) => println!("Welcome, {name}! {COMMANDS_HINT}"),
            None => println!("Welcome! {COMMANDS_HINT}"),
        }
    }

    if !messages.is_empty() {
        for message in messages {
            if let Some(reply) = session.send(&message).await {
                println!("{}", reply.content);
            }
        }
        return Ok(());
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        // Another tab may have signed out since the last turn.
        store.hydrate();
        enter(tab, &Location::new(Route::Chat))?;

        match line.trim() {
            "/quit" => break,
            "/new" => {
                session.clear();
                println!("Started a new chat.");
            }
            "/signout" => {
                let transition = session.sign_out().await;
                if let Some(route) = tab.machine.follow(transition).await.landed {
                    println!("Signed out. Now at {route}");
                }
                return Ok(());
            }
            input => {
                if let Some(reply) = session.send(input).await {
                    println!("{}", reply.content);
                }
            }
        }
    }

    Ok(())
}
