//! Chat command handler.
//!
//! Interactive terminal conversation about one article at a time.

use super::articles::render_listing;
use super::Engine;
use chatbox_article::{ArticleListing, ArticleStore};
use chatbox_core::{config::AppConfig, AppError, AppResult};
use clap::Args;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

/// Chat interactively about an article
#[derive(Args, Debug)]
pub struct ChatCommand {
    /// Article to start with (default: choose from a list)
    pub article_id: Option<String>,
}

/// Parsed answer to the article menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Quit,
    /// Zero-based index into the listing
    Pick(usize),
    OutOfRange,
    NotANumber,
}

impl Selection {
    pub fn parse(input: &str, count: usize) -> Self {
        let input = input.trim();
        if input.eq_ignore_ascii_case("q") {
            return Self::Quit;
        }

        match input.parse::<usize>() {
            Ok(n) if (1..=count).contains(&n) => Self::Pick(n - 1),
            Ok(_) => Self::OutOfRange,
            Err(_) => Self::NotANumber,
        }
    }
}

/// What the user typed at the `You:` prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatInput {
    Quit,
    Change,
    Empty,
    Question(String),
}

impl ChatInput {
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        if input.eq_ignore_ascii_case("quit") {
            Self::Quit
        } else if input.eq_ignore_ascii_case("change") {
            Self::Change
        } else if input.is_empty() {
            Self::Empty
        } else {
            Self::Question(input.to_string())
        }
    }
}

enum Outcome {
    Quit,
    Change,
}

type Input = Lines<BufReader<Stdin>>;

impl ChatCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing chat command");

        let engine = Engine::from_config(config)?;
        let mut input = BufReader::new(tokio::io::stdin()).lines();

        let mut current = match &self.article_id {
            Some(id) => {
                let listing = find_listing(&engine, id).await?;
                print_selection(&listing);
                Some(listing)
            }
            None => None,
        };

        loop {
            let article = match current.take() {
                Some(article) => article,
                None => match select_article(&engine, &mut input).await? {
                    Some(article) => article,
                    None => return Ok(()),
                },
            };

            match converse(&engine, &article, &mut input).await? {
                Outcome::Quit => return Ok(()),
                Outcome::Change => continue,
            }
        }
    }
}

async fn find_listing(engine: &Engine, article_id: &str) -> AppResult<ArticleListing> {
    engine
        .store
        .list()
        .await?
        .into_iter()
        .find(|a| a.id == article_id)
        .ok_or_else(|| AppError::ArticleNotFound(article_id.to_string()))
}

/// Show the menu until the user picks an article or quits.
async fn select_article(engine: &Engine, input: &mut Input) -> AppResult<Option<ArticleListing>> {
    let articles = engine.store.list().await?;

    println!("\n=== Starting Article Chatbot ===");
    if articles.is_empty() {
        println!("No articles found. Use 'chatbox import <file>' to add some.");
        return Ok(None);
    }

    println!("Available articles:");
    println!("{}", render_listing(&articles));

    loop {
        let Some(line) =
            prompt_line(input, "\nEnter the number of the article you want to chat about (or 'q' to quit): ")
                .await?
        else {
            return Ok(None);
        };

        match Selection::parse(&line, articles.len()) {
            Selection::Quit => return Ok(None),
            Selection::Pick(index) => {
                let article = articles[index].clone();
                print_selection(&article);
                return Ok(Some(article));
            }
            Selection::OutOfRange => println!("Invalid selection. Please try again."),
            Selection::NotANumber => println!("Please enter a valid number."),
        }
    }
}

fn print_selection(article: &ArticleListing) {
    println!("\nSelected article:");
    println!("ID: {}", article.id);
    println!("Title: {}", article.title);
    println!("Summary: {}", article.summary);
}

async fn converse(engine: &Engine, article: &ArticleListing, input: &mut Input) -> AppResult<Outcome> {
    let mut session = engine.open_session(&article.id).await?;

    println!(
        "\nWelcome to the Article Chatbot! You're chatting about: {}",
        article.title
    );
    println!("Type 'quit' to exit or 'change' to select a different article.");

    loop {
        let Some(line) = prompt_line(input, "\nYou: ").await? else {
            return Ok(Outcome::Quit);
        };

        match ChatInput::parse(&line) {
            ChatInput::Quit => return Ok(Outcome::Quit),
            ChatInput::Change => return Ok(Outcome::Change),
            ChatInput::Empty => continue,
            ChatInput::Question(question) => {
                let answer = session.ask(&question).await;
                println!("\nBot: {}", answer);
            }
        }
    }
}

/// Print `prompt` and read one line; `None` at end of input.
async fn prompt_line(input: &mut Input, prompt: &str) -> AppResult<Option<String>> {
    print!("{}", prompt);
    std::io::stdout().flush()?;
    Ok(input.next_line().await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_parse() {
        assert_eq!(Selection::parse("q", 3), Selection::Quit);
        assert_eq!(Selection::parse(" Q ", 3), Selection::Quit);
        assert_eq!(Selection::parse("1", 3), Selection::Pick(0));
        assert_eq!(Selection::parse("3\n", 3), Selection::Pick(2));
        assert_eq!(Selection::parse("0", 3), Selection::OutOfRange);
        assert_eq!(Selection::parse("4", 3), Selection::OutOfRange);
        assert_eq!(Selection::parse("two", 3), Selection::NotANumber);
        assert_eq!(Selection::parse("-1", 3), Selection::NotANumber);
        assert_eq!(Selection::parse("1", 0), Selection::OutOfRange);
    }

    #[test]
    fn test_chat_input_parse() {
        assert_eq!(ChatInput::parse("quit"), ChatInput::Quit);
        assert_eq!(ChatInput::parse("QUIT "), ChatInput::Quit);
        assert_eq!(ChatInput::parse("Change"), ChatInput::Change);
        assert_eq!(ChatInput::parse("   "), ChatInput::Empty);
        assert_eq!(
            ChatInput::parse("  who wrote it? "),
            ChatInput::Question("who wrote it?".to_string())
        );
        assert_eq!(
            ChatInput::parse("quit now"),
            ChatInput::Question("quit now".to_string())
        );
    }
}
