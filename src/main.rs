use std::fs;
use std::io::{self, Read};

use chrono::{DateTime, Utc};
use clap::Parser;

use baleen::cli::{Cli, Commands, FeedCommands, PostCommands};
use baleen::config::{Config, ConnectOptions};
use baleen::errors::{BaleenError, BaleenResult};
use baleen::services::{FeedService, NewFeed, NewPost, PostService};
use baleen::storage::sqlite::{database_path, SqliteFeedRepository, SqlitePostRepository};
use baleen::storage::{connect, SqliteStorage};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> BaleenResult<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::from_env()?;
    let options = ConnectOptions::from(&cli.connection);

    // Initialize storage
    let storage = connect(&config.database, &options)?;

    match cli.command {
        Commands::Feeds { command } => run_feeds(command, storage),
        Commands::Posts { command } => run_posts(command, storage),
        Commands::Info => cmd_info(&config, &options, &storage),
    }
}

fn run_feeds(command: FeedCommands, storage: SqliteStorage) -> BaleenResult<()> {
    let service = FeedService::new(SqliteFeedRepository::new(storage));

    match command {
        FeedCommands::Add {
            xmlurl,
            category,
            feed_type,
            title,
            html_url,
        } => {
            let feed = service.subscribe(NewFeed {
                xmlurl,
                category,
                feed_type,
                title,
                htmlurl: html_url,
            })?;

            println!("Feed added successfully!");
            println!("  ID: {}", feed.id.unwrap_or_default());
            println!("  Title: {}", feed.display_title());
            println!("  Type: {}", feed.feed_type);
            println!("  Category: {}", feed.category);
            Ok(())
        }
        FeedCommands::List { json } => {
            let feeds = service.list()?;

            if json {
                println!("{}", serde_json::to_string_pretty(&feeds)?);
                return Ok(());
            }

            if feeds.is_empty() {
                println!("No feeds configured.");
                return Ok(());
            }

            println!("Configured feeds:\n");
            for feed in feeds {
                println!(
                    "  {}. {} [{}] ({})",
                    feed.id.unwrap_or_default(),
                    feed.display_title(),
                    feed.feed_type,
                    feed.category
                );
                println!("    Feed: {}", feed.xmlurl);
                if let Some(htmlurl) = &feed.htmlurl {
                    println!("    Site: {}", htmlurl);
                }
                println!();
            }
            Ok(())
        }
        FeedCommands::Show { key } => {
            let feed = service
                .find(&key)?
                .ok_or_else(|| BaleenError::InvalidInput(format!("No feed matches '{}'", key)))?;
            println!("{}", serde_json::to_string_pretty(&feed)?);
            Ok(())
        }
        FeedCommands::Remove { id } => {
            let feed = service.unsubscribe(id)?;
            println!("Removed: {}", feed.display_title());
            Ok(())
        }
    }
}

fn run_posts(command: PostCommands, storage: SqliteStorage) -> BaleenResult<()> {
    let service = PostService::new(SqlitePostRepository::new(storage));

    match command {
        PostCommands::Add {
            url,
            content_file,
            feed,
            title,
            pubdate,
        } => {
            let content = read_content(&content_file)?;
            let pubdate = pubdate.as_deref().map(parse_pubdate).transpose()?;

            let post = service.record(NewPost {
                url,
                content,
                feed,
                title,
                pubdate,
            })?;

            println!("Post added successfully!");
            println!("  ID: {}", post.id.unwrap_or_default());
            println!("  URL: {}", post.url);
            println!("  Signature: {}", post.signature);
            Ok(())
        }
        PostCommands::List { feed, json } => {
            let posts = service.for_feed(feed)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&posts)?);
                return Ok(());
            }

            if posts.is_empty() {
                println!("No posts stored for feed {}.", feed);
                return Ok(());
            }

            for post in posts {
                println!(
                    "  {}. {}",
                    post.id.unwrap_or_default(),
                    post.title.as_deref().unwrap_or(&post.url)
                );
                println!("    URL: {}", post.url);
                println!("    Signature: {}", post.signature);
            }
            Ok(())
        }
        PostCommands::Show { key } => {
            let post = service
                .find(&key)?
                .ok_or_else(|| BaleenError::InvalidInput(format!("No post matches '{}'", key)))?;
            println!("{}", serde_json::to_string_pretty(&post)?);
            Ok(())
        }
        PostCommands::Remove { id } => {
            let post = service.remove(id)?;
            println!("Removed: {}", post.url);
            Ok(())
        }
    }
}

fn cmd_info(config: &Config, options: &ConnectOptions, storage: &SqliteStorage) -> BaleenResult<()> {
    let resolved = config.database.resolve(options);

    println!("Database: {}", resolved.name);
    println!("Host: {}", resolved.host);
    println!("Port: {}", resolved.port);
    println!("File: {}", database_path(&resolved).display());
    println!("Connected: {}", storage.location());

    Ok(())
}

fn read_content(source: &str) -> BaleenResult<String> {
    if source == "-" {
        let mut content = String::new();
        io::stdin().read_to_string(&mut content)?;
        return Ok(content);
    }
    Ok(fs::read_to_string(source)?)
}

fn parse_pubdate(raw: &str) -> BaleenResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| BaleenError::InvalidInput(format!("Invalid pubdate '{}': {}", raw, e)))
}
