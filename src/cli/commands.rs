use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "baleen")]
#[command(about = "Document store for subscribed feeds and their posts")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Overrides for the configured database settings
#[derive(Args, Debug, Default)]
pub struct ConnectionArgs {
    /// Database name (overrides BALEEN_DB_NAME)
    #[arg(long, global = true)]
    pub db_name: Option<String>,

    /// Directory hosting the database (overrides BALEEN_DB_HOST)
    #[arg(long, global = true)]
    pub db_host: Option<String>,

    /// Database port (overrides BALEEN_DB_PORT)
    #[arg(long, global = true)]
    pub db_port: Option<u16>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage subscribed feeds
    Feeds {
        #[command(subcommand)]
        command: FeedCommands,
    },

    /// Manage stored posts
    Posts {
        #[command(subcommand)]
        command: PostCommands,
    },

    /// Show the resolved database connection
    Info,
}

#[derive(Subcommand)]
pub enum FeedCommands {
    /// Subscribe to a feed
    Add {
        /// Feed URL (xmlurl)
        xmlurl: String,

        /// Category the feed belongs to
        #[arg(short, long)]
        category: String,

        /// Feed type: rss, atom, xml or json
        #[arg(short = 't', long = "type")]
        feed_type: Option<String>,

        /// Feed title
        #[arg(long)]
        title: Option<String>,

        /// Website URL (htmlurl)
        #[arg(long)]
        html_url: Option<String>,
    },

    /// List all feeds
    List {
        /// Print records as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one feed as JSON
    Show {
        /// Feed ID or xmlurl
        key: String,
    },

    /// Remove a feed by ID
    Remove {
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum PostCommands {
    /// Store a post
    Add {
        /// Post URL
        url: String,

        /// File holding the post content, or '-' for stdin
        #[arg(long)]
        content_file: String,

        /// ID of the feed the post belongs to
        #[arg(long)]
        feed: Option<i64>,

        /// Post title
        #[arg(long)]
        title: Option<String>,

        /// Publication date (RFC 3339)
        #[arg(long)]
        pubdate: Option<String>,
    },

    /// List the posts of a feed
    List {
        /// Feed ID
        #[arg(long)]
        feed: i64,

        /// Print records as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one post as JSON
    Show {
        /// Post ID, URL or signature
        key: String,
    },

    /// Remove a post by ID
    Remove {
        id: i64,
    },
}
