mod commands;

pub use commands::{Cli, Commands, ConnectionArgs, FeedCommands, PostCommands};

use crate::config::ConnectOptions;

impl From<&ConnectionArgs> for ConnectOptions {
    fn from(args: &ConnectionArgs) -> Self {
        ConnectOptions {
            name: args.db_name.clone(),
            host: args.db_host.clone(),
            port: args.db_port,
        }
    }
}
