mod cli;

use chrono_tz::Tz;
use clap::Parser;
use cli::{Cli, Commands};
use log::error;
use redstream::auth::DEFAULT_SCOPES;
use redstream::client::{RedditClient, RedditClientError};
use redstream::config::AppConfig;
use redstream::operations::{authorize, comments, info, posts, reply, stream, submit};
use std::process::ExitCode;
use std::time::Duration;

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let zone: Tz = match cli.tz.parse() {
        Ok(zone) => zone,
        Err(_) => {
            error!("Unknown time zone {:?}", cli.tz);
            return ExitCode::FAILURE;
        }
    };

    match run(cli.command, zone).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}

async fn run(command: Commands, zone: Tz) -> Result<(), RedditClientError> {
    let config = AppConfig::load();

    match command {
        Commands::Authorize { port, scopes } => {
            let options = authorize::AuthorizeOptions {
                port,
                scopes: scopes.unwrap_or_else(|| DEFAULT_SCOPES.to_string()),
            };
            authorize::handle_authorize_command(options, config).await
        }
        Commands::Posts {
            target,
            count,
            sort,
            time,
            brief,
        } => {
            let options = posts::PostsOptions {
                target,
                count,
                sort,
                window: time,
                brief,
                zone,
            };
            posts::handle_posts_command(options, connect(&config)?).await
        }
        Commands::Comments {
            target,
            count,
            sort,
            time,
        } => {
            let options = comments::CommentsOptions {
                target,
                count,
                sort,
                window: time,
                zone,
            };
            comments::handle_comments_command(options, connect(&config)?).await
        }
        Commands::Stream {
            target,
            comments,
            limit,
            interval,
        } => {
            let options = stream::StreamOptions {
                target,
                kind: if comments {
                    stream::StreamKind::Comments
                } else {
                    stream::StreamKind::Posts
                },
                limit,
                interval: interval.map(Duration::from_secs),
                zone,
            };
            stream::handle_stream_command(options, connect(&config)?).await
        }
        Commands::Info { target } => {
            let options = info::InfoOptions { target, zone };
            info::handle_info_command(options, connect(&config)?).await
        }
        Commands::Submit {
            subreddit,
            title,
            text,
        } => {
            let options = submit::SubmitOptions {
                subreddit,
                title,
                text,
            };
            submit::handle_submit_command(options, connect(&config)?).await
        }
        Commands::Reply { thing_id, text } => {
            let options = reply::ReplyOptions { thing_id, text };
            reply::handle_reply_command(options, connect(&config)?).await
        }
    }
}

/// Build a client from the loaded configuration, using stored tokens when present.
fn connect(config: &AppConfig) -> Result<RedditClient, RedditClientError> {
    RedditClient::from_config(config).map_err(|err| {
        error!("Failed to create client: {}", err);
        err
    })
}
