//! Subcommands.
//!
//! Each command drives one group of endpoints and prints what it gets back.
//! Paginating commands wait out rate limits instead of failing.

mod account;
mod lists;
mod search;
mod timeline;

use std::path::PathBuf;
use std::time::Duration;

use birdwire_sdk::RateLimitResponse;
use birdwire_sdk::client::{Client, ClientError, Payload};
use birdwire_sdk::objects::Tweet;
use birdwire_sdk::response::RateLimitError;
use clap::Subcommand;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc2822;

/// Never sleep less than this on a rate limit, so a skewed clock cannot
/// turn the wait into a request storm.
const MIN_WAIT: Duration = Duration::from_secs(10);

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Download a user's timeline, newest first
    Timeline {
        #[arg(long, default_value = "twitterapi")]
        screen_name: String,
        /// Tweets per request
        #[arg(long, default_value_t = 100)]
        count: u32,
        /// Maximum number of requests
        #[arg(long, default_value_t = 1)]
        pages: u32,
        /// Write tweets as JSON lines to this file instead of printing them
        #[arg(long)]
        out: Option<PathBuf>,
        /// Request untruncated text
        #[arg(long)]
        extended: bool,
    },
    /// Show the authenticating user's home timeline
    Home {
        #[arg(long, default_value_t = 20)]
        count: u32,
        #[arg(long)]
        extended: bool,
    },
    /// Search recent tweets, following the pagination cursor
    Search {
        #[arg(long, default_value = "twitterapi")]
        query: String,
        /// mixed, recent or popular
        #[arg(long)]
        result_type: Option<String>,
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
    /// List the lists a user owns
    Lists {
        /// Defaults to the authenticating user
        #[arg(long)]
        screen_name: Option<String>,
    },
    /// Show rate-limit windows for resource families (e.g. statuses,search)
    RateLimit {
        #[arg(value_delimiter = ',')]
        resources: Vec<String>,
    },
    /// Show the authenticating user
    Verify,
    /// Post a tweet
    Post {
        status: String,
        /// Tweet ID this is a reply to
        #[arg(long)]
        reply_to: Option<u64>,
        /// Image to upload and attach
        #[arg(long)]
        media: Option<PathBuf>,
    },
}

pub async fn run(client: &Client, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Timeline {
            screen_name,
            count,
            pages,
            out,
            extended,
        } => timeline::user_timeline(client, screen_name, count, pages, out, extended).await,
        Command::Home { count, extended } => {
            require_user(client, "home")?;
            timeline::home_timeline(client, count, extended).await
        }
        Command::Search {
            query,
            result_type,
            pages,
        } => search::search(client, &query, result_type.as_deref(), pages).await,
        Command::Lists { screen_name } => lists::ownerships(client, screen_name.as_deref()).await,
        Command::RateLimit { resources } => account::rate_limit_status(client, &resources).await,
        Command::Verify => {
            require_user(client, "verify")?;
            account::verify_credentials(client).await
        }
        Command::Post {
            status,
            reply_to,
            media,
        } => {
            require_user(client, "post")?;
            account::post(client, &status, reply_to, media.as_deref()).await
        }
    }
}

fn require_user(client: &Client, command: &str) -> anyhow::Result<()> {
    if client.is_user_context() {
        Ok(())
    } else {
        anyhow::bail!("`{command}` needs access_token and access_token_secret in the config file")
    }
}

/// Run `call` until it succeeds or fails with something other than a rate
/// limit.
async fn retry_rate_limited<F, Fut>(mut call: F) -> Result<Payload, ClientError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Payload, ClientError>>,
{
    loop {
        let err = match call().await {
            Ok(payload) => return Ok(payload),
            Err(err) => err,
        };
        if let Some(limit) = err.as_rate_limit() {
            wait_for_reset(limit).await;
            continue;
        }
        return Err(err);
    }
}

async fn wait_for_reset(limit: &RateLimitError) {
    let reset = limit.rate_limit_reset();
    let until_reset = reset - OffsetDateTime::now_utc() + time::Duration::SECOND;
    let wait = Duration::try_from(until_reset)
        .unwrap_or(MIN_WAIT)
        .max(MIN_WAIT);
    tracing::warn!(%reset, wait_secs = wait.as_secs(), "Rate limited, waiting for reset");
    tokio::time::sleep(wait).await;
}

fn format_time(at: OffsetDateTime) -> String {
    at.format(&Rfc2822).unwrap_or_else(|_| at.to_string())
}

fn print_tweet(index: usize, tweet: &Tweet<'_>) {
    let user = tweet.user();
    println!("{index}.) {}", tweet.display_text());
    println!(
        "From {} (@{}) at {}\n",
        user.name(),
        user.screen_name(),
        format_time(tweet.created_at())
    );
}

fn print_rate_limit(payload: &Payload) {
    if payload.has_rate_limit() {
        println!("Rate limit:           {}", payload.rate_limit());
        println!("Rate limit remaining: {}", payload.rate_limit_remaining());
        println!("Rate limit reset:     {}", format_time(payload.rate_limit_reset()));
    } else {
        println!("Could not parse rate limit from response.");
    }
}
