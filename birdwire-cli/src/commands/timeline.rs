use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use birdwire_sdk::RateLimitResponse;
use birdwire_sdk::client::{Client, TimelineQuery};
use birdwire_sdk::objects::timeline;

use super::{print_rate_limit, print_tweet, retry_rate_limited};

/// Page backwards through a user's timeline with `max_id`.
pub async fn user_timeline(
    client: &Client,
    screen_name: String,
    count: u32,
    pages: u32,
    out: Option<PathBuf>,
    extended: bool,
) -> anyhow::Result<()> {
    let mut query = TimelineQuery {
        count: Some(count),
        extended,
        ..TimelineQuery::for_screen_name(screen_name)
    };
    let mut writer = match &out {
        Some(path) => Some(BufWriter::new(File::create(path)?)),
        None => None,
    };

    let mut total = 0;
    for _ in 0..pages {
        let payload = retry_rate_limited(|| client.user_timeline(&query)).await?;
        let tweets = timeline(payload.value());
        if tweets.is_empty() {
            println!("No more results, end of timeline.");
            break;
        }

        for tweet in &tweets {
            total += 1;
            match writer.as_mut() {
                Some(writer) => writeln!(writer, "{}", serde_json::to_string(tweet)?)?,
                None => print_tweet(total, tweet),
            }
        }
        if payload.has_rate_limit() {
            println!(
                "Got {} Tweets, {} calls available.",
                tweets.len(),
                payload.rate_limit_remaining()
            );
        } else {
            println!("Got {} Tweets.", tweets.len());
        }

        // Older than the oldest tweet seen so far.
        let oldest = tweets.iter().map(|t| t.id()).min().unwrap_or(0);
        if oldest <= 1 {
            break;
        }
        query.max_id = Some(oldest - 1);
    }

    if let (Some(mut writer), Some(path)) = (writer, out) {
        writer.flush()?;
        println!("Wrote {total} Tweets to {}", path.display());
    }
    Ok(())
}

pub async fn home_timeline(client: &Client, count: u32, extended: bool) -> anyhow::Result<()> {
    let query = TimelineQuery {
        count: Some(count),
        extended,
        ..TimelineQuery::default()
    };
    let payload = client.home_timeline(&query).await?;
    for (i, tweet) in timeline(payload.value()).iter().enumerate() {
        print_tweet(i + 1, tweet);
    }
    print_rate_limit(&payload);
    Ok(())
}
