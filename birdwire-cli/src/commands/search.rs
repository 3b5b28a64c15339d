use birdwire_sdk::client::Client;
use birdwire_sdk::objects::{QueryParams, SearchResults};

use super::{print_rate_limit, print_tweet, retry_rate_limited};

/// Print up to `pages` pages of results, following `next_results`.
pub async fn search(
    client: &Client,
    query: &str,
    result_type: Option<&str>,
    pages: u32,
) -> anyhow::Result<()> {
    let mut params: QueryParams = vec![("q".to_string(), query.to_string())];
    if let Some(result_type) = result_type {
        params.push(("result_type".to_string(), result_type.to_string()));
    }

    let mut index = 1;
    for _ in 0..pages {
        let payload = retry_rate_limited(|| client.search_page(&params)).await?;
        let Some(results) = SearchResults::from_value(payload.value()) else {
            anyhow::bail!("search response is not an object");
        };

        println!();
        for tweet in results.statuses() {
            print_tweet(index, &tweet);
            index += 1;
        }
        print_rate_limit(&payload);

        match results.next_query() {
            Ok(next) => params = next,
            Err(err) => {
                println!("No next query: {err}");
                break;
            }
        }
    }
    Ok(())
}
