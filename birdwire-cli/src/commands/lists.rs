use birdwire_sdk::client::Client;
use birdwire_sdk::objects::CursoredLists;

use super::retry_rate_limited;

/// Walk every page of `lists/ownerships`.
pub async fn ownerships(client: &Client, screen_name: Option<&str>) -> anyhow::Result<()> {
    let mut cursor = None;
    loop {
        let payload =
            retry_rate_limited(|| client.list_ownerships(screen_name, cursor, None)).await?;
        let Some(page) = CursoredLists::from_value(payload.value()) else {
            anyhow::bail!("list response is not an object");
        };

        for list in page.lists() {
            println!(
                "{} ({}): {} members, {} subscribers",
                list.full_name(),
                list.mode(),
                list.member_count(),
                list.subscriber_count()
            );
            let description = list.description();
            if !description.is_empty() {
                println!("    {description}");
            }
        }

        match page.next_cursor() {
            0 => break,
            next => cursor = Some(next),
        }
    }
    Ok(())
}
