use std::path::Path;

use anyhow::Context;
use birdwire_sdk::RateLimitResponse;
use birdwire_sdk::client::Client;
use birdwire_sdk::objects::conversions::{i64_value, map_value};
use birdwire_sdk::objects::{MediaResponse, Tweet, User};
use time::OffsetDateTime;

use super::{format_time, print_rate_limit};

/// Print every window in `application/rate_limit_status`, sorted by
/// endpoint.
pub async fn rate_limit_status(client: &Client, resources: &[String]) -> anyhow::Result<()> {
    let resources: Vec<&str> = resources.iter().map(String::as_str).collect();
    let payload = client.rate_limit_status(&resources).await?;
    let Some(root) = payload.value().as_map() else {
        anyhow::bail!("rate limit response is not an object");
    };

    let mut windows = Vec::new();
    for family in map_value(root, "resources").values() {
        let Some(endpoints) = family.as_map() else {
            continue;
        };
        for (endpoint, window) in endpoints {
            if let Some(window) = window.as_map() {
                windows.push((endpoint, window));
            }
        }
    }
    windows.sort_by(|a, b| a.0.cmp(b.0));

    for (endpoint, window) in windows {
        println!(
            "{endpoint}: {}/{} left, resets {}",
            i64_value(window, "remaining"),
            i64_value(window, "limit"),
            format_time(
                OffsetDateTime::from_unix_timestamp(i64_value(window, "reset"))
                    .unwrap_or(OffsetDateTime::UNIX_EPOCH)
            )
        );
    }
    Ok(())
}

pub async fn verify_credentials(client: &Client) -> anyhow::Result<()> {
    let payload = client.verify_credentials().await?;
    let Some(user) = User::from_value(payload.value()) else {
        anyhow::bail!("credentials response is not an object");
    };
    println!("{} (@{}), id {}", user.name(), user.screen_name(), user.id());
    println!(
        "{} followers, {} following, {} tweets",
        user.followers_count(),
        user.friends_count(),
        user.statuses_count()
    );
    print_rate_limit(&payload);
    Ok(())
}

pub async fn post(
    client: &Client,
    status: &str,
    reply_to: Option<u64>,
    media: Option<&Path>,
) -> anyhow::Result<()> {
    let payload = match media {
        Some(path) => {
            let media_id = upload(client, path).await?;
            client
                .update_status_with_media(status, &[media_id], reply_to)
                .await?
        }
        None => client.update_status(status, reply_to).await?,
    };
    let Some(tweet) = Tweet::from_value(payload.value()) else {
        anyhow::bail!("status response is not an object");
    };
    println!("Posted tweet {} at {}", tweet.id(), format_time(tweet.created_at()));
    Ok(())
}

async fn upload(client: &Client, path: &Path) -> anyhow::Result<u64> {
    let data = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "media".to_string());
    let payload = client
        .upload_media(data, &file_name, mime_type(path))
        .await?;
    let Some(media) = MediaResponse::from_value(payload.value()) else {
        anyhow::bail!("upload response is not an object");
    };
    println!("Uploaded {} ({} bytes)", media.media_id_string(), media.size());
    if payload.has_media_rate_limit() {
        println!(
            "Media rate limit: {}/{} until {}",
            payload.media_rate_limit_remaining(),
            payload.media_rate_limit(),
            format_time(payload.media_rate_limit_reset())
        );
    }
    Ok(media.media_id())
}

fn mime_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_type_from_extension() {
        assert_eq!(mime_type(Path::new("cat.PNG")), "image/png");
        assert_eq!(mime_type(Path::new("/tmp/photo.jpeg")), "image/jpeg");
        assert_eq!(mime_type(Path::new("noext")), "application/octet-stream");
    }
}
