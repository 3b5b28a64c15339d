//! Media uploads.

use reqwest::multipart::{Form, Part};

use super::{API_PREFIX, Client, ClientError, Payload, push_param};

/// Simple upload endpoint, relative to the upload host.
pub const MEDIA_UPLOAD_PATH: &str = "1.1/media/upload.json";

impl Client {
    /// `POST 1.1/media/upload.json` on the upload host: upload one image in
    /// a single request. Needs user credentials.
    ///
    /// The body decodes as a
    /// [`MediaResponse`](birdwire_core::objects::MediaResponse) and the
    /// headers carry the media rate-limit window.
    #[tracing::instrument(skip(self, data), fields(bytes = data.len()), err)]
    pub async fn upload_media(
        &self,
        data: Vec<u8>,
        file_name: &str,
        mime_type: &str,
    ) -> Result<Payload, ClientError> {
        let part = Part::bytes(data)
            .file_name(file_name.to_string())
            .mime_str(mime_type)?;
        let form = Form::new().part("media", part);
        let url = self.upload_base_url.join(MEDIA_UPLOAD_PATH)?;
        self.send_multipart(url.as_str(), &[], form).await
    }

    /// `POST 1.1/statuses/update.json` with previously uploaded media
    /// attached.
    pub async fn update_status_with_media(
        &self,
        status: &str,
        media_ids: &[u64],
        in_reply_to_status_id: Option<u64>,
    ) -> Result<Payload, ClientError> {
        let mut form = vec![("status".to_string(), status.to_string())];
        if !media_ids.is_empty() {
            let ids: Vec<String> = media_ids.iter().map(u64::to_string).collect();
            form.push(("media_ids".to_string(), ids.join(",")));
        }
        push_param(&mut form, "in_reply_to_status_id", in_reply_to_status_id);
        self.post_form(&format!("{API_PREFIX}statuses/update.json"), &form)
            .await
    }
}
