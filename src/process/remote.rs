use reqwest::multipart::{Form, Part};

use crate::error::ScanError;

/// Client for the delegated processing service.
///
/// The service takes one frame per request as a multipart `file` field and
/// answers with the converted image bytes in the response body.
pub struct RemoteProcessor {
    client: reqwest::Client,
    endpoint: String,
}

impl RemoteProcessor {
    /// Build a client against the service endpoint.
    ///
    /// No request timeout is configured: a hung call stalls only the frame
    /// it belongs to, never the rest of the event loop.
    pub fn new(endpoint: impl Into<String>) -> Result<Self, ScanError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("film-scanner/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ScanError::RemoteProcessingFailure(e.to_string()))?;

        Ok(RemoteProcessor {
            client,
            endpoint: endpoint.into(),
        })
    }

    /// Submit one frame and return the converted bytes with their MIME type.
    ///
    /// Anything other than a success status with an image body is a
    /// `RemoteProcessingFailure`.
    pub async fn process(
        &self,
        name: &str,
        mime: &str,
        payload: &[u8],
    ) -> Result<(Vec<u8>, String), ScanError> {
        let part = Part::bytes(payload.to_vec())
            .file_name(name.to_string())
            .mime_str(mime)
            .map_err(|e| {
                ScanError::RemoteProcessingFailure(format!("invalid upload part: {}", e))
            })?;
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                ScanError::RemoteProcessingFailure(format!(
                    "request to {} failed: {}",
                    self.endpoint, e
                ))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ScanError::RemoteProcessingFailure(format!(
                "service answered {}: {}",
                status,
                body.trim()
            )));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("")
            .to_string();
        if !content_type.starts_with("image/") {
            return Err(ScanError::RemoteProcessingFailure(format!(
                "service answered with '{}' instead of an image",
                content_type
            )));
        }

        let bytes = response.bytes().await.map_err(|e| {
            ScanError::RemoteProcessingFailure(format!("failed to read service response: {}", e))
        })?;

        Ok((bytes.to_vec(), content_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unreachable_service_is_a_remote_failure() {
        // Nothing listens on this port; the transport error must map to
        // the remote-processing failure, not panic or hang.
        let service = RemoteProcessor::new("http://127.0.0.1:9/process").unwrap();
        let result = service.process("frame.png", "image/png", &[1, 2, 3]).await;
        assert!(matches!(
            result,
            Err(ScanError::RemoteProcessingFailure(_))
        ));
    }
}
