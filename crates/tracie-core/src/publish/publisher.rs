//! Signed artifact uploads

use std::path::Path;

use chrono::Utc;
use reqwest::Url;
use tracing::info;

use super::signing::{http_date, sign, string_to_sign};
use super::{Credentials, PublishError};
use crate::config::{CiContext, UploadConfig};
use crate::recovery::{retry_async, RetryConfig};

/// A fully signed PUT request, ready to send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    pub url: String,
    pub resource: String,
    pub headers: Vec<(&'static str, String)>,
}

/// Uploads artifacts of the current CI job
#[derive(Debug, Clone)]
pub struct ArtifactPublisher {
    client: reqwest::Client,
    endpoint: String,
    credentials: Credentials,
    ci: CiContext,
    retry: RetryConfig,
}

impl ArtifactPublisher {
    /// Create a publisher for `endpoint` with explicit credentials
    pub fn new(
        endpoint: &str,
        credentials: Credentials,
        ci: CiContext,
        client: reqwest::Client,
    ) -> Result<Self, PublishError> {
        parse_endpoint(endpoint)?;
        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            credentials,
            ci,
            retry: RetryConfig::default(),
        })
    }

    /// Create a publisher from upload settings, loading the credentials of the endpoint host
    pub fn from_config(
        upload: &UploadConfig,
        ci: CiContext,
        client: reqwest::Client,
    ) -> Result<Self, PublishError> {
        let url = parse_endpoint(&upload.endpoint)?;
        let host = url.host_str().ok_or_else(|| PublishError::InvalidEndpoint {
            endpoint: upload.endpoint.clone(),
            message: "missing host".to_string(),
        })?;
        let credentials = Credentials::load(&upload.credentials_file, host)?;
        Self::new(&upload.endpoint, credentials, ci, client)
    }

    /// Set the retry policy used for uploads
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Object path of `key` for the current job
    pub fn resource(&self, key: &str) -> String {
        format!(
            "/artifacts/{}/{}/{}/{}",
            self.ci.project_path, self.ci.pipeline_id, self.ci.job_id, key
        )
    }

    /// Build the signed request for `key` at `date`
    pub fn sign_request(&self, key: &str, content_type: &str, date: &str) -> Result<SignedRequest, PublishError> {
        let resource = self.resource(key);
        let to_sign = string_to_sign(content_type, date, &self.credentials.session_token, &resource);
        let signature = sign(&self.credentials.secret_access_key, &to_sign)?;

        Ok(SignedRequest {
            url: format!("{}{}", self.endpoint, resource),
            headers: vec![
                ("Date", date.to_string()),
                ("Content-Type", content_type.to_string()),
                (
                    "Authorization",
                    format!("AWS {}:{}", self.credentials.access_key_id, signature),
                ),
                ("x-amz-security-token", self.credentials.session_token.clone()),
            ],
            resource,
        })
    }

    /// Upload `file` as `key`
    pub async fn upload(&self, file: &Path, key: &str, content_type: &str) -> Result<(), PublishError> {
        let data = tokio::fs::read(file).await.map_err(|source| PublishError::Io {
            path: file.to_path_buf(),
            source,
        })?;

        retry_async(&self.retry, "Artifact upload", || self.put(key, content_type, data.clone())).await
    }

    async fn put(&self, key: &str, content_type: &str, data: Vec<u8>) -> Result<(), PublishError> {
        // The date is part of the signature, so sign every attempt afresh
        let request = self.sign_request(key, content_type, &http_date(Utc::now()))?;
        info!("Uploading artifact to {}", request.url);

        let mut builder = self.client.put(&request.url).body(data);
        for (name, value) in &request.headers {
            builder = builder.header(*name, value);
        }

        let response = builder.send().await.map_err(|e| PublishError::Request {
            url: request.url.clone(),
            message: e.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PublishError::Status {
                url: request.url,
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

fn parse_endpoint(endpoint: &str) -> Result<Url, PublishError> {
    Url::parse(endpoint).map_err(|e| PublishError::InvalidEndpoint {
        endpoint: endpoint.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn publisher() -> ArtifactPublisher {
        ArtifactPublisher::new(
            "https://minio-packet.freedesktop.org/",
            Credentials::new("key", "secret", "token"),
            CiContext::new("mesa/mesa", "42", "1337"),
            reqwest::Client::new(),
        )
        .unwrap()
    }

    #[test]
    fn test_resource_path() {
        assert_eq!(
            publisher().resource("traces/abc.png"),
            "/artifacts/mesa/mesa/42/1337/traces/abc.png"
        );
    }

    #[test]
    fn test_signed_request() {
        let request = publisher()
            .sign_request("traces/abc.png", "image/png", "Tue, 20 Oct 2026 10:00:00 GMT")
            .unwrap();

        assert_eq!(
            request.url,
            "https://minio-packet.freedesktop.org/artifacts/mesa/mesa/42/1337/traces/abc.png"
        );
        assert!(request.headers.contains(&(
            "Authorization",
            "AWS key:Y/deSAl0ErNUXQJA45CobJOJN9w=".to_string()
        )));
        assert!(request.headers.contains(&("x-amz-security-token", "token".to_string())));
        assert!(request.headers.contains(&("Content-Type", "image/png".to_string())));
    }

    #[test]
    fn test_invalid_endpoint() {
        let err = ArtifactPublisher::new(
            "not a url",
            Credentials::new("k", "s", "t"),
            CiContext::default(),
            reqwest::Client::new(),
        )
        .unwrap_err();
        assert!(matches!(err, PublishError::InvalidEndpoint { .. }));
    }

    #[tokio::test]
    async fn test_missing_artifact() {
        let err = publisher()
            .upload(Path::new("/nonexistent/frame.png"), "traces/x.png", "image/png")
            .await
            .unwrap_err();
        assert!(matches!(err, PublishError::Io { .. }));
    }
}
