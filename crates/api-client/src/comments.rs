//! Comment service
//!
//! The [`CommentApi`] trait is the boundary between the comment engine and
//! the remote API. [`HttpCommentApi`] implements it over REST.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::http::{ApiError, ApiRequest, ClientConfig, HttpClient};
use crate::types::Comment;

/// Result type for comment API operations
pub type Result<T> = std::result::Result<T, ApiError>;

/// Input for creating a comment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    /// Post the comment is attached to
    pub subject_id: String,
    /// Trimmed comment text
    pub content: String,
    /// Parent comment id when replying
    pub parent_id: Option<String>,
}

/// Remote operations on a post's comment thread
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait CommentApi: Send + Sync {
    /// Fetch every comment for a subject, in server order
    async fn fetch_comments(&self, subject_id: &str) -> Result<Vec<Comment>>;

    /// Create a comment or a reply and return it as stored by the server
    async fn create_comment(&self, input: NewComment) -> Result<Comment>;

    /// Delete a comment by id
    async fn delete_comment(&self, comment_id: &str) -> Result<()>;
}

// =============================================================================
// Wire envelopes
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateCommentBody<'a> {
    post_id: &'a str,
    content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parent_id: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct FetchCommentsResponse {
    success: bool,
    #[serde(default)]
    comments: Vec<Comment>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CreateCommentResponse {
    success: bool,
    #[serde(default)]
    comment: Option<Comment>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AckResponse {
    success: bool,
    #[serde(default)]
    message: Option<String>,
}

/// Map an unsuccessful envelope to an error
fn ensure_success(success: bool, status: u16, message: Option<String>) -> Result<()> {
    if success {
        Ok(())
    } else {
        Err(ApiError::new(
            status,
            "Unsuccessful",
            message.unwrap_or_else(|| "request was not successful".to_string()),
        ))
    }
}

// =============================================================================
// HTTP implementation
// =============================================================================

/// REST implementation of [`CommentApi`]
///
/// # Example
///
/// ```rust,no_run
/// use api_client::{ClientConfig, CommentApi, HttpCommentApi};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = ClientConfig::new("http://localhost:5000/api").with_bearer_token("token");
///     let api = HttpCommentApi::new(config)?;
///
///     let comments = api.fetch_comments("p1").await?;
///     println!("{} comments", comments.len());
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct HttpCommentApi {
    client: HttpClient,
}

impl HttpCommentApi {
    /// Create a service from a client configuration
    pub fn new(config: ClientConfig) -> Result<Self> {
        Ok(Self {
            client: HttpClient::new(config)?,
        })
    }

    /// Wrap an existing HTTP client
    pub fn with_client(client: HttpClient) -> Self {
        Self { client }
    }

    /// Get the underlying HTTP client
    pub fn client(&self) -> &HttpClient {
        &self.client
    }
}

#[async_trait]
impl CommentApi for HttpCommentApi {
    async fn fetch_comments(&self, subject_id: &str) -> Result<Vec<Comment>> {
        let path = format!("/comments/{}", urlencoding::encode(subject_id));
        let response = self
            .client
            .execute::<FetchCommentsResponse>(ApiRequest::get(path))
            .await?;

        let envelope = response.data;
        ensure_success(envelope.success, response.status, envelope.message)?;
        Ok(envelope.comments)
    }

    async fn create_comment(&self, input: NewComment) -> Result<Comment> {
        let body = CreateCommentBody {
            post_id: &input.subject_id,
            content: &input.content,
            parent_id: input.parent_id.as_deref(),
        };

        let request = ApiRequest::post("/comments")
            .json_body(&body)
            .map_err(|e| ApiError::new(0, "SerializationError", e.to_string()))?;

        let response = self.client.execute::<CreateCommentResponse>(request).await?;

        let envelope = response.data;
        ensure_success(envelope.success, response.status, envelope.message)?;
        envelope.comment.ok_or_else(|| {
            ApiError::new(response.status, "ParseError", "response is missing the created comment")
        })
    }

    async fn delete_comment(&self, comment_id: &str) -> Result<()> {
        let path = format!("/comments/{}", urlencoding::encode(comment_id));
        let response = self
            .client
            .execute::<AckResponse>(ApiRequest::delete(path))
            .await?;

        ensure_success(response.data.success, response.status, response.data.message)
    }
}
