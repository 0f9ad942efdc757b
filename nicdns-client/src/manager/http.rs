use crate::decode::FromResponse;
use crate::error::Result;
use crate::http_client::{ApiRequest, ApiResponse};

use super::DnsManager;

impl DnsManager {
    /// Send one authenticated request and decode the answer into `T`.
    ///
    /// A valid token is ensured first; a failed login aborts the call before
    /// anything is sent. `T` selects the decoding: `()` discards the body,
    /// `String`/`Vec<u8>` take plain text verbatim and
    /// [`Structured`](crate::Structured) deserializes JSON or XML.
    ///
    /// # Errors
    /// * `ClientError::Api` - non-2xx status with a JSON or XML error body
    /// * `ClientError::UnsupportedErrorContentType` - non-2xx with any other body
    /// * `ClientError::UnsupportedContentType` - 2xx with an unknown content type
    /// * `ClientError::ParseError` - the body does not fit `T`
    pub async fn perform<T: FromResponse>(&self, request: ApiRequest) -> Result<ApiResponse<T>> {
        let token = self.tokens.ensure_valid_token(&self.dispatcher).await?;
        self.dispatcher
            .execute(request, Some(&token))
            .await?
            .into_api_response()
    }
}
