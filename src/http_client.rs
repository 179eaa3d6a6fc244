use http::{HeaderMap, Response};

use crate::errors::Error;

/// A http client
///
/// The transport underneath `EventHub`. One call sends exactly one request
/// and hands back the status and the whole body.
#[async_trait::async_trait]
pub trait HttpClient {
    type Err: Into<Error> + Send + 'static;

    async fn get(&self, headers: &HeaderMap, path: &str) -> Result<Response<Vec<u8>>, Self::Err>;

    async fn post(
        &self,
        headers: &HeaderMap,
        path: &str,
        body: &str,
    ) -> Result<Response<Vec<u8>>, Self::Err>;
}

/// Access to inner HttpClient
pub trait HaveHttpClient {
    type Client: HttpClient;
    fn http_client(&self) -> &Self::Client;
}
