use crate::errors::{Error, TransportError};
use crate::http_client::HttpClient;
use http::{HeaderMap, Request, Response};
use hyper::Uri;
use std::str::FromStr;

#[allow(clippy::enum_variant_names)]
#[derive(Clone, Debug)]
enum Client {
    HttpClient(hyper::Client<hyper::client::HttpConnector>),
    #[cfg(feature = "ssl")]
    HttpsClient(hyper::Client<hyper_tls::HttpsConnector<hyper::client::HttpConnector>>),
}

impl Client {
    fn request(&self, req: Request<hyper::Body>) -> hyper::client::ResponseFuture {
        match self {
            Client::HttpClient(http_client) => http_client.request(req),
            #[cfg(feature = "ssl")]
            Client::HttpsClient(https_client) => https_client.request(req),
        }
    }
}

/// Http client using hyper
#[derive(Debug, Clone)]
pub struct HyperClient {
    /// http client
    client: Client,
    /// base connection address, without a trailing slash
    base: String,
}

fn parse_base(addr: &str) -> Result<String, Error> {
    let base = addr.trim_end_matches('/');
    match Uri::from_str(base) {
        Ok(uri) if uri.scheme().is_some() && uri.authority().is_some() => Ok(base.to_owned()),
        _ => Err(Error::illegal_input(format!("invalid EventHub url: {addr}"))),
    }
}

fn join_uri(base: &str, path: &str) -> Result<Uri, Error> {
    let joined = format!("{base}{path}");
    Uri::from_str(&joined)
        .map_err(|_| Error::illegal_input(format!("invalid request uri: {joined}")))
}

fn request_builder(
    method: &http::Method,
    uri: &Uri,
    headers: &HeaderMap,
) -> http::request::Builder {
    let mut request = Request::builder().method(method).uri(uri);
    for (name, value) in headers.iter() {
        request = request.header(name, value);
    }
    request
}

async fn fetch_body(resp: Response<hyper::Body>) -> Result<Response<Vec<u8>>, TransportError> {
    let (p, b) = resp.into_parts();
    let b = hyper::body::to_bytes(b).await?.to_vec();
    Ok(Response::from_parts(p, b))
}

impl HyperClient {
    fn new(client: Client, base: String) -> Self {
        Self { client, base }
    }

    #[cfg(feature = "ssl")]
    pub fn connect_with_ssl(addr: &str) -> Result<Self, Error> {
        let addr_https = addr.replacen("tcp://", "https://", 1);
        let url = parse_base(&addr_https)?;
        let https = hyper_tls::HttpsConnector::new();
        let client = hyper::Client::builder().build::<_, hyper::Body>(https);
        Ok(Self::new(Client::HttpsClient(client), url))
    }

    pub fn connect_with_http(addr: &str) -> Result<Self, Error> {
        // `tcp://host:port` is taken as plain http.
        let addr_http = addr.replacen("tcp://", "http://", 1);
        let url = parse_base(&addr_http)?;
        Ok(Self::new(Client::HttpClient(hyper::Client::new()), url))
    }

    async fn send(
        &self,
        method: http::Method,
        headers: &HeaderMap,
        path: &str,
        body: hyper::Body,
    ) -> Result<Response<Vec<u8>>, Error> {
        let url = join_uri(&self.base, path)?;
        let request = request_builder(&method, &url, headers)
            .body(body)
            .map_err(TransportError::from)?;
        let res = self
            .client
            .request(request)
            .await
            .map_err(TransportError::from)?;
        Ok(fetch_body(res).await?)
    }
}

#[async_trait::async_trait]
impl HttpClient for HyperClient {
    type Err = Error;

    async fn get(&self, headers: &HeaderMap, path: &str) -> Result<Response<Vec<u8>>, Self::Err> {
        self.send(http::Method::GET, headers, path, hyper::Body::empty())
            .await
    }

    async fn post(
        &self,
        headers: &HeaderMap,
        path: &str,
        body: &str,
    ) -> Result<Response<Vec<u8>>, Self::Err> {
        self.send(
            http::Method::POST,
            headers,
            path,
            hyper::Body::from(body.to_string()),
        )
        .await
    }
}
