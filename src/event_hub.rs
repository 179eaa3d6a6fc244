use crate::body;
use crate::codec::Codec;
use crate::errors::*;
use crate::event::{Event, DATE_KEY, EVENT_TYPE_KEY, EXTERNAL_USER_ID_KEY};
use crate::filter::FilterMap;
use crate::http_client::{HaveHttpClient, HttpClient};
use crate::hyper_client::HyperClient;
use crate::options::*;
use crate::response::{self, OK_RESPONSE};
use crate::user::User;
use crate::validate::{not_empty, not_null};
use http::header::{HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use http::{HeaderMap, Response};
use log::*;
use std::collections::BTreeMap;
use std::env;
use url::form_urlencoded;

/// The EventHub address used when `EVENTHUB_URL` is not set.
pub static DEFAULT_EVENTHUB_URL: &str = "http://localhost:8080";

const USER_KEYS_PATH: &str = "/users/keys";
const USER_VALUES_PATH: &str = "/users/values";
const USER_ALIAS_PATH: &str = "/users/alias";
const USER_ADD_OR_UPDATE_PATH: &str = "/users/add_or_update";
const USER_TIMELINE_PATH: &str = "/users/timeline";
const USER_FIND_PATH: &str = "/users/find";

const EVENT_KEYS_PATH: &str = "/events/keys";
const EVENT_TYPES_PATH: &str = "/events/types";
const EVENT_VALUES_PATH: &str = "/events/values";
const EVENT_FUNNEL_PATH: &str = "/events/funnel";
const EVENT_TRACK_PATH: &str = "/events/track";
const EVENT_BATCH_TRACK_PATH: &str = "/events/batch_track";
const EVENT_COHORT_PATH: &str = "/events/cohort";

const SERVER_STATS_PATH: &str = "/varz";

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// Handle to an EventHub server
#[derive(Debug)]
pub struct EventHub<C = HyperClient> {
    /// http client
    client: C,
    /// http headers used for any requests
    headers: HeaderMap,
    /// wire encoding shared by every request and response
    codec: Codec,
}

impl EventHub<HyperClient> {
    /// Connect to EventHub
    ///
    /// # Summary
    /// The server address is read from `EVENTHUB_URL`, falling back to
    /// [`DEFAULT_EVENTHUB_URL`]. `https://` addresses need the `ssl` feature.
    pub fn connect_with_defaults() -> Result<EventHub> {
        let url = env::var("EVENTHUB_URL").unwrap_or_else(|_| DEFAULT_EVENTHUB_URL.to_string());
        if url.starts_with("https://") {
            EventHub::connect_with_ssl(&url)
        } else {
            EventHub::connect_with_http(&url)
        }
    }

    /// Connect over plain HTTP, e.g. `http://localhost:8080`
    pub fn connect_with_http(addr: &str) -> Result<EventHub> {
        let client = HyperClient::connect_with_http(addr)?;
        Ok(EventHub::with_client(client))
    }

    #[cfg(feature = "ssl")]
    pub fn connect_with_ssl(addr: &str) -> Result<EventHub> {
        let client = HyperClient::connect_with_ssl(addr)?;
        Ok(EventHub::with_client(client))
    }

    #[cfg(not(feature = "ssl"))]
    pub fn connect_with_ssl(_addr: &str) -> Result<EventHub> {
        Err(TransportError::SslDisabled.into())
    }
}

impl<C: HttpClient + Sync> EventHub<C> {
    /// Use `client` as the transport
    pub fn with_client(client: C) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        Self {
            client,
            headers,
            codec: Codec::new(),
        }
    }

    /// Add a header sent with every request
    pub fn set_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.headers.insert(name, value);
    }

    pub fn codec(&self) -> &Codec {
        &self.codec
    }

    fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    fn form_headers(&self) -> HeaderMap {
        let mut headers = self.headers().clone();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(FORM_URLENCODED));
        headers
    }

    async fn get(&self, path: &str) -> Result<Response<Vec<u8>>> {
        debug!("GET {}", path);
        let res = self
            .http_client()
            .get(self.headers(), path)
            .await
            .map_err(Into::<Error>::into)?;
        response::check_status(res.status().as_u16(), OK_RESPONSE)?;
        Ok(res)
    }

    async fn post(&self, path: &str, body: &str) -> Result<Response<Vec<u8>>> {
        debug!("POST {} body: {}", path, body);
        let res = self
            .http_client()
            .post(&self.form_headers(), path, body)
            .await
            .map_err(Into::<Error>::into)?;
        response::check_status(res.status().as_u16(), OK_RESPONSE)?;
        Ok(res)
    }

    /// Add a user, or update the properties of an existing one
    ///
    /// # API
    /// POST /users/add_or_update
    pub async fn add_or_update_user(
        &self,
        user_id: &str,
        properties: &BTreeMap<String, String>,
    ) -> Result<()> {
        not_empty(user_id, "user id")?;
        if properties.contains_key(EXTERNAL_USER_ID_KEY) {
            return Err(Error::illegal_input(format!(
                "property key `{EXTERNAL_USER_ID_KEY}` is reserved"
            )));
        }
        let mut param = form_urlencoded::Serializer::new(String::new());
        param.append_pair(EXTERNAL_USER_ID_KEY, user_id);
        for (key, value) in properties {
            param.append_pair(key, value);
        }
        self.post(
            &format!("{}?{}", USER_ADD_OR_UPDATE_PATH, param.finish()),
            "",
        )
        .await?;
        Ok(())
    }

    /// Same as [`EventHub::add_or_update_user`] for a [`User`]
    pub async fn add_or_update(&self, user: &User) -> Result<()> {
        self.add_or_update_user(user.external_id(), user.properties())
            .await
    }

    /// List property keys over all users
    ///
    /// # API
    /// GET /users/keys
    pub async fn get_user_keys(&self) -> Result<Vec<String>> {
        let res = self.get(USER_KEYS_PATH).await?;
        response::string_list(Some(res.body().as_slice()))
    }

    /// List the values of one user property, optionally by prefix
    ///
    /// # API
    /// GET /users/values
    pub async fn get_user_values(&self, user_key: &str, prefix: Option<&str>) -> Result<Vec<String>> {
        not_empty(user_key, "user key")?;
        let mut param = form_urlencoded::Serializer::new(String::new());
        param.append_pair("user_key", user_key);
        if let Some(prefix) = prefix {
            param.append_pair("prefix", prefix);
        }
        let res = self
            .get(&format!("{}?{}", USER_VALUES_PATH, param.finish()))
            .await?;
        response::string_list(Some(res.body().as_slice()))
    }

    /// Map a new user id onto an existing user
    ///
    /// # API
    /// POST /users/alias
    pub async fn alias_user(&self, from_user_id: &str, to_user_id: &str) -> Result<()> {
        not_empty(from_user_id, "new user id")?;
        not_empty(to_user_id, "existing user id")?;
        let mut param = form_urlencoded::Serializer::new(String::new());
        param.append_pair("from_external_user_id", from_user_id);
        param.append_pair("to_external_user_id", to_user_id);
        self.post(&format!("{}?{}", USER_ALIAS_PATH, param.finish()), "")
            .await?;
        Ok(())
    }

    /// Events of one user, oldest first
    ///
    /// # API
    /// GET /users/timeline
    pub async fn get_user_timeline(
        &self,
        user_id: &str,
        options: &TimelineOptions,
    ) -> Result<Vec<Event>> {
        not_empty(user_id, "user id")?;
        let res = self
            .get(&format!(
                "{}?{}",
                USER_TIMELINE_PATH,
                options.to_url_params(user_id)
            ))
            .await?;
        response::event_list(&self.codec, Some(res.body().as_slice()))
    }

    /// Ids of the users matching every filter
    ///
    /// # API
    /// POST /users/find
    pub async fn get_users(&self, filters: &FilterMap) -> Result<Vec<String>> {
        not_empty(filters, "user filters")?;
        let res = self.post(USER_FIND_PATH, &body::user_find(filters)).await?;
        response::user_id_list(Some(res.body().as_slice()))
    }

    /// List property keys of one event type
    ///
    /// # API
    /// GET /events/keys
    pub async fn get_event_keys(&self, event_type: &str) -> Result<Vec<String>> {
        not_empty(event_type, "event type")?;
        let mut param = form_urlencoded::Serializer::new(String::new());
        param.append_pair(EVENT_TYPE_KEY, event_type);
        let res = self
            .get(&format!("{}?{}", EVENT_KEYS_PATH, param.finish()))
            .await?;
        response::string_list(Some(res.body().as_slice()))
    }

    /// List every event type seen by the server
    ///
    /// # API
    /// GET /events/types
    pub async fn get_event_types(&self) -> Result<Vec<String>> {
        let res = self.get(EVENT_TYPES_PATH).await?;
        response::string_list(Some(res.body().as_slice()))
    }

    /// List the values of one event property, optionally by prefix
    ///
    /// # API
    /// GET /events/values
    pub async fn get_event_values(
        &self,
        event_type: &str,
        event_key: &str,
        prefix: Option<&str>,
    ) -> Result<Vec<String>> {
        not_empty(event_type, "event type")?;
        not_empty(event_key, "event key")?;
        let mut param = form_urlencoded::Serializer::new(String::new());
        param.append_pair(EVENT_TYPE_KEY, event_type);
        param.append_pair("event_key", event_key);
        if let Some(prefix) = prefix {
            param.append_pair("prefix", prefix);
        }
        let res = self
            .get(&format!("{}?{}", EVENT_VALUES_PATH, param.finish()))
            .await?;
        response::string_list(Some(res.body().as_slice()))
    }

    /// Track one event
    ///
    /// The event type and user id must be set. The date is sent only when
    /// present.
    ///
    /// # API
    /// POST /events/track
    pub async fn track_event(&self, event: &Event) -> Result<()> {
        let (event_type, user_id) = trackable(event)?;
        let mut param = form_urlencoded::Serializer::new(String::new());
        param.append_pair(EVENT_TYPE_KEY, event_type);
        param.append_pair(EXTERNAL_USER_ID_KEY, user_id);
        if let Some(date) = event.date() {
            param.append_pair(DATE_KEY, &self.codec.format_date(date));
        }
        for (key, value) in event.properties() {
            param.append_pair(key, value);
        }
        self.post(&format!("{}?{}", EVENT_TRACK_PATH, param.finish()), "")
            .await?;
        Ok(())
    }

    /// Track several events with a single request
    ///
    /// # API
    /// POST /events/batch_track
    pub async fn batch_track_events(&self, events: &[Event]) -> Result<()> {
        not_empty(events, "events")?;
        for event in events {
            trackable(event)?;
        }
        self.post(EVENT_BATCH_TRACK_PATH, &body::batch_track(&self.codec, events))
            .await?;
        Ok(())
    }

    /// Per funnel step, how many users got that far
    ///
    /// # API
    /// POST /events/funnel
    pub async fn retrieve_event_funnel_counts(&self, options: &FunnelOptions) -> Result<Vec<i64>> {
        options.validate()?;
        let res = self
            .post(EVENT_FUNNEL_PATH, &body::funnel(&self.codec, options))
            .await?;
        response::int_list(Some(res.body().as_slice()))
    }

    /// Cohort table, one row per cohort
    ///
    /// Rows may have different lengths.
    ///
    /// # API
    /// POST /events/cohort
    pub async fn retrieve_event_cohort_table(
        &self,
        options: &CohortTableOptions,
    ) -> Result<Vec<Vec<i64>>> {
        options.validate()?;
        let res = self
            .post(EVENT_COHORT_PATH, &body::cohort_table(&self.codec, options))
            .await?;
        response::int_matrix(Some(res.body().as_slice()))
    }

    /// Server statistics, as the raw text the server renders
    ///
    /// # API
    /// GET /varz
    pub async fn get_server_stats(&self) -> Result<String> {
        let res = self.get(SERVER_STATS_PATH).await?;
        response::text(Some(res.body().as_slice()))
    }
}

fn trackable(event: &Event) -> Result<(&str, &str)> {
    let event_type = not_null(event.event_type(), "event type")?;
    let user_id = not_null(event.external_user_id(), "external user id")?;
    Ok((event_type, user_id))
}

impl<C: HttpClient> HaveHttpClient for EventHub<C> {
    type Client = C;
    fn http_client(&self) -> &Self::Client {
        &self.client
    }
}
