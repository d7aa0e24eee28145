//! Blocking HTTP gateway for Discord API v9.

use std::io::{self, Write};
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{ChannelInfo, Downloader, Gateway, PageCursor};
use crate::config::ApiConfig;
use crate::error::{ExportError, Result};
use crate::message::Message;
use crate::profiles::Profile;
use crate::snowflake::Snowflake;

#[derive(Serialize)]
struct LoginRequest<'a> {
    login: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    token: Option<String>,
    #[serde(default)]
    mfa: bool,
}

/// Exchanges credentials for a session token via `POST /auth/login`.
///
/// Accounts that require multi-factor authentication get a ticket instead of
/// a token; that is reported as an authentication failure.
pub fn login(config: &ApiConfig, login: &str, password: &str) -> Result<String> {
    let client = build_client(config, HeaderMap::new())?;
    let url = format!("{}/auth/login", config.base_url());
    debug!(%url, "POST");

    let response = client
        .post(&url)
        .json(&LoginRequest { login, password })
        .send()?;
    let status = response.status();
    let body = response.text()?;

    if status != StatusCode::OK {
        return Err(ExportError::auth(status.as_u16(), body));
    }

    let parsed: LoginResponse = serde_json::from_str(&body)?;
    match parsed.token {
        Some(token) => Ok(token),
        None if parsed.mfa => Err(ExportError::auth(
            status.as_u16(),
            "multi-factor authentication is not supported; pass --token instead",
        )),
        None => Err(ExportError::auth(status.as_u16(), body)),
    }
}

/// Discord API client holding a session token.
///
/// Built once after login and shared by reference with every pipeline stage.
/// API requests carry the token; CDN downloads go through a second client
/// without it.
pub struct HttpGateway {
    api: Client,
    cdn: Client,
    base_url: String,
    page_limit: u8,
}

impl HttpGateway {
    /// Creates a gateway authenticated with `token`.
    pub fn new(config: &ApiConfig, token: &str) -> Result<Self> {
        let mut auth = HeaderValue::from_str(token)
            .map_err(|_| ExportError::auth(0, "session token contains invalid characters"))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        Ok(Self {
            api: build_client(config, headers)?,
            cdn: build_client(config, HeaderMap::new())?,
            base_url: config.base_url().to_string(),
            page_limit: config.page_limit,
        })
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, ?query, "GET");

        let response = self.api.get(&url).query(query).send()?;
        let status = response.status();
        let body = response.text()?;

        if status != StatusCode::OK {
            return Err(ExportError::api(status.as_u16(), body));
        }
        Ok(serde_json::from_str(&body)?)
    }
}

impl Gateway for HttpGateway {
    fn channel_info(&self, channel: Snowflake) -> Result<ChannelInfo> {
        self.get_json(&format!("/channels/{channel}"), &[])
    }

    fn messages(&self, channel: Snowflake, cursor: PageCursor) -> Result<Vec<Message>> {
        self.get_json(
            &format!("/channels/{channel}/messages"),
            &messages_query(cursor, self.page_limit),
        )
    }

    fn user_profile(&self, user: Snowflake, guild: Option<Snowflake>) -> Result<Profile> {
        self.get_json(&format!("/users/{user}/profile"), &profile_query(guild))
    }
}

impl Downloader for HttpGateway {
    fn download(&self, url: &str, sink: &mut dyn Write) -> Result<u64> {
        debug!(%url, "download");
        let mut response = self.cdn.get(url).send()?;
        let status = response.status();

        if status != StatusCode::OK {
            return Err(ExportError::download(url, status.as_u16()));
        }
        let bytes = io::copy(&mut response, sink)?;
        info!(url, bytes, "downloaded");
        Ok(bytes)
    }
}

fn build_client(config: &ApiConfig, headers: HeaderMap) -> Result<Client> {
    Ok(Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.timeout_secs))
        .default_headers(headers)
        .build()?)
}

/// Query string for a message page request.
fn messages_query(cursor: PageCursor, limit: u8) -> Vec<(&'static str, String)> {
    vec![
        ("limit", limit.to_string()),
        (cursor.param(), cursor.anchor().to_string()),
    ]
}

/// Query string for a profile request. Mutual guilds are always requested so
/// the response carries `guild_member`.
fn profile_query(guild: Option<Snowflake>) -> Vec<(&'static str, String)> {
    let mut query = Vec::with_capacity(3);
    if let Some(guild) = guild {
        query.push(("guild_id", guild.to_string()));
    }
    query.push(("with_mutual_guilds", "true".to_string()));
    query.push(("with_mutual_friends_count", "false".to_string()));
    query
}
