//! Author display-name resolution.
//!
//! Each distinct author id is looked up once through the profile endpoint.
//! The name written to `profiles.json` is the author's guild nickname when
//! they have one in the channel's guild, otherwise their global display name,
//! otherwise their username.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

use crate::error::Result;
use crate::gateway::Gateway;
use crate::progress::{Progress, ProgressCallback, Stage};
use crate::snowflake::Snowflake;

/// Response of `GET /users/{id}/profile`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub user: ProfileUser,

    /// Present when the profile was requested with a guild the user belongs to.
    #[serde(default)]
    pub guild_member: Option<GuildMember>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The `user` object of a profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileUser {
    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub global_name: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The `guild_member` object of a profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuildMember {
    #[serde(default)]
    pub nick: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Profile {
    /// Creates a profile from its name fields.
    ///
    /// `nick` is `None` when there is no guild member object at all, and
    /// `Some(None)` when the member exists without a nickname.
    #[allow(clippy::option_option)]
    pub fn new(
        username: impl Into<String>,
        global_name: Option<&str>,
        nick: Option<Option<&str>>,
    ) -> Self {
        Self {
            user: ProfileUser {
                username: username.into(),
                global_name: global_name.map(str::to_string),
                extra: Map::new(),
            },
            guild_member: nick.map(|nick| GuildMember {
                nick: nick.map(str::to_string),
                extra: Map::new(),
            }),
            extra: Map::new(),
        }
    }

    /// The name to show for this user.
    ///
    /// ```
    /// use chatdump::profiles::Profile;
    ///
    /// let with_nick = Profile::new("robert", Some("robert123"), Some(Some("Bob")));
    /// assert_eq!(with_nick.display_name(), "Bob");
    ///
    /// let null_nick = Profile::new("robert", Some("robert123"), Some(None));
    /// assert_eq!(null_nick.display_name(), "robert123");
    /// ```
    pub fn display_name(&self) -> &str {
        self.guild_member
            .as_ref()
            .and_then(|member| member.nick.as_deref())
            .or(self.user.global_name.as_deref())
            .unwrap_or(&self.user.username)
    }
}

/// Resolves every author to a display name.
///
/// Profiles are fetched one at a time; the first failure aborts resolution.
pub fn resolve_names<G: Gateway + ?Sized>(
    gateway: &G,
    authors: &BTreeSet<Snowflake>,
    guild: Option<Snowflake>,
    progress: &ProgressCallback,
) -> Result<BTreeMap<Snowflake, String>> {
    let mut names = BTreeMap::new();

    for (index, &author) in authors.iter().enumerate() {
        let profile = gateway.user_profile(author, guild)?;
        let name = profile.display_name().to_string();
        info!("Resolved user_id '{}' to '{}'", author, name);

        progress(
            Progress::new(Stage::Profiles, index + 1)
                .with_total(authors.len())
                .with_detail(name.clone()),
        );
        names.insert(author, name);
    }

    Ok(names)
}
