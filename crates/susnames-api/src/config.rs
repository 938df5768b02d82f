//! Server configuration read from the environment.

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use susnames_room::RoomSettings;

use crate::error::AppError;

/// Attributes applied to every cookie the server issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CookiePolicy {
    /// Send the `Secure` attribute.
    pub secure: bool,
    /// Send the `HttpOnly` attribute.
    pub http_only: bool,
}

impl Default for CookiePolicy {
    fn default() -> Self {
        Self {
            secure: true,
            http_only: true,
        }
    }
}

/// Everything the server needs to start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Bind address.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Settings for every room created by this process.
    pub room: RoomSettings,
    /// Cookie attributes.
    pub cookies: CookiePolicy,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 9000,
            room: RoomSettings::default(),
            cookies: CookiePolicy::default(),
        }
    }
}

impl ServerConfig {
    /// Reads the configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is set to an unparsable
    /// value or the resulting room settings are unplayable.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`; unset keys keep their
    /// defaults.
    ///
    /// # Errors
    ///
    /// Same as [`ServerConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let defaults = Self::default();
        let room = RoomSettings {
            spy_target_count: parse_or(&lookup, "SPY_TARGET_COUNT", defaults.room.spy_target_count)?,
            counterspy_target_count: parse_or(
                &lookup,
                "COUNTERSPY_TARGET_COUNT",
                defaults.room.counterspy_target_count,
            )?,
            vote_duration: Duration::from_secs(parse_or(
                &lookup,
                "VOTE_DURATION_SECS",
                defaults.room.vote_duration.as_secs(),
            )?),
            outbound_capacity: parse_or(
                &lookup,
                "OUTBOUND_QUEUE_CAPACITY",
                defaults.room.outbound_capacity,
            )?,
            end_voting_threshold: lookup("END_VOTING_THRESHOLD")
                .map(|raw| parse("END_VOTING_THRESHOLD", &raw))
                .transpose()?,
        };
        room.validate()
            .map_err(|err| AppError::Config(err.to_string()))?;

        Ok(Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_or(&lookup, "PORT", defaults.port)?,
            room,
            cookies: CookiePolicy {
                secure: parse_or(&lookup, "SECURE_COOKIES", defaults.cookies.secure)?,
                http_only: parse_or(&lookup, "HTTP_ONLY_COOKIES", defaults.cookies.http_only)?,
            },
        })
    }

    /// The socket address to bind.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `host:port` is not a socket address.
    pub fn bind_addr(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))
    }
}

fn parse<T>(key: &str, raw: &str) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| AppError::Config(format!("{key} must be valid: {e}")))
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    lookup(key).map_or(Ok(default), |raw| parse(key, &raw))
}
