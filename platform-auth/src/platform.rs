//! Social platforms an account can be connected to, and their static OAuth endpoints.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{config_error, ConfigErrorKind, Error};

/// Known social platforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Youtube,
    Twitter,
    Instagram,
    Linkedin,
    Tiktok,
    Facebook,
    Pinterest,
}

/// Static OAuth endpoint data for a platform.
#[derive(Debug, Clone, PartialEq)]
pub struct PlatformEndpoints {
    /// Token endpoint used for the refresh grant. `None` means the platform
    /// cannot be refreshed through the standard grant.
    pub token_url: Option<&'static str>,
    /// Scopes requested at consent time.
    pub scopes: &'static [&'static str],
}

impl Platform {
    pub const ALL: [Platform; 7] = [
        Platform::Youtube,
        Platform::Twitter,
        Platform::Instagram,
        Platform::Linkedin,
        Platform::Tiktok,
        Platform::Facebook,
        Platform::Pinterest,
    ];

    /// Get the platform identifier string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Youtube => "youtube",
            Platform::Twitter => "twitter",
            Platform::Instagram => "instagram",
            Platform::Linkedin => "linkedin",
            Platform::Tiktok => "tiktok",
            Platform::Facebook => "facebook",
            Platform::Pinterest => "pinterest",
        }
    }

    /// Human readable name used in user-facing messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            Platform::Youtube => "YouTube",
            Platform::Twitter => "Twitter",
            Platform::Instagram => "Instagram",
            Platform::Linkedin => "LinkedIn",
            Platform::Tiktok => "TikTok",
            Platform::Facebook => "Facebook",
            Platform::Pinterest => "Pinterest",
        }
    }

    pub fn endpoints(&self) -> PlatformEndpoints {
        match self {
            Platform::Youtube => PlatformEndpoints {
                token_url: Some("https://oauth2.googleapis.com/token"),
                scopes: &[
                    "https://www.googleapis.com/auth/youtube.upload",
                    "https://www.googleapis.com/auth/youtube.readonly",
                    "https://www.googleapis.com/auth/userinfo.profile",
                ],
            },
            Platform::Twitter => PlatformEndpoints {
                token_url: Some("https://api.twitter.com/2/oauth2/token"),
                scopes: &["tweet.read", "tweet.write", "users.read", "offline.access"],
            },
            // Instagram publishing goes through the Facebook Graph login, which has
            // no standard refresh grant for Instagram tokens.
            Platform::Instagram => PlatformEndpoints {
                token_url: None,
                scopes: &["instagram_basic", "instagram_content_publish"],
            },
            Platform::Linkedin => PlatformEndpoints {
                token_url: Some("https://www.linkedin.com/oauth/v2/accessToken"),
                scopes: &["r_liteprofile", "w_member_social"],
            },
            Platform::Tiktok => PlatformEndpoints {
                token_url: Some("https://open.tiktokapis.com/v2/oauth/token/"),
                scopes: &["user.info.basic", "video.upload", "video.publish"],
            },
            Platform::Facebook => PlatformEndpoints {
                token_url: Some("https://graph.facebook.com/v18.0/oauth/access_token"),
                scopes: &[
                    "pages_show_list",
                    "pages_read_engagement",
                    "pages_manage_posts",
                    "instagram_basic",
                    "instagram_content_publish",
                ],
            },
            Platform::Pinterest => PlatformEndpoints {
                token_url: Some("https://api.pinterest.com/v5/oauth/token"),
                scopes: &["boards:read", "pins:read", "pins:write"],
            },
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Platform::ALL
            .into_iter()
            .find(|platform| platform.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| config_error(ConfigErrorKind::UnknownPlatform, value))
    }
}
