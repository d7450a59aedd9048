use chrono::{DateTime, NaiveTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Per-channel tri-state: `Inherit` falls through to the global setting,
/// `Enabled`/`Disabled` override it in both directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Toggle {
    #[default]
    Inherit,
    Enabled,
    Disabled,
}

/// A recurring daily window during which no notifications of any kind are
/// permitted. `start_time`/`end_time` are wall-clock times in `timezone`;
/// the window wraps overnight when start > end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuietHours {
    pub enabled: bool,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    pub timezone: Tz,
}

impl Default for QuietHours {
    fn default() -> Self {
        QuietHours {
            enabled: false,
            start_time: NaiveTime::MIN,
            end_time: NaiveTime::MIN,
            timezone: Tz::UTC,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalPreferences {
    pub mentions: bool,
    pub direct_messages: bool,
    pub quiet_hours: QuietHours,
}

impl Default for GlobalPreferences {
    fn default() -> Self {
        GlobalPreferences {
            mentions: true,
            direct_messages: true,
            quiet_hours: QuietHours::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelPreference {
    pub channel_id: String,
    pub mentions: Toggle,
    pub all_messages: Toggle,
    pub keywords: Vec<String>,
    pub muted_until: Option<DateTime<Utc>>,
}

impl ChannelPreference {
    /// An entry that changes nothing yet; upserts start from this.
    pub fn inherit(channel_id: impl Into<String>) -> Self {
        ChannelPreference {
            channel_id: channel_id.into(),
            mentions: Toggle::Inherit,
            all_messages: Toggle::Inherit,
            keywords: Vec::new(),
            muted_until: None,
        }
    }
}

/// A user's notification preferences within one workspace. The `Default`
/// value is also the implicit record substituted when nothing is stored:
/// mentions and direct messages on, quiet hours off, no channel overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceRecord {
    pub global: GlobalPreferences,
    pub channels: Vec<ChannelPreference>,
}

impl PreferenceRecord {
    /// The override entry for a channel, if the user has one. At most one
    /// entry exists per channel id.
    pub fn channel(&self, channel_id: &str) -> Option<&ChannelPreference> {
        self.channels.iter().find(|c| c.channel_id == channel_id)
    }
}

/// Field-level update to [`GlobalPreferences`]; `None` fields are untouched.
#[derive(Debug, Clone, Default)]
pub struct GlobalPreferencesUpdate {
    pub mentions: Option<bool>,
    pub direct_messages: Option<bool>,
    pub quiet_hours: Option<QuietHours>,
}

impl GlobalPreferencesUpdate {
    pub fn apply(self, global: &mut GlobalPreferences) {
        if let Some(mentions) = self.mentions {
            global.mentions = mentions;
        }
        if let Some(direct_messages) = self.direct_messages {
            global.direct_messages = direct_messages;
        }
        if let Some(quiet_hours) = self.quiet_hours {
            global.quiet_hours = quiet_hours;
        }
    }
}

/// Field-level update to one channel's entry. `muted_until` is doubly
/// optional: `Some(None)` clears an existing mute, `None` leaves it alone.
#[derive(Debug, Clone, Default)]
pub struct ChannelPreferenceUpdate {
    pub mentions: Option<Toggle>,
    pub all_messages: Option<Toggle>,
    pub keywords: Option<Vec<String>>,
    pub muted_until: Option<Option<DateTime<Utc>>>,
}

impl ChannelPreferenceUpdate {
    pub fn apply(self, pref: &mut ChannelPreference) {
        if let Some(mentions) = self.mentions {
            pref.mentions = mentions;
        }
        if let Some(all_messages) = self.all_messages {
            pref.all_messages = all_messages;
        }
        if let Some(keywords) = self.keywords {
            pref.keywords = keywords;
        }
        if let Some(muted_until) = self.muted_until {
            pref.muted_until = muted_until;
        }
    }
}

mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}
