//! Severity level definitions
//!
//! Levels are ordered most severe first: a smaller numeric value means a more
//! important message. The numeric order is fixed and never remapped.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(u8)]
pub enum Severity {
    /// Under attack
    Attack = 0,
    Critical = 1,
    Alert = 2,
    Emergency = 3,
    /// As a threshold, disables every level after it
    None = 4,
    Info = 5,
    Warn = 6,
    Error = 7,
    /// Under debug mode
    #[default]
    Debug = 8,
}

impl Severity {
    pub const ALL: [Severity; 9] = [
        Severity::Attack,
        Severity::Critical,
        Severity::Alert,
        Severity::Emergency,
        Severity::None,
        Severity::Info,
        Severity::Warn,
        Severity::Error,
        Severity::Debug,
    ];

    #[inline]
    pub const fn value(self) -> u8 {
        self as u8
    }

    /// Convert a raw numeric value; `None` (the `Option`) when out of range.
    pub fn from_value(value: u8) -> Option<Self> {
        Self::ALL.get(value as usize).copied()
    }

    /// `true` when `self` is at least as severe as `other`.
    #[inline]
    pub const fn is_at_least(self, other: Severity) -> bool {
        self.value() <= other.value()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Attack => "attack",
            Severity::Critical => "critical",
            Severity::Alert => "alert",
            Severity::Emergency => "emergency",
            Severity::None => "none",
            Severity::Info => "info",
            Severity::Warn => "warn",
            Severity::Error => "error",
            Severity::Debug => "debug",
        }
    }

    /// Tag for a raw numeric value; unknown values give the empty string.
    pub fn tag_for(value: u8) -> &'static str {
        Self::from_value(value).map(|s| s.as_str()).unwrap_or("")
    }

    /// Short marker prepended by the level-tagged emit methods.
    pub fn marker(&self) -> &'static str {
        match self {
            Severity::Attack => "[K] ",
            Severity::Critical => "[C] ",
            Severity::Alert => "[A] ",
            Severity::Emergency => "[M] ",
            Severity::None => "",
            Severity::Info => "[I] ",
            Severity::Warn => "[W] ",
            Severity::Error => "[E] ",
            Severity::Debug => "[D] ",
        }
    }

    #[cfg(feature = "console")]
    pub fn color_code(&self) -> colored::Color {
        use colored::Color::*;
        match self {
            Severity::Attack | Severity::Critical | Severity::Alert | Severity::Error => Red,
            Severity::Emergency => Magenta,
            Severity::None | Severity::Info => White,
            Severity::Warn => Yellow,
            Severity::Debug => Blue,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "attack" | "atk" => Ok(Severity::Attack),
            "critical" => Ok(Severity::Critical),
            "alert" => Ok(Severity::Alert),
            "emergency" => Ok(Severity::Emergency),
            "none" => Ok(Severity::None),
            "info" => Ok(Severity::Info),
            "warn" | "warning" => Ok(Severity::Warn),
            "error" | "err" => Ok(Severity::Error),
            "debug" | "dbg" => Ok(Severity::Debug),
            _ => Err(format!("Invalid severity: '{}'", s)),
        }
    }
}

impl Serialize for Severity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.value())
    }
}

impl<'de> Deserialize<'de> for Severity {
    /// Accepts either the numeric value or a tag such as `"warn"`.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u8),
            Tag(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Severity::from_value(n).ok_or_else(|| {
                serde::de::Error::custom(format!("severity value {} out of range 0..=8", n))
            }),
            Raw::Tag(tag) => tag.parse().map_err(serde::de::Error::custom),
        }
    }
}
