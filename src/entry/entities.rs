use std::{fmt::Display, str::FromStr, sync::Arc};

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

use crate::utils::time::{parse_calendar_day, parse_instant};

pub const MIN_TITLE_CHARS: usize = 3;
pub const MIN_DESCRIPTION_CHARS: usize = 10;
pub const MIN_LEVEL: u8 = 1;
pub const MAX_LEVEL: u8 = 5;

/// Opaque identifier of an entry. Fresh ids are v4 uuids, but anything loaded from storage is
/// accepted as is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(Arc<str>);

impl EntryId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string().into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EntryId {
    fn from(value: &str) -> Self {
        Self(value.into())
    }
}

impl Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    Excited,
    Happy,
    #[default]
    Neutral,
    Tired,
    Frustrated,
    Sad,
}

impl Mood {
    pub const ALL: [Mood; 6] = [
        Mood::Excited,
        Mood::Happy,
        Mood::Neutral,
        Mood::Tired,
        Mood::Frustrated,
        Mood::Sad,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Excited => "excited",
            Mood::Happy => "happy",
            Mood::Neutral => "neutral",
            Mood::Tired => "tired",
            Mood::Frustrated => "frustrated",
            Mood::Sad => "sad",
        }
    }

    /// Position on the mood trend axis, `sad` at the bottom.
    pub fn score(&self) -> u8 {
        match self {
            Mood::Excited => 5,
            Mood::Happy => 4,
            Mood::Neutral => 3,
            Mood::Tired => 2,
            Mood::Frustrated => 1,
            Mood::Sad => 0,
        }
    }

    pub fn is_positive(&self) -> bool {
        matches!(self, Mood::Excited | Mood::Happy)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum WorkType {
    #[default]
    Work,
    Learning,
    Personal,
    Health,
    Social,
    Leisure,
}

impl WorkType {
    pub const ALL: [WorkType; 6] = [
        WorkType::Work,
        WorkType::Learning,
        WorkType::Personal,
        WorkType::Health,
        WorkType::Social,
        WorkType::Leisure,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkType::Work => "work",
            WorkType::Learning => "learning",
            WorkType::Personal => "personal",
            WorkType::Health => "health",
            WorkType::Social => "social",
            WorkType::Leisure => "leisure",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown {kind} `{value}`")]
pub struct UnknownVariant {
    kind: &'static str,
    value: String,
}

impl FromStr for Mood {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Mood::ALL
            .into_iter()
            .find(|v| v.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownVariant {
                kind: "mood",
                value: s.to_string(),
            })
    }
}

impl FromStr for WorkType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        WorkType::ALL
            .into_iter()
            .find(|v| v.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownVariant {
                kind: "work type",
                value: s.to_string(),
            })
    }
}

impl Display for Mood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Display for WorkType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// Unknown values land in the default bucket. Rows come from outside the core and one bad
// value shouldn't hide the whole collection.
impl<'de> Deserialize<'de> for Mood {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(raw.parse().unwrap_or_else(|e| {
            warn!("{e}, falling back to {}", Mood::default());
            Mood::default()
        }))
    }
}

impl<'de> Deserialize<'de> for WorkType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(raw.parse().unwrap_or_else(|e| {
            warn!("{e}, falling back to {}", WorkType::default());
            WorkType::default()
        }))
    }
}

/// One recorded activity. `date` is kept exactly as persisted; use [LogEntry::instant] to
/// compare it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: EntryId,
    pub title: String,
    pub description: String,
    pub mood: Mood,
    pub work_type: WorkType,
    pub energy_level: u8,
    pub meaning_level: u8,
    pub date: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user_id: Arc<str>,
}

impl LogEntry {
    /// Materializes a validated draft. Used by storage implementations when creating rows.
    pub fn from_draft(
        id: EntryId,
        user_id: Arc<str>,
        draft: LogDraft,
        now: DateTime<Utc>,
    ) -> Self {
        LogEntry {
            id,
            title: draft.title,
            description: draft.description,
            mood: draft.mood,
            work_type: draft.work_type,
            energy_level: draft.energy_level,
            meaning_level: draft.meaning_level,
            date: draft.date,
            created_at: now,
            updated_at: now,
            user_id,
        }
    }

    pub fn instant(&self) -> Option<DateTime<Utc>> {
        parse_instant(&self.date)
    }

    /// Applies a patch and re-checks the result. `updated_at` always moves to `now`, unless
    /// `now` is earlier than `created_at`.
    pub fn apply(&mut self, patch: LogPatch, now: DateTime<Utc>) -> Result<(), EntryValidationError> {
        let mut draft = self.to_draft();
        patch.apply_to(&mut draft);
        draft.validate()?;

        self.title = draft.title;
        self.description = draft.description;
        self.mood = draft.mood;
        self.work_type = draft.work_type;
        self.energy_level = draft.energy_level;
        self.meaning_level = draft.meaning_level;
        self.date = draft.date;
        self.updated_at = now.max(self.created_at);
        Ok(())
    }

    pub fn to_draft(&self) -> LogDraft {
        LogDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            mood: self.mood,
            work_type: self.work_type,
            energy_level: self.energy_level,
            meaning_level: self.meaning_level,
            date: self.date.clone(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EntryValidationError {
    #[error("title must have at least {} characters", MIN_TITLE_CHARS)]
    TitleTooShort,
    #[error("description must have at least {} characters", MIN_DESCRIPTION_CHARS)]
    DescriptionTooShort,
    #[error("{field} must be between {} and {}, got {value}", MIN_LEVEL, MAX_LEVEL)]
    LevelOutOfRange { field: &'static str, value: u8 },
    #[error("date `{0}` can't be parsed")]
    InvalidDate(String),
}

/// User submitted fields of a new entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogDraft {
    pub title: String,
    pub description: String,
    pub mood: Mood,
    pub work_type: WorkType,
    pub energy_level: u8,
    pub meaning_level: u8,
    pub date: String,
}

impl LogDraft {
    pub fn validate(&self) -> Result<(), EntryValidationError> {
        if self.title.trim().chars().count() < MIN_TITLE_CHARS {
            return Err(EntryValidationError::TitleTooShort);
        }
        if self.description.trim().chars().count() < MIN_DESCRIPTION_CHARS {
            return Err(EntryValidationError::DescriptionTooShort);
        }
        check_level("energy_level", self.energy_level)?;
        check_level("meaning_level", self.meaning_level)?;
        if parse_calendar_day(&self.date).is_none() {
            return Err(EntryValidationError::InvalidDate(self.date.clone()));
        }
        Ok(())
    }
}

fn check_level(field: &'static str, value: u8) -> Result<(), EntryValidationError> {
    if (MIN_LEVEL..=MAX_LEVEL).contains(&value) {
        Ok(())
    } else {
        Err(EntryValidationError::LevelOutOfRange { field, value })
    }
}

/// Partial update. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub mood: Option<Mood>,
    pub work_type: Option<WorkType>,
    pub energy_level: Option<u8>,
    pub meaning_level: Option<u8>,
    pub date: Option<String>,
}

impl LogPatch {
    pub fn is_empty(&self) -> bool {
        *self == LogPatch::default()
    }

    fn apply_to(self, draft: &mut LogDraft) {
        if let Some(v) = self.title {
            draft.title = v;
        }
        if let Some(v) = self.description {
            draft.description = v;
        }
        if let Some(v) = self.mood {
            draft.mood = v;
        }
        if let Some(v) = self.work_type {
            draft.work_type = v;
        }
        if let Some(v) = self.energy_level {
            draft.energy_level = v;
        }
        if let Some(v) = self.meaning_level {
            draft.meaning_level = v;
        }
        if let Some(v) = self.date {
            draft.date = v;
        }
    }
}
