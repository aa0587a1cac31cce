use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use super::task::TaskInstance;

// Store row for a user, without the task list
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct UserProfile {
    pub id: i32,
    pub passport_serie: i32,
    pub passport_number: i32,
    pub surname: String,
    pub name: String,
    pub patronymic: String,
    pub address: String,
}

impl UserProfile {
    pub fn new(id: i32, passport: Passport, info: PersonInfo) -> Self {
        Self {
            id,
            passport_serie: passport.serie,
            passport_number: passport.number,
            surname: info.surname,
            name: info.name,
            patronymic: info.patronymic,
            address: info.address,
        }
    }

    pub fn passport(&self) -> Passport {
        Passport::new(self.passport_serie, self.passport_number)
    }
}

// Cached user: profile plus the owned task instances
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct User {
    #[serde(flatten)]
    pub profile: UserProfile,
    #[serde(rename = "userTask")]
    pub tasks: Vec<TaskInstance>,
}

impl User {
    pub fn new(profile: UserProfile, tasks: Vec<TaskInstance>) -> Self {
        Self { profile, tasks }
    }

    pub fn id(&self) -> i32 {
        self.profile.id
    }
}

// Biographic fragment returned by the user-info service
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct PersonInfo {
    pub surname: String,
    pub name: String,
    pub patronymic: String,
    pub address: String,
}

/// Passport serie and number, written as `"1234 567890"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Passport {
    pub serie: i32,
    pub number: i32,
}

impl Passport {
    pub fn new(serie: i32, number: i32) -> Self {
        Self { serie, number }
    }

    /// Single integer key used by the user-info directory.
    pub fn combined_key(&self) -> i64 {
        i64::from(self.serie) * 1_000_000 + i64::from(self.number)
    }
}

impl FromStr for Passport {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split_whitespace().collect();
        let [serie, number] = parts.as_slice() else {
            return Err(format!("expected '<serie> <number>', got '{}'", s));
        };

        let serie = serie
            .parse()
            .map_err(|e| format!("invalid passport serie '{}': {}", serie, e))?;
        let number = number
            .parse()
            .map_err(|e| format!("invalid passport number '{}': {}", number, e))?;

        Ok(Self { serie, number })
    }
}

impl fmt::Display for Passport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.serie, self.number)
    }
}

// Listing filter; text fields match as case-insensitive substrings
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub passport_serie: Option<i32>,
    pub passport_number: Option<i32>,
    pub surname: Option<String>,
    pub name: Option<String>,
    pub patronymic: Option<String>,
    pub address: Option<String>,
}

impl UserFilter {
    pub fn matches(&self, profile: &UserProfile) -> bool {
        fn contains(field: &str, needle: &Option<String>) -> bool {
            needle
                .as_ref()
                .map_or(true, |n| field.to_lowercase().contains(&n.to_lowercase()))
        }

        self.passport_serie.map_or(true, |s| s == profile.passport_serie)
            && self.passport_number.map_or(true, |n| n == profile.passport_number)
            && contains(&profile.surname, &self.surname)
            && contains(&profile.name, &self.name)
            && contains(&profile.patronymic, &self.patronymic)
            && contains(&profile.address, &self.address)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: i64,
    pub limit: i64,
}

impl Page {
    // Saturates so an oversized page reads past the end instead of overflowing
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

impl Default for Page {
    fn default() -> Self {
        Self { page: 1, limit: 10 }
    }
}
