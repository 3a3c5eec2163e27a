//! Meal aggregate and the payload types used to create and amend it.

use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::user::UserId;

/// Validation errors returned by the meal value constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MealValidationError {
    InvalidId,
    EmptyName,
    NameTooLong { max: usize },
}

impl fmt::Display for MealValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidId => write!(f, "meal id must be a valid UUID"),
            Self::EmptyName => write!(f, "meal name must not be empty"),
            Self::NameTooLong { max } => {
                write!(f, "meal name must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for MealValidationError {}

/// Stable meal identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MealId(Uuid);

impl MealId {
    /// Validate and construct a [`MealId`] from string input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, MealValidationError> {
        let parsed = Uuid::parse_str(id.as_ref()).map_err(|_| MealValidationError::InvalidId)?;
        Ok(Self(parsed))
    }

    /// Generate a new random [`MealId`].
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for MealId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Maximum allowed length for a meal name.
pub const MEAL_NAME_MAX: usize = 200;

/// Non-empty meal name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MealName(String);

impl MealName {
    /// Validate and construct a [`MealName`] from owned input.
    pub fn new(name: impl Into<String>) -> Result<Self, MealValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(MealValidationError::EmptyName);
        }
        if name.chars().count() > MEAL_NAME_MAX {
            return Err(MealValidationError::NameTooLong { max: MEAL_NAME_MAX });
        }
        Ok(Self(name))
    }
}

impl AsRef<str> for MealName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for MealName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<MealName> for String {
    fn from(value: MealName) -> Self {
        value.0
    }
}

/// A logged meal.
///
/// ## Invariants
/// - `owner` never changes once the meal is stored.
/// - Only the owner can read, amend, or delete the meal; every store access
///   filters on the owner id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Meal {
    id: MealId,
    owner: UserId,
    name: MealName,
    description: String,
    is_on_diet: bool,
    date: DateTime<Utc>,
}

impl Meal {
    /// Build a meal from validated components.
    pub fn new(
        id: MealId,
        owner: UserId,
        name: MealName,
        description: String,
        is_on_diet: bool,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            owner,
            name,
            description,
            is_on_diet,
            date,
        }
    }

    /// Stable meal identifier.
    pub fn id(&self) -> &MealId {
        &self.id
    }

    /// Identifier of the owning user.
    pub fn owner(&self) -> &UserId {
        &self.owner
    }

    /// Meal name.
    pub fn name(&self) -> &MealName {
        &self.name
    }

    /// Free-text description.
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Whether the meal complied with the user's diet.
    pub fn is_on_diet(&self) -> bool {
        self.is_on_diet
    }

    /// When the meal was eaten.
    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }
}

/// Validated payload for creating a meal.
///
/// `date` is optional; the registry substitutes the submission time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MealDraft {
    pub name: MealName,
    pub description: String,
    pub is_on_diet: bool,
    pub date: Option<DateTime<Utc>>,
}

/// Partial amendment merged over a stored meal.
///
/// `None` fields keep their stored values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MealPatch {
    pub name: Option<MealName>,
    pub description: Option<String>,
    pub is_on_diet: Option<bool>,
    pub date: Option<DateTime<Utc>>,
}

impl MealPatch {
    /// True when no field is being amended.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.is_on_diet.is_none()
            && self.date.is_none()
    }
}
