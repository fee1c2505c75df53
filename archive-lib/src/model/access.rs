//! Access levels and user roles

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

/// Who may read a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    /// Anyone, including anonymous visitors.
    #[default]
    Open,
    /// Signed-in members of the tenant.
    Restricted,
    /// The author and administrators only.
    Private,
}

impl AccessLevel {
    /// All levels, in menu order.
    pub const ALL: [AccessLevel; 3] = [Self::Open, Self::Restricted, Self::Private];

    /// Wire value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Restricted => "restricted",
            Self::Private => "private",
        }
    }

    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::Restricted => "Restricted",
            Self::Private => "Private",
        }
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccessLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "open" => Ok(Self::Open),
            "restricted" => Ok(Self::Restricted),
            "private" => Ok(Self::Private),
            other => Err(format!("unknown access level: {}", other)),
        }
    }
}

/// Role of a user within the archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Manages every tenant.
    SuperAdmin,
    /// Manages one tenant's documents, users and settings.
    Admin,
    /// Evaluates submissions.
    Reviewer,
    /// Browses, uploads and comments.
    #[default]
    Researcher,
}

impl Role {
    /// All roles, in menu order.
    pub const ALL: [Role; 4] = [Self::SuperAdmin, Self::Admin, Self::Reviewer, Self::Researcher];

    /// Wire value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SuperAdmin => "super_admin",
            Self::Admin => "admin",
            Self::Reviewer => "reviewer",
            Self::Researcher => "researcher",
        }
    }

    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::SuperAdmin => "Super admin",
            Self::Admin => "Admin",
            Self::Reviewer => "Reviewer",
            Self::Researcher => "Researcher",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "super_admin" | "superadmin" => Ok(Self::SuperAdmin),
            "admin" => Ok(Self::Admin),
            "reviewer" => Ok(Self::Reviewer),
            "researcher" => Ok(Self::Researcher),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_level_wire_values() {
        assert_eq!(serde_json::to_string(&AccessLevel::Restricted).unwrap(), r#""restricted""#);
        let level: AccessLevel = serde_json::from_str(r#""private""#).unwrap();
        assert_eq!(level, AccessLevel::Private);
    }

    #[test]
    fn test_role_wire_values() {
        assert_eq!(serde_json::to_string(&Role::SuperAdmin).unwrap(), r#""super_admin""#);
        assert_eq!("Reviewer".parse::<Role>(), Ok(Role::Reviewer));
        assert!("owner".parse::<Role>().is_err());
    }
}
