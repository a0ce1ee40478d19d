//! User classes used as waitlist priorities.

use serde::{Deserialize, Serialize};

/// Classification of a parking user.
///
/// Variants are declared in urgency order, so the derived `Ord` puts
/// `Internal` first. The numeric codes match the legacy user records
/// (`1` internal, `2` guest, `3` external).
///
/// ```
/// use nexus_waitlist::UserClass;
///
/// assert!(UserClass::Internal < UserClass::Guest);
/// assert!(UserClass::Guest < UserClass::External);
/// assert_eq!(UserClass::from_code(2), Some(UserClass::Guest));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum UserClass {
    /// Staff or students registered with the institution.
    Internal = 1,
    /// Single-use guest invited by an internal user.
    Guest = 2,
    /// Anyone else.
    External = 3,
}

impl UserClass {
    /// Returns the legacy numeric code.
    #[inline]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Parses a legacy numeric code.
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Internal),
            2 => Some(Self::Guest),
            3 => Some(Self::External),
            _ => None,
        }
    }
}

impl core::fmt::Display for UserClass {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Self::Internal => "internal",
            Self::Guest => "guest",
            Self::External => "external",
        };
        f.write_str(name)
    }
}
