//! Closed categorical value sets and the survey sentinel model
//!
//! Survey answers are stored as their human-readable labels (`"Yes"`,
//! `"Not Applicable"`, ...). Every categorical column gets a Rust enum with a
//! closed set of labels so that a misspelled or new category is caught at
//! ingestion instead of landing in the warehouse as free text.
//!
//! # Two-tier missingness
//!
//! - Survey semantics ("Not Applicable", "Don't know", "Missing", ...) are
//!   **sentinel labels** inside NOT NULL text columns.
//! - True absence of a measurement (an ungeocodable address, an unreported
//!   cost) is `Option::None` on numeric and geometry fields.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Labels that carry survey "missing" semantics rather than an answer
pub const SENTINEL_LABELS: &[&str] = &[
    "Not Applicable",
    "Missing",
    "Don't know",
    "Participant non-response",
    "Technical error",
];

/// Returns true if the label is one of the survey sentinels
pub fn is_sentinel_label(label: &str) -> bool {
    SENTINEL_LABELS.contains(&label)
}

/// A label that is not part of a categorical field's closed set
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{value}' is not a valid {field} category")]
pub struct UnknownCategory {
    /// Name of the categorical type
    pub field: &'static str,
    /// The rejected label
    pub value: String,
}

impl UnknownCategory {
    pub fn new(field: &'static str, value: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
        }
    }
}

/// Common behaviour of every generated categorical enum
pub trait Categorical: Sized + Copy + 'static {
    /// Type name used in error messages
    const NAME: &'static str;

    /// The survey label stored in the database
    fn label(&self) -> &'static str;

    /// Every allowed value, in code-book order
    fn values() -> &'static [Self];

    /// Every allowed label, in code-book order
    fn labels() -> &'static [&'static str];

    /// True if this value is a missing-data sentinel rather than an answer
    fn is_sentinel(&self) -> bool {
        is_sentinel_label(self.label())
    }

    /// Longest label, used to size the storage column
    fn max_label_len() -> usize {
        Self::labels().iter().map(|l| l.chars().count()).max().unwrap_or(0)
    }
}

/// Generates a closed categorical enum whose wire and storage form is its label
///
/// ```rust
/// use core_kernel::define_category;
///
/// define_category! {
///     /// Example set
///     Answer {
///         Yes => "Yes",
///         No => "No",
///         NotApplicable => "Not Applicable",
///     }
/// }
///
/// assert_eq!("Yes".parse::<Answer>().unwrap(), Answer::Yes);
/// assert!("yes".parse::<Answer>().is_err());
/// ```
#[macro_export]
macro_rules! define_category {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Every allowed value, in code-book order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Every allowed label, in code-book order
            pub const LABELS: &'static [&'static str] = &[$($label),+];

            /// The survey label stored in the database
            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl $crate::category::Categorical for $name {
            const NAME: &'static str = stringify!($name);

            fn label(&self) -> &'static str {
                $name::label(self)
            }

            fn values() -> &'static [Self] {
                Self::ALL
            }

            fn labels() -> &'static [&'static str] {
                Self::LABELS
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.label())
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::category::UnknownCategory;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($label => Ok($name::$variant),)+
                    other => Err($crate::category::UnknownCategory::new(stringify!($name), other)),
                }
            }
        }

        impl $crate::__serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: $crate::__serde::Serializer,
            {
                serializer.serialize_str(self.label())
            }
        }

        impl<'de> $crate::__serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: $crate::__serde::Deserializer<'de>,
            {
                let label = <String as $crate::__serde::Deserialize>::deserialize(deserializer)?;
                label.parse().map_err(<D::Error as $crate::__serde::de::Error>::custom)
            }
        }
    };
}

define_category! {
    /// Binary survey response with the shared sentinel labels
    Response {
        Yes => "Yes",
        No => "No",
        NotApplicable => "Not Applicable",
        Missing => "Missing",
        DontKnow => "Don't know",
        ParticipantNonResponse => "Participant non-response",
        TechnicalError => "Technical error",
    }
}

impl Response {
    /// Maps a boolean answer onto the closed set
    pub fn from_bool(value: bool) -> Self {
        if value {
            Response::Yes
        } else {
            Response::No
        }
    }

    /// Returns the boolean answer, or None for any sentinel
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Response::Yes => Some(true),
            Response::No => Some(false),
            _ => None,
        }
    }
}

/// The sentinel kinds, usable where a field is pure free text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sentinel {
    #[serde(rename = "Not Applicable")]
    NotApplicable,
    #[serde(rename = "Missing")]
    Missing,
    #[serde(rename = "Don't know")]
    DontKnow,
}

impl Sentinel {
    /// The label written into NOT NULL text columns
    pub fn label(&self) -> &'static str {
        match self {
            Sentinel::NotApplicable => "Not Applicable",
            Sentinel::Missing => "Missing",
            Sentinel::DontKnow => "Don't know",
        }
    }

    /// Owned label, convenient for filling free-text fields
    pub fn text(&self) -> String {
        self.label().to_string()
    }
}
