//! Validated free-text fields.
//!
//! Names, car descriptions, and addresses share one rule: non-blank after
//! trimming, at most [`MAX_TEXT_LEN`] characters.

use serde::{Deserialize, Serialize};

/// Maximum length, in characters, of any stored text field.
pub const MAX_TEXT_LEN: usize = 140;

/// Errors that can occur when parsing a bounded text field.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TextError {
    /// The input is empty or whitespace only.
    #[error("cannot be empty")]
    Empty,
    /// The input is too long.
    #[error("must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
}

fn parse_bounded(input: &str) -> Result<String, TextError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(TextError::Empty);
    }
    if trimmed.chars().count() > MAX_TEXT_LEN {
        return Err(TextError::TooLong { max: MAX_TEXT_LEN });
    }
    Ok(trimmed.to_owned())
}

macro_rules! bounded_text {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[cfg_attr(feature = "sqlite", derive(sqlx::Type), sqlx(transparent))]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Parse and validate, trimming surrounding whitespace.
            ///
            /// # Errors
            ///
            /// Returns `TextError` if the input is blank or too long.
            pub fn parse(input: &str) -> Result<Self, TextError> {
                parse_bounded(input).map(Self)
            }

            /// Get the value as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume and return the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

bounded_text!(
    /// A client or driver name.
    PersonName
);

bounded_text!(
    /// A driver's car description, e.g. "White Skoda Octavia A123BC".
    CarDescription
);

bounded_text!(
    /// A pickup or drop-off address.
    Address
);
