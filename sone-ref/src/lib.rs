use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::{convert::TryFrom, fmt};
use thiserror::Error as ThisError;

/// Number of characters in the routing key part of an identity id.
pub const SONE_ID_LENGTH: usize = 43;

#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum RefError {
    #[error("Does not match as {ref_type}: {input}")]
    BadFormat {
        ref_type: &'static str,
        input: String,
    },
}

/// Opaque id of an identity.
///
/// Only the shape of the id is checked: any string of exactly
/// [`SONE_ID_LENGTH`] characters is accepted, whatever its alphabet.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct SoneId(String);

impl SoneId {
    pub fn from_string(string: String) -> Result<Self, RefError> {
        if !Self::is_match(string.as_str()) {
            Err(RefError::BadFormat {
                ref_type: "Sone",
                input: string,
            })
        } else {
            Ok(Self(string))
        }
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn single_regex() -> &'static Regex {
        lazy_static! {
            static ref RE: Regex = fixed_length(SONE_ID_LENGTH);
        }
        &RE
    }

    pub fn is_match(string: &str) -> bool {
        let regex = Self::single_regex();
        regex.is_match(string)
    }
}

impl fmt::Display for SoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for SoneId {
    type Error = RefError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        SoneId::from_string(value)
    }
}

impl TryFrom<&str> for SoneId {
    type Error = RefError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        SoneId::from_string(value.to_string())
    }
}

impl From<SoneId> for String {
    fn from(value: SoneId) -> String {
        value.0
    }
}

impl AsRef<str> for SoneId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

// `(?s)` so that line breaks count towards the length like any other char
fn fixed_length(length: usize) -> Regex {
    let mut re = String::new();
    re.push_str("(?s)^.{");
    re.push_str(&length.to_string());
    re.push_str("}$");

    Regex::new(&re).expect("fixed length pattern is valid")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_sone_id() {
        assert!(SoneId::is_match(
            "1234567890123456789012345678901234567890123"
        ));
        assert!(SoneId::is_match(
            "nwa8lHa271k2QvJ8aa0Ov7IHAV-DFOCFgmDt3X6BpCI"
        ));
    }

    #[test]
    fn test_wrong_length_is_not_sone_id() {
        assert!(!SoneId::is_match("123"));
        assert!(!SoneId::is_match(""));
        assert!(!SoneId::is_match(
            "12345678901234567890123456789012345678901234"
        ));
    }

    #[test]
    fn test_alphabet_is_not_checked() {
        assert!(SoneId::is_match(&"!".repeat(SONE_ID_LENGTH)));
        assert!(SoneId::is_match(&"ä".repeat(SONE_ID_LENGTH)));
        assert!(SoneId::is_match(
            "123456789012345678901\n123456789012345678901"
        ));
    }

    #[test]
    fn test_from_string() {
        let id = SoneId::from_string("1234567890123456789012345678901234567890123".into()).unwrap();
        assert_eq!(id.as_str(), "1234567890123456789012345678901234567890123");
        assert_eq!(
            SoneId::from_string("P0".into()),
            Err(RefError::BadFormat {
                ref_type: "Sone",
                input: "P0".into()
            })
        );
    }

    #[test]
    fn test_serde_rejects_bad_shape() {
        use serde::de::{value::Error as ValueError, IntoDeserializer};

        let short: Result<SoneId, ValueError> = SoneId::deserialize("short".into_deserializer());
        assert!(short.is_err());

        let id = "1234567890123456789012345678901234567890123";
        let long: Result<SoneId, ValueError> = SoneId::deserialize(id.into_deserializer());
        assert_eq!(long.unwrap().as_str(), id);
    }
}
