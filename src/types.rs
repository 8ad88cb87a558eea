//! Closed enumerations of the derivation contract.
//!
//! Storage, import/export, and UI components all switch on these sets, so
//! every variant is part of the crate's compatibility surface.

use crate::PassforgeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

/// Shape and semantics of a derived site result.
///
/// Template variants produce a password from the derivation output alone;
/// stored variants mark sites whose secret is a literal payload kept by the
/// storage collaborator (legacy imports) rather than recomputed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResultType {
    /// 20 characters, contains symbols.
    Maximum,
    /// 14 characters, symbols; the default for new sites.
    Long,
    /// 8 characters, symbols.
    Medium,
    /// 8 characters, no symbols.
    Basic,
    /// 4 characters, no symbols.
    Short,
    /// 4 numbers.
    Pin,
    /// 9 letter name.
    Name,
    /// 20 character sentence.
    Phrase,
    /// Literal secret encrypted per user.
    StoredPersonal,
    /// Literal secret encrypted per device.
    StoredDevice,
}

impl ResultType {
    /// Default result type for newly created sites.
    pub const DEFAULT: ResultType = ResultType::Long;

    /// Whether this type represents a stored literal rather than a
    /// template-derived password.
    pub fn is_stored(self) -> bool {
        matches!(self, ResultType::StoredPersonal | ResultType::StoredDevice)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ResultType::Maximum => "maximum",
            ResultType::Long => "long",
            ResultType::Medium => "medium",
            ResultType::Basic => "basic",
            ResultType::Short => "short",
            ResultType::Pin => "pin",
            ResultType::Name => "name",
            ResultType::Phrase => "phrase",
            ResultType::StoredPersonal => "stored-personal",
            ResultType::StoredDevice => "stored-device",
        }
    }
}

impl fmt::Display for ResultType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResultType {
    type Err = PassforgeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "maximum" => Ok(ResultType::Maximum),
            "long" => Ok(ResultType::Long),
            "medium" => Ok(ResultType::Medium),
            "basic" => Ok(ResultType::Basic),
            "short" => Ok(ResultType::Short),
            "pin" => Ok(ResultType::Pin),
            "name" => Ok(ResultType::Name),
            "phrase" => Ok(ResultType::Phrase),
            "stored-personal" => Ok(ResultType::StoredPersonal),
            "stored-device" => Ok(ResultType::StoredDevice),
            other => Err(PassforgeError::InvalidInput(format!(
                "Unknown result type '{}'",
                other
            ))),
        }
    }
}

/// Purpose a result is being derived for.
///
/// The purpose selects a separate derivation namespace, so an authentication
/// password, a login name, and a recovery answer for the same site never
/// collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyPurpose {
    /// A password to authenticate with.
    Authentication,
    /// A login name to identify as.
    Identification,
    /// An answer to a security question.
    Recovery,
}

impl KeyPurpose {
    /// Namespace string fed into the derivation for this purpose.
    pub fn scope(self) -> &'static str {
        match self {
            KeyPurpose::Authentication => "org.passforge",
            KeyPurpose::Identification => "org.passforge.login",
            KeyPurpose::Recovery => "org.passforge.answer",
        }
    }
}

impl fmt::Display for KeyPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyPurpose::Authentication => write!(f, "authentication"),
            KeyPurpose::Identification => write!(f, "identification"),
            KeyPurpose::Recovery => write!(f, "recovery"),
        }
    }
}

impl FromStr for KeyPurpose {
    type Err = PassforgeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "authentication" => Ok(KeyPurpose::Authentication),
            "identification" => Ok(KeyPurpose::Identification),
            "recovery" => Ok(KeyPurpose::Recovery),
            other => Err(PassforgeError::InvalidInput(format!(
                "Unknown key purpose '{}'",
                other
            ))),
        }
    }
}

/// Revision of the derivation transform.
///
/// Totally ordered; a site pins the version its secret was produced under and
/// keeps deriving with it even after [`AlgorithmVersion::CURRENT`] advances.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum AlgorithmVersion {
    /// Initial release.
    V0,
    /// Fixed big-endian encoding of length prefixes.
    V1,
    /// Fixed UTF-8 handling of site names.
    V2,
    /// Fixed UTF-8 handling of user names.
    V3,
}

impl AlgorithmVersion {
    /// The version newly created sites take.
    pub const CURRENT: AlgorithmVersion = AlgorithmVersion::V3;

    pub fn current() -> AlgorithmVersion {
        AlgorithmVersion::CURRENT
    }

    /// Integer form used by storage and export formats.
    pub fn as_int(self) -> u32 {
        match self {
            AlgorithmVersion::V0 => 0,
            AlgorithmVersion::V1 => 1,
            AlgorithmVersion::V2 => 2,
            AlgorithmVersion::V3 => 3,
        }
    }

    pub fn from_int(value: u32) -> Result<AlgorithmVersion, PassforgeError> {
        match value {
            0 => Ok(AlgorithmVersion::V0),
            1 => Ok(AlgorithmVersion::V1),
            2 => Ok(AlgorithmVersion::V2),
            3 => Ok(AlgorithmVersion::V3),
            other => Err(PassforgeError::InvalidInput(format!(
                "Unknown algorithm version '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for AlgorithmVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_int())
    }
}

impl FromStr for AlgorithmVersion {
    type Err = PassforgeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        let digits = value.strip_prefix('v').unwrap_or(value);
        let n: u32 = digits.parse().map_err(|_| {
            PassforgeError::InvalidInput(format!("Unknown algorithm version '{}'", value))
        })?;
        AlgorithmVersion::from_int(n)
    }
}

/// Rotation counter of a site, always at least 1.
///
/// Changing the counter rotates the derived secret for a site without
/// changing its name. Counter 0 is reserved and rejected at construction.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SiteCounter(NonZeroU32);

impl SiteCounter {
    pub fn new(value: u32) -> Result<SiteCounter, PassforgeError> {
        NonZeroU32::new(value)
            .map(SiteCounter)
            .ok_or(PassforgeError::InvalidCounter)
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl Default for SiteCounter {
    /// The counter a freshly added site starts with.
    fn default() -> Self {
        SiteCounter(NonZeroU32::MIN)
    }
}

impl fmt::Display for SiteCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u32> for SiteCounter {
    type Error = PassforgeError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        SiteCounter::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_type_default_is_long() {
        assert_eq!(ResultType::DEFAULT, ResultType::Long);
        assert!(!ResultType::DEFAULT.is_stored());
    }

    #[test]
    fn test_result_type_stored_predicate() {
        assert!(ResultType::StoredPersonal.is_stored());
        assert!(ResultType::StoredDevice.is_stored());
        assert!(!ResultType::Pin.is_stored());
    }

    #[test]
    fn test_result_type_round_trip() {
        for rt in [
            ResultType::Maximum,
            ResultType::Long,
            ResultType::Phrase,
            ResultType::StoredDevice,
        ] {
            assert_eq!(rt.as_str().parse::<ResultType>().unwrap(), rt);
        }
        assert!("garbage".parse::<ResultType>().is_err());
    }

    #[test]
    fn test_key_purpose_scopes_are_distinct() {
        let scopes = [
            KeyPurpose::Authentication.scope(),
            KeyPurpose::Identification.scope(),
            KeyPurpose::Recovery.scope(),
        ];
        assert_ne!(scopes[0], scopes[1]);
        assert_ne!(scopes[1], scopes[2]);
        assert_ne!(scopes[0], scopes[2]);
    }

    #[test]
    fn test_algorithm_version_ordering() {
        assert!(AlgorithmVersion::V0 < AlgorithmVersion::V1);
        assert!(AlgorithmVersion::V2 < AlgorithmVersion::V3);
        assert_eq!(AlgorithmVersion::CURRENT, AlgorithmVersion::V3);
        assert_eq!(AlgorithmVersion::current(), AlgorithmVersion::CURRENT);
    }

    #[test]
    fn test_algorithm_version_int_round_trip() {
        for v in 0..=3 {
            assert_eq!(AlgorithmVersion::from_int(v).unwrap().as_int(), v);
        }
        assert!(AlgorithmVersion::from_int(4).is_err());
        assert_eq!(
            "v2".parse::<AlgorithmVersion>().unwrap(),
            AlgorithmVersion::V2
        );
        assert_eq!(
            "3".parse::<AlgorithmVersion>().unwrap(),
            AlgorithmVersion::V3
        );
    }

    #[test]
    fn test_site_counter_rejects_zero() {
        assert!(matches!(
            SiteCounter::new(0),
            Err(PassforgeError::InvalidCounter)
        ));
        assert_eq!(SiteCounter::new(1).unwrap().get(), 1);
        assert_eq!(SiteCounter::new(u32::MAX).unwrap().get(), u32::MAX);
    }

    #[test]
    fn test_site_counter_default_is_one() {
        assert_eq!(SiteCounter::default().get(), 1);
    }

    #[test]
    fn test_site_counter_serde_is_plain_integer() {
        let counter = SiteCounter::new(7).unwrap();
        assert_eq!(serde_json::to_string(&counter).unwrap(), "7");
        let parsed: SiteCounter = serde_json::from_str("7").unwrap();
        assert_eq!(parsed, counter);
        assert!(serde_json::from_str::<SiteCounter>("0").is_err());
    }
}
