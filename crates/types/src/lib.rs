//! Value types shared by every research-rest-api crate.
//!
//! - [`DatasetId`]: the opaque dataset identifier taken from request paths
//! - [`PreservationState`]: the catalog's preservation state enumeration

/// Errors that can occur when converting raw values into research types.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TypesError {
    /// The catalog returned a preservation state code this service does not know.
    #[error("unknown preservation state code: {0}")]
    UnknownPreservationState(i64),
}

/// An opaque dataset identifier.
///
/// The identifier is passed through to collaborators exactly as received. No format validation
/// is performed; identifiers such as `1`, `urn:nbn:fi:att:...` or `not_available_id` are all
/// accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DatasetId(String);

impl DatasetId {
    /// Wraps the given identifier without inspecting it.
    pub fn new(input: impl Into<String>) -> Self {
        Self(input.into())
    }

    /// Returns the inner identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DatasetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for DatasetId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for DatasetId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for DatasetId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl serde::Serialize for DatasetId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for DatasetId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        String::deserialize(deserializer).map(Self)
    }
}

/// Preservation state of a dataset as stored in the catalog.
///
/// The catalog stores these as integer codes; serialisation uses the same codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PreservationState {
    Initialized,
    ProposedForDigitalPreservation,
    TechnicalMetadataGenerated,
    TechnicalMetadataGenerationFailed,
    InvalidMetadata,
    MetadataValidationFailed,
    ValidatedMetadataUpdated,
    ValidMetadata,
    MetadataConfirmed,
    AcceptedToDigitalPreservation,
    InPackagingService,
    PackagingFailed,
    SipSentToIngestionInDpresService,
    InDigitalPreservation,
    RejectedInDigitalPreservationService,
    InDissemination,
}

impl PreservationState {
    /// Integer code used by the catalog for this state.
    pub fn code(self) -> i64 {
        match self {
            Self::Initialized => 0,
            Self::ProposedForDigitalPreservation => 10,
            Self::TechnicalMetadataGenerated => 20,
            Self::TechnicalMetadataGenerationFailed => 30,
            Self::InvalidMetadata => 40,
            Self::MetadataValidationFailed => 50,
            Self::ValidatedMetadataUpdated => 60,
            Self::ValidMetadata => 70,
            Self::MetadataConfirmed => 75,
            Self::AcceptedToDigitalPreservation => 80,
            Self::InPackagingService => 90,
            Self::PackagingFailed => 100,
            Self::SipSentToIngestionInDpresService => 110,
            Self::InDigitalPreservation => 120,
            Self::RejectedInDigitalPreservationService => 130,
            Self::InDissemination => 140,
        }
    }
}

impl TryFrom<i64> for PreservationState {
    type Error = TypesError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        let state = match code {
            0 => Self::Initialized,
            10 => Self::ProposedForDigitalPreservation,
            20 => Self::TechnicalMetadataGenerated,
            30 => Self::TechnicalMetadataGenerationFailed,
            40 => Self::InvalidMetadata,
            50 => Self::MetadataValidationFailed,
            60 => Self::ValidatedMetadataUpdated,
            70 => Self::ValidMetadata,
            75 => Self::MetadataConfirmed,
            80 => Self::AcceptedToDigitalPreservation,
            90 => Self::InPackagingService,
            100 => Self::PackagingFailed,
            110 => Self::SipSentToIngestionInDpresService,
            120 => Self::InDigitalPreservation,
            130 => Self::RejectedInDigitalPreservationService,
            140 => Self::InDissemination,
            other => return Err(TypesError::UnknownPreservationState(other)),
        };
        Ok(state)
    }
}

impl std::fmt::Display for PreservationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?} ({})", self, self.code())
    }
}

impl serde::Serialize for PreservationState {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_i64(self.code())
    }
}

impl<'de> serde::Deserialize<'de> for PreservationState {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let code = i64::deserialize(deserializer)?;
        PreservationState::try_from(code).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dataset_id_is_passed_through_unchanged() {
        let id = DatasetId::new(" urn:nbn:fi:att:1 ");
        assert_eq!(id.as_str(), " urn:nbn:fi:att:1 ");
        assert_eq!(id.to_string(), " urn:nbn:fi:att:1 ");
    }

    #[test]
    fn dataset_id_serialises_as_plain_string() {
        let json = serde_json::to_string(&DatasetId::from("1")).unwrap();
        assert_eq!(json, "\"1\"");
    }

    #[test]
    fn preservation_state_codes_match_catalog() {
        assert_eq!(PreservationState::ValidMetadata.code(), 70);
        assert_eq!(PreservationState::MetadataValidationFailed.code(), 50);
        assert_eq!(PreservationState::InPackagingService.code(), 90);
        assert_eq!(
            PreservationState::try_from(120),
            Ok(PreservationState::InDigitalPreservation)
        );
        assert_eq!(
            PreservationState::try_from(60),
            Ok(PreservationState::ValidatedMetadataUpdated)
        );
    }

    #[test]
    fn unknown_preservation_state_is_rejected() {
        assert_eq!(
            PreservationState::try_from(15),
            Err(TypesError::UnknownPreservationState(15))
        );
        let parsed: Result<PreservationState, _> = serde_json::from_str("15");
        assert!(parsed.is_err());
    }

    #[test]
    fn preservation_state_serialises_as_code() {
        let json = serde_json::to_string(&PreservationState::TechnicalMetadataGenerated).unwrap();
        assert_eq!(json, "20");
    }
}
