use serde::{Deserialize, Serialize};

/// Kind of guardianship or future power of attorney registered for a subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GuardianshipType {
    UnaccompaniedMinorAsylumSeeker,
    UnaccompaniedMinorRefugee,
    Adult,
    TemporaryForAdult,
    Minor,
    TemporaryForMinor,
    ManagementOutsideGuardianship,
    ConfirmedFuturePowerOfAttorney,
}

/// Guardianship and custody arrangements. An empty list means none are registered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guardianship {
    pub arrangements: Vec<GuardianshipType>,
}

impl Guardianship {
    pub fn is_empty(&self) -> bool {
        self.arrangements.is_empty()
    }
}
