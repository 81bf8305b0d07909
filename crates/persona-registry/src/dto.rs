//! Registry payload shapes and their mapping onto domain types.

use persona_core::{
    AddressProtection, DeclaredGeoType, GeoAffiliation, Gender, Guardianship, GuardianshipType,
    Ident, IdentGroup, IdentityAliases, LookupError, Person, SourceResult,
};
use serde::Deserialize;
use time::Date;
use time::macros::format_description;

#[derive(Debug, Deserialize)]
pub struct IdentsDto {
    pub identer: Vec<IdentDto>,
}

#[derive(Debug, Deserialize)]
pub struct IdentDto {
    pub ident: String,
    pub historisk: bool,
    pub gruppe: IdentGroupDto,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub enum IdentGroupDto {
    #[serde(rename = "AKTORID")]
    ActorId,
    #[serde(rename = "FOLKEREGISTERIDENT")]
    NationalId,
    #[serde(rename = "NPID")]
    TemporaryId,
}

impl From<IdentGroupDto> for IdentGroup {
    fn from(group: IdentGroupDto) -> Self {
        match group {
            IdentGroupDto::ActorId => IdentGroup::ActorId,
            IdentGroupDto::NationalId => IdentGroup::NationalId,
            IdentGroupDto::TemporaryId => IdentGroup::TemporaryId,
        }
    }
}

impl From<IdentsDto> for IdentityAliases {
    fn from(dto: IdentsDto) -> Self {
        IdentityAliases::partition(
            dto.identer
                .into_iter()
                .map(|i| (Ident::new(i.ident, i.gruppe.into()), i.historisk)),
        )
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonDto {
    #[serde(default)]
    pub foedselsdato: Vec<BirthDto>,
    #[serde(default)]
    pub navn: Vec<NameDto>,
    #[serde(default)]
    pub adressebeskyttelse: Vec<AddressProtectionDto>,
    #[serde(default)]
    pub kjoenn: Vec<GenderDto>,
    #[serde(default)]
    pub doedsfall: Vec<DeathDto>,
}

#[derive(Debug, Deserialize)]
pub struct BirthDto {
    pub foedselsdato: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NameDto {
    pub fornavn: String,
    pub mellomnavn: Option<String>,
    pub etternavn: String,
}

#[derive(Debug, Deserialize)]
pub struct AddressProtectionDto {
    pub gradering: Option<Grading>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Grading {
    Fortrolig,
    StrengtFortrolig,
    StrengtFortroligUtland,
    #[serde(other)]
    Ugradert,
}

#[derive(Debug, Deserialize)]
pub struct GenderDto {
    pub kjoenn: Option<GenderValue>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GenderValue {
    Mann,
    Kvinne,
    #[serde(other)]
    Ukjent,
}

#[derive(Debug, Deserialize)]
pub struct DeathDto {
    pub doedsdato: Option<String>,
    pub metadata: Option<MetadataDto>,
}

#[derive(Debug, Deserialize)]
pub struct MetadataDto {
    pub master: String,
}

fn parse_date(value: &str) -> Result<Date, LookupError> {
    Date::parse(value, format_description!("[year]-[month]-[day]")).map_err(|e| {
        LookupError::generic(format!("invalid date in registry response: {value}")).with_source(e)
    })
}

impl PersonDto {
    /// Map onto [`Person`], taking the first entry of each list.
    pub fn into_person(self) -> SourceResult<Person> {
        let Some(name) = self.navn.into_iter().next() else {
            return SourceResult::NotFound;
        };

        let Some(birth) = self.foedselsdato.iter().find_map(|b| b.foedselsdato.as_deref()) else {
            return SourceResult::Error(LookupError::generic(
                "registry response has no birth date",
            ));
        };
        let birth_date = match parse_date(birth) {
            Ok(date) => date,
            Err(e) => return SourceResult::Error(e),
        };

        // A death registered by the registry itself outranks other sources
        let death = self
            .doedsfall
            .iter()
            .find(|d| {
                d.metadata
                    .as_ref()
                    .is_some_and(|m| m.master.eq_ignore_ascii_case("pdl"))
            })
            .and_then(|d| d.doedsdato.as_deref())
            .or_else(|| self.doedsfall.first().and_then(|d| d.doedsdato.as_deref()));
        let death_date = match death.map(parse_date).transpose() {
            Ok(date) => date,
            Err(e) => return SourceResult::Error(e),
        };

        let address_protection = match self
            .adressebeskyttelse
            .first()
            .and_then(|a| a.gradering)
        {
            Some(Grading::Fortrolig) => AddressProtection::Confidential,
            Some(Grading::StrengtFortrolig) => AddressProtection::StrictlyConfidential,
            Some(Grading::StrengtFortroligUtland) => AddressProtection::StrictlyConfidentialAbroad,
            Some(Grading::Ugradert) | None => AddressProtection::Unclassified,
        };

        let gender = match self.kjoenn.first().and_then(|k| k.kjoenn) {
            Some(GenderValue::Mann) => Gender::Male,
            Some(GenderValue::Kvinne) => Gender::Female,
            Some(GenderValue::Ukjent) | None => Gender::Unknown,
        };

        SourceResult::Found(Person {
            birth_date,
            death_date,
            first_name: name.fornavn,
            middle_name: name.mellomnavn.filter(|m| !m.trim().is_empty()),
            last_name: name.etternavn,
            address_protection,
            gender,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuardianshipDto {
    #[serde(default)]
    pub vergemaal_eller_fremtidsfullmakt: Vec<GuardianshipEntryDto>,
}

#[derive(Debug, Deserialize)]
pub struct GuardianshipEntryDto {
    #[serde(rename = "type")]
    pub kind: GuardianshipTypeDto,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GuardianshipTypeDto {
    EnsligMindreaarigAsylsoeker,
    EnsligMindreaarigFlyktning,
    Voksen,
    MidlertidigForVoksen,
    Mindreaarig,
    MidlertidigForMindreaarig,
    ForvaltningUtenforVergemaal,
    StadfestetFremtidsfullmakt,
}

impl From<GuardianshipTypeDto> for GuardianshipType {
    fn from(dto: GuardianshipTypeDto) -> Self {
        match dto {
            GuardianshipTypeDto::EnsligMindreaarigAsylsoeker => {
                GuardianshipType::UnaccompaniedMinorAsylumSeeker
            }
            GuardianshipTypeDto::EnsligMindreaarigFlyktning => {
                GuardianshipType::UnaccompaniedMinorRefugee
            }
            GuardianshipTypeDto::Voksen => GuardianshipType::Adult,
            GuardianshipTypeDto::MidlertidigForVoksen => GuardianshipType::TemporaryForAdult,
            GuardianshipTypeDto::Mindreaarig => GuardianshipType::Minor,
            GuardianshipTypeDto::MidlertidigForMindreaarig => GuardianshipType::TemporaryForMinor,
            GuardianshipTypeDto::ForvaltningUtenforVergemaal => {
                GuardianshipType::ManagementOutsideGuardianship
            }
            GuardianshipTypeDto::StadfestetFremtidsfullmakt => {
                GuardianshipType::ConfirmedFuturePowerOfAttorney
            }
        }
    }
}

impl From<GuardianshipDto> for Guardianship {
    fn from(dto: GuardianshipDto) -> Self {
        Guardianship {
            arrangements: dto
                .vergemaal_eller_fremtidsfullmakt
                .into_iter()
                .map(|entry| entry.kind.into())
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoAffiliationDto {
    pub gt_type: GeoTypeDto,
    pub gt_kommune: Option<String>,
    pub gt_bydel: Option<String>,
    pub gt_land: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GeoTypeDto {
    Bydel,
    Kommune,
    Utland,
    #[serde(other)]
    Udefinert,
}

impl From<GeoAffiliationDto> for GeoAffiliation {
    fn from(dto: GeoAffiliationDto) -> Self {
        let declared = match dto.gt_type {
            GeoTypeDto::Bydel => DeclaredGeoType::District,
            GeoTypeDto::Kommune => DeclaredGeoType::Municipality,
            GeoTypeDto::Utland => DeclaredGeoType::Abroad,
            GeoTypeDto::Udefinert => DeclaredGeoType::Undefined,
        };
        GeoAffiliation::classify(declared, dto.gt_land, dto.gt_kommune, dto.gt_bydel)
    }
}
