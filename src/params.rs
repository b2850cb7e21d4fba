//! Validation and encoding of the four query dimensions.
//!
//! Each validator visits every input element and reports all offending
//! elements in one [`Error::InvalidParameter`], rather than stopping at the
//! first bad one.

use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDate;

use crate::error::{Error, Result};
use crate::season::{FIRST_SEASON, current_season};
use crate::sources::{CANONICAL_SOURCES, CENSUS_DIVISIONS, canonical_source, census_division, region_synonym};
use crate::value::ParamValue;

pub const DATA_SOURCES_KEY: &str = "DataSources";
pub const SEASONS_KEY: &str = "SeasonsList";
pub const REGION_KEY: &str = "RegionID";
pub const SUB_REGIONS_KEY: &str = "SubRegionsList";

/// Highest HHS region ordinal.
pub const HHS_MAX_ORDINAL: i64 = 10;

/// Highest census division ordinal.
pub const CENSUS_MAX_ORDINAL: i64 = 9;

/// One validated key/value pair of the request form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedField {
    pub key: &'static str,
    pub value: String,
}

impl EncodedField {
    fn new(key: &'static str, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}

/// Top-level geographic aggregation offered by the portal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Hhs,
    Census,
    National,
}

impl Region {
    pub fn id(self) -> i64 {
        match self {
            Region::Hhs => 1,
            Region::Census => 2,
            Region::National => 3,
        }
    }

    pub fn from_id(id: i64) -> Option<Self> {
        match id {
            1 => Some(Region::Hhs),
            2 => Some(Region::Census),
            3 => Some(Region::National),
            _ => None,
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Region::Hhs => write!(f, "HHS"),
            Region::Census => write!(f, "Census"),
            Region::National => write!(f, "National"),
        }
    }
}

const VALID_REGIONS: &str = "1 = HHS, 2 = Census, 3 = National";

pub fn validate_data_sources(input: impl Into<ParamValue>) -> Result<EncodedField> {
    let input = input.into();
    let valid = CANONICAL_SOURCES.join(", ");

    if matches!(input, ParamValue::Int(_) | ParamValue::Float(_)) {
        return Err(Error::invalid(
            "data source",
            vec![input.to_string()],
            format!("a string or a list of strings ({valid})"),
        ));
    }

    let mut names = Vec::new();
    let mut bad = Vec::new();
    for item in input.items() {
        match item.as_str().and_then(canonical_source) {
            Some(name) => names.push(name),
            None => bad.push(item.to_string()),
        }
    }

    if !bad.is_empty() {
        return Err(Error::invalid("data source", bad, valid));
    }
    Ok(EncodedField::new(DATA_SOURCES_KEY, names.join(",")))
}

/// Validate seasons against the season current on `today`.
///
/// `"all"` expands to every season from the first one through the current
/// one. Seasons newer than the current one are dropped without error.
pub fn validate_seasons(input: impl Into<ParamValue>, today: NaiveDate) -> Result<EncodedField> {
    let input = input.into();
    let this_season = current_season(today) as i64;
    let valid = format!("integers from {FIRST_SEASON} (or \"all\")");

    if let ParamValue::Str(s) = &input {
        if s.trim().eq_ignore_ascii_case("all") {
            let all: Vec<String> = (FIRST_SEASON as i64..=this_season)
                .map(|x| x.to_string())
                .collect();
            return Ok(EncodedField::new(SEASONS_KEY, all.join(",")));
        }
        return Err(Error::invalid("season", vec![s.clone()], valid));
    }

    let mut seasons = Vec::new();
    let mut bad = Vec::new();
    for item in input.items() {
        match item {
            ParamValue::Int(n) if *n >= FIRST_SEASON as i64 => seasons.push(*n),
            other => bad.push(other.to_string()),
        }
    }

    if !bad.is_empty() {
        return Err(Error::invalid("season", bad, valid));
    }

    let kept: Vec<String> = seasons
        .into_iter()
        .filter(|s| *s <= this_season)
        .map(|s| s.to_string())
        .collect();
    Ok(EncodedField::new(SEASONS_KEY, kept.join(",")))
}

/// Resolve a region from a synonym, an id, or an id in string form.
pub fn resolve_region(input: impl Into<ParamValue>) -> Result<Region> {
    let input = input.into();
    if let ParamValue::List(_) = input {
        return Err(Error::invalid("region", vec![input.to_string()], VALID_REGIONS));
    }

    input
        .as_integer()
        .or_else(|| input.as_str().and_then(region_synonym))
        .and_then(Region::from_id)
        .ok_or_else(|| Error::invalid("region", vec![input.to_string()], VALID_REGIONS))
}

pub fn validate_region(input: impl Into<ParamValue>) -> Result<EncodedField> {
    let region = resolve_region(input)?;
    Ok(EncodedField::new(REGION_KEY, region.id().to_string()))
}

/// Sub-region after coercion. Ordinals sort before labels.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum SubRegion {
    Ordinal(i64),
    Label(String),
}

impl fmt::Display for SubRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubRegion::Ordinal(n) => write!(f, "{n}"),
            SubRegion::Label(s) => f.write_str(s),
        }
    }
}

/// Validate sub-regions for an already resolved `region`.
///
/// A scalar is coerced and passed through without a range check. List
/// entries are range checked against the region's ordinals with an exclusive
/// upper bound, so the highest ordinal is rejected. Census lists may also
/// name divisions. National takes no sub-regions and ignores list entries.
///
/// Values are deduplicated and emitted in sorted order.
pub fn validate_sub_regions(region: Region, input: impl Into<ParamValue>) -> Result<EncodedField> {
    let input = input.into();
    let mut subregions = BTreeSet::new();
    let mut bad = BTreeSet::new();

    match &input {
        ParamValue::Int(_) | ParamValue::Float(_) => {
            let n = input.as_integer().filter(|n| *n >= 1).ok_or_else(|| {
                Error::invalid("subregion", vec![input.to_string()], "positive integers")
            })?;
            subregions.insert(SubRegion::Ordinal(n));
        }
        ParamValue::Str(s) => {
            let sr = match input.as_integer() {
                Some(n) => SubRegion::Ordinal(n),
                None => SubRegion::Label(s.clone()),
            };
            subregions.insert(sr);
        }
        ParamValue::List(items) => match region {
            Region::Hhs => {
                // HHS regions are numbered only; labels are bad entries.
                for item in items {
                    match item.as_integer() {
                        Some(n) if (1..HHS_MAX_ORDINAL).contains(&n) => {
                            subregions.insert(SubRegion::Ordinal(n));
                        }
                        _ => {
                            bad.insert(item.to_string());
                        }
                    }
                }
            }
            Region::Census => {
                for item in items {
                    match item.as_integer() {
                        Some(n) if (1..CENSUS_MAX_ORDINAL).contains(&n) => {
                            subregions.insert(SubRegion::Ordinal(n));
                        }
                        Some(_) => {
                            bad.insert(item.to_string());
                        }
                        None => match item.as_str().and_then(census_division) {
                            Some(n) => {
                                subregions.insert(SubRegion::Ordinal(n));
                            }
                            None => {
                                bad.insert(item.to_string());
                            }
                        },
                    }
                }
            }
            Region::National => {}
        },
    }

    if !bad.is_empty() {
        return Err(Error::invalid(
            "subregion",
            bad.into_iter().collect(),
            sub_region_domain(),
        ));
    }

    let encoded: Vec<String> = subregions.iter().map(ToString::to_string).collect();
    Ok(EncodedField::new(SUB_REGIONS_KEY, encoded.join(",")))
}

fn sub_region_domain() -> String {
    let labels: Vec<String> = CENSUS_DIVISIONS
        .iter()
        .map(|(name, id)| format!("{id} = {name}"))
        .collect();
    format!(
        "valid subregions depend on the region. Region 1 (HHS Region): 1..{HHS_MAX_ORDINAL}; Region 2 (Census): {}",
        labels.join(", ")
    )
}
