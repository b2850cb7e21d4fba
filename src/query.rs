use std::collections::BTreeMap;

use crate::error::Result;
use crate::params::{
    EncodedField, REGION_KEY, Region, resolve_region, validate_data_sources, validate_seasons,
    validate_sub_regions,
};
use crate::season::{Clock, SystemClock};
use crate::value::ParamValue;

/// A fully validated FluView query.
///
/// Only encoded fields are stored; construction fails with the validator
/// error of the first invalid dimension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    data_sources: EncodedField,
    seasons: EncodedField,
    region: EncodedField,
    sub_regions: EncodedField,
}

impl Query {
    pub fn new(
        data_sources: impl Into<ParamValue>,
        seasons: impl Into<ParamValue>,
        region: impl Into<ParamValue>,
        sub_regions: impl Into<ParamValue>,
    ) -> Result<Self> {
        Self::with_clock(data_sources, seasons, region, sub_regions, &SystemClock)
    }

    /// Like [`Query::new`], with the date for season validation taken from `clock`.
    pub fn with_clock(
        data_sources: impl Into<ParamValue>,
        seasons: impl Into<ParamValue>,
        region: impl Into<ParamValue>,
        sub_regions: impl Into<ParamValue>,
        clock: &dyn Clock,
    ) -> Result<Self> {
        let data_sources = validate_data_sources(data_sources)?;
        let seasons = validate_seasons(seasons, clock.today())?;
        // Sub-region domain depends on the resolved region.
        let resolved = resolve_region(region)?;
        let sub_regions = validate_sub_regions(resolved, sub_regions)?;

        Ok(Self {
            data_sources,
            seasons,
            region: EncodedField {
                key: REGION_KEY,
                value: resolved.id().to_string(),
            },
            sub_regions,
        })
    }

    pub fn region(&self) -> Option<Region> {
        self.region.value.parse().ok().and_then(Region::from_id)
    }

    pub fn fields(&self) -> [&EncodedField; 4] {
        [
            &self.data_sources,
            &self.seasons,
            &self.region,
            &self.sub_regions,
        ]
    }

    /// Form body pairs, in portal order.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        self.fields()
            .into_iter()
            .map(|f| (f.key, f.value.clone()))
            .collect()
    }

    pub fn to_form(&self) -> BTreeMap<&'static str, String> {
        self.form_fields().into_iter().collect()
    }
}
