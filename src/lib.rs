#![forbid(unsafe_code)]

//! Rust client for the CDC FluView custom download portal.
//!
//! A [`Query`] is built from four loosely-typed dimensions (data sources,
//! seasons, region, sub-regions). Each dimension is validated and encoded
//! into the form field the portal expects; the [`Client`] posts the form,
//! unpacks the zipped CSV it gets back, and returns it as a [`Table`], as
//! plain lines, or writes it to a file.
//!
//! **Quick start**
//! ```no_run
//! use fluview::{Client, ClientOptions, Query};
//!
//! let query = Query::new(["ili", "who"], "all", "census", ["Pacific", "Mountain"])?;
//! let client = Client::new(ClientOptions::default())?;
//!
//! let table = client.fetch_table(&query)?;
//! println!("{} rows, columns {:?}", table.len(), table.headers);
//! # Ok::<(), fluview::Error>(())
//! ```
//!
//! **Object style**
//! ```no_run
//! use fluview::FluView;
//!
//! let fv = FluView::new("ilinet", vec![60, 61, 62], 1, vec![1, 2, 3])?;
//! let path = fv.save_csv(None)?;
//! println!("saved {}", path.display());
//! # Ok::<(), fluview::Error>(())
//! ```
//!
//! Validation failures report every offending value of a dimension at once
//! and can be told apart from network and payload failures via
//! [`Error::kind`].

mod archive;
mod client;
mod error;
mod params;
mod query;
mod season;
mod sources;
mod value;

pub use crate::archive::{Table, extract_first_entry, parse_table, split_lines};
pub use crate::client::{Client, ClientOptions, DEFAULT_TIMEOUT, FluView, default_filename};
pub use crate::error::{Error, ErrorKind, Result};
pub use crate::params::{
    DATA_SOURCES_KEY, EncodedField, REGION_KEY, Region, SEASONS_KEY, SUB_REGIONS_KEY,
    resolve_region, validate_data_sources, validate_region, validate_seasons,
    validate_sub_regions,
};
pub use crate::query::Query;
pub use crate::season::{Clock, FIRST_SEASON, FixedClock, SystemClock, current_season};
pub use crate::sources::FLUVIEW_URL;
pub use crate::value::ParamValue;
