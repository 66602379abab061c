// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # IDF-Lite Core Parser
//!
//! Streaming parser for EnergyPlus IDF building energy models.
//!
//! ## Overview
//!
//! - **Object Reader**: line-by-line tokenization with [memchr](https://docs.rs/memchr)
//!   comment and terminator scanning
//! - **Document Model**: objects keyed by upper-cased type, fields kept in
//!   file order and accessed fallibly
//! - **Numeric Fields**: literal recognition with [nom](https://docs.rs/nom),
//!   conversion with [fast-float](https://docs.rs/fast-float)
//! - **Anomalies**: recoverable data problems reported alongside results
//!
//! ## Quick Start
//!
//! ```rust
//! use idf_lite_core::parse_str;
//!
//! let content = "Zone,\n  Core_ZN,  !- Name\n  0;        !- Direction of Relative North\n";
//! let doc = parse_str(content).unwrap();
//!
//! let zone = &doc.get("zone")[0];
//! assert_eq!(zone.name(), "Core_ZN");
//! assert_eq!(zone.number(1), Some(0.0));
//! ```
//!
//! ## Streaming
//!
//! ```rust,ignore
//! use idf_lite_core::ObjectReader;
//!
//! let file = std::io::BufReader::new(std::fs::File::open("model.idf")?);
//! for object in ObjectReader::new(file) {
//!     let (object_type, record) = object?;
//!     println!("{} {}", object_type, record.name());
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization support for records and anomalies

pub mod anomaly;
pub mod document;
pub mod error;
pub mod numeric;
pub mod parser;

pub use anomaly::Anomaly;
pub use document::{Fields, ObjectRecord, ParsedDocument};
pub use error::{Error, Result};
pub use numeric::{first_number, is_auto_keyword, parse_number};
pub use parser::{parse_file, parse_reader, parse_str, ObjectReader};
