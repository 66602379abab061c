// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Zone name resolution
//!
//! Load and control objects reference either a single zone or a
//! `ZoneList`. [`ZoneResolver`] maps both forms onto the canonical zone
//! names declared by `Zone` objects, matching case-insensitively.

use idf_lite_core::ParsedDocument;
use rustc_hash::FxHashMap;

pub const ZONE_OBJECT: &str = "ZONE";
pub const ZONE_LIST_OBJECT: &str = "ZONELIST";

/// Zone names in document order
pub fn zone_names(doc: &ParsedDocument) -> Vec<String> {
    doc.get(ZONE_OBJECT)
        .iter()
        .map(|r| r.name().trim())
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .collect()
}

/// Resolves zone and zone-list references to canonical zone names
#[derive(Debug, Clone, Default)]
pub struct ZoneResolver {
    names: Vec<String>,
    index: FxHashMap<String, usize>,
    lists: FxHashMap<String, Vec<usize>>,
}

impl ZoneResolver {
    pub fn new<I, S>(doc: &ParsedDocument, zones: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut resolver = ZoneResolver::default();
        for zone in zones {
            let zone = zone.as_ref().trim();
            let key = zone.to_ascii_uppercase();
            if !resolver.index.contains_key(&key) {
                resolver.index.insert(key, resolver.names.len());
                resolver.names.push(zone.to_string());
            }
        }

        for list in doc.get(ZONE_LIST_OBJECT) {
            let members: Vec<usize> = list
                .fields()
                .get(1..)
                .unwrap_or_default()
                .iter()
                .filter_map(|m| resolver.index.get(&m.trim().to_ascii_uppercase()).copied())
                .collect();
            resolver
                .lists
                .insert(list.name().trim().to_ascii_uppercase(), members);
        }
        resolver
    }

    /// Canonical name of a single zone
    pub fn canonical(&self, name: &str) -> Option<&str> {
        self.index
            .get(&name.trim().to_ascii_uppercase())
            .map(|&i| self.names[i].as_str())
    }

    /// Zones named by `reference`, which may be a zone or a zone list
    ///
    /// Returns an empty vector when the reference matches neither.
    pub fn resolve(&self, reference: &str) -> Vec<&str> {
        if let Some(zone) = self.canonical(reference) {
            return vec![zone];
        }
        self.lists
            .get(&reference.trim().to_ascii_uppercase())
            .map(|members| members.iter().map(|&i| self.names[i].as_str()).collect())
            .unwrap_or_default()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
