// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Equipment routing table.
//!
//! Maps a zone-equipment type to either a fixed template label or one of
//! the air-system families whose name depends on the plant survey.
//! Entries are matched in order by substring of the upper-cased type.

/// Where an equipment type leads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// A fixed template label
    Template(&'static str),
    /// Look up the air distribution unit and decide on its terminal
    AirDistributionUnit,
    /// Constant-volume single-zone air system
    SingleZone,
}

pub const ROUTING_TABLE: &[(&str, Route)] = &[
    ("PACKAGEDTERMINALAIRCONDITIONER", Route::Template("PTAC")),
    ("PACKAGEDTERMINALHEATPUMP", Route::Template("PTHP")),
    ("WATERTOAIRHEATPUMP", Route::Template("WSHP")),
    ("FOURPIPEFANCOIL", Route::Template("FCUwithDOASAbridged")),
    ("IDEALLOADSAIRSYSTEM", Route::Template("IdealLoads")),
    ("UNITHEATER", Route::Template("UnitHeater")),
    ("HIGHTEMPERATURERADIANT", Route::Template("Radiant")),
    ("LOWTEMPERATURERADIANT", Route::Template("Radiant")),
    ("BASEBOARD", Route::Template("Baseboard")),
    ("DEHUMIDIFIER", Route::Template("Dehumidifier")),
    ("AIRDISTRIBUTIONUNIT", Route::AirDistributionUnit),
    // 8.x name, renamed ConstantVolume:NoReheat in 9.x
    ("SINGLEDUCT:UNCONTROLLED", Route::SingleZone),
    ("SINGLEDUCT:CONSTANTVOLUME:NOREHEAT", Route::SingleZone),
];

/// Route for an equipment type, `None` on a table miss
pub fn route(equipment_type: &str) -> Option<Route> {
    let upper = equipment_type.to_ascii_uppercase();
    ROUTING_TABLE
        .iter()
        .find(|(tag, _)| upper.contains(tag))
        .map(|&(_, route)| route)
}

/// Air terminal families behind an air distribution unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalKind {
    VariableVolume,
    ConstantVolume,
}

pub fn terminal_kind(terminal_type: &str) -> Option<TerminalKind> {
    let upper = terminal_type.to_ascii_uppercase();
    if upper.contains("VAV") {
        Some(TerminalKind::VariableVolume)
    } else if upper.contains("CONSTANTVOLUME") {
        Some(TerminalKind::ConstantVolume)
    } else {
        None
    }
}
