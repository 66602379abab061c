// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Construction thermal resistance from material layers.

use idf_lite_core::{Anomaly, ParsedDocument};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::loads::invalid_value;

pub const CONSTRUCTION_OBJECT: &str = "CONSTRUCTION";
pub const MATERIAL_OBJECT: &str = "MATERIAL";
pub const NO_MASS_MATERIAL_OBJECT: &str = "MATERIAL:NOMASS";
pub const AIR_GAP_OBJECT: &str = "MATERIAL:AIRGAP";
pub const SIMPLE_GLAZING_OBJECT: &str = "WINDOWMATERIAL:SIMPLEGLAZINGSYSTEM";
const WINDOW_MATERIAL_PREFIX: &str = "WINDOWMATERIAL:";

#[derive(Debug, Clone, Copy, PartialEq)]
enum Layer {
    /// m²·K/W
    Resistance(f64),
    /// Glazing system rated by U-factor, W/m²·K
    Glazing(f64),
    /// Window layer without a usable rating
    Fenestration,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstructionSummary {
    pub name: String,
    pub layers: Vec<String>,
    /// Sum of opaque layer resistances, m²·K/W
    pub r_value: f64,
    /// W/m²·K; the glazing rating for windows, 1/R for opaque assemblies
    pub u_value: Option<f64>,
}

fn material_layers(doc: &ParsedDocument, anomalies: &mut Vec<Anomaly>) -> FxHashMap<String, Layer> {
    let mut layers = FxHashMap::default();
    let key = |name: &str| name.trim().to_ascii_uppercase();

    for record in doc.get(MATERIAL_OBJECT) {
        match (record.number(2), record.number(3)) {
            (Some(thickness), Some(conductivity)) if conductivity > 0.0 => {
                layers.insert(key(record.name()), Layer::Resistance(thickness / conductivity));
            }
            (Some(_), _) => anomalies.push(invalid_value(MATERIAL_OBJECT, record, 3)),
            (None, _) => anomalies.push(invalid_value(MATERIAL_OBJECT, record, 2)),
        }
    }
    for (object_type, field) in [(NO_MASS_MATERIAL_OBJECT, 2), (AIR_GAP_OBJECT, 1)] {
        for record in doc.get(object_type) {
            match record.number(field) {
                Some(r) => {
                    layers.insert(key(record.name()), Layer::Resistance(r));
                }
                None => anomalies.push(invalid_value(object_type, record, field)),
            }
        }
    }
    for (object_type, records) in doc.iter() {
        if !object_type.starts_with(WINDOW_MATERIAL_PREFIX) {
            continue;
        }
        for record in records {
            let layer = match object_type {
                SIMPLE_GLAZING_OBJECT => record.number(1).map_or(Layer::Fenestration, Layer::Glazing),
                _ => Layer::Fenestration,
            };
            layers.insert(key(record.name()), layer);
        }
    }
    layers
}

/// R-value of every construction, in document order
///
/// Layers naming no known material contribute nothing and are reported.
pub fn construction_summary(
    doc: &ParsedDocument,
    anomalies: &mut Vec<Anomaly>,
) -> Vec<ConstructionSummary> {
    let materials = material_layers(doc, anomalies);

    doc.get(CONSTRUCTION_OBJECT)
        .iter()
        .map(|record| {
            let layers: Vec<String> = record
                .fields()
                .get(1..)
                .unwrap_or_default()
                .iter()
                .filter(|l| !l.is_empty())
                .cloned()
                .collect();

            let mut r_value = 0.0;
            let mut glazing_u = None;
            let mut fenestration = false;
            for layer in &layers {
                match materials.get(&layer.to_ascii_uppercase()) {
                    Some(Layer::Resistance(r)) => r_value += r,
                    Some(Layer::Glazing(u)) => glazing_u = Some(*u),
                    Some(Layer::Fenestration) => fenestration = true,
                    None => anomalies.push(Anomaly::unresolved(
                        format!("{} '{}' layer", CONSTRUCTION_OBJECT, record.name()),
                        layer.as_str(),
                    )),
                }
            }

            let u_value = match glazing_u {
                Some(u) => Some(u),
                None if !fenestration && r_value > 0.0 => Some(1.0 / r_value),
                None => None,
            };
            ConstructionSummary {
                name: record.name().to_string(),
                layers,
                r_value,
                u_value,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use idf_lite_core::parse_str;

    const IDF: &str = "
        Material, Brick, Rough, 0.1, 0.5, 1900, 800;
        Material, Insulation, MediumRough, 0.08, 0.04, 30, 1200;
        Material:NoMass, Membrane, Rough, 0.15;
        WindowMaterial:SimpleGlazingSystem, Glass Rating, 1.8, 0.4;
        Construction, HPWall, Brick, Insulation, Membrane;
        Construction, Window, Glass Rating;
        Construction, Mystery, Brick, Unobtainium;
    ";

    #[test]
    fn test_layer_resistances_sum() {
        let doc = parse_str(IDF).unwrap();
        let mut anomalies = Vec::new();
        let summary = construction_summary(&doc, &mut anomalies);

        let wall = &summary[0];
        assert_eq!(wall.layers, vec!["Brick", "Insulation", "Membrane"]);
        assert_relative_eq!(wall.r_value, 0.2 + 2.0 + 0.15);
        assert_relative_eq!(wall.u_value.unwrap(), 1.0 / 2.35);
    }

    #[test]
    fn test_glazing_uses_rating() {
        let doc = parse_str(IDF).unwrap();
        let summary = construction_summary(&doc, &mut Vec::new());
        assert_eq!(summary[1].r_value, 0.0);
        assert_eq!(summary[1].u_value, Some(1.8));
    }

    #[test]
    fn test_unknown_layer_reported() {
        let doc = parse_str(IDF).unwrap();
        let mut anomalies = Vec::new();
        let summary = construction_summary(&doc, &mut anomalies);
        assert_relative_eq!(summary[2].r_value, 0.2);
        assert_eq!(
            anomalies,
            vec![Anomaly::unresolved("CONSTRUCTION 'Mystery' layer", "Unobtainium")]
        );
    }
}
