use serde::{Deserialize, Serialize};

use crate::model::npc::RawNpc;
use crate::model::sitrep::Sitrep;

pub const DEFAULT_ENVIRONMENT: &str = "Nominal";

/// The persisted form of an encounter.
///
/// Carries no identity: an `Encounter` gets a fresh session id every time
/// it is built from one of these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncounterData {
    pub name: String,
    pub location: String,
    pub npcs: Vec<RawNpc>,
    pub reinforcements: Vec<RawNpc>,
    pub labels: Vec<String>,
    pub sitrep: Sitrep,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub campaign: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gm_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub narrative_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub objectives: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment_details: Option<String>,

    // Map references keep their snake_case keys on the wire.
    #[serde(default, rename = "cloud_map", skip_serializing_if = "Option::is_none")]
    pub cloud_map: Option<String>,
    #[serde(default, rename = "local_map", skip_serializing_if = "Option::is_none")]
    pub local_map: Option<String>,
}

impl EncounterData {
    /// A minimal record with every optional field absent.
    pub fn new(name: impl Into<String>, location: impl Into<String>, sitrep: Sitrep) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
            npcs: Vec::new(),
            reinforcements: Vec::new(),
            labels: Vec::new(),
            sitrep,
            campaign: None,
            gm_notes: None,
            narrative_notes: None,
            objectives: None,
            conditions: None,
            environment: None,
            environment_details: None,
            cloud_map: None,
            local_map: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sitrep_json() -> serde_json::Value {
        json!({
            "name": "Standard Combat",
            "description": "",
            "pcVictory": "Defeat all hostiles",
            "enemyVictory": "Defeat all PCs",
        })
    }

    #[test]
    fn wire_keys_match_persisted_layout() {
        let mut data = EncounterData::new(
            "Ambush",
            "Outpost 7",
            serde_json::from_value(sitrep_json()).expect("sitrep"),
        );
        data.gm_notes = Some("watch the flank".into());
        data.environment_details = Some("dust storm".into());
        data.cloud_map = Some("https://maps.example/a.png".into());
        data.local_map = Some("a.png".into());

        let value = serde_json::to_value(&data).expect("serialize");
        let object = value.as_object().expect("object");
        for key in ["gmNotes", "environmentDetails", "cloud_map", "local_map", "sitrep"] {
            assert!(object.contains_key(key), "missing key {key}");
        }
        assert!(!object.contains_key("campaign"));
    }

    #[test]
    fn null_optionals_read_as_absent() {
        let data: EncounterData = serde_json::from_value(json!({
            "name": "Ambush",
            "location": "Outpost 7",
            "npcs": [],
            "reinforcements": [],
            "labels": [],
            "sitrep": sitrep_json(),
            "campaign": null,
        }))
        .expect("deserialize");
        assert_eq!(data.campaign, None);
    }
}
