use tracing::info;

use crate::error::{EncounterError, Roster};
use crate::model::encounter::{Encounter, EncounterContext, EncounterId};
use crate::model::encounter_data::{EncounterData, DEFAULT_ENVIRONMENT};
use crate::model::npc::{NpcFactory, RawNpc};

/// Builds an encounter from its persisted form under a fresh session id.
///
/// Each roster is read from its own raw array.
pub fn from_raw<F: NpcFactory>(
    data: &EncounterData,
    context: EncounterContext<F>,
) -> Result<Encounter<F>, EncounterError> {
    let npcs = load_roster(context.factory.as_ref(), &data.npcs, Roster::Npcs)?;
    let reinforcements = load_roster(
        context.factory.as_ref(),
        &data.reinforcements,
        Roster::Reinforcements,
    )?;

    let encounter = Encounter {
        id: EncounterId::generate(),
        name: data.name.clone(),
        location: data.location.clone(),
        labels: data.labels.clone(),
        npcs,
        reinforcements,
        gm_notes: data.gm_notes.clone().unwrap_or_default(),
        campaign: data.campaign.clone().unwrap_or_default(),
        narrative_notes: data.narrative_notes.clone().unwrap_or_default(),
        objectives: data.objectives.clone().unwrap_or_default(),
        conditions: data.conditions.clone().unwrap_or_default(),
        environment: data
            .environment
            .clone()
            .unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string()),
        environment_details: data.environment_details.clone().unwrap_or_default(),
        sitrep: data.sitrep.clone(),
        cloud_map: data.cloud_map.clone().unwrap_or_default(),
        local_map: data.local_map.clone().unwrap_or_default(),
        context,
    };

    info!(
        encounter_id = %encounter.id,
        name = %encounter.name,
        npcs = encounter.npcs.len(),
        reinforcements = encounter.reinforcements.len(),
        "encounter_loaded"
    );
    Ok(encounter)
}

/// The persisted form of an encounter. Every field is written out; the
/// session id is not.
pub fn to_raw<F: NpcFactory>(encounter: &Encounter<F>) -> EncounterData {
    let factory = encounter.context.factory.as_ref();
    EncounterData {
        name: encounter.name.clone(),
        location: encounter.location.clone(),
        npcs: encounter.npcs.iter().map(|npc| factory.serialize(npc)).collect(),
        reinforcements: encounter
            .reinforcements
            .iter()
            .map(|npc| factory.serialize(npc))
            .collect(),
        labels: encounter.labels.clone(),
        sitrep: encounter.sitrep.clone(),
        campaign: Some(encounter.campaign.clone()),
        gm_notes: Some(encounter.gm_notes.clone()),
        narrative_notes: Some(encounter.narrative_notes.clone()),
        objectives: Some(encounter.objectives.clone()),
        conditions: Some(encounter.conditions.clone()),
        environment: Some(encounter.environment.clone()),
        environment_details: Some(encounter.environment_details.clone()),
        cloud_map: Some(encounter.cloud_map.clone()),
        local_map: Some(encounter.local_map.clone()),
    }
}

/// Parses the raw JSON record, naming the offending field when it is
/// malformed.
pub fn parse_data(json: &str) -> Result<EncounterData, EncounterError> {
    let mut deserializer = serde_json::Deserializer::from_str(json);
    serde_path_to_error::deserialize::<_, EncounterData>(&mut deserializer).map_err(|error| {
        let path = error.path().to_string();
        let message = error.into_inner().to_string();
        EncounterError::Malformed { path, message }
    })
}

pub fn from_json<F: NpcFactory>(
    json: &str,
    context: EncounterContext<F>,
) -> Result<Encounter<F>, EncounterError> {
    let data = parse_data(json)?;
    from_raw(&data, context)
}

pub fn to_json<F: NpcFactory>(encounter: &Encounter<F>) -> Result<String, EncounterError> {
    Ok(serde_json::to_string_pretty(&to_raw(encounter))?)
}

fn load_roster<F: NpcFactory>(
    factory: &F,
    raw: &[RawNpc],
    roster: Roster,
) -> Result<Vec<F::Npc>, EncounterError> {
    raw.iter()
        .enumerate()
        .map(|(index, unit)| {
            factory
                .deserialize(unit)
                .map_err(|source| EncounterError::Npc { roster, index, source })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::{json, Value};

    use super::*;
    use crate::engine::persistence::MemorySink;
    use crate::error::NpcError;
    use crate::model::npc::{JsonNpc, JsonNpcFactory, UnitHandle};

    fn context() -> EncounterContext<JsonNpcFactory> {
        EncounterContext::new(JsonNpcFactory, Arc::new(MemorySink::new()))
    }

    fn full_record() -> Value {
        json!({
            "name": "Ambush",
            "location": "Outpost 7",
            "npcs": [
                {"id": "n1", "power": 40, "name": "Assault"},
                {"id": "n2", "power": "15", "name": "Sniper"}
            ],
            "reinforcements": [
                {"id": "r1", "power": 20, "name": "Scout"}
            ],
            "labels": ["hard", "night", "hard"],
            "sitrep": {
                "name": "Extraction",
                "description": "Get the package out",
                "pcVictory": "Package extracted",
                "enemyVictory": "Package destroyed",
                "extraction": "North edge"
            },
            "campaign": "Long Rim",
            "gmNotes": "Ambush from the ridge",
            "narrativeNotes": "Rain",
            "objectives": "Survive",
            "conditions": "Night",
            "environment": "Hostile",
            "environmentDetails": "Acid rain",
            "cloud_map": "https://maps.example/ridge.png",
            "local_map": "ridge.png"
        })
    }

    #[test]
    fn full_record_round_trips() {
        let raw = full_record();
        let enc = from_json(&raw.to_string(), context()).expect("load");
        let back = serde_json::to_value(to_raw(&enc)).expect("serialize");
        assert_eq!(back, raw);
        assert!(back.get("id").is_none());
    }

    #[test]
    fn rosters_come_from_their_own_arrays() {
        let enc = from_json(&full_record().to_string(), context()).expect("load");
        let npc_ids: Vec<&str> = enc.npcs().iter().map(|n| n.id()).collect();
        let reserve_ids: Vec<&str> = enc.reinforcements().iter().map(|n| n.id()).collect();
        assert_eq!(npc_ids, ["n1", "n2"]);
        assert_eq!(reserve_ids, ["r1"]);
        assert_eq!(enc.power(), 55.0);
    }

    #[test]
    fn omitted_optionals_take_defaults() {
        let mut raw = full_record();
        let object = raw.as_object_mut().expect("object");
        for key in [
            "campaign",
            "gmNotes",
            "narrativeNotes",
            "objectives",
            "conditions",
            "environment",
            "environmentDetails",
            "cloud_map",
            "local_map",
        ] {
            object.remove(key);
        }

        let enc = from_json(&raw.to_string(), context()).expect("load");
        assert_eq!(enc.environment(), "Nominal");
        assert_eq!(enc.campaign(), "");
        assert_eq!(enc.gm_notes(), "");
        assert_eq!(enc.cloud_map(), "");

        let data = to_raw(&enc);
        assert_eq!(data.environment.as_deref(), Some("Nominal"));
        assert_eq!(data.local_map.as_deref(), Some(""));
    }

    #[test]
    fn only_absent_environment_defaults() {
        let mut raw = full_record();
        raw["environment"] = json!("");
        let enc = from_json(&raw.to_string(), context()).expect("load");
        assert_eq!(enc.environment(), "");
        assert_eq!(serde_json::to_value(to_raw(&enc)).expect("serialize"), raw);

        raw["environment"] = json!(null);
        let enc = from_json(&raw.to_string(), context()).expect("load");
        assert_eq!(enc.environment(), "Nominal");
    }

    #[test]
    fn each_load_gets_a_new_id() {
        let json = full_record().to_string();
        let a = from_json(&json, context()).expect("load");
        let b = from_json(&json, context()).expect("load");
        assert_ne!(a.id(), b.id());
        assert_eq!(to_raw(&a), to_raw(&b));
    }

    #[test]
    fn missing_required_field_reports_path() {
        let mut raw = full_record();
        raw.as_object_mut().expect("object").remove("labels");
        let err = from_json(&raw.to_string(), context()).unwrap_err();
        match err {
            EncounterError::Malformed { message, .. } => assert!(message.contains("labels")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn nested_type_error_reports_path() {
        let mut raw = full_record();
        raw["sitrep"]["pcVictory"] = json!(7);
        let err = from_json(&raw.to_string(), context()).unwrap_err();
        match err {
            EncounterError::Malformed { path, .. } => assert_eq!(path, "sitrep.pcVictory"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn bad_unit_names_roster_and_index() {
        let mut raw = full_record();
        raw["reinforcements"] = json!([{"id": "r1"}, {"power": 3}]);
        let err = from_json(&raw.to_string(), context()).unwrap_err();
        match err {
            EncounterError::Npc {
                roster,
                index,
                source,
            } => {
                assert_eq!(roster, Roster::Reinforcements);
                assert_eq!(index, 1);
                assert!(matches!(source, NpcError::MissingId));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    struct PickyFactory;

    impl NpcFactory for PickyFactory {
        type Npc = JsonNpc;

        fn deserialize(&self, raw: &RawNpc) -> Result<JsonNpc, NpcError> {
            if raw.get("template").is_some() {
                return Err(NpcError::Other("templates are not supported".into()));
            }
            JsonNpcFactory.deserialize(raw)
        }

        fn serialize(&self, npc: &JsonNpc) -> RawNpc {
            JsonNpcFactory.serialize(npc)
        }
    }

    #[test]
    fn factory_rejection_is_passed_through() {
        let mut raw = full_record();
        raw["npcs"][1]["template"] = json!("elite");
        let ctx = EncounterContext::new(PickyFactory, Arc::new(MemorySink::new()));
        let err = from_json(&raw.to_string(), ctx).unwrap_err();
        match err {
            EncounterError::Npc { roster, index, source } => {
                assert_eq!(roster, Roster::Npcs);
                assert_eq!(index, 1);
                assert_eq!(source.to_string(), "templates are not supported");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn loading_does_not_save() {
        let sink = Arc::new(MemorySink::new());
        let ctx = EncounterContext::new(JsonNpcFactory, sink.clone());
        from_json(&full_record().to_string(), ctx).expect("load");
        assert_eq!(sink.save_count(), 0);
    }

    #[test]
    fn to_json_is_parseable() {
        let enc = from_json(&full_record().to_string(), context()).expect("load");
        let json = to_json(&enc).expect("json");
        let data = parse_data(&json).expect("parse");
        assert_eq!(data, to_raw(&enc));
    }
}
