use serde::{Deserialize, Serialize};

/// Situation report: the victory, deployment and objective text of a scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sitrep {
    pub name: String,
    pub description: String,
    pub pc_victory: String,
    pub enemy_victory: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_victory: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub objective: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_zone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extraction: Option<String>,
}

impl Sitrep {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        pc_victory: impl Into<String>,
        enemy_victory: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            pc_victory: pc_victory.into(),
            enemy_victory: enemy_victory.into(),
            no_victory: None,
            deployment: None,
            objective: None,
            control_zone: None,
            extraction: None,
        }
    }
}
