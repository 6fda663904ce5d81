use serde::{Deserialize, Serialize};
use crate::core::types::{EntityId, SearchEntity};
use crate::schema::shape::EntityShape;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Opportunity {
    pub id: Option<EntityId>,
    pub opportunity_title: Option<String>,
    pub opportunity_description: Option<String>,
    pub weekly_time_commitment: Option<i32>,   // hours
    pub duration: Option<i32>,                 // weeks
}

impl Opportunity {
    pub fn new(title: &str, description: &str, weekly_time_commitment: i32, duration: i32) -> Self {
        Opportunity {
            id: None,
            opportunity_title: Some(title.to_string()),
            opportunity_description: Some(description.to_string()),
            weekly_time_commitment: Some(weekly_time_commitment),
            duration: Some(duration),
        }
    }
}

impl SearchEntity for Opportunity {
    const INDEX_NAME: &'static str = "opportunity";

    fn id(&self) -> Option<EntityId> {
        self.id
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = Some(id);
    }

    fn shape() -> EntityShape {
        EntityShape::new(Self::INDEX_NAME)
            .id_field()
            .text_field("opportunityTitle")
            .text_field("opportunityDescription")
            .number_field("weeklyTimeCommitment")
            .number_field("duration")
    }
}
