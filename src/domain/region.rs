use serde::{Deserialize, Serialize};
use crate::core::types::{EntityId, SearchEntity};
use crate::schema::shape::EntityShape;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub id: Option<EntityId>,
    pub region_name: Option<String>,
}

impl Region {
    pub fn named(name: &str) -> Self {
        Region {
            id: None,
            region_name: Some(name.to_string()),
        }
    }
}

impl SearchEntity for Region {
    const INDEX_NAME: &'static str = "region";

    fn id(&self) -> Option<EntityId> {
        self.id
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = Some(id);
    }

    fn shape() -> EntityShape {
        EntityShape::new(Self::INDEX_NAME)
            .id_field()
            .text_field("regionName")
    }
}
