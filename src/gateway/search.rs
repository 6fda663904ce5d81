use std::marker::PhantomData;
use std::sync::Arc;
use crate::codec::mapper::EntityMapper;
use crate::core::config::SearchConfig;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::logging::targets;
use crate::core::types::{EntityId, SearchEntity};
use crate::engine::backend::SearchBackend;
use crate::schema::shape::EntityShape;

/// Decoded hit with the relevance score the backend assigned to it.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredEntity<E> {
    pub entity: E,
    pub score: f32,
}

/// Index, delete, fetch and query entities of type `E` in a search backend.
///
/// The gateway owns error translation: any failure reported by the backend
/// surfaces as [`ErrorKind::SearchUnavailable`], while codec failures keep
/// their [`ErrorKind::MappingFailure`] kind. It holds no lock of its own;
/// the backend handle is shared as is by every caller.
pub struct SearchGateway<E: SearchEntity> {
    backend: Arc<dyn SearchBackend>,
    mapper: EntityMapper,
    shape: EntityShape,
    limit: usize,
    _entity: PhantomData<fn() -> E>,
}

impl<E: SearchEntity> SearchGateway<E> {
    pub fn new(backend: Arc<dyn SearchBackend>, mapper: EntityMapper, config: &SearchConfig) -> Self {
        SearchGateway {
            backend,
            mapper,
            shape: E::shape(),
            limit: config.default_limit,
            _entity: PhantomData,
        }
    }

    pub fn index_name(&self) -> &'static str {
        E::INDEX_NAME
    }

    pub fn shape(&self) -> &EntityShape {
        &self.shape
    }

    pub fn mapper(&self) -> &EntityMapper {
        &self.mapper
    }

    /// Pushes the entity shape to the backend as the index mapping.
    pub fn put_mapping(&self) -> Result<()> {
        self.backend
            .ensure_index(E::INDEX_NAME, &self.shape)
            .map_err(|e| self.unavailable("apply mapping to", None, e))
    }

    /// Writes or overwrites the record for the entity's id.
    pub fn index(&self, entity: &E) -> Result<()> {
        let id = entity.id().ok_or_else(|| {
            Error::new(
                ErrorKind::InvalidArgument,
                format!("cannot index a `{}` without an id", E::INDEX_NAME),
            )
        })?;

        let source = self.mapper.map_to_string(entity)?;
        self.backend
            .upsert(E::INDEX_NAME, id, &source)
            .map_err(|e| self.unavailable("index", Some(id), e))?;

        tracing::debug!(
            target: targets::GATEWAY,
            index = E::INDEX_NAME,
            id = id.0,
            bytes = source.len(),
            "entity indexed"
        );
        Ok(())
    }

    /// Removes the record for `id`; an absent record is not an error.
    pub fn delete(&self, id: EntityId) -> Result<()> {
        let removed = self
            .backend
            .delete(E::INDEX_NAME, id)
            .map_err(|e| self.unavailable("delete", Some(id), e))?;

        tracing::debug!(
            target: targets::GATEWAY,
            index = E::INDEX_NAME,
            id = id.0,
            removed,
            "entity removed from index"
        );
        Ok(())
    }

    pub fn get(&self, id: EntityId) -> Result<Option<E>> {
        let source = self
            .backend
            .get(E::INDEX_NAME, id)
            .map_err(|e| self.unavailable("get", Some(id), e))?;

        source
            .map(|source| self.mapper.map_to_object(&source, &self.shape))
            .transpose()
    }

    /// Free-text search; hits keep the backend's relevance order.
    pub fn query(&self, text: &str) -> Result<Vec<E>> {
        Ok(self
            .query_hits(text)?
            .into_iter()
            .map(|hit| hit.entity)
            .collect())
    }

    pub fn query_hits(&self, text: &str) -> Result<Vec<ScoredEntity<E>>> {
        let hits = self
            .backend
            .search(E::INDEX_NAME, text, self.limit)
            .map_err(|e| self.unavailable("query", None, e))?;

        let entities = hits
            .into_iter()
            .map(|hit| {
                let entity = self.mapper.map_to_object(&hit.source, &self.shape)?;
                Ok(ScoredEntity { entity, score: hit.score })
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(
            target: targets::GATEWAY,
            index = E::INDEX_NAME,
            query_len = text.len(),
            hits = entities.len(),
            "query completed"
        );
        Ok(entities)
    }

    fn unavailable(&self, op: &str, id: Option<EntityId>, cause: Error) -> Error {
        let target = match id {
            Some(id) => format!("{}/{}", E::INDEX_NAME, id),
            None => E::INDEX_NAME.to_string(),
        };
        Error::unavailable(
            format!("search backend `{}` failed to {} {}", self.backend.name(), op, target),
            cause,
        )
    }
}
