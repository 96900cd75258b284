//! `SqlStorageService`: the `StorageService` implementation, generic over a
//! [`SqlExecutor`] so the ranking math is testable without a live database.

use crate::executor::{cosine_similarity, lexical_score, Row, SqlExecutor};
use async_trait::async_trait;
use parking_lot::Mutex;
use second_brain_core::domain::{
    Artifact, ArtifactType, CategorizedEntry, ContentTypeConfig, LifecycleStage, MatchSource, MemoryMatch, Pattern,
    Project,
};
use second_brain_core::error::{Error, Result};
use second_brain_core::storage_service::{HybridSearchParams, SearchableTable, StorageService};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::content_type::UserContentTypeRegistry;

fn row_to_entry(row: Row) -> CategorizedEntry {
    CategorizedEntry {
        id: row.id,
        owner_user_id: row.owner_user_id,
        content: row.content,
        category: row.category,
        tags: row.tags,
        embedding: row.embedding,
        created_at: row.created_at,
    }
}

fn entry_to_row(entry: CategorizedEntry) -> Row {
    Row {
        id: entry.id,
        owner_user_id: entry.owner_user_id,
        content: entry.content,
        category: entry.category,
        tags: entry.tags,
        embedding: entry.embedding,
        created_at: entry.created_at,
    }
}

pub struct SqlStorageService<E: SqlExecutor> {
    executor: Arc<E>,
    content_types: UserContentTypeRegistry,
    patterns: Mutex<HashMap<Uuid, Pattern>>,
    projects: Mutex<HashMap<Uuid, Project>>,
    artifacts: Mutex<HashMap<Uuid, Vec<Artifact>>>,
}

impl<E: SqlExecutor> SqlStorageService<E> {
    #[must_use]
    pub fn new(executor: Arc<E>) -> Self {
        Self {
            executor,
            content_types: UserContentTypeRegistry::new(),
            patterns: Mutex::new(HashMap::new()),
            projects: Mutex::new(HashMap::new()),
            artifacts: Mutex::new(HashMap::new()),
        }
    }

    fn pattern_matches(&self, owner_id: &str) -> Vec<(Uuid, String)> {
        self.patterns
            .lock()
            .values()
            .filter(|p| p.owner_user_id == owner_id)
            .map(|p| (p.id, format!("{}: {}", p.topic, p.content)))
            .collect()
    }
}

#[async_trait]
impl<E: SqlExecutor> StorageService for SqlStorageService<E> {
    async fn hybrid_search(
        &self,
        table: SearchableTable,
        query: &str,
        owner_id: &str,
        embedding: &[f32],
        limit: usize,
        params: HybridSearchParams,
    ) -> Result<Vec<MemoryMatch>> {
        let limit = second_brain_core::util::clamp_limit(limit);

        let mut scored: Vec<(String, String, f32)> = if table == SearchableTable::Patterns {
            self.pattern_matches(owner_id)
                .into_iter()
                .map(|(id, content)| {
                    let lex = lexical_score(&content, query);
                    (id.to_string(), content, lex * params.bm25_weight)
                })
                .collect()
        } else {
            self.executor
                .all_rows(table, owner_id)
                .await?
                .into_iter()
                .map(|row| {
                    let lex = lexical_score(&row.content, query) * params.bm25_weight;
                    let vec_score = row
                        .embedding
                        .as_deref()
                        .map(|e| cosine_similarity(e, embedding) * params.vector_weight)
                        .unwrap_or(0.0);
                    (row.id.to_string(), row.content, lex + vec_score)
                })
                .collect()
        };

        scored.retain(|(_, _, score)| *score >= params.threshold);
        scored.sort_by(|a, b| b.2.partial_cmp(&a.2).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(limit);

        Ok(scored
            .into_iter()
            .map(|(id, content, score)| MemoryMatch::new(MatchSource::Bm25, id, content, score))
            .collect())
    }

    async fn vector_search(
        &self,
        table: SearchableTable,
        embedding: &[f32],
        owner_id: &str,
        limit: usize,
        threshold: f32,
    ) -> Result<Vec<MemoryMatch>> {
        let limit = second_brain_core::util::clamp_limit(limit);
        let rows = self.executor.all_rows(table, owner_id).await?;
        let mut scored: Vec<MemoryMatch> = rows
            .into_iter()
            .filter_map(|row| {
                let score = row.embedding.as_deref().map(|e| cosine_similarity(e, embedding))?;
                if score < threshold {
                    return None;
                }
                Some(MemoryMatch::new(MatchSource::Vector, row.id.to_string(), row.content, score))
            })
            .collect();
        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(limit);
        Ok(scored)
    }

    async fn get_entry(&self, table: SearchableTable, id: Uuid) -> Result<Option<CategorizedEntry>> {
        Ok(self.executor.get_row(table, id).await?.map(row_to_entry))
    }

    async fn insert_entry(&self, table: SearchableTable, entry: CategorizedEntry) -> Result<Uuid> {
        self.executor.insert_row(table, entry_to_row(entry)).await
    }

    async fn delete_entry(&self, table: SearchableTable, id: Uuid) -> Result<()> {
        self.executor.delete_row(table, id).await
    }

    async fn upsert_patterns(&self, owner_id: &str, patterns: Vec<Pattern>) -> Result<Vec<Pattern>> {
        let mut store = self.patterns.lock();
        let mut result = Vec::with_capacity(patterns.len());
        for incoming in patterns {
            if incoming.owner_user_id != owner_id {
                return Err(Error::InvalidInput("pattern owner does not match call scope".to_string()));
            }
            let identity = incoming.identity_key();
            let existing = store.values_mut().find(|p| p.identity_key() == identity);
            match existing {
                Some(existing) => {
                    existing.reinforce(0.1);
                    result.push(existing.clone());
                }
                None => {
                    store.insert(incoming.id, incoming.clone());
                    result.push(incoming);
                }
            }
        }
        Ok(result)
    }

    async fn create_project(&self, project: Project) -> Result<Project> {
        self.projects.lock().insert(project.id, project.clone());
        Ok(project)
    }

    async fn update_project(&self, project: Project) -> Result<Project> {
        let mut projects = self.projects.lock();
        if !projects.contains_key(&project.id) {
            return Err(Error::NotFound(format!("project {} not found", project.id)));
        }
        projects.insert(project.id, project.clone());
        Ok(project)
    }

    async fn advance_project(&self, project_id: Uuid, stage: LifecycleStage) -> Result<Project> {
        let mut projects = self.projects.lock();
        let project = projects
            .get_mut(&project_id)
            .ok_or_else(|| Error::NotFound(format!("project {project_id} not found")))?;
        project.advance(stage)?;
        Ok(project.clone())
    }

    async fn list_projects(&self, owner_id: &str) -> Result<Vec<Project>> {
        Ok(self
            .projects
            .lock()
            .values()
            .filter(|p| p.owner_user_id == owner_id)
            .cloned()
            .collect())
    }

    async fn add_artifact(
        &self,
        project_id: Uuid,
        artifact_type: ArtifactType,
        title: &str,
        content: &str,
    ) -> Result<Artifact> {
        if !self.projects.lock().contains_key(&project_id) {
            return Err(Error::NotFound(format!("project {project_id} not found")));
        }
        let artifact = Artifact {
            id: Uuid::new_v4(),
            project_id,
            artifact_type,
            title: title.to_string(),
            content: content.to_string(),
        };
        let mut artifacts = self.artifacts.lock();
        let existing = artifacts.entry(project_id).or_default();
        existing.retain(|a| a.artifact_type != artifact_type);
        existing.push(artifact.clone());
        Ok(artifact)
    }

    async fn delete_artifact(&self, project_id: Uuid, artifact_type: ArtifactType) -> Result<()> {
        let mut artifacts = self.artifacts.lock();
        let existing = artifacts.entry(project_id).or_default();
        let before = existing.len();
        existing.retain(|a| a.artifact_type != artifact_type);
        if existing.len() == before {
            return Err(Error::NotFound(format!("no {artifact_type:?} artifact for project {project_id}")));
        }
        Ok(())
    }

    async fn list_artifacts(&self, project_id: Uuid) -> Result<Vec<Artifact>> {
        Ok(self.artifacts.lock().get(&project_id).cloned().unwrap_or_default())
    }

    async fn list_content_types(&self) -> Result<Vec<ContentTypeConfig>> {
        Ok(self.content_types.list())
    }

    async fn add_content_type(&self, config: ContentTypeConfig) -> Result<()> {
        self.content_types.add(config)
    }

    async fn remove_content_type(&self, slug: &str) -> Result<()> {
        self.content_types.remove(slug)
    }
}
