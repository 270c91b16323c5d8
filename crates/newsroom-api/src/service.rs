//! News lifecycle: validation, persistence and the publishing side effect.
//!
//! Create is insert → publish → record the external post id. When publishing
//! fails the inserted item is removed through the regular delete path, so an
//! item never stays stored without its post. Delete removes the item first
//! and only then retracts the post; the deletion stands whatever the
//! retraction outcome.

use std::sync::Arc;

use tracing::{error, info, warn};
use uuid::Uuid;

use newsroom_db::NewsRepository;
use newsroom_db::query::{NewsQuery, Page};
use newsroom_db::repository::parse_id;
use newsroom_publish::Publisher;
use newsroom_types::models::{NewsInput, NewsItem};

use crate::error::NewsError;
use crate::{projector, validate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteOutcome {
    /// `None` when the item had no external post.
    pub retracted: Option<bool>,
}

#[derive(Clone)]
pub struct NewsService {
    repo: NewsRepository,
    publisher: Arc<dyn Publisher>,
}

impl NewsService {
    pub fn new(repo: NewsRepository, publisher: Arc<dyn Publisher>) -> Self {
        Self { repo, publisher }
    }

    // -- Reads --

    pub async fn list(&self, text: Option<String>, page: Page) -> Result<Vec<NewsItem>, NewsError> {
        let spec = NewsQuery {
            text,
            page,
            ..Default::default()
        }
        .build();
        Ok(self.repo.find_many(spec).await?)
    }

    pub async fn list_featured(&self) -> Result<Vec<NewsItem>, NewsError> {
        let spec = NewsQuery {
            featured_only: true,
            ..Default::default()
        }
        .build();
        Ok(self.repo.find_many(spec).await?)
    }

    pub async fn list_projects(&self) -> Result<Vec<Uuid>, NewsError> {
        Ok(self.repo.list_distinct_projects().await?)
    }

    pub async fn list_for_project(
        &self,
        project_id: &str,
        text: Option<String>,
        page: Page,
    ) -> Result<Vec<NewsItem>, NewsError> {
        let project = parse_id(project_id)?;
        let spec = NewsQuery {
            text,
            project: Some(project),
            page,
            ..Default::default()
        }
        .build();
        Ok(self.repo.find_many(spec).await?)
    }

    pub async fn get(&self, id: &str) -> Result<NewsItem, NewsError> {
        self.repo.find_by_id(id).await?.ok_or(NewsError::NotFound)
    }

    // -- Writes --

    pub async fn create(&self, input: NewsInput) -> Result<NewsItem, NewsError> {
        let project = validate::validate_create(&input)?;
        let doc = projector::to_create_document(&input, project, chrono::Utc::now().timestamp_millis());

        let item = self.repo.insert(doc).await?;
        info!("Created news {} ({})", item.id, item.title);

        let post_id = match self.publisher.publish(&item).await {
            Ok(post_id) => post_id,
            Err(e) => {
                warn!("Publishing news {} failed, rolling back: {}", item.id, e);
                if let Err(rollback) = self.delete(&item.id.to_string()).await {
                    error!("Rollback of news {} failed: {}", item.id, rollback);
                }
                return Err(e.into());
            }
        };

        match self.repo.set_external_post_id(item.id, post_id).await {
            Ok(Some(item)) => Ok(item),
            Ok(None) => {
                warn!("News {} vanished before post {} was recorded", item.id, post_id);
                self.retract(post_id).await;
                Err(NewsError::NotFound)
            }
            Err(e) => {
                error!("Recording post {} for news {} failed: {}", post_id, item.id, e);
                Err(e.into())
            }
        }
    }

    pub async fn update(&self, id: &str, input: NewsInput) -> Result<NewsItem, NewsError> {
        parse_id(id)?;
        let project = validate::validate_update(&input)?;

        let patch = projector::to_update_document(&input, project);
        if patch.is_empty() {
            return Err(NewsError::Validation("no updatable fields supplied".into()));
        }

        let item = self.repo.update_by_id(id, patch).await?.ok_or(NewsError::NotFound)?;
        info!("Updated news {}", item.id);
        Ok(item)
    }

    pub async fn delete(&self, id: &str) -> Result<DeleteOutcome, NewsError> {
        let (found, post_id) = self.repo.delete_by_id(id).await?;
        if !found {
            return Err(NewsError::NotFound);
        }
        info!("Deleted news {}", id);

        let retracted = match post_id {
            Some(post_id) => Some(self.retract(post_id).await),
            None => None,
        };
        Ok(DeleteOutcome { retracted })
    }

    /// Best-effort retraction; failures are logged and reported as `false`.
    async fn retract(&self, post_id: i64) -> bool {
        match self.publisher.retract(post_id).await {
            Ok(true) => {
                info!("Retracted post {}", post_id);
                true
            }
            Ok(false) => false,
            Err(e) => {
                warn!("Retracting post {} failed: {}", post_id, e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use newsroom_db::Database;
    use newsroom_db::models::NewNews;
    use newsroom_publish::PublishError;

    use super::*;

    /// Publisher double: `post_id: None` fails every publish with a fetch error.
    #[derive(Default)]
    struct StubPublisher {
        post_id: Option<i64>,
        retract_fails: bool,
        published: Mutex<Vec<NewsItem>>,
        retracted: Mutex<Vec<i64>>,
    }

    #[async_trait]
    impl Publisher for StubPublisher {
        async fn publish(&self, item: &NewsItem) -> Result<i64, PublishError> {
            self.published.lock().unwrap().push(item.clone());
            self.post_id
                .ok_or_else(|| PublishError::Fetch(format!("{} returned 404 Not Found", item.thumbnail)))
        }

        async fn retract(&self, post_id: i64) -> Result<bool, PublishError> {
            self.retracted.lock().unwrap().push(post_id);
            if self.retract_fails {
                Err(PublishError::Retract("503 Service Unavailable".into()))
            } else {
                Ok(true)
            }
        }
    }

    fn service(publisher: StubPublisher) -> (NewsService, NewsRepository, Arc<StubPublisher>) {
        let repo = NewsRepository::new(Arc::new(Database::open_in_memory().unwrap()));
        let publisher = Arc::new(publisher);
        let service = NewsService::new(repo.clone(), publisher.clone());
        (service, repo, publisher)
    }

    fn input(title: &str, project: Uuid) -> NewsInput {
        NewsInput {
            title: title.to_string(),
            project: project.to_string(),
            kind: "release".into(),
            content: format!("{} content", title),
            thumbnail: "https://example.com/thumb.png".into(),
            featured: None,
        }
    }

    #[tokio::test]
    async fn create_publishes_and_delete_retracts() {
        let (service, _repo, publisher) = service(StubPublisher {
            post_id: Some(42),
            ..Default::default()
        });
        let project = Uuid::new_v4();

        let before = chrono::Utc::now().timestamp_millis();
        let item = service.create(input("Launch", project)).await.unwrap();
        let after = chrono::Utc::now().timestamp_millis();

        assert_eq!(item.title, "Launch");
        assert_eq!(item.project, project);
        assert_eq!(item.external_post_id, Some(42));
        assert!(item.timestamp >= before && item.timestamp <= after);
        assert_eq!(publisher.published.lock().unwrap()[0].id, item.id);

        let stored = service.get(&item.id.to_string()).await.unwrap();
        assert_eq!(stored, item);

        let outcome = service.delete(&item.id.to_string()).await.unwrap();
        assert_eq!(outcome.retracted, Some(true));
        assert_eq!(*publisher.retracted.lock().unwrap(), vec![42]);
        assert!(matches!(service.get(&item.id.to_string()).await, Err(NewsError::NotFound)));
    }

    #[tokio::test]
    async fn failed_publish_rolls_back() {
        let (service, _repo, publisher) = service(StubPublisher::default());

        let err = service.create(input("Broken", Uuid::new_v4())).await.unwrap_err();
        assert!(matches!(err, NewsError::Publish(PublishError::Fetch(_))), "got {:?}", err);

        let listed = service.list(None, Page::default()).await.unwrap();
        assert!(listed.is_empty());
        let searched = service.list(Some("Broken".into()), Page::default()).await.unwrap();
        assert!(searched.is_empty());

        // Nothing was posted, so nothing is retracted.
        assert!(publisher.retracted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn invalid_input_touches_nothing() {
        let (service, _repo, publisher) = service(StubPublisher {
            post_id: Some(1),
            ..Default::default()
        });

        let mut bad = input("Launch", Uuid::new_v4());
        bad.thumbnail = "not a url".into();
        assert!(matches!(service.create(bad).await, Err(NewsError::Validation(_))));

        assert!(publisher.published.lock().unwrap().is_empty());
        assert!(service.list(None, Page::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_missing_is_not_found_every_time() {
        let (service, _repo, _publisher) = service(StubPublisher::default());
        let id = Uuid::new_v4().to_string();

        assert!(matches!(service.delete(&id).await, Err(NewsError::NotFound)));
        assert!(matches!(service.delete(&id).await, Err(NewsError::NotFound)));
        assert!(matches!(service.delete("garbage").await, Err(NewsError::InvalidId(_))));
    }

    #[tokio::test]
    async fn failed_retraction_still_deletes() {
        let (service, _repo, publisher) = service(StubPublisher {
            post_id: Some(7),
            retract_fails: true,
            ..Default::default()
        });

        let item = service.create(input("Launch", Uuid::new_v4())).await.unwrap();
        let outcome = service.delete(&item.id.to_string()).await.unwrap();

        assert_eq!(outcome.retracted, Some(false));
        assert_eq!(*publisher.retracted.lock().unwrap(), vec![7]);
        assert!(matches!(service.get(&item.id.to_string()).await, Err(NewsError::NotFound)));
    }

    #[tokio::test]
    async fn update_merges_and_protects_system_fields() {
        let (service, _repo, _publisher) = service(StubPublisher {
            post_id: Some(42),
            ..Default::default()
        });
        let created = service.create(input("Launch", Uuid::new_v4())).await.unwrap();

        // Caller tries to smuggle protected fields alongside one real change.
        let body = serde_json::json!({
            "id": Uuid::new_v4(),
            "timestamp": 1,
            "externalPostId": 99,
            "content": "Updated content",
        });
        let patch: NewsInput = serde_json::from_value(body).unwrap();
        let updated = service.update(&created.id.to_string(), patch).await.unwrap();

        assert_eq!(updated.content, "Updated content");
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.timestamp, created.timestamp);
        assert_eq!(updated.external_post_id, Some(42));
        assert_eq!(updated.title, created.title);
        assert_eq!(updated.kind, created.kind);
        assert_eq!(updated.thumbnail, created.thumbnail);
        assert_eq!(updated.project, created.project);
    }

    #[tokio::test]
    async fn update_cannot_blank_title_or_set_bad_featured() {
        let (service, _repo, _publisher) = service(StubPublisher {
            post_id: Some(42),
            ..Default::default()
        });
        let created = service.create(input("Launch", Uuid::new_v4())).await.unwrap();
        let id = created.id.to_string();

        let blank = NewsInput {
            title: "   ".into(),
            ..Default::default()
        };
        assert!(matches!(service.update(&id, blank).await, Err(NewsError::Validation(_))));

        let bad_featured = NewsInput {
            featured: Some("definitely not a url".into()),
            ..Default::default()
        };
        assert!(matches!(service.update(&id, bad_featured).await, Err(NewsError::Validation(_))));

        let stored = service.get(&id).await.unwrap();
        assert_eq!(stored.title, "Launch");
        assert_eq!(stored.featured, None);
    }

    #[tokio::test]
    async fn create_rejects_non_url_featured() {
        let (service, _repo, publisher) = service(StubPublisher {
            post_id: Some(1),
            ..Default::default()
        });

        let mut bad = input("Launch", Uuid::new_v4());
        bad.featured = Some("definitely not a url".into());
        assert!(matches!(service.create(bad).await, Err(NewsError::Validation(_))));
        assert!(publisher.published.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_errors() {
        let (service, _repo, _publisher) = service(StubPublisher::default());
        let change = NewsInput {
            title: "New".into(),
            ..Default::default()
        };

        assert!(matches!(
            service.update("nope", change.clone()).await,
            Err(NewsError::InvalidId(_))
        ));
        assert!(matches!(
            service.update(&Uuid::new_v4().to_string(), change).await,
            Err(NewsError::NotFound)
        ));
        assert!(matches!(
            service.update(&Uuid::new_v4().to_string(), NewsInput::default()).await,
            Err(NewsError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn listings() {
        let (service, repo, _publisher) = service(StubPublisher::default());
        let project = Uuid::new_v4();
        let other = Uuid::new_v4();

        for ts in 1..=5 {
            let featured = match ts {
                1 => Some(String::new()),
                2 => Some("https://example.com/banner.png".into()),
                _ => None,
            };
            repo.insert(NewNews {
                title: format!("Item {}", ts),
                project: if ts == 5 { other } else { project },
                kind: "update".into(),
                timestamp: ts,
                content: "body".into(),
                thumbnail: "https://example.com/t.png".into(),
                featured,
            })
            .await
            .unwrap();
        }

        let page = Page { limit: Some(2), skip: None };
        let newest: Vec<i64> = service.list(None, page).await.unwrap().iter().map(|n| n.timestamp).collect();
        assert_eq!(newest, vec![5, 4]);

        let featured: Vec<i64> = service.list_featured().await.unwrap().iter().map(|n| n.timestamp).collect();
        assert_eq!(featured, vec![2, 1]);

        let scoped = service
            .list_for_project(&project.to_string(), Some("item 3".into()), Page::default())
            .await
            .unwrap();
        assert_eq!(scoped.len(), 1);
        assert_eq!(scoped[0].timestamp, 3);

        assert!(matches!(
            service.list_for_project("xyz", None, Page::default()).await,
            Err(NewsError::InvalidId(_))
        ));

        let mut projects = service.list_projects().await.unwrap();
        projects.sort();
        let mut expected = vec![project, other];
        expected.sort();
        assert_eq!(projects, expected);
    }
}
