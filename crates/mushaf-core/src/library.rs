//! [`Library`] — read-through caching of documents over a [`LocalStore`].
//!
//! A document is looked up locally first. On a miss the [`DocumentSource`] is
//! asked, and the result is persisted when the caller wants it kept offline.

use std::collections::HashSet;

use serde::Serialize;
use tracing::debug;

use crate::{document::Document, source::DocumentSource, store::LocalStore};

/// Whether a document fetched from the source should be stored locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CachePolicy {
  #[default]
  Persist,
  Transient,
}

/// One row of the document catalog, flagged with its offline status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
  #[serde(flatten)]
  pub document:   Document,
  pub downloaded: bool,
}

pub struct Library<S, R> {
  store:  S,
  source: R,
}

impl<S, R> Library<S, R>
where
  S: LocalStore,
  R: DocumentSource,
{
  pub fn new(store: S, source: R) -> Self { Self { store, source } }

  pub fn store(&self) -> &S { &self.store }

  pub fn source(&self) -> &R { &self.source }

  /// Return a complete document, from the store if possible.
  ///
  /// A stored summary without units counts as a miss; if the source cannot
  /// supply the document either, the stored summary is returned as is.
  pub async fn open_document(
    &self,
    document_id: u32,
    policy: CachePolicy,
  ) -> Result<Option<Document>, S::Error> {
    let cached = self.store.get_document(document_id).await?;
    if let Some(document) = &cached
      && document.is_complete()
    {
      debug!(document_id, "served from local store");
      return Ok(cached);
    }

    let Some(document) = self.source.fetch_document_detail(document_id).await else {
      return Ok(cached);
    };

    if policy == CachePolicy::Persist {
      self.store.put_document(&document).await?;
      debug!(document_id, "cached fetched document");
    }
    Ok(Some(document))
  }

  /// Fetch a document and store it. Returns `false` when the source has
  /// nothing to store.
  pub async fn download(&self, document_id: u32) -> Result<bool, S::Error> {
    match self.source.fetch_document_detail(document_id).await {
      Some(document) => {
        self.store.put_document(&document).await?;
        Ok(true)
      }
      None => Ok(false),
    }
  }

  pub async fn is_downloaded(&self, document_id: u32) -> Result<bool, S::Error> {
    Ok(self.store.get_document(document_id).await?.is_some())
  }

  /// The source's document list, each entry flagged with whether it is held
  /// locally.
  pub async fn catalog(&self) -> Result<Vec<CatalogEntry>, S::Error> {
    let list = self.source.fetch_document_list().await;
    let downloaded: HashSet<u32> = self.store.document_ids().await?.into_iter().collect();

    Ok(
      list
        .into_iter()
        .map(|document| CatalogEntry {
          downloaded: downloaded.contains(&document.document_id),
          document,
        })
        .collect(),
    )
  }

  /// Locally stored documents matching `query`, ordered by id.
  pub async fn search_offline(&self, query: &str) -> Result<Vec<Document>, S::Error> {
    let mut found: Vec<Document> = self
      .store
      .all_documents()
      .await?
      .into_iter()
      .filter(|d| d.matches(query))
      .collect();
    found.sort_by_key(|d| d.document_id);
    Ok(found)
  }
}

#[cfg(test)]
mod tests {
  use std::{
    collections::{BTreeMap, HashMap},
    convert::Infallible,
    sync::{
      Mutex,
      atomic::{AtomicUsize, Ordering},
    },
  };

  use super::*;
  use crate::{
    bookmark::Bookmark,
    catalog,
    document::{Token, Unit},
    preferences::Preferences,
  };

  /// In-memory `LocalStore` double.
  #[derive(Default)]
  struct MemoryStore {
    documents:   Mutex<BTreeMap<u32, Document>>,
    bookmarks:   Mutex<HashMap<String, Bookmark>>,
    preferences: Mutex<Option<Preferences>>,
  }

  impl LocalStore for MemoryStore {
    type Error = Infallible;

    async fn put_document(&self, document: &Document) -> Result<(), Infallible> {
      self
        .documents
        .lock()
        .unwrap()
        .insert(document.document_id, document.clone());
      Ok(())
    }

    async fn get_document(&self, document_id: u32) -> Result<Option<Document>, Infallible> {
      Ok(self.documents.lock().unwrap().get(&document_id).cloned())
    }

    async fn all_documents(&self) -> Result<Vec<Document>, Infallible> {
      Ok(self.documents.lock().unwrap().values().cloned().collect())
    }

    async fn documents_by_name(&self) -> Result<Vec<Document>, Infallible> {
      let mut docs = self.all_documents().await?;
      docs.sort_by(|a, b| a.display_name.cmp(&b.display_name));
      Ok(docs)
    }

    async fn document_ids(&self) -> Result<Vec<u32>, Infallible> {
      Ok(self.documents.lock().unwrap().keys().copied().collect())
    }

    async fn delete_document(&self, document_id: u32) -> Result<(), Infallible> {
      self.documents.lock().unwrap().remove(&document_id);
      Ok(())
    }

    async fn put_bookmark(&self, bookmark: &Bookmark) -> Result<(), Infallible> {
      self
        .bookmarks
        .lock()
        .unwrap()
        .insert(bookmark.id.clone(), bookmark.clone());
      Ok(())
    }

    async fn get_bookmark(&self, id: &str) -> Result<Option<Bookmark>, Infallible> {
      Ok(self.bookmarks.lock().unwrap().get(id).cloned())
    }

    async fn all_bookmarks(&self) -> Result<Vec<Bookmark>, Infallible> {
      Ok(self.bookmarks.lock().unwrap().values().cloned().collect())
    }

    async fn bookmarks_for_document(&self, document_id: u32) -> Result<Vec<Bookmark>, Infallible> {
      Ok(
        self
          .bookmarks
          .lock()
          .unwrap()
          .values()
          .filter(|b| b.document_id == document_id)
          .cloned()
          .collect(),
      )
    }

    async fn delete_bookmark(&self, id: &str) -> Result<(), Infallible> {
      self.bookmarks.lock().unwrap().remove(id);
      Ok(())
    }

    async fn get_preferences(&self) -> Result<Preferences, Infallible> {
      Ok(self.preferences.lock().unwrap().clone().unwrap_or_default())
    }

    async fn save_preferences(&self, preferences: &Preferences) -> Result<(), Infallible> {
      *self.preferences.lock().unwrap() = Some(preferences.clone());
      Ok(())
    }
  }

  /// Source double that serves complete copies of the built-in catalog and
  /// counts detail requests.
  #[derive(Default)]
  struct StaticSource {
    detail_calls: AtomicUsize,
  }

  impl DocumentSource for StaticSource {
    async fn fetch_document_list(&self) -> Vec<Document> { catalog::builtin() }

    async fn fetch_document_detail(&self, document_id: u32) -> Option<Document> {
      self.detail_calls.fetch_add(1, Ordering::SeqCst);
      catalog::builtin()
        .into_iter()
        .find(|d| d.document_id == document_id)
        .map(complete)
    }
  }

  fn complete(mut document: Document) -> Document {
    document.units = Some(vec![Unit {
      unit_number:      1,
      source_text:      "بِسْمِ".into(),
      tokens:           vec![Token {
        position:     1,
        source_text:  "بِسْمِ".into(),
        romanization: None,
        gloss_text:   "In (the) name".into(),
        grammar_tag:  None,
      }],
      translated_text:  "In the name".into(),
      annotation_short: None,
      annotation_full:  None,
      media_url:        None,
    }]);
    document
  }

  fn library() -> Library<MemoryStore, StaticSource> {
    Library::new(MemoryStore::default(), StaticSource::default())
  }

  fn detail_calls(lib: &Library<MemoryStore, StaticSource>) -> usize {
    lib.source().detail_calls.load(Ordering::SeqCst)
  }

  #[tokio::test]
  async fn miss_fetches_and_persists() {
    let lib = library();
    let doc = lib.open_document(1, CachePolicy::Persist).await.unwrap().unwrap();
    assert!(doc.is_complete());
    assert!(lib.is_downloaded(1).await.unwrap());

    // Second open is served locally.
    lib.open_document(1, CachePolicy::Persist).await.unwrap();
    assert_eq!(detail_calls(&lib), 1);
  }

  #[tokio::test]
  async fn transient_policy_does_not_persist() {
    let lib = library();
    let doc = lib.open_document(2, CachePolicy::Transient).await.unwrap();
    assert!(doc.is_some());
    assert!(!lib.is_downloaded(2).await.unwrap());
  }

  #[tokio::test]
  async fn unknown_document_is_none_and_nothing_is_stored() {
    let lib = library();
    assert!(lib.open_document(99, CachePolicy::Persist).await.unwrap().is_none());
    assert!(!lib.download(99).await.unwrap());
    assert!(lib.store().document_ids().await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn stored_summary_is_upgraded_from_source() {
    let lib = library();
    let summary = catalog::builtin().remove(0);
    lib.store().put_document(&summary).await.unwrap();

    let doc = lib.open_document(1, CachePolicy::Persist).await.unwrap().unwrap();
    assert!(doc.is_complete());
    assert_eq!(detail_calls(&lib), 1);
  }

  #[tokio::test]
  async fn stored_summary_returned_when_source_has_nothing() {
    let lib = library();
    let mut orphan = catalog::builtin().remove(0);
    orphan.document_id = 50;
    lib.store().put_document(&orphan).await.unwrap();

    let doc = lib.open_document(50, CachePolicy::Persist).await.unwrap();
    assert_eq!(doc, Some(orphan));
  }

  #[tokio::test]
  async fn catalog_flags_downloaded_entries() {
    let lib = library();
    assert!(lib.download(36).await.unwrap());

    let entries = lib.catalog().await.unwrap();
    assert_eq!(entries.len(), 3);
    for entry in entries {
      assert_eq!(entry.downloaded, entry.document.document_id == 36);
    }
  }

  #[tokio::test]
  async fn offline_search_only_sees_stored_documents() {
    let lib = library();
    lib.download(2).await.unwrap();
    lib.download(1).await.unwrap();

    let all = lib.search_offline("").await.unwrap();
    assert_eq!(all.iter().map(|d| d.document_id).collect::<Vec<_>>(), vec![1, 2]);

    let hits = lib.search_offline("baqara").await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].document_id, 2);

    assert!(lib.search_offline("yaseen").await.unwrap().is_empty());
  }
}
