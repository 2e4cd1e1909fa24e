//! Where documents come from when the local store does not have them.
//!
//! A [`DocumentSource`] never fails: list requests fall back to the built-in
//! catalog and detail requests report absence. Fallible backends implement
//! [`TryDocumentSource`] and are wrapped in a [`FallbackSource`] to get that
//! contract.

use std::{
  future::Future,
  io::ErrorKind,
  path::{Path, PathBuf},
};

use tracing::{debug, warn};

use crate::{Result, catalog, document::Document};

// ─── Traits ──────────────────────────────────────────────────────────────────

/// Best-effort supplier of documents.
pub trait DocumentSource: Send + Sync {
  /// Document summaries. Never empty-on-error: implementations fall back to
  /// [`catalog::builtin`].
  fn fetch_document_list(&self) -> impl Future<Output = Vec<Document>> + Send + '_;

  /// A complete document, or `None` when it cannot be supplied.
  fn fetch_document_detail(
    &self,
    document_id: u32,
  ) -> impl Future<Output = Option<Document>> + Send + '_;
}

/// A supplier of documents that may fail.
pub trait TryDocumentSource: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn try_fetch_document_list(
    &self,
  ) -> impl Future<Output = Result<Vec<Document>, Self::Error>> + Send + '_;

  /// `Ok(None)` means the source knows it has no such document.
  fn try_fetch_document_detail(
    &self,
    document_id: u32,
  ) -> impl Future<Output = Result<Option<Document>, Self::Error>> + Send + '_;
}

// ─── Fallback adapter ────────────────────────────────────────────────────────

/// Turns a [`TryDocumentSource`] into an infallible [`DocumentSource`].
///
/// Failures are logged and swallowed here; they never reach the store layer.
#[derive(Debug, Clone)]
pub struct FallbackSource<S> {
  inner: S,
}

impl<S> FallbackSource<S> {
  pub fn new(inner: S) -> Self { Self { inner } }

  pub fn inner(&self) -> &S { &self.inner }
}

impl<S: TryDocumentSource> DocumentSource for FallbackSource<S> {
  async fn fetch_document_list(&self) -> Vec<Document> {
    match self.inner.try_fetch_document_list().await {
      Ok(list) if !list.is_empty() => list,
      Ok(_) => {
        warn!("document list is empty; using built-in catalog");
        catalog::builtin()
      }
      Err(e) => {
        warn!(error = %e, "failed to fetch document list; using built-in catalog");
        catalog::builtin()
      }
    }
  }

  async fn fetch_document_detail(&self, document_id: u32) -> Option<Document> {
    let document = match self.inner.try_fetch_document_detail(document_id).await {
      Ok(Some(document)) => document,
      Ok(None) => {
        debug!(document_id, "source has no such document");
        return None;
      }
      Err(e) => {
        warn!(document_id, error = %e, "failed to fetch document");
        return None;
      }
    };

    if document.document_id != document_id {
      warn!(
        document_id,
        received = document.document_id,
        "source returned a different document"
      );
      return None;
    }
    if let Err(e) = document.validate() {
      warn!(document_id, error = %e, "source returned a malformed document");
      return None;
    }

    Some(document)
  }
}

// ─── Directory bundle ────────────────────────────────────────────────────────

/// Reads documents exported to a directory: `index.json` holds the list and
/// `<id>.json` holds each complete document.
#[derive(Debug, Clone)]
pub struct DirectorySource {
  root: PathBuf,
}

impl DirectorySource {
  pub fn new(root: impl Into<PathBuf>) -> Self { Self { root: root.into() } }

  pub fn root(&self) -> &Path { &self.root }

  /// Path of the file holding `document_id`.
  pub fn document_path(&self, document_id: u32) -> PathBuf {
    self.root.join(format!("{document_id}.json"))
  }

  pub fn index_path(&self) -> PathBuf { self.root.join("index.json") }
}

impl TryDocumentSource for DirectorySource {
  type Error = crate::Error;

  async fn try_fetch_document_list(&self) -> Result<Vec<Document>> {
    let raw = tokio::fs::read_to_string(self.index_path()).await?;
    let list: Vec<Document> = serde_json::from_str(&raw)?;
    Ok(list.into_iter().map(Document::into_summary).collect())
  }

  async fn try_fetch_document_detail(&self, document_id: u32) -> Result<Option<Document>> {
    let raw = match tokio::fs::read_to_string(self.document_path(document_id)).await {
      Ok(raw) => raw,
      Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
      Err(e) => return Err(e.into()),
    };
    Ok(Some(serde_json::from_str(&raw)?))
  }
}
