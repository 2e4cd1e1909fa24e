//! The `LocalStore` trait: on-device persistence for the three collections.
//!
//! The trait is implemented by storage backends (e.g. `mushaf-store-sqlite`).
//! Higher layers ([`crate::library::Library`], `mushaf-cli`) depend on this
//! abstraction, not on any concrete backend.

use std::future::Future;

use crate::{bookmark::Bookmark, document::Document, preferences::Preferences};

/// Abstraction over a local store backend.
///
/// Every method is an independent transaction scoped to the collection it
/// touches; there is no atomicity across collections. A completed `put` is
/// visible to every later `get` on the same key. Concurrent writers to one
/// key resolve as last-commit-wins.
///
/// Absence is never an error: `get_*` returns `None` and `delete_*` on a
/// missing key succeeds.
pub trait LocalStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Documents ─────────────────────────────────────────────────────────

  /// Insert or fully replace the document keyed by `document_id`.
  fn put_document<'a>(
    &'a self,
    document: &'a Document,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  fn get_document(
    &self,
    document_id: u32,
  ) -> impl Future<Output = Result<Option<Document>, Self::Error>> + Send + '_;

  /// All stored documents, ordered by id.
  fn all_documents(
    &self,
  ) -> impl Future<Output = Result<Vec<Document>, Self::Error>> + Send + '_;

  /// All stored documents, ordered by display name.
  fn documents_by_name(
    &self,
  ) -> impl Future<Output = Result<Vec<Document>, Self::Error>> + Send + '_;

  /// Ids of every stored document, without decoding the records.
  fn document_ids(
    &self,
  ) -> impl Future<Output = Result<Vec<u32>, Self::Error>> + Send + '_;

  fn delete_document(
    &self,
    document_id: u32,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Bookmarks ─────────────────────────────────────────────────────────

  /// Insert or fully replace the bookmark keyed by its `id`.
  fn put_bookmark<'a>(
    &'a self,
    bookmark: &'a Bookmark,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  fn get_bookmark<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<Option<Bookmark>, Self::Error>> + Send + 'a;

  /// All bookmarks, newest first.
  fn all_bookmarks(
    &self,
  ) -> impl Future<Output = Result<Vec<Bookmark>, Self::Error>> + Send + '_;

  /// Bookmarks pointing into one document, newest first.
  fn bookmarks_for_document(
    &self,
    document_id: u32,
  ) -> impl Future<Output = Result<Vec<Bookmark>, Self::Error>> + Send + '_;

  fn delete_bookmark<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  // ── Preferences ───────────────────────────────────────────────────────

  /// The saved preferences, or [`Preferences::default`] if none were ever
  /// saved.
  fn get_preferences(
    &self,
  ) -> impl Future<Output = Result<Preferences, Self::Error>> + Send + '_;

  /// Replace the preferences record wholesale.
  fn save_preferences<'a>(
    &'a self,
    preferences: &'a Preferences,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}
