//! Subcommands and their execution against the local store.

use std::path::PathBuf;

use anyhow::{Context as _, Result, bail};
use chrono::DateTime;
use clap::{Args, Subcommand};
use mushaf_core::{
  bookmark::Bookmark,
  document::{Category, Document},
  library::{CachePolicy, CatalogEntry, Library},
  preferences::{FONT_SIZE_RANGE, Preferences},
  source::{DirectorySource, FallbackSource},
  store::LocalStore,
};
use mushaf_store_sqlite::{Collection, SqliteStore};

pub type MushafLibrary = Library<SqliteStore, FallbackSource<DirectorySource>>;

// ─── Command tree ─────────────────────────────────────────────────────────────

#[derive(Subcommand, Debug)]
pub enum Command {
  /// Show the schema version, tables and record counts.
  Info,
  /// Cached documents.
  #[command(subcommand)]
  Docs(DocsCommand),
  /// Bookmarks.
  #[command(subcommand)]
  Bookmarks(BookmarksCommand),
  /// Reader preferences.
  #[command(subcommand)]
  Prefs(PrefsCommand),
}

#[derive(Subcommand, Debug)]
pub enum DocsCommand {
  /// List the source catalog, marking downloaded documents.
  Catalog,
  /// List downloaded documents.
  List {
    /// Only documents whose names contain this text.
    #[arg(short, long)]
    query:   Option<String>,
    /// Order by display name instead of id.
    #[arg(long)]
    by_name: bool,
  },
  /// Print a document as JSON, fetching it from the bundle if needed.
  Show {
    id:       u32,
    /// Do not keep a fetched document in the store.
    #[arg(long)]
    no_cache: bool,
  },
  /// Fetch a document from the bundle and store it.
  Download { id: u32 },
  /// Store a document from a JSON file.
  Import { file: PathBuf },
  /// Write a stored document as JSON.
  Export {
    id:  u32,
    #[arg(short, long, value_name = "FILE")]
    out: Option<PathBuf>,
  },
  /// Remove a document from the store.
  Remove { id: u32 },
}

#[derive(Subcommand, Debug)]
pub enum BookmarksCommand {
  /// List bookmarks, newest first.
  List {
    #[arg(short, long)]
    document: Option<u32>,
  },
  /// Bookmark a unit.
  Add {
    document: u32,
    unit:     u32,
    #[arg(short, long)]
    note:     Option<String>,
  },
  Remove { id: String },
}

#[derive(Subcommand, Debug)]
pub enum PrefsCommand {
  Show,
  /// Change some preferences; the rest keep their current values.
  Set(PrefsUpdate),
  /// Restore the defaults.
  Reset,
}

#[derive(Args, Debug, Default, Clone)]
pub struct PrefsUpdate {
  #[arg(long)]
  pub font_size:         Option<u32>,
  #[arg(long)]
  pub transliteration:   Option<bool>,
  #[arg(long)]
  pub word_meanings:     Option<bool>,
  #[arg(long)]
  pub translation:       Option<String>,
  #[arg(long)]
  pub annotation_source: Option<String>,
}

impl PrefsUpdate {
  /// Apply the given fields to `prefs`, producing the full record to save.
  pub fn apply(self, mut prefs: Preferences) -> Result<Preferences> {
    if let Some(size) = self.font_size {
      if !FONT_SIZE_RANGE.contains(&size) {
        bail!(
          "font size {size} is outside {}..={}",
          FONT_SIZE_RANGE.start(),
          FONT_SIZE_RANGE.end()
        );
      }
      prefs.font_size = size;
    }
    if let Some(v) = self.transliteration {
      prefs.show_transliteration = v;
    }
    if let Some(v) = self.word_meanings {
      prefs.show_word_meanings = v;
    }
    if self.translation.is_some() {
      prefs.selected_translation_id = self.translation;
    }
    if self.annotation_source.is_some() {
      prefs.selected_annotation_source_id = self.annotation_source;
    }
    Ok(prefs)
  }
}

// ─── Execution ────────────────────────────────────────────────────────────────

pub async fn run(command: Command, library: &MushafLibrary) -> Result<()> {
  match command {
    Command::Info => info(library.store()).await,
    Command::Docs(cmd) => docs(cmd, library).await,
    Command::Bookmarks(cmd) => bookmarks(cmd, library.store()).await,
    Command::Prefs(cmd) => prefs(cmd, library.store()).await,
  }
}

async fn info(store: &SqliteStore) -> Result<()> {
  println!("schema version: {}", store.schema_version());
  println!("objects:        {}", store.schema_objects().await?.join(", "));
  for collection in [Collection::Documents, Collection::Bookmarks, Collection::Preferences] {
    println!("{:<15} {}", format!("{collection}:"), store.count(collection).await?);
  }
  Ok(())
}

async fn docs(cmd: DocsCommand, library: &MushafLibrary) -> Result<()> {
  let store = library.store();
  match cmd {
    DocsCommand::Catalog => {
      for entry in library.catalog().await? {
        println!("{}", catalog_line(&entry));
      }
    }
    DocsCommand::List { query, by_name } => {
      let found = list_documents(library, query.as_deref().unwrap_or(""), by_name).await?;
      for doc in &found {
        println!("{}", document_line(doc));
      }
    }
    DocsCommand::Show { id, no_cache } => {
      let policy = if no_cache { CachePolicy::Transient } else { CachePolicy::Persist };
      let Some(doc) = library.open_document(id, policy).await? else {
        bail!("document {id} is not available offline or in the bundle");
      };
      println!("{}", serde_json::to_string_pretty(&doc)?);
    }
    DocsCommand::Download { id } => {
      if !library.download(id).await? {
        bail!("document {id} could not be fetched from the bundle");
      }
      println!("downloaded document {id}");
    }
    DocsCommand::Import { file } => {
      let raw = tokio::fs::read_to_string(&file)
        .await
        .with_context(|| format!("reading {}", file.display()))?;
      let doc: Document = serde_json::from_str(&raw)
        .with_context(|| format!("parsing {}", file.display()))?;
      store.put_document(&doc).await?;
      println!("imported document {}", doc.document_id);
    }
    DocsCommand::Export { id, out } => {
      let Some(doc) = store.get_document(id).await? else {
        bail!("document {id} is not stored");
      };
      let json = serde_json::to_string_pretty(&doc)?;
      match out {
        Some(path) => tokio::fs::write(&path, json)
          .await
          .with_context(|| format!("writing {}", path.display()))?,
        None => println!("{json}"),
      }
    }
    DocsCommand::Remove { id } => {
      store.delete_document(id).await?;
      println!("removed document {id}");
    }
  }
  Ok(())
}

/// Stored documents matching `query`, by id or, with `by_name`, in the
/// store's display-name order.
async fn list_documents(
  library: &MushafLibrary,
  query: &str,
  by_name: bool,
) -> Result<Vec<Document>> {
  if !by_name {
    return Ok(library.search_offline(query).await?);
  }
  let found = library
    .store()
    .documents_by_name()
    .await?
    .into_iter()
    .filter(|d| d.matches(query))
    .collect();
  Ok(found)
}

async fn bookmarks(cmd: BookmarksCommand, store: &SqliteStore) -> Result<()> {
  match cmd {
    BookmarksCommand::List { document } => {
      let list = match document {
        Some(id) => store.bookmarks_for_document(id).await?,
        None => store.all_bookmarks().await?,
      };
      for bookmark in &list {
        println!("{}", bookmark_line(bookmark));
      }
    }
    BookmarksCommand::Add { document, unit, note } => {
      let bookmark = Bookmark::new(document, unit, note);
      store.put_bookmark(&bookmark).await?;
      println!("{}", bookmark.id);
    }
    BookmarksCommand::Remove { id } => {
      store.delete_bookmark(&id).await?;
      println!("removed bookmark {id}");
    }
  }
  Ok(())
}

async fn prefs(cmd: PrefsCommand, store: &SqliteStore) -> Result<()> {
  let prefs = match cmd {
    PrefsCommand::Show => store.get_preferences().await?,
    PrefsCommand::Set(update) => {
      let prefs = update.apply(store.get_preferences().await?)?;
      store.save_preferences(&prefs).await?;
      prefs
    }
    PrefsCommand::Reset => {
      let prefs = Preferences::default();
      store.save_preferences(&prefs).await?;
      prefs
    }
  };
  println!("{}", serde_json::to_string_pretty(&prefs)?);
  Ok(())
}

// ─── Formatting ───────────────────────────────────────────────────────────────

fn category_label(category: Option<Category>) -> &'static str {
  match category {
    Some(Category::Makki) => "Makki",
    Some(Category::Madani) => "Madani",
    None => "-",
  }
}

fn document_line(doc: &Document) -> String {
  format!(
    "{:>3}  {:<20} {:<7} {:>4} units  {} / {}",
    doc.document_id,
    doc.canonical_name,
    category_label(doc.category),
    doc.unit_count,
    doc.display_name,
    doc.localized_name,
  )
}

fn catalog_line(entry: &CatalogEntry) -> String {
  let mark = if entry.downloaded { '*' } else { ' ' };
  format!("{mark} {}", document_line(&entry.document))
}

fn bookmark_line(bookmark: &Bookmark) -> String {
  let created = DateTime::from_timestamp_millis(bookmark.created_at)
    .map(|at| at.to_rfc3339())
    .unwrap_or_else(|| bookmark.created_at.to_string());
  let mut line = format!(
    "{}  {}:{}  {}",
    bookmark.id, bookmark.document_id, bookmark.unit_number, created
  );
  if let Some(note) = &bookmark.note {
    line.push_str("  ");
    line.push_str(note);
  }
  line
}

#[cfg(test)]
mod tests {
  use mushaf_core::catalog;

  use super::*;

  #[test]
  fn update_touches_only_given_fields() {
    let update = PrefsUpdate {
      font_size: Some(24),
      translation: Some("bn.bengali".into()),
      ..PrefsUpdate::default()
    };
    let prefs = update.apply(Preferences::default()).unwrap();
    assert_eq!(prefs.font_size, 24);
    assert_eq!(prefs.selected_translation_id.as_deref(), Some("bn.bengali"));
    assert!(prefs.show_word_meanings);
    assert!(!prefs.show_transliteration);
  }

  #[test]
  fn update_rejects_out_of_range_font() {
    for size in [11, 33] {
      let update = PrefsUpdate { font_size: Some(size), ..PrefsUpdate::default() };
      assert!(update.apply(Preferences::default()).is_err());
    }
  }

  #[tokio::test]
  async fn list_by_name_follows_the_name_index() {
    let bundle = tempfile::tempdir().unwrap();
    let store = SqliteStore::open_in_memory().await.unwrap();
    for doc in catalog::builtin() {
      store.put_document(&doc).await.unwrap();
    }
    let library: MushafLibrary =
      Library::new(store, FallbackSource::new(DirectorySource::new(bundle.path())));

    let ids = |docs: Vec<Document>| docs.iter().map(|d| d.document_id).collect::<Vec<_>>();

    // Display names: الفاتحة (1), البقرة (2), يس (36).
    assert_eq!(ids(list_documents(&library, "", true).await.unwrap()), vec![2, 1, 36]);
    assert_eq!(ids(list_documents(&library, "", false).await.unwrap()), vec![1, 2, 36]);
    assert_eq!(ids(list_documents(&library, "al-", true).await.unwrap()), vec![2, 1]);
  }

  #[test]
  fn catalog_line_marks_downloaded() {
    let doc = catalog::builtin().remove(1);
    let line = catalog_line(&CatalogEntry { document: doc, downloaded: true });
    assert!(line.starts_with("*   2  Al-Baqara"));
    assert!(line.contains("Madani"));
    assert!(line.contains(" 286 units"));
  }

  #[test]
  fn bookmark_line_includes_note_and_time() {
    let bookmark = Bookmark {
      id:          "b1".into(),
      document_id: 2,
      unit_number: 255,
      note:        Some("ayat al-kursi".into()),
      created_at:  0,
    };
    assert_eq!(
      bookmark_line(&bookmark),
      "b1  2:255  1970-01-01T00:00:00+00:00  ayat al-kursi"
    );
  }
}
