//! Tantivy-based verse index.
//!
//! Holds the bundled fallback verses in RAM so the search bar keeps working
//! when the scripture API does not answer. References are boosted over text
//! so that `psalm` ranks Psalm hits above verses that merely mention psalms.

use std::sync::Mutex;

use tantivy::collector::TopDocs;
use tantivy::query::{BooleanQuery, BoostQuery, Occur, QueryParser};
use tantivy::schema::{Field, Schema, Value, STORED, TEXT};
use tantivy::{doc, Index, IndexReader, IndexWriter, ReloadPolicy, TantivyDocument};

use crate::content::reference_from_display;
use crate::data::FallbackVerse;
use crate::errors::AppError;
use crate::models::VerseSearchHit;

const BOOST_REFERENCE: f32 = 3.0;
const BOOST_TEXT: f32 = 1.0;

/// Writer memory budget; the corpus is a few kilobytes.
const WRITER_HEAP_BYTES: usize = 15_000_000;

struct VerseFields {
    reference: Field,
    text: Field,
}

/// In-memory full-text index over a fixed verse list.
pub struct VerseIndex {
    index: Index,
    reader: IndexReader,
    writer: Mutex<IndexWriter>,
    fields: VerseFields,
}

impl VerseIndex {
    /// Create an empty in-RAM index.
    pub fn in_memory() -> Result<Self, AppError> {
        let mut schema_builder = Schema::builder();
        let reference = schema_builder.add_text_field("reference", TEXT | STORED);
        let text = schema_builder.add_text_field("text", TEXT | STORED);
        let schema = schema_builder.build();

        let index = Index::create_in_ram(schema);

        let reader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()
            .map_err(|e| AppError::Search(format!("Failed to create reader: {}", e)))?;

        let writer = index
            .writer_with_num_threads(1, WRITER_HEAP_BYTES)
            .map_err(|e| AppError::Search(format!("Failed to create writer: {}", e)))?;

        Ok(Self {
            index,
            reader,
            writer: Mutex::new(writer),
            fields: VerseFields { reference, text },
        })
    }

    /// Build an index already holding `verses`.
    pub fn with_verses(verses: &[FallbackVerse]) -> Result<Self, AppError> {
        let index = Self::in_memory()?;
        index.rebuild(verses)?;
        Ok(index)
    }

    /// Replace the whole index content.
    pub fn rebuild(&self, verses: &[FallbackVerse]) -> Result<(), AppError> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| AppError::Search("index writer lock poisoned".to_string()))?;

        writer.delete_all_documents()?;
        for verse in verses {
            writer.add_document(doc!(
                self.fields.reference => verse.reference.to_string(),
                self.fields.text => verse.text.to_string()
            ))?;
        }
        writer.commit()?;

        self.reader.reload()?;

        tracing::info!("Verse index rebuilt with {} verses", verses.len());
        Ok(())
    }

    /// Keyword search. Query syntax errors are tolerated rather than
    /// reported, since the input comes straight from a search bar.
    pub fn search(&self, query_str: &str, limit: usize) -> Result<Vec<VerseSearchHit>, AppError> {
        if query_str.trim().is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        let searcher = self.reader.searcher();

        let mut subqueries: Vec<(Occur, Box<dyn tantivy::query::Query>)> = Vec::new();
        for (field, boost) in [
            (self.fields.reference, BOOST_REFERENCE),
            (self.fields.text, BOOST_TEXT),
        ] {
            let parser = QueryParser::for_index(&self.index, vec![field]);
            let (query, _errors) = parser.parse_query_lenient(query_str);
            subqueries.push((Occur::Should, Box::new(BoostQuery::new(query, boost))));
        }
        let query = BooleanQuery::new(subqueries);

        let top_docs = searcher
            .search(&query, &TopDocs::with_limit(limit))
            .map_err(|e| AppError::Search(format!("Search failed: {}", e)))?;

        let hits = top_docs
            .into_iter()
            .filter_map(|(_score, address)| {
                let doc: TantivyDocument = searcher.doc(address).ok()?;
                let reference = doc.get_first(self.fields.reference)?.as_str()?.to_string();
                let text = doc.get_first(self.fields.text)?.as_str()?.to_string();
                Some(VerseSearchHit {
                    target: reference_from_display(&reference),
                    text,
                    reference,
                })
            })
            .collect();

        Ok(hits)
    }
}
