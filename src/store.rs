//! Page index
//!
//! Holds the extracted pages of every uploaded document and answers
//! document lookups and full-text searches over them. Searches run on an
//! in-RAM tantivy index whose analyzer lowercases, drops English stop words
//! and stems, so "tax forms" and "submitting" match "tax form" and "submit".

use std::collections::HashMap;
use std::sync::Arc;

use tantivy::collector::TopDocs;
use tantivy::query::{BooleanQuery, Occur, Query, TermQuery};
use tantivy::schema::{
    Field, IndexRecordOption, Schema, TextFieldIndexing, TextOptions, Value, STORED, STRING,
};
use tantivy::tokenizer::{
    Language, LowerCaser, RemoveLongFilter, SimpleTokenizer, Stemmer, StopWordFilter,
    TextAnalyzer, TokenStream,
};
use tantivy::{Index, IndexReader, IndexWriter, ReloadPolicy, TantivyDocument, TantivyError, Term};
use thiserror::Error;
use tokio::sync::RwLock;

use crate::types::{Page, SearchResult};

/// Name the English analyzer is registered under
const ENGLISH: &str = "english";

const WRITER_HEAP_BYTES: usize = 50_000_000;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("search index error: {0}")]
    Index(#[from] TantivyError),

    #[error("document has too many pages: {0}")]
    TooManyPages(usize),
}

/// Shared page index
#[derive(Clone)]
pub struct PageStore {
    /// Documents in upload order
    documents: Arc<RwLock<Vec<StoredDocument>>>,
    index: Index,
    fields: PageFields,
}

#[derive(Clone, Copy)]
struct PageFields {
    document: Field,
    page_number: Field,
    content: Field,
}

struct StoredDocument {
    name: String,
    pages: Vec<Page>,
}

impl PageStore {
    pub fn new() -> Self {
        let mut builder = Schema::builder();
        let document = builder.add_text_field("document", STRING | STORED);
        let page_number = builder.add_u64_field("page_number", STORED);
        let content = builder.add_text_field(
            "content",
            TextOptions::default().set_indexing_options(
                TextFieldIndexing::default()
                    .set_tokenizer(ENGLISH)
                    .set_index_option(IndexRecordOption::WithFreqsAndPositions),
            ),
        );

        let index = Index::create_in_ram(builder.build());
        index.tokenizers().register(ENGLISH, english_analyzer());

        Self {
            documents: Arc::default(),
            index,
            fields: PageFields {
                document,
                page_number,
                content,
            },
        }
    }

    /// Store a document's page texts, numbered from 1
    ///
    /// A document stored under the same name is replaced and moves to the end
    /// of the upload order. Returns the number of pages stored.
    pub async fn replace_document(&self, name: &str, texts: Vec<String>) -> Result<u32, StoreError> {
        let count = page_count(texts.len())?;
        let pages: Vec<Page> = texts
            .into_iter()
            .zip(1u32..)
            .map(|(content, page_number)| Page {
                page_number,
                content,
            })
            .collect();

        let mut documents = self.documents.write().await;

        let mut writer: IndexWriter = self.index.writer_with_num_threads(1, WRITER_HEAP_BYTES)?;
        writer.delete_term(Term::from_field_text(self.fields.document, name));
        for page in &pages {
            let mut doc = TantivyDocument::new();
            doc.add_text(self.fields.document, name);
            doc.add_u64(self.fields.page_number, u64::from(page.page_number));
            doc.add_text(self.fields.content, &page.content);
            writer.add_document(doc)?;
        }
        writer.commit()?;

        let replaced = documents.iter().any(|d| d.name == name);
        documents.retain(|d| d.name != name);
        documents.push(StoredDocument {
            name: name.to_string(),
            pages,
        });

        tracing::debug!(document = %name, pages = count, replaced, "Stored document pages");
        Ok(count)
    }

    /// All pages of a document in page order; empty when unknown
    pub async fn document(&self, name: &str) -> Vec<Page> {
        let documents = self.documents.read().await;
        documents
            .iter()
            .find(|d| d.name == name)
            .map(|d| d.pages.clone())
            .unwrap_or_default()
    }

    /// Pages containing every meaningful word of the query, best first
    ///
    /// Stop words are ignored and words match on their stems. Pages rank by
    /// BM25 score. Equal scores keep upload order, then page order. A query
    /// with nothing left to match yields no results.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>, StoreError> {
        let terms = self.query_terms(query);
        if terms.is_empty() {
            return Ok(Vec::new());
        }

        let documents = self.documents.read().await;
        let limit: usize = documents.iter().map(|d| d.pages.len()).sum();
        if limit == 0 {
            return Ok(Vec::new());
        }

        let reader: IndexReader = self
            .index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()?;
        let searcher = reader.searcher();

        let clauses: Vec<(Occur, Box<dyn Query>)> = terms
            .into_iter()
            .map(|term| {
                let query: Box<dyn Query> =
                    Box::new(TermQuery::new(term, IndexRecordOption::WithFreqs));
                (Occur::Must, query)
            })
            .collect();
        let hits = searcher.search(&BooleanQuery::new(clauses), &TopDocs::with_limit(limit))?;

        let upload_order: HashMap<&str, usize> = documents
            .iter()
            .enumerate()
            .map(|(position, d)| (d.name.as_str(), position))
            .collect();

        let mut ranked = Vec::with_capacity(hits.len());
        for (score, address) in hits {
            let doc: TantivyDocument = searcher.doc(address)?;
            let Some(name) = doc.get_first(self.fields.document).and_then(|v| v.as_str()) else {
                continue;
            };
            let Some(page_number) = doc.get_first(self.fields.page_number).and_then(|v| v.as_u64())
            else {
                continue;
            };
            let Some(&position) = upload_order.get(name) else {
                continue;
            };
            let Some(page) = documents[position]
                .pages
                .iter()
                .find(|p| u64::from(p.page_number) == page_number)
            else {
                continue;
            };

            ranked.push((
                score,
                position,
                SearchResult {
                    document_name: name.to_string(),
                    page_number: page.page_number,
                    content: page.content.clone(),
                },
            ));
        }

        ranked.sort_by(|a, b| {
            b.0.total_cmp(&a.0)
                .then(a.1.cmp(&b.1))
                .then(a.2.page_number.cmp(&b.2.page_number))
        });
        Ok(ranked.into_iter().map(|(_, _, result)| result).collect())
    }

    pub async fn document_count(&self) -> usize {
        self.documents.read().await.len()
    }

    /// Distinct analyzed words of a query as content terms
    fn query_terms(&self, query: &str) -> Vec<Term> {
        let mut words = analyze(query);
        words.sort();
        words.dedup();
        words
            .iter()
            .map(|word| Term::from_field_text(self.fields.content, word))
            .collect()
    }
}

impl Default for PageStore {
    fn default() -> Self {
        Self::new()
    }
}

fn page_count(len: usize) -> Result<u32, StoreError> {
    u32::try_from(len).map_err(|_| StoreError::TooManyPages(len))
}

/// Lowercase, drop English stop words, then stem
fn english_analyzer() -> TextAnalyzer {
    let stop_words = StopWordFilter::new(Language::English)
        .unwrap_or_else(|| StopWordFilter::remove(Vec::new()));

    TextAnalyzer::builder(SimpleTokenizer::default())
        .filter(RemoveLongFilter::limit(40))
        .filter(LowerCaser)
        .filter(stop_words)
        .filter(Stemmer::new(Language::English))
        .build()
}

fn analyze(text: &str) -> Vec<String> {
    let mut analyzer = english_analyzer();
    let mut stream = analyzer.token_stream(text);
    let mut words = Vec::new();
    while stream.advance() {
        words.push(stream.token().text.clone());
    }
    words
}
