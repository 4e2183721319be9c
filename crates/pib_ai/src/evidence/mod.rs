use pib_core::domain::{Chunk, Citation};

mod citations;

pub use citations::{
    build_citation_index, citation_key, CitationBlock, CitationIndex, IndexedCitation,
};

/// Citation for a ranked chunk with its text trimmed to `max_excerpt_chars` characters
/// (plus `...` when cut).
pub fn citation_for_chunk(chunk: &Chunk, max_excerpt_chars: usize) -> Citation {
    Citation {
        source_id: chunk.source_id.clone(),
        source_name: chunk.source_name.clone(),
        chunk_id: chunk.id.clone(),
        excerpt: snippet_first_chars(&chunk.text, max_excerpt_chars),
    }
}

fn snippet_first_chars(text: &str, max_chars: usize) -> String {
    let t = text.trim();
    match t.char_indices().nth(max_chars) {
        None => t.to_string(),
        Some((cut, _)) => {
            let mut s = t[..cut].trim_end().to_string();
            s.push_str("...");
            s
        }
    }
}
