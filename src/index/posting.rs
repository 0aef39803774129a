//! Postings and posting lists.

/// Internal document number, assigned in insertion order.
pub type DocOrdinal = u32;

/// A single posting: one term occurring in one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Posting {
    /// Document the term occurs in.
    pub doc: DocOrdinal,
    /// Number of occurrences of the term in the document.
    pub term_frequency: u32,
}

impl Posting {
    /// Create a posting.
    pub fn new(doc: DocOrdinal, term_frequency: u32) -> Self {
        Posting {
            doc,
            term_frequency,
        }
    }
}

/// All postings of one term, ordered by document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostingList {
    postings: Vec<Posting>,
    total_frequency: u64,
}

impl PostingList {
    /// Create an empty posting list.
    pub fn new() -> Self {
        PostingList::default()
    }

    /// Add a posting to this list.
    ///
    /// Postings for a document already present are merged by summing their
    /// frequencies.
    pub fn add_posting(&mut self, posting: Posting) {
        self.total_frequency += u64::from(posting.term_frequency);

        // Documents are added in order, so the common case is a push.
        if self.postings.last().is_none_or(|last| last.doc < posting.doc) {
            self.postings.push(posting);
            return;
        }

        match self.postings.binary_search_by_key(&posting.doc, |p| p.doc) {
            Ok(pos) => self.postings[pos].term_frequency += posting.term_frequency,
            Err(pos) => self.postings.insert(pos, posting),
        }
    }

    /// Append every posting of `other`.
    pub fn extend_from(&mut self, other: &PostingList) {
        for posting in &other.postings {
            self.add_posting(*posting);
        }
    }

    /// Number of documents containing the term.
    pub fn doc_frequency(&self) -> usize {
        self.postings.len()
    }

    /// Total occurrences across all documents.
    pub fn total_frequency(&self) -> u64 {
        self.total_frequency
    }

    /// Get the length of the posting list.
    pub fn len(&self) -> usize {
        self.postings.len()
    }

    /// Check if the posting list is empty.
    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }

    /// Get an iterator over the postings, in document order.
    pub fn iter(&self) -> std::slice::Iter<'_, Posting> {
        self.postings.iter()
    }

    /// Find the posting for a document.
    pub fn get(&self, doc: DocOrdinal) -> Option<&Posting> {
        self.postings
            .binary_search_by_key(&doc, |p| p.doc)
            .ok()
            .map(|pos| &self.postings[pos])
    }
}

impl<'a> IntoIterator for &'a PostingList {
    type Item = &'a Posting;
    type IntoIter = std::slice::Iter<'a, Posting>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_postings_stay_sorted() {
        let mut list = PostingList::new();
        list.add_posting(Posting::new(5, 1));
        list.add_posting(Posting::new(1, 2));
        list.add_posting(Posting::new(3, 1));

        let docs: Vec<_> = list.iter().map(|p| p.doc).collect();
        assert_eq!(docs, vec![1, 3, 5]);
        assert_eq!(list.doc_frequency(), 3);
        assert_eq!(list.total_frequency(), 4);
    }

    #[test]
    fn test_same_document_merges() {
        let mut list = PostingList::new();
        list.add_posting(Posting::new(2, 1));
        list.add_posting(Posting::new(4, 1));
        list.add_posting(Posting::new(2, 3));

        assert_eq!(list.len(), 2);
        assert_eq!(list.get(2), Some(&Posting::new(2, 4)));
        assert_eq!(list.total_frequency(), 5);
    }

    #[test]
    fn test_extend_from() {
        let mut a = PostingList::new();
        a.add_posting(Posting::new(0, 1));
        let mut b = PostingList::new();
        b.add_posting(Posting::new(7, 2));

        a.extend_from(&b);

        assert_eq!(a.len(), 2);
        assert_eq!(a.get(7).map(|p| p.term_frequency), Some(2));
        assert!(a.get(3).is_none());
    }
}
