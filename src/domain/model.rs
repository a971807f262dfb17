use std::collections::HashSet;

/// A single offer scraped from the listings page. The absolute `url` doubles
/// as the de-duplication key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    pub title: String,
    pub price: u32,
    pub url: String,
}

/// Listing URLs already notified. Loaded once at startup and threaded through
/// each polling cycle as an explicit value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeenSet {
    urls: HashSet<String>,
}

impl SeenSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, url: &str) -> bool {
        self.urls.contains(url)
    }

    /// Returns true if the url was not already present.
    pub fn insert(&mut self, url: String) -> bool {
        self.urls.insert(url)
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    /// Sorted for stable on-disk files.
    pub fn to_sorted_vec(&self) -> Vec<String> {
        let mut urls: Vec<String> = self.urls.iter().cloned().collect();
        urls.sort();
        urls
    }
}

impl FromIterator<String> for SeenSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            urls: iter.into_iter().collect(),
        }
    }
}
