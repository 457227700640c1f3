//! City selector with prefix autocomplete

#[derive(Debug, Clone)]
pub struct CitySelector {
    cities: Vec<String>,
}

impl CitySelector {
    #[must_use]
    pub fn new(cities: Vec<String>) -> Self {
        Self { cities }
    }

    #[must_use]
    pub fn cities(&self) -> &[String] {
        &self.cities
    }

    /// Known cities starting with `input`, ignoring case. Blank input suggests nothing.
    #[must_use]
    pub fn suggestions(&self, input: &str) -> Vec<&str> {
        let prefix = input.trim().to_lowercase();
        if prefix.is_empty() {
            return Vec::new();
        }
        self.cities
            .iter()
            .filter(|city| city.to_lowercase().starts_with(&prefix))
            .map(String::as_str)
            .collect()
    }

    /// Pick the `index`-th suggestion for `input`
    #[must_use]
    pub fn choose(&self, input: &str, index: usize) -> Option<String> {
        self.suggestions(input)
            .get(index)
            .map(|city| (*city).to_string())
    }

    /// Free-text submission: the trimmed input, or `None` when blank
    #[must_use]
    pub fn submit(&self, input: &str) -> Option<String> {
        let trimmed = input.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }
}
