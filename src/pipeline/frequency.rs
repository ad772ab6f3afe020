use std::collections::HashMap;

/// Token occurrence counts over a corpus. Entries keep the order in which each
/// token was first seen, which is the tie-break for rankings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    entries: Vec<(String, usize)>,
    index: HashMap<String, usize>,
    total: usize,
}

impl FrequencyTable {
    pub fn count<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut table = Self::default();
        for token in tokens {
            let token = token.as_ref();
            match table.index.get(token) {
                Some(&slot) => table.entries[slot].1 += 1,
                None => {
                    table.index.insert(token.to_string(), table.entries.len());
                    table.entries.push((token.to_string(), 1));
                }
            }
            table.total += 1;
        }
        table
    }

    #[cfg(test)]
    pub fn get(&self, token: &str) -> usize {
        self.index
            .get(token)
            .map(|&slot| self.entries[slot].1)
            .unwrap_or(0)
    }

    /// Number of distinct tokens.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of tokens counted.
    pub fn total(&self) -> usize {
        self.total
    }

    /// The `k` most common tokens, most frequent first. Equal counts keep
    /// first-seen order.
    pub fn top_k(&self, k: usize) -> Vec<(String, usize)> {
        let mut ranked: Vec<&(String, usize)> = self.entries.iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.into_iter().take(k).cloned().collect()
    }
}
