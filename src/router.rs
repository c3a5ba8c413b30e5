//! In-process locations (`/?page=3`, `/pokemon/pikachu`) and a history stack.

use url::form_urlencoded;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    List,
    Detail { name: String },
}

/// A path plus its raw query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub path: String,
    pub query: String,
}

impl Location {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        let (path, query) = match raw.split_once('?') {
            Some((p, q)) => (p, q),
            None => (raw, ""),
        };
        let path = if path.is_empty() { "/" } else { path };
        Self {
            path: path.to_string(),
            query: query.to_string(),
        }
    }

    pub fn list() -> Self {
        Self::parse("/")
    }

    pub fn detail(name: &str) -> Self {
        let name: String = form_urlencoded::byte_serialize(name.as_bytes()).collect();
        Self::parse(&format!("/pokemon/{}", name))
    }

    pub fn route(&self) -> Option<Route> {
        let segments: Vec<&str> = self.path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] => Some(Route::List),
            ["pokemon", name] => {
                let name = form_urlencoded::parse(format!("n={}", name).as_bytes())
                    .next()
                    .map(|(_, v)| v.into_owned())
                    .unwrap_or_default();
                Some(Route::Detail { name })
            }
            _ => None,
        }
    }

    pub fn query_param(&self, key: &str) -> Option<String> {
        form_urlencoded::parse(self.query.as_bytes())
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }

    /// Set `key` to `value`, keeping every other parameter in place.
    pub fn set_query_param(&mut self, key: &str, value: &str) {
        let mut replaced = false;
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (k, v) in form_urlencoded::parse(self.query.as_bytes()) {
            if k == key {
                if !replaced {
                    serializer.append_pair(key, value);
                    replaced = true;
                }
            } else {
                serializer.append_pair(&k, &v);
            }
        }
        if !replaced {
            serializer.append_pair(key, value);
        }
        self.query = serializer.finish();
    }

    /// Page number from the `page` parameter: leading digits only, at least 1.
    pub fn page(&self) -> u32 {
        self.query_param("page")
            .map(|raw| parse_page(&raw))
            .unwrap_or(1)
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.query.is_empty() {
            write!(f, "{}", self.path)
        } else {
            write!(f, "{}?{}", self.path, self.query)
        }
    }
}

fn parse_page(raw: &str) -> u32 {
    let digits: String = raw
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse::<u32>().unwrap_or(1).max(1)
}

/// Navigation history. `replace` rewrites the current entry in place.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<Location>,
}

impl History {
    pub fn new(initial: Location) -> Self {
        Self {
            entries: vec![initial],
        }
    }

    pub fn current(&self) -> &Location {
        // never empty: `back` keeps the first entry
        &self.entries[self.entries.len() - 1]
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn push(&mut self, location: Location) {
        log::info!("navigate to {}", location);
        self.entries.push(location);
    }

    pub fn replace(&mut self, location: Location) {
        log::debug!("replace location with {}", location);
        if let Some(last) = self.entries.last_mut() {
            *last = location;
        }
    }

    /// Pop the current entry. Returns false when already at the first entry.
    pub fn back(&mut self) -> bool {
        if self.entries.len() > 1 {
            self.entries.pop();
            log::info!("back to {}", self.current());
            true
        } else {
            false
        }
    }
}
