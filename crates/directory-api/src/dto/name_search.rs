use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct NameSearchQuery {
    pub q: String,
}
