use crate::catalog::{categories, search};
use crate::models::Exercise;

/// Exercise picker: optional free-text search and category filter
pub async fn list_exercises(search_term: Option<String>, category: Option<String>) -> Result<Vec<Exercise>, String> {
  let term = search_term.unwrap_or_default();
  Ok(
    search(&term, category.as_deref())
      .into_iter()
      .cloned()
      .collect(),
  )
}

pub async fn get_categories() -> Result<Vec<String>, String> {
  Ok(categories().into_iter().map(str::to_string).collect())
}
