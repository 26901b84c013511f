//! URL construction helpers — the single place route shapes are written.
//!
//! Handlers and templates never format paths by hand; redirects, links and
//! form actions all come from here, so a route change stays a one-file
//! edit.

/// `/{country}/{section}/` — the list screen.
pub fn section_url(country: &str, slug: &str) -> String {
  format!("/{country}/{slug}/")
}

/// `/{country}/{section}/new` — the create screen.
pub fn new_url(country: &str, slug: &str) -> String {
  format!("/{country}/{slug}/new")
}

/// `/{country}/{section}/{id}` — the detail screen.
pub fn detail_url(country: &str, slug: &str, id: i64) -> String {
  format!("/{country}/{slug}/{id}")
}

/// `/{country}/{section}/{id}/edit` — the edit screen.
pub fn edit_url(country: &str, slug: &str, id: i64) -> String {
  format!("/{country}/{slug}/{id}/edit")
}

/// `/{country}/{section}/{id}/delete` — the delete confirmation screen.
pub fn delete_url(country: &str, slug: &str, id: i64) -> String {
  format!("/{country}/{slug}/{id}/delete")
}

/// `/{country}/` — the tenant's section index.
pub fn country_index_url(country: &str) -> String {
  format!("/{country}/")
}

/// Country management screens; these live outside tenant scope.
pub mod management {
  pub fn countries_url() -> String {
    "/management/countries/".to_string()
  }

  pub fn new_country_url() -> String {
    "/management/countries/new".to_string()
  }

  pub fn edit_country_url(iso: &str) -> String {
    format!("/management/countries/{iso}/edit")
  }

  pub fn delete_country_url(iso: &str) -> String {
    format!("/management/countries/{iso}/delete")
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn tenant_urls_carry_the_country_prefix() {
    assert_eq!(section_url("ro", "sources"), "/ro/sources/");
    assert_eq!(new_url("ro", "sources"), "/ro/sources/new");
    assert_eq!(detail_url("ro", "sources", 7), "/ro/sources/7");
    assert_eq!(edit_url("ro", "sources", 7), "/ro/sources/7/edit");
    assert_eq!(delete_url("ro", "sources", 7), "/ro/sources/7/delete");
  }
}
