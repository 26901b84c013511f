//! HTML page generation over the `quick-xml` writer API.
//!
//! Screens are assembled in code rather than from template files; text and
//! attribute values are escaped at write time. The detail table walks the
//! rows handed to it field by field, which is what keeps fifteen entity
//! screens on one renderer.

use std::io::Cursor;

use quick_xml::{
  Writer,
  events::{BytesEnd, BytesStart, BytesText, Event},
};

use flis_core::display::{DetailTable, FieldValue};

use crate::forms::FormErrors;

// ─── Form widgets ────────────────────────────────────────────────────────────

/// How a form field is rendered.
#[derive(Debug, Clone)]
pub enum Widget {
  Text { value: String },
  TextArea { value: String },
  /// `(value, label)` options plus the currently selected value. A blank
  /// `---------` choice is always offered first.
  Select { options: Vec<(String, String)>, selected: String },
}

impl Widget {
  pub fn text(value: impl Into<String>) -> Self {
    Widget::Text { value: value.into() }
  }

  pub fn textarea(value: impl Into<String>) -> Self {
    Widget::TextArea { value: value.into() }
  }

  pub fn select(options: Vec<(String, String)>, selected: impl Into<String>) -> Self {
    Widget::Select { options, selected: selected.into() }
  }
}

/// One form field: wire name, column label, widget.
#[derive(Debug, Clone)]
pub struct FormField {
  pub name:   &'static str,
  pub label:  &'static str,
  pub widget: Widget,
}

// ─── Page builder ────────────────────────────────────────────────────────────

pub struct PageBuilder {
  w: Writer<Cursor<Vec<u8>>>,
}

impl PageBuilder {
  pub fn new(title: &str) -> Self {
    let cursor = Cursor::new(Vec::new());
    let mut w = Writer::new(cursor);

    w.write_event(Event::DocType(BytesText::new("html"))).unwrap();
    write_start(&mut w, "html");
    write_start(&mut w, "head");
    write_empty_with_attr(&mut w, "meta", &[("charset", "utf-8")]);
    write_text_elem(&mut w, "title", title);
    write_end(&mut w, "head");
    write_start(&mut w, "body");
    write_text_elem(&mut w, "h1", title);

    Self { w }
  }

  /// Close the document and return the rendered page.
  pub fn finish(mut self) -> String {
    write_end(&mut self.w, "body");
    write_end(&mut self.w, "html");
    let bytes = self.w.into_inner().into_inner();
    String::from_utf8(bytes).expect("writer output is UTF-8")
  }

  /// The section navigation shown on every page.
  pub fn nav(&mut self, links: &[(String, String)]) {
    let mut ul = BytesStart::new("ul");
    ul.push_attribute(("class", "nav"));
    self.w.write_event(Event::Start(ul)).unwrap();
    for (href, label) in links {
      write_start(&mut self.w, "li");
      write_link(&mut self.w, href, label);
      write_end(&mut self.w, "li");
    }
    write_end(&mut self.w, "ul");
  }

  pub fn paragraph(&mut self, text: &str) {
    write_text_elem(&mut self.w, "p", text);
  }

  /// A standalone action link (e.g. "New source", "Edit").
  pub fn action_link(&mut self, href: &str, label: &str) {
    write_start(&mut self.w, "p");
    let mut a = BytesStart::new("a");
    a.push_attribute(("class", "btn"));
    a.push_attribute(("href", href));
    self.w.write_event(Event::Start(a)).unwrap();
    write_text(&mut self.w, label);
    write_end(&mut self.w, "a");
    write_end(&mut self.w, "p");
  }

  /// A list screen's row table.
  pub fn list_table(&mut self, headers: &[&str], rows: &[Vec<FieldValue>]) {
    let mut table = BytesStart::new("table");
    table.push_attribute(("class", "table table-bordered table-condensed"));
    self.w.write_event(Event::Start(table)).unwrap();

    write_start(&mut self.w, "thead");
    write_start(&mut self.w, "tr");
    for header in headers {
      write_text_elem(&mut self.w, "th", header);
    }
    write_end(&mut self.w, "tr");
    write_end(&mut self.w, "thead");

    write_start(&mut self.w, "tbody");
    for row in rows {
      write_start(&mut self.w, "tr");
      for cell in row {
        write_start(&mut self.w, "td");
        write_field_value(&mut self.w, cell);
        write_end(&mut self.w, "td");
      }
      write_end(&mut self.w, "tr");
    }
    write_end(&mut self.w, "tbody");
    write_end(&mut self.w, "table");
  }

  /// A detail screen's field-by-field table. When the entity references a
  /// source, a final `URL` row linking to that source is appended.
  pub fn detail_table(&mut self, table: &DetailTable) {
    let mut t = BytesStart::new("table");
    t.push_attribute(("class", "table table-bordered table-condensed"));
    self.w.write_event(Event::Start(t)).unwrap();
    write_start(&mut self.w, "tbody");

    for row in &table.rows {
      write_start(&mut self.w, "tr");
      let mut th = BytesStart::new("th");
      th.push_attribute(("class", "span2"));
      self.w.write_event(Event::Start(th)).unwrap();
      write_text(&mut self.w, row.label);
      write_end(&mut self.w, "th");
      write_start(&mut self.w, "td");
      write_field_value(&mut self.w, &row.value);
      write_end(&mut self.w, "td");
      write_end(&mut self.w, "tr");
    }

    if let Some(url) = &table.source_url {
      write_start(&mut self.w, "tr");
      let mut th = BytesStart::new("th");
      th.push_attribute(("class", "span2"));
      self.w.write_event(Event::Start(th)).unwrap();
      write_text(&mut self.w, "URL");
      write_end(&mut self.w, "th");
      write_start(&mut self.w, "td");
      write_link(&mut self.w, url, url);
      write_end(&mut self.w, "td");
      write_end(&mut self.w, "tr");
    }

    write_end(&mut self.w, "tbody");
    write_end(&mut self.w, "table");
  }

  /// `Page X of Y` with previous/next links where they exist.
  pub fn pagination(&mut self, base_url: &str, page: usize, num_pages: usize) {
    if num_pages <= 1 {
      return;
    }
    let mut div = BytesStart::new("div");
    div.push_attribute(("class", "pagination"));
    self.w.write_event(Event::Start(div)).unwrap();

    if page > 1 {
      let href = format!("{}?page={}", base_url, page - 1);
      write_link(&mut self.w, &href, "previous");
    }
    write_text_elem(&mut self.w, "span", &format!("Page {page} of {num_pages}"));
    if page < num_pages {
      let href = format!("{}?page={}", base_url, page + 1);
      write_link(&mut self.w, &href, "next");
    }

    write_end(&mut self.w, "div");
  }

  /// A POST form laid out as a label/widget table, with per-field error
  /// lists rendered above the offending widget.
  pub fn form(
    &mut self,
    action: &str,
    fields: &[FormField],
    errors: &FormErrors,
    submit: &str,
    cancel_url: &str,
  ) {
    let mut form = BytesStart::new("form");
    form.push_attribute(("method", "post"));
    form.push_attribute(("action", action));
    self.w.write_event(Event::Start(form)).unwrap();

    if !fields.is_empty() {
      let mut table = BytesStart::new("table");
      table.push_attribute(("class", "table"));
      self.w.write_event(Event::Start(table)).unwrap();

      for field in fields {
        write_start(&mut self.w, "tr");

        write_start(&mut self.w, "th");
        let id = format!("id_{}", field.name);
        let mut label = BytesStart::new("label");
        label.push_attribute(("for", id.as_str()));
        self.w.write_event(Event::Start(label)).unwrap();
        write_text(&mut self.w, field.label);
        write_end(&mut self.w, "label");
        write_end(&mut self.w, "th");

        write_start(&mut self.w, "td");
        let field_errors = errors.field(field.name);
        if !field_errors.is_empty() {
          let mut ul = BytesStart::new("ul");
          ul.push_attribute(("class", "errorlist"));
          self.w.write_event(Event::Start(ul)).unwrap();
          for message in field_errors {
            write_text_elem(&mut self.w, "li", message);
          }
          write_end(&mut self.w, "ul");
        }
        self.write_widget(field, &id);
        write_end(&mut self.w, "td");

        write_end(&mut self.w, "tr");
      }

      write_end(&mut self.w, "table");
    }

    write_start(&mut self.w, "p");
    write_empty_with_attr(&mut self.w, "input", &[
      ("type", "submit"),
      ("value", submit),
    ]);
    write_text(&mut self.w, " ");
    write_link(&mut self.w, cancel_url, "Cancel");
    write_end(&mut self.w, "p");

    write_end(&mut self.w, "form");
  }

  fn write_widget(&mut self, field: &FormField, id: &str) {
    match &field.widget {
      Widget::Text { value } => {
        write_empty_with_attr(&mut self.w, "input", &[
          ("type", "text"),
          ("id", id),
          ("name", field.name),
          ("value", value),
        ]);
      }
      Widget::TextArea { value } => {
        let mut ta = BytesStart::new("textarea");
        ta.push_attribute(("id", id));
        ta.push_attribute(("name", field.name));
        ta.push_attribute(("rows", "6"));
        self.w.write_event(Event::Start(ta)).unwrap();
        write_text(&mut self.w, value);
        write_end(&mut self.w, "textarea");
      }
      Widget::Select { options, selected } => {
        let mut select = BytesStart::new("select");
        select.push_attribute(("id", id));
        select.push_attribute(("name", field.name));
        self.w.write_event(Event::Start(select)).unwrap();

        // The blank choice, selected when nothing else matches.
        write_option(&mut self.w, "", "---------", selected.is_empty());
        for (value, label) in options {
          write_option(&mut self.w, value, label, value == selected);
        }

        write_end(&mut self.w, "select");
      }
    }
  }
}

// ─── Writer helpers ──────────────────────────────────────────────────────────

fn write_start(w: &mut Writer<Cursor<Vec<u8>>>, tag: &str) {
  w.write_event(Event::Start(BytesStart::new(tag))).unwrap();
}

fn write_end(w: &mut Writer<Cursor<Vec<u8>>>, tag: &str) {
  w.write_event(Event::End(BytesEnd::new(tag))).unwrap();
}

fn write_text(w: &mut Writer<Cursor<Vec<u8>>>, text: &str) {
  w.write_event(Event::Text(BytesText::new(text))).unwrap();
}

fn write_text_elem(w: &mut Writer<Cursor<Vec<u8>>>, tag: &str, text: &str) {
  write_start(w, tag);
  write_text(w, text);
  write_end(w, tag);
}

fn write_empty_with_attr(
  w: &mut Writer<Cursor<Vec<u8>>>,
  tag: &str,
  attrs: &[(&str, &str)],
) {
  let mut el = BytesStart::new(tag);
  for (k, v) in attrs {
    el.push_attribute((*k, *v));
  }
  w.write_event(Event::Empty(el)).unwrap();
}

fn write_link(w: &mut Writer<Cursor<Vec<u8>>>, href: &str, label: &str) {
  let mut a = BytesStart::new("a");
  a.push_attribute(("href", href));
  w.write_event(Event::Start(a)).unwrap();
  write_text(w, label);
  write_end(w, "a");
}

fn write_option(
  w: &mut Writer<Cursor<Vec<u8>>>,
  value: &str,
  label: &str,
  selected: bool,
) {
  let mut option = BytesStart::new("option");
  option.push_attribute(("value", value));
  if selected {
    option.push_attribute(("selected", "selected"));
  }
  w.write_event(Event::Start(option)).unwrap();
  write_text(w, label);
  write_end(w, "option");
}

/// Absent optionals render literally as `None`.
fn write_field_value(w: &mut Writer<Cursor<Vec<u8>>>, value: &FieldValue) {
  match value {
    FieldValue::Text(text) => write_text(w, text),
    FieldValue::Link { href, label } => write_link(w, href, label),
    FieldValue::Missing => write_text(w, "None"),
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;
  use flis_core::display::DetailRow;

  #[test]
  fn text_is_escaped() {
    let mut page = PageBuilder::new("x");
    page.paragraph("<script>alert(1)</script>");
    let html = page.finish();
    assert!(html.contains("&lt;script&gt;"), "html: {html}");
    assert!(!html.contains("<script>"), "html: {html}");
  }

  #[test]
  fn detail_table_renders_missing_as_none() {
    let table = DetailTable {
      rows:       vec![DetailRow::new("File", FieldValue::Missing)],
      source_url: None,
    };
    let mut page = PageBuilder::new("x");
    page.detail_table(&table);
    let html = page.finish();
    assert!(html.contains("<td>None</td>"), "html: {html}");
  }

  #[test]
  fn detail_table_appends_source_url_row() {
    let table = DetailTable {
      rows:       vec![],
      source_url: Some("http://example.com/report".into()),
    };
    let mut page = PageBuilder::new("x");
    page.detail_table(&table);
    let html = page.finish();
    assert!(html.contains(">URL<"), "html: {html}");
    assert!(
      html.contains(r#"<a href="http://example.com/report">"#),
      "html: {html}"
    );
  }

  #[test]
  fn select_marks_the_selected_option() {
    let field = FormField {
      name:   "source",
      label:  "Source",
      widget: Widget::select(
        vec![("1".into(), "EEA".into()), ("2".into(), "UN".into())],
        "2",
      ),
    };
    let mut page = PageBuilder::new("x");
    page.form("/x", &[field], &FormErrors::default(), "Save", "/y");
    let html = page.finish();
    assert!(
      html.contains(r#"<option value="2" selected="selected">UN</option>"#),
      "html: {html}"
    );
    assert!(html.contains("---------"), "html: {html}");
  }

  #[test]
  fn form_renders_field_errors() {
    let mut errors = FormErrors::default();
    errors.add("country", "Country not valid");
    let field = FormField {
      name:   "country",
      label:  "Country",
      widget: Widget::text("si"),
    };
    let mut page = PageBuilder::new("x");
    page.form("/x", &[field], &errors, "Save", "/y");
    let html = page.finish();
    assert!(
      html.contains(r#"<ul class="errorlist"><li>Country not valid</li></ul>"#),
      "html: {html}"
    );
  }

  #[test]
  fn pagination_renders_nothing_for_a_single_page() {
    let mut page = PageBuilder::new("x");
    page.pagination("/ro/sources/", 1, 1);
    let html = page.finish();
    assert!(!html.contains("pagination"), "html: {html}");
  }

  #[test]
  fn pagination_links_previous_and_next() {
    let mut page = PageBuilder::new("x");
    page.pagination("/ro/sources/", 2, 3);
    let html = page.finish();
    assert!(html.contains("?page=1"), "html: {html}");
    assert!(html.contains("?page=3"), "html: {html}");
    assert!(html.contains("Page 2 of 3"), "html: {html}");
  }
}
