//! HTML rendering for the todo page

use std::fmt::Write;

use crate::item::Item;
use crate::store::Backend;

/// Render the full todo page; `location` names the collection or file in use
pub fn todo_page(items: &[Item], backend: Backend, location: &str) -> String {
    let kind = if backend.is_remote() {
        "MongoDB"
    } else {
        "local file"
    };
    let storage = format!("{} ({})", kind, escape_html(location));

    let mut list = String::new();
    if items.is_empty() {
        list.push_str("      <li class=\"empty\">No items yet.</li>\n");
    }
    for item in items {
        // Writing into a String cannot fail
        let _ = write!(
            list,
            "      <li><strong>{}</strong>",
            escape_html(&item.item_name)
        );
        if let Some(description) = item.item_description.as_deref().filter(|d| !d.is_empty()) {
            let _ = write!(list, " &ndash; <span>{}</span>", escape_html(description));
        }
        list.push_str("</li>\n");
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="utf-8">
    <title>Todo List</title>
  </head>
  <body>
    <h1>Todo List</h1>
    <p class="storage" data-backend="{backend}">Storage: {storage}</p>
    <form action="/submittodoitem" method="post">
      <input type="text" name="itemName" placeholder="Item name" required>
      <input type="text" name="itemDescription" placeholder="Description">
      <button type="submit">Add</button>
    </form>
    <ul class="items">
{list}    </ul>
  </body>
</html>
"#
    )
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
