//! Display-ready page model.
//!
//! These types describe what a page shows, not how it is drawn: a front end
//! renders them into markup.

use serde::Serialize;

/// A named hyperlink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    /// Link text.
    pub name: String,
    /// Target URI.
    pub href: String,
}

impl Link {
    /// Creates a link.
    #[must_use]
    pub fn new(name: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            href: href.into(),
        }
    }
}

/// One table cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Cell {
    /// Nothing.
    Empty,
    /// Plain text.
    Text {
        /// The text.
        value: String,
        /// Rendered with emphasis.
        #[serde(skip_serializing_if = "std::ops::Not::not")]
        strong: bool,
    },
    /// A hyperlink.
    Link {
        /// The link.
        link: Link,
        /// Rendered with emphasis.
        #[serde(skip_serializing_if = "std::ops::Not::not")]
        strong: bool,
    },
}

impl Cell {
    /// Plain text cell.
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text {
            value: value.into(),
            strong: false,
        }
    }

    /// Emphasized text cell.
    #[must_use]
    pub fn strong_text(value: impl Into<String>) -> Self {
        Self::Text {
            value: value.into(),
            strong: true,
        }
    }

    /// Link cell.
    #[must_use]
    pub const fn link(link: Link) -> Self {
        Self::Link {
            link,
            strong: false,
        }
    }

    /// Emphasized link cell.
    #[must_use]
    pub const fn strong_link(link: Link) -> Self {
        Self::Link { link, strong: true }
    }

    /// Returns the visible text of the cell.
    #[must_use]
    pub fn display_text(&self) -> &str {
        match self {
            Self::Empty => "",
            Self::Text { value, .. } => value,
            Self::Link { link, .. } => &link.name,
        }
    }

    /// Returns true for empty cells.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// A table of rows of cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableView {
    /// Column headers.
    pub headers: Vec<String>,
    /// Per-column CSS classes.
    pub column_classes: Vec<String>,
    /// Rows, each a list of cells.
    pub rows: Vec<Vec<Cell>>,
    /// Per-row CSS classes.
    pub row_classes: Vec<String>,
    /// Shown when there are no rows.
    pub no_data: String,
}

impl TableView {
    /// Creates an empty table with the given headers and column classes.
    #[must_use]
    pub fn new(headers: &[&str], column_classes: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(ToString::to_string).collect(),
            column_classes: column_classes.iter().map(ToString::to_string).collect(),
            rows: Vec::new(),
            row_classes: Vec::new(),
            no_data: "No data available.".to_string(),
        }
    }

    /// Appends a row.
    pub fn push_row(&mut self, cells: Vec<Cell>, class: &str) {
        self.rows.push(cells);
        self.row_classes.push(class.to_string());
    }
}

/// A table under a section header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableSection {
    /// Section header.
    pub header: String,
    /// Table contents.
    pub table: TableView,
}

/// Breadcrumb entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Crumb {
    /// Crumb text.
    pub name: String,
    /// Crumb target.
    pub href: String,
}

/// Entry in an object's action menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Action {
    /// Action label.
    pub name: String,
    /// Icon name.
    pub icon: String,
    /// Target URI.
    pub href: String,
    /// Shown but not clickable.
    pub disabled: bool,
}

/// A label with one or more values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Property {
    /// Property label.
    pub label: String,
    /// Property values.
    pub values: Vec<Cell>,
}

/// Key/value summary of an object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PropertyList {
    /// Properties, in display order.
    pub properties: Vec<Property>,
}

/// Colored bar drawn beside a list item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BarColor {
    /// Active.
    Green,
}

/// Small action button on a list item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemAction {
    /// Accessible label.
    pub name: String,
    /// Icon name.
    pub icon: String,
    /// Target URI.
    pub href: String,
    /// Shown but not clickable.
    pub disabled: bool,
    /// Opens as a dialog workflow.
    pub workflow: bool,
}

/// One entry in an object list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectItem {
    /// Item title.
    pub header: String,
    /// Status bar color.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bar_color: Option<BarColor>,
    /// Rendered de-emphasized.
    pub disabled: bool,
    /// Secondary lines of text.
    pub attributes: Vec<String>,
    /// Action buttons.
    pub actions: Vec<ItemAction>,
}

/// One rendered audit transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionEntry {
    /// Transaction ID.
    pub id: i64,
    /// Author link.
    pub author: Link,
    /// Icon name.
    pub icon: String,
    /// One-line description of the change.
    pub title: String,
    /// Formatted creation time.
    pub date: String,
}
