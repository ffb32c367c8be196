//! Table renderer for `table` results
//!
//! The payload carries optional headers and a grid of cells:
//!
//! ```json
//! {
//!   "table_desc": {"title": "Discretized matrix", "desc": "..."},
//!   "headers": {
//!     "col": {"data": ["funcId", "metric", "min_B1", "max_B1"]},
//!     "row": {
//!       "data": [null, "Flid1_VIB2", "Flid1_VIB3"],
//!       "default_links": {"type": "ts_list", "context": "raw"},
//!       "links": [{"val": [{"tsuid": "00A1"}]}, {"val": [{"tsuid": "00A2"}]}]
//!     }
//!   },
//!   "content": {"cells": [["VIB2", -50.0, 12.1], ["VIB3", -5.0, 2.1]]}
//! }
//! ```
//!
//! The first entry of each header's `data` labels the corner cell. Links
//! (`type`, `val`, `context`) may be set per cell, per row header or per
//! column header, with `default_links` supplying the shared fields. A link is
//! only followable when all three fields are known. Followed links open a
//! `Curve`: `raw` links carry the series list in `val`, `processdata` links
//! carry the id of a stored result whose content is the series list.

use super::{degrade, heading, muted, selected_style};
use crate::viz::{Handled, Renderer, RendererContext, RendererDescriptor, RendererFactory};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tokio::task::JoinHandle;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub const IMPLEMENTATION: &str = "Table";

/// Renderer opened by followed links
const LINK_TARGET: &str = "Curve";

/// Widest a column may get before its cells are cut
const MAX_COLUMN_WIDTH: usize = 24;

pub fn factory() -> RendererFactory {
    Arc::new(|ctx, payload| Box::new(TableRenderer::new(ctx, payload)))
}

pub fn descriptor() -> RendererDescriptor {
    RendererDescriptor::new("Table", factory())
        .accepting(["table"])
        .described("Table with optional row/column headers and data links")
        .gesture("Up/Down", "Select a row")
        .gesture("Left/Right", "Select a column")
        .gesture("Enter", "Follow the data link of the selected cell or row")
}

#[derive(Debug, Clone, Default, Deserialize)]
struct DataLink {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    val: Option<Value>,
    #[serde(default)]
    context: Option<String>,
}

impl DataLink {
    /// Specific fields win over the defaults
    fn merged(specific: Option<&DataLink>, default: Option<&DataLink>) -> Option<DataLink> {
        let link = DataLink {
            kind: specific
                .and_then(|l| l.kind.clone())
                .or_else(|| default.and_then(|l| l.kind.clone())),
            val: specific
                .and_then(|l| l.val.clone())
                .or_else(|| default.and_then(|l| l.val.clone())),
            context: specific
                .and_then(|l| l.context.clone())
                .or_else(|| default.and_then(|l| l.context.clone())),
        };
        (link.kind.is_some() && link.val.is_some() && link.context.is_some()).then_some(link)
    }
}

#[derive(Debug, Default, Deserialize)]
struct TableDesc {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    desc: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct HeaderAxis {
    #[serde(default)]
    data: Vec<Value>,
    #[serde(default)]
    default_links: Option<DataLink>,
    #[serde(default)]
    links: Option<Vec<Option<DataLink>>>,
}

impl HeaderAxis {
    fn label(&self, index: usize) -> String {
        self.data.get(index + 1).map(cell_text).unwrap_or_default()
    }

    fn corner(&self) -> String {
        self.data.first().map(cell_text).unwrap_or_default()
    }

    fn link(&self, index: usize) -> Option<DataLink> {
        let specific = self
            .links
            .as_ref()
            .and_then(|links| links.get(index))
            .and_then(Option::as_ref);
        DataLink::merged(specific, self.default_links.as_ref())
    }
}

#[derive(Debug, Default, Deserialize)]
struct Headers {
    #[serde(default)]
    col: Option<HeaderAxis>,
    #[serde(default)]
    row: Option<HeaderAxis>,
}

#[derive(Debug, Default, Deserialize)]
struct Content {
    #[serde(default)]
    cells: Vec<Vec<Value>>,
    #[serde(default)]
    default_links: Option<DataLink>,
    #[serde(default)]
    links: Option<Vec<Vec<Option<DataLink>>>>,
}

#[derive(Debug, Default, Deserialize)]
struct TableData {
    #[serde(default)]
    table_desc: Option<TableDesc>,
    #[serde(default)]
    headers: Option<Headers>,
    #[serde(default)]
    content: Content,
}

impl TableData {
    fn col_headers(&self) -> Option<&HeaderAxis> {
        self.headers.as_ref().and_then(|h| h.col.as_ref())
    }

    fn row_headers(&self) -> Option<&HeaderAxis> {
        self.headers.as_ref().and_then(|h| h.row.as_ref())
    }

    fn row_count(&self) -> usize {
        self.content.cells.len()
    }

    fn column_count(&self) -> usize {
        let from_cells = self.content.cells.iter().map(Vec::len).max().unwrap_or(0);
        let from_headers = self
            .col_headers()
            .map(|h| h.data.len().saturating_sub(1))
            .unwrap_or(0);
        from_cells.max(from_headers)
    }

    /// Cell link first, then the row header's
    fn link_at(&self, row: usize, col: usize) -> Option<DataLink> {
        let specific = self
            .content
            .links
            .as_ref()
            .and_then(|rows| rows.get(row))
            .and_then(|cols| cols.get(col))
            .and_then(Option::as_ref);
        DataLink::merged(specific, self.content.default_links.as_ref())
            .or_else(|| self.row_headers().and_then(|h| h.link(row)))
            .or_else(|| self.col_headers().and_then(|h| h.link(col)))
    }
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Pad or cut `text` to exactly `width` display columns
fn fit(text: &str, width: usize) -> String {
    if text.width() <= width {
        return format!("{text}{}", " ".repeat(width - text.width()));
    }
    if width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w > width - 1 {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out.push_str(&" ".repeat(width - 1 - used));
    out
}

pub struct TableRenderer {
    ctx: RendererContext,
    table: Result<TableData, String>,
    row: usize,
    col: usize,
    /// Stored-result lookup started by a followed `processdata` link
    fetch: Option<JoinHandle<()>>,
}

impl TableRenderer {
    pub fn new(ctx: RendererContext, payload: Value) -> Self {
        let table = match payload {
            Value::String(name) => Err(format!(
                "table \"{name}\" is referenced by name, inline its content in the workspace"
            )),
            other => serde_json::from_value(other).map_err(|e| e.to_string()),
        };
        Self {
            ctx,
            table,
            row: 0,
            col: 0,
            fetch: None,
        }
    }

    fn draw(&self) {
        let table = match &self.table {
            Ok(table) => table,
            Err(e) => {
                degrade(&self.ctx, "Table", e.clone());
                return;
            }
        };

        let mut lines = Vec::new();
        match table.table_desc.as_ref().and_then(|d| d.title.clone()) {
            Some(title) => lines.push(heading(title)),
            None => lines.push(heading("Table")),
        }
        if let Some(desc) = table.table_desc.as_ref().and_then(|d| d.desc.clone()) {
            lines.push(muted(desc));
        }
        lines.push(Line::default());

        let columns = table.column_count();
        let row_headers = table.row_headers();
        let col_headers = table.col_headers();

        let row_header_width = row_headers
            .map(|h| {
                (0..table.row_count())
                    .map(|r| h.label(r).width())
                    .chain(std::iter::once(h.corner().width()))
                    .max()
                    .unwrap_or(0)
                    .min(MAX_COLUMN_WIDTH)
            })
            .unwrap_or(0);

        let widths: Vec<usize> = (0..columns)
            .map(|c| {
                let header = col_headers.map(|h| h.label(c).width()).unwrap_or(0);
                table
                    .content
                    .cells
                    .iter()
                    .filter_map(|row| row.get(c))
                    .map(|v| cell_text(v).width())
                    .chain(std::iter::once(header))
                    .max()
                    .unwrap_or(0)
                    .clamp(1, MAX_COLUMN_WIDTH)
            })
            .collect();

        let header_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);

        if let Some(h) = col_headers {
            let mut spans = Vec::new();
            if let Some(r) = row_headers {
                spans.push(Span::styled(fit(&r.corner(), row_header_width), header_style));
                spans.push(Span::raw(" │ "));
            }
            for (c, width) in widths.iter().enumerate() {
                spans.push(Span::styled(fit(&h.label(c), *width), header_style));
                spans.push(Span::raw("  "));
            }
            lines.push(Line::from(spans));

            let rule_len = widths.iter().map(|w| w + 2).sum::<usize>()
                + if row_headers.is_some() { row_header_width + 3 } else { 0 };
            lines.push(muted("─".repeat(rule_len)));
        }

        for (r, cells) in table.content.cells.iter().enumerate() {
            let mut spans = Vec::new();
            if let Some(h) = row_headers {
                spans.push(Span::styled(fit(&h.label(r), row_header_width), header_style));
                spans.push(Span::raw(" │ "));
            }
            for (c, width) in widths.iter().enumerate() {
                let text = fit(&cells.get(c).map(cell_text).unwrap_or_default(), *width);
                let style = if r == self.row && c == self.col {
                    selected_style()
                } else if r == self.row {
                    Style::default().add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                spans.push(Span::styled(text, style));
                spans.push(Span::raw("  "));
            }
            lines.push(Line::from(spans));
        }

        if table.row_count() == 0 {
            lines.push(muted("(empty table)"));
        } else if table.link_at(self.row, self.col).is_some() {
            lines.push(Line::default());
            lines.push(muted("Enter: follow link"));
        }

        self.ctx.pen.draw(lines);
    }

    fn follow(&mut self) {
        let Ok(table) = &self.table else {
            return;
        };
        let Some(link) = table.link_at(self.row, self.col) else {
            self.ctx.notifier.notify("No data link on this cell");
            return;
        };
        let (Some(kind), Some(val), Some(context)) = (link.kind, link.val, link.context) else {
            return;
        };
        tracing::debug!(kind = %kind, context = %context, "following table link");

        match context.as_str() {
            "raw" => self.ctx.navigator.add_viz(LINK_TARGET, val),
            "processdata" => self.follow_stored_result(val),
            other => {
                tracing::debug!(context = other, "unsupported table link context");
                self.ctx
                    .notifier
                    .notify(format!("Cannot follow \"{other}\" links"));
            }
        }
    }

    /// Fetch the stored result `rid` and open its content
    fn follow_stored_result(&mut self, rid: Value) {
        let rid = match rid {
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            other => {
                self.ctx
                    .notifier
                    .notify(format!("Table: invalid result id {other}"));
                return;
            }
        };
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            self.ctx
                .notifier
                .notify("Table: no async runtime available to fetch linked data");
            return;
        };

        let data = Arc::clone(&self.ctx.data);
        let navigator = self.ctx.navigator.clone();
        let notifier = self.ctx.notifier.clone();

        self.abort();
        self.fetch = Some(runtime.spawn(async move {
            match data.result(&rid).await {
                Ok(content) => navigator.add_viz(LINK_TARGET, content),
                Err(e) => {
                    tracing::warn!(rid = %rid, error = %e, "linked result fetch failed");
                    notifier.notify(format!("Table: failed to load linked data: {e:#}"));
                }
            }
        }));
    }

    fn abort(&mut self) {
        if let Some(task) = self.fetch.take() {
            if !task.is_finished() {
                tracing::debug!(generation = %self.ctx.generation(), "aborting linked result fetch");
                task.abort();
            }
        }
    }
}

impl Renderer for TableRenderer {
    fn display(&mut self) {
        self.draw();
    }

    fn wake_up(&mut self) {
        self.draw();
    }

    fn sleep(&mut self) {
        self.abort();
    }

    fn handle_key(&mut self, key: KeyEvent) -> Handled {
        let (rows, cols) = match &self.table {
            Ok(t) => (t.row_count(), t.column_count()),
            Err(_) => return Handled::No,
        };

        match key.code {
            KeyCode::Up => self.row = self.row.saturating_sub(1),
            KeyCode::Down => self.row = (self.row + 1).min(rows.saturating_sub(1)),
            KeyCode::Left => self.col = self.col.saturating_sub(1),
            KeyCode::Right => self.col = (self.col + 1).min(cols.saturating_sub(1)),
            KeyCode::Home => self.row = 0,
            KeyCode::End => self.row = rows.saturating_sub(1),
            KeyCode::Enter => {
                self.follow();
                return Handled::Yes;
            }
            _ => return Handled::No,
        }
        self.draw();
        Handled::Yes
    }
}

impl Drop for TableRenderer {
    fn drop(&mut self) {
        self.abort();
    }
}
