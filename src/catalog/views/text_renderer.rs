//! # Text Renderer
//!
//! Paints controller state as plain text tables and blocks. The output
//! stream is injected so tests can render into a buffer.

use crate::catalog::controllers::{
    DetailController, FormController, FormField, FormMode, ListState, ENDPOINT_COLUMNS,
};
use crate::catalog::models::{Endpoint, Interface, ServerInfo, AUTH_TYPES, INTERFACE_TYPES};
use anyhow::Result;
use std::io::Write;

/// Suggested values shown next to a form field
fn field_choices(field: FormField) -> Option<&'static [&'static str]> {
    match field {
        FormField::Type => Some(&INTERFACE_TYPES as &'static [&'static str]),
        FormField::AuthType => Some(&AUTH_TYPES as &'static [&'static str]),
        _ => None,
    }
}

/// Plain-text renderer over any writable stream
pub struct TextRenderer<W: Write> {
    stream: W,
}

/// Lay out rows under a header with columns padded to the widest cell
fn table(header: &[&str], rows: &[Vec<String>]) -> Vec<String> {
    let mut widths: Vec<usize> = header.iter().map(|title| title.len()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let format_row = |cells: Vec<String>| {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .collect();
        format!("  {}", padded.join("  ").trim_end())
    };

    let mut lines = vec![format_row(
        header.iter().map(|title| title.to_uppercase()).collect(),
    )];
    lines.extend(rows.iter().map(|row| format_row(row.clone())));
    lines
}

fn interface_row(interface: &Interface) -> Vec<String> {
    vec![
        interface.id.map(|id| id.to_string()).unwrap_or_default(),
        interface.display_name().to_string(),
        interface.interface_type.clone().unwrap_or_default(),
        interface.base_url.clone().unwrap_or_default(),
        if interface.is_active() { "yes" } else { "no" }.to_string(),
    ]
}

fn endpoint_row(endpoint: &Endpoint) -> Vec<String> {
    vec![
        endpoint.method_label().to_string(),
        endpoint.path_label().to_string(),
        endpoint.description.clone().unwrap_or_default(),
        endpoint.status_label().to_string(),
    ]
}

impl<W: Write> TextRenderer<W> {
    pub fn with_render_stream(stream: W) -> Self {
        Self { stream }
    }

    /// Give the stream back, mostly for inspecting test output
    pub fn into_inner(self) -> W {
        self.stream
    }

    pub fn stream(&self) -> &W {
        &self.stream
    }

    pub fn stream_mut(&mut self) -> &mut W {
        &mut self.stream
    }

    fn lines(&mut self, lines: &[String]) -> Result<()> {
        for line in lines {
            writeln!(self.stream, "{line}")?;
        }
        self.stream.flush()?;
        Ok(())
    }

    /// Write a single line
    pub fn render_line(&mut self, line: &str) -> Result<()> {
        self.lines(&[line.to_string()])
    }

    /// Blocking notification
    pub fn render_notice(&mut self, message: &str) -> Result<()> {
        let lines: Vec<String> = message.lines().map(|line| format!("! {line}")).collect();
        self.lines(&lines)
    }

    pub fn render_list(&mut self, state: &ListState) -> Result<()> {
        let mut lines = Vec::new();
        let mut title = format!(
            "API Interfaces ({} of {})",
            state.filtered.len(),
            state.interfaces.len()
        );
        if !state.search_term.trim().is_empty() {
            title.push_str(&format!(" matching \"{}\"", state.search_term.trim()));
        }
        lines.push(title);

        if state.is_loading {
            lines.push("  Loading...".to_string());
        } else if state.filtered.is_empty() {
            lines.push("  No API interfaces found.".to_string());
        } else {
            let rows: Vec<Vec<String>> = state.filtered.iter().map(interface_row).collect();
            lines.extend(table(&["id", "name", "type", "base url", "active"], &rows));
        }
        self.lines(&lines)
    }

    pub fn render_detail(&mut self, detail: &DetailController) -> Result<()> {
        let state = detail.state();
        if let Some(error) = &state.error {
            return self.lines(&[format!("Error: {error}")]);
        }
        let Some(interface) = &state.interface else {
            return self.lines(&["Loading...".to_string()]);
        };

        let mut lines = vec![format!(
            "{} [{}] ({})",
            interface.display_name(),
            interface.interface_type.as_deref().unwrap_or("-"),
            if interface.is_active() { "active" } else { "inactive" }
        )];
        let fields = [
            ("Base URL", interface.base_url.as_deref()),
            ("Auth", interface.auth_type.as_deref()),
            ("Description", interface.description.as_deref()),
            ("Created", interface.created_at.as_deref()),
            ("Updated", interface.updated_at.as_deref()),
        ];
        for (label, value) in fields {
            lines.push(format!("  {:<12} {}", format!("{label}:"), value.unwrap_or("-")));
        }

        let endpoints = detail
            .sublist()
            .map(|sublist| sublist.state().endpoints.as_slice())
            .unwrap_or(state.endpoints.as_slice());
        lines.push(format!("Endpoints ({})", endpoints.len()));
        if endpoints.is_empty() {
            lines.push("  No endpoints.".to_string());
        } else {
            let rows: Vec<Vec<String>> = endpoints.iter().map(endpoint_row).collect();
            lines.extend(table(&ENDPOINT_COLUMNS, &rows));
        }
        self.lines(&lines)
    }

    pub fn render_form(&mut self, form: &FormController) -> Result<()> {
        let state = form.state();
        let mut lines = vec![match form.mode() {
            FormMode::Create => "New API Interface".to_string(),
            FormMode::Edit(id) => format!("Edit API Interface #{id}"),
        }];

        if state.is_loading {
            lines.push("  Loading...".to_string());
            return self.lines(&lines);
        }

        for field in FormField::ALL {
            let mut line = format!(
                "  {:<12} {}",
                format!("{}:", field.label()),
                state.form.value(field)
            );
            if let Some(choices) = field_choices(field) {
                line.push_str(&format!("  [{}]", choices.join(" | ")));
            }
            lines.push(line);
        }
        for error in form.visible_errors() {
            lines.push(format!("  ! {error}"));
        }
        if state.is_submitting {
            lines.push("  Saving...".to_string());
        }
        self.lines(&lines)
    }

    pub fn render_server_info(&mut self, info: &ServerInfo) -> Result<()> {
        let mut lines = vec![format!("{} (version {})", info.message, info.version)];
        lines.extend(
            info.endpoints
                .iter()
                .map(|(name, path)| format!("  {name}: {path}")),
        );
        self.lines(&lines)
    }
}
