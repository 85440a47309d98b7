use std::fmt::Write as _;

use super::{Accessory, GridHandle, GridState, Section, Surface, Widget};

const STYLE: &str = "\
table { border-collapse: collapse; }
td { width: 6px; height: 6px; padding: 0; }
.container { display: inline-block; margin: 4px; vertical-align: top; }
.subtitle { display: block; font-family: monospace; }
.pre { white-space: pre; }
";

/// Surface that builds a self-contained HTML page, one `<table>` per grid.
#[derive(Debug, Default)]
pub struct HtmlSurface {
    title: String,
    grids: Vec<GridState>,
    widgets: Vec<(Section, Widget)>,
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

impl HtmlSurface {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    fn write_table(&self, out: &mut String, grid: GridHandle) {
        let state = &self.grids[grid.0];
        out.push_str("<table>");
        for row in 0..state.rows {
            out.push_str("<tr>");
            for col in 0..state.cols {
                match state.cell(row, col) {
                    Some(color) => {
                        let _ = write!(out, "<td style=\"background-color:{}\"></td>", escape(color));
                    }
                    None => out.push_str("<td></td>"),
                }
            }
            out.push_str("</tr>");
        }
        out.push_str("</table>");
    }

    fn write_widget(&self, out: &mut String, widget: &Widget) {
        out.push_str("<span class=\"container\">");
        self.write_table(out, widget.grid);
        match &widget.accessory {
            Accessory::None => {}
            Accessory::Caption(caption) => {
                let class = if caption.preformatted { "subtitle pre" } else { "subtitle" };
                let _ = write!(out, "<span class=\"{class}\">{}</span>", escape(&caption.text));
            }
            Accessory::IndexInput { value } => {
                let _ = write!(out, "<input type=\"number\" min=\"0\" value=\"{value}\">");
            }
        }
        out.push_str("</span>");
    }

    /// Renders the page with the sections in a fixed order.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = write!(
            out,
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n<style>\n{STYLE}</style>\n</head>\n<body>\n",
            escape(&self.title)
        );
        for section in Section::ALL {
            let mut widgets = self.widgets.iter().filter(|(s, _)| *s == section).peekable();
            if widgets.peek().is_none() {
                continue;
            }
            let _ = writeln!(out, "<div class=\"{}\">", section.name());
            for (_, widget) in widgets {
                self.write_widget(&mut out, widget);
                out.push('\n');
            }
            out.push_str("</div>\n");
        }
        out.push_str("</body>\n</html>\n");
        out
    }
}

impl Surface for HtmlSurface {
    fn create_grid(&mut self, rows: usize, cols: usize) -> GridHandle {
        self.grids.push(GridState {
            rows,
            cols,
            cells: vec![None; rows * cols],
        });
        GridHandle(self.grids.len() - 1)
    }

    fn set_cell_color(&mut self, grid: GridHandle, row: usize, col: usize, color: &str) {
        let state = &mut self.grids[grid.0];
        state.cells[row * state.cols + col] = Some(color.to_string());
    }

    fn append(&mut self, section: Section, widget: Widget) {
        self.widgets.push((section, widget));
    }

    fn input_changed(&mut self, grid: GridHandle, value: usize) {
        for (_, widget) in &mut self.widgets {
            if widget.grid == grid {
                if let Accessory::IndexInput { value: current } = &mut widget.accessory {
                    *current = value;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::Caption;

    #[test]
    fn renders_sections_in_page_order() {
        let mut surface = HtmlSurface::new("digits");
        let a = surface.create_grid(1, 2);
        surface.set_cell_color(a, 0, 0, "#ffffff");
        surface.set_cell_color(a, 0, 1, "#000000");
        let b = surface.create_grid(1, 1);
        surface.append(
            Section::Mismatches,
            Widget {
                grid: b,
                accessory: Accessory::Caption(Caption::preformatted("predicted: 3\nactual:    <5>")),
            },
        );
        surface.append(
            Section::Browser,
            Widget {
                grid: a,
                accessory: Accessory::IndexInput { value: 0 },
            },
        );
        surface.input_changed(a, 7);

        let html = surface.render();
        let browser = html.find("<div class=\"browser\">").unwrap();
        let mismatches = html.find("<div class=\"mismatches\">").unwrap();
        assert!(browser < mismatches);
        assert!(!html.contains("<div class=\"parameters\">"));
        assert!(html.contains(
            "<tr><td style=\"background-color:#ffffff\"></td><td style=\"background-color:#000000\"></td></tr>"
        ));
        assert!(html.contains("value=\"7\""));
        assert!(html.contains("<span class=\"subtitle pre\">predicted: 3\nactual:    &lt;5&gt;</span>"));
        assert!(html.contains("<title>digits</title>"));
    }
}
