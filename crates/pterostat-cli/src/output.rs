use pterostat_common::{usage_percent, AggregatedUsage, Diagnostic, Node};
use serde::Serialize;
use tera::{Context, Tera};

const REPORT_TEMPLATE: &str = include_str!("../templates/report.html.tera");

/// One line of the usage table.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeRow {
    pub name: String,
    pub allocated_mb: u64,
    pub total_mb: u64,
    pub percent: f64,
}

impl NodeRow {
    fn percent_label(&self) -> String {
        format!("{}", self.percent)
    }

    fn bar_width(&self) -> String {
        format!("{}", self.percent.min(100.0))
    }
}

pub fn build_rows(nodes: &[Node], usage: &AggregatedUsage) -> Vec<NodeRow> {
    nodes
        .iter()
        .map(|node| {
            let allocated_mb = usage.allocated(node.id);
            NodeRow {
                name: node.name.clone(),
                allocated_mb,
                total_mb: node.memory,
                percent: usage_percent(allocated_mb, node.memory),
            }
        })
        .collect()
}

#[derive(Serialize)]
struct RowView<'a> {
    name: &'a str,
    allocated_mb: u64,
    total_mb: u64,
    percent_label: String,
    bar_width: String,
}

#[derive(Serialize)]
struct DiagnosticView {
    title: &'static str,
    detail: String,
}

/// Render the standalone HTML report. Every interpolated value is HTML-escaped.
pub fn render_html(rows: &[NodeRow], diagnostics: &[Diagnostic]) -> Result<String, tera::Error> {
    let rows: Vec<RowView> = rows
        .iter()
        .map(|r| RowView {
            name: &r.name,
            allocated_mb: r.allocated_mb,
            total_mb: r.total_mb,
            percent_label: r.percent_label(),
            bar_width: r.bar_width(),
        })
        .collect();
    let diagnostics: Vec<DiagnosticView> = diagnostics
        .iter()
        .map(|d| DiagnosticView {
            title: d.title(),
            detail: d.detail(),
        })
        .collect();

    let mut context = Context::new();
    context.insert("rows", &rows);
    context.insert("diagnostics", &diagnostics);
    Tera::one_off(REPORT_TEMPLATE, &context, true)
}

/// Replace control characters (ANSI escapes, newlines, ...) with their
/// `\u{..}`-style escapes so panel data cannot rewrite the terminal.
fn terminal_safe(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if c.is_control() {
            out.extend(c.escape_default());
        } else {
            out.push(c);
        }
    }
    out
}

pub fn render_text(rows: &[NodeRow], diagnostics: &[Diagnostic]) -> String {
    let mut out = String::new();

    for diag in diagnostics {
        out.push_str(&format!("Debug: {}:\n", diag.title()));
        for line in diag.detail().lines() {
            out.push_str(&terminal_safe(line));
            out.push('\n');
        }
        out.push('\n');
    }

    out.push_str("\n=== Node Memory Usage ===\n\n");
    if rows.is_empty() {
        out.push_str("No node data found.\n");
        return out;
    }

    out.push_str(&format!(
        "{:<30} {:>16} {:>16} {:>10}\n",
        "Node Name", "Allocated (MB)", "Total (MB)", "Usage"
    ));
    out.push_str(&format!("{:-<75}\n", ""));
    for row in rows {
        out.push_str(&format!(
            "{:<30} {:>16} {:>16} {:>9}%\n",
            terminal_safe(&row.name),
            row.allocated_mb,
            row.total_mb,
            row.percent_label()
        ));
    }
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn node(id: u64, name: &str, memory: u64) -> Node {
        Node {
            id,
            name: name.to_string(),
            memory,
        }
    }

    fn server(node: Option<u64>, memory: u64) -> Value {
        json!({ "attributes": { "node": node, "limits": { "memory": memory } } })
    }

    fn example_rows() -> (Vec<NodeRow>, AggregatedUsage) {
        let nodes = vec![node(1, "A", 1000), node(2, "B", 500)];
        let servers = vec![
            server(Some(1), 200),
            server(Some(1), 300),
            server(Some(2), 100),
        ];
        let usage = AggregatedUsage::from_records(&servers);
        (build_rows(&nodes, &usage), usage)
    }

    #[test]
    fn test_build_rows() {
        let (rows, _) = example_rows();
        assert_eq!(
            rows,
            vec![
                NodeRow {
                    name: "A".to_string(),
                    allocated_mb: 500,
                    total_mb: 1000,
                    percent: 50.0,
                },
                NodeRow {
                    name: "B".to_string(),
                    allocated_mb: 100,
                    total_mb: 500,
                    percent: 20.0,
                },
            ]
        );
    }

    #[test]
    fn test_node_without_servers_or_capacity() {
        let usage = AggregatedUsage::from_records(&[server(Some(1), 300)]);
        let rows = build_rows(&[node(1, "zero-cap", 0), node(2, "idle", 2048)], &usage);
        assert_eq!(rows[0].percent, 0.0);
        assert_eq!(rows[0].allocated_mb, 300);
        assert_eq!(rows[1].allocated_mb, 0);
        assert_eq!(rows[1].percent, 0.0);
    }

    #[test]
    fn test_render_html_rows() {
        let (rows, usage) = example_rows();
        let html = render_html(&rows, usage.diagnostics()).unwrap();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<style>"));
        assert_eq!(html.matches("<table>").count(), 1);
        assert!(html.contains("<td>A</td>"));
        assert!(html.contains("<td>500</td>"));
        assert!(html.contains("<td>1000</td>"));
        assert!(html.contains("width: 50%;"));
        assert!(html.contains(">50%</div>"));
        assert!(html.contains("<td>B</td>"));
        assert!(html.contains(">20%</div>"));
        assert!(!html.contains("No node data found."));
    }

    #[test]
    fn test_render_html_escapes_names() {
        let rows = vec![NodeRow {
            name: "<script>alert(1)</script> & co".to_string(),
            allocated_mb: 1,
            total_mb: 3,
            percent: usage_percent(1, 3),
        }];
        let html = render_html(&rows, &[]).unwrap();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("&amp; co"));
        assert!(html.contains(">33.33%</div>"));
    }

    #[test]
    fn test_render_html_empty_placeholder() {
        let html = render_html(&[], &[]).unwrap();
        assert!(html.contains(r#"<tr><td colspan="4">No node data found.</td></tr>"#));
        assert!(!html.contains("progress-bar\" style"));
    }

    #[test]
    fn test_over_allocation_clamps_bar() {
        let rows = vec![NodeRow {
            name: "busy".to_string(),
            allocated_mb: 3000,
            total_mb: 2000,
            percent: usage_percent(3000, 2000),
        }];
        let html = render_html(&rows, &[]).unwrap();
        assert!(html.contains("width: 100%;"));
        assert!(html.contains(">150%</div>"));
    }

    #[test]
    fn test_render_html_diagnostics() {
        let usage = AggregatedUsage::from_records(&[server(None, 512)]);
        let html = render_html(&[], usage.diagnostics()).unwrap();
        assert!(html.contains("Missing &#x27;node&#x27; attribute in server data"));
        assert!(html.contains("512"));
    }

    #[test]
    fn test_render_text() {
        let (rows, _) = example_rows();
        let text = render_text(&rows, &[]);
        assert!(text.contains("=== Node Memory Usage ==="));
        let a = text.lines().find(|l| l.starts_with("A ")).unwrap();
        assert!(a.contains("500"));
        assert!(a.contains("1000"));
        assert!(a.trim_end().ends_with("50%"));

        let empty = render_text(&[], &[]);
        assert!(empty.contains("No node data found."));
    }

    #[test]
    fn test_render_text_escapes_control_characters() {
        let rows = vec![NodeRow {
            name: "evil\u{1b}[2J\nFAKE 999 999 100%".to_string(),
            allocated_mb: 1,
            total_mb: 2,
            percent: 50.0,
        }];
        let diagnostics = AggregatedUsage::from_records(&[json!({
            "attributes": { "name": "bad\u{1b}[31m\nFAKE", "limits": { "memory": 1 } }
        })]);

        let text = render_text(&rows, diagnostics.diagnostics());
        assert!(!text.contains('\u{1b}'));
        assert!(!text.lines().any(|l| l.starts_with("FAKE")));
        assert!(text.contains("evil\\u{1b}[2J\\nFAKE"));
    }
}
