//! HTML rendering of the composed dashboard page. Charts are drawn in the
//! browser by Plotly.js from the embedded figure JSON.

use dashboard_core::DashboardResult;
use dashboard_reporting::dashboard::{Component, DashboardPage, Dropdown, Graph};
use std::fmt::Write;

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.0.min.js";

/// Render the page as a standalone HTML document.
pub fn render_page(page: &DashboardPage) -> DashboardResult<String> {
    let mut body = String::new();
    for row in &page.rows {
        body.push_str("<div class=\"row\">\n");
        for item in &row.items {
            match item {
                Component::Dropdown(dropdown) => render_dropdown(&mut body, dropdown),
                Component::Graph(graph) => render_graph(&mut body, graph),
            }
        }
        body.push_str("</div>\n");
    }

    let layout_json = embed_json(&serde_json::to_string(page)?);

    Ok(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{title}</title>
<script src="{plotly}"></script>
<style>
body{{font-family:system-ui,-apple-system,sans-serif;margin:0;padding:0 20px;background:#fafafa}}
.header{{text-align:center;padding:20px}}
.header img{{height:50px;width:auto;padding-right:10px;vertical-align:middle}}
.header h1{{display:inline-block;vertical-align:middle}}
.row{{display:flex;flex-wrap:wrap;align-items:flex-start}}
.six.columns{{flex:1 1 45%;min-width:480px}}
select{{margin:20px}}
</style>
</head>
<body>
<div class="header"><img src="{logo}" alt="logo"><h1>{title}</h1></div>
{body}<script type="application/json" id="dashboard-layout">{layout_json}</script>
<script>
const layout = JSON.parse(document.getElementById('dashboard-layout').textContent);
for (const row of layout.rows) {{
  for (const item of row.items) {{
    if (item.component === 'graph') {{
      const fig = item.figure || {{data: [], layout: {{}}}};
      Plotly.newPlot(item.id, fig.data, fig.layout);
    }}
  }}
}}
async function controlChanged(control, value) {{
  const resp = await fetch('api/update', {{
    method: 'POST',
    headers: {{'Content-Type': 'application/json'}},
    body: JSON.stringify({{control: control, value: value}})
  }});
  if (!resp.ok) {{ console.error('update failed', control, resp.status); return; }}
  const update = await resp.json();
  Plotly.react(update.target, update.figure.data, update.figure.layout);
}}
for (const select of document.querySelectorAll('select[data-control]')) {{
  select.addEventListener('change', () => controlChanged(select.id, select.value));
  if (select.value) controlChanged(select.id, select.value);
}}
</script>
</body>
</html>
"#,
        title = escape_html(&page.header.title),
        logo = escape_html(&page.header.logo),
        plotly = PLOTLY_CDN,
        body = body,
        layout_json = layout_json,
    ))
}

fn render_dropdown(out: &mut String, dropdown: &Dropdown) {
    let _ = writeln!(
        out,
        "<select id=\"{}\" data-control style=\"width:{}px\">",
        escape_html(&dropdown.id),
        dropdown.width_px
    );
    for option in &dropdown.options {
        let selected = if dropdown.value.as_deref() == Some(option.value.as_str()) {
            " selected"
        } else {
            ""
        };
        let _ = writeln!(
            out,
            "<option value=\"{}\"{}>{}</option>",
            escape_html(&option.value),
            selected,
            escape_html(&option.label)
        );
    }
    out.push_str("</select>\n");
}

fn render_graph(out: &mut String, graph: &Graph) {
    let _ = writeln!(out, "<div id=\"{}\" class=\"six columns\"></div>", escape_html(&graph.id));
}

/// JSON placed inside a `<script>` element must not close it early.
fn embed_json(json: &str) -> String {
    json.replace("</", "<\\/")
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
