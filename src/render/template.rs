use super::html::escape;
use crate::constants::REPORT_FOOTER;

const STYLE: &str = r#"
body { font-family: -apple-system, "Segoe UI", Helvetica, Arial, sans-serif; margin: 2em; color: #1f2933; background: #f7f9fb; }
h1 { color: #102a43; border-bottom: 2px solid #334e68; padding-bottom: 0.3em; }
h2 { color: #243b53; margin-top: 1.6em; }
.meta { color: #52606d; margin: 0.2em 0; }
table { border-collapse: collapse; width: 100%; margin: 1em 0; background: #ffffff; }
th, td { border: 1px solid #d9e2ec; padding: 6px 10px; text-align: left; vertical-align: top; }
th { background: #334e68; color: #ffffff; cursor: pointer; user-select: none; }
th.asc::after { content: " \25B2"; }
th.desc::after { content: " \25BC"; }
tr:nth-child(even) td { background: #f0f4f8; }
tr.flagged td { background: #ffe3e3; font-weight: bold; }
pre { background: #102a43; color: #d9e2ec; padding: 1em; overflow-x: auto; white-space: pre-wrap; }
.notice { background: #fff3c4; border-left: 4px solid #f0b429; padding: 0.6em 1em; }
#filterInput { width: 100%; padding: 8px; margin: 1em 0; box-sizing: border-box; font-size: 1em; }
.footer { margin-top: 3em; color: #829ab1; font-size: 0.85em; text-align: center; }
"#;

// `compareCells` is `html::compare_cells`; the tests below hold them together.
const SCRIPT: &str = r#"
function filterTable() {
  var needle = document.getElementById("filterInput").value.toLowerCase();
  var tables = document.getElementsByTagName("table");
  for (var t = 0; t < tables.length; t++) {
    var rows = tables[t].getElementsByTagName("tr");
    for (var i = 1; i < rows.length; i++) {
      var text = rows[i].textContent || rows[i].innerText;
      rows[i].style.display = text.toLowerCase().indexOf(needle) > -1 ? "" : "none";
    }
  }
}

function compareCells(a, b) {
  var x = parseFloat(a), y = parseFloat(b);
  var xNum = !isNaN(x), yNum = !isNaN(y);
  if (xNum && yNum) { return x < y ? -1 : x > y ? 1 : 0; }
  if (xNum) { return -1; }
  if (yNum) { return 1; }
  var la = a.toLowerCase(), lb = b.toLowerCase();
  if (la !== lb) { return la < lb ? -1 : 1; }
  return a < b ? -1 : a > b ? 1 : 0;
}

function sortTable(th) {
  var table = th.closest("table");
  var tbody = table.tBodies[0];
  var column = Array.prototype.indexOf.call(th.parentNode.children, th);
  var ascending = !th.classList.contains("asc");
  var headers = th.parentNode.children;
  for (var h = 0; h < headers.length; h++) { headers[h].classList.remove("asc", "desc"); }
  th.classList.add(ascending ? "asc" : "desc");
  var rows = Array.prototype.slice.call(tbody.rows);
  rows.sort(function (r1, r2) {
    var a = r1.cells[column] ? r1.cells[column].textContent.trim() : "";
    var b = r2.cells[column] ? r2.cells[column].textContent.trim() : "";
    var result = compareCells(a, b);
    return ascending ? result : -result;
  });
  for (var r = 0; r < rows.length; r++) { tbody.appendChild(rows[r]); }
}
"#;

/// Wrap a report body in the standalone page template.
///
/// The filter box is only emitted when the body holds at least one table.
pub fn render_page(title: &str, host_label: &str, body: &str, generated_at: &str) -> String {
    let title = escape(title);
    let mut page = String::with_capacity(body.len() + STYLE.len() + SCRIPT.len() + 1024);

    page.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    page.push_str(&format!("<title>{}</title>\n", title));
    page.push_str(&format!("<style>{}</style>\n", STYLE));
    page.push_str(&format!("<script>{}</script>\n", SCRIPT));
    page.push_str("</head>\n<body>\n");

    page.push_str(&format!("<h1>{}</h1>\n", title));
    page.push_str(&format!(
        "<p class=\"meta\"><strong>Suspect Computer:</strong> {}</p>\n",
        escape(host_label)
    ));
    page.push_str(&format!(
        "<p class=\"meta\"><strong>Report Generated:</strong> {}</p>\n",
        escape(generated_at)
    ));

    if body.contains("<table") {
        page.push_str(
            "<input type=\"text\" id=\"filterInput\" onkeyup=\"filterTable()\" placeholder=\"Filter rows...\">\n",
        );
    }

    page.push_str(body);
    page.push_str(&format!("\n<div class=\"footer\">{}</div>\n", REPORT_FOOTER));
    page.push_str("</body>\n</html>\n");
    page
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::html::{compare_cells, Table};
    use boa_engine::{Context, Source};

    #[test]
    fn test_page_carries_title_host_and_timestamp() {
        let page = render_page("Logon Report", "Test_Computer", "<p>x</p>", "2025-07-25 10:00:00");
        assert!(page.contains("<title>Logon Report</title>"));
        assert!(page.contains("<h1>Logon Report</h1>"));
        assert!(page.contains("Suspect Computer:</strong> Test_Computer"));
        assert!(page.contains("Report Generated:</strong> 2025-07-25 10:00:00"));
        assert!(page.contains(REPORT_FOOTER));
    }

    #[test]
    fn test_filter_box_only_with_tables() {
        let without = render_page("T", "h", "<pre>raw</pre>", "now");
        assert!(!without.contains("id=\"filterInput\""));

        let with = render_page("T", "h", "<table><tbody></tbody></table>", "now");
        assert!(with.contains("id=\"filterInput\""));
    }

    #[test]
    fn test_title_and_host_are_escaped() {
        let page = render_page("System & Hardware", "<evil>", "", "now");
        assert!(page.contains("<h1>System &amp; Hardware</h1>"));
        assert!(page.contains("&lt;evil&gt;"));
    }

    #[test]
    fn test_page_embeds_script() {
        let page = render_page("T", "h", "", "now");
        assert!(page.contains("function sortTable"));
        assert!(page.contains("function filterTable"));
        assert!(page.contains("function compareCells"));
    }

    const MIXED_CELLS: [&str; 18] = [
        "zeta", "10", "9", "Infinity", "-Infinity", "_spotlight", "-b", "Apple", "apple",
        "b", "éclair", "Émile", "f", "N/A", "root", "+3.5e1", "0.5%", "12 KB",
    ];

    /// Sort `cells` with the page's own `compareCells`
    fn sort_in_script(cells: &[&str]) -> Vec<String> {
        let mut context = Context::default();
        context.eval(Source::from_bytes(SCRIPT)).unwrap();

        let code = format!(
            "JSON.stringify({}.sort(compareCells))",
            serde_json::to_string(cells).unwrap()
        );
        let sorted = context.eval(Source::from_bytes(&code)).unwrap();
        let json = sorted.to_string(&mut context).unwrap().to_std_string_escaped();
        serde_json::from_str(&json).unwrap()
    }

    #[test]
    fn test_script_sorts_like_compare_cells() {
        let mut expected: Vec<&str> = MIXED_CELLS.to_vec();
        expected.sort_by(|a, b| compare_cells(a, b));

        assert_eq!(sort_in_script(&MIXED_CELLS), expected);
        assert_eq!(
            expected,
            [
                "-Infinity", "0.5%", "9", "10", "12 KB", "+3.5e1", "Infinity", "-b",
                "_spotlight", "Apple", "apple", "b", "f", "N/A", "root", "zeta", "éclair", "Émile",
            ]
        );
    }

    #[test]
    fn test_script_sorts_like_table() {
        let mut table = Table::new(["Value"]);
        for cell in MIXED_CELLS {
            table.add_row([cell]);
        }
        table.sort_by_column(0);

        let html = table.render();
        let rendered: Vec<String> = html
            .split("<td>")
            .skip(1)
            .filter_map(|rest| rest.split("</td>").next())
            .map(str::to_string)
            .collect();
        assert_eq!(sort_in_script(&MIXED_CELLS), rendered);
    }

    #[test]
    fn test_script_treats_infinity_as_number() {
        assert_eq!(sort_in_script(&["N/A", "Infinity", "5"]), ["5", "Infinity", "N/A"]);
        assert_eq!(sort_in_script(&["Infinity", "-Infinity"]), ["-Infinity", "Infinity"]);
    }
}
