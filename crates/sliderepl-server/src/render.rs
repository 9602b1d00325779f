//! HTML rendering for the editor page, program output, and static export.

use std::fmt::Write;

use sliderepl_core::{Neighbors, SlideDeck};

/// Escape text for inclusion in HTML element content or attribute values.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Program output wrapped in an escaped `<pre>` block.
pub fn output_fragment(output: &[u8]) -> String {
    format!("<pre>{}</pre>", escape_html(&String::from_utf8_lossy(output)))
}

/// Data shown on the editor page.
#[derive(Debug, Clone, Copy)]
pub struct FrontPage<'a> {
    /// Editor contents.
    pub contents: &'a str,
    /// Speaker notes.
    pub notes: &'a str,
    /// Navigation targets.
    pub neighbors: Neighbors,
}

impl FrontPage<'_> {
    /// Render the full editor page.
    pub fn render(&self) -> String {
        let contents = escape_html(self.contents);
        let notes = escape_html(self.notes);
        let prev = self.neighbors.prev.to_string();
        let next = self.neighbors.next.to_string();

        fill(
            FRONT_PAGE,
            &[
                ("contents", contents.as_str()),
                ("notes", notes.as_str()),
                ("prev", prev.as_str()),
                ("next", next.as_str()),
            ],
        )
    }
}

/// Render every slide into one self-contained page.
pub fn static_page(deck: &SlideDeck) -> String {
    let mut slides = String::new();
    let mut notes = String::new();

    for (i, slide) in deck.iter().enumerate() {
        let _ = writeln!(
            slides,
            r#"<tr class="slide" id="slide_{i}"><td><pre>{}</pre></td></tr>"#,
            escape_html(&slide.contents)
        );
        let _ = writeln!(
            notes,
            r#"<tr class="notes" id="notes_{i}"><td><pre>{}</pre></td></tr>"#,
            escape_html(&slide.notes)
        );
    }

    fill(
        STATIC_PAGE,
        &[("slides", slides.as_str()), ("notes", notes.as_str())],
    )
}

/// Substitute `{{key}}` placeholders in one pass, so substituted text is
/// never itself scanned for placeholders. Unknown keys are left as-is.
fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };

        let key = &after[..end];
        match values.iter().find(|(k, _)| *k == key) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[start..start + 2 + end + 2]),
        }
        rest = &after[end + 2..];
    }

    out.push_str(rest);
    out
}

const FRONT_PAGE: &str = r#"<!doctype html>
<html>
<head>
<meta charset="utf-8">
<title>sliderepl</title>
<style>
pre, textarea, #notes {
	font-family: Monaco, 'Courier New', 'DejaVu Sans Mono', monospace;
}
#notes { font-size: 50%; }
.hints { font-size: 0.8em; text-align: right; }
#edit, #output, #errors { width: 100%; text-align: left; }
#edit { height: 500px; font-size: 100%; }
#output { color: #00c; }
#errors { color: #c00; }
</style>
<script>
function insertTabs(el, n) {
	var start = el.selectionStart, end = el.selectionEnd;
	el.value = el.value.substr(0, start) + "\t".repeat(n) + el.value.substr(end);
	el.selectionStart = el.selectionEnd = start + n;
}

function currentIndent(el) {
	var line = el.value.substr(0, el.selectionStart).split("\n").pop();
	return line.length - line.replace(/^\t+/, "").length;
}

function keyHandler(e) {
	if (e.key === "Tab") {
		insertTabs(e.target, 1);
		e.preventDefault();
	} else if (e.key === "Enter" && e.shiftKey) {
		compile();
		e.preventDefault();
	} else if (e.key === "Enter") {
		var tabs = currentIndent(e.target);
		setTimeout(function() { insertTabs(e.target, tabs); }, 1);
	}
}

function autocompile() {
	if (document.getElementById("autocompile").checked) {
		compile();
	}
}

var pending;

function compile() {
	var req = new XMLHttpRequest();
	pending = req;
	req.onreadystatechange = function() {
		if (req !== pending || req.readyState !== 4) {
			return;
		}
		var ok = req.status === 200;
		document.getElementById("output").innerHTML = ok ? req.responseText : "";
		document.getElementById("errors").innerHTML = ok ? "" : req.responseText;
	};
	req.open("POST", "/compile", true);
	req.setRequestHeader("Content-Type", "text/plain; charset=utf-8");
	req.send(document.getElementById("edit").value);
}

function showNotes(visible) {
	document.getElementById("notes").style.display = visible ? "" : "none";
	document.getElementById("noteButton").innerHTML = visible ? "Hide notes" : "Show notes";
	document.cookie = visible ? "notes=true" : "notes=";
}

function toggleNotes() {
	showNotes(document.getElementById("notes").style.display === "none");
}

window.onload = function() {
	showNotes(document.cookie.indexOf("notes=true") >= 0);
};
</script>
</head>
<body>
<table width="100%"><tr>
<td width="60%" valign="top">
<textarea autofocus id="edit" spellcheck="false" onkeydown="keyHandler(event)" onkeyup="autocompile()">{{contents}}</textarea>
<div class="hints">
(Shift-Enter to compile and run.)&nbsp;&nbsp;
<input type="checkbox" id="autocompile"> Compile and run after each keystroke
<button id="noteButton" onclick="toggleNotes()">Hide notes</button>
<button onclick="window.location.href = '/?s={{prev}}'">Previous</button>
<button onclick="window.location.href = '/?s={{next}}'">Next</button>
</div>
</td>
<td width="3%"></td>
<td width="37%" valign="top"><div id="output"></div></td>
</tr></table>
<div id="errors"></div>
<div id="notes">{{notes}}</div>
</body>
</html>
"#;

const STATIC_PAGE: &str = r#"<!doctype html>
<html>
<head>
<meta charset="utf-8">
<title>sliderepl</title>
<style>
.slide pre, .notes pre {
	font-family: Monaco, 'Courier New', 'DejaVu Sans Mono', monospace;
}
.slide td { border: 1px solid black; height: 400px; }
.controls td { height: 20px; }
.notes td { height: 80px; }
td { width: 800px; vertical-align: text-top; padding: 10px; }
</style>
<script>
var current = 0;
var notesShown = false;

function display() {
	var count = document.getElementsByClassName("slide").length;
	current = Math.max(0, Math.min(current, count - 1));
	for (var i = 0; i < count; i++) {
		var active = i === current;
		document.getElementById("slide_" + i).style.display = active ? "" : "none";
		document.getElementById("notes_" + i).style.display = active && notesShown ? "" : "none";
	}
}

function move(delta) {
	current += delta;
	display();
}

function toggleNotes() {
	notesShown = !notesShown;
	document.cookie = notesShown ? "notes=true" : "notes=";
	document.getElementById("noteButton").innerHTML = notesShown ? "Hide notes" : "Show notes";
	display();
}

window.onload = function() {
	if (document.cookie.indexOf("notes=true") >= 0) {
		toggleNotes();
	}
	display();
};
</script>
</head>
<body>
<table>
{{slides}}<tr class="controls"><td>
<button id="noteButton" onclick="toggleNotes()">Show notes</button>
<button onclick="move(-1)">Previous</button>
<button onclick="move(1)">Next</button>
</td></tr>
{{notes}}</table>
</body>
</html>
"#;
