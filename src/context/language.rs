//! Language detection for incoming requests.
//!
//! Resolution order: an explicit label from the client wins, then the
//! filename extension, then ordered heuristics over the code snippet.
//! Always returns a label; `text` is the fallback.

use once_cell::sync::Lazy;
use regex::Regex;

/// Label returned when nothing else matches.
const FALLBACK_LABEL: &str = "text";

/// Extension → label table. Labels double as fence tags, so they are the
/// lowercase identifiers highlighters understand.
const EXTENSION_LABELS: &[(&str, &str)] = &[
    ("py", "python"),
    ("js", "javascript"),
    ("ts", "typescript"),
    ("jsx", "jsx"),
    ("tsx", "tsx"),
    ("html", "html"),
    ("css", "css"),
    ("java", "java"),
    ("cpp", "cpp"),
    ("cc", "cpp"),
    ("c", "c"),
    ("cs", "csharp"),
    ("go", "go"),
    ("rb", "ruby"),
    ("php", "php"),
    ("swift", "swift"),
    ("kt", "kotlin"),
    ("rs", "rust"),
    ("scala", "scala"),
    ("sh", "shell"),
    ("sql", "sql"),
    ("md", "markdown"),
    ("json", "json"),
    ("xml", "xml"),
    ("yaml", "yaml"),
    ("yml", "yaml"),
    ("toml", "toml"),
];

/// Markers that upgrade a javascript heuristic match to jsx.
const REACT_MARKERS: &[&str] = &["React", "ReactDOM", "useState", "useEffect"];

static HTML_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<[a-zA-Z][a-zA-Z0-9]*(\s[^<>]*)?>").unwrap());

// A `prop: value` pair inside braces, e.g. `body { color: red }`.
static CSS_BLOCK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{[^{}]*:[^{}]*\}").unwrap());

/// Resolve a language label from the request fields.
///
/// Pure and total: any combination of inputs produces a label.
pub fn detect_language(explicit: &str, filename: &str, snippet: &str) -> String {
    let explicit = explicit.trim();
    if !explicit.is_empty() {
        return explicit.to_lowercase();
    }
    if let Some(label) = label_from_extension(filename) {
        return label.to_string();
    }
    label_from_snippet(snippet).to_string()
}

/// `true` when the label is one the detector can produce.
pub(crate) fn is_known_label(label: &str) -> bool {
    label == FALLBACK_LABEL || EXTENSION_LABELS.iter().any(|(_, l)| *l == label)
}

fn label_from_extension(filename: &str) -> Option<&'static str> {
    let (_, ext) = filename.rsplit_once('.')?;
    let ext = ext.to_lowercase();
    EXTENSION_LABELS
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, label)| *label)
}

fn label_from_snippet(snippet: &str) -> &'static str {
    if snippet.contains("def ") && snippet.contains(':') {
        return "python";
    }
    if snippet.contains("function") && snippet.contains('{') {
        if REACT_MARKERS.iter().any(|m| snippet.contains(m)) {
            return "jsx";
        }
        return "javascript";
    }
    if snippet.contains("interface ") || snippet.contains("type ") {
        return "typescript";
    }
    if HTML_TAG_RE.is_match(snippet) {
        return "html";
    }
    if snippet.contains("@media") || CSS_BLOCK_RE.is_match(snippet) {
        return "css";
    }
    FALLBACK_LABEL
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_lookup() {
        assert_eq!(detect_language("", "foo.rs", ""), "rust");
        assert_eq!(detect_language("", "app.PY", ""), "python");
        assert_eq!(detect_language("", "component.tsx", ""), "tsx");
    }

    #[test]
    fn test_explicit_wins_over_extension() {
        assert_eq!(detect_language("Go", "foo.rs", ""), "go");
        assert_eq!(detect_language("  Rust  ", "foo.py", ""), "rust");
    }

    #[test]
    fn test_unknown_extension_falls_through_to_snippet() {
        assert_eq!(detect_language("", "noext", "def f():"), "python");
        assert_eq!(detect_language("", "notes.xyz", "def f():\n    pass"), "python");
    }

    #[test]
    fn test_javascript_heuristic() {
        let snippet = "function add(a, b) {\n  return a + b;\n}";
        assert_eq!(detect_language("", "", snippet), "javascript");
    }

    #[test]
    fn test_jsx_upgrade_on_react_markers() {
        let snippet = "function App() {\n  const [n, setN] = useState(0);\n}";
        assert_eq!(detect_language("", "", snippet), "jsx");
    }

    #[test]
    fn test_typescript_heuristic() {
        assert_eq!(
            detect_language("", "", "interface User { name: string }"),
            "typescript"
        );
        assert_eq!(detect_language("", "", "type Result = string"), "typescript");
    }

    #[test]
    fn test_html_heuristic() {
        assert_eq!(detect_language("", "", "<div class=\"box\">hello</div>"), "html");
    }

    #[test]
    fn test_css_heuristic() {
        assert_eq!(detect_language("", "", "body { color: red }"), "css");
        assert_eq!(detect_language("", "", "@media screen and (max-width: 100px)"), "css");
    }

    #[test]
    fn test_fallback_is_text() {
        assert_eq!(detect_language("", "", "plain prose with no code"), "text");
        assert_eq!(detect_language("", "", ""), "text");
    }

    #[test]
    fn test_known_labels() {
        assert!(is_known_label("python"));
        assert!(is_known_label("text"));
        assert!(!is_known_label("klingon"));
    }
}
