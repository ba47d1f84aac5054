//! Builds `function(args...);` snippets for `WebviewWindow::eval`.

use serde_json::Value;

/// Renders a call to `function_name` with `args` encoded as JavaScript
/// literals. Strings travel percent-encoded and are decoded in the page, so
/// quotes or line breaks in them cannot escape the literal.
pub fn build_call(function_name: &str, args: &[Value]) -> String {
    let args = args.iter().map(encode_arg).collect::<Vec<_>>().join(", ");
    format!("{function_name}({args});")
}

pub fn encode_arg(arg: &Value) -> String {
    match arg {
        Value::String(s) => format!("decodeURIComponent('{}')", urlencoding::encode(s)),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Null => "null".to_string(),
        compound => compound.to_string(),
    }
}

/// Wraps `script` so it runs once the DOM of every loaded page is ready.
pub fn on_dom_ready(script: &str) -> String {
    format!(
        "(function () {{\n  const run = function () {{ {script} }};\n  if (document.readyState === 'loading') {{\n    document.addEventListener('DOMContentLoaded', run);\n  }} else {{\n    run();\n  }}\n}})();"
    )
}

/// Script painting the page body with `css`.
pub fn body_background(css: &str) -> String {
    let css = Value::String(css.to_string());
    format!("document.body.style.background = {};", encode_arg(&css))
}
