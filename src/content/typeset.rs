//! Math typesetting (best-effort)
//!
//! A post-pass over rendered markup that handles `$...$` inline and
//! `$$...$$` display math. With a KaTeX bundle configured, expressions are
//! rendered server-side through QuickJS; without one they are wrapped in
//! spans for a client-side pass. Failures never affect the primary
//! content: the expression is left as written and a warning is logged.

use lazy_static::lazy_static;
use quick_js::{Context, JsValue};
use regex::{Captures, Regex};
use std::fs;

use crate::config::TypesetConfig;

lazy_static! {
    static ref PRE_BLOCK: Regex = Regex::new(r"(?s)<pre.*?</pre>").unwrap();
    static ref DISPLAY_MATH: Regex = Regex::new(r"(?s)\$\$([^$]+)\$\$").unwrap();
    static ref INLINE_MATH: Regex = Regex::new(r"\$([^$\n]+)\$").unwrap();
}

/// Best-effort math typesetter.
pub struct Typesetter {
    enable: bool,
    engine: Option<KatexEngine>,
}

impl Typesetter {
    pub fn new(config: &TypesetConfig) -> Self {
        if !config.enable {
            return Self {
                enable: false,
                engine: None,
            };
        }

        let engine = config.katex_path.as_deref().and_then(|path| {
            match KatexEngine::load(path) {
                Ok(engine) => Some(engine),
                Err(e) => {
                    tracing::warn!("katex unavailable ({}), falling back to span wrapping", e);
                    None
                }
            }
        });

        Self {
            enable: true,
            engine,
        }
    }

    /// Typeset math in a rendered document. Code blocks are left alone.
    pub fn typeset(&self, html: &str) -> String {
        if !self.enable || !html.contains('$') {
            return html.to_string();
        }

        // Process only the text between <pre> blocks; dollar signs in code
        // samples are not math.
        let mut out = String::with_capacity(html.len());
        let mut last = 0;
        for m in PRE_BLOCK.find_iter(html) {
            out.push_str(&self.typeset_segment(&html[last..m.start()]));
            out.push_str(m.as_str());
            last = m.end();
        }
        out.push_str(&self.typeset_segment(&html[last..]));
        out
    }

    fn typeset_segment(&self, segment: &str) -> String {
        let displayed = DISPLAY_MATH.replace_all(segment, |caps: &Captures| {
            self.render_expr(caps[1].trim(), true)
        });
        INLINE_MATH
            .replace_all(&displayed, |caps: &Captures| {
                self.render_expr(caps[1].trim(), false)
            })
            .into_owned()
    }

    fn render_expr(&self, latex: &str, display: bool) -> String {
        if let Some(engine) = &self.engine {
            match engine.render(latex, display) {
                Ok(html) => return html,
                Err(e) => {
                    tracing::warn!("katex failed on {:?}: {}", latex, e);
                }
            }
        }

        // Client-side fallback. Bracket delimiters rather than dollars so
        // the inline pass cannot re-match inside an already wrapped
        // expression.
        if display {
            format!(r#"<span class="math display">\[{}\]</span>"#, latex)
        } else {
            format!(r#"<span class="math inline">\({}\)</span>"#, latex)
        }
    }
}

/// KaTeX running inside QuickJS.
struct KatexEngine {
    context: Context,
}

impl KatexEngine {
    /// Load a katex.js bundle into a fresh JS context.
    fn load(path: &str) -> Result<Self, String> {
        let src = fs::read_to_string(path).map_err(|e| format!("read {}: {}", path, e))?;
        let context =
            Context::new().map_err(|e| format!("failed to create JS context: {:?}", e))?;
        context
            .eval(&src)
            .map_err(|e| format!("failed to evaluate katex bundle: {:?}", e))?;
        // Make sure the global actually exists before claiming success.
        context
            .eval("if (typeof katex === 'undefined') throw new Error('no katex global');")
            .map_err(|e| format!("katex global missing: {:?}", e))?;
        Ok(Self { context })
    }

    fn render(&self, latex: &str, display: bool) -> Result<String, String> {
        let escaped = serde_json::to_string(latex).map_err(|e| e.to_string())?;
        let code = format!(
            "katex.renderToString({}, {{ displayMode: {}, throwOnError: false }})",
            escaped, display
        );
        match self.context.eval(&code) {
            Ok(JsValue::String(html)) => Ok(html),
            Ok(other) => Err(format!("unexpected katex result: {:?}", other)),
            Err(e) => Err(format!("{:?}", e)),
        }
    }
}
