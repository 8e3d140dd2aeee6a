//! HTML pages, embedded into the binary at compile time using
//! [`rust-embed`](rust_embed) and rendered with [`upon`].

use crate::error::{ErrorKind, Result};
use exn::{OptionExt, ResultExt};
use rust_embed::Embed;
use serde::Serialize;
use std::fmt::Write;
use upon::Engine;

pub(crate) const INDEX: &str = "index.html";
pub(crate) const DOWNLOAD: &str = "download.html";

#[derive(Embed)]
#[folder = "../../assets/templates/"]
struct Templates;

/// Compiled page templates.
pub struct Pages {
    engine: Engine<'static>,
}
impl Pages {
    pub fn new() -> Result<Self> {
        let mut engine = Engine::new();
        engine.set_default_formatter(&escape_html);
        for name in [INDEX, DOWNLOAD] {
            let file = Templates::get(name).ok_or_raise(|| ErrorKind::AssetNotFound(name.to_string()))?;
            let source = String::from_utf8(file.data.into_owned()).or_raise(|| ErrorKind::Template(name.to_string()))?;
            engine.add_template(name, source).or_raise(|| ErrorKind::Template(name.to_string()))?;
        }
        Ok(Self { engine })
    }

    pub fn render(&self, name: &str, context: impl Serialize) -> Result<String> {
        let template = self.engine.get_template(name).ok_or_raise(|| ErrorKind::AssetNotFound(name.to_string()))?;
        template.render(context).to_string().or_raise(|| ErrorKind::Template(name.to_string()))
    }
}

/// Escapes strings for HTML text and attribute values.
fn escape_html(f: &mut upon::fmt::Formatter<'_>, value: &upon::Value) -> upon::fmt::Result {
    let upon::Value::String(s) = value else {
        return upon::fmt::default(f, value);
    };
    for c in s.chars() {
        match c {
            '&' => f.write_str("&amp;")?,
            '<' => f.write_str("&lt;")?,
            '>' => f.write_str("&gt;")?,
            '"' => f.write_str("&quot;")?,
            '\'' => f.write_str("&#39;")?,
            c => f.write_char(c)?,
        }
    }
    Ok(())
}
