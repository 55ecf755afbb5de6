//! Template rendering against a closed binding context
//!
//! Scanned segments are compiled into a Lua chunk that accumulates the
//! output, then evaluated in a fresh Lua state holding nothing but the
//! caller's bindings and the string/table/math libraries. Every lookup of a
//! name that was not bound raises, so a typo in a template fails instead of
//! interpolating nothing.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use mlua::{Lua, LuaOptions, LuaSerdeExt, SerializeOptions, StdLib};
use thiserror::Error;
use tracing::debug;

use crate::scan::{scan, ScanError, Segment};

/// Named values exposed to a template.
///
/// This is the entire world a template can see. Values are YAML values and
/// become Lua tables/scalars at render time.
#[derive(Debug, Clone, Default)]
pub struct Bindings {
    values: BTreeMap<String, serde_yaml::Value>,
}

impl Bindings {
    /// Create an empty binding set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `value` under `name`.
    pub fn set(&mut self, name: impl Into<String>, value: serde_yaml::Value) {
        self.values.insert(name.into(), value);
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, name: impl Into<String>, value: serde_yaml::Value) -> Self {
        self.set(name, value);
        self
    }

    /// Check whether any bindings are present.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn iter(&self) -> impl Iterator<Item = (&String, &serde_yaml::Value)> {
        self.values.iter()
    }
}

/// Errors that can occur while rendering a template.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("scan failed: {0}")]
    Scan(#[from] ScanError),

    #[error("evaluation failed: {0}")]
    Eval(#[from] mlua::Error),
}

/// Render template `source` against `bindings`.
///
/// `name` labels the template in evaluation errors. Each call evaluates in
/// its own Lua state, so no state carries over between templates and nothing
/// from the surrounding process is visible inside one.
pub fn render(name: &str, source: &str, bindings: &Bindings) -> Result<String, RenderError> {
    let segments = scan(source)?;
    let chunk = compile(&segments);
    debug!(template = name, segments = segments.len(), "template compiled");

    let lua = Lua::new_with(
        StdLib::STRING | StdLib::TABLE | StdLib::MATH,
        LuaOptions::default(),
    )?;

    // Nulls become real Lua nil (not a null sentinel), so a template that
    // interpolates an explicitly-null value fails like any other nil.
    let options = SerializeOptions::new()
        .serialize_none_to_null(false)
        .serialize_unit_to_null(false);

    let globals = lua.globals();
    for (binding, value) in bindings.iter() {
        globals.set(binding.as_str(), lua.to_value_with(value, options)?)?;
    }

    let rendered = lua.load(chunk.as_str()).set_name(name).eval::<String>()?;
    Ok(rendered)
}

/// Compile segments into a Lua chunk that builds the output string.
///
/// The prelude locks the global table: reading an unbound name raises
/// instead of yielding nil. Expressions that do evaluate to nil raise too,
/// naming the expression, so a missing value never interpolates silently.
fn compile(segments: &[Segment]) -> String {
    let mut chunk = String::from(
        "setmetatable(_G, { __index = function(_, name)\n\
         \x20 error(\"undefined template variable '\" .. tostring(name) .. \"'\", 0)\n\
         end })\n\
         local _out = {}\n\
         local _v\n",
    );

    for segment in segments {
        match segment {
            Segment::Literal(text) => {
                let _ = writeln!(chunk, "_out[#_out + 1] = {}", lua_quote(text));
            }
            Segment::Expr(expr) => {
                let _ = writeln!(chunk, "_v = ({expr})");
                let _ = writeln!(
                    chunk,
                    "if _v == nil then error(\"template expression evaluated to nil: \" .. {}, 0) end",
                    lua_quote(expr)
                );
                chunk.push_str("_out[#_out + 1] = tostring(_v)\n");
            }
            Segment::Code(code) => {
                let _ = writeln!(chunk, "{code}");
            }
        }
    }

    chunk.push_str("return table.concat(_out)\n");
    chunk
}

/// Quote arbitrary text as a Lua string literal.
fn lua_quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for ch in text.chars() {
        match ch {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\0' => quoted.push_str("\\0"),
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}
