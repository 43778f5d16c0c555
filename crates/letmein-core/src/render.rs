// ── Rule template rendering ──
//
// Create-flow payloads come from a Handlebars template with four
// variables: `{{AppId}}`, `{{DPID}}`, `{{VlanId}}` and `{{InPort}}`.
// Rendering is plain text substitution; the wire format is whatever the
// template file contains. Strict mode makes an unknown variable an error
// instead of an empty string. Existing `create.tmpl` files written for the
// Go service use `{{.VlanId}}`; those field tags are rewritten to the
// Handlebars form before parsing.

use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use bytes::Bytes;
use handlebars::Handlebars;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::model::{DeviceId, PortId, VlanId};

const TEMPLATE_NAME: &str = "create-flow";

/// Rendering failure. Cloneable so that one template load failure can be
/// reported against every VLAN waiting on it.
#[derive(Debug, Clone, Error)]
pub enum RenderError {
    #[error("unable to read rule template '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: Arc<std::io::Error>,
    },

    #[error("unable to parse rule template: {0}")]
    Syntax(#[source] Arc<handlebars::TemplateError>),

    #[error("unable to execute rule template: {0}")]
    Substitution(#[source] Arc<handlebars::RenderError>),

    #[error("rendered rule is not valid JSON: {0}")]
    Validation(#[source] Arc<serde_json::Error>),
}

/// Values substituted into the rule template.
#[derive(Debug, Clone, Serialize)]
pub struct RuleData<'a> {
    #[serde(rename = "AppId")]
    pub app_id: &'a str,
    #[serde(rename = "DPID")]
    pub dpid: &'a DeviceId,
    #[serde(rename = "VlanId")]
    pub vlan_id: &'a VlanId,
    #[serde(rename = "InPort")]
    pub in_port: &'a PortId,
}

/// A parsed rule template.
pub struct RuleTemplate {
    registry: Handlebars<'static>,
}

impl std::fmt::Debug for RuleTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleTemplate").finish_non_exhaustive()
    }
}

impl RuleTemplate {
    /// Read and parse the template at `path`.
    pub fn load(path: &Path) -> Result<Self, RenderError> {
        let source = std::fs::read_to_string(path).map_err(|source| RenderError::Read {
            path: path.to_path_buf(),
            source: Arc::new(source),
        })?;
        Self::from_source(&source)
    }

    pub fn from_source(source: &str) -> Result<Self, RenderError> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry.register_escape_fn(handlebars::no_escape);
        registry
            .register_template_string(TEMPLATE_NAME, translate_dot_fields(source))
            .map_err(|e| RenderError::Syntax(Arc::new(e)))?;
        Ok(Self { registry })
    }

    /// Substitute `data` into the template.
    pub fn render(&self, data: &RuleData<'_>) -> Result<Bytes, RenderError> {
        self.registry
            .render(TEMPLATE_NAME, data)
            .map(Bytes::from)
            .map_err(|e| RenderError::Substitution(Arc::new(e)))
    }
}

/// Rewrite `{{ .Name }}` field tags to `{{Name}}`. Go's `{{- ` and ` -}}`
/// whitespace trimming becomes `~`. Anything else is left alone.
fn translate_dot_fields(source: &str) -> Cow<'_, str> {
    if !source.contains("{{") {
        return Cow::Borrowed(source);
    }
    let mut out = String::with_capacity(source.len());
    let mut rest = source;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        if let Some((tag, len)) = dot_field(tail) {
            out.push_str(&tag);
            rest = &tail[len..];
        } else {
            out.push_str("{{");
            rest = &tail[2..];
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

/// A Go field tag at the start of `s`: its Handlebars form and its length.
fn dot_field(s: &str) -> Option<(String, usize)> {
    let end = s.find("}}")?;
    let mut inner = &s[2..end];
    let trim_left = inner.starts_with("- ");
    if trim_left {
        inner = &inner[1..];
    }
    let trim_right = inner.ends_with(" -");
    if trim_right {
        inner = &inner[..inner.len() - 1];
    }
    let name = inner.trim().strip_prefix('.')?;
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return None;
    }
    let tag = format!(
        "{{{{{}{name}{}}}}}",
        if trim_left { "~" } else { "" },
        if trim_right { "~" } else { "" },
    );
    Some((tag, end + 2))
}

/// Parse a rendered payload as a JSON document.
pub fn validate(payload: &[u8]) -> Result<Value, RenderError> {
    serde_json::from_slice(payload).map_err(|e| RenderError::Validation(Arc::new(e)))
}
