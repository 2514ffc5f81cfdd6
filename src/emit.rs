//! Status line serialization
//!
//! One JSON object per cycle, one line each (JSON Lines), in the shape
//! status bars such as waybar read from a custom module:
//!
//! ```json
//! {"text":"red","tooltip":[{"name":"api","state":"dirty"},{"name":"web","state":"clean"}]}
//! {"text":"red","class":"red","tooltip":"api: dirty\nweb: clean"}
//! ```
//!
//! The first form is `TooltipStyle::List`. `Text` and `Markup` render the
//! tooltip as a string and add a `class` field mirroring `text`.

use std::io::Write;

use clap::ValueEnum;
use serde::Serialize;

use crate::aggregate::Severity;
use crate::error::Result;
use crate::poller::RepoState;
use crate::status::State;

/// How the tooltip field is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum TooltipStyle {
    /// Array of `{name, state}` objects
    #[default]
    List,
    /// Newline-joined `name: state` pairs
    Text,
    /// Like `text`, with Pango color markup around each state
    Markup,
}

#[derive(Serialize)]
struct StatusLine<'a> {
    text: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    class: Option<Severity>,
    tooltip: Tooltip<'a>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Tooltip<'a> {
    List(&'a [RepoState]),
    Text(String),
}

/// Render one status line, without the trailing newline
pub fn format_line(style: TooltipStyle, severity: Severity, states: &[RepoState]) -> Result<String> {
    let line = match style {
        TooltipStyle::List => StatusLine {
            text: severity,
            class: None,
            tooltip: Tooltip::List(states),
        },
        TooltipStyle::Text => StatusLine {
            text: severity,
            class: Some(severity),
            tooltip: Tooltip::Text(text_tooltip(states, false)),
        },
        TooltipStyle::Markup => StatusLine {
            text: severity,
            class: Some(severity),
            tooltip: Tooltip::Text(text_tooltip(states, true)),
        },
    };
    Ok(serde_json::to_string(&line)?)
}

fn text_tooltip(states: &[RepoState], markup: bool) -> String {
    states
        .iter()
        .map(|s| {
            if markup {
                format!(
                    "{}: <span color='{}'>{}</span>",
                    escape_markup(&s.name),
                    state_color(s.state),
                    s.state
                )
            } else {
                format!("{}: {}", s.name, s.state)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn state_color(state: State) -> &'static str {
    match state {
        State::Clean => "#a6e3a1",
        State::Dirty => "#f38ba8",
        State::Ahead => "#f9e2af",
        State::Behind => "#89b4fa",
        State::Error => "#9399b2",
    }
}

fn escape_markup(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\'' => out.push_str("&apos;"),
            '"' => out.push_str("&quot;"),
            other => out.push(other),
        }
    }
    out
}

/// Writes status lines to a sink, flushing after each one
pub struct Emitter<W: Write> {
    sink: W,
    style: TooltipStyle,
}

impl<W: Write> Emitter<W> {
    pub fn new(sink: W, style: TooltipStyle) -> Self {
        Self { sink, style }
    }

    pub fn style(&self) -> TooltipStyle {
        self.style
    }

    /// Serialize and write one line.
    ///
    /// Nothing is written if serialization fails.
    pub fn emit(&mut self, severity: Severity, states: &[RepoState]) -> Result<()> {
        let line = format_line(self.style, severity, states)?;
        writeln!(self.sink, "{}", line)?;
        self.sink.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.sink
    }
}
