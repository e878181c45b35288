//! The render model every panel produces.
//!
//! A [`Panel`] is either a placeholder message or a list of [`Section`]s
//! holding [`Item`]s. Front ends walk the structure (or its JSON form);
//! the [`std::fmt::Display`] impl gives a plain-text rendering for
//! terminals.

use std::fmt;

use serde::Serialize;

use crate::color::ColorToken;

const BAR_WIDTH: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Panel {
    pub title: String,
    pub body: PanelBody,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "content", rename_all = "snake_case")]
pub enum PanelBody {
    /// Shown while the panel's data is absent.
    Placeholder(String),
    Sections(Vec<Section>),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Section {
    pub heading: Option<String>,
    pub items: Vec<Item>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Item {
    Field {
        label: String,
        value: String,
    },
    Badge {
        text: String,
        color: ColorToken,
    },
    /// A coloured value, e.g. a change arrow.
    Indicator {
        label: String,
        text: String,
        color: ColorToken,
    },
    Bar {
        label: String,
        /// 0-100; values outside are clamped when drawn.
        percent: f64,
        color: ColorToken,
    },
    Button {
        label: String,
        enabled: bool,
    },
    Select {
        label: String,
        options: Vec<String>,
        selected: Option<String>,
    },
    Tabs {
        labels: Vec<String>,
        active: usize,
    },
    Text {
        text: String,
    },
}

impl Panel {
    #[must_use]
    pub fn placeholder(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: PanelBody::Placeholder(message.into()),
        }
    }

    #[must_use]
    pub fn new(title: impl Into<String>, sections: Vec<Section>) -> Self {
        Self {
            title: title.into(),
            body: PanelBody::Sections(sections),
        }
    }

    #[must_use]
    pub const fn is_placeholder(&self) -> bool {
        matches!(self.body, PanelBody::Placeholder(_))
    }

    /// Every item in every section, in order.
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        let sections: &[Section] = match &self.body {
            PanelBody::Placeholder(_) => &[],
            PanelBody::Sections(sections) => sections,
        };
        sections.iter().flat_map(|section| section.items.iter())
    }

    #[must_use]
    pub fn section(&self, heading: &str) -> Option<&Section> {
        match &self.body {
            PanelBody::Placeholder(_) => None,
            PanelBody::Sections(sections) => sections
                .iter()
                .find(|section| section.heading.as_deref() == Some(heading)),
        }
    }

    /// The first badge, if any.
    #[must_use]
    pub fn badge(&self) -> Option<(&str, ColorToken)> {
        self.items().find_map(|item| match item {
            Item::Badge { text, color } => Some((text.as_str(), *color)),
            _ => None,
        })
    }

    #[must_use]
    pub fn button(&self, label: &str) -> Option<bool> {
        self.items().find_map(|item| match item {
            Item::Button {
                label: button,
                enabled,
            } if button == label => Some(*enabled),
            _ => None,
        })
    }

    #[must_use]
    pub fn field(&self, label: &str) -> Option<&str> {
        self.items().find_map(|item| match item {
            Item::Field {
                label: field,
                value,
            } if field == label => Some(value.as_str()),
            _ => None,
        })
    }
}

impl Section {
    #[must_use]
    pub fn new(heading: impl Into<String>) -> Self {
        Self {
            heading: Some(heading.into()),
            items: Vec::new(),
        }
    }

    #[must_use]
    pub const fn untitled() -> Self {
        Self {
            heading: None,
            items: Vec::new(),
        }
    }

    #[must_use]
    pub fn push(mut self, item: Item) -> Self {
        self.items.push(item);
        self
    }

    #[must_use]
    pub fn field(self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(Item::Field {
            label: label.into(),
            value: value.into(),
        })
    }

    #[must_use]
    pub fn badge(self, text: impl Into<String>, color: ColorToken) -> Self {
        self.push(Item::Badge {
            text: text.into(),
            color,
        })
    }

    #[must_use]
    pub fn indicator(
        self,
        label: impl Into<String>,
        text: impl Into<String>,
        color: ColorToken,
    ) -> Self {
        self.push(Item::Indicator {
            label: label.into(),
            text: text.into(),
            color,
        })
    }

    #[must_use]
    pub fn bar(self, label: impl Into<String>, percent: f64, color: ColorToken) -> Self {
        self.push(Item::Bar {
            label: label.into(),
            percent,
            color,
        })
    }

    #[must_use]
    pub fn button(self, label: impl Into<String>, enabled: bool) -> Self {
        self.push(Item::Button {
            label: label.into(),
            enabled,
        })
    }

    #[must_use]
    pub fn text(self, text: impl Into<String>) -> Self {
        self.push(Item::Text { text: text.into() })
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// `↑9.5%`, `↓5.0%` or `0.0%`.
#[must_use]
pub fn arrow_pct(change: f64) -> String {
    let arrow = if change > 0.0 {
        "↑"
    } else if change < 0.0 {
        "↓"
    } else {
        ""
    };
    format!("{arrow}{:.1}%", change.abs())
}

fn draw_bar(percent: f64) -> String {
    let clamped = percent.clamp(0.0, 100.0);
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let filled = ((clamped / 100.0) * BAR_WIDTH as f64).round() as usize;
    format!("{}{}", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field { label, value } => write!(f, "{label}: {value}"),
            Self::Badge { text, .. } => write!(f, "[{text}]"),
            Self::Indicator { label, text, .. } => write!(f, "{label}  {text}"),
            Self::Bar {
                label, percent, ..
            } => write!(f, "{label:<22} [{}] {percent:.1}%", draw_bar(*percent)),
            Self::Button { label, enabled } => {
                if *enabled {
                    write!(f, "< {label} >")
                } else {
                    write!(f, "< {label} > (disabled)")
                }
            }
            Self::Select {
                label,
                options,
                selected,
            } => {
                let options: Vec<String> = options
                    .iter()
                    .map(|option| {
                        if selected.as_ref() == Some(option) {
                            format!("*{option}")
                        } else {
                            option.clone()
                        }
                    })
                    .collect();
                write!(f, "{label}: {}", options.join(" "))
            }
            Self::Tabs { labels, active } => {
                let tabs: Vec<String> = labels
                    .iter()
                    .enumerate()
                    .map(|(i, label)| {
                        if i == *active {
                            format!("[{label}]")
                        } else {
                            format!(" {label} ")
                        }
                    })
                    .collect();
                write!(f, "{}", tabs.join("|"))
            }
            Self::Text { text } => write!(f, "{text}"),
        }
    }
}

impl fmt::Display for Panel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "== {} ==", self.title)?;
        match &self.body {
            PanelBody::Placeholder(message) => writeln!(f, "  {message}"),
            PanelBody::Sections(sections) => {
                for section in sections {
                    if let Some(heading) = &section.heading {
                        writeln!(f, "-- {heading} --")?;
                    }
                    for item in &section.items {
                        writeln!(f, "  {item}")?;
                    }
                }
                Ok(())
            }
        }
    }
}
