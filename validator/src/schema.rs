//! Per-kind schema: where each block kind may appear, whether it needs a label or
//! accepts actions, and which attributes it declares.

use sdl::{Scalar, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueShape {
    String,
    Number,
    Boolean,
    StringList,
    Map,
}

impl ValueShape {
    pub fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (ValueShape::String, Value::Scalar(Scalar::String(_))) => true,
            (ValueShape::Number, Value::Scalar(Scalar::Number(_))) => true,
            (ValueShape::Boolean, Value::Scalar(Scalar::Boolean(_))) => true,
            (ValueShape::StringList, Value::List(items)) => {
                items.iter().all(|item| item.as_str().is_some())
            }
            (ValueShape::Map, Value::Map(_)) => true,
            _ => false,
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            ValueShape::String => "a string",
            ValueShape::Number => "a number",
            ValueShape::Boolean => "a boolean",
            ValueShape::StringList => "a list of strings",
            ValueShape::Map => "a map",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AttributeSpec {
    pub key: &'static str,
    pub shape: ValueShape,
    pub required: bool,
}

const fn required(key: &'static str, shape: ValueShape) -> AttributeSpec {
    AttributeSpec {
        key,
        shape,
        required: true,
    }
}

const fn optional(key: &'static str, shape: ValueShape) -> AttributeSpec {
    AttributeSpec {
        key,
        shape,
        required: false,
    }
}

/// Where a block kind may appear.
#[derive(Debug, Clone, Copy)]
pub enum Placement {
    TopLevel,
    Within(&'static [&'static str]),
    TopLevelOrWithin(&'static [&'static str]),
    Anywhere,
}

impl Placement {
    /// `parent` is the enclosing block's kind, `None` at the top level.
    pub fn allows(&self, parent: Option<&str>) -> bool {
        match (self, parent) {
            (Placement::Anywhere, _) => true,
            (Placement::TopLevel | Placement::TopLevelOrWithin(_), None) => true,
            (Placement::Within(_), None) => false,
            (Placement::TopLevel, Some(_)) => false,
            (Placement::Within(kinds) | Placement::TopLevelOrWithin(kinds), Some(parent)) => {
                kinds.contains(&parent)
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct KindSpec {
    pub kind: &'static str,
    pub label_required: bool,
    pub placement: Placement,
    pub accepts_actions: bool,
    /// `None` accepts any attribute.
    pub attributes: Option<&'static [AttributeSpec]>,
}

impl KindSpec {
    pub fn attribute(&self, key: &str) -> Option<&'static AttributeSpec> {
        self.attributes?.iter().find(|spec| spec.key == key)
    }

    pub fn declares(&self, key: &str) -> bool {
        self.attributes.is_none() || self.attribute(key).is_some()
    }

    pub fn required_attributes(&self) -> impl Iterator<Item = &'static AttributeSpec> {
        self.attributes
            .unwrap_or_default()
            .iter()
            .filter(|spec| spec.required)
    }
}

#[derive(Debug)]
pub struct Schema {
    kinds: &'static [KindSpec],
}

impl Schema {
    pub fn kind(&self, kind: &str) -> Option<&'static KindSpec> {
        self.kinds.iter().find(|spec| spec.kind == kind)
    }
}

/// Attribute key naming the labels of blocks this one depends on.
pub const DEPENDS_ON: &str = "depends_on";

/// Action methods that do not raise `unknown-verb`.
pub const KNOWN_VERBS: &[&str] = &["GET", "POST", "PUT", "PATCH", "DELETE", "HEAD", "OPTIONS"];

const SERVICE_ATTRIBUTES: &[AttributeSpec] = &[
    required("version", ValueShape::String),
    optional("description", ValueShape::String),
    optional("base_path", ValueShape::String),
    optional(DEPENDS_ON, ValueShape::StringList),
    optional("tags", ValueShape::StringList),
    optional("timeout", ValueShape::Number),
    optional("public", ValueShape::Boolean),
    optional("env", ValueShape::Map),
];

const GROUP_ATTRIBUTES: &[AttributeSpec] = &[
    optional("base_path", ValueShape::String),
    optional("description", ValueShape::String),
];

const RESOURCE_ATTRIBUTES: &[AttributeSpec] = &[
    required("type", ValueShape::String),
    optional("description", ValueShape::String),
    optional(DEPENDS_ON, ValueShape::StringList),
    optional("options", ValueShape::Map),
];

pub static BUILTIN: Schema = Schema {
    kinds: &[
        KindSpec {
            kind: "service",
            label_required: true,
            placement: Placement::TopLevel,
            accepts_actions: true,
            attributes: Some(SERVICE_ATTRIBUTES),
        },
        KindSpec {
            kind: "group",
            label_required: true,
            placement: Placement::Within(&["service", "group"]),
            accepts_actions: true,
            attributes: Some(GROUP_ATTRIBUTES),
        },
        KindSpec {
            kind: "resource",
            label_required: true,
            placement: Placement::TopLevelOrWithin(&["service"]),
            accepts_actions: false,
            attributes: Some(RESOURCE_ATTRIBUTES),
        },
        KindSpec {
            kind: "config",
            label_required: false,
            placement: Placement::Anywhere,
            accepts_actions: false,
            attributes: None,
        },
    ],
};
