use std::collections::BTreeMap;

use crate::foundation::error::{DesignError, DesignResult};

/// Separator between the variant name and its component set in the encoded form.
pub const UNIT_SEPARATOR: char = '\x1f';

/// Abstract reference to a node in a [`Document`](crate::Document).
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum NodeQuery {
    /// Node with this id.
    ById(String),
    /// First node with this name in document order.
    ByName(String),
    /// Member of a component set selected by `Prop=Value, Prop=Value` properties.
    Variant {
        /// Variant property string.
        name: String,
        /// Component set name.
        set: String,
    },
    /// Component set by name; resolves to its default or customized member.
    ComponentSet(String),
}

impl NodeQuery {
    /// Query by node id.
    pub fn id(id: impl Into<String>) -> Self {
        Self::ById(id.into())
    }

    /// Query by node name.
    pub fn name(name: impl Into<String>) -> Self {
        Self::ByName(name.into())
    }

    /// Query a variant by its property string and component set name.
    pub fn variant(name: impl Into<String>, set: impl Into<String>) -> Self {
        Self::Variant {
            name: name.into(),
            set: set.into(),
        }
    }

    /// Query a component set.
    pub fn component_set(name: impl Into<String>) -> Self {
        Self::ComponentSet(name.into())
    }

    /// Tagged string form: `id:`, `name:`, `variant:<name>\x1f<set>`, `component_set:`.
    ///
    /// Fails if a variant name contains the unit separator, since the result would not decode
    /// back to the same query.
    pub fn encode(&self) -> DesignResult<String> {
        Ok(match self {
            Self::ById(id) => format!("id:{id}"),
            Self::ByName(name) => format!("name:{name}"),
            Self::Variant { name, set } => {
                if name.contains(UNIT_SEPARATOR) || set.contains(UNIT_SEPARATOR) {
                    return Err(DesignError::invalid_query(format!(
                        "variant query parts must not contain the unit separator: {name:?}"
                    )));
                }
                format!("variant:{name}{UNIT_SEPARATOR}{set}")
            }
            Self::ComponentSet(name) => format!("component_set:{name}"),
        })
    }

    /// Parse the tagged string form produced by [`NodeQuery::encode`].
    pub fn decode(s: &str) -> DesignResult<Self> {
        let (tag, value) = s
            .split_once(':')
            .ok_or_else(|| DesignError::invalid_query(format!("missing tag in {s:?}")))?;
        match tag {
            "id" => Ok(Self::id(value)),
            "name" => Ok(Self::name(value)),
            "variant" => {
                let mut parts = value.split(UNIT_SEPARATOR);
                match (parts.next(), parts.next(), parts.next()) {
                    (Some(name), Some(set), None) => Ok(Self::variant(name, set)),
                    _ => Err(DesignError::invalid_query(format!(
                        "variant query needs exactly one separator: {s:?}"
                    ))),
                }
            }
            "component_set" => Ok(Self::component_set(value)),
            other => Err(DesignError::invalid_query(format!(
                "unknown query tag {other:?}"
            ))),
        }
    }
}

impl std::fmt::Display for NodeQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ById(id) => write!(f, "id:{id}"),
            Self::ByName(name) => write!(f, "name:{name}"),
            Self::Variant { name, set } => write!(f, "variant:{name} in {set}"),
            Self::ComponentSet(name) => write!(f, "component_set:{name}"),
        }
    }
}

/// Parse a `Prop=Value, Prop=Value` variant name into a property map.
///
/// Whitespace around names and values is ignored. Parts without `=` map to an empty value.
pub fn parse_variant_properties(name: &str) -> BTreeMap<String, String> {
    name.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| match part.split_once('=') {
            Some((k, v)) => (k.trim().to_owned(), v.trim().to_owned()),
            None => (part.to_owned(), String::new()),
        })
        .collect()
}

/// Join a property map into its canonical key, ordered by property name.
pub fn canonical_key_from_properties(props: &BTreeMap<String, String>) -> String {
    let mut out = String::new();
    for (i, (k, v)) in props.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(k);
        out.push('=');
        out.push_str(v);
    }
    out
}

/// Canonical form of a variant name: properties sorted by name, `k=v` joined with `,`.
///
/// `"Size=S, Color=Red"` and `"Color=Red,Size=S"` both yield `"Color=Red,Size=S"`.
pub fn canonical_variant_key(name: &str) -> String {
    canonical_key_from_properties(&parse_variant_properties(name))
}

/// Build a variant query from property pairs in any order.
pub fn variant_from_properties<K, V>(
    props: impl IntoIterator<Item = (K, V)>,
    set: impl Into<String>,
) -> NodeQuery
where
    K: Into<String>,
    V: Into<String>,
{
    let props: BTreeMap<String, String> = props
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect();
    let name = props
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join(", ");
    NodeQuery::variant(name, set)
}

#[cfg(test)]
#[path = "../../tests/unit/document/query.rs"]
mod tests;
