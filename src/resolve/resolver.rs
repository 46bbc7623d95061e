use std::collections::BTreeMap;

use crate::customize::context::CustomizationContext;
use crate::document::model::{ComponentInfo, Document, View};
use crate::document::query::{
    NodeQuery, canonical_key_from_properties, canonical_variant_key, parse_variant_properties,
};
use crate::foundation::error::{DesignError, DesignResult};

/// Resolves node queries against one document.
///
/// The resolver borrows the document; variant indexes it needs are built once per document and
/// cached on it.
#[derive(Clone, Copy, Debug)]
pub struct Resolver<'d> {
    doc: &'d Document,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Fallback {
    DefaultMember,
    Exact,
}

impl<'d> Resolver<'d> {
    /// Resolver over `doc`.
    pub fn new(doc: &'d Document) -> Self {
        Self { doc }
    }

    /// The document being resolved against.
    pub fn document(&self) -> &'d Document {
        self.doc
    }

    /// Resolve `query` to a concrete view (never a component set).
    ///
    /// Variant queries whose property combination is not registered fall back to the set's
    /// declared default member. Variant properties customized under the set's name override the
    /// query's properties key by key.
    #[tracing::instrument(skip(self, query, ctx), fields(query = %query))]
    pub fn resolve(&self, query: &NodeQuery, ctx: &CustomizationContext) -> DesignResult<&'d View> {
        self.resolve_with(query, ctx, Fallback::DefaultMember)
    }

    /// Like [`Resolver::resolve`] but reports [`DesignError::VariantMismatch`] instead of falling
    /// back to the default member.
    pub fn resolve_exact(
        &self,
        query: &NodeQuery,
        ctx: &CustomizationContext,
    ) -> DesignResult<&'d View> {
        self.resolve_with(query, ctx, Fallback::Exact)
    }

    /// Every member of component set `name`, keyed by canonical variant key.
    pub fn expand_component_set(&self, name: &str) -> DesignResult<BTreeMap<String, &'d View>> {
        let index = self
            .doc
            .variant_indexes()
            .get(name)
            .ok_or_else(|| DesignError::node_not_found(format!("component set '{name}'")))?;
        Ok(index
            .members
            .iter()
            .filter_map(|(key, path)| self.doc.view_at(path).map(|v| (key.clone(), v)))
            .collect())
    }

    fn resolve_with(
        &self,
        query: &NodeQuery,
        ctx: &CustomizationContext,
        fallback: Fallback,
    ) -> DesignResult<&'d View> {
        match query {
            NodeQuery::ById(id) => {
                let view = self
                    .doc
                    .view_by_id(id)
                    .ok_or_else(|| DesignError::node_not_found(query.to_string()))?;
                self.concrete(view, ctx, fallback)
            }
            NodeQuery::ByName(name) => {
                let path = self
                    .doc
                    .first_path_named(name)
                    .ok_or_else(|| DesignError::node_not_found(query.to_string()))?;
                let view = self
                    .doc
                    .view_at(path)
                    .ok_or_else(|| DesignError::node_not_found(query.to_string()))?;
                self.concrete(view, ctx, fallback)
            }
            NodeQuery::Variant { name, set } => {
                let mut props = parse_variant_properties(name);
                if let Some(custom) = ctx.variant_properties(set) {
                    props.extend(custom.iter().map(|(k, v)| (k.clone(), v.clone())));
                }
                self.member(set, &props, fallback)
            }
            NodeQuery::ComponentSet(name) => self.set_member(name, ctx, fallback),
        }
    }

    fn concrete(
        &self,
        view: &'d View,
        ctx: &CustomizationContext,
        fallback: Fallback,
    ) -> DesignResult<&'d View> {
        if view.is_component_set() {
            self.set_member(&view.name, ctx, fallback)
        } else {
            Ok(view)
        }
    }

    /// Member of set `name` chosen by customization, else the default, else the first member.
    ///
    /// Customized properties are layered over the properties of that same fallback member.
    fn set_member(
        &self,
        name: &str,
        ctx: &CustomizationContext,
        fallback: Fallback,
    ) -> DesignResult<&'d View> {
        let base_member = self.fallback_member(name);
        if let Some(props) = ctx.variant_properties(name) {
            let mut base = base_member
                .as_ref()
                .map(|v| parse_variant_properties(&v.name))
                .unwrap_or_default();
            base.extend(props.iter().map(|(k, v)| (k.clone(), v.clone())));
            return self.member(name, &base, fallback);
        }
        base_member
    }

    fn fallback_member(&self, name: &str) -> DesignResult<&'d View> {
        if let Some(view) = self.default_member(name) {
            return Ok(view);
        }
        let index = self
            .doc
            .variant_indexes()
            .get(name)
            .ok_or_else(|| DesignError::node_not_found(format!("component set '{name}'")))?;
        index
            .first_member
            .as_ref()
            .and_then(|p| self.doc.view_at(p))
            .ok_or_else(|| DesignError::node_not_found(format!("component set '{name}' is empty")))
    }

    fn default_member(&self, set: &str) -> Option<&'d View> {
        let index = self.doc.variant_indexes().get(set)?;
        index
            .default_member
            .as_ref()
            .and_then(|p| self.doc.view_at(p))
    }

    fn member(
        &self,
        set: &str,
        props: &BTreeMap<String, String>,
        fallback: Fallback,
    ) -> DesignResult<&'d View> {
        let index = self
            .doc
            .variant_indexes()
            .get(set)
            .ok_or_else(|| DesignError::node_not_found(format!("component set '{set}'")))?;
        if index.member_count == 0 {
            return Err(DesignError::node_not_found(format!(
                "component set '{set}' has no members"
            )));
        }
        let key = canonical_key_from_properties(props);
        if let Some(view) = index.members.get(&key).and_then(|p| self.doc.view_at(p)) {
            return Ok(view);
        }
        match fallback {
            Fallback::Exact => Err(DesignError::VariantMismatch {
                component_set: set.to_owned(),
                variant: key,
            }),
            Fallback::DefaultMember => {
                let default = index
                    .default_member
                    .as_ref()
                    .and_then(|p| self.doc.view_at(p))
                    .ok_or_else(|| {
                        DesignError::node_not_found(format!(
                            "variant '{key}' in '{set}' and no default member"
                        ))
                    })?;
                tracing::warn!(set, variant = %key, default = %default.id, "variant not found, using default member");
                Ok(default)
            }
        }
    }

    /// Member an instance should show given live variant customizations, if it differs from the
    /// one it currently shows.
    ///
    /// Properties customized under the set name apply to every instance; properties customized
    /// under the instance's own name win over those. Unregistered combinations keep the current
    /// member.
    pub(crate) fn instance_swap(
        &self,
        info: &ComponentInfo,
        instance_name: &str,
        ctx: &CustomizationContext,
    ) -> Option<&'d View> {
        if info.component_set_name.is_empty() {
            return None;
        }
        let by_set = ctx.variant_properties(&info.component_set_name);
        let by_instance = ctx.variant_properties(instance_name);
        if by_set.is_none() && by_instance.is_none() {
            return None;
        }
        let current = canonical_variant_key(&info.component_name);
        let mut props = parse_variant_properties(&info.component_name);
        for custom in [by_set, by_instance].into_iter().flatten() {
            props.extend(custom.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        let key = canonical_key_from_properties(&props);
        if key == current {
            return None;
        }
        let index = self.doc.variant_indexes().get(&info.component_set_name)?;
        match index.members.get(&key).and_then(|p| self.doc.view_at(p)) {
            Some(view) => Some(view),
            None => {
                tracing::warn!(
                    instance = instance_name,
                    set = %info.component_set_name,
                    variant = %key,
                    "variant not registered, keeping current member"
                );
                None
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/resolve/resolver.rs"]
mod tests;
