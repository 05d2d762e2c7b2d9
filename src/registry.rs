//! Tag registry for forms and part categories
//!
//! Two independent [`LockedMultimap`]s back the registry: form tags keyed by
//! [`FormId`], and part tags keyed by [`PartType`]. Each has its own lock, so
//! work on one family never blocks the other.
//!
//! Form operations accept `impl Into<Option<FormId>>`. Passing `None` stands
//! for a form that did not resolve; mutations and queries then return `false`
//! (or visit nothing) without touching the map.

use crate::app::ports::FormResolver;
use crate::constants::INTERFACE_VERSION;
use crate::storage::LockedMultimap;
use crate::types::{FormId, PartTag, PartType};

#[derive(Default)]
pub struct TagRegistry {
    tags: LockedMultimap<FormId, String>,
    parts: LockedMultimap<PartType, PartTag>,
}

impl TagRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn version(&self) -> u32 {
        INTERFACE_VERSION
    }

    /// Hook for host reset events. Registry state is kept for the lifetime
    /// of the process, so there is nothing to clear.
    pub fn revert(&self) {}

    /// Attach `tag` to `form`. Returns `false` if the form is `None` or
    /// already carries an identical tag.
    pub fn add_tag(&self, form: impl Into<Option<FormId>>, tag: &str) -> bool {
        let Some(form): Option<FormId> = form.into() else {
            return false;
        };
        self.tags.insert(form, tag.to_string())
    }

    pub fn remove_tag(&self, form: impl Into<Option<FormId>>, tag: &str) -> bool {
        let Some(form): Option<FormId> = form.into() else {
            return false;
        };
        self.tags.remove(&form, tag)
    }

    pub fn has_tags(&self, form: impl Into<Option<FormId>>) -> bool {
        let form: Option<FormId> = form.into();
        form.is_some_and(|form| self.tags.has_entries(&form))
    }

    pub fn has_tag(&self, form: impl Into<Option<FormId>>, tag: &str) -> bool {
        let form: Option<FormId> = form.into();
        form.is_some_and(|form| self.tags.contains(&form, tag))
    }

    /// Visit the tags of `form` in insertion order.
    ///
    /// The form-tag lock is held while `visitor` runs; the visitor must not
    /// call back into this registry's form-tag operations.
    pub fn visit_tags(&self, form: impl Into<Option<FormId>>, mut visitor: impl FnMut(&str)) {
        let form: Option<FormId> = form.into();
        if let Some(form) = form {
            self.tags.visit_bucket(&form, |tag| visitor(tag.as_str()));
        }
    }

    /// Visit every form that has ever been tagged, including forms whose tags
    /// have all been removed. Same locking rule as [`Self::visit_tags`].
    pub fn visit_forms(&self, visitor: impl FnMut(FormId)) {
        self.tags.visit_keys(visitor);
    }

    /// Like [`Self::visit_forms`], but hands the visitor the host's view of
    /// each form. Forms the resolver no longer knows arrive as `None`.
    pub fn visit_resolved_forms<R>(&self, resolver: &R, mut visitor: impl FnMut(Option<R::Form>))
    where
        R: FormResolver + ?Sized,
    {
        self.tags.visit_keys(|form| visitor(resolver.lookup(form)));
    }

    /// Tags of `form`, copied out so the lock is released before returning
    pub fn tags(&self, form: impl Into<Option<FormId>>) -> Vec<String> {
        let form: Option<FormId> = form.into();
        form.map(|form| self.tags.bucket_snapshot(&form))
            .unwrap_or_default()
    }

    /// Forms present in the registry, copied out. Order is unspecified.
    pub fn forms(&self) -> Vec<FormId> {
        self.tags.keys()
    }

    pub fn form_count(&self) -> usize {
        self.tags.key_count()
    }

    /// Attach a part tag to `part_type`. A tag with the same name is
    /// overwritten in place, so this always succeeds.
    pub fn add_part_tag(&self, part_type: PartType, name: &str, label: &str) -> bool {
        self.parts.insert(part_type, PartTag::new(name, label))
    }

    pub fn remove_part_tag(&self, part_type: PartType, name: &str) -> bool {
        self.parts.remove(&part_type, name)
    }

    pub fn has_part_tags(&self, part_type: PartType) -> bool {
        self.parts.has_entries(&part_type)
    }

    /// Matches on name only; the label is ignored
    pub fn has_part_tag(&self, part_type: PartType, name: &str) -> bool {
        self.parts.contains(&part_type, name)
    }

    /// Visit `(name, label)` pairs of `part_type` in insertion order, under the
    /// part-tag lock.
    pub fn visit_part_tags(&self, part_type: PartType, mut visitor: impl FnMut(&str, &str)) {
        self.parts
            .visit_bucket(&part_type, |tag| visitor(tag.name.as_str(), tag.label.as_str()));
    }

    pub fn part_tags(&self, part_type: PartType) -> Vec<PartTag> {
        self.parts.bucket_snapshot(&part_type)
    }

    pub fn part_types(&self) -> Vec<PartType> {
        self.parts.keys()
    }

    pub fn part_type_count(&self) -> usize {
        self.parts.key_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct NamedForms(HashMap<FormId, &'static str>);

    impl FormResolver for NamedForms {
        type Form = &'static str;

        fn resolve_identifier(&self, identifier: &str) -> Option<FormId> {
            self.0
                .iter()
                .find(|(_, name)| **name == identifier)
                .map(|(id, _)| *id)
        }

        fn lookup(&self, form: FormId) -> Option<&'static str> {
            self.0.get(&form).copied()
        }
    }

    #[test]
    fn test_add_tag_rejects_duplicates() {
        let registry = TagRegistry::new();
        let form = FormId(1);
        assert!(registry.add_tag(form, "female"));
        assert!(!registry.add_tag(form, "female"));
        assert!(registry.has_tag(form, "female"));
        assert_eq!(registry.tags(form), vec!["female"]);
    }

    #[test]
    fn test_tags_are_case_sensitive() {
        let registry = TagRegistry::new();
        assert!(registry.add_tag(FormId(1), "Female"));
        assert!(registry.add_tag(FormId(1), "female"));
        assert!(!registry.has_tag(FormId(1), "FEMALE"));
    }

    #[test]
    fn test_remove_tag_true_then_false() {
        let registry = TagRegistry::new();
        registry.add_tag(FormId(1), "a");
        assert!(registry.remove_tag(FormId(1), "a"));
        assert!(!registry.remove_tag(FormId(1), "a"));
        assert!(!registry.remove_tag(FormId(2), "a"));
    }

    #[test]
    fn test_unresolved_form_is_rejected_everywhere() {
        let registry = TagRegistry::new();
        assert!(!registry.add_tag(None, "a"));
        assert!(!registry.remove_tag(None, "a"));
        assert!(!registry.has_tags(None));
        assert!(!registry.has_tag(None, "a"));
        let mut visited = 0;
        registry.visit_tags(None, |_| visited += 1);
        assert_eq!(visited, 0);
        assert!(registry.tags(None).is_empty());
        assert_eq!(registry.form_count(), 0);
    }

    #[test]
    fn test_emptied_form_still_visited() {
        let registry = TagRegistry::new();
        let form = FormId(1);
        assert!(registry.add_tag(form, "female"));
        assert!(!registry.add_tag(form, "female"));
        assert!(registry.has_tags(form));
        assert!(registry.remove_tag(form, "female"));
        assert!(!registry.has_tags(form));

        let mut forms = Vec::new();
        registry.visit_forms(|f| forms.push(f));
        assert_eq!(forms, vec![form]);
    }

    #[test]
    fn test_visit_tags_preserves_order() {
        let registry = TagRegistry::new();
        let tags = ["t1", "t2", "t3", "t4"];
        for tag in tags {
            assert!(registry.add_tag(FormId(5), tag));
        }
        let mut seen = Vec::new();
        registry.visit_tags(FormId(5), |tag| seen.push(tag.to_string()));
        assert_eq!(seen, tags);
    }

    #[test]
    fn test_visit_resolved_forms_passes_unknown_through() {
        let registry = TagRegistry::new();
        let resolver = NamedForms(HashMap::from([(FormId(1), "Hair01")]));
        registry.add_tag(FormId(1), "a");
        registry.add_tag(FormId(2), "b");

        let mut resolved = Vec::new();
        registry.visit_resolved_forms(&resolver, |form| resolved.push(form));
        resolved.sort();
        assert_eq!(resolved, vec![None, Some("Hair01")]);
    }

    #[test]
    fn test_part_tag_overwrite() {
        let registry = TagRegistry::new();
        assert!(registry.add_part_tag(3, "n", "A"));
        assert!(registry.add_part_tag(3, "n", "B"));
        assert_eq!(registry.part_tags(3), vec![PartTag::new("n", "B")]);

        let mut pairs = Vec::new();
        registry.visit_part_tags(3, |name, label| pairs.push((name.to_string(), label.to_string())));
        assert_eq!(pairs, vec![("n".to_string(), "B".to_string())]);
    }

    #[test]
    fn test_part_tags_match_by_name_only() {
        let registry = TagRegistry::new();
        registry.add_part_tag(0, "brow", "Brow Style");
        assert!(registry.has_part_tag(0, "brow"));
        assert!(!registry.has_part_tag(0, "Brow Style"));
        assert!(registry.has_part_tags(0));
        assert!(!registry.has_part_tags(1));
        assert!(registry.remove_part_tag(0, "brow"));
        assert!(!registry.remove_part_tag(0, "brow"));
        assert!(!registry.has_part_tags(0));
        assert_eq!(registry.part_types(), vec![0]);
    }

    #[test]
    fn test_families_are_independent() {
        let registry = TagRegistry::new();
        registry.add_tag(FormId(4), "shared");
        registry.add_part_tag(4, "shared", "Shared");

        assert!(registry.remove_tag(FormId(4), "shared"));
        assert!(registry.has_part_tag(4, "shared"));
        assert!(!registry.has_tag(FormId(4), "shared"));

        assert!(registry.remove_part_tag(4, "shared"));
        assert_eq!(registry.form_count(), 1);
        assert_eq!(registry.part_type_count(), 1);
    }

    #[test]
    fn test_revert_keeps_state() {
        let registry = TagRegistry::new();
        registry.add_tag(FormId(1), "a");
        registry.revert();
        assert!(registry.has_tag(FormId(1), "a"));
        assert_eq!(registry.version(), INTERFACE_VERSION);
    }
}
