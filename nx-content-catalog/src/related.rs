//! Grouping of a title's updates and add-ons around its base record.

use std::cmp::Reverse;

use nx_content_core::{ContentRecord, ContentRole, TitleId, base_title_id};

/// Everything belonging to one base title.
#[derive(Debug, Clone, Default)]
pub struct RelatedContent<'a> {
    pub base_id: Option<TitleId>,
    pub base: Option<&'a ContentRecord>,
    /// Newest version first.
    pub updates: Vec<&'a ContentRecord>,
    /// Sorted by identifier.
    pub addons: Vec<&'a ContentRecord>,
}

impl RelatedContent<'_> {
    pub fn is_empty(&self) -> bool {
        self.base.is_none() && self.updates.is_empty() && self.addons.is_empty()
    }
}

/// Collect the base record, updates and add-ons of the title `id` belongs
/// to. `id` may be any member of the family.
pub fn related<'a>(records: &'a [ContentRecord], id: &TitleId) -> RelatedContent<'a> {
    let Some(base_id) = base_title_id(id) else {
        return RelatedContent::default();
    };

    let mut out = RelatedContent {
        base: records
            .iter()
            .find(|r| r.identifier == base_id && r.role() == ContentRole::Base),
        ..Default::default()
    };

    for record in records {
        if record.base_id().as_ref() != Some(&base_id) {
            continue;
        }
        match record.role() {
            ContentRole::Update => out.updates.push(record),
            ContentRole::Addon => out.addons.push(record),
            ContentRole::Base => {}
        }
    }

    out.updates
        .sort_by_key(|r| (Reverse(r.encoded_version()), r.instance_key.clone()));
    out.addons.sort_by(|a, b| {
        a.identifier
            .cmp(&b.identifier)
            .then_with(|| a.instance_key.cmp(&b.instance_key))
    });
    out.base_id = Some(base_id);
    out
}
