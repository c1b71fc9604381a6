use crate::model::{DisclosureMention, EvidenceItem, PolicyTuple, SourceCategorySet, SourceKind};
use crate::taxonomy::Taxonomy;

// ---------------------------------------------------------------------------
// Ingestion adapters
// ---------------------------------------------------------------------------

impl From<PolicyTuple> for EvidenceItem {
    fn from(t: PolicyTuple) -> Self {
        EvidenceItem {
            source: SourceKind::Policy,
            data_type: t.data_type,
            excerpt: t.text,
            actor: t.actor,
        }
    }
}

impl From<&PolicyTuple> for EvidenceItem {
    fn from(t: &PolicyTuple) -> Self {
        EvidenceItem::from(t.clone())
    }
}

impl From<DisclosureMention> for EvidenceItem {
    fn from(m: DisclosureMention) -> Self {
        EvidenceItem {
            source: SourceKind::Disclosure,
            data_type: m.mention,
            excerpt: m.span,
            actor: None,
        }
    }
}

impl From<&DisclosureMention> for EvidenceItem {
    fn from(m: &DisclosureMention) -> Self {
        EvidenceItem::from(m.clone())
    }
}

impl EvidenceItem {
    pub fn policy(data_type: impl Into<String>) -> Self {
        Self {
            source: SourceKind::Policy,
            data_type: data_type.into(),
            excerpt: None,
            actor: None,
        }
    }

    pub fn disclosure(mention: impl Into<String>) -> Self {
        Self {
            source: SourceKind::Disclosure,
            data_type: mention.into(),
            excerpt: None,
            actor: None,
        }
    }

    pub fn with_excerpt(mut self, excerpt: impl Into<String>) -> Self {
        self.excerpt = Some(excerpt.into());
        self
    }

    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }
}

// ---------------------------------------------------------------------------
// Normalizer
// ---------------------------------------------------------------------------

/// Map one evidence item to the categories it mentions.
///
/// Pure: depends only on the item and the taxonomy. Blank or unmatched text
/// yields the empty set.
pub fn normalize(taxonomy: &Taxonomy, item: &EvidenceItem) -> SourceCategorySet {
    match item.source {
        SourceKind::Policy => {
            if !taxonomy.actor_in_scope(item.actor.as_deref()) {
                return SourceCategorySet::new();
            }
            let mut found = taxonomy.categories_matching(&item.data_type);
            if taxonomy.match_excerpts() {
                if let Some(ref excerpt) = item.excerpt {
                    found.extend(taxonomy.categories_matching(excerpt));
                }
            }
            found
        }
        SourceKind::Disclosure => taxonomy.categories_matching(&item.data_type),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReconConfig;
    use crate::model::Category;

    fn taxonomy(edit: impl FnOnce(&mut ReconConfig)) -> Taxonomy {
        let mut config = ReconConfig::default_taxonomy().unwrap();
        edit(&mut config);
        Taxonomy::compile(&config).unwrap()
    }

    #[test]
    fn policy_tuple_adapter() {
        let item = EvidenceItem::from(PolicyTuple {
            actor: Some("we".into()),
            action: Some("COLLECT".into()),
            data_type: "email address".into(),
            text: Some("We collect your email address.".into()),
        });
        assert_eq!(item.source, SourceKind::Policy);
        assert_eq!(item.data_type, "email address");
        assert_eq!(item.actor.as_deref(), Some("we"));
        assert_eq!(item.excerpt.as_deref(), Some("We collect your email address."));
    }

    #[test]
    fn disclosure_mention_adapter_drops_actor() {
        let item = EvidenceItem::from(&DisclosureMention {
            mention: "credit card number".into(),
            span: Some("Financial and payment information".into()),
        });
        assert_eq!(item.source, SourceKind::Disclosure);
        assert!(item.actor.is_none());
    }

    #[test]
    fn policy_data_type_is_matched() {
        let t = taxonomy(|_| {});
        let got = normalize(&t, &EvidenceItem::policy("Email Address"));
        assert_eq!(got.into_iter().collect::<Vec<_>>(), vec![Category::Pii]);
    }

    #[test]
    fn excerpt_only_counts_when_enabled() {
        let item = EvidenceItem::policy("account").with_excerpt("we read your browsing history");

        let off = taxonomy(|_| {});
        assert!(normalize(&off, &item).is_empty());

        let on = taxonomy(|c| c.match_excerpts = true);
        assert!(normalize(&on, &item).contains(&Category::WebHistory));
    }

    #[test]
    fn third_party_actor_ignored_only_when_scoped() {
        let item = EvidenceItem::policy("precise location").with_actor("ad networks");

        let open = taxonomy(|_| {});
        assert!(normalize(&open, &item).contains(&Category::Location));

        let scoped = taxonomy(|c| c.first_party_only = true);
        assert!(normalize(&scoped, &item).is_empty());
        assert!(normalize(&scoped, &item.clone().with_actor("we")).contains(&Category::Location));
    }

    #[test]
    fn disclosure_ignores_excerpt() {
        let t = taxonomy(|c| c.match_excerpts = true);
        let item = EvidenceItem::disclosure("nothing relevant").with_excerpt("password");
        assert!(normalize(&t, &item).is_empty());
    }

    #[test]
    fn malformed_text_yields_empty_set() {
        let t = taxonomy(|_| {});
        assert!(normalize(&t, &EvidenceItem::policy("")).is_empty());
        assert!(normalize(&t, &EvidenceItem::disclosure("\u{0}\t--")).is_empty());
    }
}
