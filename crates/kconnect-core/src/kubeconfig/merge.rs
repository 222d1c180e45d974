//! Document merge rules.

use std::collections::BTreeMap;

use super::types::ConfigDocument;

/// Merge `incoming` into `current`.
///
/// Without `override_maps`, each section is a right-biased key union: keys in
/// `incoming` replace same-named entries, other keys are left alone. Entries
/// are replaced whole, never merged field by field. A non-empty
/// `incoming.current_context` replaces the current one.
///
/// With `override_maps`, each section of `current` and the current context are
/// replaced by those of `incoming`. Delete operations use this with a copy of
/// the current document minus the removed keys.
///
/// Preferences are always kept from `current`.
pub fn merge_documents(
    mut current: ConfigDocument,
    incoming: &ConfigDocument,
    override_maps: bool,
) -> ConfigDocument {
    if override_maps {
        current.clusters = incoming.clusters.clone();
        current.auth_infos = incoming.auth_infos.clone();
        current.contexts = incoming.contexts.clone();
        current.extensions = incoming.extensions.clone();
        current.current_context = incoming.current_context.clone();
        return current;
    }

    upsert(&mut current.clusters, &incoming.clusters);
    upsert(&mut current.auth_infos, &incoming.auth_infos);
    upsert(&mut current.contexts, &incoming.contexts);
    upsert(&mut current.extensions, &incoming.extensions);

    if !incoming.current_context.is_empty() {
        current.current_context = incoming.current_context.clone();
    }

    current
}

fn upsert<V: Clone>(dest: &mut BTreeMap<String, V>, src: &BTreeMap<String, V>) {
    for (key, value) in src {
        dest.insert(key.clone(), value.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kubeconfig::types::ClusterEntry;

    fn doc_with_clusters(entries: &[(&str, &str)]) -> ConfigDocument {
        let mut doc = ConfigDocument::default();
        for (name, server) in entries {
            doc.clusters
                .insert(name.to_string(), ClusterEntry::new(server));
        }
        doc
    }

    fn servers(doc: &ConfigDocument) -> Vec<(String, String)> {
        doc.clusters
            .iter()
            .map(|(k, v)| (k.clone(), v.server.clone()))
            .collect()
    }

    #[test]
    fn test_non_override_is_right_biased_union() {
        let current = doc_with_clusters(&[("a", "1"), ("b", "2")]);
        let incoming = doc_with_clusters(&[("b", "3"), ("c", "4")]);

        let merged = merge_documents(current, &incoming, false);

        assert_eq!(
            servers(&merged),
            vec![
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), "3".to_string()),
                ("c".to_string(), "4".to_string()),
            ]
        );
    }

    #[test]
    fn test_override_replaces_wholesale() {
        let current = doc_with_clusters(&[("a", "1"), ("b", "2")]);
        let incoming = doc_with_clusters(&[("c", "4")]);

        let merged = merge_documents(current, &incoming, true);

        assert_eq!(servers(&merged), vec![("c".to_string(), "4".to_string())]);
    }

    #[test]
    fn test_override_takes_current_context_from_incoming() {
        let current = ConfigDocument {
            current_context: "gone".to_string(),
            ..Default::default()
        };
        let merged = merge_documents(current, &ConfigDocument::default(), true);
        assert!(merged.current_context.is_empty());
    }

    #[test]
    fn test_entries_replaced_not_deep_merged() {
        let mut current = doc_with_clusters(&[("a", "https://old")]);
        current
            .clusters
            .get_mut("a")
            .unwrap()
            .certificate_authority_data = Some("OLD".to_string());
        let incoming = doc_with_clusters(&[("a", "https://new")]);

        let merged = merge_documents(current, &incoming, false);

        assert_eq!(merged.clusters["a"].server, "https://new");
        assert!(merged.clusters["a"].certificate_authority_data.is_none());
    }

    #[test]
    fn test_current_context_kept_unless_incoming_sets_it() {
        let current = ConfigDocument {
            current_context: "old".to_string(),
            ..Default::default()
        };
        let merged = merge_documents(current.clone(), &ConfigDocument::default(), false);
        assert_eq!(merged.current_context, "old");

        let incoming = ConfigDocument {
            current_context: "new".to_string(),
            ..Default::default()
        };
        let merged = merge_documents(current, &incoming, false);
        assert_eq!(merged.current_context, "new");
    }
}
