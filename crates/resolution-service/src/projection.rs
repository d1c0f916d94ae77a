//! Projection of the query service's statement graphs.
//!
//! A graph is a JSON array of statements, or an object holding one under
//! `@graph` or `data`. Statements are matched on their `@type`, ignoring any
//! namespace prefix and case. Missing or oddly shaped fields project to empty
//! strings; projection never fails.

use serde_json::Value;

/// One external identifier statement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identifier {
    pub value: String,
    pub id_type: String,
}

/// What the resolver shows of an asset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetDetails {
    pub identifiers: Vec<Identifier>,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OfferSummary {
    pub id: String,
    pub title: String,
    pub description: String,
}

pub fn project_asset(graph: &Value) -> AssetDetails {
    let statements = statements(graph);

    let identifiers = statements
        .iter()
        .filter(|statement| has_type(statement, "Id"))
        .map(|statement| Identifier {
            value: property(statement, "value").unwrap_or_default(),
            id_type: property(statement, "id_type").unwrap_or_default(),
        })
        .collect();

    let description = statements
        .iter()
        .find(|statement| has_type(statement, "Asset"))
        .and_then(|statement| property(statement, "description"))
        .unwrap_or_default();

    AssetDetails {
        identifiers,
        description,
    }
}

pub fn project_offers(graph: &Value) -> Vec<OfferSummary> {
    statements(graph)
        .iter()
        .filter(|statement| has_type(statement, "Offer"))
        .map(|statement| OfferSummary {
            id: property(statement, "@id").unwrap_or_default(),
            title: property(statement, "title").unwrap_or_default(),
            description: property(statement, "description").unwrap_or_default(),
        })
        .collect()
}

fn statements(graph: &Value) -> &[Value] {
    match graph {
        Value::Array(statements) => statements,
        Value::Object(object) => object
            .get("@graph")
            .or_else(|| object.get("data"))
            .map(statements)
            .unwrap_or_default(),
        _ => &[],
    }
}

fn local_name(name: &str) -> &str {
    name.rsplit_once(':').map_or(name, |(_, local)| local)
}

fn has_type(statement: &Value, wanted: &str) -> bool {
    let matches = |name: &str| local_name(name).eq_ignore_ascii_case(wanted);
    match statement.get("@type") {
        Some(Value::String(name)) => matches(name),
        Some(Value::Array(names)) => names.iter().filter_map(Value::as_str).any(matches),
        _ => false,
    }
}

/// Looks a property up by bare name or by any `prefix:name` key.
fn property(statement: &Value, name: &str) -> Option<String> {
    let object = statement.as_object()?;
    if let Some(value) = object.get(name).and_then(scalar) {
        return Some(value);
    }
    object
        .iter()
        .filter(|(key, _)| key.rsplit_once(':').is_some_and(|(_, local)| local == name))
        .find_map(|(_, value)| scalar(value))
}

fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Object(object) => object
            .get("@value")
            .or_else(|| object.get("@id"))
            .and_then(scalar),
        Value::Array(items) => items.iter().find_map(scalar),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn projects_identifiers_and_description() {
        let graph = json!({
            "@graph": [
                {"@id": "id1", "@type": "op:Id", "op:value": "978-3-16", "op:id_type": "isbn"},
                {"@id": "id2", "@type": ["op:Id"], "value": {"@value": 42}, "id_type": "ppi"},
                {"@id": "asset", "@type": "op:Asset", "dcterms:description": [{"@value": "A book"}]},
                {"@id": "other", "@type": "op:Licensor"}
            ]
        });

        let details = project_asset(&graph);

        assert_eq!(
            details.identifiers,
            vec![
                Identifier {
                    value: "978-3-16".into(),
                    id_type: "isbn".into()
                },
                Identifier {
                    value: "42".into(),
                    id_type: "ppi".into()
                },
            ]
        );
        assert_eq!(details.description, "A book");
    }

    #[test]
    fn type_matching_ignores_case_and_prefix() {
        let graph = json!([{"@type": "ID", "value": "x"}, {"@type": "op:id", "value": "y"}]);
        assert_eq!(project_asset(&graph).identifiers.len(), 2);
    }

    #[test]
    fn graph_under_data_key() {
        let graph = json!({"data": [{"@type": "Asset", "description": "nested"}]});
        assert_eq!(project_asset(&graph).description, "nested");
    }

    #[test]
    fn malformed_graphs_project_to_empty() {
        for graph in [
            Value::Null,
            json!("nope"),
            json!({"@graph": "nope"}),
            json!([1, 2, {"@type": 3}]),
            json!([{"@type": "Id", "value": {"nested": true}}]),
        ] {
            let details = project_asset(&graph);
            assert!(details.description.is_empty(), "graph: {graph}");
            assert!(
                details.identifiers.iter().all(|id| id.value.is_empty()),
                "graph: {graph}"
            );
        }
    }

    #[test]
    fn projects_offers() {
        let graph = json!({
            "@graph": [
                {
                    "@id": "offer-1",
                    "@type": ["odrl:Offer", "op:Policy"],
                    "dcterms:title": "Personal use",
                    "dcterms:description": "Prints up to A4"
                },
                {"@id": "duty", "@type": "odrl:Duty"},
                {"@id": "offer-2", "@type": "op:Offer"}
            ]
        });

        let offers = project_offers(&graph);

        assert_eq!(
            offers,
            vec![
                OfferSummary {
                    id: "offer-1".into(),
                    title: "Personal use".into(),
                    description: "Prints up to A4".into(),
                },
                OfferSummary {
                    id: "offer-2".into(),
                    ..OfferSummary::default()
                },
            ]
        );
    }
}
