//! Struktureller Feld-Diff über serialisierte Snapshots.
//!
//! Der Diff enthält nur geänderte Pfade: neue oder geänderte Werte mit ihrem
//! neuen Inhalt, entfernte Schlüssel als `null`. Gleiche Eingaben liefern ein
//! leeres Objekt.

use serde_json::{Map, Value};

/// Berechnet den Unterschied zweier Snapshots.
///
/// Austauschbar, z.B. gegen ein inkrementelles Patch-Log.
pub trait SnapshotDiffer {
    /// Unterschied von `previous` nach `current`.
    fn diff(&self, previous: &Value, current: &Value) -> Value;
}

/// Rekursiver Vergleich über Objekte und Arrays.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralDiff;

impl SnapshotDiffer for StructuralDiff {
    fn diff(&self, previous: &Value, current: &Value) -> Value {
        diff_value(previous, current).unwrap_or_else(|| Value::Object(Map::new()))
    }
}

fn diff_value(lhs: &Value, rhs: &Value) -> Option<Value> {
    match (lhs, rhs) {
        (Value::Object(l), Value::Object(r)) => diff_entries(
            l.iter().map(|(k, v)| (k.clone(), v)),
            |key| r.get(key),
            r.iter().map(|(k, v)| (k.clone(), v)),
            |key| l.contains_key(key),
        ),
        (Value::Array(l), Value::Array(r)) => diff_entries(
            l.iter().enumerate().map(|(i, v)| (i.to_string(), v)),
            |key| key.parse::<usize>().ok().and_then(|i| r.get(i)),
            r.iter().enumerate().map(|(i, v)| (i.to_string(), v)),
            |key| key.parse::<usize>().is_ok_and(|i| i < l.len()),
        ),
        _ if lhs == rhs => None,
        _ => Some(rhs.clone()),
    }
}

fn diff_entries<'a>(
    left: impl Iterator<Item = (String, &'a Value)>,
    right_get: impl Fn(&str) -> Option<&'a Value>,
    right: impl Iterator<Item = (String, &'a Value)>,
    left_has: impl Fn(&str) -> bool,
) -> Option<Value> {
    let mut out = Map::new();
    for (key, lv) in left {
        match right_get(&key) {
            None => {
                out.insert(key, Value::Null);
            }
            Some(rv) => {
                if let Some(d) = diff_value(lv, rv) {
                    out.insert(key, d);
                }
            }
        }
    }
    for (key, rv) in right {
        if !left_has(&key) {
            out.insert(key, rv.clone());
        }
    }
    if out.is_empty() {
        None
    } else {
        Some(Value::Object(out))
    }
}

/// Namen der geänderten Top-Level-Abschnitte.
pub fn changed_sections(diff: &Value) -> Vec<&str> {
    diff.as_object()
        .map(|m| m.keys().map(String::as_str).collect())
        .unwrap_or_default()
}

/// IDs der geänderten Entitäten eines Collection-Abschnitts.
pub fn changed_ids(diff: &Value, section: &str) -> Vec<u64> {
    diff.get(section)
        .and_then(Value::as_object)
        .map(|m| m.keys().filter_map(|k| k.parse().ok()).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn gleiche_werte_ergeben_leeren_diff() {
        let v = json!({"roads": {"1": {"width": 3.5}}});
        assert_eq!(StructuralDiff.diff(&v, &v), json!({}));
    }

    #[test]
    fn nur_geaenderte_pfade_erscheinen() {
        let before = json!({"roads": {"1": {"w": 1, "l": 2}, "2": {"w": 1}}, "objects": {}});
        let after = json!({"roads": {"1": {"w": 5, "l": 2}, "3": {"w": 1}}, "objects": {}});
        let diff = StructuralDiff.diff(&before, &after);
        assert_eq!(
            diff,
            json!({"roads": {"1": {"w": 5}, "2": null, "3": {"w": 1}}})
        );
        assert_eq!(changed_sections(&diff), vec!["roads"]);
        let mut ids = changed_ids(&diff, "roads");
        ids.sort();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn arrays_werden_indexweise_verglichen() {
        let before = json!({"lanes": [1, 2, 3]});
        let after = json!({"lanes": [1, 4]});
        assert_eq!(
            StructuralDiff.diff(&before, &after),
            json!({"lanes": {"1": 4, "2": null}})
        );
    }
}
