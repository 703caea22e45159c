// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON snapshots of a view.
//!
//! [`export`] writes a view's layer tree and base registry as one JSON
//! object, for diffing sync results or attaching to bug reports:
//!
//! ```json
//! {
//!   "view": "View Layer",
//!   "active_node": "NodeId(0@gen0)",
//!   "tree": [{ "node": "...", "collection": "A", "exclude": false, "children": [] }],
//!   "bases": [{ "base": "...", "object": "Cube", "flags": ["SELECTABLE", "VISIBLE"] }]
//! }
//! ```

use std::io::{self, Write};

use serde_json::{Value, json};

use strata_core::data::{CollectionStore, IdStore, NodeId};
use strata_core::view::View;

fn node_json(view: &View, collections: &CollectionStore, id: NodeId) -> Value {
    let Some(node) = view.node(id) else {
        return Value::Null;
    };
    let name = collections
        .get(node.collection())
        .map_or_else(|| format!("{:?}", node.collection()), |c| c.name.clone());
    let children: Vec<Value> = node
        .children()
        .iter()
        .map(|&child| node_json(view, collections, child))
        .collect();
    json!({
        "node": format!("{id:?}"),
        "collection": name,
        "exclude": node.is_excluded(),
        "children": children,
    })
}

/// Builds the snapshot value without writing it.
#[must_use]
pub fn to_value(view: &View, collections: &CollectionStore, ids: &IdStore) -> Value {
    let tree: Vec<Value> = view
        .roots()
        .iter()
        .map(|&root| node_json(view, collections, root))
        .collect();
    let bases: Vec<Value> = view
        .bases()
        .iter()
        .map(|(id, base)| {
            let object = ids
                .get(base.object())
                .map_or_else(|| format!("{:?}", base.object()), |b| b.name.clone());
            let flags: Vec<&str> = base.flags().iter_names().map(|(name, _)| name).collect();
            json!({
                "base": format!("{id:?}"),
                "object": object,
                "flags": flags,
            })
        })
        .collect();
    json!({
        "view": view.name(),
        "active_node": view.active_node().map(|n| format!("{n:?}")),
        "active_base": view.bases().active().map(|b| format!("{b:?}")),
        "tree": tree,
        "bases": bases,
    })
}

/// Writes a pretty-printed JSON snapshot of `view` to `writer`.
pub fn export(
    view: &View,
    collections: &CollectionStore,
    ids: &IdStore,
    writer: &mut dyn Write,
) -> io::Result<()> {
    let value = to_value(view, collections, ids);
    serde_json::to_writer_pretty(&mut *writer, &value).map_err(io::Error::other)?;
    writeln!(writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::Database;
    use strata_core::data::{CollectionFlags, ObjectData, ObjectType};
    use strata_core::trace::Tracer;

    #[test]
    fn export_lists_tree_and_bases() {
        let mut db = Database::new();
        let scene = db.add_scene("Scene");
        let master = db.scene(scene).unwrap().master();
        let a = db.collections.create("A");
        db.collections.link_child(master, a).unwrap();
        db.collections.set_restrict(a, CollectionFlags::RESTRICT_SELECT);
        db.add_object(a, "Cube", ObjectData::new(ObjectType::Mesh));
        db.sync_all(&mut Tracer::none());

        let view = db.scene(scene).unwrap().view(0).unwrap();
        let mut out = Vec::new();
        export(view, &db.collections, &db.ids, &mut out).unwrap();
        let parsed: Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(parsed["view"], "View Layer");
        assert_eq!(parsed["tree"][0]["collection"], "Scene Collection");
        assert_eq!(parsed["tree"][0]["children"][0]["collection"], "A");
        assert_eq!(parsed["bases"][0]["object"], "Cube");
        let flags = parsed["bases"][0]["flags"].as_array().unwrap();
        assert!(flags.contains(&json!("VISIBLE")));
        assert!(!flags.contains(&json!("SELECTABLE")), "A restricts selection");
    }
}
