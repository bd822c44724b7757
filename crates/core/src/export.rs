use crate::frame::{Frame, TileKind};
use crate::model::*;

pub fn frame_to_csv(frame: &Frame, mut w: impl std::io::Write) -> csv::Result<()> {
    let mut writer = csv::Writer::from_writer(&mut w);
    writer.write_record([
        "id", "name", "kind", "value", "x", "y", "width", "height", "color", "label", "row",
    ])?;
    for t in &frame.tiles {
        let kind = match t.kind {
            TileKind::Group => "group",
            TileKind::Terminal => "terminal",
        };
        writer.write_record([
            t.id.0.to_string(),
            t.name.clone(),
            kind.to_string(),
            t.value.to_string(),
            t.screen.x.to_string(),
            t.screen.y.to_string(),
            t.screen.w.to_string(),
            t.screen.h.to_string(),
            t.color.0.clone(),
            t.label.visible.to_string(),
            t.row.map(|r| r.to_string()).unwrap_or_default(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

pub fn frame_to_json(frame: &Frame) -> serde_json::Value {
    serde_json::to_value(frame).unwrap_or(serde_json::Value::Null)
}

pub fn tree_to_json(tree: &Tree) -> serde_json::Value {
    serde_json::json!({
        "root": tree.root.0,
        "nodes": tree.nodes.iter().map(|n| serde_json::json!({
            "id": n.id.0,
            "key": n.key,
            "parent": n.parent.as_ref().map(|p| p.0),
            "name": n.name,
            "kind": if n.is_leaf() { "leaf" } else { "internal" },
            "value": n.value(),
            "index": n.index(),
            "children": n.children().iter().map(|c| c.0).collect::<Vec<_>>()
        })).collect::<Vec<_>>()
    })
}
