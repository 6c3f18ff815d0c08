//! Sunburst hierarchy over nested level ranges.
//!
//! Tier 0 parts hang off the root (empty parent id). Every part of tier `i`
//! hangs off the first part of tier `i - 1` that contains it, and each level
//! record becomes a leaf under the first containing part of the last tier.
//! Unmatched parts and leaves are attached to the root and reported as
//! [`Diagnostic`]s instead of failing the build.

use std::fmt;

use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::domain::entities::{LevelRecord, RangePart, RangeTier};

/// Parent id of top-level nodes.
pub const ROOT_ID: &str = "";

/// Node id: `"start-end"` for range sections, the level number for leaves.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum NodeId {
    Level(i64),
    Range(String),
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeId::Level(level) => write!(f, "{level}"),
            NodeId::Range(id) => f.write_str(id),
        }
    }
}

/// One sunburst slice.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HierarchyNode {
    pub id: NodeId,
    pub parent: String,
    #[serde(rename = "name")]
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

impl HierarchyNode {
    pub fn is_leaf(&self) -> bool {
        matches!(self.id, NodeId::Level(_))
    }

    pub fn is_root_child(&self) -> bool {
        self.parent == ROOT_ID
    }
}

/// Degraded-output events raised while building.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Diagnostic {
    /// No part of the enclosing tier contains this range; attached to root.
    OrphanedRangeNode { tier: usize, start: i64, end: i64 },
    /// Record without a numeric experience-to-next value; left out.
    SkippedLeaf { level: i64 },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::OrphanedRangeNode { tier, start, end } => write!(
                f,
                "cannot find parent for {start}-{end} (tier {tier}), attached to root"
            ),
            Diagnostic::SkippedLeaf { level } => {
                write!(f, "no valid experienceToNextLevel for level {level}")
            }
        }
    }
}

/// Result of [`build_hierarchy`]: nodes in emission order plus diagnostics.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Hierarchy {
    pub nodes: Vec<HierarchyNode>,
    pub diagnostics: Vec<Diagnostic>,
    /// Position of each node's parent in `nodes`; `None` for root children.
    /// Always smaller than the node's own position.
    #[serde(skip)]
    parents: Vec<Option<usize>>,
}

impl Hierarchy {
    pub fn leaves(&self) -> impl Iterator<Item = &HierarchyNode> {
        self.nodes.iter().filter(|n| n.is_leaf())
    }

    pub fn children_of<'a>(&'a self, parent: &'a str) -> impl Iterator<Item = &'a HierarchyNode> {
        self.nodes.iter().filter(move |n| n.parent == parent)
    }

    /// Children of the node at position `parent` (`None` for the root),
    /// with their positions.
    ///
    /// Ids repeat when a finer tier repeats a coarser part, so walking the
    /// tree goes through positions rather than [`Hierarchy::children_of`].
    pub fn children_at(
        &self,
        parent: Option<usize>,
    ) -> impl Iterator<Item = (usize, &HierarchyNode)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(move |(index, _)| self.parents.get(*index).copied().flatten() == parent)
    }

    fn push(&mut self, node: HierarchyNode, parent: Option<usize>) {
        self.nodes.push(node);
        self.parents.push(parent);
    }
}

/// Find the parent id for range `[start, end]` sitting at `tier`.
///
/// `tier == tiers.len()` resolves leaves against the last tier. Returns
/// `None` when no part of the enclosing tier contains the range; tier 0
/// always resolves to [`ROOT_ID`].
pub fn resolve_parent(tiers: &[RangeTier], tier: usize, start: i64, end: i64) -> Option<String> {
    if tier == 0 {
        return Some(ROOT_ID.to_string());
    }
    enclosing_part(tiers, tier, start, end).map(|(_, part)| part.id())
}

/// First part of tier `tier - 1` containing `[start, end]`, with its
/// position inside that tier.
fn enclosing_part(
    tiers: &[RangeTier],
    tier: usize,
    start: i64,
    end: i64,
) -> Option<(usize, &RangePart)> {
    tiers
        .get(tier.checked_sub(1)?)?
        .parts
        .iter()
        .enumerate()
        .find(|(_, p)| p.contains(start, end))
}

/// Build the flat sunburst node list.
///
/// Emission order: tiers outer to inner (parts in configured order), then
/// leaves in record order.
#[instrument(level = "debug", skip_all, fields(tiers = tiers.len(), records = records.len()))]
pub fn build_hierarchy(tiers: &[RangeTier], records: &[LevelRecord]) -> Hierarchy {
    let mut hierarchy = Hierarchy::default();
    // position of each tier's first part in `nodes`
    let mut offsets = Vec::with_capacity(tiers.len());

    for (tier, level) in tiers.iter().enumerate() {
        offsets.push(hierarchy.nodes.len());
        for part in &level.parts {
            let (parent, parent_at) =
                parent_or_orphan(&mut hierarchy, tiers, &offsets, tier, part.start, part.end);
            hierarchy.push(
                HierarchyNode {
                    id: NodeId::Range(part.id()),
                    parent,
                    label: part.label(),
                    value: None,
                },
                parent_at,
            );
        }
    }

    for record in records {
        let Some(value) = record.experience_to_next_level else {
            info!(level = record.level, "no valid experienceToNextLevel, skipping leaf");
            hierarchy.diagnostics.push(Diagnostic::SkippedLeaf {
                level: record.level,
            });
            continue;
        };
        let (parent, parent_at) = parent_or_orphan(
            &mut hierarchy,
            tiers,
            &offsets,
            tiers.len(),
            record.level,
            record.level,
        );
        hierarchy.push(
            HierarchyNode {
                id: NodeId::Level(record.level),
                parent,
                label: record.level.to_string(),
                value: Some(value),
            },
            parent_at,
        );
    }

    hierarchy
}

/// Parent id and parent position, or the root plus an orphan diagnostic.
fn parent_or_orphan(
    hierarchy: &mut Hierarchy,
    tiers: &[RangeTier],
    offsets: &[usize],
    tier: usize,
    start: i64,
    end: i64,
) -> (String, Option<usize>) {
    if tier == 0 {
        return (ROOT_ID.to_string(), None);
    }
    match enclosing_part(tiers, tier, start, end) {
        Some((pos, part)) => (part.id(), Some(offsets[tier - 1] + pos)),
        None => {
            warn!(tier, start, end, "cannot find parent id, attaching to root");
            hierarchy
                .diagnostics
                .push(Diagnostic::OrphanedRangeNode { tier, start, end });
            (ROOT_ID.to_string(), None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiers() -> Vec<RangeTier> {
        vec![
            RangeTier::new(vec![RangePart::new(1, 10)]),
            RangeTier::new(vec![RangePart::new(1, 5), RangePart::new(6, 10)]),
        ]
    }


    #[test]
    fn given_repeated_part_when_building_then_parent_positions_follow_tiers() {
        let tiers = vec![
            RangeTier::new(vec![RangePart::new(1, 10)]),
            RangeTier::new(vec![RangePart::new(1, 10)]),
        ];
        let records = vec![LevelRecord::new(1, None, Some(100.0))];

        let hierarchy = build_hierarchy(&tiers, &records);

        let root: Vec<usize> = hierarchy.children_at(None).map(|(i, _)| i).collect();
        let under_outer: Vec<usize> = hierarchy.children_at(Some(0)).map(|(i, _)| i).collect();
        let under_inner: Vec<usize> = hierarchy.children_at(Some(1)).map(|(i, _)| i).collect();
        assert_eq!(root, vec![0]);
        assert_eq!(under_outer, vec![1]);
        assert_eq!(under_inner, vec![2]);
        assert!(hierarchy.children_at(Some(2)).next().is_none());
    }

    #[test]
    fn given_tier_zero_when_resolving_then_root() {
        assert_eq!(resolve_parent(&tiers(), 0, 1, 10), Some(String::new()));
    }

    #[test]
    fn given_nested_range_when_resolving_then_first_containing_part() {
        assert_eq!(resolve_parent(&tiers(), 1, 6, 10), Some("1-10".to_string()));
        assert_eq!(resolve_parent(&tiers(), 2, 7, 7), Some("6-10".to_string()));
    }

    #[test]
    fn given_overlapping_parts_when_resolving_then_configured_order_wins() {
        let tiers = vec![RangeTier::new(vec![RangePart::new(1, 20), RangePart::new(1, 10)])];
        assert_eq!(resolve_parent(&tiers, 1, 3, 3), Some("1-20".to_string()));
    }

    #[test]
    fn given_straddling_range_when_resolving_then_none() {
        assert_eq!(resolve_parent(&tiers(), 2, 5, 6), None);
    }

    #[test]
    fn given_tiers_and_records_when_building_then_emits_tiers_before_leaves() {
        let records = vec![
            LevelRecord::new(1, Some(0.0), Some(10.0)),
            LevelRecord::new(6, Some(10.0), Some(20.0)),
        ];

        let hierarchy = build_hierarchy(&tiers(), &records);

        let ids: Vec<String> = hierarchy.nodes.iter().map(|n| n.id.to_string()).collect();
        assert_eq!(ids, vec!["1-10", "1-5", "6-10", "1", "6"]);
        assert_eq!(hierarchy.nodes[0].label, "1-10 [10]");
        assert_eq!(hierarchy.nodes[3].parent, "1-5");
        assert_eq!(hierarchy.nodes[4].parent, "6-10");
        assert_eq!(hierarchy.nodes[4].value, Some(20.0));
        assert!(hierarchy.diagnostics.is_empty());
    }

    #[test]
    fn given_no_tiers_when_building_then_leaves_hang_off_root() {
        let records = vec![LevelRecord::new(1, None, Some(5.0))];

        let hierarchy = build_hierarchy(&[], &records);

        assert_eq!(hierarchy.nodes.len(), 1);
        assert!(hierarchy.nodes[0].is_root_child());
        assert!(hierarchy.diagnostics.is_empty());
    }

    #[test]
    fn given_node_when_serializing_then_uses_chart_field_names() {
        let node = HierarchyNode {
            id: NodeId::Level(3),
            parent: "1-5".into(),
            label: "3".into(),
            value: Some(150.0),
        };
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": 3, "parent": "1-5", "name": "3", "value": 150.0})
        );
    }
}
