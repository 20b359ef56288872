//! Expressed-chart graph snapshot.
//!
//! The graph builder (an external collaborator) turns an event list
//! into a chain of [`SearchNode`]s, one per decision point, each
//! carrying where every foot part sits after that point. The chain
//! lives in a `Vec` arena; nodes link by index, and the root node sits
//! before the first real row with the pad's default placements.

use alloc::vec::Vec;

use sw_chart::{Foot, FootPart, GraphConfig, Lane, NoteEvent, PartPlacement, Row, StepGraph};

/// Index of a node in a [`GraphSnapshot`] arena.
pub type NodeId = u32;

/// How a node relates to its predecessor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LinkKind {
    /// A foot pressed one or more arrows
    #[default]
    Step,
    /// A foot part released (hold end)
    Release,
}

/// One decision point in the expressed chart.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SearchNode {
    /// Chart row of the step this node represents
    pub row: Row,
    /// Derived time of that row
    pub time: f64,
    /// Placement per foot and part after this step
    pub placements: [[PartPlacement; FootPart::COUNT]; Foot::COUNT],
    /// Previous node in the chain
    pub prev: Option<NodeId>,
    /// Next node in the chain
    pub next: Option<NodeId>,
    /// Relation to the previous node
    pub link: LinkKind,
}

impl SearchNode {
    /// Placement of one foot part at this node.
    pub const fn placement(&self, foot: Foot, part: FootPart) -> PartPlacement {
        self.placements[foot.index()][part.index()]
    }
}

/// A complete expressed-chart chain, cheap to clone.
#[derive(Clone, Debug)]
pub struct GraphSnapshot {
    nodes: Vec<SearchNode>,
    root: NodeId,
}

impl GraphSnapshot {
    /// A snapshot holding only the root node, placed one row before
    /// the chart with the pad's default footing.
    pub fn with_root(graph: &StepGraph) -> Self {
        let mut placements = [[PartPlacement::default(); FootPart::COUNT]; Foot::COUNT];
        for foot in Foot::ALL {
            for part in FootPart::ALL {
                if let Some(lane) = graph.root_lane(foot, part) {
                    placements[foot.index()][part.index()] = PartPlacement::on(lane);
                }
            }
        }
        let root = SearchNode {
            row: -1,
            time: 0.0,
            placements,
            prev: None,
            next: None,
            link: LinkKind::Step,
        };
        Self {
            nodes: alloc::vec![root],
            root: 0,
        }
    }

    /// Append a node to the tail of the chain.
    pub fn append(
        &mut self,
        row: Row,
        time: f64,
        placements: [[PartPlacement; FootPart::COUNT]; Foot::COUNT],
        link: LinkKind,
    ) -> NodeId {
        let id = self.nodes.len() as NodeId;
        let tail = id - 1;
        self.nodes[tail as usize].next = Some(id);
        self.nodes.push(SearchNode {
            row,
            time,
            placements,
            prev: Some(tail),
            next: None,
            link,
        });
        id
    }

    /// The root node's id.
    pub const fn root(&self) -> NodeId {
        self.root
    }

    /// Node by id.
    pub fn node(&self, id: NodeId) -> &SearchNode {
        &self.nodes[id as usize]
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when only the root exists.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// First node whose row is >= `row`, walking forward from the
    /// root. `None` when the whole chain lies before `row`.
    pub fn first_at_or_after(&self, row: Row) -> Option<NodeId> {
        let mut cur = Some(self.root);
        while let Some(id) = cur {
            let node = self.node(id);
            if node.row >= row {
                return Some(id);
            }
            cur = node.next;
        }
        None
    }
}

/// Why the graph builder rejected an event list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GraphBuildError {
    /// No foot assignment reaches the step at this row
    UnreachableState { row: Row },
    /// A hold start or end has no matching partner
    UnbalancedHold { lane: Lane, row: Row },
}

/// External expressed-chart builder seam.
///
/// A pure function of its inputs: the same events, layout, config and
/// difficulty always yield the same chain. Failure is reported to the
/// caller per region, never fatal to the batch.
pub trait GraphBuild {
    fn build(
        &self,
        events: &[NoteEvent],
        graph: &StepGraph,
        config: &GraphConfig,
        difficulty: u8,
    ) -> Result<GraphSnapshot, GraphBuildError>;
}
