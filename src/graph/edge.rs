//! Edge kind classification for flow graph edges.

use serde::{Deserialize, Serialize};

/// Classification of a [`super::FlowEdge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeKind {
    /// Unconditional control transfer, no guard.
    Epsilon,
    /// Guarded by the edge's `astRef`, a boolean expression. Always paired
    /// with a complementary `Conditional` edge out of the same source whose
    /// guard is the truthiness-negation of this one.
    Conditional,
    /// A `break`/`continue`/`return`/`throw`/implicit-`return undefined`
    /// transition.
    AbruptCompletion,
}
