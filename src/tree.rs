use serde::Serialize;
use serde_json::Value;

/// Node kind, serialized with the labels downstream consumers expect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum NodeKind {
    #[serde(rename = "原始博文")]
    OriginalPost,
    #[serde(rename = "评论")]
    Comment,
    #[serde(rename = "转发微博")]
    Repost,
}

/// One node of a reconstructed thread. Field order is the output key order.
#[derive(Clone, Debug, Serialize)]
pub struct TreeNode {
    pub id: Value,
    pub user_id: Value,
    pub user: Value,
    pub interests: Vec<String>,
    pub content: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub depth: u32,
    pub replies: Vec<TreeNode>,
    /// Absent on the root.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interaction_count: Option<u64>,
}

impl TreeNode {
    /// Pre-order walk over this node and every descendant.
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a TreeNode)) {
        f(self);
        for child in &self.replies {
            child.walk(f);
        }
    }

    /// Total node count including `self`.
    pub fn size(&self) -> usize {
        let mut n = 0usize;
        self.walk(&mut |_| n += 1);
        n
    }
}
